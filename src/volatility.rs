use crate::config::{Framing, FramingConfig, VolatilityMidBand};
use crate::engine::{Analyzer, AnalyzerKind};
use crate::insight::{Insight, InsightKind, Severity};
use crate::schema::{SpendingPatterns, VolatilityStats};
use crate::utils::{format_number, render_template};

/// Buckets the coefficient of variation into high / moderate / consistent.
/// Bands are checked high first, then low; anything else is the middle band.
pub fn classify_volatility(stats: &VolatilityStats, config: &FramingConfig) -> Option<Insight> {
    let cv = stats.coefficient_of_variation;
    let thresholds = &config.thresholds;
    let templates = &config.templates;
    let values = [("volatility", format_number(cv))];

    if cv > thresholds.high_volatility {
        let kind = match config.framing {
            Framing::GeneralSpending => InsightKind::HighVolatility { volatility: cv },
            Framing::InvestmentPlanning => InsightKind::SpendingVolatility { volatility: cv },
        };
        return Some(Insight::new(
            kind,
            Severity::Warning,
            render_template(&templates.high_volatility, &values),
        ));
    }

    if cv < thresholds.low_volatility {
        return Some(Insight::new(
            InsightKind::ConsistentSpending { volatility: cv },
            Severity::Positive,
            render_template(&templates.consistent_spending, &values),
        ));
    }

    match config.volatility_mid_band {
        VolatilityMidBand::EmitInfo => Some(Insight::new(
            InsightKind::ModerateVolatility { volatility: cv },
            Severity::Info,
            render_template(&templates.moderate_volatility, &values),
        )),
        VolatilityMidBand::Silent => None,
    }
}

pub struct VolatilityClassifier;

impl Analyzer for VolatilityClassifier {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Volatility
    }

    fn analyze(&self, patterns: &SpendingPatterns, config: &FramingConfig) -> Vec<Insight> {
        classify_volatility(&patterns.volatility, config)
            .into_iter()
            .collect()
    }
}
