use crate::config::{Framing, FramingConfig, SeasonalLowBaseline};
use crate::engine::{Analyzer, AnalyzerKind};
use crate::insight::{Insight, InsightKind, Severity};
use crate::schema::{SeasonalPatterns, SpendingPatterns};
use crate::utils::{join_labels, render_template};

/// High and low buckets, in the iteration order of the input mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeasonalSplit {
    pub high: Vec<String>,
    pub low: Vec<String>,
}

/// Unweighted mean of the per-bucket averages; `None` for an empty mapping.
pub fn mean_bucket_average(buckets: &SeasonalPatterns) -> Option<f64> {
    if buckets.is_empty() {
        return None;
    }
    let total: f64 = buckets.values().map(|b| b.average_spending).sum();
    Some(total / buckets.len() as f64)
}

fn min_bucket_average(buckets: &SeasonalPatterns) -> Option<f64> {
    buckets
        .values()
        .map(|b| b.average_spending)
        .reduce(f64::min)
}

pub fn split_seasons(buckets: &SeasonalPatterns, config: &FramingConfig) -> SeasonalSplit {
    let Some(mean) = mean_bucket_average(buckets) else {
        return SeasonalSplit::default();
    };

    let high_cut = mean * config.thresholds.seasonal_high_factor;
    let low_cut = match config.seasonal_low_baseline {
        SeasonalLowBaseline::MeanFraction(factor) => mean * factor,
        SeasonalLowBaseline::MinimumMultiple(factor) => {
            min_bucket_average(buckets).unwrap_or(mean) * factor
        }
    };

    let mut split = SeasonalSplit::default();
    for (label, bucket) in buckets {
        if bucket.average_spending > high_cut {
            split.high.push(label.clone());
        }
        if bucket.average_spending < low_cut {
            split.low.push(label.clone());
        }
    }
    split
}

pub fn analyze_seasons(buckets: &SeasonalPatterns, config: &FramingConfig) -> Vec<Insight> {
    let split = split_seasons(buckets, config);
    let templates = &config.templates;
    let mut insights = Vec::new();

    if !split.high.is_empty() {
        let message = render_template(
            &templates.seasonal_peaks,
            &[("months", join_labels(&split.high))],
        );
        insights.push(Insight::new(
            InsightKind::SeasonalPeaks {
                peak_months: split.high,
            },
            Severity::Info,
            message,
        ));
    }

    if !split.low.is_empty() {
        let message =
            render_template(&templates.low_season, &[("months", join_labels(&split.low))]);
        let kind = match config.framing {
            Framing::GeneralSpending => InsightKind::SavingsOpportunities {
                opportunity_months: split.low,
            },
            Framing::InvestmentPlanning => InsightKind::InvestmentOpportunity {
                opportunity_months: split.low,
            },
        };
        insights.push(Insight::new(kind, Severity::Positive, message));
    }

    insights
}

pub struct SeasonalAnalyzer;

impl Analyzer for SeasonalAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Seasonal
    }

    fn analyze(&self, patterns: &SpendingPatterns, config: &FramingConfig) -> Vec<Insight> {
        analyze_seasons(&patterns.seasonal_patterns, config)
    }
}
