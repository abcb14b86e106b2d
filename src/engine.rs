use crate::config::{Framing, FramingConfig};
use crate::error::Result;
use crate::extreme::ExtremeChangeDetector;
use crate::insight::{Insight, InsightKind, InsightReport, Severity};
use crate::schema::SpendingPatterns;
use crate::seasonal::SeasonalAnalyzer;
use crate::trend::TrendScanner;
use crate::volatility::VolatilityClassifier;
use log::{debug, info};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyzerKind {
    Volatility,
    Trend,
    Seasonal,
    ExtremeChange,
}

impl AnalyzerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzerKind::Volatility => "volatility",
            AnalyzerKind::Trend => "trend",
            AnalyzerKind::Seasonal => "seasonal",
            AnalyzerKind::ExtremeChange => "extreme_change",
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single rule family. Implementations hold no state and must not fail.
pub trait Analyzer: Send + Sync {
    fn kind(&self) -> AnalyzerKind;

    fn analyze(&self, patterns: &SpendingPatterns, config: &FramingConfig) -> Vec<Insight>;
}

pub struct InsightEngine {
    config: FramingConfig,
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl InsightEngine {
    /// Builds an engine for a validated configuration. Analyzers run in a
    /// fixed order: volatility, trend, seasonal, extreme change.
    pub fn new(config: FramingConfig) -> Result<Self> {
        config.validate()?;

        let enabled = config.analyzers;
        let mut analyzers: Vec<Box<dyn Analyzer>> = Vec::new();
        if enabled.volatility {
            analyzers.push(Box::new(VolatilityClassifier));
        }
        if enabled.trend {
            analyzers.push(Box::new(TrendScanner));
        }
        if enabled.seasonal {
            analyzers.push(Box::new(SeasonalAnalyzer));
        }
        if enabled.extreme_change {
            analyzers.push(Box::new(ExtremeChangeDetector));
        }

        Ok(Self { config, analyzers })
    }

    pub fn for_framing(framing: Framing) -> Result<Self> {
        Self::new(FramingConfig::for_framing(framing))
    }

    pub fn config(&self) -> &FramingConfig {
        &self.config
    }

    pub fn analyzer_kinds(&self) -> Vec<AnalyzerKind> {
        self.analyzers.iter().map(|a| a.kind()).collect()
    }

    /// Runs every enabled analyzer and concatenates their output without
    /// reordering.
    pub fn analyze(&self, patterns: &SpendingPatterns) -> InsightReport {
        let mut insights = Vec::new();

        for analyzer in &self.analyzers {
            let found = analyzer.analyze(patterns, &self.config);
            debug!(
                "Analyzer '{}' produced {} insight(s)",
                analyzer.kind(),
                found.len()
            );
            insights.extend(found);
        }

        if insights.is_empty() && self.config.fallback_on_empty {
            debug!("No analyzer fired; adding fallback insight");
            insights.push(Insight::new(
                InsightKind::GeneralAnalysis {},
                Severity::Info,
                self.config.templates.fallback.clone(),
            ));
        }

        let report = InsightReport::new(self.config.framing, insights);
        info!(
            "Generated {} insight(s) for {} framing ({} warning, {} info, {} positive)",
            report.insights.len(),
            self.config.framing.as_str(),
            report.summary.warning_count,
            report.summary.info_count,
            report.summary.positive_count
        );

        report
    }
}

/// One-shot analysis with a preset framing.
pub fn analyze_patterns(patterns: &SpendingPatterns, framing: Framing) -> Result<InsightReport> {
    let engine = InsightEngine::for_framing(framing)?;
    Ok(engine.analyze(patterns))
}
