//! # Spending Pattern Insights
//!
//! A rule-based engine that inspects a client's monthly spending history and
//! returns an ordered list of human-readable insights (warnings, positive
//! signals and neutral observations) together with counts by severity.
//!
//! ## Core Concepts
//!
//! - **Spending Patterns**: month-over-month changes (most recent first),
//!   per-calendar-month seasonal buckets and volatility statistics
//! - **Framing**: a rule-set (general spending or investment planning) that
//!   selects thresholds, enabled analyzers, message templates and fallback behavior
//! - **Analyzers**: volatility classifier, trend scanner, seasonal analyzer and
//!   extreme-change detector, run in that fixed order
//! - **Insight**: a typed record with a severity and a fully formatted message
//!
//! The engine is a pure function of its input: the same patterns always
//! produce the same report.
//!
//! ## Example
//!
//! ```rust
//! use spending_pattern_insights::*;
//!
//! let patterns = SpendingPatterns {
//!     volatility: VolatilityStats::new(400.0, 85.0),
//!     ..Default::default()
//! };
//!
//! let report = analyze_patterns(&patterns, Framing::GeneralSpending).unwrap();
//! assert_eq!(report.insights.len(), 1);
//! assert_eq!(report.insights[0].type_tag(), "high_volatility");
//! assert_eq!(report.summary.warning_count, 1);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod extreme;
pub mod insight;
pub mod patterns;
pub mod schema;
pub mod seasonal;
pub mod trend;
pub mod utils;
pub mod volatility;

pub use config::{
    EnabledAnalyzers, Framing, FramingConfig, MessageTemplates, SeasonalLowBaseline, Thresholds,
    VolatilityMidBand,
};
pub use engine::{analyze_patterns, Analyzer, AnalyzerKind, InsightEngine};
pub use error::{InsightError, Result};
pub use extreme::{detect_extreme_changes, find_extreme_changes, ExtremeChangeDetector};
pub use insight::{Insight, InsightKind, InsightReport, InsightSummary, Severity};
pub use patterns::{
    build_spending_patterns, build_spending_patterns_with, MonthlySpending, PatternOptions,
};
pub use schema::*;
pub use seasonal::{analyze_seasons, split_seasons, SeasonalAnalyzer, SeasonalSplit};
pub use trend::{count_recent_moves, scan_trend, TrendCounts, TrendScanner};
pub use volatility::{classify_volatility, VolatilityClassifier};

use log::info;

/// Runs both framings over the same patterns, as the dashboard does when it
/// shows the spending and investment views side by side.
pub fn analyze_all_framings(patterns: &SpendingPatterns) -> Result<Vec<InsightReport>> {
    info!(
        "Analyzing {} change(s) and {} seasonal bucket(s) under all framings",
        patterns.monthly_changes.len(),
        patterns.seasonal_patterns.len()
    );

    [Framing::GeneralSpending, Framing::InvestmentPlanning]
        .into_iter()
        .map(|framing| analyze_patterns(patterns, framing))
        .collect()
}

/// Builds patterns from raw monthly totals and analyzes them in one step.
pub fn analyze_monthly_spending(
    records: &[MonthlySpending],
    framing: Framing,
) -> Result<InsightReport> {
    let patterns = build_spending_patterns(records)?;
    analyze_patterns(&patterns, framing)
}
