use crate::config::{Framing, FramingConfig};
use crate::engine::{Analyzer, AnalyzerKind};
use crate::insight::{Insight, InsightKind, Severity};
use crate::schema::{MonthlyChange, SpendingPatterns};
use crate::utils::{format_number, render_template};

/// Counts of threshold crossings inside the trend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrendCounts {
    pub increasing: usize,
    pub decreasing: usize,
}

/// Counts sustained moves over the first `trend_window` entries only.
/// Input is most-recent-first; shorter inputs are scanned as-is.
pub fn count_recent_moves(changes: &[MonthlyChange], config: &FramingConfig) -> TrendCounts {
    let thresholds = &config.thresholds;

    changes
        .iter()
        .take(thresholds.trend_window)
        .fold(TrendCounts::default(), |mut counts, change| {
            if change.change_percent > thresholds.trend_increase {
                counts.increasing += 1;
            }
            if let Some(decrease) = thresholds.trend_decrease {
                if change.change_percent < decrease {
                    counts.decreasing += 1;
                }
            }
            counts
        })
}

pub fn scan_trend(changes: &[MonthlyChange], config: &FramingConfig) -> Option<Insight> {
    let thresholds = &config.thresholds;
    let templates = &config.templates;
    let counts = count_recent_moves(changes, config);
    let window = thresholds.trend_window.to_string();

    if counts.increasing >= thresholds.trend_min_months {
        let kind = match config.framing {
            Framing::GeneralSpending => InsightKind::SpendingIncreases {
                increasing_months: counts.increasing,
            },
            Framing::InvestmentPlanning => InsightKind::SpendingTrend {
                recent_increases: counts.increasing,
            },
        };
        let message = render_template(
            &templates.rising_trend,
            &[
                ("count", counts.increasing.to_string()),
                ("window", window),
                ("threshold", format_number(thresholds.trend_increase)),
            ],
        );
        return Some(Insight::new(kind, Severity::Warning, message));
    }

    let decrease = thresholds.trend_decrease?;
    if counts.decreasing >= thresholds.trend_min_months {
        let message = render_template(
            &templates.falling_trend,
            &[
                ("count", counts.decreasing.to_string()),
                ("window", window),
                ("threshold", format_number(decrease.abs())),
            ],
        );
        return Some(Insight::new(
            InsightKind::SpendingDecreases {
                decreasing_months: counts.decreasing,
            },
            Severity::Positive,
            message,
        ));
    }

    None
}

pub struct TrendScanner;

impl Analyzer for TrendScanner {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Trend
    }

    fn analyze(&self, patterns: &SpendingPatterns, config: &FramingConfig) -> Vec<Insight> {
        scan_trend(&patterns.monthly_changes, config)
            .into_iter()
            .collect()
    }
}
