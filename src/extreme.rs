use crate::config::FramingConfig;
use crate::engine::{Analyzer, AnalyzerKind};
use crate::insight::{Insight, InsightKind, Severity};
use crate::schema::{MonthlyChange, SpendingPatterns};
use crate::utils::{format_number, join_labels, render_template};

/// Every entry whose absolute change exceeds the threshold, in input order.
pub fn find_extreme_changes<'a>(
    changes: &'a [MonthlyChange],
    config: &FramingConfig,
) -> Vec<&'a MonthlyChange> {
    changes
        .iter()
        .filter(|c| c.change_percent.abs() > config.thresholds.extreme_change)
        .collect()
}

pub fn detect_extreme_changes(changes: &[MonthlyChange], config: &FramingConfig) -> Option<Insight> {
    let extreme = find_extreme_changes(changes, config);
    if extreme.is_empty() {
        return None;
    }

    let sample_size = config.thresholds.extreme_sample;
    let sample: Vec<String> = extreme
        .iter()
        .take(sample_size)
        .map(|c| c.period.clone())
        .collect();
    let mut named = join_labels(&sample);
    if extreme.len() > sample_size {
        named.push_str("...");
    }

    let message = render_template(
        &config.templates.extreme_fluctuations,
        &[
            ("count", extreme.len().to_string()),
            ("threshold", format_number(config.thresholds.extreme_change)),
            ("months", named),
        ],
    );

    Some(Insight::new(
        InsightKind::ExtremeFluctuations {
            extreme_months: extreme.len(),
        },
        Severity::Warning,
        message,
    ))
}

pub struct ExtremeChangeDetector;

impl Analyzer for ExtremeChangeDetector {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::ExtremeChange
    }

    fn analyze(&self, patterns: &SpendingPatterns, config: &FramingConfig) -> Vec<Insight> {
        detect_extreme_changes(&patterns.monthly_changes, config)
            .into_iter()
            .collect()
    }
}
