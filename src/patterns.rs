//! Builds the engine's input from raw monthly spending totals.

use crate::error::{InsightError, Result};
use crate::schema::{MonthlyChange, SeasonalBucket, SeasonalPatterns, SpendingPatterns, VolatilityStats};
use crate::utils::{first_of_month, month_label, month_name, parse_month_label, round_to};
use chrono::NaiveDate;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Spending total for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySpending {
    pub month: NaiveDate,
    pub spending: f64,
}

impl MonthlySpending {
    pub fn new(month: NaiveDate, spending: f64) -> Self {
        Self {
            month: first_of_month(month),
            spending,
        }
    }

    /// Accepts "YYYY-MM" or "January 2024".
    pub fn from_label(label: &str, spending: f64) -> Result<Self> {
        Ok(Self::new(parse_month_label(label)?, spending))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternOptions {
    /// How many of the most recent month-over-month changes to keep.
    pub max_changes: usize,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self { max_changes: 12 }
    }
}

pub fn build_spending_patterns(records: &[MonthlySpending]) -> Result<SpendingPatterns> {
    build_spending_patterns_with(records, PatternOptions::default())
}

pub fn build_spending_patterns_with(
    records: &[MonthlySpending],
    options: PatternOptions,
) -> Result<SpendingPatterns> {
    if records.is_empty() {
        return Err(InsightError::NoData);
    }

    let mut ordered: Vec<MonthlySpending> = records
        .iter()
        .map(|r| MonthlySpending::new(r.month, r.spending))
        .collect();
    ordered.sort_by(|a, b| b.month.cmp(&a.month));

    let monthly_changes = month_over_month(&ordered, options.max_changes);
    let seasonal_patterns = seasonal_buckets(&ordered);
    let amounts: Vec<f64> = ordered.iter().map(|r| r.spending).collect();
    let volatility = volatility_stats(&amounts);

    debug!(
        "Built spending patterns from {} month(s): {} change(s), {} seasonal bucket(s)",
        ordered.len(),
        monthly_changes.len(),
        seasonal_patterns.len()
    );

    Ok(SpendingPatterns {
        monthly_changes,
        seasonal_patterns,
        volatility,
    })
}

/// `ordered` must be most-recent-first. The oldest month has no predecessor
/// and produces no change record.
fn month_over_month(ordered: &[MonthlySpending], limit: usize) -> Vec<MonthlyChange> {
    ordered
        .windows(2)
        .take(limit)
        .map(|pair| {
            let current = pair[0].spending;
            let previous = pair[1].spending;
            let change = if previous != 0.0 {
                (current - previous) / previous * 100.0
            } else {
                0.0
            };
            MonthlyChange::new(
                month_label(pair[0].month),
                round_to(current, 2),
                round_to(change, 1),
            )
        })
        .collect()
}

fn seasonal_buckets(ordered: &[MonthlySpending]) -> SeasonalPatterns {
    let mut grouped: IndexMap<String, Vec<f64>> = IndexMap::new();
    for record in ordered {
        grouped
            .entry(month_name(record.month))
            .or_default()
            .push(record.spending);
    }

    grouped
        .into_iter()
        .map(|(name, amounts)| {
            let total: f64 = amounts.iter().sum();
            let highest = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let lowest = amounts.iter().copied().fold(f64::INFINITY, f64::min);
            let bucket = SeasonalBucket {
                average_spending: round_to(total / amounts.len() as f64, 2),
                sample_count: amounts.len() as u32,
                highest: round_to(highest, 2),
                lowest: round_to(lowest, 2),
            };
            (name, bucket)
        })
        .collect()
}

/// Sample standard deviation and coefficient of variation over the full
/// history.
pub fn volatility_stats(amounts: &[f64]) -> VolatilityStats {
    if amounts.len() < 2 {
        return VolatilityStats::default();
    }

    let n = amounts.len() as f64;
    let mean = amounts.iter().sum::<f64>() / n;
    let variance = amounts.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    let cv = if mean != 0.0 {
        std_dev / mean.abs() * 100.0
    } else {
        0.0
    };

    VolatilityStats::new(round_to(std_dev, 2), round_to(cv, 2))
}
