use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlyChange {
    #[schemars(description = "Label of the period, e.g. 'January 2024'")]
    #[serde(alias = "month")]
    pub period: String,

    #[schemars(description = "Total spending for the period")]
    pub spending: f64,

    #[schemars(
        description = "Percentage change versus the immediately preceding period. Zero when there is no usable predecessor."
    )]
    #[serde(default, alias = "change")]
    pub change_percent: f64,
}

impl MonthlyChange {
    pub fn new(period: impl Into<String>, spending: f64, change_percent: f64) -> Self {
        Self {
            period: period.into(),
            spending,
            change_percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SeasonalBucket {
    #[schemars(description = "Mean spending across every occurrence of this calendar month")]
    pub average_spending: f64,

    #[schemars(description = "Number of periods that fell into this bucket (at least 1)")]
    #[serde(alias = "data_points")]
    pub sample_count: u32,

    #[schemars(description = "Highest single-period spending in this bucket")]
    pub highest: f64,

    #[schemars(description = "Lowest single-period spending in this bucket")]
    pub lowest: f64,
}

impl SeasonalBucket {
    /// A bucket built from a single observation.
    pub fn single(amount: f64) -> Self {
        Self {
            average_spending: amount,
            sample_count: 1,
            highest: amount,
            lowest: amount,
        }
    }
}

/// Seasonal buckets keyed by calendar grouping label. Iteration order is
/// insertion order.
pub type SeasonalPatterns = IndexMap<String, SeasonalBucket>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct VolatilityStats {
    #[schemars(description = "Standard deviation of spending over the full history")]
    #[serde(alias = "std_dev")]
    pub std_deviation: f64,

    #[schemars(
        description = "Standard deviation divided by mean spending, as a percentage. Assumed non-negative."
    )]
    pub coefficient_of_variation: f64,
}

impl VolatilityStats {
    pub fn new(std_deviation: f64, coefficient_of_variation: f64) -> Self {
        Self {
            std_deviation,
            coefficient_of_variation,
        }
    }
}

/// Everything the engine looks at for a single run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SpendingPatterns {
    #[schemars(description = "Month-over-month changes, most recent period first")]
    #[serde(default)]
    pub monthly_changes: Vec<MonthlyChange>,

    #[schemars(description = "Per-calendar-month spending buckets")]
    #[serde(default)]
    pub seasonal_patterns: SeasonalPatterns,

    #[schemars(description = "Variability of spending over the full history")]
    #[serde(default)]
    pub volatility: VolatilityStats,
}

impl SpendingPatterns {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(SpendingPatterns)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }

    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
