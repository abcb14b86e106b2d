//! Output types: the insight records handed to the renderer.

use crate::config::Framing;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an insight should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Something worth acting on
    Warning,
    /// A healthy signal
    Positive,
    /// Neutral observation
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Positive => "positive",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" => Ok(Severity::Warning),
            "positive" => Ok(Severity::Positive),
            "info" => Ok(Severity::Info),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// The insight type tag together with exactly the auxiliary fields that
/// type carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum InsightKind {
    HighVolatility { volatility: f64 },
    /// Investment-framed counterpart of `HighVolatility`.
    SpendingVolatility { volatility: f64 },
    ModerateVolatility { volatility: f64 },
    ConsistentSpending { volatility: f64 },
    SpendingIncreases { increasing_months: usize },
    SpendingDecreases { decreasing_months: usize },
    /// Investment-framed counterpart of `SpendingIncreases`.
    SpendingTrend { recent_increases: usize },
    SeasonalPeaks { peak_months: Vec<String> },
    SavingsOpportunities { opportunity_months: Vec<String> },
    /// Investment-framed counterpart of `SavingsOpportunities`.
    InvestmentOpportunity { opportunity_months: Vec<String> },
    ExtremeFluctuations { extreme_months: usize },
    GeneralAnalysis {},
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::HighVolatility { .. } => "high_volatility",
            InsightKind::SpendingVolatility { .. } => "spending_volatility",
            InsightKind::ModerateVolatility { .. } => "moderate_volatility",
            InsightKind::ConsistentSpending { .. } => "consistent_spending",
            InsightKind::SpendingIncreases { .. } => "spending_increases",
            InsightKind::SpendingDecreases { .. } => "spending_decreases",
            InsightKind::SpendingTrend { .. } => "spending_trend",
            InsightKind::SeasonalPeaks { .. } => "seasonal_peaks",
            InsightKind::SavingsOpportunities { .. } => "savings_opportunities",
            InsightKind::InvestmentOpportunity { .. } => "investment_opportunity",
            InsightKind::ExtremeFluctuations { .. } => "extreme_fluctuations",
            InsightKind::GeneralAnalysis {} => "general_analysis",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single user-facing observation. `message` is always a finished sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(flatten)]
    pub kind: InsightKind,
    pub severity: Severity,
    pub message: String,
}

impl Insight {
    pub fn new(kind: InsightKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
        }
    }

    /// The type tag, e.g. `"seasonal_peaks"`.
    pub fn type_tag(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Counts by severity, projected from a final insight list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InsightSummary {
    pub warning_count: usize,
    pub info_count: usize,
    pub positive_count: usize,
}

impl InsightSummary {
    pub fn from_insights(insights: &[Insight]) -> Self {
        insights
            .iter()
            .fold(Self::default(), |mut summary, insight| {
                match insight.severity {
                    Severity::Warning => summary.warning_count += 1,
                    Severity::Info => summary.info_count += 1,
                    Severity::Positive => summary.positive_count += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.warning_count + self.info_count + self.positive_count
    }
}

/// The engine's answer for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub framing: Framing,
    pub insights: Vec<Insight>,
    pub summary: InsightSummary,
}

impl InsightReport {
    pub fn new(framing: Framing, insights: Vec<Insight>) -> Self {
        let summary = InsightSummary::from_insights(&insights);
        Self {
            framing,
            insights,
            summary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
