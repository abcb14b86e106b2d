use crate::error::{InsightError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which rule-set a configuration belongs to. Selects the type tags used for
/// framing-specific insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    #[schemars(description = "General spending analysis")]
    GeneralSpending,

    #[schemars(description = "Spending analysis framed around investment planning")]
    InvestmentPlanning,
}

impl Framing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framing::GeneralSpending => "general_spending",
            Framing::InvestmentPlanning => "investment_planning",
        }
    }
}

/// What to do when the coefficient of variation lands between the low and
/// high volatility thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityMidBand {
    #[schemars(description = "Emit a moderate_volatility Info insight")]
    EmitInfo,

    #[schemars(description = "Emit nothing for the middle band")]
    Silent,
}

/// Baseline below which a seasonal bucket counts as a low-spending month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "policy", content = "factor")]
pub enum SeasonalLowBaseline {
    #[schemars(description = "Low when average < mean of bucket averages * factor")]
    MeanFraction(f64),

    #[schemars(description = "Low when average < minimum bucket average * factor")]
    MinimumMultiple(f64),
}

impl SeasonalLowBaseline {
    pub fn factor(&self) -> f64 {
        match self {
            SeasonalLowBaseline::MeanFraction(f) | SeasonalLowBaseline::MinimumMultiple(f) => *f,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Thresholds {
    #[schemars(description = "Coefficient of variation (%) above which spending is highly volatile")]
    pub high_volatility: f64,

    #[schemars(description = "Coefficient of variation (%) below which spending is consistent")]
    pub low_volatility: f64,

    #[schemars(description = "How many of the most recent periods the trend scanner inspects")]
    pub trend_window: usize,

    #[schemars(description = "How many periods in the window must cross a threshold to report a trend")]
    pub trend_min_months: usize,

    #[schemars(description = "Change (%) above which a period counts as an increase")]
    pub trend_increase: f64,

    #[schemars(description = "Change (%) below which a period counts as a decrease. Null disables decrease reporting.")]
    pub trend_decrease: Option<f64>,

    #[schemars(description = "A bucket is a peak when its average exceeds the mean bucket average times this factor")]
    pub seasonal_high_factor: f64,

    #[schemars(description = "Absolute change (%) above which a period is an extreme fluctuation")]
    pub extreme_change: f64,

    #[schemars(description = "How many extreme periods are named in the message")]
    pub extreme_sample: usize,
}

impl Thresholds {
    fn general_spending() -> Self {
        Self {
            high_volatility: 70.0,
            low_volatility: 30.0,
            trend_window: 3,
            trend_min_months: 2,
            trend_increase: 20.0,
            trend_decrease: Some(-20.0),
            seasonal_high_factor: 1.2,
            extreme_change: 100.0,
            extreme_sample: 3,
        }
    }

    fn investment_planning() -> Self {
        Self {
            trend_increase: 10.0,
            trend_decrease: None,
            ..Self::general_spending()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnabledAnalyzers {
    pub volatility: bool,
    pub trend: bool,
    pub seasonal: bool,
    pub extreme_change: bool,
}

impl EnabledAnalyzers {
    pub fn all() -> Self {
        Self {
            volatility: true,
            trend: true,
            seasonal: true,
            extreme_change: true,
        }
    }
}

/// Message templates. Placeholders in braces are substituted before an
/// insight is built: `{volatility}`, `{count}`, `{window}`, `{threshold}`,
/// `{months}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MessageTemplates {
    pub high_volatility: String,
    pub moderate_volatility: String,
    pub consistent_spending: String,
    pub rising_trend: String,
    pub falling_trend: String,
    pub seasonal_peaks: String,
    pub low_season: String,
    pub extreme_fluctuations: String,
    pub fallback: String,
}

impl MessageTemplates {
    fn general_spending() -> Self {
        Self {
            high_volatility: "Your spending is highly volatile ({volatility}% variation). \
                Consider creating a more consistent monthly budget."
                .to_string(),
            moderate_volatility: "Your spending shows moderate variation ({volatility}%). \
                Some months cost noticeably more than others."
                .to_string(),
            consistent_spending: "Your spending is very consistent ({volatility}% variation), \
                which makes your budget predictable."
                .to_string(),
            rising_trend: "Spending rose by more than {threshold}% in {count} of the last {window} months. \
                Review recent purchases to keep your budget on track."
                .to_string(),
            falling_trend: "Spending dropped by more than {threshold}% in {count} of the last {window} months. \
                Great job cutting back!"
                .to_string(),
            seasonal_peaks: "Your spending tends to peak in {months}. Plan ahead for these months."
                .to_string(),
            low_season: "You usually spend less in {months}. \
                These months are good opportunities to boost your savings."
                .to_string(),
            extreme_fluctuations: "{count} months show extreme spending changes of more than {threshold}%: {months}."
                .to_string(),
            fallback: "No notable spending patterns detected.".to_string(),
        }
    }

    fn investment_planning() -> Self {
        Self {
            high_volatility: "Your spending varies a lot ({volatility}% variation). \
                A steadier budget would make it easier to invest a fixed amount every month."
                .to_string(),
            moderate_volatility: "Your spending shows moderate variation ({volatility}%). \
                Keep a buffer before committing to larger investments."
                .to_string(),
            consistent_spending: "Your spending is consistent ({volatility}% variation), \
                an ideal base for automatic monthly investing."
                .to_string(),
            rising_trend: "Spending rose by more than {threshold}% in {count} of the last {window} months, \
                which may squeeze your investment contributions."
                .to_string(),
            falling_trend: "Spending dropped by more than {threshold}% in {count} of the last {window} months. \
                Consider investing the difference."
                .to_string(),
            seasonal_peaks: "Spending peaks in {months}. \
                Consider lowering investment contributions ahead of these months."
                .to_string(),
            low_season: "Spending is lower in {months}. \
                Use these months to make extra investment contributions."
                .to_string(),
            extreme_fluctuations: "{count} months show extreme spending changes of more than {threshold}%: {months}."
                .to_string(),
            fallback: "Your spending patterns look stable. \
                Keep up your regular investment plan."
                .to_string(),
        }
    }
}

/// A complete rule-set for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FramingConfig {
    pub framing: Framing,
    pub thresholds: Thresholds,
    pub analyzers: EnabledAnalyzers,
    pub templates: MessageTemplates,
    pub volatility_mid_band: VolatilityMidBand,
    pub seasonal_low_baseline: SeasonalLowBaseline,

    #[schemars(description = "Emit a general_analysis Info insight when nothing else fires")]
    pub fallback_on_empty: bool,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self::general_spending()
    }
}

impl FramingConfig {
    pub fn general_spending() -> Self {
        Self {
            framing: Framing::GeneralSpending,
            thresholds: Thresholds::general_spending(),
            analyzers: EnabledAnalyzers::all(),
            templates: MessageTemplates::general_spending(),
            volatility_mid_band: VolatilityMidBand::EmitInfo,
            seasonal_low_baseline: SeasonalLowBaseline::MeanFraction(0.8),
            fallback_on_empty: false,
        }
    }

    pub fn investment_planning() -> Self {
        Self {
            framing: Framing::InvestmentPlanning,
            thresholds: Thresholds::investment_planning(),
            analyzers: EnabledAnalyzers {
                extreme_change: false,
                ..EnabledAnalyzers::all()
            },
            templates: MessageTemplates::investment_planning(),
            volatility_mid_band: VolatilityMidBand::Silent,
            seasonal_low_baseline: SeasonalLowBaseline::MinimumMultiple(1.2),
            fallback_on_empty: true,
        }
    }

    pub fn for_framing(framing: Framing) -> Self {
        match framing {
            Framing::GeneralSpending => Self::general_spending(),
            Framing::InvestmentPlanning => Self::investment_planning(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn schema_as_json() -> Result<String> {
        let schema = schemars::schema_for!(FramingConfig);
        Ok(serde_json::to_string_pretty(&schema)?)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;

        let finite = [
            ("high_volatility", t.high_volatility),
            ("low_volatility", t.low_volatility),
            ("trend_increase", t.trend_increase),
            ("seasonal_high_factor", t.seasonal_high_factor),
            ("extreme_change", t.extreme_change),
            ("seasonal_low_baseline", self.seasonal_low_baseline.factor()),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(name, format!("must be a finite number (got {})", value)));
            }
        }

        if let Some(decrease) = t.trend_decrease {
            if !decrease.is_finite() {
                return Err(invalid(
                    "trend_decrease",
                    format!("must be a finite number (got {})", decrease),
                ));
            }
        }

        if t.low_volatility > t.high_volatility {
            return Err(invalid(
                "low_volatility",
                format!(
                    "{} is greater than high_volatility {}",
                    t.low_volatility, t.high_volatility
                ),
            ));
        }

        if t.trend_window == 0 {
            return Err(invalid("trend_window", "must be at least 1".to_string()));
        }

        if t.trend_min_months == 0 {
            return Err(invalid("trend_min_months", "must be at least 1".to_string()));
        }

        if t.seasonal_high_factor <= 0.0 {
            return Err(invalid(
                "seasonal_high_factor",
                format!("must be positive (got {})", t.seasonal_high_factor),
            ));
        }

        if self.seasonal_low_baseline.factor() <= 0.0 {
            return Err(invalid(
                "seasonal_low_baseline",
                format!(
                    "factor must be positive (got {})",
                    self.seasonal_low_baseline.factor()
                ),
            ));
        }

        if t.extreme_change < 0.0 {
            return Err(invalid(
                "extreme_change",
                format!("must be non-negative (got {})", t.extreme_change),
            ));
        }

        if t.extreme_sample == 0 {
            return Err(invalid("extreme_sample", "must be at least 1".to_string()));
        }

        Ok(())
    }
}

fn invalid(name: &str, details: String) -> InsightError {
    InsightError::InvalidThreshold {
        name: name.to_string(),
        details,
    }
}
