use crate::error::{InsightError, Result};
use chrono::{Datelike, NaiveDate};

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// "January 2024"
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// "January"
pub fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

/// Parses a month label in the format "YYYY-MM" or "January 2024".
/// Returns the first day of that month.
pub fn parse_month_label(label: &str) -> Result<NaiveDate> {
    let label = label.trim();

    let iso = format!("{}-01", label);
    if let Ok(date) = NaiveDate::parse_from_str(&iso, "%Y-%m-%d") {
        return Ok(date);
    }

    let long = format!("01 {}", label);
    if let Ok(date) = NaiveDate::parse_from_str(&long, "%d %B %Y") {
        return Ok(date);
    }

    Err(InsightError::InvalidMonth(format!(
        "{}. Expected 'YYYY-MM' or 'Month YYYY'",
        label
    )))
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Formats a number for a message: one decimal place, trailing ".0" dropped.
pub fn format_number(value: f64) -> String {
    let rounded = round_to(value, 1);
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

pub fn join_labels(labels: &[String]) -> String {
    labels.join(", ")
}

/// Substitutes `{name}` placeholders. Unknown placeholders are left as-is.
pub fn render_template(template: &str, values: &[(&str, String)]) -> String {
    let mut rendered = template.to_string();
    for (name, value) in values {
        rendered = rendered.replace(&format!("{{{}}}", name), value);
    }
    rendered
}
