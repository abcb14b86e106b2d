use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::Deserialize;
use spending_pattern_insights::*;

fn change(period: &str, percent: f64) -> MonthlyChange {
    MonthlyChange::new(period, 1000.0, percent)
}

fn seasonal(entries: &[(&str, f64)]) -> SeasonalPatterns {
    entries
        .iter()
        .map(|(label, avg)| (label.to_string(), SeasonalBucket::single(*avg)))
        .collect()
}

fn random_patterns(rng: &mut StdRng) -> SpendingPatterns {
    let change_count = rng.gen_range(0..15);
    let monthly_changes = (0..change_count)
        .map(|i| {
            MonthlyChange::new(
                format!("Period {}", i),
                rng.gen_range(0.0..5000.0),
                rng.gen_range(-150.0..250.0),
            )
        })
        .collect();

    let months = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];
    let bucket_count = rng.gen_range(0..=12);
    let seasonal_patterns = months
        .iter()
        .take(bucket_count)
        .map(|m| (m.to_string(), SeasonalBucket::single(rng.gen_range(100.0..3000.0))))
        .collect();

    SpendingPatterns {
        monthly_changes,
        seasonal_patterns,
        volatility: VolatilityStats::new(rng.gen_range(0.0..1000.0), rng.gen_range(0.0..150.0)),
    }
}

#[test]
fn scenario_a_high_volatility_only() -> Result<()> {
    let patterns = SpendingPatterns {
        monthly_changes: vec![],
        seasonal_patterns: SeasonalPatterns::new(),
        volatility: VolatilityStats::new(400.0, 85.0),
    };

    let report = analyze_patterns(&patterns, Framing::GeneralSpending)?;
    assert_eq!(report.insights.len(), 1);
    assert_eq!(report.insights[0].severity, Severity::Warning);
    assert_eq!(
        report.insights[0].kind,
        InsightKind::HighVolatility { volatility: 85.0 }
    );
    assert_eq!(report.summary.warning_count, 1);
    assert_eq!(report.summary.total(), 1);
    Ok(())
}

#[test]
fn scenario_b_sustained_decreases() -> Result<()> {
    let patterns = SpendingPatterns {
        monthly_changes: vec![
            change("June 2024", -25.0),
            change("May 2024", -30.0),
            change("April 2024", -22.0),
            change("March 2024", 5.0),
            change("February 2024", 8.0),
        ],
        seasonal_patterns: SeasonalPatterns::new(),
        volatility: VolatilityStats::new(200.0, 50.0),
    };

    let report = analyze_patterns(&patterns, Framing::GeneralSpending)?;
    let positives: Vec<&Insight> = report
        .insights
        .iter()
        .filter(|i| i.severity == Severity::Positive)
        .collect();

    assert_eq!(positives.len(), 1);
    assert_eq!(
        positives[0].kind,
        InsightKind::SpendingDecreases {
            decreasing_months: 3
        }
    );
    assert!(report
        .insights
        .iter()
        .all(|i| i.type_tag() != "spending_increases"));
    Ok(())
}

#[test]
fn scenario_c_seasonal_peaks_and_savings() -> Result<()> {
    // mean of bucket averages = 700
    let patterns = SpendingPatterns {
        seasonal_patterns: seasonal(&[
            ("Jan", 1000.0),
            ("Jun", 500.0),
            ("Mar", 650.0),
            ("Sep", 650.0),
        ]),
        volatility: VolatilityStats::new(150.0, 40.0),
        ..Default::default()
    };

    let report = analyze_patterns(&patterns, Framing::GeneralSpending)?;

    let peaks = report
        .insights
        .iter()
        .find_map(|i| match &i.kind {
            InsightKind::SeasonalPeaks { peak_months } => Some(peak_months.clone()),
            _ => None,
        })
        .expect("seasonal peaks insight");
    assert_eq!(peaks, vec!["Jan"]);

    let savings = report
        .insights
        .iter()
        .find_map(|i| match &i.kind {
            InsightKind::SavingsOpportunities { opportunity_months } => {
                Some(opportunity_months.clone())
            }
            _ => None,
        })
        .expect("savings opportunities insight");
    assert_eq!(savings, vec!["Jun"]);
    Ok(())
}

#[test]
fn scenario_d_investment_fallback() -> Result<()> {
    let patterns = SpendingPatterns {
        monthly_changes: vec![change("June 2024", 5.0), change("May 2024", -40.0)],
        seasonal_patterns: SeasonalPatterns::new(),
        volatility: VolatilityStats::new(120.0, 55.0),
    };

    let report = analyze_patterns(&patterns, Framing::InvestmentPlanning)?;
    assert_eq!(report.insights.len(), 1);
    assert_eq!(report.insights[0].kind, InsightKind::GeneralAnalysis {});
    assert_eq!(report.insights[0].severity, Severity::Info);
    assert!(report.insights[0].message.contains("stable"));
    Ok(())
}

#[test]
fn volatility_bands_partition_the_line() {
    let config = FramingConfig::general_spending();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..2000 {
        let cv: f64 = rng.gen_range(0.0..200.0);
        let insight = classify_volatility(&VolatilityStats::new(1.0, cv), &config)
            .expect("general framing always classifies");

        let expected = if cv > 70.0 {
            Severity::Warning
        } else if cv < 30.0 {
            Severity::Positive
        } else {
            Severity::Info
        };
        assert_eq!(insight.severity, expected, "cv = {}", cv);
    }
}

#[test]
fn trend_scanner_ignores_entries_after_window() {
    let config = FramingConfig::general_spending();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..500 {
        let mut changes: Vec<MonthlyChange> = (0..3)
            .map(|i| change(&format!("P{}", i), rng.gen_range(-60.0..60.0)))
            .collect();
        let baseline = scan_trend(&changes, &config);

        for i in 0..rng.gen_range(1..10) {
            changes.push(change(&format!("Tail{}", i), rng.gen_range(-500.0..500.0)));
        }
        assert_eq!(scan_trend(&changes, &config), baseline);
    }
}

#[test]
fn seasonal_classification_respects_cuts() {
    let config = FramingConfig::general_spending();
    let mut rng = StdRng::seed_from_u64(23);

    for _ in 0..500 {
        let patterns = random_patterns(&mut rng);
        let buckets = &patterns.seasonal_patterns;
        let split = split_seasons(buckets, &config);

        if buckets.is_empty() {
            assert!(split.high.is_empty() && split.low.is_empty());
            assert!(analyze_seasons(buckets, &config).is_empty());
            continue;
        }

        let avg = buckets.values().map(|b| b.average_spending).sum::<f64>() / buckets.len() as f64;
        for key in &split.high {
            assert!(buckets[key].average_spending > avg * 1.2);
        }
        for key in &split.low {
            assert!(buckets[key].average_spending < avg * 0.8);
        }
        for insight in analyze_seasons(buckets, &config) {
            assert!(!insight.message.contains("NaN"));
        }
    }
}

#[test]
fn extreme_count_matches_cardinality() {
    let config = FramingConfig::general_spending();
    let mut rng = StdRng::seed_from_u64(31);

    for _ in 0..500 {
        let patterns = random_patterns(&mut rng);
        let changes = &patterns.monthly_changes;
        let expected: Vec<&str> = changes
            .iter()
            .filter(|c| c.change_percent.abs() > 100.0)
            .map(|c| c.period.as_str())
            .collect();

        match detect_extreme_changes(changes, &config) {
            None => assert!(expected.is_empty()),
            Some(insight) => {
                assert_eq!(
                    insight.kind,
                    InsightKind::ExtremeFluctuations {
                        extreme_months: expected.len()
                    }
                );
                let sample = expected.iter().take(3).copied().collect::<Vec<_>>().join(", ");
                assert!(insight.message.contains(&sample));
            }
        }
    }
}

#[test]
fn summary_matches_list_and_runs_are_idempotent() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..300 {
        let patterns = random_patterns(&mut rng);
        for framing in [Framing::GeneralSpending, Framing::InvestmentPlanning] {
            let engine = InsightEngine::for_framing(framing)?;
            let first = engine.analyze(&patterns);
            let second = engine.analyze(&patterns.clone());
            assert_eq!(first, second);

            let summary = first.summary;
            assert_eq!(summary.total(), first.insights.len());
            let count = |s: Severity| first.insights.iter().filter(|i| i.severity == s).count();
            assert_eq!(summary.warning_count, count(Severity::Warning));
            assert_eq!(summary.info_count, count(Severity::Info));
            assert_eq!(summary.positive_count, count(Severity::Positive));

            if framing == Framing::InvestmentPlanning {
                assert!(!first.insights.is_empty());
                assert!(first
                    .insights
                    .iter()
                    .all(|i| i.type_tag() != "extreme_fluctuations"));
            }
        }
    }
    Ok(())
}

#[test]
fn report_serializes_for_renderer() -> Result<()> {
    let patterns = SpendingPatterns {
        monthly_changes: vec![change("June 2024", 180.0)],
        volatility: VolatilityStats::new(400.0, 85.0),
        ..Default::default()
    };

    let report = analyze_patterns(&patterns, Framing::GeneralSpending)?;
    let value: serde_json::Value = serde_json::from_str(&report.to_json()?)?;

    assert_eq!(value["framing"], "general_spending");
    assert_eq!(value["insights"][0]["type"], "high_volatility");
    assert_eq!(value["insights"][0]["data"]["volatility"], 85.0);
    assert_eq!(value["insights"][1]["type"], "extreme_fluctuations");
    assert_eq!(value["insights"][1]["data"]["extreme_months"], 1);
    assert_eq!(value["summary"]["warning_count"], 2);

    let back: InsightReport = serde_json::from_value(value)?;
    assert_eq!(back, report);
    Ok(())
}

#[test]
fn custom_config_selects_policies() -> Result<()> {
    let mut config = FramingConfig::general_spending();
    config.seasonal_low_baseline = SeasonalLowBaseline::MinimumMultiple(1.2);
    config.volatility_mid_band = VolatilityMidBand::Silent;
    config.fallback_on_empty = true;
    config.templates.fallback = "Nothing to report.".to_string();

    let engine = InsightEngine::new(config)?;
    let report = engine.analyze(&SpendingPatterns {
        volatility: VolatilityStats::new(10.0, 50.0),
        ..Default::default()
    });

    assert_eq!(report.insights.len(), 1);
    assert_eq!(report.insights[0].message, "Nothing to report.");
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SpendingRow {
    month: String,
    total_minus_invest: f64,
}

const MONTHLY_CSV: &str = "\
month,total_minus_invest
2023-07,1850.00
2023-08,1920.00
2023-09,1610.00
2023-10,1700.00
2023-11,2450.00
2023-12,4100.00
2024-01,1500.00
2024-02,1380.00
2024-03,1650.00
2024-04,2100.00
2024-05,2600.00
2024-06,3300.00
";

fn load_csv(data: &str) -> Result<Vec<MonthlySpending>> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: SpendingRow = row?;
        records.push(MonthlySpending::from_label(&row.month, row.total_minus_invest)?);
    }
    Ok(records)
}

#[test]
fn csv_history_through_both_framings() -> Result<()> {
    let records = load_csv(MONTHLY_CSV)?;
    assert_eq!(records.len(), 12);

    let patterns = build_spending_patterns(&records)?;
    assert_eq!(patterns.monthly_changes.len(), 11);
    assert_eq!(patterns.monthly_changes[0].period, "June 2024");
    assert_eq!(patterns.seasonal_patterns.len(), 12);

    let general = analyze_patterns(&patterns, Framing::GeneralSpending)?;
    // June +26.9%, May +23.8%, April +27.3%
    assert!(general.insights.iter().any(|i| i.kind
        == InsightKind::SpendingIncreases {
            increasing_months: 3
        }));
    assert!(general
        .insights
        .iter()
        .any(|i| i.type_tag() == "seasonal_peaks"));
    // December was +67.3%, not extreme
    assert!(general
        .insights
        .iter()
        .all(|i| i.type_tag() != "extreme_fluctuations"));

    let investment = analyze_patterns(&patterns, Framing::InvestmentPlanning)?;
    assert!(investment.insights.iter().any(|i| i.kind
        == InsightKind::SpendingTrend {
            recent_increases: 3
        }));
    assert!(investment
        .insights
        .iter()
        .any(|i| i.type_tag() == "investment_opportunity"));
    Ok(())
}

#[test]
fn synthetic_steady_history_is_consistent() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(99);
    let noise = Normal::new(0.0, 20.0)?;

    let records: Vec<MonthlySpending> = (0..24)
        .map(|i| {
            let label = format!("{}-{:02}", 2022 + i / 12, i % 12 + 1);
            MonthlySpending::from_label(&label, 2000.0 + noise.sample(&mut rng))
        })
        .collect::<spending_pattern_insights::Result<_>>()?;

    let report = analyze_monthly_spending(&records, Framing::GeneralSpending)?;
    assert_eq!(report.insights.len(), 1);
    assert_eq!(report.insights[0].type_tag(), "consistent_spending");
    Ok(())
}
