use std::fmt::Write;

use crate::config::ReportConfig;
use crate::models::{BacklogProjection, ThroughputReport};

/// Shortest round-trip form, keeping a trailing `.0` on whole numbers.
fn decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn projection_label(projection: &BacklogProjection) -> String {
    match projection {
        BacklogProjection::AlreadyClear | BacklogProjection::Stalled => "0".to_string(),
        BacklogProjection::Unbounded => "inf".to_string(),
        BacklogProjection::Weeks(weeks) => decimal(*weeks),
    }
}

fn ratio_label(created: usize, ratio: f64) -> String {
    if created == 0 {
        "0".to_string()
    } else {
        decimal(ratio)
    }
}

pub fn render_text(report: &ThroughputReport, config: &ReportConfig) -> String {
    let mut output = String::new();
    let summary = &report.summary;

    let _ = writeln!(output, "==================");
    if config.include_rolling_average {
        let _ = writeln!(output, "Week\tNew\tClose\tRoC\t4-Week RoC");
    } else {
        let _ = writeln!(output, "Week\tNew\tClose\tRoC");
    }

    for row in &report.rows {
        let _ = write!(
            output,
            "{}\t{}\t{}\t{}",
            row.week,
            row.created,
            row.resolved,
            ratio_label(row.created, row.closure_ratio)
        );
        if config.include_rolling_average {
            match row.rolling_4_week_ratio {
                Some(rolling) => {
                    let _ = write!(output, "\t{}", decimal(rolling));
                }
                None => {
                    let _ = write!(output, "\t-");
                }
            }
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "-----------------------");
    let _ = writeln!(output, "Total Created: {}", summary.total_created);
    let _ = writeln!(output, "Total Resolved: {}", summary.total_resolved);
    let _ = writeln!(
        output,
        "Average Rate of Closure: {}",
        decimal(summary.avg_closure_ratio)
    );
    if config.include_verdict {
        let _ = writeln!(output, "{}", summary.verdict.message());
    }
    let _ = writeln!(
        output,
        "Average Items Closed per Week: {}",
        decimal(summary.avg_resolved_per_week)
    );
    let _ = writeln!(
        output,
        "Average Items Created per Week: {}",
        decimal(summary.avg_created_per_week)
    );
    let _ = writeln!(
        output,
        "Weeks to close backlog of {} items is {} weeks",
        summary.backlog,
        projection_label(&summary.weeks_to_clear_backlog)
    );

    output
}

pub fn render_json(report: &ThroughputReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReportProfile, ResolvedPolicy};
    use crate::models::{Summary, Verdict, WeeklyRow};

    fn sample_report() -> ThroughputReport {
        ThroughputReport {
            rows: vec![
                WeeklyRow {
                    week: 3,
                    created: 4,
                    resolved: 2,
                    closure_ratio: 0.5,
                    rolling_4_week_ratio: None,
                },
                WeeklyRow {
                    week: 4,
                    created: 2,
                    resolved: 2,
                    closure_ratio: 1.0,
                    rolling_4_week_ratio: Some(0.75),
                },
            ],
            summary: Summary {
                total_created: 6,
                total_resolved: 4,
                backlog: 2,
                avg_created_per_week: 3.0,
                avg_resolved_per_week: 2.0,
                avg_closure_ratio: 0.67,
                weeks_to_clear_backlog: BacklogProjection::Unbounded,
                verdict: Verdict::Growing,
            },
        }
    }

    #[test]
    fn rolling_profile_renders_block_average_and_verdict() {
        let text = render_text(&sample_report(), &ReportConfig::default());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "Week\tNew\tClose\tRoC\t4-Week RoC");
        assert_eq!(lines[2], "3\t4\t2\t0.5\t-");
        assert_eq!(lines[3], "4\t2\t2\t1.0\t0.75");
        assert!(text.contains("backlog is growing"));
        assert!(text.ends_with("Weeks to close backlog of 2 items is inf weeks\n"));
    }

    #[test]
    fn basic_profile_omits_rolling_column_and_verdict() {
        let config = ReportConfig::for_profile(ReportProfile::Basic, ResolvedPolicy::default());
        let text = render_text(&sample_report(), &config);

        assert!(text.contains("Week\tNew\tClose\tRoC\n"));
        assert!(text.contains("4\t2\t2\t1.0\n"));
        assert!(!text.contains("backlog is growing"));
        assert_eq!(text.lines().count(), 11);
    }

    #[test]
    fn finite_projection_prints_weeks() {
        let mut report = sample_report();
        report.summary.weeks_to_clear_backlog = BacklogProjection::Weeks(2.5);
        let text = render_text(&report, &ReportConfig::default());
        assert!(text.contains("Weeks to close backlog of 2 items is 2.5 weeks"));
    }

    #[test]
    fn rolling_value_prints_unrounded() {
        let mut report = sample_report();
        report.rows[1].rolling_4_week_ratio = Some(0.3325);
        let text = render_text(&report, &ReportConfig::default());
        assert!(text.contains("4\t2\t2\t1.0\t0.3325\n"));
    }

    #[test]
    fn whole_numbers_keep_a_decimal_point() {
        let mut report = sample_report();
        report.rows[0].created = 0;
        report.rows[0].closure_ratio = 0.0;
        report.summary.weeks_to_clear_backlog = BacklogProjection::Weeks(5.0);
        let text = render_text(&report, &ReportConfig::default());

        assert!(text.contains("3\t0\t2\t0\t-\n"));
        assert!(text.contains("Average Rate of Closure: 0.67\n"));
        assert!(text.contains("Average Items Closed per Week: 2.0\n"));
        assert!(text.contains("Average Items Created per Week: 3.0\n"));
        assert!(text.contains("Weeks to close backlog of 2 items is 5.0 weeks"));
    }

    #[test]
    fn zero_week_projections_print_plain_zero() {
        let mut report = sample_report();
        report.summary.weeks_to_clear_backlog = BacklogProjection::Stalled;
        let text = render_text(&report, &ReportConfig::default());
        assert!(text.ends_with("is 0 weeks\n"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let report = sample_report();
        let config = ReportConfig::default();
        assert_eq!(render_text(&report, &config), render_text(&report, &config));
    }

    #[test]
    fn json_tags_projection_kind() {
        let json = render_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["weeks_to_clear_backlog"]["kind"], "unbounded");
        assert_eq!(value["summary"]["verdict"], "growing");
        assert_eq!(value["rows"][0]["rolling_4_week_ratio"], serde_json::Value::Null);
    }
}
