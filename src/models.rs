use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: String,
    pub created_at: NaiveDate,
    pub resolved_at: Option<NaiveDate>,
    pub resolution_status: String,
}

/// Distinct ticket counts per ISO week number, one map per direction.
#[derive(Debug, Clone, Default)]
pub struct WeekSeries {
    pub created: BTreeMap<u32, usize>,
    pub resolved: BTreeMap<u32, usize>,
}

impl WeekSeries {
    /// Created count for a week, zero when the week saw no creations.
    pub fn created_in(&self, week: u32) -> usize {
        self.created.get(&week).copied().unwrap_or(0)
    }

    pub fn resolved_in(&self, week: u32) -> usize {
        self.resolved.get(&week).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyRow {
    pub week: u32,
    pub created: usize,
    pub resolved: usize,
    pub closure_ratio: f64,
    pub rolling_4_week_ratio: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "weeks", rename_all = "snake_case")]
pub enum BacklogProjection {
    /// More tickets resolved than created overall.
    AlreadyClear,
    /// Creation outpaces resolution on average.
    Unbounded,
    Weeks(f64),
    /// Equal average rates with a non-negative backlog. Reported as zero weeks.
    Stalled,
}

impl BacklogProjection {
    pub fn weeks(&self) -> f64 {
        match self {
            BacklogProjection::AlreadyClear | BacklogProjection::Stalled => 0.0,
            BacklogProjection::Unbounded => f64::INFINITY,
            BacklogProjection::Weeks(weeks) => *weeks,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Growing,
    Steady,
    Shrinking,
}

impl Verdict {
    pub fn classify(avg_closure_ratio: f64) -> Self {
        if avg_closure_ratio < 1.0 {
            Verdict::Growing
        } else if avg_closure_ratio == 1.0 {
            Verdict::Steady
        } else {
            Verdict::Shrinking
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Growing => "Ticket closure rate is below creation rate, backlog is growing",
            Verdict::Steady => "Ticket closure rate matches creation rate, backlog will not change",
            Verdict::Shrinking => {
                "Ticket closure rate is higher than creation rate, backlog will shrink"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_created: usize,
    pub total_resolved: usize,
    pub backlog: i64,
    pub avg_created_per_week: f64,
    pub avg_resolved_per_week: f64,
    pub avg_closure_ratio: f64,
    pub weeks_to_clear_backlog: BacklogProjection,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThroughputReport {
    pub rows: Vec<WeeklyRow>,
    pub summary: Summary,
}
