use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::config::{ReportConfig, ResolvedPolicy};
use crate::error::StatsError;
use crate::models::{
    BacklogProjection, Summary, ThroughputReport, Ticket, Verdict, WeekSeries, WeeklyRow,
};

const ROLLING_BLOCK: u32 = 4;

pub fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Two-place rounding with exact ties going to the even neighbour, so 0.125
/// becomes 0.12 and 0.625 becomes 0.62.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Counts distinct ticket ids created per ISO week, and distinct resolved ids
/// per ISO week of resolution. Weeks without activity are absent, not zero.
pub fn bucket_weeks(tickets: &[Ticket], policy: &ResolvedPolicy) -> WeekSeries {
    let mut created: BTreeMap<u32, HashSet<&str>> = BTreeMap::new();
    let mut resolved: BTreeMap<u32, HashSet<&str>> = BTreeMap::new();

    for ticket in tickets {
        created
            .entry(iso_week(ticket.created_at))
            .or_default()
            .insert(ticket.id.as_str());

        if !policy.is_resolved(ticket) {
            continue;
        }
        if let Some(resolved_at) = ticket.resolved_at {
            resolved
                .entry(iso_week(resolved_at))
                .or_default()
                .insert(ticket.id.as_str());
        }
    }

    let series = WeekSeries {
        created: created.into_iter().map(|(w, ids)| (w, ids.len())).collect(),
        resolved: resolved.into_iter().map(|(w, ids)| (w, ids.len())).collect(),
    };
    debug!("created per week: {:?}", series.created);
    debug!("resolved per week: {:?}", series.resolved);
    series
}

pub fn closure_ratio(created: usize, resolved: usize) -> f64 {
    if created == 0 {
        0.0
    } else {
        round2(resolved as f64 / created as f64)
    }
}

/// Block average of closure ratios, emitted on weeks divisible by four.
///
/// This is a fixed-modulo block and not a sliding window: the sum restarts
/// from zero after every emission, and a run that starts mid-block still
/// divides by four.
#[derive(Debug, Default)]
pub struct RollingWindow {
    sum: f64,
}

impl RollingWindow {
    pub fn push(&mut self, week: u32, ratio: f64) -> Option<f64> {
        self.sum += ratio;
        if week % ROLLING_BLOCK == 0 {
            let average = self.sum / ROLLING_BLOCK as f64;
            self.sum = 0.0;
            Some(average)
        } else {
            None
        }
    }
}

/// One row per week present in the resolved series, ascending. Weeks that
/// only saw creations produce no row.
pub fn weekly_rows(series: &WeekSeries, config: &ReportConfig) -> Vec<WeeklyRow> {
    let mut window = RollingWindow::default();

    series
        .resolved
        .keys()
        .map(|&week| {
            let created = series.created_in(week);
            let resolved = series.resolved_in(week);
            let ratio = closure_ratio(created, resolved);
            let rolling = window.push(week, ratio);

            WeeklyRow {
                week,
                created,
                resolved,
                closure_ratio: ratio,
                rolling_4_week_ratio: if config.include_rolling_average {
                    rolling
                } else {
                    None
                },
            }
        })
        .collect()
}

/// Evaluated in order: negative backlog, growing, shrinking, then equal rates.
pub fn project_backlog(backlog: i64, avg_created: f64, avg_resolved: f64) -> BacklogProjection {
    if backlog < 0 {
        BacklogProjection::AlreadyClear
    } else if avg_created > avg_resolved {
        BacklogProjection::Unbounded
    } else if avg_created < avg_resolved {
        BacklogProjection::Weeks(round2(backlog as f64 / (avg_resolved - avg_created)))
    } else {
        BacklogProjection::Stalled
    }
}

pub fn summarize(rows: &[WeeklyRow]) -> Result<Summary, StatsError> {
    if rows.is_empty() {
        return Err(StatsError::NoWeeks);
    }

    let total_created: usize = rows.iter().map(|row| row.created).sum();
    let total_resolved: usize = rows.iter().map(|row| row.resolved).sum();
    if total_created == 0 {
        return Err(StatsError::NothingCreated);
    }

    let weeks = rows.len() as f64;
    let backlog = total_created as i64 - total_resolved as i64;
    let avg_created = round2(total_created as f64 / weeks);
    let avg_resolved = round2(total_resolved as f64 / weeks);
    let avg_closure_ratio = round2(total_resolved as f64 / total_created as f64);

    Ok(Summary {
        total_created,
        total_resolved,
        backlog,
        avg_created_per_week: avg_created,
        avg_resolved_per_week: avg_resolved,
        avg_closure_ratio,
        weeks_to_clear_backlog: project_backlog(backlog, avg_created, avg_resolved),
        verdict: Verdict::classify(avg_closure_ratio),
    })
}

pub fn analyze(tickets: &[Ticket], config: &ReportConfig) -> Result<ThroughputReport, StatsError> {
    let series = bucket_weeks(tickets, &config.policy);
    let rows = weekly_rows(&series, config);
    let summary = summarize(&rows)?;
    debug!(
        "{} tickets over {} reported weeks, backlog {}",
        tickets.len(),
        rows.len(),
        summary.backlog
    );
    Ok(ThroughputReport { rows, summary })
}
