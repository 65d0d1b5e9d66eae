use clap::ValueEnum;

use crate::models::Ticket;

/// Decides which resolution statuses count as done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPolicy {
    /// Resolved unless the status is one of the open statuses.
    Exclude { open: Vec<String> },
    /// Resolved only when the status is one of the closed statuses.
    Include { closed: Vec<String> },
}

impl ResolvedPolicy {
    pub fn is_resolved(&self, ticket: &Ticket) -> bool {
        let status = ticket.resolution_status.trim();
        match self {
            ResolvedPolicy::Exclude { open } => !open.iter().any(|s| s.trim() == status),
            ResolvedPolicy::Include { closed } => closed.iter().any(|s| s.trim() == status),
        }
    }
}

impl Default for ResolvedPolicy {
    fn default() -> Self {
        ResolvedPolicy::Exclude {
            open: vec!["Unresolved".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportProfile {
    /// Weekly rows with the 4-week block average, plus the backlog verdict
    Rolling,
    /// Weekly rows and summary only
    Basic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub policy: ResolvedPolicy,
    pub include_rolling_average: bool,
    pub include_verdict: bool,
}

impl ReportConfig {
    pub fn for_profile(profile: ReportProfile, policy: ResolvedPolicy) -> Self {
        let full = profile == ReportProfile::Rolling;
        Self {
            policy,
            include_rolling_average: full,
            include_verdict: full,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::for_profile(ReportProfile::Rolling, ResolvedPolicy::default())
    }
}

/// Header names of the CSV columns the loader reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub id: String,
    pub created: String,
    pub resolved: String,
    pub status: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            id: "Issue id".to_string(),
            created: "Created".to_string(),
            resolved: "Resolved".to_string(),
            status: "Resolution".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ticket_with_status(status: &str) -> Ticket {
        Ticket {
            id: "OPS-1".to_string(),
            created_at: NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(),
            resolved_at: None,
            resolution_status: status.to_string(),
        }
    }

    #[test]
    fn exclusion_policy_treats_everything_but_open_as_resolved() {
        let policy = ResolvedPolicy::default();
        assert!(!policy.is_resolved(&ticket_with_status("Unresolved")));
        assert!(policy.is_resolved(&ticket_with_status("Done")));
        assert!(policy.is_resolved(&ticket_with_status("Won't Fix")));
    }

    #[test]
    fn inclusion_policy_only_counts_listed_statuses() {
        let policy = ResolvedPolicy::Include {
            closed: vec![
                "Closed".to_string(),
                "Declined".to_string(),
                "Awaiting Customer Verification".to_string(),
            ],
        };
        assert!(policy.is_resolved(&ticket_with_status("Declined")));
        assert!(policy.is_resolved(&ticket_with_status(" Closed ")));
        assert!(!policy.is_resolved(&ticket_with_status("In Progress")));
        assert!(!policy.is_resolved(&ticket_with_status("Unresolved")));
    }

    #[test]
    fn basic_profile_drops_rolling_column_and_verdict() {
        let config = ReportConfig::for_profile(ReportProfile::Basic, ResolvedPolicy::default());
        assert!(!config.include_rolling_average);
        assert!(!config.include_verdict);
        assert!(ReportConfig::default().include_rolling_average);
    }
}
