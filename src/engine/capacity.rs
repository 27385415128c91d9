//! Team capacity checks.
//!
//! A team may only have a bounded fraction of its members simultaneously on
//! pending/approved leave for overlapping dates. The ceiling is inclusive:
//! landing exactly on it does not violate the rule.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::team::Team;

/// Inclusive date-range overlap.
pub fn overlaps(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// Distinct team members holding a pending or approved request overlapping
/// `[start, end]`. The candidate employee, when given, is excluded so a
/// request never trips over itself on a re-check.
pub fn overlapping_members<'a>(
    requests: impl Iterator<Item = &'a LeaveRequest>,
    team: &Team,
    exclude_employee: Option<u64>,
    start: NaiveDate,
    end: NaiveDate,
) -> usize {
    let mut on_leave = HashSet::new();
    for request in requests {
        if Some(request.employee_id) == exclude_employee {
            continue;
        }
        if !matches!(request.status, LeaveStatus::Pending | LeaveStatus::Approved) {
            continue;
        }
        if !team.members.contains(&request.employee_id) {
            continue;
        }
        if overlaps(request.start_date, request.end_date, start, end) {
            on_leave.insert(request.employee_id);
        }
    }
    on_leave.len()
}

/// Whether admitting one more member on leave would push the team past the
/// ceiling. The candidate joins the count; ties at the ceiling pass.
pub fn would_exceed_capacity(team_size: usize, members_on_leave: usize, ceiling: f64) -> bool {
    if team_size == 0 {
        return false;
    }
    (members_on_leave as f64 + 1.0) / team_size as f64 > ceiling
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CapacityPreview {
    #[schema(example = 10)]
    pub team_id: u64,
    #[schema(example = 4)]
    pub team_size: usize,
    /// Members already on pending/approved leave in the window.
    #[schema(example = 1)]
    pub members_on_leave: usize,
    #[schema(example = 0.25)]
    pub fraction_on_leave: f64,
    #[schema(example = 0.49)]
    pub ceiling: f64,
    /// Whether one further submission in this window would be rejected.
    pub next_request_would_exceed: bool,
}

impl CapacityPreview {
    pub fn compute(team_id: u64, team_size: usize, members_on_leave: usize, ceiling: f64) -> Self {
        let fraction_on_leave = if team_size == 0 {
            0.0
        } else {
            members_on_leave as f64 / team_size as f64
        };
        CapacityPreview {
            team_id,
            team_size,
            members_on_leave,
            fraction_on_leave,
            ceiling,
            next_request_would_exceed: would_exceed_capacity(team_size, members_on_leave, ceiling),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ranges_overlap_inclusively() {
        assert!(overlaps(
            date(2026, 3, 2),
            date(2026, 3, 4),
            date(2026, 3, 4),
            date(2026, 3, 8)
        ));
        assert!(!overlaps(
            date(2026, 3, 2),
            date(2026, 3, 3),
            date(2026, 3, 4),
            date(2026, 3, 8)
        ));
    }

    #[test]
    fn candidate_alone_in_a_small_team_exceeds() {
        // Team of two, nobody else out: 1/2 = 0.5 > 0.49.
        assert!(would_exceed_capacity(2, 0, 0.49));
    }

    #[test]
    fn candidate_in_a_large_team_passes() {
        // 1/4 = 0.25 <= 0.49.
        assert!(!would_exceed_capacity(4, 0, 0.49));
        // Second member out: 2/4 = 0.5 > 0.49.
        assert!(would_exceed_capacity(4, 1, 0.49));
    }

    #[test]
    fn tie_at_the_ceiling_does_not_exceed() {
        // 1/2 = 0.5 against a 0.5 ceiling is compliant.
        assert!(!would_exceed_capacity(2, 0, 0.5));
    }

    #[test]
    fn empty_team_never_exceeds() {
        assert!(!would_exceed_capacity(0, 0, 0.49));
    }

    #[test]
    fn preview_reports_the_current_fraction() {
        let preview = CapacityPreview::compute(10, 4, 1, 0.49);
        assert_eq!(preview.fraction_on_leave, 0.25);
        assert!(preview.next_request_would_exceed);
    }
}
