//! Multi-rule request validation.
//!
//! Every rule runs; nothing short-circuits. A rejected submission carries
//! the complete violation list so the form layer can present all problems
//! at once instead of one resubmission at a time. Validation is read-only:
//! no reservation happens until the lifecycle accepts the candidate.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use strum_macros::Display as StrumDisplay;
use utoipa::ToSchema;

use crate::engine::calendar::WorkweekPolicy;
use crate::engine::capacity::would_exceed_capacity;
use crate::engine::ledger::Balance;
use crate::engine::period::Period;
use crate::model::leave_request::{LeaveCategory, LeaveDraft};
use crate::model::team::Team;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, StrumDisplay, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RuleCode {
    DateOrder,
    NoWorkingDays,
    SpanTooLong,
    SameDayStart,
    HalfDayConsistency,
    InsufficientBalance,
    WeekendQuotaExhausted,
    DocumentRequired,
    TeamOverCapacity,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Violation {
    pub rule: RuleCode,
    #[schema(example = "end_date cannot be before start_date")]
    pub message: String,
}

impl Violation {
    fn new(rule: RuleCode, message: impl Into<String>) -> Self {
        Violation {
            rule,
            message: message.into(),
        }
    }

    /// Used by the lifecycle when an atomic reservation loses a race the
    /// read-only validation pass could not see.
    pub fn insufficient_balance(requested: f64, remaining: f64) -> Self {
        Violation::new(
            RuleCode::InsufficientBalance,
            format!("insufficient balance: requested {requested} with {remaining} remaining"),
        )
    }

    pub fn weekend_quota_exhausted(cap: u32) -> Self {
        Violation::new(
            RuleCode::WeekendQuotaExhausted,
            format!("weekend leave quota of {cap} per half-year is exhausted"),
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule, self.message)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RuleLimits {
    pub max_consecutive_days: u32,
    pub weekend_cap: u32,
    pub team_capacity_ceiling: f64,
}

impl Default for RuleLimits {
    fn default() -> Self {
        RuleLimits {
            max_consecutive_days: 5,
            weekend_cap: 2,
            team_capacity_ceiling: 0.49,
        }
    }
}

/// Snapshot of the ledger/team state a candidate is judged against.
pub struct ValidationContext<'a> {
    pub today: NaiveDate,
    pub workweek: WorkweekPolicy,
    pub limits: RuleLimits,
    /// Balance of the ledger entry this request would debit.
    pub balance: Balance,
    pub weekend_used: u32,
    pub team: Option<&'a Team>,
    /// Distinct teammates already on overlapping pending/approved leave.
    pub members_on_leave: usize,
}

/// Attributes derived while validating; stored on the request on acceptance.
#[derive(Debug, Clone, Copy)]
pub struct Derived {
    pub total_days: f64,
    pub is_weekend_leave: bool,
    pub period: Period,
    pub category: LeaveCategory,
    pub requires_admin_review: bool,
    pub team_conflict_check: bool,
}

pub struct ValidationReport {
    pub violations: Vec<Violation>,
    pub derived: Derived,
}

impl ValidationReport {
    pub fn accepted(&self) -> bool {
        self.violations.is_empty()
    }
}

pub fn validate(draft: &LeaveDraft, ctx: &ValidationContext<'_>) -> ValidationReport {
    let policy = draft.leave_type.policy();
    let period = Period::of(draft.start_date);
    let total_days = if draft.half_day {
        0.5
    } else {
        ctx.workweek
            .working_days_between(draft.start_date, draft.end_date) as f64
    };
    let is_weekend_leave = ctx
        .workweek
        .touches_weekend_boundary(draft.start_date, draft.end_date);

    let mut violations = Vec::new();

    if draft.end_date < draft.start_date {
        violations.push(Violation::new(
            RuleCode::DateOrder,
            "end_date cannot be before start_date",
        ));
    }

    if !draft.half_day && total_days == 0.0 {
        violations.push(Violation::new(
            RuleCode::NoWorkingDays,
            "the requested range contains no working days",
        ));
    }

    if !draft.half_day && total_days > ctx.limits.max_consecutive_days as f64 {
        violations.push(Violation::new(
            RuleCode::SpanTooLong,
            format!(
                "{} working days exceed the limit of {} consecutive days",
                total_days, ctx.limits.max_consecutive_days
            ),
        ));
    }

    if !draft.half_day && draft.start_date == ctx.today {
        violations.push(Violation::new(
            RuleCode::SameDayStart,
            "full-day leave cannot start on the day of submission",
        ));
    }

    if draft.half_day {
        if draft.start_date != draft.end_date {
            violations.push(Violation::new(
                RuleCode::HalfDayConsistency,
                "a half-day request must start and end on the same day",
            ));
        } else if draft.half_day_period.is_none() {
            violations.push(Violation::new(
                RuleCode::HalfDayConsistency,
                "a half-day request must name first_half or second_half",
            ));
        }
    }

    if ctx.balance.remaining < total_days {
        violations.push(Violation::insufficient_balance(
            total_days,
            ctx.balance.remaining,
        ));
    }

    if is_weekend_leave && ctx.weekend_used >= ctx.limits.weekend_cap {
        violations.push(Violation::weekend_quota_exhausted(ctx.limits.weekend_cap));
    }

    if policy.requires_document && draft.document_ref.is_none() {
        violations.push(Violation::new(
            RuleCode::DocumentRequired,
            format!(
                "{} requires a supporting document",
                policy.label
            ),
        ));
    }

    let mut team_conflict_check = true;
    if let Some(team) = ctx.team {
        if would_exceed_capacity(
            team.members.len(),
            ctx.members_on_leave,
            ctx.limits.team_capacity_ceiling,
        ) {
            team_conflict_check = false;
            violations.push(Violation::new(
                RuleCode::TeamOverCapacity,
                format!(
                    "{} of {} team members would be on leave, over the {:.0}% ceiling",
                    ctx.members_on_leave + 1,
                    team.members.len(),
                    ctx.limits.team_capacity_ceiling * 100.0
                ),
            ));
        }
    }

    // Mandatory-approval types are not a rule failure; the lifecycle reads
    // the routing flag off the derived attributes.
    let derived = Derived {
        total_days,
        is_weekend_leave,
        period,
        category: if policy.requires_admin_approval {
            LeaveCategory::Special
        } else {
            LeaveCategory::Standard
        },
        requires_admin_review: policy.requires_admin_approval,
        team_conflict_check,
    };

    ValidationReport {
        violations,
        derived,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::HalfDayPeriod;
    use crate::model::leave_type::LeaveType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(leave_type: LeaveType, start: NaiveDate, end: NaiveDate) -> LeaveDraft {
        LeaveDraft {
            employee_id: 1000,
            leave_type,
            start_date: start,
            end_date: end,
            half_day: false,
            half_day_period: None,
            reason: "test".into(),
            emergency_contact_name: None,
            emergency_contact_phone: None,
            document_ref: None,
        }
    }

    fn ctx<'a>() -> ValidationContext<'a> {
        ValidationContext {
            today: date(2026, 2, 20),
            workweek: WorkweekPolicy::FriSat,
            limits: RuleLimits::default(),
            balance: Balance {
                allocated: 12.0,
                used: 0.0,
                remaining: 12.0,
            },
            weekend_used: 0,
            team: None,
            members_on_leave: 0,
        }
    }

    fn rules(report: &ValidationReport) -> Vec<RuleCode> {
        report.violations.iter().map(|v| v.rule).collect()
    }

    #[test]
    fn clean_vacation_request_is_accepted() {
        // Mon 2026-03-02 through Wed 2026-03-04
        let report = validate(
            &draft(LeaveType::Vacation, date(2026, 3, 2), date(2026, 3, 4)),
            &ctx(),
        );
        assert!(report.accepted());
        assert_eq!(report.derived.total_days, 3.0);
        assert!(!report.derived.is_weekend_leave);
        assert_eq!(report.derived.category, LeaveCategory::Standard);
    }

    #[test]
    fn reversed_dates_report_order_and_empty_range() {
        let report = validate(
            &draft(LeaveType::Vacation, date(2026, 3, 4), date(2026, 3, 2)),
            &ctx(),
        );
        let rules = rules(&report);
        assert!(rules.contains(&RuleCode::DateOrder));
        assert!(rules.contains(&RuleCode::NoWorkingDays));
    }

    #[test]
    fn single_non_working_day_is_rejected_not_zeroed_silently() {
        // 2026-03-06 is a Friday, non-working under FriSat.
        let report = validate(
            &draft(LeaveType::Vacation, date(2026, 3, 6), date(2026, 3, 6)),
            &ctx(),
        );
        assert!(rules(&report).contains(&RuleCode::NoWorkingDays));
        assert_eq!(report.derived.total_days, 0.0);
    }

    #[test]
    fn span_over_the_ceiling_is_rejected() {
        // Sun 2026-03-01 through Tue 2026-03-10 = 7 working days under FriSat.
        let report = validate(
            &draft(LeaveType::Vacation, date(2026, 3, 1), date(2026, 3, 10)),
            &ctx(),
        );
        assert!(rules(&report).contains(&RuleCode::SpanTooLong));
    }

    #[test]
    fn full_day_leave_cannot_start_today() {
        let report = validate(
            &draft(LeaveType::Vacation, date(2026, 2, 20), date(2026, 2, 23)),
            &ctx(),
        );
        assert!(rules(&report).contains(&RuleCode::SameDayStart));
    }

    #[test]
    fn half_day_starting_today_is_allowed() {
        let mut d = draft(LeaveType::Vacation, date(2026, 2, 20), date(2026, 2, 20));
        d.half_day = true;
        d.half_day_period = Some(HalfDayPeriod::FirstHalf);
        let report = validate(&d, &ctx());
        assert!(report.accepted());
        assert_eq!(report.derived.total_days, 0.5);
    }

    #[test]
    fn half_day_is_exactly_half_even_on_a_non_working_day() {
        // Friday under FriSat policy.
        let mut d = draft(LeaveType::Vacation, date(2026, 3, 6), date(2026, 3, 6));
        d.half_day = true;
        d.half_day_period = Some(HalfDayPeriod::SecondHalf);
        let report = validate(&d, &ctx());
        assert_eq!(report.derived.total_days, 0.5);
        assert!(!rules(&report).contains(&RuleCode::NoWorkingDays));
    }

    #[test]
    fn multi_day_half_day_is_inconsistent() {
        let mut d = draft(LeaveType::Vacation, date(2026, 3, 2), date(2026, 3, 3));
        d.half_day = true;
        d.half_day_period = Some(HalfDayPeriod::FirstHalf);
        let report = validate(&d, &ctx());
        assert!(rules(&report).contains(&RuleCode::HalfDayConsistency));
    }

    #[test]
    fn half_day_without_a_period_is_inconsistent() {
        let mut d = draft(LeaveType::Vacation, date(2026, 3, 2), date(2026, 3, 2));
        d.half_day = true;
        let report = validate(&d, &ctx());
        assert!(rules(&report).contains(&RuleCode::HalfDayConsistency));
    }

    #[test]
    fn shortfall_reports_insufficient_balance() {
        let mut context = ctx();
        context.balance.used = 10.0;
        context.balance.remaining = 2.0;
        let report = validate(
            &draft(LeaveType::Vacation, date(2026, 3, 2), date(2026, 3, 4)),
            &context,
        );
        assert!(rules(&report).contains(&RuleCode::InsufficientBalance));
    }

    #[test]
    fn sick_leave_without_document_is_rejected_even_when_all_else_passes() {
        let report = validate(
            &draft(LeaveType::Sick, date(2026, 3, 2), date(2026, 3, 3)),
            &ctx(),
        );
        assert_eq!(rules(&report), vec![RuleCode::DocumentRequired]);
        assert_eq!(report.derived.category, LeaveCategory::Special);
        assert!(report.derived.requires_admin_review);
    }

    #[test]
    fn attached_document_satisfies_the_requirement() {
        let mut d = draft(LeaveType::Sick, date(2026, 3, 2), date(2026, 3, 3));
        d.document_ref = Some("doc-123".into());
        let report = validate(&d, &ctx());
        assert!(report.accepted());
    }

    #[test]
    fn weekend_touching_request_is_flagged() {
        // Thu 2026-03-05 through Sun 2026-03-08 touches Fri/Sat.
        let report = validate(
            &draft(LeaveType::Vacation, date(2026, 3, 5), date(2026, 3, 8)),
            &ctx(),
        );
        assert!(report.accepted());
        assert!(report.derived.is_weekend_leave);
    }

    #[test]
    fn exhausted_weekend_quota_rejects_a_third_weekend_request() {
        let mut context = ctx();
        context.weekend_used = 2;
        let report = validate(
            &draft(LeaveType::Vacation, date(2026, 3, 5), date(2026, 3, 8)),
            &context,
        );
        assert!(rules(&report).contains(&RuleCode::WeekendQuotaExhausted));
    }

    #[test]
    fn team_at_capacity_rejects_and_clears_the_conflict_flag() {
        let team = Team {
            id: 10,
            name: "Platform".into(),
            manager_id: 42,
            members: vec![1000, 1001, 1002, 1003],
        };
        let mut context = ctx();
        context.team = Some(&team);
        context.members_on_leave = 1; // (1 + 1) / 4 = 0.5 > 0.49
        let report = validate(
            &draft(LeaveType::Vacation, date(2026, 3, 2), date(2026, 3, 4)),
            &context,
        );
        assert!(rules(&report).contains(&RuleCode::TeamOverCapacity));
        assert!(!report.derived.team_conflict_check);
    }

    #[test]
    fn all_violations_are_reported_together() {
        // Sick leave, reversed dates, no document, shortfall.
        let mut context = ctx();
        context.balance.remaining = 0.0;
        context.balance.used = 10.0;
        let mut d = draft(LeaveType::Sick, date(2026, 3, 4), date(2026, 3, 2));
        d.half_day = false;
        let report = validate(&d, &context);
        let rules = rules(&report);
        assert!(rules.contains(&RuleCode::DateOrder));
        assert!(rules.contains(&RuleCode::NoWorkingDays));
        assert!(rules.contains(&RuleCode::DocumentRequired));
        assert!(rules.len() >= 3);
    }
}
