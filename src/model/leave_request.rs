use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::model::leave_type::LeaveType;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    /// Approved, rejected and cancelled admit no further transition.
    pub fn is_terminal(self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HalfDayPeriod {
    FirstHalf,
    SecondHalf,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveCategory {
    Standard,
    Special,
}

/// Raw candidate supplied by the form layer. The engine derives everything
/// else (day count, period, flags) during validation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LeaveDraft {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "vacation")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-04", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[serde(default)]
    #[schema(example = false)]
    pub half_day: bool,
    #[serde(default)]
    pub half_day_period: Option<HalfDayPeriod>,
    #[schema(example = "Family trip")]
    pub reason: String,
    #[serde(default)]
    #[schema(nullable = true)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub emergency_contact_phone: Option<String>,
    /// Opaque reference into the file storage collaborator; the engine only
    /// checks presence.
    #[serde(default)]
    #[schema(nullable = true)]
    pub document_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = "3b44c2a0-7f2e-4b3a-9a42-0d1f4c7f1c55")]
    pub id: String,
    #[schema(example = 1000)]
    pub employee_id: u64,
    pub leave_type: LeaveType,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-04", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub half_day: bool,
    pub half_day_period: Option<HalfDayPeriod>,
    /// 0.5 for half-day requests, otherwise the working-day count.
    #[schema(example = 3.0)]
    pub total_days: f64,
    pub reason: String,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub document_ref: Option<String>,
    pub status: LeaveStatus,
    pub is_weekend_leave: bool,
    #[schema(example = 2026)]
    pub year: i32,
    /// 1 = Jan-Jun, 2 = Jul-Dec, derived from the start date.
    #[schema(example = 1)]
    pub semi_annual_period: u8,
    pub category: LeaveCategory,
    pub requires_admin_review: bool,
    /// Whether the team capacity rule was satisfied at submission time.
    pub team_conflict_check: bool,
    pub admin_notes: Option<String>,
    pub reviewer_id: Option<u64>,
    #[schema(example = "2026-03-01T09:30:00Z", format = "date-time", value_type = String, nullable = true)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[schema(example = "2026-02-20T08:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}
