use crate::api::balance::{BalanceResponse, TypeBalance, WeekendQuota};
use crate::api::employee::{CreateEmployee, EmployeeListResponse};
use crate::api::leave_request::{
    CancelAction, LeaveFilter, LeaveListResponse, RejectedResponse, ReviewAction,
};
use crate::api::team::CreateTeam;
use crate::engine::capacity::CapacityPreview;
use crate::engine::ledger::Balance;
use crate::engine::validator::{RuleCode, Violation};
use crate::model::employee::Employee;
use crate::model::leave_request::{
    HalfDayPeriod, LeaveCategory, LeaveDraft, LeaveRequest, LeaveStatus,
};
use crate::model::leave_type::LeaveType;
use crate::model::team::Team;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leavedesk API",
        version = "1.0.0",
        description = r#"
## Leave Entitlement & Validation Service

This API fronts a leave management engine that owns the real rules:
day counting, entitlement ledgers, multi-rule validation and the request
approval workflow.

### 🔹 Key Features
- **Leave Requests**
  - Submit a candidate, receive either a pending request or the complete
    list of violated rules
  - Approve / reject (notes mandatory) / cancel (owner only)
- **Entitlement Balances**
  - Per leave type and semi-annual period, plus the weekend-leave sub-quota
- **Team Capacity**
  - Preview how full a team's leave window already is

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints
- Rejected submissions always carry every violated rule at once

---
Built with **Rust**, **Actix Web**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::cancel_leave,

        crate::api::balance::get_balance,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,

        crate::api::team::create_team,
        crate::api::team::get_team,
        crate::api::team::team_capacity
    ),
    components(
        schemas(
            LeaveDraft,
            LeaveRequest,
            LeaveStatus,
            LeaveType,
            LeaveCategory,
            HalfDayPeriod,
            Violation,
            RuleCode,
            ReviewAction,
            CancelAction,
            LeaveFilter,
            LeaveListResponse,
            RejectedResponse,
            Balance,
            TypeBalance,
            WeekendQuota,
            BalanceResponse,
            CapacityPreview,
            Employee,
            CreateEmployee,
            EmployeeListResponse,
            Team,
            CreateTeam
        )
    ),
    tags(
        (name = "Leave", description = "Leave request lifecycle APIs"),
        (name = "Balance", description = "Entitlement balance APIs"),
        (name = "Employee", description = "Directory employee APIs"),
        (name = "Team", description = "Directory team and capacity APIs"),
    )
)]
pub struct ApiDoc;
