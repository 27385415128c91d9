use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use utoipa::{IntoParams, ToSchema};

use crate::directory::{Directory, InMemoryDirectory};
use crate::engine::ledger::Balance;
use crate::engine::lifecycle::LeaveEngine;
use crate::model::leave_type::LeaveType;

#[derive(Deserialize, IntoParams)]
pub struct BalanceQuery {
    /// Defaults to the current calendar year.
    pub year: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct TypeBalance {
    #[schema(example = "vacation")]
    pub leave_type: LeaveType,
    #[schema(example = "Vacation")]
    pub label: String,
    pub balance: Balance,
}

#[derive(Serialize, ToSchema)]
pub struct WeekendQuota {
    #[schema(example = 1)]
    pub h1_used: u32,
    #[schema(example = 0)]
    pub h2_used: u32,
    #[schema(example = 2)]
    pub cap: u32,
}

#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 2026)]
    pub year: i32,
    pub balances: Vec<TypeBalance>,
    pub weekend: WeekendQuota,
}

/// Entitlement balances per leave type, plus the weekend-leave sub-quota.
#[utoipa::path(
    get,
    path = "/api/balance/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "Employee to report on"),
        BalanceQuery
    ),
    responses(
        (status = 200, description = "Balance report", body = BalanceResponse),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Balance"
)]
pub async fn get_balance(
    engine: web::Data<LeaveEngine>,
    directory: web::Data<InMemoryDirectory>,
    path: web::Path<u64>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    if directory.employee(employee_id).is_none() {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        })));
    }

    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let balances = LeaveType::iter()
        .map(|leave_type| TypeBalance {
            leave_type,
            label: leave_type.policy().label.to_string(),
            balance: engine.type_balance(employee_id, leave_type, year),
        })
        .collect();
    let (h1_used, h2_used) = engine.weekend_usage(employee_id, year);

    Ok(HttpResponse::Ok().json(BalanceResponse {
        employee_id,
        year,
        balances,
        weekend: WeekendQuota {
            h1_used,
            h2_used,
            cap: engine.weekend_cap(),
        },
    }))
}
