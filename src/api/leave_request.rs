use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

use crate::engine::error::EngineError;
use crate::engine::lifecycle::{LeaveEngine, SubmitOutcome};
use crate::engine::validator::Violation;
use crate::model::leave_request::{LeaveDraft, LeaveRequest, LeaveStatus};

#[derive(Deserialize, ToSchema)]
pub struct ReviewAction {
    #[schema(example = 42)]
    pub reviewer_id: u64,
    /// Optional on approve, mandatory on reject.
    #[serde(default)]
    #[schema(example = "Coverage confirmed", nullable = true)]
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CancelAction {
    /// Must be the owning employee.
    #[schema(example = 1000)]
    pub employee_id: u64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    #[schema(example = 1000)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    #[schema(example = "pending")]
    /// Filter by leave status
    pub status: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>, // 1-based
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>, // items per page
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Serialize, ToSchema)]
pub struct RejectedResponse {
    #[schema(example = "Leave request rejected")]
    pub message: String,
    pub violations: Vec<Violation>,
}

/// 404 for unknown ids, 400 for everything else; the body always names the
/// state the request is actually in.
fn engine_error_response(err: &EngineError) -> HttpResponse {
    match err {
        EngineError::RequestNotFound { .. } => {
            HttpResponse::NotFound().json(serde_json::json!({ "message": err.to_string() }))
        }
        _ => HttpResponse::BadRequest().json(serde_json::json!({ "message": err.to_string() })),
    }
}

/* =========================
Submit leave request
========================= */
/// Swagger doc for create_leave endpoint
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = LeaveDraft,
        description = "Leave request candidate",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted", body = Object,
         example = json!({
            "message": "Leave request submitted",
            "request": { "id": "3b44c2a0-7f2e-4b3a-9a42-0d1f4c7f1c55", "status": "pending" }
         })
        ),
        (status = 400, description = "Rejected with the full violation list", body = RejectedResponse)
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    engine: web::Data<LeaveEngine>,
    payload: web::Json<LeaveDraft>,
) -> actix_web::Result<impl Responder> {
    let draft = payload.into_inner();
    let employee_id = draft.employee_id;
    match engine.submit(draft) {
        Ok(SubmitOutcome::Accepted(request)) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Leave request submitted",
            "request": request
        }))),
        Ok(SubmitOutcome::Rejected(violations)) => {
            Ok(HttpResponse::BadRequest().json(RejectedResponse {
                message: "Leave request rejected".to_string(),
                violations,
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, employee_id, "Failed to submit leave request");
            Ok(engine_error_response(&e))
        }
    }
}

/* =========================
Approve leave (HR/Admin)
========================= */
/// Swagger doc for approve_leave endpoint
#[utoipa::path(
    put,
    path = "/api/leave/{id}/approve",
    params(
        ("id" = String, Path, description = "ID of the leave request to approve")
    ),
    request_body = ReviewAction,
    responses(
        (status = 200, description = "Leave approved", body = LeaveRequest),
        (status = 400, description = "Request already left pending", body = Object, example = json!({
            "message": "invalid transition: request is approved"
        })),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    engine: web::Data<LeaveEngine>,
    path: web::Path<String>,
    payload: web::Json<ReviewAction>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let action = payload.into_inner();
    match engine.approve(&id, action.reviewer_id, action.notes) {
        Ok(request) => Ok(HttpResponse::Ok().json(request)),
        Err(e) => {
            tracing::error!(error = %e, request_id = %id, "Approve leave failed");
            Ok(engine_error_response(&e))
        }
    }
}

/* =========================
Reject leave (HR/Admin)
========================= */
/// Swagger doc for reject_leave endpoint
#[utoipa::path(
    put,
    path = "/api/leave/{id}/reject",
    params(
        ("id" = String, Path, description = "ID of the leave request to reject")
    ),
    request_body = ReviewAction,
    responses(
        (status = 200, description = "Leave rejected, reservation released", body = LeaveRequest),
        (status = 400, description = "Notes missing or request already left pending", body = Object, example = json!({
            "message": "review notes are required when rejecting a request"
        })),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    engine: web::Data<LeaveEngine>,
    path: web::Path<String>,
    payload: web::Json<ReviewAction>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let action = payload.into_inner();
    match engine.reject(&id, action.reviewer_id, action.notes.unwrap_or_default()) {
        Ok(request) => Ok(HttpResponse::Ok().json(request)),
        Err(e) => {
            tracing::error!(error = %e, request_id = %id, "Reject leave failed");
            Ok(engine_error_response(&e))
        }
    }
}

/* =========================
Cancel leave (owner)
========================= */
/// Swagger doc for cancel_leave endpoint
#[utoipa::path(
    put,
    path = "/api/leave/{id}/cancel",
    params(
        ("id" = String, Path, description = "ID of the leave request to cancel")
    ),
    request_body = CancelAction,
    responses(
        (status = 200, description = "Leave cancelled, reservation released", body = LeaveRequest),
        (status = 400, description = "Not the owner or request already left pending"),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    engine: web::Data<LeaveEngine>,
    path: web::Path<String>,
    payload: web::Json<CancelAction>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    match engine.cancel(&id, payload.employee_id) {
        Ok(request) => Ok(HttpResponse::Ok().json(request)),
        Err(e) => {
            tracing::error!(error = %e, request_id = %id, "Cancel leave failed");
            Ok(engine_error_response(&e))
        }
    }
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/api/leave/{id}",
    params(
        ("id" = String, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    engine: web::Data<LeaveEngine>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    match engine.get(&path.into_inner()) {
        Some(request) => Ok(HttpResponse::Ok().json(request)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        }))),
    }
}

/// for getting leave applications endpoint
#[utoipa::path(
    get,
    path = "/api/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 400, description = "Invalid status filter")
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    engine: web::Data<LeaveEngine>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);

    // -------------------------
    // Filters
    // -------------------------
    let status = match query.status.as_deref() {
        Some(raw) => match LeaveStatus::from_str(raw) {
            Ok(status) => Some(status),
            Err(_) => {
                return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                    "message": "Invalid status. Allowed: pending, approved, rejected, cancelled"
                })));
            }
        },
        None => None,
    };

    let filtered: Vec<LeaveRequest> = engine
        .all()
        .into_iter()
        .filter(|r| query.employee_id.map_or(true, |id| r.employee_id == id))
        .filter(|r| status.map_or(true, |s| r.status == s))
        .collect();

    let total = filtered.len() as i64;
    let data: Vec<LeaveRequest> = filtered
        .into_iter()
        .skip(((page - 1) * per_page) as usize)
        .take(per_page as usize)
        .collect();

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
