use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::directory::{Directory, InMemoryDirectory};
use crate::engine::capacity::CapacityPreview;
use crate::engine::lifecycle::LeaveEngine;
use crate::model::team::Team;

#[derive(Deserialize, ToSchema)]
pub struct CreateTeam {
    #[schema(example = 10)]
    pub id: u64,
    #[schema(example = "Platform")]
    pub name: String,
    #[schema(example = 42)]
    pub manager_id: u64,
}

#[derive(Deserialize, IntoParams)]
pub struct CapacityQuery {
    #[param(example = "2026-03-02", value_type = String, format = "date")]
    pub start: NaiveDate,
    #[param(example = "2026-03-06", value_type = String, format = "date")]
    pub end: NaiveDate,
}

/// Register a team in the directory
#[utoipa::path(
    post,
    path = "/api/team",
    request_body = CreateTeam,
    responses(
        (status = 200, description = "Team registered"),
        (status = 400, description = "Team already exists", body = Object, example = json!({
            "message": "Team already exists"
        }))
    ),
    tag = "Team"
)]
pub async fn create_team(
    directory: web::Data<InMemoryDirectory>,
    payload: web::Json<CreateTeam>,
) -> actix_web::Result<impl Responder> {
    let body = payload.into_inner();
    if !directory.insert_team(body.id, body.name, body.manager_id) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Team already exists"
        })));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Team registered"
    })))
}

/// Fetch a team with its current membership
#[utoipa::path(
    get,
    path = "/api/team/{id}",
    params(
        ("id" = u64, Path, description = "Team ID")
    ),
    responses(
        (status = 200, description = "Team found", body = Team),
        (status = 404, description = "Team not found")
    ),
    tag = "Team"
)]
pub async fn get_team(
    directory: web::Data<InMemoryDirectory>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    match directory.team(path.into_inner()) {
        Some(team) => Ok(HttpResponse::Ok().json(team)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Team not found"
        }))),
    }
}

/// Preview team capacity for a date window
#[utoipa::path(
    get,
    path = "/api/team/{id}/capacity",
    params(
        ("id" = u64, Path, description = "Team ID"),
        CapacityQuery
    ),
    responses(
        (status = 200, description = "Capacity preview", body = CapacityPreview),
        (status = 404, description = "Team not found")
    ),
    tag = "Team"
)]
pub async fn team_capacity(
    engine: web::Data<LeaveEngine>,
    path: web::Path<u64>,
    query: web::Query<CapacityQuery>,
) -> actix_web::Result<impl Responder> {
    let team_id = path.into_inner();
    match engine.capacity_preview(team_id, query.start, query.end) {
        Ok(preview) => Ok(HttpResponse::Ok().json(preview)),
        Err(e) => {
            tracing::error!(error = %e, team_id, "Capacity preview failed");
            Ok(HttpResponse::NotFound().json(serde_json::json!({ "message": e.to_string() })))
        }
    }
}
