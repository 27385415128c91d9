use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::directory::{Directory, InMemoryDirectory};
use crate::model::employee::Employee;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = 1000)]
    pub id: u64,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john@company.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = 10, nullable = true)]
    #[serde(default)]
    pub team_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub total: i64,
}

/// Register an employee in the directory
#[utoipa::path(
    post,
    path = "/api/employee",
    request_body = CreateEmployee,
    responses(
        (status = 200, description = "Employee registered", body = Employee),
        (status = 400, description = "Employee already exists", body = Object, example = json!({
            "message": "Employee already exists"
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    directory: web::Data<InMemoryDirectory>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    let body = payload.into_inner();
    let employee = Employee {
        id: body.id,
        name: body.name,
        email: body.email,
        team_id: body.team_id,
    };
    if !directory.insert_employee(employee.clone()) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Employee already exists"
        })));
    }
    Ok(HttpResponse::Ok().json(employee))
}

/// List registered employees
#[utoipa::path(
    get,
    path = "/api/employee",
    responses(
        (status = 200, description = "Employee list", body = EmployeeListResponse)
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    directory: web::Data<InMemoryDirectory>,
) -> actix_web::Result<impl Responder> {
    let data = directory.employees();
    let total = data.len() as i64;
    Ok(HttpResponse::Ok().json(EmployeeListResponse { data, total }))
}

/// Fetch a single employee
#[utoipa::path(
    get,
    path = "/api/employee/{id}",
    params(
        ("id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    directory: web::Data<InMemoryDirectory>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    match directory.employee(path.into_inner()) {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        }))),
    }
}
