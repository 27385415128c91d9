use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Directory record used by the capacity checker. Membership is derived
/// from employee records, never stored twice.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 10,
        "name": "Platform",
        "manager_id": 42,
        "members": [1000, 1001, 1002]
    })
)]
pub struct Team {
    #[schema(example = 10)]
    pub id: u64,

    #[schema(example = "Platform")]
    pub name: String,

    #[schema(example = 42)]
    pub manager_id: u64,

    #[schema(example = json!([1000, 1001, 1002]))]
    pub members: Vec<u64>,
}
