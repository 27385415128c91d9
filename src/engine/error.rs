//! Engine failure taxonomy.
//!
//! Expected business outcomes (rule violations) travel as data through
//! `ValidationReport`; this enum covers the per-operation failures: ledger
//! exhaustion, illegal state-machine transitions, and caller-contract
//! breaches surfaced by the lifecycle.

use derive_more::Display;

use crate::model::leave_request::LeaveStatus;

#[derive(Debug, Clone, PartialEq, Display)]
pub enum EngineError {
    #[display(
        fmt = "insufficient balance: requested {} with {} remaining",
        requested,
        remaining
    )]
    InsufficientBalance { requested: f64, remaining: f64 },

    #[display(fmt = "weekend leave quota exhausted ({} per half-year)", cap)]
    WeekendQuotaExhausted { cap: u32 },

    #[display(fmt = "invalid transition: request is {}", current)]
    InvalidTransition { current: LeaveStatus },

    #[display(fmt = "leave request {} not found", id)]
    RequestNotFound { id: String },

    #[display(fmt = "review notes are required when rejecting a request")]
    NotesRequired,

    #[display(fmt = "only the owning employee may cancel a pending request")]
    NotOwner,

    #[display(fmt = "employee {} is not registered in the directory", employee_id)]
    UnknownEmployee { employee_id: u64 },

    #[display(fmt = "team {} is not registered in the directory", team_id)]
    UnknownTeam { team_id: u64 },
}

impl std::error::Error for EngineError {}
