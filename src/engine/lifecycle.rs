//! Request lifecycle state machine.
//!
//! `pending` is the only live state; approved, rejected and cancelled are
//! terminal. Submission is the single entry point that reserves ledger
//! capacity; rejection and cancellation release it; approval turns the
//! reservation permanent. Transitions run under the request store's write
//! lock so exactly one concurrent caller wins and the loser observes
//! `InvalidTransition` with no side effect.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::directory::Directory;
use crate::engine::calendar::WorkweekPolicy;
use crate::engine::capacity::{overlapping_members, CapacityPreview};
use crate::engine::error::EngineError;
use crate::engine::ledger::{Balance, EntitlementLedger, LedgerKey};
use crate::engine::period::{Period, SemiAnnual};
use crate::engine::validator::{validate, RuleLimits, ValidationContext, Violation};
use crate::model::leave_request::{LeaveDraft, LeaveRequest, LeaveStatus};
use crate::model::leave_type::LeaveType;

#[derive(Debug)]
pub enum SubmitOutcome {
    Accepted(LeaveRequest),
    Rejected(Vec<Violation>),
}

pub struct LeaveEngine {
    workweek: WorkweekPolicy,
    limits: RuleLimits,
    ledger: EntitlementLedger,
    requests: RwLock<HashMap<String, LeaveRequest>>,
    team_locks: Mutex<HashMap<u64, Arc<Mutex<()>>>>,
    directory: Arc<dyn Directory>,
}

impl LeaveEngine {
    pub fn new(workweek: WorkweekPolicy, limits: RuleLimits, directory: Arc<dyn Directory>) -> Self {
        LeaveEngine {
            workweek,
            limits,
            ledger: EntitlementLedger::new(limits.weekend_cap),
            requests: RwLock::new(HashMap::new()),
            team_locks: Mutex::new(HashMap::new()),
            directory,
        }
    }

    fn team_lock(&self, team_id: u64) -> Arc<Mutex<()>> {
        self.team_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(team_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn ledger_key(request: &LeaveRequest) -> LedgerKey {
        LedgerKey::for_request(
            request.employee_id,
            request.leave_type,
            Period {
                year: request.year,
                half: SemiAnnual::from_index(request.semi_annual_period),
            },
        )
    }

    pub fn submit(&self, draft: LeaveDraft) -> Result<SubmitOutcome, EngineError> {
        self.submit_on(draft, Utc::now().date_naive())
    }

    /// Validation plus commit. Holds the owning team's lock across the
    /// capacity read and the request insert so two racing submissions
    /// cannot both pass a ceiling they jointly violate; per-employee races
    /// on the ledger itself are settled by the atomic `reserve`.
    pub fn submit_on(&self, draft: LeaveDraft, today: NaiveDate) -> Result<SubmitOutcome, EngineError> {
        let employee =
            self.directory
                .employee(draft.employee_id)
                .ok_or(EngineError::UnknownEmployee {
                    employee_id: draft.employee_id,
                })?;
        let team = employee.team_id.and_then(|team_id| self.directory.team(team_id));

        let team_lock = team.as_ref().map(|t| self.team_lock(t.id));
        let _guard = team_lock
            .as_ref()
            .map(|l| l.lock().unwrap_or_else(PoisonError::into_inner));

        let period = Period::of(draft.start_date);
        let key = LedgerKey::for_request(draft.employee_id, draft.leave_type, period);
        let members_on_leave = match &team {
            Some(t) => {
                let requests = self.requests.read().unwrap_or_else(PoisonError::into_inner);
                overlapping_members(
                    requests.values(),
                    t,
                    Some(draft.employee_id),
                    draft.start_date,
                    draft.end_date,
                )
            }
            None => 0,
        };

        let ctx = ValidationContext {
            today,
            workweek: self.workweek,
            limits: self.limits,
            balance: self.ledger.period_balance(key),
            weekend_used: self.ledger.weekend_used(draft.employee_id, period),
            team: team.as_ref(),
            members_on_leave,
        };
        let report = validate(&draft, &ctx);
        let derived = report.derived;
        if !report.accepted() {
            return Ok(SubmitOutcome::Rejected(report.violations));
        }

        // The validation pass read the balance without holding the entry
        // lock; the reservation re-checks atomically and may still lose a
        // race for the same key. That loss is a rule outcome, not a fault.
        if let Err(err) = self.ledger.reserve(key, derived.total_days) {
            return match err {
                EngineError::InsufficientBalance {
                    requested,
                    remaining,
                } => Ok(SubmitOutcome::Rejected(vec![
                    Violation::insufficient_balance(requested, remaining),
                ])),
                other => Err(other),
            };
        }
        if derived.is_weekend_leave {
            if let Err(err) = self.ledger.reserve_weekend(draft.employee_id, period) {
                self.ledger.release(key, derived.total_days);
                return match err {
                    EngineError::WeekendQuotaExhausted { cap } => Ok(SubmitOutcome::Rejected(
                        vec![Violation::weekend_quota_exhausted(cap)],
                    )),
                    other => Err(other),
                };
            }
        }

        let request = LeaveRequest {
            id: Uuid::new_v4().to_string(),
            employee_id: draft.employee_id,
            leave_type: draft.leave_type,
            start_date: draft.start_date,
            end_date: draft.end_date,
            half_day: draft.half_day,
            half_day_period: draft.half_day_period,
            total_days: derived.total_days,
            reason: draft.reason,
            emergency_contact_name: draft.emergency_contact_name,
            emergency_contact_phone: draft.emergency_contact_phone,
            document_ref: draft.document_ref,
            status: LeaveStatus::Pending,
            is_weekend_leave: derived.is_weekend_leave,
            year: derived.period.year,
            semi_annual_period: derived.period.half.index(),
            category: derived.category,
            requires_admin_review: derived.requires_admin_review,
            team_conflict_check: derived.team_conflict_check,
            admin_notes: None,
            reviewer_id: None,
            reviewed_at: None,
            created_at: Utc::now(),
        };
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request.id.clone(), request.clone());
        info!(
            request_id = %request.id,
            employee_id = request.employee_id,
            leave_type = %request.leave_type,
            total_days = request.total_days,
            "leave request submitted"
        );
        Ok(SubmitOutcome::Accepted(request))
    }

    /// The reservation made at submission simply becomes permanent; no
    /// ledger movement happens here.
    pub fn approve(
        &self,
        id: &str,
        reviewer_id: u64,
        notes: Option<String>,
    ) -> Result<LeaveRequest, EngineError> {
        let mut requests = self.requests.write().unwrap_or_else(PoisonError::into_inner);
        let request = requests
            .get_mut(id)
            .ok_or_else(|| EngineError::RequestNotFound { id: id.to_string() })?;
        if request.status.is_terminal() {
            return Err(EngineError::InvalidTransition {
                current: request.status,
            });
        }
        request.status = LeaveStatus::Approved;
        request.reviewer_id = Some(reviewer_id);
        request.reviewed_at = Some(Utc::now());
        if notes.is_some() {
            request.admin_notes = notes;
        }
        info!(request_id = %request.id, reviewer_id, "leave request approved");
        Ok(request.clone())
    }

    pub fn reject(
        &self,
        id: &str,
        reviewer_id: u64,
        notes: String,
    ) -> Result<LeaveRequest, EngineError> {
        if notes.trim().is_empty() {
            return Err(EngineError::NotesRequired);
        }
        let mut requests = self.requests.write().unwrap_or_else(PoisonError::into_inner);
        let request = requests
            .get_mut(id)
            .ok_or_else(|| EngineError::RequestNotFound { id: id.to_string() })?;
        if request.status.is_terminal() {
            return Err(EngineError::InvalidTransition {
                current: request.status,
            });
        }
        request.status = LeaveStatus::Rejected;
        request.reviewer_id = Some(reviewer_id);
        request.reviewed_at = Some(Utc::now());
        request.admin_notes = Some(notes);
        self.release_reservation(request);
        info!(request_id = %request.id, reviewer_id, "leave request rejected");
        Ok(request.clone())
    }

    pub fn cancel(&self, id: &str, acting_employee_id: u64) -> Result<LeaveRequest, EngineError> {
        let mut requests = self.requests.write().unwrap_or_else(PoisonError::into_inner);
        let request = requests
            .get_mut(id)
            .ok_or_else(|| EngineError::RequestNotFound { id: id.to_string() })?;
        if request.status.is_terminal() {
            return Err(EngineError::InvalidTransition {
                current: request.status,
            });
        }
        if request.employee_id != acting_employee_id {
            return Err(EngineError::NotOwner);
        }
        request.status = LeaveStatus::Cancelled;
        self.release_reservation(request);
        info!(request_id = %request.id, "leave request cancelled");
        Ok(request.clone())
    }

    fn release_reservation(&self, request: &LeaveRequest) {
        self.ledger
            .release(Self::ledger_key(request), request.total_days);
        if request.is_weekend_leave {
            self.ledger.release_weekend(
                request.employee_id,
                Period {
                    year: request.year,
                    half: SemiAnnual::from_index(request.semi_annual_period),
                },
            );
        }
    }

    pub fn get(&self, id: &str) -> Option<LeaveRequest> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// All requests, newest first. Filtering and pagination stay in the
    /// presentation layer.
    pub fn all(&self) -> Vec<LeaveRequest> {
        let mut all: Vec<LeaveRequest> = self
            .requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        all
    }

    pub fn type_balance(&self, employee_id: u64, leave_type: LeaveType, year: i32) -> Balance {
        self.ledger.balance(employee_id, leave_type, year)
    }

    pub fn weekend_usage(&self, employee_id: u64, year: i32) -> (u32, u32) {
        let h1 = self.ledger.weekend_used(
            employee_id,
            Period {
                year,
                half: SemiAnnual::H1,
            },
        );
        let h2 = self.ledger.weekend_used(
            employee_id,
            Period {
                year,
                half: SemiAnnual::H2,
            },
        );
        (h1, h2)
    }

    pub fn weekend_cap(&self) -> u32 {
        self.ledger.weekend_cap()
    }

    pub fn capacity_preview(
        &self,
        team_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CapacityPreview, EngineError> {
        let team = self
            .directory
            .team(team_id)
            .ok_or(EngineError::UnknownTeam { team_id })?;
        let requests = self.requests.read().unwrap_or_else(PoisonError::into_inner);
        let members_on_leave = overlapping_members(requests.values(), &team, None, start, end);
        Ok(CapacityPreview::compute(
            team_id,
            team.members.len(),
            members_on_leave,
            self.limits.team_capacity_ceiling,
        ))
    }
}
