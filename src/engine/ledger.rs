//! Entitlement ledger.
//!
//! A keyed in-memory store of (allocated, used) pairs with atomic
//! reserve/release. The outer map is only locked to look up or create a
//! key's cell; balance mutation happens under that key's own mutex, so
//! concurrent reservations against the same entry serialize while distinct
//! entries never contend. Only the request lifecycle calls
//! `reserve`/`release`; every reserve is paired with exactly one release
//! or becomes permanent on approval.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::engine::error::EngineError;
use crate::engine::period::{Period, SemiAnnual};
use crate::model::leave_type::LeaveType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedgerKey {
    pub employee_id: u64,
    pub leave_type: LeaveType,
    pub year: i32,
    /// `Some` only for semi-annually scoped types (vacation); annual types
    /// hold a single entry per year.
    pub half: Option<SemiAnnual>,
}

impl LedgerKey {
    pub fn for_request(employee_id: u64, leave_type: LeaveType, period: Period) -> Self {
        let half = if leave_type.policy().semi_annual {
            Some(period.half)
        } else {
            None
        };
        LedgerKey {
            employee_id,
            leave_type,
            year: period.year,
            half,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Balance {
    #[schema(example = 12.0)]
    pub allocated: f64,
    #[schema(example = 3.0)]
    pub used: f64,
    #[schema(example = 9.0)]
    pub remaining: f64,
}

#[derive(Debug)]
struct Entry {
    allocated: f64,
    used: f64,
}

impl Entry {
    fn balance(&self) -> Balance {
        Balance {
            allocated: self.allocated,
            used: self.used,
            remaining: self.allocated - self.used,
        }
    }
}

type WeekendKey = (u64, i32, SemiAnnual);

pub struct EntitlementLedger {
    entries: RwLock<HashMap<LedgerKey, Arc<Mutex<Entry>>>>,
    weekend: RwLock<HashMap<WeekendKey, Arc<Mutex<u32>>>>,
    weekend_cap: u32,
}

fn lock<T>(cell: &Mutex<T>) -> MutexGuard<'_, T> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EntitlementLedger {
    pub fn new(weekend_cap: u32) -> Self {
        EntitlementLedger {
            entries: RwLock::new(HashMap::new()),
            weekend: RwLock::new(HashMap::new()),
            weekend_cap,
        }
    }

    pub fn weekend_cap(&self) -> u32 {
        self.weekend_cap
    }

    /// Looks up the cell for `key`, seeding it from the leave-type policy
    /// on first touch. Semi-annual entries get half the annual allocation.
    fn entry(&self, key: LedgerKey) -> Arc<Mutex<Entry>> {
        if let Some(cell) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return cell.clone();
        }
        let policy = key.leave_type.policy();
        let allocated = if key.half.is_some() {
            policy.annual_allocation / 2.0
        } else {
            policy.annual_allocation
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert_with(|| {
                Arc::new(Mutex::new(Entry {
                    allocated,
                    used: 0.0,
                }))
            })
            .clone()
    }

    fn weekend_slot(&self, key: WeekendKey) -> Arc<Mutex<u32>> {
        if let Some(slot) = self
            .weekend
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return slot.clone();
        }
        self.weekend
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(0)))
            .clone()
    }

    /// Balance of the single ledger entry `key` resolves to.
    pub fn period_balance(&self, key: LedgerKey) -> Balance {
        let cell = self.entry(key);
        let entry = lock(&cell);
        entry.balance()
    }

    /// Annual view: aggregates H1+H2 for semi-annual types, reads the one
    /// annual entry otherwise. Read-only and idempotent.
    pub fn balance(&self, employee_id: u64, leave_type: LeaveType, year: i32) -> Balance {
        if leave_type.policy().semi_annual {
            let halves = [SemiAnnual::H1, SemiAnnual::H2].map(|half| {
                self.period_balance(LedgerKey {
                    employee_id,
                    leave_type,
                    year,
                    half: Some(half),
                })
            });
            Balance {
                allocated: halves[0].allocated + halves[1].allocated,
                used: halves[0].used + halves[1].used,
                remaining: halves[0].remaining + halves[1].remaining,
            }
        } else {
            self.period_balance(LedgerKey {
                employee_id,
                leave_type,
                year,
                half: None,
            })
        }
    }

    /// Atomically debits `amount` against the entry. The read-check-write
    /// runs under the key's mutex, so two concurrent reservations can never
    /// both succeed when their combined amount exceeds the remainder.
    pub fn reserve(&self, key: LedgerKey, amount: f64) -> Result<Balance, EngineError> {
        let cell = self.entry(key);
        let mut entry = lock(&cell);
        let remaining = entry.allocated - entry.used;
        if amount > remaining {
            return Err(EngineError::InsufficientBalance {
                requested: amount,
                remaining,
            });
        }
        entry.used += amount;
        Ok(entry.balance())
    }

    /// Credits a prior reservation back. Only runs on rollback of a
    /// successful reserve, so a shortfall here means a pairing bug upstream:
    /// clamp to zero and alert operators instead of failing the transition.
    pub fn release(&self, key: LedgerKey, amount: f64) -> Balance {
        let cell = self.entry(key);
        let mut entry = lock(&cell);
        if amount > entry.used {
            warn!(
                employee_id = key.employee_id,
                leave_type = %key.leave_type,
                amount,
                used = entry.used,
                "inconsistent release: amount exceeds used balance, clamping to zero"
            );
            entry.used = 0.0;
        } else {
            entry.used -= amount;
        }
        entry.balance()
    }

    pub fn weekend_used(&self, employee_id: u64, period: Period) -> u32 {
        let slot = self.weekend_slot((employee_id, period.year, period.half));
        let used = lock(&slot);
        *used
    }

    /// Takes one weekend-leave slot for the period, failing once the
    /// per-period cap is reached. Checked under the slot lock so concurrent
    /// submissions cannot both take the last slot.
    pub fn reserve_weekend(&self, employee_id: u64, period: Period) -> Result<u32, EngineError> {
        let slot = self.weekend_slot((employee_id, period.year, period.half));
        let mut used = lock(&slot);
        if *used >= self.weekend_cap {
            return Err(EngineError::WeekendQuotaExhausted {
                cap: self.weekend_cap,
            });
        }
        *used += 1;
        Ok(*used)
    }

    pub fn release_weekend(&self, employee_id: u64, period: Period) {
        let slot = self.weekend_slot((employee_id, period.year, period.half));
        let mut used = lock(&slot);
        if *used == 0 {
            warn!(
                employee_id,
                year = period.year,
                "inconsistent weekend release: counter already at zero"
            );
        } else {
            *used -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::thread;

    fn period(y: i32, m: u32) -> Period {
        Period::of(NaiveDate::from_ymd_opt(y, m, 1).unwrap())
    }

    fn vacation_key(employee_id: u64) -> LedgerKey {
        LedgerKey::for_request(employee_id, LeaveType::Vacation, period(2026, 3))
    }

    #[test]
    fn vacation_entry_seeds_half_the_annual_allocation() {
        let ledger = EntitlementLedger::new(2);
        let balance = ledger.period_balance(vacation_key(1));
        assert_eq!(balance.allocated, 12.0);
        assert_eq!(balance.used, 0.0);
        assert_eq!(balance.remaining, 12.0);
    }

    #[test]
    fn sick_entry_is_annual() {
        let ledger = EntitlementLedger::new(2);
        let key = LedgerKey::for_request(1, LeaveType::Sick, period(2026, 9));
        assert_eq!(key.half, None);
        assert_eq!(ledger.period_balance(key).allocated, 10.0);
    }

    #[test]
    fn reserve_debits_and_reports_remaining() {
        let ledger = EntitlementLedger::new(2);
        let balance = ledger.reserve(vacation_key(1), 3.0).unwrap();
        assert_eq!(balance.used, 3.0);
        assert_eq!(balance.remaining, 9.0);
    }

    #[test]
    fn reserve_fails_beyond_remaining_and_leaves_entry_unchanged() {
        let ledger = EntitlementLedger::new(2);
        ledger.reserve(vacation_key(1), 3.0).unwrap();
        let err = ledger.reserve(vacation_key(1), 10.0).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientBalance {
                requested: 10.0,
                remaining: 9.0
            }
        );
        assert_eq!(ledger.period_balance(vacation_key(1)).used, 3.0);
    }

    #[test]
    fn release_restores_remaining() {
        let ledger = EntitlementLedger::new(2);
        ledger.reserve(vacation_key(1), 4.0).unwrap();
        let balance = ledger.release(vacation_key(1), 4.0);
        assert_eq!(balance.used, 0.0);
        assert_eq!(balance.remaining, 12.0);
    }

    #[test]
    fn release_clamps_at_zero_instead_of_going_negative() {
        let ledger = EntitlementLedger::new(2);
        ledger.reserve(vacation_key(1), 1.0).unwrap();
        let balance = ledger.release(vacation_key(1), 5.0);
        assert_eq!(balance.used, 0.0);
        assert_eq!(balance.remaining, balance.allocated);
    }

    #[test]
    fn annual_balance_aggregates_both_halves() {
        let ledger = EntitlementLedger::new(2);
        ledger
            .reserve(
                LedgerKey::for_request(1, LeaveType::Vacation, period(2026, 3)),
                2.0,
            )
            .unwrap();
        ledger
            .reserve(
                LedgerKey::for_request(1, LeaveType::Vacation, period(2026, 10)),
                3.0,
            )
            .unwrap();
        let annual = ledger.balance(1, LeaveType::Vacation, 2026);
        assert_eq!(annual.allocated, 24.0);
        assert_eq!(annual.used, 5.0);
        assert_eq!(annual.remaining, 19.0);
    }

    #[test]
    fn balance_is_idempotent_without_intervening_transitions() {
        let ledger = EntitlementLedger::new(2);
        ledger.reserve(vacation_key(7), 2.5).unwrap();
        let first = ledger.balance(7, LeaveType::Vacation, 2026);
        let second = ledger.balance(7, LeaveType::Vacation, 2026);
        assert_eq!(first, second);
    }

    #[test]
    fn half_day_amounts_stay_exact() {
        let ledger = EntitlementLedger::new(2);
        for _ in 0..4 {
            ledger.reserve(vacation_key(1), 0.5).unwrap();
        }
        let balance = ledger.period_balance(vacation_key(1));
        assert_eq!(balance.used, 2.0);
        assert_eq!(balance.remaining, 10.0);
    }

    #[test]
    fn concurrent_reservations_never_oversubscribe() {
        // Two submissions racing for 6 of a remaining 10: exactly one wins.
        let ledger = Arc::new(EntitlementLedger::new(2));
        ledger.reserve(vacation_key(1), 2.0).unwrap();

        let mut handles = Vec::new();
        for _ in 0..2 {
            let ledger = ledger.clone();
            handles.push(thread::spawn(move || ledger.reserve(vacation_key(1), 6.0)));
        }
        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = outcomes.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        let balance = ledger.period_balance(vacation_key(1));
        assert_eq!(balance.used, 8.0);
        assert_eq!(balance.remaining, 4.0);
    }

    #[test]
    fn hammered_key_never_exceeds_allocation() {
        let ledger = Arc::new(EntitlementLedger::new(2));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = ledger.clone();
            handles.push(thread::spawn(move || {
                let mut granted = 0.0;
                for _ in 0..10 {
                    if ledger.reserve(vacation_key(3), 1.0).is_ok() {
                        granted += 1.0;
                    }
                }
                granted
            }));
        }
        let granted: f64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        let balance = ledger.period_balance(vacation_key(3));
        assert_eq!(granted, 12.0);
        assert_eq!(balance.used, 12.0);
        assert_eq!(balance.remaining, 0.0);
    }

    #[test]
    fn weekend_quota_caps_per_period() {
        let ledger = EntitlementLedger::new(2);
        let p = period(2026, 4);
        assert_eq!(ledger.reserve_weekend(1, p).unwrap(), 1);
        assert_eq!(ledger.reserve_weekend(1, p).unwrap(), 2);
        assert!(matches!(
            ledger.reserve_weekend(1, p),
            Err(EngineError::WeekendQuotaExhausted { cap: 2 })
        ));
        // The other half-year has its own counter.
        assert_eq!(ledger.reserve_weekend(1, period(2026, 8)).unwrap(), 1);
    }

    #[test]
    fn weekend_release_frees_a_slot_and_clamps_at_zero() {
        let ledger = EntitlementLedger::new(2);
        let p = period(2026, 4);
        ledger.reserve_weekend(1, p).unwrap();
        ledger.release_weekend(1, p);
        assert_eq!(ledger.weekend_used(1, p), 0);
        // Releasing again is a pairing bug upstream; counter stays at zero.
        ledger.release_weekend(1, p);
        assert_eq!(ledger.weekend_used(1, p), 0);
    }
}
