//! Working-day arithmetic.
//!
//! Two inconsistent working-week definitions exist across the submission
//! surfaces that feed this engine: one treats the non-working pair as the
//! last two days of a Sun-Thu week (Fri/Sat), the other as a classic
//! Sat/Sun weekend. Neither is authoritative, so the calendar is a named,
//! swappable policy selected by `CALENDAR_POLICY`; `FriSat` is the default.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkweekPolicy {
    /// Sun-Thu working week; Friday and Saturday are the non-working pair.
    FriSat,
    /// Mon-Fri working week; Saturday and Sunday are the non-working pair.
    SatSun,
}

impl WorkweekPolicy {
    pub fn is_working_day(self, date: NaiveDate) -> bool {
        match self {
            WorkweekPolicy::FriSat => !matches!(date.weekday(), Weekday::Fri | Weekday::Sat),
            WorkweekPolicy::SatSun => !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }

    /// True exactly on the two days of the non-working pair. A request
    /// touching either one counts against the weekend-leave sub-quota.
    pub fn is_weekend_boundary(self, date: NaiveDate) -> bool {
        !self.is_working_day(date)
    }

    /// Counts working days in `[start, end]` inclusive. Empty when
    /// `end < start`; half-day requests bypass this entirely and consume 0.5.
    pub fn working_days_between(self, start: NaiveDate, end: NaiveDate) -> u32 {
        let mut count = 0;
        let mut current = start;
        while current <= end {
            if self.is_working_day(current) {
                count += 1;
            }
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        count
    }

    pub fn touches_weekend_boundary(self, start: NaiveDate, end: NaiveDate) -> bool {
        let mut current = start;
        while current <= end {
            if self.is_weekend_boundary(current) {
                return true;
            }
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fri_sat_policy_marks_sunday_working() {
        let policy = WorkweekPolicy::FriSat;
        // 2026-03-01 is a Sunday
        assert!(policy.is_working_day(date(2026, 3, 1)));
        assert!(!policy.is_working_day(date(2026, 3, 6))); // Friday
        assert!(!policy.is_working_day(date(2026, 3, 7))); // Saturday
    }

    #[test]
    fn sat_sun_policy_marks_friday_working() {
        let policy = WorkweekPolicy::SatSun;
        assert!(policy.is_working_day(date(2026, 3, 6))); // Friday
        assert!(!policy.is_working_day(date(2026, 3, 7))); // Saturday
        assert!(!policy.is_working_day(date(2026, 3, 8))); // Sunday
    }

    #[test]
    fn full_week_counts_five_working_days_under_either_policy() {
        // 2026-03-01 (Sun) through 2026-03-07 (Sat)
        let start = date(2026, 3, 1);
        let end = date(2026, 3, 7);
        assert_eq!(WorkweekPolicy::FriSat.working_days_between(start, end), 5);
        assert_eq!(WorkweekPolicy::SatSun.working_days_between(start, end), 5);
    }

    #[test]
    fn policies_disagree_on_which_days_count() {
        // Friday only
        let friday = date(2026, 3, 6);
        assert_eq!(WorkweekPolicy::FriSat.working_days_between(friday, friday), 0);
        assert_eq!(WorkweekPolicy::SatSun.working_days_between(friday, friday), 1);
    }

    #[test]
    fn single_non_working_day_counts_zero() {
        let saturday = date(2026, 3, 7);
        assert_eq!(
            WorkweekPolicy::FriSat.working_days_between(saturday, saturday),
            0
        );
    }

    #[test]
    fn reversed_range_counts_zero() {
        let start = date(2026, 3, 5);
        let end = date(2026, 3, 2);
        assert_eq!(WorkweekPolicy::FriSat.working_days_between(start, end), 0);
    }

    #[test]
    fn weekend_boundary_matches_the_non_working_pair() {
        let policy = WorkweekPolicy::FriSat;
        assert!(policy.is_weekend_boundary(date(2026, 3, 6)));
        assert!(policy.is_weekend_boundary(date(2026, 3, 7)));
        assert!(!policy.is_weekend_boundary(date(2026, 3, 8)));
    }

    #[test]
    fn range_touching_the_pair_is_flagged() {
        let policy = WorkweekPolicy::FriSat;
        // Wed-Thu stays clear, Thu-Fri touches
        assert!(!policy.touches_weekend_boundary(date(2026, 3, 4), date(2026, 3, 5)));
        assert!(policy.touches_weekend_boundary(date(2026, 3, 5), date(2026, 3, 6)));
    }

    #[test]
    fn policy_parses_from_snake_case() {
        use std::str::FromStr;
        assert_eq!(
            WorkweekPolicy::from_str("fri_sat").unwrap(),
            WorkweekPolicy::FriSat
        );
        assert_eq!(
            WorkweekPolicy::from_str("sat_sun").unwrap(),
            WorkweekPolicy::SatSun
        );
    }
}
