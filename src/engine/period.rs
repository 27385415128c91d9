//! Semi-annual period resolution.
//!
//! Vacation and weekend-leave quotas are scoped to fixed six-month windows:
//! H1 (Jan-Jun) and H2 (Jul-Dec). The window is derived solely from the
//! request's start date.

use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemiAnnual {
    H1,
    H2,
}

impl SemiAnnual {
    pub fn index(self) -> u8 {
        match self {
            SemiAnnual::H1 => 1,
            SemiAnnual::H2 => 2,
        }
    }

    pub fn from_index(index: u8) -> Self {
        match index {
            2 => SemiAnnual::H2,
            _ => SemiAnnual::H1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    pub year: i32,
    pub half: SemiAnnual,
}

impl Period {
    /// Pure and total: every date maps to exactly one period.
    pub fn of(date: NaiveDate) -> Self {
        let half = if date.month() <= 6 {
            SemiAnnual::H1
        } else {
            SemiAnnual::H2
        };
        Period {
            year: date.year(),
            half,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn january_through_june_is_h1() {
        assert_eq!(Period::of(date(2026, 1, 1)).half, SemiAnnual::H1);
        assert_eq!(Period::of(date(2026, 6, 30)).half, SemiAnnual::H1);
    }

    #[test]
    fn july_through_december_is_h2() {
        assert_eq!(Period::of(date(2026, 7, 1)).half, SemiAnnual::H2);
        assert_eq!(Period::of(date(2026, 12, 31)).half, SemiAnnual::H2);
    }

    #[test]
    fn year_comes_from_the_date() {
        let period = Period::of(date(2025, 8, 15));
        assert_eq!(period.year, 2025);
        assert_eq!(period.half.index(), 2);
    }

    #[test]
    fn index_round_trips() {
        assert_eq!(SemiAnnual::from_index(1), SemiAnnual::H1);
        assert_eq!(SemiAnnual::from_index(2), SemiAnnual::H2);
    }
}
