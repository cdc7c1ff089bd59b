//! Holiday lookup.
//!
//! A date counts as a holiday if it is a national or regional holiday, or
//! if it is listed in the local override file for its year. Both sources
//! are read per year and never fail: a missing source is simply empty.

mod calendar;
mod oracle;
mod overrides;

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

pub use calendar::{MadridCalendar, easter_sunday};
pub use oracle::{HolidayLookup, HolidayOracle};
pub use overrides::OverrideDir;

/// Something that knows the holidays of a given year.
pub trait HolidaySource {
    /// All holidays falling in `year`.
    fn holidays(&self, year: i32) -> HashSet<NaiveDate>;
}

/// A fixed list of holiday dates, e.g. for tests.
#[derive(Debug, Clone, Default)]
pub struct FixedHolidays {
    dates: HashSet<NaiveDate>,
}

impl FixedHolidays {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }
}

impl HolidaySource for FixedHolidays {
    fn holidays(&self, year: i32) -> HashSet<NaiveDate> {
        self.dates
            .iter()
            .filter(|d| d.year() == year)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_holidays_filter_by_year() {
        let a = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let source = FixedHolidays::new([a, b]);

        assert_eq!(source.holidays(2025), HashSet::from([a]));
        assert_eq!(source.holidays(2026), HashSet::from([b]));
        assert!(source.holidays(2027).is_empty());
    }
}
