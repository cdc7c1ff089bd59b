//! The holiday oracle: calendar plus local overrides.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::HolidaySource;

/// Answers "is this date a holiday?".
pub trait HolidayLookup {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

impl<F> HolidayLookup for F
where
    F: Fn(NaiveDate) -> bool,
{
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self(date)
    }
}

type YearSet = Arc<HashSet<NaiveDate>>;

/// Combines a national/regional calendar with local per-year overrides.
///
/// The calendar is consulted first. Local overrides are only read when the
/// calendar says no, and are then kept for the rest of the process, one
/// set per year.
pub struct HolidayOracle<C, L> {
    calendar: C,
    local: L,
    local_by_year: Mutex<HashMap<i32, YearSet>>,
}

impl<C: HolidaySource, L: HolidaySource> HolidayOracle<C, L> {
    pub fn new(calendar: C, local: L) -> Self {
        Self {
            calendar,
            local,
            local_by_year: Mutex::new(HashMap::new()),
        }
    }

    /// Every holiday in `year`, from both sources.
    pub fn holiday_set(&self, year: i32) -> HashSet<NaiveDate> {
        let mut set = self.calendar.holidays(year);
        set.extend(self.local_for(year).iter().copied());
        set
    }

    fn local_for(&self, year: i32) -> YearSet {
        let mut cache = self
            .local_by_year
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        cache
            .entry(year)
            .or_insert_with(|| {
                let set = self.local.holidays(year);
                debug!(year, count = set.len(), "loaded local holidays");
                Arc::new(set)
            })
            .clone()
    }
}

impl<C: HolidaySource, L: HolidaySource> HolidayLookup for HolidayOracle<C, L> {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        if self.calendar.holidays(date.year()).contains(&date) {
            return true;
        }
        self.local_for(date.year()).contains(&date)
    }
}
