//! Date policy: which slot to book on a given day, if any.
//!
//! Rules, first match wins:
//!
//! 1. Sundays in August: no booking (the facility closes them).
//! 2. Holidays: the weekend/holiday listing, morning slot.
//! 3. Monday to Friday: the weekday listing, evening slot.
//! 4. Remaining weekends: the weekend/holiday listing, morning slot.
//!
//! The August exclusion must come first so that it also overrides
//! holidays falling on an August Sunday.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::{Decision, EndpointClass, SlotTime, Target};
use crate::holidays::HolidayLookup;

/// Evening slot on weekdays.
pub const WEEKDAY_SLOT: SlotTime = SlotTime::new(20, 30);

/// Morning slot on weekends and holidays.
pub const MORNING_SLOT: SlotTime = SlotTime::new(13, 30);

/// Month whose Sundays are never booked.
const EXCLUDED_MONTH: u32 = 8;

/// Slot times used for each endpoint class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSchedule {
    pub weekday: SlotTime,
    pub weekend_or_holiday: SlotTime,
}

impl Default for SlotSchedule {
    fn default() -> Self {
        Self {
            weekday: WEEKDAY_SLOT,
            weekend_or_holiday: MORNING_SLOT,
        }
    }
}

/// Apply the booking rules to a date whose holiday status is known.
///
/// This is a pure function; see [`DatePolicy`] for the variant that looks
/// up holiday status itself.
pub fn decide(date: NaiveDate, is_holiday: bool, schedule: &SlotSchedule) -> Decision {
    let weekday = date.weekday();

    if date.month() == EXCLUDED_MONTH && weekday == Weekday::Sun {
        return Decision::NoBooking;
    }

    let weekend = Target::new(EndpointClass::WeekendOrHoliday, schedule.weekend_or_holiday);

    if is_holiday {
        return Decision::Book(weekend);
    }

    match weekday {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu | Weekday::Fri => {
            Decision::Book(Target::new(EndpointClass::Weekday, schedule.weekday))
        }
        Weekday::Sat | Weekday::Sun => Decision::Book(weekend),
    }
}

/// Resolves dates to booking decisions using a holiday lookup.
pub struct DatePolicy<H> {
    holidays: H,
    schedule: SlotSchedule,
}

impl<H: HolidayLookup> DatePolicy<H> {
    pub fn new(holidays: H) -> Self {
        Self {
            holidays,
            schedule: SlotSchedule::default(),
        }
    }

    /// Use a different slot schedule.
    pub fn with_schedule(mut self, schedule: SlotSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// What to book on `date`.
    ///
    /// Holiday status is only looked up when the August exclusion does
    /// not already apply.
    pub fn resolve(&self, date: NaiveDate) -> Decision {
        if date.month() == EXCLUDED_MONTH && date.weekday() == Weekday::Sun {
            return Decision::NoBooking;
        }
        decide(date, self.holidays.is_holiday(date), &self.schedule)
    }

    pub fn schedule(&self) -> &SlotSchedule {
        &self.schedule
    }
}
