//! Booking targets: which booking page to open and which slot to pick.

use std::fmt;

use super::SlotTime;

/// The class of booking page a reservation goes through.
///
/// The facility publishes weekday evening slots and weekend/holiday morning
/// slots under two different sport listings, so each class maps to its own
/// endpoint URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointClass {
    /// Monday to Friday, non-holiday.
    Weekday,
    /// Saturdays, Sundays and holidays.
    WeekendOrHoliday,
}

impl EndpointClass {
    /// Short name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointClass::Weekday => "weekday",
            EndpointClass::WeekendOrHoliday => "weekend-or-holiday",
        }
    }
}

impl fmt::Display for EndpointClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The slot a booking attempt must reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub endpoint: EndpointClass,
    pub time_of_day: SlotTime,
}

impl Target {
    pub fn new(endpoint: EndpointClass, time_of_day: SlotTime) -> Self {
        Self {
            endpoint,
            time_of_day,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.endpoint, self.time_of_day)
    }
}

/// Result of applying the booking policy to a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Book this target.
    Book(Target),
    /// The policy forbids booking on this date.
    NoBooking,
}

impl Decision {
    /// The target to book, if any.
    pub fn target(&self) -> Option<&Target> {
        match self {
            Decision::Book(target) => Some(target),
            Decision::NoBooking => None,
        }
    }
}
