//! Time-of-day labels for bookable slots.

use std::fmt;

/// Error returned when parsing an invalid slot time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid slot time: {reason}")]
pub struct InvalidSlotTime {
    reason: &'static str,
}

/// A slot start time as rendered in the booking grid, e.g. `20:30`.
///
/// The booking site labels each slot with a zero-padded 24-hour `HH:MM`
/// string, and the orchestrator finds the slot by matching that text
/// exactly. This type guarantees the label is well formed.
///
/// # Examples
///
/// ```
/// use rivas_bot::domain::SlotTime;
///
/// let evening = SlotTime::parse("20:30").unwrap();
/// assert_eq!(evening.as_str(), "20:30");
/// assert_eq!(evening.hour(), 20);
///
/// // Not zero padded
/// assert!(SlotTime::parse("9:30").is_err());
/// // Out of range
/// assert!(SlotTime::parse("24:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotTime([u8; 5]);

impl SlotTime {
    /// Build a slot time from its components.
    ///
    /// Panics if the time is out of range; in a `const` item this is a
    /// compile-time error.
    pub const fn new(hour: u8, minute: u8) -> Self {
        assert!(hour < 24, "hour must be 00-23");
        assert!(minute < 60, "minute must be 00-59");
        SlotTime([
            b'0' + hour / 10,
            b'0' + hour % 10,
            b':',
            b'0' + minute / 10,
            b'0' + minute % 10,
        ])
    }

    /// Parse a slot time from an `HH:MM` string.
    pub fn parse(s: &str) -> Result<Self, InvalidSlotTime> {
        let bytes = s.as_bytes();

        if bytes.len() != 5 {
            return Err(InvalidSlotTime {
                reason: "must be exactly 5 characters (HH:MM)",
            });
        }

        if bytes[2] != b':' {
            return Err(InvalidSlotTime {
                reason: "hours and minutes must be separated by ':'",
            });
        }

        let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(InvalidSlotTime {
                reason: "hours and minutes must be digits",
            });
        }

        let hour = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
        let minute = (bytes[3] - b'0') * 10 + (bytes[4] - b'0');

        if hour > 23 {
            return Err(InvalidSlotTime {
                reason: "hour must be 00-23",
            });
        }
        if minute > 59 {
            return Err(InvalidSlotTime {
                reason: "minute must be 00-59",
            });
        }

        Ok(SlotTime([bytes[0], bytes[1], b':', bytes[3], bytes[4]]))
    }

    /// Returns the label as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: We only store ASCII digits and ':'
        std::str::from_utf8(&self.0).unwrap()
    }

    /// Hour component (0-23).
    pub fn hour(&self) -> u8 {
        (self.0[0] - b'0') * 10 + (self.0[1] - b'0')
    }

    /// Minute component (0-59).
    pub fn minute(&self) -> u8 {
        (self.0[3] - b'0') * 10 + (self.0[4] - b'0')
    }
}

impl fmt::Debug for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotTime({})", self.as_str())
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        assert!(SlotTime::parse("00:00").is_ok());
        assert!(SlotTime::parse("13:30").is_ok());
        assert!(SlotTime::parse("20:30").is_ok());
        assert!(SlotTime::parse("23:59").is_ok());
    }

    #[test]
    fn reject_bad_shape() {
        assert!(SlotTime::parse("").is_err());
        assert!(SlotTime::parse("9:30").is_err());
        assert!(SlotTime::parse("20.30").is_err());
        assert!(SlotTime::parse("20:3a").is_err());
        assert!(SlotTime::parse("20:300").is_err());
    }

    #[test]
    fn reject_out_of_range() {
        assert!(SlotTime::parse("24:00").is_err());
        assert!(SlotTime::parse("12:60").is_err());
        assert!(SlotTime::parse("99:99").is_err());
    }

    #[test]
    fn components() {
        let t = SlotTime::parse("13:30").unwrap();
        assert_eq!(t.hour(), 13);
        assert_eq!(t.minute(), 30);
    }

    #[test]
    fn new_matches_parse() {
        assert_eq!(SlotTime::new(20, 30), SlotTime::parse("20:30").unwrap());
        assert_eq!(SlotTime::new(9, 5).as_str(), "09:05");
    }

    #[test]
    #[should_panic]
    fn new_rejects_out_of_range() {
        let _ = SlotTime::new(24, 0);
    }

    #[test]
    fn display_and_debug() {
        let t = SlotTime::parse("20:30").unwrap();
        assert_eq!(format!("{}", t), "20:30");
        assert_eq!(format!("{:?}", t), "SlotTime(20:30)");
    }

    #[test]
    fn ordering_follows_clock() {
        let morning = SlotTime::parse("13:30").unwrap();
        let evening = SlotTime::parse("20:30").unwrap();
        assert!(morning < evening);
    }
}
