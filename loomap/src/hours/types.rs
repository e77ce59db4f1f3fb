//! Opening-hours type definitions

use chrono::NaiveTime;

/// Number of weekdays in a schedule, indexed 0 = Monday.
pub const DAYS_PER_WEEK: usize = 7;

/// Display names for weekday indices 0..=6 (0 = Monday).
pub const WEEKDAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Opening state of a single weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeSpec {
    /// Open between two times on the same day (half-open interval)
    Range { open: NaiveTime, close: NaiveTime },
    /// Explicitly closed all day
    Closed,
    /// No usable information for this day
    #[default]
    Unknown,
}

impl RangeSpec {
    /// Display label for this day's hours.
    ///
    /// Presentation only; open/closed decisions go through
    /// [`WeeklySchedule::is_open`](super::WeeklySchedule::is_open).
    pub fn describe(&self) -> String {
        match self {
            RangeSpec::Range { open, close } => {
                format!("{} - {}", open.format("%H:%M"), close.format("%H:%M"))
            }
            RangeSpec::Closed => "Closed".to_string(),
            RangeSpec::Unknown => "Unknown".to_string(),
        }
    }
}

/// Tri-state answer to "is this facility open at a given instant".
///
/// `Unknown` means the schedule holds no usable information for that
/// weekday; it is distinct from `Closed` and must never be collapsed into
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenState {
    Open,
    Closed,
    Unknown,
}
