//! Weekly opening-hours parsing and evaluation
//!
//! Parses the compact schedule string stored in a record's `opening`
//! property into a per-weekday table, and answers "is this open at a given
//! instant" as a tri-state.
//!
//! # Format
//!
//! Entries separated by `;` or newlines, each `<days> <times>`:
//!
//! ```text
//! Mo-Fr 09:00-17:00; Sa 10:00-16:00; Su closed
//! ```
//!
//! - `<days>` is a single weekday or an inclusive range. Two-letter
//!   abbreviations (`Mo`..`Su`) and full English names are accepted,
//!   case-insensitive. Ranges may wrap the week end (`Sa-Mo`).
//! - `<times>` is `HH:MM-HH:MM` in 24-hour time (spaces around the dash
//!   are tolerated), or the sentinel `closed`.
//!
//! Parsing never fails outright: a malformed entry degrades only the days
//! it names to [`RangeSpec::Unknown`] and the rest of the schedule stands.
//! Partial schedules are the common case in crowd-sourced data, so one bad
//! day must not discard six good ones. Ranges that cross midnight
//! (`close <= open`) are outside the model and also degrade to `Unknown`.
//!
//! Weekday indexing is 0 = Monday throughout (ISO weekday minus one).

mod types;

pub use types::{OpenState, RangeSpec, DAYS_PER_WEEK, WEEKDAY_NAMES};


use chrono::{DateTime, Datelike, NaiveTime, TimeZone};
use tracing::debug;

/// Sentinel marking a day as explicitly closed.
const CLOSED_SENTINEL: &str = "closed";

/// A parsed weekly schedule, one [`RangeSpec`] per weekday (0 = Monday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeeklySchedule {
    days: [RangeSpec; DAYS_PER_WEEK],
}

impl WeeklySchedule {
    /// Parse a compact schedule string.
    ///
    /// Never fails; unparseable entries degrade the affected days to
    /// [`RangeSpec::Unknown`]. Later entries for the same day overwrite
    /// earlier ones.
    pub fn parse(input: &str) -> Self {
        let mut days = [RangeSpec::Unknown; DAYS_PER_WEEK];

        for entry in input.split([';', '\n']) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            match parse_entry(entry) {
                Some((day_indices, spec)) => {
                    for index in day_indices {
                        days[index] = spec;
                    }
                }
                None => {
                    debug!(entry, "unparseable opening-hours entry, degrading to unknown");
                }
            }
        }

        Self { days }
    }

    /// The [`RangeSpec`] for a weekday index (0 = Monday).
    ///
    /// Returns [`RangeSpec::Unknown`] for an out-of-range index.
    pub fn day(&self, index: usize) -> RangeSpec {
        self.days.get(index).copied().unwrap_or_default()
    }

    /// Evaluate the open/closed state at an instant.
    ///
    /// The instant's own timezone supplies the local weekday and time of
    /// day. The interval is half-open: at exactly the closing time the
    /// state is `Closed`.
    pub fn is_open<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> OpenState {
        let weekday = instant.weekday().num_days_from_monday() as usize;
        let time = instant.time();

        match self.day(weekday) {
            RangeSpec::Unknown => OpenState::Unknown,
            RangeSpec::Closed => OpenState::Closed,
            RangeSpec::Range { open, close } => {
                if open <= time && time < close {
                    OpenState::Open
                } else {
                    OpenState::Closed
                }
            }
        }
    }
}

/// Parse one `<days> <times>` entry. Returns `None` if either half is
/// malformed.
fn parse_entry(entry: &str) -> Option<(Vec<usize>, RangeSpec)> {
    let (day_part, time_part) = entry.split_once(char::is_whitespace)?;
    let day_indices = parse_days(day_part.trim())?;
    let spec = parse_times(time_part.trim())?;
    Some((day_indices, spec))
}

/// Parse a weekday or inclusive weekday range into indices (0 = Monday).
///
/// Ranges may wrap the end of the week: `Sa-Mo` is Saturday, Sunday,
/// Monday.
fn parse_days(token: &str) -> Option<Vec<usize>> {
    if let Some((start_token, end_token)) = token.split_once('-') {
        let start = day_index(start_token.trim())?;
        let end = day_index(end_token.trim())?;
        let mut indices = vec![start];
        let mut current = start;
        while current != end {
            current = (current + 1) % DAYS_PER_WEEK;
            indices.push(current);
        }
        Some(indices)
    } else {
        Some(vec![day_index(token)?])
    }
}

/// Weekday index (0 = Monday) from a two-letter abbreviation or full name.
fn day_index(token: &str) -> Option<usize> {
    let lowered = token.to_ascii_lowercase();
    let index = match lowered.as_str() {
        "mo" | "monday" => 0,
        "tu" | "tuesday" => 1,
        "we" | "wednesday" => 2,
        "th" | "thursday" => 3,
        "fr" | "friday" => 4,
        "sa" | "saturday" => 5,
        "su" | "sunday" => 6,
        _ => return None,
    };
    Some(index)
}

/// Parse the time half of an entry: `HH:MM-HH:MM` or the closed sentinel.
///
/// Zero-length and midnight-crossing ranges (`close <= open`) are not
/// representable in this model and parse to `None`.
fn parse_times(token: &str) -> Option<RangeSpec> {
    if token.eq_ignore_ascii_case(CLOSED_SENTINEL) {
        return Some(RangeSpec::Closed);
    }

    let (open_token, close_token) = token.split_once('-')?;
    let open = NaiveTime::parse_from_str(open_token.trim(), "%H:%M").ok()?;
    let close = NaiveTime::parse_from_str(close_token.trim(), "%H:%M").ok()?;
    if open >= close {
        return None;
    }
    Some(RangeSpec::Range { open, close })
}
