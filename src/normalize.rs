//! Turns raw clock readings into onset/duration offsets.
//!
//! Clock times in the seizure lists carry no date, so they are placed on a
//! single synthetic calendar day before subtracting. A seizure that starts
//! after midnight of an evening registration therefore yields a negative
//! onset; that case is clamped to zero, which loses the true offset.

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::RawClockTime;

/// Placeholder day used only for subtraction, never reported
const SYNTHETIC_YEAR: i32 = 1900;
const SYNTHETIC_MONTH: u32 = 1;
const SYNTHETIC_DAY: u32 = 1;

/// Result of normalizing one seizure
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalized {
    /// Usable interval; `raw_onset` is kept when clamping happened
    Interval {
        onset_seconds: f64,
        duration_seconds: f64,
        raw_onset: Option<f64>,
    },
    /// Seizure end is not after its start
    NonPositiveDuration { duration_seconds: f64 },
}

fn on_synthetic_day(time: RawClockTime) -> NaiveDateTime {
    let day = NaiveDate::from_ymd_opt(SYNTHETIC_YEAR, SYNTHETIC_MONTH, SYNTHETIC_DAY)
        .unwrap_or_default();
    day.and_time(time.to_naive_time())
}

/// Seconds elapsed from `from` to `to` on the synthetic day (may be negative)
pub fn elapsed_seconds(from: RawClockTime, to: RawClockTime) -> f64 {
    let delta = on_synthetic_day(to) - on_synthetic_day(from);
    delta.num_seconds() as f64
}

/// Computes onset relative to registration start and seizure duration.
///
/// Duration is checked first: a non-positive duration discards the event
/// whatever its onset. A negative onset is clamped to `0.0`.
pub fn normalize_interval(
    registration_start: RawClockTime,
    seizure_start: RawClockTime,
    seizure_end: RawClockTime,
) -> Normalized {
    let duration_seconds = elapsed_seconds(seizure_start, seizure_end);
    if duration_seconds <= 0.0 {
        return Normalized::NonPositiveDuration { duration_seconds };
    }

    let onset = elapsed_seconds(registration_start, seizure_start);
    if onset < 0.0 {
        Normalized::Interval {
            onset_seconds: 0.0,
            duration_seconds,
            raw_onset: Some(onset),
        }
    } else {
        Normalized::Interval {
            onset_seconds: onset,
            duration_seconds,
            raw_onset: None,
        }
    }
}
