//! Signed durations in the `[-][d.]hh:mm[:ss[.fffffff]]` notation.
//!
//! Time fields store elapsed time rather than a time of day, so a value may
//! run past 24 hours (`"1.02:03:04"`) or be negative. Fractions carry up to
//! seven digits (100 ns ticks).

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const NANOS_PER_TICK: i64 = 100;
const FRACTION_DIGITS: usize = 7;

/// A time field value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSpan(TimeDelta);

/// Text that is not a valid time span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time span: {input}")]
pub struct ParseTimeSpanError {
    input: String,
}

impl TimeSpan {
    pub fn new(delta: TimeDelta) -> Self {
        Self(delta)
    }

    pub fn as_delta(&self) -> TimeDelta {
        self.0
    }
}

impl From<TimeDelta> for TimeSpan {
    fn from(delta: TimeDelta) -> Self {
        Self(delta)
    }
}

impl FromStr for TimeSpan {
    type Err = ParseTimeSpanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).map(TimeSpan).ok_or_else(|| ParseTimeSpanError {
            input: s.to_string(),
        })
    }
}

fn parse(s: &str) -> Option<TimeDelta> {
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let mut sections = body.split(':');
    let head = sections.next()?;
    let minutes = component(sections.next()?, 59)?;
    let seconds = sections.next();
    if sections.next().is_some() {
        return None;
    }

    let (days, hours) = match head.split_once('.') {
        Some((days, hours)) => (digits(days)?, component(hours, 23)?),
        None => (0, component(head, 23)?),
    };

    let (seconds, nanos) = match seconds {
        None => (0, 0),
        Some(seconds) => match seconds.split_once('.') {
            Some((whole, fraction)) => (component(whole, 59)?, fraction_nanos(fraction)?),
            None => (component(seconds, 59)?, 0),
        },
    };

    let delta = TimeDelta::try_days(days)?
        .checked_add(&TimeDelta::try_hours(hours)?)?
        .checked_add(&TimeDelta::try_minutes(minutes)?)?
        .checked_add(&TimeDelta::try_seconds(seconds)?)?
        .checked_add(&TimeDelta::nanoseconds(nanos))?;

    Some(if negative { -delta } else { delta })
}

fn digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn component(s: &str, max: i64) -> Option<i64> {
    digits(s).filter(|value| *value <= max)
}

fn fraction_nanos(s: &str) -> Option<i64> {
    if s.len() > FRACTION_DIGITS {
        return None;
    }
    let ticks = digits(s)?;
    let scale = 10_i64.pow((FRACTION_DIGITS - s.len()) as u32);
    Some(ticks * scale * NANOS_PER_TICK)
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < TimeDelta::zero() {
            f.write_str("-")?;
        }
        let magnitude = self.0.abs();
        let total = magnitude.num_seconds();
        let (days, hours) = (total / 86_400, total / 3_600 % 24);
        let (minutes, seconds) = (total / 60 % 60, total % 60);

        if days > 0 {
            write!(f, "{days}.")?;
        }
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")?;

        let ticks = i64::from(magnitude.subsec_nanos()) / NANOS_PER_TICK;
        if ticks > 0 {
            write!(f, ".{ticks:07}")?;
        }
        Ok(())
    }
}

impl Serialize for TimeSpan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSpan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
