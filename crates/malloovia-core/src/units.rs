//! Time-unit conversions for prices and performances.
//!
//! Mirrors the five time units recognised by a malloovia problem document:
//! second, minute, hour, day and year, with the conversion ratios used to
//! scale prices and performance rates onto a problem's timeslot unit.

use crate::error::MallooviaError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A unit of time a price, performance rate or workload is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Year,
}

impl TimeUnit {
    /// Seconds contained in one unit of `self`.
    fn seconds(self) -> f64 {
        match self {
            TimeUnit::Second => 1.0,
            TimeUnit::Minute => 60.0,
            TimeUnit::Hour => 3600.0,
            TimeUnit::Day => 86_400.0,
            TimeUnit::Year => 31_536_000.0,
        }
    }

    /// Parses the single-letter codes used in problem documents:
    /// `s`, `m`, `h`, `d`, `y`.
    pub fn parse(code: &str) -> Result<Self, MallooviaError> {
        match code {
            "s" => Ok(TimeUnit::Second),
            "m" => Ok(TimeUnit::Minute),
            "h" => Ok(TimeUnit::Hour),
            "d" => Ok(TimeUnit::Day),
            "y" => Ok(TimeUnit::Year),
            other => Err(MallooviaError::InvalidTimeUnit(other.to_string())),
        }
    }

    /// Conversion factor `to(from, to)` such that `value_in_to = value_in_from * factor`,
    /// for a quantity measured *per unit time* (a rate, e.g. a price or a
    /// performance value).
    pub fn to(from: TimeUnit, to: TimeUnit) -> f64 {
        from.seconds() / to.seconds()
    }

    /// Scales a price from `unit_of_x` to `timeslot_unit`.
    ///
    /// A price of `x` per `unit_of_x` becomes, per `timeslot_unit`,
    /// `x * (seconds(timeslot_unit) / seconds(unit_of_x))`.
    pub fn scale_price(x: f64, unit_of_x: TimeUnit, timeslot_unit: TimeUnit) -> f64 {
        x * (timeslot_unit.seconds() / unit_of_x.seconds())
    }

    /// Scales a performance rate from `unit_of_x` to `timeslot_unit`.
    ///
    /// Performance is already expressed as a rate (requests served per
    /// `unit_of_x`), so it scales the same way a price does: a performance
    /// of `x` per `unit_of_x` becomes, per `timeslot_unit`,
    /// `x * (seconds(timeslot_unit) / seconds(unit_of_x))`.
    pub fn scale_performance(x: f64, unit_of_x: TimeUnit, timeslot_unit: TimeUnit) -> f64 {
        Self::scale_price(x, unit_of_x, timeslot_unit)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            TimeUnit::Second => "s",
            TimeUnit::Minute => "m",
            TimeUnit::Hour => "h",
            TimeUnit::Day => "d",
            TimeUnit::Year => "y",
        };
        write!(f, "{code}")
    }
}
