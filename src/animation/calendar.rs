/*
Copyright 2021 - 2022 Jakub Lewandowski

This file is part of Pressure-level Wind Animation (PRSWND).

Pressure-level Wind Animation (PRSWND) is a free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation; either version 3 of the License, or
(at your option) any later version.

Pressure-level Wind Animation (PRSWND) is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with Pressure-level Wind Animation (PRSWND). If not, see https://www.gnu.org/licenses/.
*/

//! Decoding of CF-style numeric time coordinates
//! (`<units> since <reference>`) into calendar timestamps.

use crate::errors::InputError;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Largest offset (in seconds) from the reference that `Duration` can hold.
const MAX_OFFSET_SECONDS: i64 = i64::MAX / 1000;

const REFERENCE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Converts time coordinate values to timestamps.
///
/// Values are rounded to the nearest second, so exact comparison
/// with timestamps from configuration is meaningful.
pub fn decode_times(values: &[f64], units: &str) -> Result<Vec<NaiveDateTime>, InputError> {
    let (unit_seconds, reference) = parse_units(units)?;

    values
        .iter()
        .map(|&value| {
            let seconds = value * unit_seconds;

            if !seconds.is_finite() {
                return Err(InputError::InvalidTimeValue(value));
            }

            // float to int cast saturates, range check is exact on integers
            let seconds = seconds.round() as i64;

            if !(-MAX_OFFSET_SECONDS..=MAX_OFFSET_SECONDS).contains(&seconds) {
                return Err(InputError::InvalidTimeValue(value));
            }

            reference
                .checked_add_signed(Duration::seconds(seconds))
                .ok_or(InputError::InvalidTimeValue(value))
        })
        .collect()
}

/// Finds the index of time coordinate exactly equal to the target.
pub fn find_time_index(times: &[NaiveDateTime], target: NaiveDateTime) -> Result<usize, InputError> {
    times
        .iter()
        .position(|&time| time == target)
        .ok_or(InputError::TimeNotFound(target))
}

/// Splits units attribute into length of the unit in seconds
/// and the reference timestamp.
fn parse_units(units: &str) -> Result<(f64, NaiveDateTime), InputError> {
    let unsupported = || InputError::UnsupportedTimeUnits(units.to_string());

    let (unit, reference) = units.trim().split_once(" since ").ok_or_else(unsupported)?;

    let unit_seconds = match unit.trim().to_lowercase().as_str() {
        "seconds" | "second" | "secs" | "sec" | "s" => 1.0,
        "minutes" | "minute" | "mins" | "min" => 60.0,
        "hours" | "hour" | "hrs" | "hr" | "h" => 3600.0,
        "days" | "day" | "d" => 86_400.0,
        _ => return Err(unsupported()),
    };

    let reference = reference
        .trim()
        .trim_end_matches("UTC")
        .trim_end_matches('Z')
        .trim();

    let reference = REFERENCE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(reference, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(reference, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(unsupported)?;

    Ok((unit_seconds, reference))
}
