//! MATLAB serial date number conversion.
//!
//! MATLAB datenums count days since year 0000, and MATLAB treats year 0000
//! as a leap year, so its epoch sits 366 days before the proleptic
//! calendar's day 1 (0001-01-01). Conversion shifts by 365 days, splits the
//! remainder into whole and fractional days, and subtracts the final day to
//! correct for ordinal numbering starting at 1.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use ndarray::Array1;

use crate::error::{Error, Result};

/// A timestamp series shared between a run and its sensors.
pub type TimeSeries = Arc<[NaiveDateTime]>;

/// Days MATLAB's epoch leads the proleptic ordinal epoch, before the
/// final one-day ordinal correction.
const MATLAB_EPOCH_SHIFT_DAYS: f64 = 365.0;

/// Seconds in one day.
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert one MATLAB datenum to a calendar timestamp.
///
/// # Errors
///
/// Returns [`Error::DatenumOutOfRange`] for non-finite values or values
/// whose day count falls outside the representable calendar.
///
/// # Example
///
/// ```
/// use barsed::time::datenum_to_datetime;
/// use chrono::NaiveDate;
///
/// // datenum(0001-01-01) == 367 in MATLAB
/// let ts = datenum_to_datetime(367.0)?;
/// assert_eq!(ts.date(), NaiveDate::from_ymd_opt(1, 1, 1).unwrap());
/// # Ok::<(), barsed::Error>(())
/// ```
pub fn datenum_to_datetime(datenum: f64) -> Result<NaiveDateTime> {
    let days = datenum - MATLAB_EPOCH_SHIFT_DAYS;

    if !days.is_finite() || days.floor() < i32::MIN as f64 || days.floor() > i32::MAX as f64 {
        return Err(Error::DatenumOutOfRange { datenum });
    }

    let whole = days.floor() as i32;
    let frac = days - days.floor();

    let date = NaiveDate::from_num_days_from_ce_opt(whole)
        .ok_or(Error::DatenumOutOfRange { datenum })?;

    let frac_micros = (frac * SECONDS_PER_DAY * 1e6).round() as i64;

    Ok(date.and_time(NaiveTime::MIN) + Duration::microseconds(frac_micros) - Duration::days(1))
}

/// Convert a slice of MATLAB datenums, preserving order.
///
/// # Errors
///
/// Fails on the first out-of-range value.
pub fn datenums_to_datetimes(datenums: &[f64]) -> Result<Vec<NaiveDateTime>> {
    datenums.iter().copied().map(datenum_to_datetime).collect()
}

/// Recover the MATLAB datenum for a calendar timestamp.
///
/// Inverse of [`datenum_to_datetime`] to within sub-day floating tolerance.
pub fn datetime_to_datenum(timestamp: NaiveDateTime) -> f64 {
    let whole_days = timestamp.date().num_days_from_ce() as f64;
    let frac = (timestamp.time().num_seconds_from_midnight() as f64
        + timestamp.time().nanosecond() as f64 * 1e-9)
        / SECONDS_PER_DAY;

    whole_days + frac + MATLAB_EPOCH_SHIFT_DAYS + 1.0
}

/// Seconds elapsed since the first timestamp, one entry per timestamp.
///
/// Returns an empty array for an empty series.
pub fn elapsed_seconds(times: &[NaiveDateTime]) -> Array1<f64> {
    match times.first() {
        Some(&start) => times
            .iter()
            .map(|&t| (t - start).num_milliseconds() as f64 * 1e-3)
            .collect(),
        None => Array1::zeros(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_anchors() {
        // MATLAB: datenum(0001, 1, 1) == 367
        let ts = datenum_to_datetime(367.0).unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(1, 1, 1).unwrap());
        assert_eq!(ts.time(), NaiveTime::MIN);

        // One day earlier lands on 0000-12-31
        let ts = datenum_to_datetime(366.0).unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(0, 12, 31).unwrap());
    }

    #[test]
    fn test_fractional_day() {
        let ts = datenum_to_datetime(367.25).unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(1, 1, 1).unwrap());
        assert_eq!(ts.time(), NaiveTime::from_hms_opt(6, 0, 0).unwrap());
    }

    #[test]
    fn test_round_trip() {
        for &datenum in &[367.0, 700_000.123, 739_435.999, 738_886.5] {
            let ts = datenum_to_datetime(datenum).unwrap();
            let back = datetime_to_datenum(ts);
            assert_relative_eq!(back, datenum, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(datenum_to_datetime(f64::NAN).is_err());
        assert!(datenum_to_datetime(f64::INFINITY).is_err());
        assert!(datenum_to_datetime(1e18).is_err());
    }

    #[test]
    fn test_order_preserved() {
        let input = vec![739_435.0, 739_435.5, 739_436.0];
        let times = datenums_to_datetimes(&input).unwrap();
        assert_eq!(times.len(), 3);
        assert!(times[0] < times[1] && times[1] < times[2]);
    }

    #[test]
    fn test_elapsed_seconds() {
        let times = datenums_to_datetimes(&[739_435.0, 739_435.5, 739_436.0]).unwrap();
        let elapsed = elapsed_seconds(&times);
        assert_relative_eq!(elapsed[0], 0.0);
        assert_relative_eq!(elapsed[1], 43_200.0);
        assert_relative_eq!(elapsed[2], 86_400.0);
    }
}
