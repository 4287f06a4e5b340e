//! Pressure sensor entity and its per-site record unpacking.

use std::fmt;

use chrono::NaiveDateTime;
use ndarray::Array1;

use crate::error::{Error, Result};
use crate::mat::MatVar;
use crate::time::datenums_to_datetimes;

/// One zero-up-crossing interval of the free surface: the window defining
/// a single wave realization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpCrossingWindow {
    /// Start sample index into the time-varying data.
    pub start_index: usize,

    /// End sample index into the time-varying data.
    pub end_index: usize,

    /// Timestamp of the window start.
    pub start_time: NaiveDateTime,

    /// Timestamp of the window end.
    pub end_time: NaiveDateTime,
}

/// A pressure sensor at one site along the flume.
#[derive(Debug, Clone)]
pub struct PressureSensor {
    /// 1-based id assigned in source array order.
    pub id: u32,

    /// Symbolic site label, e.g. `site_2`.
    pub location: String,

    /// Converted timestamps for the pressure series.
    pub date_time: Vec<NaiveDateTime>,

    /// Measured pressure series.
    pub pressure: Array1<f64>,

    /// The zero-up-crossing window recorded for this sensor.
    pub up_crossing: UpCrossingWindow,

    /// Measured wave period per realization.
    pub period_realizations: Array1<f64>,

    /// Percent error between applied and measured period, per realization.
    pub percent_err_period: Array1<f64>,
}

impl PressureSensor {
    /// Unpack one per-site record.
    ///
    /// The record layout is a documented precondition: a cell array of
    /// `[timestamps, pressure, window]`, where `window` is a cell array of
    /// `[start/end indices, start/end datenums, periods, percent errors]`.
    ///
    /// # Errors
    ///
    /// Any deviation from that layout fails with a shape error naming the
    /// site and the expected entry.
    pub fn from_site(id: u32, location: impl Into<String>, site: &MatVar) -> Result<Self> {
        let location = location.into();

        let record = site.as_cells().ok_or_else(|| {
            Error::shape_mismatch(format!(
                "pressure record for '{}': expected a [timestamps, pressure, window] cell array, found {}",
                location,
                site.kind_name()
            ))
        })?;

        if record.len() < 3 {
            return Err(Error::shape_mismatch(format!(
                "pressure record for '{}': expected 3 entries, found {}",
                location,
                record.len()
            )));
        }

        let datenums = Self::entry_array(&location, &record[0], "timestamps")?;
        let date_time = datenums_to_datetimes(&datenums.to_array1()?.to_vec())?;

        let pressure = Self::entry_array(&location, &record[1], "pressure")?.to_array1()?;

        let window = Self::unpack_window(&location, &record[2])?;

        let periods = Self::entry_array(&location, &window.cells[2], "wave periods")?.to_array1()?;
        let percent_err =
            Self::entry_array(&location, &window.cells[3], "period percent error")?.to_array1()?;

        Ok(PressureSensor {
            id,
            location,
            date_time,
            pressure,
            up_crossing: window.up_crossing,
            period_realizations: periods,
            percent_err_period: percent_err,
        })
    }

    /// Number of wave realizations in the run, from the count of measured
    /// wave periods. No side effects.
    pub fn num_wave_realizations(&self) -> usize {
        self.period_realizations.len()
    }

    fn entry_array<'a>(
        location: &str,
        entry: &'a MatVar,
        what: &str,
    ) -> Result<&'a crate::mat::MatData> {
        entry.as_array().ok_or_else(|| {
            Error::shape_mismatch(format!(
                "pressure record for '{}': {} entry should be a numeric array, found {}",
                location,
                what,
                entry.kind_name()
            ))
        })
    }

    fn unpack_window<'a>(location: &str, entry: &'a MatVar) -> Result<UnpackedWindow<'a>> {
        let cells = entry.as_cells().ok_or_else(|| {
            Error::shape_mismatch(format!(
                "pressure record for '{}': window entry should be a cell array, found {}",
                location,
                entry.kind_name()
            ))
        })?;

        if cells.len() < 4 {
            return Err(Error::shape_mismatch(format!(
                "pressure record for '{}': window should have 4 entries, found {}",
                location,
                cells.len()
            )));
        }

        let indices = Self::entry_array(location, &cells[0], "up-crossing indices")?;
        let index_values = indices.to_array1()?;
        if index_values.len() != 2 {
            return Err(Error::shape_mismatch(format!(
                "pressure record for '{}': expected 2 up-crossing indices, found {}",
                location,
                index_values.len()
            )));
        }

        let datenums = Self::entry_array(location, &cells[1], "up-crossing datenums")?;
        let datenum_values = datenums.to_array1()?;
        if datenum_values.len() != 2 {
            return Err(Error::shape_mismatch(format!(
                "pressure record for '{}': expected 2 up-crossing datenums, found {}",
                location,
                datenum_values.len()
            )));
        }

        let times = datenums_to_datetimes(&datenum_values.to_vec())?;

        Ok(UnpackedWindow {
            up_crossing: UpCrossingWindow {
                start_index: index_values[0] as usize,
                end_index: index_values[1] as usize,
                start_time: times[0],
                end_time: times[1],
            },
            cells,
        })
    }
}

/// Intermediate view over a validated window record.
struct UnpackedWindow<'a> {
    up_crossing: UpCrossingWindow,
    cells: &'a [MatVar],
}

impl fmt::Display for PressureSensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pressure gauge id: {}\nLocation: {}",
            self.id, self.location
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mat::MatData;

    fn site_record() -> MatVar {
        MatVar::Cells(vec![
            MatVar::Array(MatData::from_vec("date", vec![739_435.0, 739_435.5])),
            MatVar::Array(MatData::from_vec("p", vec![101.3, 101.4])),
            MatVar::Cells(vec![
                MatVar::Array(MatData::from_vec("idx", vec![10.0, 250.0])),
                MatVar::Array(MatData::from_vec("dates", vec![739_435.1, 739_435.4])),
                MatVar::Array(MatData::from_vec("per", vec![7.0, 7.1, 6.9])),
                MatVar::Array(MatData::from_vec("err", vec![0.0, 1.4, -1.4])),
            ]),
        ])
    }

    #[test]
    fn test_from_site() {
        let sensor = PressureSensor::from_site(1, "site_2", &site_record()).unwrap();
        assert_eq!(sensor.id, 1);
        assert_eq!(sensor.location, "site_2");
        assert_eq!(sensor.date_time.len(), 2);
        assert_eq!(sensor.pressure.len(), 2);
        assert_eq!(sensor.up_crossing.start_index, 10);
        assert_eq!(sensor.up_crossing.end_index, 250);
        assert!(sensor.up_crossing.start_time < sensor.up_crossing.end_time);
        assert_eq!(sensor.num_wave_realizations(), 3);
    }

    #[test]
    fn test_from_site_wrong_record_kind() {
        let bad = MatVar::Array(MatData::from_vec("p", vec![1.0]));
        let err = PressureSensor::from_site(1, "site_2", &bad).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("site_2"));
        assert!(msg.contains("cell array"));
    }

    #[test]
    fn test_from_site_short_window() {
        let bad = MatVar::Cells(vec![
            MatVar::Array(MatData::from_vec("date", vec![739_435.0])),
            MatVar::Array(MatData::from_vec("p", vec![101.3])),
            MatVar::Cells(vec![MatVar::Array(MatData::from_vec("idx", vec![1.0, 2.0]))]),
        ]);
        let err = PressureSensor::from_site(2, "site_4", &bad).unwrap_err();
        assert!(err.to_string().contains("4 entries"));
    }
}
