//! Wave gauge entity and its fixed id→type table.

use std::fmt;

use ndarray::Array1;

use crate::error::{Error, Result};
use crate::signal;
use crate::time::TimeSeries;

/// Hardware category of a wave gauge, fixed by the flume's gauge map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GaugeKind {
    /// Self-calibrating resistance gauge (ids 1–3).
    SelfCalibrating,

    /// Fixed resistance gauge (ids 4–11).
    Fixed,

    /// Ultrasonic gauge (ids 12–17).
    Ultrasonic,
}

impl GaugeKind {
    /// Look up the kind for a hardware gauge id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownGaugeId`] for ids outside 1..=17; there is
    /// no default category.
    pub fn from_gauge_id(id: u32) -> Result<Self> {
        match id {
            1..=3 => Ok(GaugeKind::SelfCalibrating),
            4..=11 => Ok(GaugeKind::Fixed),
            12..=17 => Ok(GaugeKind::Ultrasonic),
            _ => Err(Error::unknown_gauge_id(id)),
        }
    }

    /// The category name as used in the original dataset notes.
    pub fn as_str(&self) -> &'static str {
        match self {
            GaugeKind::SelfCalibrating => "self_calibrating",
            GaugeKind::Fixed => "fixed",
            GaugeKind::Ultrasonic => "ultrasonic",
        }
    }
}

impl fmt::Display for GaugeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed-location sensor measuring water-surface elevation over time.
///
/// Constructed once per sensor while a run loads; the gauge kind is derived
/// from the id immediately and the series are read-only thereafter.
#[derive(Debug, Clone)]
pub struct WaveGauge {
    /// 1-based hardware id, assigned in source array order.
    pub id: u32,

    /// (x, y) location in flume coordinates.
    pub location: (f64, f64),

    /// Measured surface elevation disturbance, aligned to `date_time`.
    pub eta: Array1<f64>,

    /// Timestamps shared with the owning run.
    pub date_time: TimeSeries,

    kind: GaugeKind,
}

impl WaveGauge {
    /// Construct a gauge; the kind is looked up from `id` immediately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownGaugeId`] when `id` has no entry in the
    /// hardware table.
    pub fn new(
        id: u32,
        location: (f64, f64),
        eta: Array1<f64>,
        date_time: TimeSeries,
    ) -> Result<Self> {
        let kind = GaugeKind::from_gauge_id(id)?;
        Ok(WaveGauge {
            id,
            location,
            eta,
            date_time,
            kind,
        })
    }

    /// The gauge's hardware category.
    pub fn kind(&self) -> GaugeKind {
        self.kind
    }

    /// Number of recorded samples.
    pub fn num_times(&self) -> usize {
        self.eta.len()
    }

    /// Moving-average smoothed elevation series (valid mode).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWindow`] for a window of zero or larger than
    /// the series.
    pub fn smoothed_eta(&self, window: usize) -> Result<Array1<f64>> {
        signal::moving_average(&self.eta, window)
    }
}

impl fmt::Display for WaveGauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wave Gauge Type: {}\nGauge Id: {}\nLocation: ({}, {})",
            self.kind, self.id, self.location.0, self.location.1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::sync::Arc;

    fn empty_times() -> TimeSeries {
        Arc::from(Vec::new().into_boxed_slice())
    }

    #[test]
    fn test_kind_table_exact() {
        for id in 1..=3 {
            assert_eq!(GaugeKind::from_gauge_id(id).unwrap(), GaugeKind::SelfCalibrating);
        }
        for id in 4..=11 {
            assert_eq!(GaugeKind::from_gauge_id(id).unwrap(), GaugeKind::Fixed);
        }
        for id in 12..=17 {
            assert_eq!(GaugeKind::from_gauge_id(id).unwrap(), GaugeKind::Ultrasonic);
        }
    }

    #[test]
    fn test_kind_outside_table_fails() {
        for id in [0, 18, 100] {
            assert!(GaugeKind::from_gauge_id(id).is_err());
        }
    }

    #[test]
    fn test_construction_outside_table_fails() {
        let result = WaveGauge::new(18, (0.0, 0.0), array![0.0], empty_times());
        assert!(matches!(result, Err(Error::UnknownGaugeId { id: 18 })));
    }

    #[test]
    fn test_kind_set_at_construction() {
        let gauge = WaveGauge::new(12, (3.5, 0.5), array![0.1, 0.2], empty_times()).unwrap();
        assert_eq!(gauge.kind(), GaugeKind::Ultrasonic);
        assert_eq!(gauge.kind().as_str(), "ultrasonic");
        assert_eq!(gauge.num_times(), 2);
    }
}
