//! Wave-maker piston entity.

use std::fmt;

use ndarray::Array1;

use crate::error::Result;
use crate::signal;
use crate::time::{self, TimeSeries};

/// The piston mechanism generating waves.
///
/// Reports the surface elevation at its own face and its moving
/// cross-shore position relative to the start position `x = 0`. At most
/// one exists per run.
#[derive(Debug, Clone)]
pub struct WaveMaker {
    /// Free-surface elevation at the face of the piston.
    pub eta_wm: Array1<f64>,

    /// Cross-shore position of the piston face.
    pub position: Array1<f64>,

    /// Timestamps shared with the owning run.
    pub date_time: TimeSeries,

    num_times: usize,
}

impl WaveMaker {
    /// Construct a wave maker; `num_times` is derived from the elevation
    /// series. The position series is not cross-checked against it.
    pub fn new(eta_wm: Array1<f64>, position: Array1<f64>, date_time: TimeSeries) -> Self {
        let num_times = eta_wm.len();
        WaveMaker {
            eta_wm,
            position,
            date_time,
            num_times,
        }
    }

    /// Number of recorded times.
    pub fn num_times(&self) -> usize {
        self.num_times
    }

    /// Piston velocity by finite differences of position over elapsed
    /// seconds; output length is one less than the series.
    ///
    /// # Errors
    ///
    /// Returns a shape error when position and timestamps disagree in
    /// length or hold fewer than two samples.
    pub fn velocity(&self) -> Result<Array1<f64>> {
        let elapsed = time::elapsed_seconds(&self.date_time);
        signal::velocity_from_position(&self.position, &elapsed)
    }
}

impl fmt::Display for WaveMaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wave Maker information:\nNumber of times: {}", self.num_times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use std::sync::Arc;

    use crate::time::datenums_to_datetimes;

    #[test]
    fn test_num_times_from_eta() {
        let times: TimeSeries = Arc::from(Vec::new().into_boxed_slice());
        let wm = WaveMaker::new(array![0.0, 0.1, 0.05], array![0.0, 0.2], times);
        assert_eq!(wm.num_times(), 3);
    }

    #[test]
    fn test_velocity() {
        // One day apart: 0.5 m over 86400 s, then 1.0 m over 86400 s.
        let times: TimeSeries =
            Arc::from(datenums_to_datetimes(&[739_435.0, 739_436.0, 739_437.0]).unwrap());
        let wm = WaveMaker::new(
            array![0.0, 0.0, 0.0],
            array![0.0, 0.5, 1.5],
            times,
        );

        let velocity = wm.velocity().unwrap();
        assert_eq!(velocity.len(), 2);
        assert_relative_eq!(velocity[0], 0.5 / 86_400.0, epsilon = 1e-12);
        assert_relative_eq!(velocity[1], 1.0 / 86_400.0, epsilon = 1e-12);
    }
}
