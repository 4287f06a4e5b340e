//! Small signal helpers: smoothing and finite-difference velocity.

use ndarray::Array1;

use crate::error::{Error, Result};

/// Valid-mode moving average: output length is `len - window + 1`.
///
/// # Errors
///
/// Returns [`Error::InvalidWindow`] when `window` is zero or exceeds the
/// series length.
pub fn moving_average(data: &Array1<f64>, window: usize) -> Result<Array1<f64>> {
    let len = data.len();
    if window == 0 || window > len {
        return Err(Error::InvalidWindow { window, len });
    }

    let scale = 1.0 / window as f64;
    let values = data.as_slice().map(|s| s.to_vec()).unwrap_or_else(|| data.to_vec());

    Ok(values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() * scale)
        .collect())
}

/// Velocity from a position series by first differences.
///
/// Output length is `len - 1`; entry `i` is the mean velocity over
/// `(time[i], time[i + 1])`.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] when the series lengths differ or hold
/// fewer than two samples.
pub fn velocity_from_position(position: &Array1<f64>, time: &Array1<f64>) -> Result<Array1<f64>> {
    if position.len() != time.len() {
        return Err(Error::shape_mismatch(format!(
            "position has {} samples but time has {}",
            position.len(),
            time.len()
        )));
    }
    if position.len() < 2 {
        return Err(Error::shape_mismatch(
            "velocity needs at least two position samples".to_string(),
        ));
    }

    let velocity = (0..position.len() - 1)
        .map(|i| (position[i + 1] - position[i]) / (time[i + 1] - time[i]))
        .collect();

    Ok(velocity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_moving_average_valid_mode() {
        let data = array![1.0, 2.0, 3.0, 4.0];
        let smoothed = moving_average(&data, 2).unwrap();
        assert_eq!(smoothed.len(), 3);
        assert_relative_eq!(smoothed[0], 1.5);
        assert_relative_eq!(smoothed[2], 3.5);
    }

    #[test]
    fn test_moving_average_window_bounds() {
        let data = array![1.0, 2.0];
        assert!(moving_average(&data, 0).is_err());
        assert!(moving_average(&data, 3).is_err());
        assert!(moving_average(&data, 2).is_ok());
    }

    #[test]
    fn test_velocity_from_position() {
        let position = array![0.0, 1.0, 3.0];
        let time = array![0.0, 0.5, 1.0];
        let velocity = velocity_from_position(&position, &time).unwrap();
        assert_eq!(velocity.len(), 2);
        assert_relative_eq!(velocity[0], 2.0);
        assert_relative_eq!(velocity[1], 4.0);
    }

    #[test]
    fn test_velocity_length_checks() {
        let position = array![0.0, 1.0];
        let time = array![0.0];
        assert!(velocity_from_position(&position, &time).is_err());
        assert!(velocity_from_position(&array![0.0], &array![0.0]).is_err());
    }
}
