//! Quick-look plotting for loaded runs.
//!
//! Thin wrappers over `plotters` that render one PNG per call: a sensor's
//! time series, an ADV's velocity components, or a flume-wide elevation
//! snapshot. These are inspection aids, not publication figures.

use std::path::Path;

use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::prelude::{BitMapBackend, IntoDrawingArea, PathElement};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, BLUE, CYAN, GREEN, MAGENTA, RED, WHITE};
use plotters::style::{Color, RGBColor};

use crate::adv::Adv;
use crate::error::{Error, Result};
use crate::gauge::WaveGauge;
use crate::pressure::PressureSensor;
use crate::run::Run;
use crate::time;
use crate::wave_maker::WaveMaker;

const PLOT_WIDTH: u32 = 1280;
const PLOT_HEIGHT: u32 = 720;

const PALETTE: [RGBColor; 6] = [BLUE, RED, GREEN, MAGENTA, CYAN, BLACK];

/// One labeled line in a chart.
#[derive(Debug, Clone)]
pub struct PlotSeries {
    /// (x, y) points in draw order.
    pub data: Vec<(f64, f64)>,

    /// Legend label.
    pub label: String,
}

impl PlotSeries {
    /// Build a series by zipping an x axis with a y series.
    pub fn from_xy<'a, X, Y>(label: impl Into<String>, x: X, y: Y) -> Self
    where
        X: IntoIterator<Item = &'a f64>,
        Y: IntoIterator<Item = &'a f64>,
    {
        PlotSeries {
            data: x.into_iter().copied().zip(y.into_iter().copied()).collect(),
            label: label.into(),
        }
    }
}

fn padded_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let range = (max_val - min_val).abs();
    let padding = if range < 1e-9 { 0.5 } else { range * 0.1 };
    (min_val - padding, max_val + padding)
}

/// Render labeled line series into a PNG at `path`.
///
/// # Errors
///
/// Fails when no series holds any points, or the backend cannot draw or
/// write the image.
pub fn draw_line_chart(
    path: impl AsRef<Path>,
    title: &str,
    x_label: &str,
    y_label: &str,
    series: &[PlotSeries],
) -> Result<()> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for s in series {
        for &(x, y) in &s.data {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    if !x_min.is_finite() {
        return Err(Error::plot(format!("'{}': no data points to draw", title)));
    }

    let (x_min, x_max) = padded_range(x_min, x_max);
    let (y_min, y_max) = padded_range(y_min, y_max);

    let root = BitMapBackend::new(path.as_ref(), (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| Error::plot(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| Error::plot(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .label_style(("sans-serif", 14))
        .draw()
        .map_err(|e| Error::plot(e.to_string()))?;

    for (i, s) in series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(s.data.iter().cloned(), color.stroke_width(2)))
            .map_err(|e| Error::plot(e.to_string()))?
            .label(&s.label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 14))
        .draw()
        .map_err(|e| Error::plot(e.to_string()))?;

    root.present().map_err(|e| Error::plot(e.to_string()))?;
    Ok(())
}

/// Plot one gauge's surface elevation against elapsed seconds.
pub fn plot_gauge_eta(gauge: &WaveGauge, path: impl AsRef<Path>) -> Result<()> {
    let elapsed = time::elapsed_seconds(&gauge.date_time);
    let series = PlotSeries::from_xy(format!("gauge {} eta", gauge.id), &elapsed, &gauge.eta);
    draw_line_chart(
        path,
        &format!("Wave gauge {} ({})", gauge.id, gauge.kind()),
        "Elapsed time (s)",
        "Surface elevation (m)",
        &[series],
    )
}

/// Plot the wave maker's face elevation and piston position together.
pub fn plot_wave_maker(wave_maker: &WaveMaker, path: impl AsRef<Path>) -> Result<()> {
    let elapsed = time::elapsed_seconds(&wave_maker.date_time);
    let series = [
        PlotSeries::from_xy("eta_wm", &elapsed, &wave_maker.eta_wm),
        PlotSeries::from_xy("position", &elapsed, &wave_maker.position),
    ];
    draw_line_chart(
        path,
        "Wave maker",
        "Elapsed time (s)",
        "Elevation / position (m)",
        &series,
    )
}

/// Plot one pressure sensor's series against elapsed seconds.
pub fn plot_pressure(sensor: &PressureSensor, path: impl AsRef<Path>) -> Result<()> {
    let elapsed = time::elapsed_seconds(&sensor.date_time);
    let series = PlotSeries::from_xy(sensor.location.clone(), &elapsed, &sensor.pressure);
    draw_line_chart(
        path,
        &format!("Pressure sensor {} ({})", sensor.id, sensor.location),
        "Elapsed time (s)",
        "Pressure",
        &[series],
    )
}

/// Plot an ADV's loaded velocity series.
///
/// Series aligned to timestamps use elapsed seconds; ensemble-averaged
/// series use the normalized-time axis. Raw ensemble series are skipped
/// with a warning, since they are stored undivided and have no meaningful
/// x axis here.
pub fn plot_adv_velocities(adv: &Adv, path: impl AsRef<Path>) -> Result<()> {
    let elapsed = time::elapsed_seconds(&adv.date_time);

    let mut series = Vec::new();
    for key in adv.loaded_keys() {
        let values = match adv.velocity(key) {
            Some(values) => values,
            None => continue,
        };
        if key.is_ensemble() {
            log::warn!(
                "skipping '{}' for sensor '{}': raw ensemble series are stored undivided",
                key,
                adv.name
            );
            continue;
        }
        let x: &[f64] = if key.is_ensemble_averaged() {
            adv.norm_t.as_slice().unwrap_or(&[])
        } else {
            elapsed.as_slice().unwrap_or(&[])
        };
        series.push(PlotSeries::from_xy(key.as_str(), x, values));
    }

    draw_line_chart(
        path,
        &format!("ADV {} (z = {} m)", adv.name, adv.flume_height),
        "Time (s / normalized)",
        "Velocity (m/s)",
        &series,
    )
}

/// Plot the flume-wide surface profile at one time index: elevation
/// against cross-shore location, wave maker included as the first point.
///
/// # Errors
///
/// Fails when the flume matrices have not been derived (see
/// [`Run::construct_flume_wse`]) or the index is out of range.
pub fn plot_flume_snapshot(run: &Run, time_index: usize, path: impl AsRef<Path>) -> Result<()> {
    let wse = run
        .flume_wse()
        .ok_or(Error::missing_data("flume elevation matrix has not been derived"))?;
    let locs = run
        .flume_wse_locs()
        .ok_or(Error::missing_data("flume location matrix has not been derived"))?;

    if time_index >= wse.nrows() {
        return Err(Error::shape_mismatch(format!(
            "snapshot index {} out of range for {} recorded times",
            time_index,
            wse.nrows()
        )));
    }

    let mut points: Vec<(f64, f64)> = locs
        .row(time_index)
        .iter()
        .copied()
        .zip(wse.row(time_index).iter().copied())
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let series = PlotSeries {
        data: points,
        label: format!("t = {}", time_index),
    };
    draw_line_chart(
        path,
        &format!("{} flume surface profile", run.id),
        "Cross-shore location (m)",
        "Surface elevation (m)",
        &[series],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::sync::Arc;

    use crate::time::{datenums_to_datetimes, TimeSeries};

    fn times(n: usize) -> TimeSeries {
        let datenums: Vec<f64> = (0..n).map(|i| 739_435.0 + i as f64 * 0.1).collect();
        Arc::from(datenums_to_datetimes(&datenums).unwrap())
    }

    #[test]
    fn test_gauge_plot_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gauge.png");

        let gauge = WaveGauge::new(1, (1.0, 0.5), array![0.0, 0.1, -0.05], times(3)).unwrap();
        plot_gauge_eta(&gauge, &path).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn test_empty_chart_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let err = draw_line_chart(&path, "empty", "x", "y", &[]).unwrap_err();
        assert!(err.to_string().contains("no data points"));
    }

    #[test]
    fn test_flume_snapshot_requires_derived_matrices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.png");
        let run = Run::new("RUN903");
        assert!(plot_flume_snapshot(&run, 0, &path).is_err());
    }
}
