//! The run aggregate: one complete wave-flume experiment trial.
//!
//! A [`Run`] owns every sensor's recordings for that trial, performs the
//! MAT-struct unpacking, and derives the flume-wide water-surface-elevation
//! matrices. Entities hold no back-reference to the run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use ndarray::{s, Array2};

use crate::adv::{Adv, VelocitySelection};
use crate::error::{Error, Result};
use crate::gauge::WaveGauge;
use crate::mat::{MatSource, MatStruct, MatVar};
use crate::pressure::PressureSensor;
use crate::time::{datenums_to_datetimes, TimeSeries};
use crate::wave_maker::WaveMaker;

/// One laboratory wave-flume experiment trial.
///
/// Loading is incremental: wave, ADV and pressure data come from separate
/// files and can be loaded independently. A failed load propagates its
/// error immediately; entities constructed by earlier loads stay in place
/// (there is no cross-load rollback).
///
/// # Example
///
/// ```no_run
/// use barsed::{Run, VelocitySelection};
///
/// let mut run = Run::new("RUN001")
///     .with_wave_file("RUN001_waves.mat")
///     .with_adv_file("RUN001_adv.mat");
///
/// run.load_wave_data()?;
/// run.load_adv_data(&VelocitySelection::All)?;
/// run.load_pressure_data("RUN001_pressure.mat", &[2, 4])?;
///
/// run.construct_flume_wse()?;
/// println!("{}", run);
/// # Ok::<(), barsed::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Run {
    /// Run identifier, e.g. `RUN001`.
    pub id: String,

    /// Path to the MAT file holding the run's wave data.
    pub wave_file_path: Option<PathBuf>,

    /// Path to the MAT file holding the run's ADV data.
    pub adv_file_path: Option<PathBuf>,

    date_time: Option<TimeSeries>,
    start_date: Option<NaiveDate>,
    wave_gauges: Vec<WaveGauge>,
    wave_maker: Option<WaveMaker>,
    advs: Vec<Adv>,
    pressure_sensors: Vec<PressureSensor>,
    wave_period: Option<f64>,
    wave_height: Option<f64>,
    wave_gauge_wse: Option<Array2<f64>>,
    flume_wse: Option<Array2<f64>>,
    flume_wse_locs: Option<Array2<f64>>,
}

impl Run {
    /// Create an empty run with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Run {
            id: id.into(),
            ..Run::default()
        }
    }

    /// Set the wave data file path.
    pub fn with_wave_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.wave_file_path = Some(path.into());
        self
    }

    /// Set the ADV data file path.
    pub fn with_adv_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.adv_file_path = Some(path.into());
        self
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Load the wave data file set via [`Run::with_wave_file`].
    ///
    /// # Errors
    ///
    /// Fails if no wave file path is set, the file cannot be parsed, or
    /// the payload does not match the documented layout.
    pub fn load_wave_data(&mut self) -> Result<()> {
        let path = self
            .wave_file_path
            .clone()
            .ok_or(Error::missing_data("wave file path is not set"))?;
        let source = MatSource::open(&path)?;
        self.load_wave_source(&source)
    }

    /// Unpack wave data from an already-loaded source.
    ///
    /// Expects the fields `date, eta, x, y, eta_wm, x_wm`, either nested
    /// under a struct variable `eta` or flat at the top level (the layout
    /// `save -struct` produces). Constructs the shared timestamp series,
    /// exactly one [`WaveMaker`], and one [`WaveGauge`] per (x, y) pair
    /// with 1-based sequential ids in array order.
    ///
    /// Precondition: the gauge arrays are ordered to match the physical
    /// hardware map; id assignment (and therefore gauge-kind derivation)
    /// follows array order.
    pub fn load_wave_source(&mut self, source: &MatSource) -> Result<()> {
        let fields = Self::resolve_fields(source, "eta");

        let mat_time = fields.require_array("date")?.to_array1()?;
        let eta = fields.require_array("eta")?.to_array2()?;
        let x = fields.require_array("x")?.to_array1()?;
        let y = fields.require_array("y")?.to_array1()?;
        let eta_wm = fields.require_array("eta_wm")?.to_array1()?;
        let x_wm = fields.require_array("x_wm")?.to_array1()?;

        // Convert the shared timestamp series once.
        let times: TimeSeries = Arc::from(datenums_to_datetimes(&mat_time.to_vec())?);
        self.start_date = times.first().map(|t| t.date());
        self.date_time = Some(times.clone());

        self.add_wave_maker(WaveMaker::new(eta_wm, x_wm, times.clone()));

        if x.len() != y.len() {
            return Err(Error::shape_mismatch(format!(
                "gauge locations: x has {} entries but y has {}",
                x.len(),
                y.len()
            )));
        }
        if eta.nrows() != x.len() {
            return Err(Error::shape_mismatch(format!(
                "eta has {} rows for {} gauge locations",
                eta.nrows(),
                x.len()
            )));
        }

        let mut gauges = Vec::with_capacity(x.len());
        for i in 0..x.len() {
            let gauge = WaveGauge::new(
                (i + 1) as u32,
                (x[i], y[i]),
                eta.row(i).to_owned(),
                times.clone(),
            )?;
            gauges.push(gauge);
        }
        self.add_wave_gauges(gauges);

        Ok(())
    }

    /// Load the ADV data file set via [`Run::with_adv_file`].
    ///
    /// # Errors
    ///
    /// Fails if no ADV file path is set, the file cannot be parsed, or the
    /// payload does not match the documented layout.
    pub fn load_adv_data(&mut self, selection: &VelocitySelection) -> Result<()> {
        let path = self
            .adv_file_path
            .clone()
            .ok_or(Error::missing_data("ADV file path is not set"))?;
        let source = MatSource::open(&path)?;
        self.load_adv_source(&source, selection)
    }

    /// Unpack ADV data from an already-loaded source.
    ///
    /// Expects `per, H, date_matlab, sensor_names, z, t_norm` (nested
    /// under `adv` or flat), plus one per-sensor cell array per requested
    /// velocity key. Sensors get 1-based sequential ids in array order;
    /// only the requested keys are populated.
    pub fn load_adv_source(
        &mut self,
        source: &MatSource,
        selection: &VelocitySelection,
    ) -> Result<()> {
        // Selection validity is settled before any sensor is constructed.
        let keys = selection.resolve();

        let fields = Self::resolve_fields(source, "adv");

        self.wave_period = Some(fields.require_scalar("per")?);
        self.wave_height = Some(fields.require_scalar("H")?);

        let datenums = fields.require_array("date_matlab")?.to_array1()?;
        let times: TimeSeries = Arc::from(datenums_to_datetimes(&datenums.to_vec())?);

        let sensor_names = fields.require_text("sensor_names")?;
        let flume_heights = fields.require_array("z")?.to_array1()?;
        let norm_t = fields.require_array("t_norm")?.to_array1()?;

        let num_sensors = sensor_names.len();
        if flume_heights.len() != num_sensors {
            return Err(Error::shape_mismatch(format!(
                "z has {} heights for {} sensor names",
                flume_heights.len(),
                num_sensors
            )));
        }

        // Resolve every requested key's per-sensor series up front.
        let mut key_series = Vec::with_capacity(keys.len());
        for key in &keys {
            let cells = fields.require_cells(key.as_str())?;
            if cells.len() != num_sensors {
                return Err(Error::shape_mismatch(format!(
                    "velocity key '{}' has {} series for {} sensors",
                    key,
                    cells.len(),
                    num_sensors
                )));
            }
            key_series.push((*key, cells));
        }

        for i in 0..num_sensors {
            let mut adv = Adv::new(
                sensor_names[i].clone(),
                (i + 1) as u32,
                times.clone(),
                flume_heights[i],
                norm_t.clone(),
            );

            for (key, cells) in &key_series {
                let series = cells[i].as_array().ok_or_else(|| {
                    Error::shape_mismatch(format!(
                        "velocity key '{}', sensor {}: expected a numeric array, found {}",
                        key,
                        i + 1,
                        cells[i].kind_name()
                    ))
                })?;
                adv.store_velocity(*key, series.to_array1()?);
            }

            self.advs.push(adv);
        }

        log::info!("added {} ADV(s) to {}", num_sensors, self.id);
        Ok(())
    }

    /// Load pressure data from the given MAT file.
    ///
    /// `sites` supplies the site numbers used to synthesize location
    /// labels (`site_2`, `site_4`, ...), ordered to match the file's
    /// record order.
    pub fn load_pressure_data(&mut self, path: impl AsRef<Path>, sites: &[u32]) -> Result<()> {
        let source = MatSource::open(path)?;
        self.load_pressure_source(&source, sites)
    }

    /// Unpack pressure data from an already-loaded source.
    ///
    /// Expects `p0`: a cell array of per-site records in the layout
    /// documented on [`PressureSensor::from_site`]. One sensor is built
    /// per record, id = 1-based index, location = `site_{sites[i]}`.
    ///
    /// # Errors
    ///
    /// Fails before constructing anything when `sites` does not have one
    /// label per record, rather than mislabeling silently.
    pub fn load_pressure_source(&mut self, source: &MatSource, sites: &[u32]) -> Result<()> {
        let var = source.require("p0")?;
        let records = var
            .as_cells()
            .ok_or_else(|| Error::variable_kind("p0", "cell array", var.kind_name()))?;

        if sites.len() != records.len() {
            return Err(Error::SiteCountMismatch {
                labels: sites.len(),
                records: records.len(),
            });
        }

        for (i, record) in records.iter().enumerate() {
            let sensor =
                PressureSensor::from_site((i + 1) as u32, format!("site_{}", sites[i]), record)?;
            self.add_pressure_sensor(sensor);
        }

        log::info!("added {} pressure sensor(s) to {}", records.len(), self.id);
        Ok(())
    }

    /// Resolve the field holder for a file: the named struct variable when
    /// present, otherwise the top level (flattened `-struct` export).
    fn resolve_fields<'a>(source: &'a MatSource, group: &str) -> &'a MatStruct {
        match source.get(group) {
            Some(MatVar::Struct(fields)) => fields,
            _ => source.vars(),
        }
    }

    // ========================================================================
    // Entity collections
    // ========================================================================

    /// Set the run's wave maker, replacing any previous one.
    pub fn add_wave_maker(&mut self, wave_maker: WaveMaker) {
        self.wave_maker = Some(wave_maker);
    }

    /// Append one wave gauge.
    pub fn add_wave_gauge(&mut self, gauge: WaveGauge) {
        self.wave_gauges.push(gauge);
        log::debug!("run {} now has {} wave gauge(s)", self.id, self.wave_gauges.len());
    }

    /// Append several wave gauges, preserving order.
    pub fn add_wave_gauges(&mut self, gauges: Vec<WaveGauge>) {
        self.wave_gauges.extend(gauges);
        log::debug!("run {} now has {} wave gauge(s)", self.id, self.wave_gauges.len());
    }

    /// Append one pressure sensor.
    pub fn add_pressure_sensor(&mut self, sensor: PressureSensor) {
        self.pressure_sensors.push(sensor);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The shared timestamp series, once wave data is loaded.
    pub fn date_time(&self) -> Option<&TimeSeries> {
        self.date_time.as_ref()
    }

    /// Calendar date of the first sample.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Number of recorded times (0 before wave data is loaded).
    pub fn num_times(&self) -> usize {
        self.date_time.as_ref().map_or(0, |t| t.len())
    }

    /// The run's wave gauges, in id order.
    pub fn wave_gauges(&self) -> &[WaveGauge] {
        &self.wave_gauges
    }

    /// Number of wave gauges.
    pub fn num_wave_gauges(&self) -> usize {
        self.wave_gauges.len()
    }

    /// The run's wave maker, once wave data is loaded.
    pub fn wave_maker(&self) -> Option<&WaveMaker> {
        self.wave_maker.as_ref()
    }

    /// The run's ADVs, in id order.
    pub fn advs(&self) -> &[Adv] {
        &self.advs
    }

    /// Number of ADVs.
    pub fn num_advs(&self) -> usize {
        self.advs.len()
    }

    /// The run's pressure sensors, in id order.
    pub fn pressure_sensors(&self) -> &[PressureSensor] {
        &self.pressure_sensors
    }

    /// Number of pressure sensors.
    pub fn num_pressure_sensors(&self) -> usize {
        self.pressure_sensors.len()
    }

    /// Input wave period from the ADV file (s).
    pub fn wave_period(&self) -> Option<f64> {
        self.wave_period
    }

    /// Input wave height from the ADV file (m).
    pub fn wave_height(&self) -> Option<f64> {
        self.wave_height
    }

    /// The cached gauge elevation matrix, if derived.
    pub fn wave_gauge_wse(&self) -> Option<&Array2<f64>> {
        self.wave_gauge_wse.as_ref()
    }

    /// The cached flume-wide elevation matrix, if derived.
    pub fn flume_wse(&self) -> Option<&Array2<f64>> {
        self.flume_wse.as_ref()
    }

    /// The cached flume-wide location matrix, if derived.
    pub fn flume_wse_locs(&self) -> Option<&Array2<f64>> {
        self.flume_wse_locs.as_ref()
    }

    // ========================================================================
    // Derived series
    // ========================================================================

    /// Build the time × gauge water-surface-elevation matrix by
    /// column-stacking each gauge's elevation series in gauge order.
    ///
    /// The matrix is cached on the run and returned.
    ///
    /// # Errors
    ///
    /// Fails if wave data has not been loaded, or a gauge's series length
    /// disagrees with the shared timestamp count.
    pub fn construct_wave_gauge_wse(&mut self) -> Result<&Array2<f64>> {
        if self.date_time.is_none() {
            return Err(Error::missing_data(
                "wave data must be loaded before deriving the elevation matrix",
            ));
        }
        let num_times = self.num_times();

        let mut wse = Array2::zeros((num_times, self.wave_gauges.len()));
        for (i, gauge) in self.wave_gauges.iter().enumerate() {
            if gauge.eta.len() != num_times {
                return Err(Error::shape_mismatch(format!(
                    "gauge {} has {} samples for {} timestamps",
                    gauge.id,
                    gauge.eta.len(),
                    num_times
                )));
            }
            wse.column_mut(i).assign(&gauge.eta);
        }

        Ok(self.wave_gauge_wse.insert(wse))
    }

    /// The gauges × 2 location table (columns: x, y), in gauge order.
    pub fn wave_gauge_locations(&self) -> Array2<f64> {
        let mut locations = Array2::zeros((self.wave_gauges.len(), 2));
        for (i, gauge) in self.wave_gauges.iter().enumerate() {
            locations[[i, 0]] = gauge.location.0;
            locations[[i, 1]] = gauge.location.1;
        }
        locations
    }

    /// Build the flume-wide elevation and location matrices.
    ///
    /// The wave maker is prepended as virtual column 0 of both matrices:
    /// its face elevation next to the gauge elevations, and its moving
    /// piston position next to the gauges' fixed x locations (so the
    /// location matrix has one time-varying column and otherwise
    /// time-invariant columns).
    ///
    /// Derives the gauge elevation matrix first if it is not cached.
    ///
    /// # Errors
    ///
    /// Fails if wave data (and with it the wave maker) has not been
    /// loaded, or series lengths disagree with the timestamp count.
    pub fn construct_flume_wse(&mut self) -> Result<()> {
        if self.wave_gauge_wse.is_none() {
            self.construct_wave_gauge_wse()?;
        }
        let gauge_wse = self
            .wave_gauge_wse
            .as_ref()
            .ok_or(Error::missing_data("wave gauge elevation matrix"))?;
        let wave_maker = self
            .wave_maker
            .as_ref()
            .ok_or(Error::missing_data("wave maker has not been loaded"))?;

        let (num_times, num_gauges) = gauge_wse.dim();

        if wave_maker.eta_wm.len() != num_times || wave_maker.position.len() != num_times {
            return Err(Error::shape_mismatch(format!(
                "wave maker series ({} elevation, {} position samples) do not span {} timestamps",
                wave_maker.eta_wm.len(),
                wave_maker.position.len(),
                num_times
            )));
        }

        let mut wse = Array2::zeros((num_times, num_gauges + 1));
        wse.column_mut(0).assign(&wave_maker.eta_wm);
        wse.slice_mut(s![.., 1..]).assign(gauge_wse);

        let mut locations = Array2::zeros((num_times, num_gauges + 1));
        locations.column_mut(0).assign(&wave_maker.position);
        for (i, gauge) in self.wave_gauges.iter().enumerate() {
            locations.column_mut(i + 1).fill(gauge.location.0);
        }

        self.flume_wse = Some(wse);
        self.flume_wse_locs = Some(locations);
        Ok(())
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id: {}\nStart Date: {}\nWave Data File path: {}\nNum pressure gauges: {}\nNum advs: {}",
            self.id,
            self.start_date
                .map_or_else(|| "unset".to_string(), |d| d.to_string()),
            self.wave_file_path
                .as_ref()
                .map_or_else(|| "unset".to_string(), |p| p.display().to_string()),
            self.pressure_sensors.len(),
            self.advs.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    use crate::time::datenums_to_datetimes;

    fn run_with_gauges() -> Run {
        let times: TimeSeries =
            Arc::from(datenums_to_datetimes(&[739_435.0, 739_435.5]).unwrap());

        let mut run = Run::new("RUN900");
        run.date_time = Some(times.clone());
        run.start_date = times.first().map(|t| t.date());

        run.add_wave_maker(WaveMaker::new(
            array![0.5, 0.6],
            array![-0.1, 0.1],
            times.clone(),
        ));
        run.add_wave_gauges(vec![
            WaveGauge::new(1, (1.0, 0.5), array![0.1, 1.0], times.clone()).unwrap(),
            WaveGauge::new(2, (2.0, 0.5), array![0.2, 2.0], times.clone()).unwrap(),
        ]);
        run
    }

    #[test]
    fn test_wave_gauge_wse_column_order() {
        let mut run = run_with_gauges();
        let wse = run.construct_wave_gauge_wse().unwrap();
        assert_eq!(wse.dim(), (2, 2));
        assert_eq!(wse.column(0).to_vec(), vec![0.1, 1.0]);
        assert_eq!(wse.column(1).to_vec(), vec![0.2, 2.0]);
    }

    #[test]
    fn test_wave_gauge_wse_requires_load() {
        let mut run = Run::new("RUN901");
        assert!(run.construct_wave_gauge_wse().is_err());
    }

    #[test]
    fn test_flume_wse_prepends_wave_maker() {
        let mut run = run_with_gauges();
        run.construct_flume_wse().unwrap();

        let wse = run.flume_wse().unwrap();
        assert_eq!(wse.dim(), (2, 3));
        assert_eq!(wse.column(0).to_vec(), vec![0.5, 0.6]);
        assert_eq!(wse.column(1).to_vec(), vec![0.1, 1.0]);

        let locs = run.flume_wse_locs().unwrap();
        // Column 0 moves with the piston; gauge columns are fixed.
        assert_eq!(locs.column(0).to_vec(), vec![-0.1, 0.1]);
        assert_eq!(locs.column(1).to_vec(), vec![1.0, 1.0]);
        assert_eq!(locs.column(2).to_vec(), vec![2.0, 2.0]);
    }

    #[test]
    fn test_gauge_locations_table() {
        let run = run_with_gauges();
        let locations = run.wave_gauge_locations();
        assert_eq!(locations.dim(), (2, 2));
        assert_eq!(locations[[0, 0]], 1.0);
        assert_eq!(locations[[1, 1]], 0.5);
    }

    #[test]
    fn test_length_mismatch_reported() {
        let times: TimeSeries = Arc::from(datenums_to_datetimes(&[739_435.0]).unwrap());
        let mut run = Run::new("RUN902");
        run.date_time = Some(times.clone());
        run.add_wave_gauges(vec![
            WaveGauge::new(1, (1.0, 0.5), array![0.1, 1.0], times).unwrap(),
        ]);

        let err = run.construct_wave_gauge_wse().unwrap_err();
        assert!(err.to_string().contains("gauge 1"));
    }
}
