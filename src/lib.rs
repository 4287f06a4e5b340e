//! # barsed
//!
//! Typed loading of BarSed laboratory wave-flume experiments from MATLAB
//! MAT exports.
//!
//! Each experiment trial ("run") recorded a piston wave maker, a line of
//! wave gauges, acoustic Doppler velocimeters (ADVs), and pressure
//! sensors, saved across several MAT files. This crate unpacks those
//! files into a [`Run`] aggregate of strongly typed sensor entities,
//! converts MATLAB serial date numbers to calendar timestamps once at the
//! boundary, and derives flume-wide water-surface-elevation matrices for
//! analysis and plotting.
//!
//! ## Quick Start
//!
//! ```no_run
//! use barsed::{Run, VelocitySelection};
//!
//! fn main() -> barsed::Result<()> {
//!     let mut run = Run::new("RUN001")
//!         .with_wave_file("data/RUN001_waves.mat")
//!         .with_adv_file("data/RUN001_adv.mat");
//!
//!     run.load_wave_data()?;
//!     run.load_adv_data(&VelocitySelection::from_names(&["u", "w"])?)?;
//!     run.load_pressure_data("data/RUN001_pressure.mat", &[2, 4])?;
//!
//!     println!("{}", run);
//!     for gauge in run.wave_gauges() {
//!         println!("gauge {} is {}", gauge.id, gauge.kind());
//!     }
//!
//!     // Flume-wide elevation matrix, wave maker in column 0.
//!     run.construct_flume_wse()?;
//!     barsed::plot::plot_flume_snapshot(&run, 0, "profile.png")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Data Layout
//!
//! | File | Variable | Contents |
//! |------|----------|----------|
//! | wave | `eta` (or flat) | `date, eta, x, y, eta_wm, x_wm` |
//! | ADV | `adv` (or flat) | `per, H, date_matlab, sensor_names, z, t_norm`, per-key cell arrays |
//! | pressure | `p0` | per-site `[timestamps, pressure, window]` records |
//!
//! Fields may sit under the named struct variable or flat at the top
//! level (the layout `save -struct` produces); both are accepted.
//!
//! ## Timestamps
//!
//! MATLAB datenums are converted exactly once, while loading, into
//! `chrono::NaiveDateTime` (microsecond precision). Entities share one
//! timestamp series per file via [`TimeSeries`] and hold no reference
//! back to their run.

#![deny(missing_docs)]

// Modules
pub mod adv;
mod error;
pub mod gauge;
pub mod list;
pub mod mat;
pub mod plot;
pub mod pressure;
pub mod run;
pub mod signal;
pub mod time;
pub mod wave_maker;

// Public exports
pub use adv::{Adv, VelocityKey, VelocitySelection};
pub use error::{Error, Result};
pub use gauge::{GaugeKind, WaveGauge};
pub use mat::MatSource;
pub use pressure::{PressureSensor, UpCrossingWindow};
pub use run::Run;
pub use time::TimeSeries;
pub use wave_maker::WaveMaker;
