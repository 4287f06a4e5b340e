//! Acoustic Doppler velocimeter entity and velocity-component keys.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use ndarray::Array1;

use crate::error::{Error, Result};
use crate::list::{apply_mask, membership_mask};
use crate::time::TimeSeries;

/// One of the 12 recognized velocity-component series an ADV records.
///
/// The three axes (`u`, `v`, `w`) come in four processing stages:
/// interpolated, cleaned, ensemble, and ensemble-averaged. This is a
/// closed set; externally supplied names go through [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum VelocityKey {
    UInter,
    VInter,
    WInter,
    U,
    V,
    W,
    UEns,
    VEns,
    WEns,
    UEnsAvg,
    VEnsAvg,
    WEnsAvg,
}

impl VelocityKey {
    /// All keys in canonical order (the order the dataset documents them).
    pub const ALL: [VelocityKey; 12] = [
        VelocityKey::UInter,
        VelocityKey::VInter,
        VelocityKey::WInter,
        VelocityKey::U,
        VelocityKey::V,
        VelocityKey::W,
        VelocityKey::UEns,
        VelocityKey::VEns,
        VelocityKey::WEns,
        VelocityKey::UEnsAvg,
        VelocityKey::VEnsAvg,
        VelocityKey::WEnsAvg,
    ];

    /// The dataset field name for this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            VelocityKey::UInter => "u_inter",
            VelocityKey::VInter => "v_inter",
            VelocityKey::WInter => "w_inter",
            VelocityKey::U => "u",
            VelocityKey::V => "v",
            VelocityKey::W => "w",
            VelocityKey::UEns => "u_ens",
            VelocityKey::VEns => "v_ens",
            VelocityKey::WEns => "w_ens",
            VelocityKey::UEnsAvg => "u_ens_avg",
            VelocityKey::VEnsAvg => "v_ens_avg",
            VelocityKey::WEnsAvg => "w_ens_avg",
        }
    }

    /// Whether this is a raw ensemble series (`*_ens`).
    ///
    /// These are stored as one undivided series per key; splitting per
    /// individual ensemble realization was never implemented upstream.
    pub fn is_ensemble(&self) -> bool {
        matches!(self, VelocityKey::UEns | VelocityKey::VEns | VelocityKey::WEns)
    }

    /// Whether this is an ensemble-averaged series, aligned to the
    /// normalized-time axis rather than the timestamp series.
    pub fn is_ensemble_averaged(&self) -> bool {
        matches!(
            self,
            VelocityKey::UEnsAvg | VelocityKey::VEnsAvg | VelocityKey::WEnsAvg
        )
    }
}

impl FromStr for VelocityKey {
    type Err = Error;

    /// Exact-name lookup; case variants and substrings are rejected.
    fn from_str(s: &str) -> Result<Self> {
        VelocityKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::unknown_velocity_keys(&[s]))
    }
}

impl fmt::Display for VelocityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which velocity series to load for each ADV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VelocitySelection {
    /// Load all 12 keys.
    All,

    /// Load no velocity data, only sensor metadata.
    None,

    /// Load an explicit ordered subset.
    Keys(Vec<VelocityKey>),
}

impl VelocitySelection {
    /// Build a selection from externally supplied names.
    ///
    /// # Errors
    ///
    /// Fails when any name is outside the canonical set, naming exactly
    /// the invalid entries along with the valid keys.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let names: Vec<&str> = names.iter().map(|s| s.as_ref()).collect();
        let valid_names: Vec<&str> = VelocityKey::ALL.iter().map(|k| k.as_str()).collect();

        let valid_mask = membership_mask(&names, &valid_names);

        if !valid_mask.iter().all(|&ok| ok) {
            let invalid_mask: Vec<bool> = valid_mask.iter().map(|&ok| !ok).collect();
            let invalid = apply_mask(&names, &invalid_mask)?;
            return Err(Error::unknown_velocity_keys(&invalid));
        }

        let keys = names
            .iter()
            .map(|name| VelocityKey::from_str(name))
            .collect::<Result<Vec<_>>>()?;

        Ok(VelocitySelection::Keys(keys))
    }

    /// The keys this selection loads, in order.
    ///
    /// `All` resolves to the 12 keys in canonical order; `None` to an
    /// empty list.
    pub fn resolve(&self) -> Vec<VelocityKey> {
        match self {
            VelocitySelection::All => VelocityKey::ALL.to_vec(),
            VelocitySelection::None => Vec::new(),
            VelocitySelection::Keys(keys) => keys.clone(),
        }
    }
}

impl FromStr for VelocitySelection {
    type Err = Error;

    /// Parse the selector forms accepted from configuration: `"all"`,
    /// `"none"`/`"None"`, or a single key name.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(VelocitySelection::All),
            "none" | "None" => Ok(VelocitySelection::None),
            other => Ok(VelocitySelection::Keys(vec![VelocityKey::from_str(other)?])),
        }
    }
}

/// An acoustic Doppler velocimeter: 3-axis flow velocity at one height in
/// the flume.
#[derive(Debug, Clone)]
pub struct Adv {
    /// Sensor name from the instrument export.
    pub name: String,

    /// 1-based sensor id, assigned in source array order.
    pub id: u32,

    /// Timestamps shared by all ADVs in the run.
    pub date_time: TimeSeries,

    /// Sensor height relative to the flume bed (m).
    pub flume_height: f64,

    /// Normalized time axis for ensemble-averaged series.
    pub norm_t: Array1<f64>,

    /// Loaded velocity series; absent keys were not requested.
    velocities: HashMap<VelocityKey, Array1<f64>>,
}

impl Adv {
    /// Construct an ADV with metadata only; velocity series are stored
    /// afterwards per requested key.
    pub fn new(
        name: impl Into<String>,
        id: u32,
        date_time: TimeSeries,
        flume_height: f64,
        norm_t: Array1<f64>,
    ) -> Self {
        Adv {
            name: name.into(),
            id,
            date_time,
            flume_height,
            norm_t,
            velocities: HashMap::new(),
        }
    }

    /// Store a velocity series, overwriting any previous series under the
    /// same key. Key validity is a compile-time fact here; ensemble series
    /// are stored undivided.
    pub fn store_velocity(&mut self, key: VelocityKey, series: Array1<f64>) {
        self.velocities.insert(key, series);
    }

    /// Store a velocity series under an externally supplied name.
    ///
    /// # Errors
    ///
    /// Fails for any name outside the 12 canonical keys, listing the valid
    /// set.
    pub fn store_velocity_by_name(&mut self, name: &str, series: Array1<f64>) -> Result<()> {
        let key = VelocityKey::from_str(name)?;
        self.store_velocity(key, series);
        Ok(())
    }

    /// The series stored under `key`, if it was loaded.
    pub fn velocity(&self, key: VelocityKey) -> Option<&Array1<f64>> {
        self.velocities.get(&key)
    }

    /// Keys with a loaded series, in canonical order.
    pub fn loaded_keys(&self) -> Vec<VelocityKey> {
        VelocityKey::ALL
            .iter()
            .copied()
            .filter(|k| self.velocities.contains_key(k))
            .collect()
    }
}

impl fmt::Display for Adv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sensor Name: {}\nSensor id: {}\nFlume Height, z (m): {}",
            self.name, self.id, self.flume_height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::sync::Arc;

    fn sample_adv() -> Adv {
        let times: TimeSeries = Arc::from(Vec::new().into_boxed_slice());
        Adv::new("adv1", 1, times, 0.05, array![0.0, 0.5, 1.0])
    }

    #[test]
    fn test_canonical_names_round_trip() {
        for key in VelocityKey::ALL {
            assert_eq!(VelocityKey::from_str(key.as_str()).unwrap(), key);
        }
    }

    #[test]
    fn test_rejects_non_canonical_names() {
        for name in ["U", "u_int", "ens", "u_inter ", "u_ens_avg_x", ""] {
            assert!(VelocityKey::from_str(name).is_err(), "accepted {:?}", name);
        }
    }

    #[test]
    fn test_selection_all_canonical_order() {
        let keys = VelocitySelection::All.resolve();
        assert_eq!(keys.len(), 12);
        assert_eq!(keys[0].as_str(), "u_inter");
        assert_eq!(keys[11].as_str(), "w_ens_avg");
    }

    #[test]
    fn test_selection_none_is_empty() {
        assert!(VelocitySelection::None.resolve().is_empty());
    }

    #[test]
    fn test_selection_reports_exactly_the_invalid_entries() {
        let err = VelocitySelection::from_names(&["u", "u_bogus", "w", "nope"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("u_bogus"));
        assert!(msg.contains("nope"));
        assert!(!msg.contains("[u,"));
    }

    #[test]
    fn test_selection_keeps_input_order() {
        let selection = VelocitySelection::from_names(&["w", "u"]).unwrap();
        let keys = selection.resolve();
        assert_eq!(keys, vec![VelocityKey::W, VelocityKey::U]);
    }

    #[test]
    fn test_selection_from_str() {
        assert_eq!(VelocitySelection::from_str("all").unwrap(), VelocitySelection::All);
        assert_eq!(VelocitySelection::from_str("None").unwrap(), VelocitySelection::None);
        assert_eq!(VelocitySelection::from_str("none").unwrap(), VelocitySelection::None);
        assert!(VelocitySelection::from_str("everything").is_err());
    }

    #[test]
    fn test_store_overwrites() {
        let mut adv = sample_adv();
        adv.store_velocity(VelocityKey::U, array![1.0]);
        adv.store_velocity(VelocityKey::U, array![2.0, 3.0]);
        assert_eq!(adv.velocity(VelocityKey::U).unwrap().len(), 2);
    }

    #[test]
    fn test_store_by_name() {
        let mut adv = sample_adv();
        assert!(adv.store_velocity_by_name("w_ens_avg", array![0.1]).is_ok());
        assert!(adv.store_velocity_by_name("w_ens_avg2", array![0.1]).is_err());
        assert_eq!(adv.loaded_keys(), vec![VelocityKey::WEnsAvg]);
    }
}
