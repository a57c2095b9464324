use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CompostError;

/// Closed interval `[min, max]` used for optimum bands and clamp bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive membership test.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Project `value` onto the interval.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    fn check(&self, what: &str) -> Result<(), CompostError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(CompostError::Config(format!(
                "{what} must be finite with min < max (got {}..{})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// How a single environmental variable maps onto a sub-score in [0,1].
///
/// One curve applies to all three variables of a model instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseCurve {
    /// 1.0 inside the band, `fallback` anywhere else. Sharp tolerance cliff.
    Step { fallback: f64 },
    /// `1 - |v - mid| / (max - min)` inside the band, 0 outside.
    Continuous,
}

impl Default for ResponseCurve {
    fn default() -> Self {
        ResponseCurve::Step { fallback: 0.2 }
    }
}

/// Every constant of the bin model.
///
/// Moisture is expressed in percent throughout (bands, bounds and evaporation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub response: ResponseCurve,
    /// Optimum temperature band, °C.
    pub temperature_band: Band,
    /// Optimum moisture band, percent.
    pub moisture_band: Band,
    pub ph_band: Band,
    /// Fraction of mass lost per day at activity 1.0.
    pub decay_constant: f64,
    /// °C gained per day at activity 1.0.
    pub heat_gain: f64,
    /// °C lost per day regardless of activity.
    pub cooling_loss: f64,
    /// Moisture percentage points lost per day regardless of activity.
    pub evaporation_base: f64,
    /// Extra moisture percentage points lost per day at activity 1.0.
    pub evaporation_per_activity: f64,
    pub ph_drift_rate: f64,
    /// Activity above this pushes pH up, below it pulls pH down.
    pub ph_drift_midpoint: f64,
    pub temperature_bounds: Band,
    pub moisture_bounds: Band,
    pub ph_bounds: Band,
    /// Longest run accepted by `CompostModel::run`.
    pub max_days: u32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            response: ResponseCurve::default(),
            temperature_band: Band::new(45.0, 65.0),
            moisture_band: Band::new(50.0, 65.0),
            ph_band: Band::new(6.5, 8.0),
            decay_constant: 0.04,
            heat_gain: 3.0,
            cooling_loss: 1.2,
            evaporation_base: 0.2,
            evaporation_per_activity: 0.3,
            ph_drift_rate: 0.05,
            ph_drift_midpoint: 0.5,
            temperature_bounds: Band::new(20.0, 70.0),
            moisture_bounds: Band::new(30.0, 80.0),
            ph_bounds: Band::new(5.5, 8.5),
            max_days: 3650,
        }
    }
}

impl SimulationParams {
    /// Parse and validate a JSON parameter document; missing keys keep defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, CompostError> {
        let params: SimulationParams = serde_json::from_str(raw)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CompostError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Check bands, rates and limits before a model uses them.
    pub fn validate(&self) -> Result<(), CompostError> {
        self.temperature_band.check("temperature_band")?;
        self.moisture_band.check("moisture_band")?;
        self.ph_band.check("ph_band")?;
        self.temperature_bounds.check("temperature_bounds")?;
        self.moisture_bounds.check("moisture_bounds")?;
        self.ph_bounds.check("ph_bounds")?;

        if let ResponseCurve::Step { fallback } = self.response {
            unit_interval("response.fallback", fallback)?;
        }
        unit_interval("decay_constant", self.decay_constant)?;
        unit_interval("ph_drift_midpoint", self.ph_drift_midpoint)?;

        for (name, rate) in [
            ("heat_gain", self.heat_gain),
            ("cooling_loss", self.cooling_loss),
            ("evaporation_base", self.evaporation_base),
            ("evaporation_per_activity", self.evaporation_per_activity),
            ("ph_drift_rate", self.ph_drift_rate),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(CompostError::Config(format!(
                    "{name} must be finite and non-negative (got {rate})"
                )));
            }
        }

        if self.max_days == 0 {
            return Err(CompostError::Config("max_days must be > 0".into()));
        }
        Ok(())
    }
}

fn unit_interval(name: &str, value: f64) -> Result<(), CompostError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CompostError::Config(format!(
            "{name} must lie in [0, 1] (got {value})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let params = SimulationParams::default();
        params.validate().unwrap();
        assert_eq!(params.response, ResponseCurve::Step { fallback: 0.2 });
        assert_eq!(params.moisture_band, Band::new(50.0, 65.0));
        assert_eq!(params.decay_constant, 0.04);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let params = SimulationParams::from_json_str(
            r#"{ "decay_constant": 0.02, "response": { "kind": "continuous" } }"#,
        )
        .unwrap();
        assert_eq!(params.decay_constant, 0.02);
        assert_eq!(params.response, ResponseCurve::Continuous);
        assert_eq!(params.heat_gain, 3.0);
        assert_eq!(params.ph_bounds, Band::new(5.5, 8.5));
    }

    #[test]
    fn inverted_band_is_rejected() {
        let err = SimulationParams::from_json_str(
            r#"{ "temperature_band": { "min": 65.0, "max": 45.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CompostError::Config(_)));
    }

    #[test]
    fn out_of_range_constants_are_rejected() {
        let mut params = SimulationParams {
            decay_constant: 1.5,
            ..SimulationParams::default()
        };
        assert!(params.validate().is_err());

        params.decay_constant = 0.04;
        params.response = ResponseCurve::Step { fallback: -0.1 };
        assert!(params.validate().is_err());

        params.response = ResponseCurve::default();
        params.cooling_loss = f64::NAN;
        assert!(params.validate().is_err());

        params.cooling_loss = 1.2;
        params.max_days = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_days": 90, "heat_gain": 2.5 }}"#).unwrap();

        let params = SimulationParams::from_json_file(file.path()).unwrap();
        assert_eq!(params.max_days, 90);
        assert_eq!(params.heat_gain, 2.5);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SimulationParams::from_json_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CompostError::Io(_)));
    }

    #[test]
    fn band_helpers() {
        let band = Band::new(6.5, 8.0);
        assert!(band.contains(6.5));
        assert!(band.contains(8.0));
        assert!(!band.contains(8.01));
        assert!((band.midpoint() - 7.25).abs() < 1e-12);
        assert!((band.width() - 1.5).abs() < 1e-12);
        assert_eq!(band.clamp(9.0), 8.0);
    }
}
