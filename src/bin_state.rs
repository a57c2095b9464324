use serde::{Deserialize, Deserializer, Serialize};

use crate::config::{Band, SimulationParams};
use crate::error::CompostError;

/// Physical and chemical condition of one compost bin.
///
/// The bin is a single well-mixed volume. Moisture is in percent.
/// `microbial_activity` is derived by the model on every step; callers only
/// set it when seeding a bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinState {
    /// Solid waste mass, kg.
    #[serde(deserialize_with = "lenient_f64")]
    pub mass: f64,
    /// Bulk temperature, °C.
    #[serde(deserialize_with = "lenient_f64")]
    pub temperature: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub moisture: f64,
    #[serde(rename = "pH", alias = "ph", deserialize_with = "lenient_f64")]
    pub ph: f64,
    /// Aeration level in [0,1], maintained outside the model (turning).
    #[serde(deserialize_with = "lenient_f64")]
    pub oxygen: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub microbial_activity: f64,
    #[serde(default)]
    pub day: u32,
}

impl BinState {
    /// Seed a bin at day 0 with no recorded activity.
    pub fn new(mass: f64, temperature: f64, moisture: f64, ph: f64, oxygen: f64) -> Self {
        Self {
            mass,
            temperature,
            moisture,
            ph,
            oxygen,
            microbial_activity: 0.0,
            day: 0,
        }
    }

    /// Seed the initial activity reading.
    pub fn with_activity(mut self, microbial_activity: f64) -> Self {
        self.microbial_activity = microbial_activity;
        self
    }

    /// Normalize a loosely-typed mapping into a validated bin state.
    ///
    /// Numbers may arrive as JSON numbers or numeric strings; `microbial_activity`
    /// and `day` default to zero when missing.
    pub fn from_value(value: &serde_json::Value, params: &SimulationParams) -> Result<Self, CompostError> {
        let state = BinState::deserialize(value)
            .map_err(|e| CompostError::InvalidState(e.to_string()))?;
        state.validate(params)?;
        Ok(state)
    }

    /// Reject non-finite fields, non-positive mass, oxygen or activity outside
    /// [0,1], and temperature, moisture or pH outside the clamp bounds.
    pub fn validate(&self, params: &SimulationParams) -> Result<(), CompostError> {
        let fields = [
            ("mass", self.mass),
            ("temperature", self.temperature),
            ("moisture", self.moisture),
            ("pH", self.ph),
            ("oxygen", self.oxygen),
            ("microbial_activity", self.microbial_activity),
        ];
        if let Some((name, v)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(CompostError::InvalidState(format!("{name} is not finite ({v})")));
        }
        if self.mass <= 0.0 {
            return Err(CompostError::InvalidState(format!(
                "mass must be positive (got {})",
                self.mass
            )));
        }
        if !(0.0..=1.0).contains(&self.oxygen) {
            return Err(CompostError::InvalidState(format!(
                "oxygen must lie in [0, 1] (got {})",
                self.oxygen
            )));
        }
        if !(0.0..=1.0).contains(&self.microbial_activity) {
            return Err(CompostError::InvalidState(format!(
                "microbial_activity must lie in [0, 1] (got {})",
                self.microbial_activity
            )));
        }
        within("temperature", self.temperature, params.temperature_bounds)?;
        within("moisture", self.moisture, params.moisture_bounds)?;
        within("pH", self.ph, params.ph_bounds)?;
        Ok(())
    }

    /// History record of the bin as it stands now.
    pub fn snapshot(&self) -> HistoryEntry {
        HistoryEntry {
            day: self.day,
            mass: self.mass,
            temperature: self.temperature,
            moisture: self.moisture,
            ph: self.ph,
            microbial_activity: self.microbial_activity,
        }
    }
}

fn within(name: &str, value: f64, bounds: Band) -> Result<(), CompostError> {
    if bounds.contains(value) {
        Ok(())
    } else {
        Err(CompostError::InvalidState(format!(
            "{name} {value} outside [{}, {}]",
            bounds.min, bounds.max
        )))
    }
}

/// One simulated day, captured after that day's update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub day: u32,
    pub mass: f64,
    pub temperature: f64,
    pub moisture: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub microbial_activity: f64,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Number(f64),
        Text(String),
    }

    match Loose::deserialize(deserializer)? {
        Loose::Number(v) => Ok(v),
        Loose::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}
