use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CompostError;

const RANGE_SEPARATOR: char = '–';

/// A property cell as it appears in the waste table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// No defined value; contributes nothing when mixing.
    #[default]
    Absent,
    Number(f64),
    /// A numeric string or an en-dash range such as `"55–65"`.
    Text(String),
}

impl PropertyValue {
    /// Resolve to the value used for blending.
    ///
    /// Ranges resolve to their midpoint. Blank text and a lone dash are
    /// treated as absent.
    pub fn resolve(&self, property: &'static str) -> Result<Option<f64>, CompostError> {
        let malformed = |raw: &str| CompostError::MalformedProperty {
            property,
            value: raw.to_string(),
        };

        match self {
            PropertyValue::Absent => Ok(None),
            PropertyValue::Number(v) if v.is_finite() => Ok(Some(*v)),
            PropertyValue::Number(v) => Err(malformed(v.to_string().as_str())),
            PropertyValue::Text(raw) => {
                let raw = raw.as_str();
                let text = raw.trim();
                if text.is_empty() || text == "–" || text == "-" {
                    return Ok(None);
                }
                if let Some((low, high)) = text.split_once(RANGE_SEPARATOR) {
                    let low = parse_finite(low).ok_or_else(|| malformed(raw))?;
                    let high = parse_finite(high).ok_or_else(|| malformed(raw))?;
                    return Ok(Some((low + high) / 2.0));
                }
                parse_finite(text).map(Some).ok_or_else(|| malformed(raw))
            }
        }
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Chemical and physical attributes of one waste type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteProperties {
    #[serde(rename = "Waste Type")]
    pub name: String,
    #[serde(rename = "Target Temp (°C)", default)]
    pub target_temperature: PropertyValue,
    /// Percent.
    #[serde(rename = "Moisture (%)", default)]
    pub moisture: PropertyValue,
    #[serde(rename = "Optimal pH", default)]
    pub optimal_ph: PropertyValue,
    /// Breakdown timeframe; also carries the non-processable flags.
    #[serde(rename = "Timeframe", default)]
    pub timeframe: String,
}

impl WasteProperties {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_temperature: PropertyValue::Absent,
            moisture: PropertyValue::Absent,
            optimal_ph: PropertyValue::Absent,
            timeframe: String::new(),
        }
    }

    /// False for synthetics, biohazards and anything that never breaks down.
    pub fn is_processable(&self) -> bool {
        let timeframe = self.timeframe.to_lowercase();
        !["cannot", "indefinite", "non-biodegradable"]
            .iter()
            .any(|flag| timeframe.contains(flag))
    }
}

/// Read-only source of waste properties keyed by waste type name.
pub trait WasteLookup {
    /// Names in the order the backing store lists them.
    fn waste_type_names(&self) -> Vec<String>;

    /// Properties for `name`, or `NotFound`.
    fn waste_properties(&self, name: &str) -> Result<WasteProperties, CompostError>;
}

/// In-memory waste table, loadable from a JSON array of records.
#[derive(Debug, Clone, Default)]
pub struct WasteCatalog {
    entries: Vec<WasteProperties>,
}

impl WasteCatalog {
    pub fn from_entries(entries: Vec<WasteProperties>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CompostError> {
        let entries: Vec<WasteProperties> = serde_json::from_str(raw)?;
        tracing::debug!(entries = entries.len(), "loaded waste catalog");
        Ok(Self { entries })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CompostError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WasteLookup for WasteCatalog {
    fn waste_type_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    fn waste_properties(&self, name: &str) -> Result<WasteProperties, CompostError> {
        // First match wins on duplicate names.
        self.entries
            .iter()
            .find(|e| e.name == name)
            .cloned()
            .ok_or_else(|| CompostError::NotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"[
        {
            "Waste Type": "Vegetable Scraps",
            "Target Temp (°C)": "55–65",
            "Moisture (%)": 60,
            "Optimal pH": "6.5–7.5",
            "Timeframe": "2–4 weeks"
        },
        {
            "Waste Type": "Plastic Bag",
            "Target Temp (°C)": null,
            "Moisture (%)": "–",
            "Optimal pH": "–",
            "Timeframe": "Cannot Process"
        },
        {
            "Waste Type": "Vegetable Scraps",
            "Timeframe": "duplicate"
        }
    ]"#;

    #[test]
    fn resolves_numbers_ranges_and_sentinels() {
        assert_eq!(PropertyValue::Absent.resolve("pH").unwrap(), None);
        assert_eq!(PropertyValue::Number(55.0).resolve("pH").unwrap(), Some(55.0));
        assert_eq!(
            PropertyValue::Text("40–60".into()).resolve("pH").unwrap(),
            Some(50.0)
        );
        assert_eq!(
            PropertyValue::Text(" 6.5 – 7.5 ".into()).resolve("pH").unwrap(),
            Some(7.0)
        );
        assert_eq!(PropertyValue::Text("–".into()).resolve("pH").unwrap(), None);
        assert_eq!(PropertyValue::Text("".into()).resolve("pH").unwrap(), None);
        assert_eq!(PropertyValue::Text("58".into()).resolve("pH").unwrap(), Some(58.0));
    }

    #[test]
    fn malformed_values_are_errors() {
        let err = PropertyValue::Text("abc–60".into())
            .resolve("temperature")
            .unwrap_err();
        assert!(matches!(
            err,
            CompostError::MalformedProperty { property: "temperature", .. }
        ));
        assert!(PropertyValue::Text("warm".into()).resolve("temperature").is_err());
        assert!(PropertyValue::Number(f64::INFINITY).resolve("temperature").is_err());
    }

    #[test]
    fn flags_non_processable_timeframes() {
        let mut waste = WasteProperties::new("Styrofoam");
        waste.timeframe = "Cannot Process".into();
        assert!(!waste.is_processable());
        waste.timeframe = "Indefinite (synthetic)".into();
        assert!(!waste.is_processable());
        waste.timeframe = "Non-biodegradable".into();
        assert!(!waste.is_processable());
        waste.timeframe = "3–6 months".into();
        assert!(waste.is_processable());
        waste.timeframe = String::new();
        assert!(waste.is_processable());
    }

    #[test]
    fn catalog_lists_names_in_order() {
        let catalog = WasteCatalog::from_json_str(CATALOG).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.waste_type_names(),
            vec!["Vegetable Scraps", "Plastic Bag", "Vegetable Scraps"]
        );
    }

    #[test]
    fn catalog_lookup() {
        let catalog = WasteCatalog::from_json_str(CATALOG).unwrap();

        let veg = catalog.waste_properties("Vegetable Scraps").unwrap();
        assert_eq!(veg.target_temperature, PropertyValue::Text("55–65".into()));
        assert_eq!(veg.moisture, PropertyValue::Number(60.0));
        assert_eq!(veg.timeframe, "2–4 weeks");

        let bag = catalog.waste_properties("Plastic Bag").unwrap();
        assert_eq!(bag.target_temperature, PropertyValue::Absent);
        assert!(!bag.is_processable());

        let err = catalog.waste_properties("Glass Jar").unwrap_err();
        assert!(matches!(err, CompostError::NotFound { name } if name == "Glass Jar"));
    }

    #[test]
    fn catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        let catalog = WasteCatalog::from_json_file(file.path()).unwrap();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            WasteCatalog::from_json_str("{ not json"),
            Err(CompostError::Json(_))
        ));
    }
}
