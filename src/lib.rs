//! Compost bin digital twin.
//!
//! A bin is a single well-mixed volume described by [`BinState`]. Waste is
//! blended in by mass-weighted averaging, then [`CompostModel`] advances the
//! bin day by day: microbial activity is scored from temperature, moisture,
//! pH and oxygen, and drives mass loss, self-heating, evaporation and pH drift.

pub mod bin_state;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod report;
pub mod scoring;
pub mod waste;

pub use bin_state::{BinState, HistoryEntry};
pub use config::{Band, ResponseCurve, SimulationParams};
pub use engine::CompostModel;
pub use error::CompostError;
pub use report::{activity_series, mass_series, RunSummary};
pub use scoring::ActivityBreakdown;
pub use waste::{PropertyValue, WasteCatalog, WasteLookup, WasteProperties};
