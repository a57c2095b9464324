//! Microbial activity as a limiting-factor product.
//!
//! Temperature, moisture and pH each map onto a sub-score in [0,1] through the
//! configured response curve. Activity is the product of the three sub-scores
//! and the oxygen level, so one poor factor suppresses the whole score and no
//! factor can make up for another.

use crate::bin_state::BinState;
use crate::config::{Band, ResponseCurve, SimulationParams};

/// Sub-scores behind one activity value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityBreakdown {
    pub temperature: f64,
    pub moisture: f64,
    pub ph: f64,
    pub oxygen: f64,
}

impl ActivityBreakdown {
    /// Product of all factors, clamped to [0,1].
    pub fn activity(&self) -> f64 {
        (self.temperature * self.moisture * self.ph * self.oxygen).clamp(0.0, 1.0)
    }
}

/// Score one variable against its optimum band under `curve`.
pub fn sub_score(curve: ResponseCurve, value: f64, band: Band) -> f64 {
    match curve {
        ResponseCurve::Step { fallback } => {
            if band.contains(value) {
                1.0
            } else {
                fallback
            }
        }
        ResponseCurve::Continuous => {
            if !band.contains(value) {
                return 0.0;
            }
            1.0 - (value - band.midpoint()).abs() / band.width()
        }
    }
}

/// Per-factor sub-scores for the bin's current conditions.
pub fn breakdown(state: &BinState, params: &SimulationParams) -> ActivityBreakdown {
    let curve = params.response;
    ActivityBreakdown {
        temperature: sub_score(curve, state.temperature, params.temperature_band),
        moisture: sub_score(curve, state.moisture, params.moisture_band),
        ph: sub_score(curve, state.ph, params.ph_band),
        oxygen: state.oxygen.clamp(0.0, 1.0),
    }
}

/// Limiting-factor activity in [0,1].
pub fn activity(state: &BinState, params: &SimulationParams) -> f64 {
    breakdown(state, params).activity()
}
