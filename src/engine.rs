use tracing::{debug, info, warn};

use crate::bin_state::{BinState, HistoryEntry};
use crate::config::SimulationParams;
use crate::error::CompostError;
use crate::scoring;
use crate::waste::{WasteLookup, WasteProperties};

/// Compost bin model: waste mixing plus the daily activity/decay step.
///
/// Holds only parameters. Bin state is owned by the caller and passed in, so
/// one model can drive any number of bins.
#[derive(Debug, Clone, Default)]
pub struct CompostModel {
    params: SimulationParams,
}

impl CompostModel {
    /// Build a model after validating `params`.
    pub fn new(params: SimulationParams) -> Result<Self, CompostError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Parameters this model was built with.
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Blend `waste_mass` kg of `waste` into the bin.
    ///
    /// Each resolvable property moves the bin value to the mass-weighted
    /// average `(c*M + v*m) / (M + m)` with `M` the mass before mixing.
    /// Nothing is mutated unless every check and every property parse passes.
    pub fn mix(
        &self,
        state: &mut BinState,
        waste: &WasteProperties,
        waste_mass: f64,
    ) -> Result<(), CompostError> {
        if !waste.is_processable() {
            warn!(waste = %waste.name, timeframe = %waste.timeframe, "rejected non-processable waste");
            return Err(CompostError::NonProcessableWaste {
                name: waste.name.clone(),
                timeframe: waste.timeframe.clone(),
            });
        }
        if !waste_mass.is_finite() || waste_mass <= 0.0 {
            return Err(CompostError::InvalidMass(waste_mass));
        }
        state.validate(&self.params)?;

        let temperature = waste.target_temperature.resolve("temperature")?;
        let moisture = waste.moisture.resolve("moisture")?;
        let ph = waste.optimal_ph.resolve("pH")?;

        let bin_mass = state.mass;
        let total = bin_mass + waste_mass;
        let blend = |current: f64, target: Option<f64>| match target {
            Some(v) => (current * bin_mass + v * waste_mass) / total,
            None => current,
        };

        let p = &self.params;
        state.temperature = p.temperature_bounds.clamp(blend(state.temperature, temperature));
        state.moisture = p.moisture_bounds.clamp(blend(state.moisture, moisture));
        state.ph = p.ph_bounds.clamp(blend(state.ph, ph));
        state.mass = total;

        debug!(
            waste = %waste.name,
            waste_mass,
            mass = state.mass,
            temperature = state.temperature,
            moisture = state.moisture,
            ph = state.ph,
            "mixed waste into bin"
        );
        Ok(())
    }

    /// Look up `name` and mix it in.
    pub fn add_waste_by_name<L: WasteLookup + ?Sized>(
        &self,
        state: &mut BinState,
        lookup: &L,
        name: &str,
        waste_mass: f64,
    ) -> Result<(), CompostError> {
        let waste = lookup.waste_properties(name)?;
        self.mix(state, &waste, waste_mass)
    }

    /// Recompute and store the bin's microbial activity.
    pub fn score(&self, state: &mut BinState) -> f64 {
        let activity = self.activity_of(state);
        state.microbial_activity = activity;
        activity
    }

    /// Activity the bin would score now, without storing it.
    pub fn activity_of(&self, state: &BinState) -> f64 {
        scoring::activity(state, &self.params)
    }

    /// Advance the bin by one day and return the post-step snapshot.
    ///
    /// Each variable is clamped as the last operation of its own sub-step.
    pub fn advance(&self, state: &mut BinState) -> HistoryEntry {
        let p = &self.params;
        let activity = self.score(state);

        // First-order decay.
        let mass_loss = state.mass * (p.decay_constant * activity);
        state.mass = (state.mass - mass_loss).max(0.0);

        state.temperature = p
            .temperature_bounds
            .clamp(state.temperature + activity * p.heat_gain - p.cooling_loss);

        let evaporation = p.evaporation_base + activity * p.evaporation_per_activity;
        state.moisture = p.moisture_bounds.clamp(state.moisture - evaporation);

        state.ph = p
            .ph_bounds
            .clamp(state.ph + (activity - p.ph_drift_midpoint) * p.ph_drift_rate);

        state.day = state.day.saturating_add(1);
        state.snapshot()
    }

    /// Simulate `days` consecutive days from a copy of `initial`.
    ///
    /// The caller's state is left untouched. Day numbering restarts at 1.
    pub fn run(&self, initial: &BinState, days: i64) -> Result<Vec<HistoryEntry>, CompostError> {
        let days = self.check_duration(days)?;
        initial.validate(&self.params)?;

        let mut state = initial.clone();
        state.day = 0;

        info!(days, mass = state.mass, "starting compost run");
        let history: Vec<HistoryEntry> = (0..days).map(|_| self.advance(&mut state)).collect();

        if let Some(last) = history.last() {
            info!(
                days,
                final_mass = last.mass,
                final_activity = last.microbial_activity,
                "compost run finished"
            );
        }
        Ok(history)
    }

    /// Run from a loosely-typed mapping, normalized through `BinState::from_value`.
    pub fn run_value(
        &self,
        initial: &serde_json::Value,
        days: i64,
    ) -> Result<Vec<HistoryEntry>, CompostError> {
        let days_checked = self.check_duration(days)?;
        let state = BinState::from_value(initial, &self.params)?;
        self.run(&state, i64::from(days_checked))
    }

    /// Run independent scenarios concurrently, one scoped thread per bin.
    ///
    /// Results keep the order of `scenarios`. Every input is validated before
    /// any thread starts.
    pub fn run_batch(
        &self,
        scenarios: &[BinState],
        days: i64,
    ) -> Result<Vec<Vec<HistoryEntry>>, CompostError> {
        let days = i64::from(self.check_duration(days)?);
        for scenario in scenarios {
            scenario.validate(&self.params)?;
        }

        std::thread::scope(|scope| {
            let handles: Vec<_> = scenarios
                .iter()
                .map(|scenario| scope.spawn(move || self.run(scenario, days)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        })
    }

    fn check_duration(&self, days: i64) -> Result<u32, CompostError> {
        if days < 0 {
            return Err(CompostError::InvalidDuration(format!(
                "days must be non-negative (got {days})"
            )));
        }
        if days > i64::from(self.params.max_days) {
            return Err(CompostError::InvalidDuration(format!(
                "days must not exceed {} (got {days})",
                self.params.max_days
            )));
        }
        // Bounded by max_days above.
        Ok(days as u32)
    }
}
