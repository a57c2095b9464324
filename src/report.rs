//! Summary metrics and chart series for presenting a run.

use serde::{Deserialize, Serialize};

use crate::bin_state::{BinState, HistoryEntry};

/// Headline numbers shown after a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub days: usize,
    pub initial_mass: f64,
    pub final_mass: f64,
    pub final_activity: f64,
    /// `(1 - final_mass / initial_mass) * 100`.
    pub mass_reduction_pct: f64,
}

impl RunSummary {
    pub fn from_history(initial: &BinState, history: &[HistoryEntry]) -> Self {
        let (final_mass, final_activity) = history
            .last()
            .map(|e| (e.mass, e.microbial_activity))
            .unwrap_or((initial.mass, initial.microbial_activity));

        let mass_reduction_pct = if initial.mass > 0.0 {
            (1.0 - final_mass / initial.mass) * 100.0
        } else {
            0.0
        };

        Self {
            days: history.len(),
            initial_mass: initial.mass,
            final_mass,
            final_activity,
            mass_reduction_pct,
        }
    }
}

/// `(day, mass)` points.
pub fn mass_series(history: &[HistoryEntry]) -> Vec<(u32, f64)> {
    history.iter().map(|e| (e.day, e.mass)).collect()
}

/// `(day, microbial_activity)` points.
pub fn activity_series(history: &[HistoryEntry]) -> Vec<(u32, f64)> {
    history.iter().map(|e| (e.day, e.microbial_activity)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: u32, mass: f64, activity: f64) -> HistoryEntry {
        HistoryEntry {
            day,
            mass,
            temperature: 50.0,
            moisture: 55.0,
            ph: 7.0,
            microbial_activity: activity,
        }
    }

    #[test]
    fn summary_uses_initial_mass_as_reference() {
        let initial = BinState::new(10.0, 50.0, 55.0, 7.0, 1.0);
        let history = vec![entry(1, 9.0, 1.0), entry(2, 8.0, 0.5)];
        let summary = RunSummary::from_history(&initial, &history);

        assert_eq!(summary.days, 2);
        assert_eq!(summary.final_mass, 8.0);
        assert_eq!(summary.final_activity, 0.5);
        assert!((summary.mass_reduction_pct - 20.0).abs() < 1e-9);
    }

    #[test]
    fn empty_history_reports_no_reduction() {
        let initial = BinState::new(10.0, 50.0, 55.0, 7.0, 1.0).with_activity(0.3);
        let summary = RunSummary::from_history(&initial, &[]);
        assert_eq!(summary.days, 0);
        assert_eq!(summary.final_mass, 10.0);
        assert_eq!(summary.final_activity, 0.3);
        assert_eq!(summary.mass_reduction_pct, 0.0);
    }

    #[test]
    fn series_follow_history_order() {
        let history = vec![entry(1, 9.0, 1.0), entry(2, 8.5, 0.2)];
        assert_eq!(mass_series(&history), vec![(1, 9.0), (2, 8.5)]);
        assert_eq!(activity_series(&history), vec![(1, 1.0), (2, 0.2)]);
    }
}
