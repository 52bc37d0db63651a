#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system that summarises a play session.

use std::time::Duration;

use maze_chase_core::{CollectibleKind, Event, ExitBlock, Hazard, PlayStatus};
use serde::Serialize;

/// Aggregated statistics describing a play session so far.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionReport {
    /// Number of ticks observed.
    pub ticks: u64,
    /// Simulated time covered by the observed ticks.
    pub elapsed: Duration,
    /// Total distance travelled by the avatar in pixels, teleports included.
    pub avatar_distance: f32,
    /// Required keys collected.
    pub keys_collected: u32,
    /// Speed boosts collected.
    pub boosts_collected: u32,
    /// Lives lost to danger zones.
    pub lives_lost_to_danger: u32,
    /// Lives lost to pursuers.
    pub lives_lost_to_pursuers: u32,
    /// Times the gate opened or closed.
    pub gate_toggles: u32,
    /// Exit attempts refused because a key was missing.
    pub refused_missing_key: u32,
    /// Exit attempts refused because the gate was closed.
    pub refused_gate_closed: u32,
    /// Levels completed.
    pub levels_completed: u32,
    /// Most recently announced play status.
    pub status: PlayStatus,
}

impl SessionReport {
    /// Total number of lives lost regardless of cause.
    #[must_use]
    pub fn lives_lost(&self) -> u32 {
        self.lives_lost_to_danger + self.lives_lost_to_pursuers
    }
}

/// Pure analytics system that folds world events into a [`SessionReport`].
#[derive(Debug, Default)]
pub struct Analytics {
    report: SessionReport,
}

impl Analytics {
    /// Creates a new analytics system with an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the report accumulated so far.
    #[must_use]
    pub fn report(&self) -> &SessionReport {
        &self.report
    }

    /// Consumes a batch of world events.
    pub fn handle(&mut self, events: &[Event]) {
        let report = &mut self.report;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    report.ticks += 1;
                    report.elapsed = report.elapsed.saturating_add(*dt);
                }
                Event::AvatarMoved { from, to } => {
                    report.avatar_distance += from.distance(*to);
                }
                Event::ItemCollected { kind, .. } => match kind {
                    CollectibleKind::RequiredKey => report.keys_collected += 1,
                    CollectibleKind::SpeedBoost => report.boosts_collected += 1,
                },
                Event::LifeLost { cause, .. } => match cause {
                    Hazard::DangerZone => report.lives_lost_to_danger += 1,
                    Hazard::Pursuer(_) => report.lives_lost_to_pursuers += 1,
                },
                Event::GateToggled { .. } => report.gate_toggles += 1,
                Event::ExitBlocked { reason } => match reason {
                    ExitBlock::MissingKey => report.refused_missing_key += 1,
                    ExitBlock::GateClosed => report.refused_gate_closed += 1,
                },
                Event::LevelCompleted { .. } => report.levels_completed += 1,
                Event::StatusChanged { status } => report.status = *status,
                Event::LevelLoaded { .. }
                | Event::PursuerMoved { .. }
                | Event::SpeedBoostExpired => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_report_is_playing_and_empty() {
        let analytics = Analytics::new();

        assert_eq!(analytics.report().status, PlayStatus::Playing);
        assert_eq!(analytics.report().ticks, 0);
        assert_eq!(analytics.report().lives_lost(), 0);
    }

    #[test]
    fn ticks_accumulate_elapsed_time() {
        let mut analytics = Analytics::new();
        let tick = Event::TimeAdvanced {
            dt: Duration::from_millis(250),
        };

        analytics.handle(&[tick.clone(), tick.clone(), tick]);

        assert_eq!(analytics.report().ticks, 3);
        assert_eq!(analytics.report().elapsed, Duration::from_millis(750));
    }
}
