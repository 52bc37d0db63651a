//! Per-level state rebuilt wholesale whenever a level is loaded.

use std::time::Duration;

use glam::Vec2;
use maze_chase_core::{
    cell_center, CellCoord, CollectibleKind, CollectibleSnapshot, Event, GateSnapshot, PixelRect,
    PursuerId, PursuerSnapshot, Tuning, WalkabilityGrid,
};

use crate::level::LevelPlan;

#[derive(Clone, Debug)]
pub(crate) struct Room {
    pub(crate) grid: WalkabilityGrid,
    pub(crate) walls: Vec<PixelRect>,
    pub(crate) danger_cells: Vec<CellCoord>,
    pub(crate) danger_zones: Vec<PixelRect>,
    pub(crate) exit_cell: CellCoord,
    pub(crate) exit: Vec2,
    pub(crate) collectibles: Vec<Collectible>,
    pub(crate) gate: Option<Gate>,
    pub(crate) pursuers: Vec<Pursuer>,
    pub(crate) boost_remaining: Option<Duration>,
    next_pursuer_id: u32,
}

impl Room {
    /// Builds the room, numbering pursuers from `first_pursuer` upward.
    pub(crate) fn build(plan: &LevelPlan, tuning: &Tuning, first_pursuer: u32) -> Self {
        let tile = tuning.tile_length;
        let pursuers: Vec<Pursuer> = (first_pursuer..)
            .zip(plan.pursuers())
            .map(|(id, cell)| Pursuer {
                id: PursuerId::new(id),
                position: cell_center(*cell, tile),
                speed: tuning.pursuer_speed,
                half_extent: tuning.pursuer_half_extent,
            })
            .collect();
        let spawned = u32::try_from(pursuers.len()).unwrap_or(u32::MAX);

        Self {
            grid: plan.grid().clone(),
            walls: plan
                .walls()
                .iter()
                .map(|cell| PixelRect::cell(*cell, tile))
                .collect(),
            danger_cells: plan.danger().to_vec(),
            danger_zones: plan
                .danger()
                .iter()
                .map(|cell| PixelRect::cell(*cell, tile))
                .collect(),
            exit_cell: plan.exit(),
            exit: cell_center(plan.exit(), tile),
            collectibles: plan
                .collectibles()
                .iter()
                .map(|(kind, cell)| Collectible {
                    kind: *kind,
                    cell: *cell,
                    collected: false,
                })
                .collect(),
            gate: plan
                .gate()
                .map(|cell| Gate::closed(cell, tuning.gate_interval_secs)),
            pursuers,
            boost_remaining: None,
            next_pursuer_id: first_pursuer.saturating_add(spawned),
        }
    }

    /// Walls plus the gate while it is closed.
    pub(crate) fn solids(&self, tile_length: f32) -> Vec<PixelRect> {
        let mut solids = self.walls.clone();
        if let Some(gate) = self.gate.as_ref().filter(|gate| !gate.open) {
            solids.push(PixelRect::cell(gate.cell, tile_length));
        }
        solids
    }

    pub(crate) fn required_keys_remaining(&self) -> usize {
        self.collectibles
            .iter()
            .filter(|item| item.kind == CollectibleKind::RequiredKey && !item.collected)
            .count()
    }

    pub(crate) fn advance_boost(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let Some(remaining) = self.boost_remaining else {
            return;
        };

        let remaining = remaining.saturating_sub(dt);
        if remaining.is_zero() {
            self.boost_remaining = None;
            out_events.push(Event::SpeedBoostExpired);
        } else {
            self.boost_remaining = Some(remaining);
        }
    }

    /// Identifier the next room should start numbering pursuers from.
    pub(crate) fn next_pursuer_id(&self) -> u32 {
        self.next_pursuer_id
    }

    pub(crate) fn pursuer_mut(&mut self, id: PursuerId) -> Option<&mut Pursuer> {
        self.pursuers.iter_mut().find(|pursuer| pursuer.id == id)
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Collectible {
    pub(crate) kind: CollectibleKind,
    pub(crate) cell: CellCoord,
    pub(crate) collected: bool,
}

impl Collectible {
    pub(crate) fn snapshot(&self) -> CollectibleSnapshot {
        CollectibleSnapshot {
            kind: self.kind,
            cell: self.cell,
            collected: self.collected,
        }
    }
}

/// Gate that toggles between open and closed on a whole-second countdown.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Gate {
    pub(crate) cell: CellCoord,
    pub(crate) open: bool,
    countdown: u32,
    interval: u32,
    elapsed: Duration,
}

impl Gate {
    fn closed(cell: CellCoord, interval: u32) -> Self {
        let interval = interval.max(1);
        Self {
            cell,
            open: false,
            countdown: interval,
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Counts down whole seconds, toggling each time the countdown runs out.
    ///
    /// A step spanning several toggles reports only the resulting state, and
    /// only when it differs from the state before the step.
    pub(crate) fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let elapsed = self.elapsed.saturating_add(dt);
        let seconds = elapsed.as_secs();
        self.elapsed = Duration::new(0, elapsed.subsec_nanos());

        let countdown = u64::from(self.countdown);
        if seconds < countdown {
            self.countdown -= u32::try_from(seconds).unwrap_or(0);
            return;
        }

        let interval = u64::from(self.interval);
        let overflow = seconds - countdown;
        let toggles = 1 + overflow / interval;
        self.countdown = self.interval - u32::try_from(overflow % interval).unwrap_or(0);

        if toggles % 2 == 1 {
            self.open = !self.open;
            out_events.push(Event::GateToggled { open: self.open });
        }
    }

    pub(crate) fn snapshot(&self) -> GateSnapshot {
        GateSnapshot {
            cell: self.cell,
            open: self.open,
            countdown: self.countdown,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Pursuer {
    pub(crate) id: PursuerId,
    pub(crate) position: Vec2,
    pub(crate) speed: f32,
    pub(crate) half_extent: f32,
}

impl Pursuer {
    pub(crate) fn snapshot(&self) -> PursuerSnapshot {
        PursuerSnapshot {
            id: self.id,
            position: self.position,
            speed: self.speed,
            half_extent: self.half_extent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_toggles_once_per_interval() {
        let mut gate = Gate::closed(CellCoord::new(0, 0), 2);
        let mut events = Vec::new();

        gate.advance(Duration::from_millis(1500), &mut events);
        assert!(events.is_empty());
        assert_eq!(gate.snapshot().countdown, 1);

        gate.advance(Duration::from_millis(500), &mut events);
        assert_eq!(events, vec![Event::GateToggled { open: true }]);
        assert_eq!(gate.snapshot().countdown, 2);

        gate.advance(Duration::from_secs(2), &mut events);
        assert_eq!(events.last(), Some(&Event::GateToggled { open: false }));
        assert!(!gate.open);
    }

    #[test]
    fn zero_interval_gates_still_toggle() {
        let mut gate = Gate::closed(CellCoord::new(0, 0), 0);
        let mut events = Vec::new();

        for _ in 0..3 {
            gate.advance(Duration::from_secs(1), &mut events);
        }

        assert_eq!(events.len(), 3);
        assert!(gate.open);
    }

    #[test]
    fn long_steps_collapse_to_the_resulting_state() {
        let mut gate = Gate::closed(CellCoord::new(0, 0), 2);
        let mut events = Vec::new();

        gate.advance(Duration::from_secs(3), &mut events);
        assert_eq!(events, vec![Event::GateToggled { open: true }]);
        assert_eq!(gate.snapshot().countdown, 1);

        gate.advance(Duration::from_secs(3), &mut events);
        assert_eq!(events.len(), 1);
        assert!(gate.open);
        assert_eq!(gate.snapshot().countdown, 2);
    }

    #[test]
    fn maximal_steps_finish_immediately() {
        let mut gate = Gate::closed(CellCoord::new(0, 0), 2);
        let mut events = Vec::new();

        gate.advance(Duration::MAX, &mut events);
        gate.advance(Duration::MAX, &mut events);

        assert!(events.len() <= 2);
        assert!((1..=2).contains(&gate.snapshot().countdown));
    }
}
