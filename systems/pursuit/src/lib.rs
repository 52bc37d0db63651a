#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pursuer controller that re-plans a grid path toward the avatar every tick.

use glam::Vec2;
use maze_chase_core::{
    cell_at, cell_center, CellCoord, Command, Event, PlayStatus, PursuerSnapshot,
    WalkabilityGrid,
};
use maze_chase_system_pathfinding::find_path;

/// Waypoints closer than this distance produce no movement.
const ARRIVAL_EPSILON: f32 = 0.01;

/// Pure system that reacts to world events and emits pursuer movement commands.
#[derive(Debug)]
pub struct Pursuit {
    status: PlayStatus,
}

impl Pursuit {
    /// Consumes world events and immutable views to emit pursuer commands.
    ///
    /// Nothing is emitted unless the batch contains [`Event::TimeAdvanced`]
    /// and the session is still being played. Pursuers that stay put produce
    /// no command.
    pub fn handle(
        &mut self,
        events: &[Event],
        pursuers: &[PursuerSnapshot],
        avatar_position: Vec2,
        grid: &WalkabilityGrid,
        tile_length: f32,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::StatusChanged { status } = event {
                self.status = *status;
            }
        }

        if self.status != PlayStatus::Playing {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let avatar_cell = cell_at(avatar_position, tile_length);
        for pursuer in pursuers {
            let position = step(pursuer, avatar_cell, grid, tile_length);
            if position != pursuer.position {
                out.push(Command::MovePursuer {
                    pursuer: pursuer.id,
                    position,
                });
            }
        }
    }
}

impl Default for Pursuit {
    fn default() -> Self {
        Self {
            status: PlayStatus::Playing,
        }
    }
}

/// Advances a pursuer one tick toward the avatar cell.
///
/// The path is recomputed from scratch. When it holds at least two cells the
/// pursuer moves `speed` pixels toward the center of the second one. The step
/// is not clamped, so a waypoint closer than `speed` is overshot. Empty and
/// single-cell paths leave the pursuer where it is.
#[must_use]
pub fn step(
    pursuer: &PursuerSnapshot,
    avatar_cell: Option<CellCoord>,
    grid: &WalkabilityGrid,
    tile_length: f32,
) -> Vec2 {
    let Some(waypoint) = next_waypoint(pursuer, avatar_cell, grid, tile_length) else {
        return pursuer.position;
    };

    let target = cell_center(waypoint, tile_length);
    let offset = target - pursuer.position;
    let distance = offset.length();
    if distance <= ARRIVAL_EPSILON {
        return pursuer.position;
    }

    pursuer.position + offset / distance * pursuer.speed
}

/// Cell the pursuer currently steers toward, if it has one.
#[must_use]
pub fn next_waypoint(
    pursuer: &PursuerSnapshot,
    avatar_cell: Option<CellCoord>,
    grid: &WalkabilityGrid,
    tile_length: f32,
) -> Option<CellCoord> {
    let start = pursuer.cell(tile_length)?;
    let goal = avatar_cell?;
    find_path(grid, start, goal).get(1).copied()
}
