#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Avatar motion resolver with axis-separated sliding collision.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;
use maze_chase_core::{AvatarSnapshot, Command, Event, MoveInput, PixelRect, PlayStatus};

/// Pure system that turns held input into avatar movement commands.
#[derive(Debug)]
pub struct Motion {
    status: PlayStatus,
}

impl Motion {
    /// Consumes world events and the current input to emit an avatar command.
    ///
    /// A command is emitted only for batches containing
    /// [`Event::TimeAdvanced`] while the session is being played, and only when
    /// the resolved position differs from the current one.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: MoveInput,
        avatar: &AvatarSnapshot,
        solids: &[PixelRect],
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

        let delta = displacement(input, avatar.speed);
        if delta == Vec2::ZERO {
            return;
        }

        let position = resolve(avatar.position, delta, avatar.half_extent, solids);
        if position != avatar.position {
            out.push(Command::MoveAvatar { position });
        }
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            status: PlayStatus::Playing,
        }
    }
}

/// Per-tick displacement requested by the held keys.
///
/// Diagonal input is scaled by `1/√2` on both axes so its magnitude matches
/// axial movement.
#[must_use]
pub fn displacement(input: MoveInput, speed: f32) -> Vec2 {
    let mut axes = input.axes();
    if axes.x != 0.0 && axes.y != 0.0 {
        axes *= FRAC_1_SQRT_2;
    }
    axes * speed
}

/// Resolves a requested displacement against a set of solid rectangles.
///
/// The full move is tried first, then the horizontal component alone, then
/// the vertical component alone. The first candidate whose collision box
/// clears every solid wins; when none does the position is returned
/// unchanged. Only the end position of each candidate is tested.
#[must_use]
pub fn resolve(position: Vec2, delta: Vec2, half_extent: f32, solids: &[PixelRect]) -> Vec2 {
    let candidates = [
        position + delta,
        position + Vec2::new(delta.x, 0.0),
        position + Vec2::new(0.0, delta.y),
    ];

    candidates
        .into_iter()
        .find(|candidate| !collides(*candidate, half_extent, solids))
        .unwrap_or(position)
}

/// Reports whether a box centered on `center` overlaps any solid.
#[must_use]
pub fn collides(center: Vec2, half_extent: f32, solids: &[PixelRect]) -> bool {
    let bounds = PixelRect::centered(center, half_extent);
    solids.iter().any(|solid| bounds.intersects(solid))
}
