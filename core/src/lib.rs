#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod grid;

pub use grid::{GridError, WalkabilityGrid, WALL_GLYPH};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Describes whether a session is still being played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayStatus {
    /// The avatar is alive and levels remain.
    #[default]
    Playing,
    /// The final level was completed.
    Won,
    /// The avatar ran out of lives.
    Lost,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Loads the level with the provided zero-based index.
    LoadLevel {
        /// Index of the level within the loaded level pack.
        level: u32,
    },
    /// Resets lives and restarts from the first level.
    Restart,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Repositions the avatar after motion resolution.
    MoveAvatar {
        /// Resolved avatar center in pixel space.
        position: Vec2,
    },
    /// Repositions a pursuer after it stepped toward its waypoint.
    MovePursuer {
        /// Identifier of the pursuer that moved.
        pursuer: PursuerId,
        /// New pursuer center in pixel space.
        position: Vec2,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a level was (re)built from its layout.
    LevelLoaded {
        /// Zero-based index of the level.
        level: u32,
        /// Lives remaining when the level started.
        lives: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the avatar moved.
    AvatarMoved {
        /// Avatar center before the move.
        from: Vec2,
        /// Avatar center after the move.
        to: Vec2,
    },
    /// Confirms that a pursuer moved.
    PursuerMoved {
        /// Identifier of the pursuer that moved.
        pursuer: PursuerId,
        /// Pursuer center before the move.
        from: Vec2,
        /// Pursuer center after the move.
        to: Vec2,
    },
    /// Reports that the avatar picked up a collectible.
    ItemCollected {
        /// Kind of collectible that was picked up.
        kind: CollectibleKind,
        /// Cell that held the collectible.
        cell: CellCoord,
    },
    /// Reports that an active speed boost ran out.
    SpeedBoostExpired,
    /// Reports that the timed gate opened or closed.
    GateToggled {
        /// Whether the gate is open after toggling.
        open: bool,
    },
    /// Reports that the avatar lost a life.
    LifeLost {
        /// Hazard responsible for the lost life.
        cause: Hazard,
        /// Lives left after the loss.
        lives_remaining: u32,
    },
    /// Reports that the avatar reached the exit before meeting its conditions.
    ExitBlocked {
        /// Condition that was not met.
        reason: ExitBlock,
    },
    /// Reports that the avatar completed a level.
    LevelCompleted {
        /// Zero-based index of the completed level.
        level: u32,
    },
    /// Announces that the session entered a new play status.
    StatusChanged {
        /// Status that became active after processing commands.
        status: PlayStatus,
    },
}

/// Hazards that cost the avatar a life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    /// The avatar overlapped a danger zone.
    DangerZone,
    /// A pursuer caught the avatar.
    Pursuer(PursuerId),
}

/// Conditions that keep the exit closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitBlock {
    /// At least one required key is still uncollected.
    MissingKey,
    /// The timed gate guarding the exit is closed.
    GateClosed,
}

/// Kinds of collectibles that can be placed in a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Key that must be collected before the exit opens.
    RequiredKey,
    /// Temporary doubling of avatar speed.
    SpeedBoost,
}

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

/// Held-direction input sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveInput {
    /// Whether a north key is held.
    pub up: bool,
    /// Whether a south key is held.
    pub down: bool,
    /// Whether a west key is held.
    pub left: bool,
    /// Whether an east key is held.
    pub right: bool,
}

impl MoveInput {
    /// Input with no keys held.
    pub const IDLE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Builds an input with the provided directions held.
    #[must_use]
    pub fn holding(directions: &[Direction]) -> Self {
        let mut input = Self::IDLE;
        for direction in directions {
            match direction {
                Direction::North => input.up = true,
                Direction::East => input.right = true,
                Direction::South => input.down = true,
                Direction::West => input.left = true,
            }
        }
        input
    }

    /// Unnormalized axis values in `-1.0..=1.0`, with opposing keys cancelling.
    #[must_use]
    pub fn axes(&self) -> Vec2 {
        let mut axes = Vec2::ZERO;
        if self.up {
            axes.y -= 1.0;
        }
        if self.down {
            axes.y += 1.0;
        }
        if self.left {
            axes.x -= 1.0;
        }
        if self.right {
            axes.x += 1.0;
        }
        axes
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell reached by moving one step in the provided direction, if representable.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => Some(Self::new(self.column, self.row.checked_sub(1)?)),
            Direction::East => Some(Self::new(self.column.checked_add(1)?, self.row)),
            Direction::South => Some(Self::new(self.column, self.row.checked_add(1)?)),
            Direction::West => Some(Self::new(self.column.checked_sub(1)?, self.row)),
        }
    }
}

/// Converts a pixel-space position into the cell that contains it.
///
/// Returns `None` for negative or non-finite coordinates and for a
/// non-positive tile length.
#[must_use]
pub fn cell_at(position: Vec2, tile_length: f32) -> Option<CellCoord> {
    if !(tile_length > 0.0) || !position.is_finite() {
        return None;
    }

    let column = (position.x / tile_length).floor();
    let row = (position.y / tile_length).floor();
    if column < 0.0 || row < 0.0 || column > u32::MAX as f32 || row > u32::MAX as f32 {
        return None;
    }

    Some(CellCoord::new(column as u32, row as u32))
}

/// Pixel-space center of the provided cell.
#[must_use]
pub fn cell_center(cell: CellCoord, tile_length: f32) -> Vec2 {
    Vec2::new(
        (cell.column() as f32 + 0.5) * tile_length,
        (cell.row() as f32 + 0.5) * tile_length,
    )
}

/// Axis-aligned rectangle expressed in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    min: Vec2,
    max: Vec2,
}

impl PixelRect {
    /// Creates a rectangle from two opposite corners.
    #[must_use]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a rectangle centered on `center` extending `half_extent` along each axis.
    #[must_use]
    pub fn centered(center: Vec2, half_extent: f32) -> Self {
        let half = Vec2::splat(half_extent.abs());
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Rectangle covering the full tile of the provided cell.
    #[must_use]
    pub fn cell(cell: CellCoord, tile_length: f32) -> Self {
        let min = Vec2::new(
            cell.column() as f32 * tile_length,
            cell.row() as f32 * tile_length,
        );
        Self {
            min,
            max: min + Vec2::splat(tile_length),
        }
    }

    /// Reports whether the interiors of two rectangles overlap.
    ///
    /// Rectangles that only share an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Unique identifier assigned to a pursuer within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PursuerId(u32);

impl PursuerId {
    /// Creates a new pursuer identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of a pursuer used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PursuerSnapshot {
    /// Identifier of the pursuer.
    pub id: PursuerId,
    /// Pursuer center in pixel space.
    pub position: Vec2,
    /// Distance covered per tick in pixels.
    pub speed: f32,
    /// Half-extent of the pursuer collision box.
    pub half_extent: f32,
}

impl PursuerSnapshot {
    /// Cell currently containing the pursuer center.
    #[must_use]
    pub fn cell(&self, tile_length: f32) -> Option<CellCoord> {
        cell_at(self.position, tile_length)
    }

    /// Collision box of the pursuer.
    #[must_use]
    pub fn bounds(&self) -> PixelRect {
        PixelRect::centered(self.position, self.half_extent)
    }
}

/// Immutable representation of the avatar used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarSnapshot {
    /// Avatar center in pixel space.
    pub position: Vec2,
    /// Half-extent of the avatar collision box.
    pub half_extent: f32,
    /// Distance covered per tick along one axis, boosts included.
    pub speed: f32,
}

impl AvatarSnapshot {
    /// Collision box of the avatar.
    #[must_use]
    pub fn bounds(&self) -> PixelRect {
        PixelRect::centered(self.position, self.half_extent)
    }
}

/// Immutable representation of a collectible used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectibleSnapshot {
    /// Kind of collectible.
    pub kind: CollectibleKind,
    /// Cell holding the collectible.
    pub cell: CellCoord,
    /// Whether the avatar already picked it up.
    pub collected: bool,
}

/// Immutable representation of the timed gate used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateSnapshot {
    /// Cell blocked by the gate while closed.
    pub cell: CellCoord,
    /// Whether the gate is currently open.
    pub open: bool,
    /// Whole seconds left before the gate toggles.
    pub countdown: u32,
}

/// Numeric tuning shared by the world and the systems.
///
/// Defaults reproduce the classic 40 pixel maze played at 60 ticks per second.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Side length of a square tile in pixels.
    pub tile_length: f32,
    /// Half-extent of the avatar collision box in pixels.
    pub avatar_half_extent: f32,
    /// Avatar speed in pixels per tick.
    pub avatar_speed: f32,
    /// Pursuer speed in pixels per tick.
    pub pursuer_speed: f32,
    /// Half-extent of the pursuer collision box in pixels.
    pub pursuer_half_extent: f32,
    /// Half-extent of a collectible pickup box in pixels.
    pub item_half_extent: f32,
    /// Lives granted at the start of a session.
    pub lives: u32,
    /// Seconds between gate toggles.
    pub gate_interval_secs: u32,
    /// Seconds a speed boost lasts.
    pub boost_secs: f32,
    /// Speed multiplier applied while a boost is active.
    pub boost_multiplier: f32,
    /// Distance from the exit center that counts as reaching it.
    pub exit_radius: f32,
    /// Distance the avatar is pushed west when the exit refuses it.
    pub exit_push_back: f32,
}

impl Tuning {
    /// Interval between gate toggles.
    #[must_use]
    pub fn gate_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.gate_interval_secs))
    }

    /// Lifetime of a speed boost; negative or non-finite values yield zero.
    #[must_use]
    pub fn boost_duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.boost_secs).unwrap_or(Duration::ZERO)
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_length: 40.0,
            avatar_half_extent: 14.0,
            avatar_speed: 3.0,
            pursuer_speed: 2.0,
            pursuer_half_extent: 14.0,
            item_half_extent: 12.0,
            lives: 3,
            gate_interval_secs: 2,
            boost_secs: 5.0,
            boost_multiplier: 2.0,
            exit_radius: 20.0,
            exit_push_back: 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        cell_at, cell_center, CellCoord, Direction, Hazard, MoveInput, PixelRect, PursuerId,
        Tuning,
    };
    use glam::Vec2;
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn step_stops_at_zero() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.step(Direction::North), None);
        assert_eq!(origin.step(Direction::West), None);
        assert_eq!(origin.step(Direction::East), Some(CellCoord::new(1, 0)));
        assert_eq!(origin.step(Direction::South), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn cell_at_floors_pixel_positions() {
        assert_eq!(cell_at(Vec2::new(60.0, 79.9), 40.0), Some(CellCoord::new(1, 1)));
        assert_eq!(cell_at(Vec2::new(80.0, 0.0), 40.0), Some(CellCoord::new(2, 0)));
        assert_eq!(cell_at(Vec2::new(-0.5, 10.0), 40.0), None);
        assert_eq!(cell_at(Vec2::new(10.0, 10.0), 0.0), None);
        assert_eq!(cell_at(Vec2::new(f32::NAN, 10.0), 40.0), None);
    }

    #[test]
    fn cell_center_is_tile_midpoint() {
        assert_eq!(cell_center(CellCoord::new(2, 3), 40.0), Vec2::new(100.0, 140.0));
    }

    #[test]
    fn touching_rectangles_do_not_intersect() {
        let left = PixelRect::from_corners(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let right = PixelRect::from_corners(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        let overlapping = PixelRect::centered(Vec2::new(10.0, 5.0), 1.0);

        assert!(!left.intersects(&right));
        assert!(left.intersects(&overlapping));
        assert!(right.intersects(&overlapping));
    }

    #[test]
    fn opposing_keys_cancel() {
        let input = MoveInput {
            up: true,
            down: true,
            left: false,
            right: true,
        };
        assert_eq!(input.axes(), Vec2::new(1.0, 0.0));
        assert_eq!(MoveInput::IDLE.axes(), Vec2::ZERO);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
    }

    #[test]
    fn hazard_round_trips_through_bincode() {
        assert_round_trip(&Hazard::Pursuer(PursuerId::new(3)));
    }

    #[test]
    fn tuning_round_trips_through_bincode() {
        assert_round_trip(&Tuning::default());
    }

    #[test]
    fn tuning_durations_follow_seconds() {
        let tuning = Tuning::default();
        assert_eq!(tuning.gate_interval().as_secs(), 2);
        assert_eq!(tuning.boost_duration().as_millis(), 5000);

        let broken = Tuning {
            boost_secs: -1.0,
            ..Tuning::default()
        };
        assert_eq!(broken.boost_duration(), std::time::Duration::ZERO);
    }
}
