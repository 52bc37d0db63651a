#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Maze Chase experience.

use maze_chase_core::{CollectibleKind, WalkabilityGrid};
use maze_chase_world::{query, World};

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the walkability grid of the active level for presentation.
    #[must_use]
    pub fn walkability_grid<'world>(&self, world: &'world World) -> &'world WalkabilityGrid {
        query::walkability_grid(world)
    }

    /// Summarises the active level for adapters.
    #[must_use]
    pub fn level_summary(&self, world: &World) -> LevelSummary {
        let grid = query::walkability_grid(world);
        let collectibles = query::collectibles(world);
        let count = |kind| collectibles.iter().filter(|item| item.kind == kind).count();

        LevelSummary {
            name: query::level_name(world).to_owned(),
            number: query::level_index(world) + 1,
            total: query::level_count(world),
            columns: grid.columns(),
            rows: grid.rows(),
            keys: count(CollectibleKind::RequiredKey),
            boosts: count(CollectibleKind::SpeedBoost),
            danger_zones: query::danger_zones(world).len(),
            pursuers: query::pursuers(world).len(),
            has_gate: query::gate(world).is_some(),
            lives: query::lives(world),
        }
    }
}

/// Presentation friendly description of the active level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSummary {
    /// Name of the level.
    pub name: String,
    /// One-based level number.
    pub number: usize,
    /// Number of levels in the campaign.
    pub total: usize,
    /// Columns of the level grid.
    pub columns: u32,
    /// Rows of the level grid.
    pub rows: u32,
    /// Required keys placed in the level.
    pub keys: usize,
    /// Speed boosts placed in the level.
    pub boosts: usize,
    /// Danger zones in the level.
    pub danger_zones: usize,
    /// Pursuers spawned by the level.
    pub pursuers: usize,
    /// Whether the level has a timed gate.
    pub has_gate: bool,
    /// Lives left in the session.
    pub lives: u32,
}
