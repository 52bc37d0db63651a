#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.

use glam::Vec2;
use maze_chase_core::{
    cell_center, CollectibleKind, Command, Event, ExitBlock, Hazard, PixelRect, PlayStatus,
    PursuerId, Tuning, WELCOME_BANNER,
};
use thiserror::Error;
use tracing::{debug, info, warn};

mod level;
mod room;

pub use level::{default_levels, LevelError, LevelPlan, LevelSpec, Tile};
use room::Room;

/// Errors reported while assembling a world from configuration.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum WorldError {
    /// No levels were supplied.
    #[error("level pack contains no levels")]
    NoLevels,
    /// A level layout could not be interpreted.
    #[error("level {index} ({name}) is invalid: {source}")]
    Level {
        /// Zero-based index of the level.
        index: usize,
        /// Name of the level.
        name: String,
        /// Underlying layout error.
        source: LevelError,
    },
    /// A tuning value is outside its usable range.
    #[error("tuning field `{field}` is out of range")]
    InvalidTuning {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tuning: Tuning,
    levels: Vec<LevelPlan>,
    level_index: usize,
    lives: u32,
    status: PlayStatus,
    avatar: Avatar,
    room: Room,
    next_pursuer: u32,
    tick_index: u64,
}

#[derive(Clone, Copy, Debug)]
struct Avatar {
    position: Vec2,
    half_extent: f32,
}

impl World {
    /// Creates a world running the built-in campaign with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_levels(Tuning::default(), &default_levels())
            .expect("built-in campaign is valid")
    }

    /// Creates a world from custom tuning and level specifications.
    pub fn with_levels(tuning: Tuning, levels: &[LevelSpec]) -> Result<Self, WorldError> {
        validate_tuning(&tuning)?;

        let plans = levels
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                LevelPlan::parse(spec).map_err(|source| WorldError::Level {
                    index,
                    name: spec.name.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let Some(first) = plans.first() else {
            return Err(WorldError::NoLevels);
        };

        let room = Room::build(first, &tuning, 0);
        let next_pursuer = room.next_pursuer_id();
        let avatar = Avatar {
            position: cell_center(first.start(), tuning.tile_length),
            half_extent: tuning.avatar_half_extent,
        };
        info!(levels = plans.len(), level = first.name(), "world_created");

        Ok(Self {
            banner: WELCOME_BANNER,
            lives: tuning.lives,
            tuning,
            levels: plans,
            level_index: 0,
            status: PlayStatus::Playing,
            avatar,
            room,
            next_pursuer,
            tick_index: 0,
        })
    }

    fn level_number(&self) -> u32 {
        u32::try_from(self.level_index).unwrap_or(u32::MAX)
    }

    fn load_level(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let Some(plan) = self.levels.get(index) else {
            warn!(level = index, "level_missing");
            return;
        };

        // Fresh identifiers so commands aimed at the previous room miss.
        self.room = Room::build(plan, &self.tuning, self.next_pursuer);
        self.next_pursuer = self.room.next_pursuer_id();
        self.avatar.position = cell_center(plan.start(), self.tuning.tile_length);
        self.level_index = index;
        info!(
            level = index,
            name = plan.name(),
            lives = self.lives,
            pursuers = self.room.pursuers.len(),
            "level_loaded"
        );
        out_events.push(Event::LevelLoaded {
            level: self.level_number(),
            lives: self.lives,
        });
    }

    fn set_status(&mut self, status: PlayStatus, out_events: &mut Vec<Event>) {
        if self.status == status {
            return;
        }
        self.status = status;
        info!(?status, "status_changed");
        out_events.push(Event::StatusChanged { status });
    }

    fn avatar_bounds(&self) -> PixelRect {
        PixelRect::centered(self.avatar.position, self.avatar.half_extent)
    }

    fn solids(&self) -> Vec<PixelRect> {
        self.room.solids(self.tuning.tile_length)
    }

    fn caught_by(&self) -> Option<PursuerId> {
        let bounds = self.avatar_bounds();
        self.room
            .pursuers
            .iter()
            .find(|pursuer| {
                PixelRect::centered(pursuer.position, pursuer.half_extent).intersects(&bounds)
            })
            .map(|pursuer| pursuer.id)
    }

    fn lose_life(&mut self, cause: Hazard, out_events: &mut Vec<Event>) {
        self.lives = self.lives.saturating_sub(1);
        info!(?cause, lives = self.lives, "life_lost");
        out_events.push(Event::LifeLost {
            cause,
            lives_remaining: self.lives,
        });

        if self.lives == 0 {
            self.set_status(PlayStatus::Lost, out_events);
        } else {
            self.load_level(self.level_index, out_events);
        }
    }

    fn move_avatar(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        let from = self.avatar.position;
        self.avatar.position = position;
        out_events.push(Event::AvatarMoved { from, to: position });

        let bounds = self.avatar_bounds();
        if self
            .room
            .danger_zones
            .iter()
            .any(|zone| zone.intersects(&bounds))
        {
            self.lose_life(Hazard::DangerZone, out_events);
            return;
        }

        self.collect_items(bounds, out_events);

        if let Some(pursuer) = self.caught_by() {
            self.lose_life(Hazard::Pursuer(pursuer), out_events);
            return;
        }

        if position.distance(self.room.exit) < self.tuning.exit_radius {
            self.try_exit(from, out_events);
        }
    }

    fn collect_items(&mut self, bounds: PixelRect, out_events: &mut Vec<Event>) {
        let tile = self.tuning.tile_length;
        let half_extent = self.tuning.item_half_extent;
        let boost = self.tuning.boost_duration();

        for item in self.room.collectibles.iter_mut().filter(|item| !item.collected) {
            let pickup = PixelRect::centered(cell_center(item.cell, tile), half_extent);
            if !pickup.intersects(&bounds) {
                continue;
            }

            item.collected = true;
            if item.kind == CollectibleKind::SpeedBoost {
                self.room.boost_remaining = Some(boost);
            }
            debug!(
                kind = ?item.kind,
                column = item.cell.column(),
                row = item.cell.row(),
                "item_collected"
            );
            out_events.push(Event::ItemCollected {
                kind: item.kind,
                cell: item.cell,
            });
        }
    }

    fn try_exit(&mut self, previous: Vec2, out_events: &mut Vec<Event>) {
        let gate_closed = self.room.gate.as_ref().is_some_and(|gate| !gate.open);
        let refusal = if self.room.required_keys_remaining() > 0 {
            Some(ExitBlock::MissingKey)
        } else if gate_closed {
            Some(ExitBlock::GateClosed)
        } else {
            None
        };

        if let Some(reason) = refusal {
            debug!(?reason, "exit_blocked");
            out_events.push(Event::ExitBlocked { reason });
            self.push_back(previous, out_events);
            return;
        }

        let completed = self.level_number();
        info!(level = completed, "level_completed");
        out_events.push(Event::LevelCompleted { level: completed });

        let next = self.level_index + 1;
        if next < self.levels.len() {
            self.load_level(next, out_events);
        } else {
            self.set_status(PlayStatus::Won, out_events);
        }
    }

    /// Moves the avatar west off the exit, falling back to its previous spot.
    fn push_back(&mut self, previous: Vec2, out_events: &mut Vec<Event>) {
        let from = self.avatar.position;
        let candidate = from - Vec2::new(self.tuning.exit_push_back, 0.0);
        let candidate_bounds = PixelRect::centered(candidate, self.avatar.half_extent);
        let blocked = self
            .solids()
            .iter()
            .any(|solid| solid.intersects(&candidate_bounds));
        let to = if blocked { previous } else { candidate };

        self.avatar.position = to;
        out_events.push(Event::AvatarMoved { from, to });
    }

    fn move_pursuer(&mut self, id: PursuerId, position: Vec2, out_events: &mut Vec<Event>) {
        let Some(pursuer) = self.room.pursuer_mut(id) else {
            debug!(pursuer = id.get(), "pursuer_missing");
            return;
        };

        let from = pursuer.position;
        pursuer.position = position;
        out_events.push(Event::PursuerMoved {
            pursuer: id,
            from,
            to: position,
        });

        if let Some(catcher) = self.caught_by() {
            self.lose_life(Hazard::Pursuer(catcher), out_events);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_tuning(tuning: &Tuning) -> Result<(), WorldError> {
    let positive = [
        ("tile_length", tuning.tile_length),
        ("avatar_half_extent", tuning.avatar_half_extent),
        ("avatar_speed", tuning.avatar_speed),
        ("pursuer_half_extent", tuning.pursuer_half_extent),
        ("item_half_extent", tuning.item_half_extent),
        ("exit_radius", tuning.exit_radius),
    ];
    for (field, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(WorldError::InvalidTuning { field });
        }
    }

    if !(tuning.pursuer_speed.is_finite() && tuning.pursuer_speed >= 0.0) {
        return Err(WorldError::InvalidTuning {
            field: "pursuer_speed",
        });
    }
    if !(tuning.boost_multiplier.is_finite() && tuning.boost_multiplier > 0.0) {
        return Err(WorldError::InvalidTuning {
            field: "boost_multiplier",
        });
    }
    let non_negative = [
        ("boost_secs", tuning.boost_secs),
        ("exit_push_back", tuning.exit_push_back),
    ];
    for (field, value) in non_negative {
        if !(value.is_finite() && value >= 0.0) {
            return Err(WorldError::InvalidTuning { field });
        }
    }
    if tuning.lives == 0 {
        return Err(WorldError::InvalidTuning { field: "lives" });
    }

    Ok(())
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel { level } => {
            let index = usize::try_from(level).unwrap_or(usize::MAX);
            world.load_level(index, out_events);
        }
        Command::Restart => {
            world.lives = world.tuning.lives;
            world.set_status(PlayStatus::Playing, out_events);
            world.load_level(0, out_events);
        }
        Command::Tick { dt } => {
            if world.status != PlayStatus::Playing {
                return;
            }
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            if let Some(gate) = world.room.gate.as_mut() {
                gate.advance(dt, out_events);
            }
            world.room.advance_boost(dt, out_events);
        }
        Command::MoveAvatar { position } => {
            if world.status != PlayStatus::Playing {
                return;
            }
            world.move_avatar(position, out_events);
        }
        Command::MovePursuer { pursuer, position } => {
            if world.status != PlayStatus::Playing {
                return;
            }
            world.move_pursuer(pursuer, position, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use maze_chase_core::{
        AvatarSnapshot, CellCoord, CollectibleSnapshot, GateSnapshot, PixelRect, PlayStatus,
        PursuerId, PursuerSnapshot, Tuning, WalkabilityGrid,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the tuning in effect.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Side length of a tile in pixels.
    #[must_use]
    pub fn tile_length(world: &World) -> f32 {
        world.tuning.tile_length
    }

    /// Zero-based index of the active level.
    #[must_use]
    pub fn level_index(world: &World) -> usize {
        world.level_index
    }

    /// Number of levels in the campaign.
    #[must_use]
    pub fn level_count(world: &World) -> usize {
        world.levels.len()
    }

    /// Name of the active level.
    #[must_use]
    pub fn level_name(world: &World) -> &str {
        world
            .levels
            .get(world.level_index)
            .map_or("", |plan| plan.name())
    }

    /// Lives left in the session.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Current play status.
    #[must_use]
    pub fn status(world: &World) -> PlayStatus {
        world.status
    }

    /// Number of ticks processed while playing.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Walkability grid of the active level.
    #[must_use]
    pub fn walkability_grid(world: &World) -> &WalkabilityGrid {
        &world.room.grid
    }

    /// Rectangles that block the avatar: walls plus the gate while closed.
    #[must_use]
    pub fn solids(world: &World) -> Vec<PixelRect> {
        world.solids()
    }

    /// Rectangles that cost a life on contact.
    #[must_use]
    pub fn danger_zones(world: &World) -> &[PixelRect] {
        &world.room.danger_zones
    }

    /// Cells holding danger zones.
    #[must_use]
    pub fn danger_cells(world: &World) -> &[CellCoord] {
        &world.room.danger_cells
    }

    /// Captures the avatar state, including any active speed boost.
    #[must_use]
    pub fn avatar(world: &World) -> AvatarSnapshot {
        let boosted = world.room.boost_remaining.is_some();
        let multiplier = if boosted {
            world.tuning.boost_multiplier
        } else {
            1.0
        };
        AvatarSnapshot {
            position: world.avatar.position,
            half_extent: world.avatar.half_extent,
            speed: world.tuning.avatar_speed * multiplier,
        }
    }

    /// Captures every pursuer of the active level in identifier order.
    #[must_use]
    pub fn pursuers(world: &World) -> Vec<PursuerSnapshot> {
        world
            .room
            .pursuers
            .iter()
            .map(|pursuer| pursuer.snapshot())
            .collect()
    }

    /// Captures every collectible of the active level in layout order.
    #[must_use]
    pub fn collectibles(world: &World) -> Vec<CollectibleSnapshot> {
        world
            .room
            .collectibles
            .iter()
            .map(|item| item.snapshot())
            .collect()
    }

    /// Number of required keys still waiting to be collected.
    #[must_use]
    pub fn required_keys_remaining(world: &World) -> usize {
        world.room.required_keys_remaining()
    }

    /// Captures the timed gate, if the level has one.
    #[must_use]
    pub fn gate(world: &World) -> Option<GateSnapshot> {
        world.room.gate.as_ref().map(|gate| gate.snapshot())
    }

    /// Pixel-space center of the exit.
    #[must_use]
    pub fn exit(world: &World) -> Vec2 {
        world.room.exit
    }

    /// Cell holding the exit.
    #[must_use]
    pub fn exit_cell(world: &World) -> CellCoord {
        world.room.exit_cell
    }

    /// First pursuer whose collision box overlaps the avatar, if any.
    #[must_use]
    pub fn caught_by(world: &World) -> Option<PursuerId> {
        world.caught_by()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use maze_chase_core::CellCoord;

    use super::*;

    const TICK: Duration = Duration::from_nanos(16_666_667);

    fn world_with(layouts: &[&[&str]]) -> World {
        let specs: Vec<LevelSpec> = layouts
            .iter()
            .enumerate()
            .map(|(index, layout)| LevelSpec::new(format!("level {index}"), layout))
            .collect();
        World::with_levels(Tuning::default(), &specs).expect("valid levels")
    }

    #[test]
    fn new_world_starts_on_first_level() {
        let world = World::new();

        assert_eq!(query::level_index(&world), 0);
        assert_eq!(query::level_count(&world), 3);
        assert_eq!(query::lives(&world), 3);
        assert_eq!(query::status(&world), PlayStatus::Playing);
        assert_eq!(query::avatar(&world).position, Vec2::new(60.0, 60.0));
        assert_eq!(query::exit(&world), Vec2::new(340.0, 340.0));
        assert!(query::pursuers(&world).is_empty());
    }

    #[test]
    fn empty_level_packs_are_rejected() {
        assert_eq!(
            World::with_levels(Tuning::default(), &[]).unwrap_err(),
            WorldError::NoLevels
        );
    }

    #[test]
    fn invalid_levels_report_their_index() {
        let specs = [
            LevelSpec::new("fine", &["111", "1S1", "1E1"]),
            LevelSpec::new("broken", &["111", "1S", "1E1"]),
        ];

        let error = World::with_levels(Tuning::default(), &specs).unwrap_err();

        assert!(matches!(error, WorldError::Level { index: 1, .. }));
    }

    #[test]
    fn invalid_tuning_is_rejected() {
        let tuning = Tuning {
            tile_length: 0.0,
            ..Tuning::default()
        };

        assert_eq!(
            World::with_levels(tuning, &default_levels()).unwrap_err(),
            WorldError::InvalidTuning {
                field: "tile_length"
            }
        );
    }

    #[test]
    fn ticks_advance_the_gate_and_expire_boosts() {
        let mut world = world_with(&[&["11111", "1SBG1", "1000E", "11111"]]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MoveAvatar {
                position: Vec2::new(100.0, 60.0),
            },
            &mut events,
        );
        assert!(events.contains(&Event::ItemCollected {
            kind: CollectibleKind::SpeedBoost,
            cell: CellCoord::new(2, 1),
        }));
        assert_eq!(query::avatar(&world).speed, 6.0);

        events.clear();
        for _ in 0..5 {
            apply(
                &mut world,
                Command::Tick {
                    dt: Duration::from_secs(1),
                },
                &mut events,
            );
        }

        let toggles: Vec<bool> = events
            .iter()
            .filter_map(|event| match event {
                Event::GateToggled { open } => Some(*open),
                _ => None,
            })
            .collect();
        assert_eq!(toggles, vec![true, false]);
        assert!(events.contains(&Event::SpeedBoostExpired));
        assert_eq!(query::avatar(&world).speed, 3.0);
        assert_eq!(query::tick_index(&world), 5);
    }

    #[test]
    fn closed_gate_is_solid_until_it_opens() {
        let mut world = world_with(&[&["11111", "1S0G1", "1000E", "11111"]]);
        let gate_rect = PixelRect::cell(CellCoord::new(3, 1), 40.0);
        assert!(query::solids(&world).contains(&gate_rect));

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(2),
            },
            &mut events,
        );

        assert!(query::gate(&world).is_some_and(|gate| gate.open));
        assert!(!query::solids(&world).contains(&gate_rect));
    }

    #[test]
    fn danger_zones_cost_a_life_and_reload_the_level() {
        let mut world = world_with(&[&["111111", "1SD0E1", "111111"]]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MoveAvatar {
                position: Vec2::new(70.0, 60.0),
            },
            &mut events,
        );

        assert!(events.contains(&Event::LifeLost {
            cause: Hazard::DangerZone,
            lives_remaining: 2,
        }));
        assert!(events.contains(&Event::LevelLoaded { level: 0, lives: 2 }));
        assert_eq!(query::avatar(&world).position, Vec2::new(60.0, 60.0));
    }

    #[test]
    fn running_out_of_lives_ends_the_session() {
        let mut world = world_with(&[&["111111", "1SD0E1", "111111"]]);
        let mut events = Vec::new();

        for _ in 0..3 {
            apply(
                &mut world,
                Command::MoveAvatar {
                    position: Vec2::new(70.0, 60.0),
                },
                &mut events,
            );
        }

        assert_eq!(query::lives(&world), 0);
        assert_eq!(query::status(&world), PlayStatus::Lost);
        assert_eq!(
            events.last(),
            Some(&Event::StatusChanged {
                status: PlayStatus::Lost,
            })
        );

        events.clear();
        apply(&mut world, Command::Tick { dt: TICK }, &mut events);
        apply(
            &mut world,
            Command::MoveAvatar {
                position: Vec2::new(100.0, 60.0),
            },
            &mut events,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn exit_refuses_until_keys_are_collected() {
        let mut world = world_with(&[&["1111111", "1S0K0E1", "1111111"]]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MoveAvatar {
                position: Vec2::new(220.0, 60.0),
            },
            &mut events,
        );
        assert!(events.contains(&Event::ExitBlocked {
            reason: ExitBlock::MissingKey,
        }));
        assert_eq!(query::avatar(&world).position, Vec2::new(190.0, 60.0));
        assert_eq!(query::required_keys_remaining(&world), 1);

        events.clear();
        apply(
            &mut world,
            Command::MoveAvatar {
                position: Vec2::new(140.0, 60.0),
            },
            &mut events,
        );
        assert_eq!(query::required_keys_remaining(&world), 0);

        apply(
            &mut world,
            Command::MoveAvatar {
                position: Vec2::new(220.0, 60.0),
            },
            &mut events,
        );
        assert!(events.contains(&Event::LevelCompleted { level: 0 }));
        assert_eq!(query::status(&world), PlayStatus::Won);
    }

    #[test]
    fn closed_gate_keeps_the_exit_shut() {
        let mut world = world_with(&[&["11111", "1SGE1", "10001", "11111"]]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MoveAvatar {
                position: Vec2::new(140.0, 60.0),
            },
            &mut events,
        );

        assert!(events.contains(&Event::ExitBlocked {
            reason: ExitBlock::GateClosed,
        }));
        assert_eq!(query::status(&world), PlayStatus::Playing);
    }

    #[test]
    fn push_back_into_a_wall_restores_previous_position() {
        let mut world = world_with(&[&["11111", "11SK1", "11E01", "11111"]]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MoveAvatar {
                position: Vec2::new(100.0, 95.0),
            },
            &mut events,
        );

        assert!(events.contains(&Event::ExitBlocked {
            reason: ExitBlock::MissingKey,
        }));
        assert_eq!(query::avatar(&world).position, Vec2::new(100.0, 60.0));
    }

    #[test]
    fn completing_a_level_loads_the_next_one() {
        let mut world = world_with(&[&["1111", "1SE1", "1111"], &["11111", "1S0E1", "11111"]]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MoveAvatar {
                position: Vec2::new(100.0, 60.0),
            },
            &mut events,
        );

        assert_eq!(
            events[1..],
            [
                Event::LevelCompleted { level: 0 },
                Event::LevelLoaded { level: 1, lives: 3 },
            ]
        );
        assert_eq!(query::level_index(&world), 1);
    }

    #[test]
    fn pursuer_contact_costs_a_life() {
        let mut world = world_with(&[&["1111111", "1S000P1", "10000E1", "1111111"]]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MovePursuer {
                pursuer: PursuerId::new(0),
                position: Vec2::new(80.0, 60.0),
            },
            &mut events,
        );

        assert!(events.contains(&Event::LifeLost {
            cause: Hazard::Pursuer(PursuerId::new(0)),
            lives_remaining: 2,
        }));
        assert_eq!(query::pursuers(&world)[0].position, Vec2::new(220.0, 60.0));
        assert_eq!(query::caught_by(&world), None);
    }

    #[test]
    fn restart_revives_a_lost_session() {
        let mut world = world_with(&[&["111111", "1SD0E1", "111111"]]);
        let mut events = Vec::new();
        for _ in 0..3 {
            apply(
                &mut world,
                Command::MoveAvatar {
                    position: Vec2::new(70.0, 60.0),
                },
                &mut events,
            );
        }

        events.clear();
        apply(&mut world, Command::Restart, &mut events);

        assert_eq!(
            events,
            vec![
                Event::StatusChanged {
                    status: PlayStatus::Playing,
                },
                Event::LevelLoaded { level: 0, lives: 3 },
            ]
        );
    }

    #[test]
    fn unknown_levels_are_ignored() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(&mut world, Command::LoadLevel { level: 7 }, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::level_index(&world), 0);
    }

    #[test]
    fn reload_discards_moves_for_replaced_pursuers() {
        let mut world = world_with(&[&[
            "1111111111",
            "1SP0000001",
            "1000000001",
            "100000E0P1",
            "1111111111",
        ]]);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MovePursuer {
                pursuer: PursuerId::new(0),
                position: Vec2::new(86.0, 60.0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::MovePursuer {
                pursuer: PursuerId::new(1),
                position: Vec2::new(326.0, 140.0),
            },
            &mut events,
        );

        assert_eq!(query::lives(&world), 2);
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::LifeLost { .. }))
                .count(),
            1
        );
        assert!(matches!(events.last(), Some(Event::LevelLoaded { .. })));

        let pursuers = query::pursuers(&world);
        let ids: Vec<PursuerId> = pursuers.iter().map(|pursuer| pursuer.id).collect();
        let positions: Vec<Vec2> = pursuers.iter().map(|pursuer| pursuer.position).collect();
        assert_eq!(ids, vec![PursuerId::new(2), PursuerId::new(3)]);
        assert_eq!(
            positions,
            vec![Vec2::new(100.0, 60.0), Vec2::new(340.0, 140.0)]
        );
    }

    #[test]
    fn maximal_ticks_complete() {
        let mut world = world_with(&[&["11111", "1SBG1", "1000E", "11111"]]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MoveAvatar {
                position: Vec2::new(100.0, 60.0),
            },
            &mut events,
        );

        apply(
            &mut world,
            Command::Tick { dt: Duration::MAX },
            &mut events,
        );

        assert!(events.contains(&Event::SpeedBoostExpired));
        assert_eq!(query::status(&world), PlayStatus::Playing);
    }

    #[test]
    fn boost_and_push_back_tuning_is_validated() {
        let cases = [
            (
                Tuning {
                    boost_multiplier: f32::NAN,
                    ..Tuning::default()
                },
                "boost_multiplier",
            ),
            (
                Tuning {
                    boost_multiplier: -2.0,
                    ..Tuning::default()
                },
                "boost_multiplier",
            ),
            (
                Tuning {
                    boost_secs: f32::INFINITY,
                    ..Tuning::default()
                },
                "boost_secs",
            ),
            (
                Tuning {
                    exit_push_back: -30.0,
                    ..Tuning::default()
                },
                "exit_push_back",
            ),
        ];

        for (tuning, field) in cases {
            assert_eq!(
                World::with_levels(tuning, &default_levels()).unwrap_err(),
                WorldError::InvalidTuning { field }
            );
        }
    }
}
