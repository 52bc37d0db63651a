//! Fixed-step headless session loop.

use std::time::Duration;

use maze_chase_core::{Command, Event, PlayStatus};
use maze_chase_system_analytics::{Analytics, SessionReport};
use maze_chase_system_motion::Motion;
use maze_chase_system_pursuit::Pursuit;
use maze_chase_world::{self as world, query, World};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::input::InputSource;

/// Simulation rate of a headless session.
pub(crate) const TICKS_PER_SECOND: u32 = 60;

/// Outcome of a session, printed as JSON by the binary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct SessionSummary {
    pub(crate) ticks: u64,
    pub(crate) level: String,
    pub(crate) lives: u32,
    pub(crate) report: SessionReport,
    /// SHA-256 over the event log; identical runs share a fingerprint.
    pub(crate) fingerprint: String,
}

/// Drives the world and its systems one tick at a time.
pub(crate) struct Session {
    world: World,
    input: Box<dyn InputSource>,
    motion: Motion,
    pursuit: Pursuit,
    analytics: Analytics,
    log: Sha256,
    dt: Duration,
    ticks: u64,
}

impl Session {
    pub(crate) fn new(world: World, input: Box<dyn InputSource>) -> Self {
        Self {
            world,
            input,
            motion: Motion::default(),
            pursuit: Pursuit::default(),
            analytics: Analytics::new(),
            log: Sha256::new(),
            dt: Duration::from_secs(1) / TICKS_PER_SECOND,
            ticks: 0,
        }
    }

    /// Runs until `max_ticks` ticks have elapsed or the session is decided.
    pub(crate) fn run(&mut self, max_ticks: u64) -> SessionSummary {
        while self.ticks < max_ticks && query::status(&self.world) == PlayStatus::Playing {
            self.step();
        }

        let summary = self.summary();
        info!(
            ticks = summary.ticks,
            status = ?summary.report.status,
            lives = summary.lives,
            levels_completed = summary.report.levels_completed,
            "session_finished"
        );
        summary
    }

    fn step(&mut self) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt: self.dt }, &mut events);

        let input = self.input.next_input(&self.world);
        let mut commands = Vec::new();
        self.motion.handle(
            &events,
            input,
            &query::avatar(&self.world),
            &query::solids(&self.world),
            &mut commands,
        );
        self.apply_all(&mut commands, &mut events);

        self.pursuit.handle(
            &events,
            &query::pursuers(&self.world),
            query::avatar(&self.world).position,
            query::walkability_grid(&self.world),
            query::tile_length(&self.world),
            &mut commands,
        );
        self.apply_all(&mut commands, &mut events);

        self.analytics.handle(&events);
        self.record(&events);
        self.ticks += 1;
    }

    fn apply_all(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    fn record(&mut self, events: &[Event]) {
        for event in events {
            if matches!(
                event,
                Event::LifeLost { .. } | Event::LevelCompleted { .. } | Event::StatusChanged { .. }
            ) {
                debug!(tick = self.ticks, ?event, "session_event");
            }
            self.log.update(format!("{event:?}\n").as_bytes());
        }
    }

    pub(crate) fn summary(&self) -> SessionSummary {
        let digest = self.log.clone().finalize();
        SessionSummary {
            ticks: self.ticks,
            level: query::level_name(&self.world).to_owned(),
            lives: query::lives(&self.world),
            report: self.analytics.report().clone(),
            fingerprint: hex::encode(digest),
        }
    }
}
