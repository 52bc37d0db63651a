use std::time::Duration;

use glam::Vec2;
use maze_chase_core::{Command, PlayStatus};
use maze_chase_system_analytics::{Analytics, SessionReport};
use maze_chase_world::{self as world, World};

fn replay(commands: &[Command]) -> SessionReport {
    let mut world = World::new();
    let mut analytics = Analytics::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command.clone(), &mut events);
        analytics.handle(&events);
    }

    analytics.report().clone()
}

fn move_to(x: f32, y: f32) -> Command {
    Command::MoveAvatar {
        position: Vec2::new(x, y),
    }
}

#[test]
fn campaign_events_are_tallied() {
    let report = replay(&[
        move_to(100.0, 60.0),
        move_to(340.0, 340.0),
        move_to(340.0, 340.0),
        move_to(180.0, 100.0),
        move_to(180.0, 140.0),
        move_to(340.0, 340.0),
        Command::Tick {
            dt: Duration::from_secs(2),
        },
    ]);

    assert_eq!(report.ticks, 1);
    assert_eq!(report.elapsed, Duration::from_secs(2));
    assert_eq!(report.keys_collected, 1);
    assert_eq!(report.boosts_collected, 0);
    assert_eq!(report.lives_lost_to_danger, 1);
    assert_eq!(report.lives_lost_to_pursuers, 0);
    assert_eq!(report.refused_missing_key, 1);
    assert_eq!(report.refused_gate_closed, 0);
    assert_eq!(report.levels_completed, 2);
    assert_eq!(report.gate_toggles, 1);
    assert_eq!(report.status, PlayStatus::Playing);
    assert!(report.avatar_distance > 0.0);
}

#[test]
fn running_out_of_lives_is_reported() {
    let mut commands = vec![Command::LoadLevel { level: 1 }];
    commands.extend((0..3).map(|_| move_to(180.0, 100.0)));

    let report = replay(&commands);

    assert_eq!(report.lives_lost(), 3);
    assert_eq!(report.status, PlayStatus::Lost);
}

#[test]
fn identical_streams_produce_identical_reports() {
    let commands = [
        Command::LoadLevel { level: 2 },
        move_to(340.0, 220.0),
        Command::Tick {
            dt: Duration::from_secs(3),
        },
        Command::Restart,
    ];

    assert_eq!(replay(&commands), replay(&commands));
}
