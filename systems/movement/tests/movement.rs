use std::time::Duration;

use glam::Vec2;
use undead_survival_core::{Command, EnemyKind, EntityId, Event, Facing, PlayMode};
use undead_survival_system_movement::{Config, Movement};
use undead_survival_world::{self as world, query, World};

fn running_world() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetPlayMode {
            mode: PlayMode::Running,
        },
        &mut events,
    );
    world
}

fn spawn(world: &mut World, kind: EnemyKind, position: Vec2) -> EntityId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnEnemy {
            kind,
            position,
            move_speed: Some(3.0),
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("unexpected spawn events: {other:?}"),
    }
}

fn step(world: &mut World, movement: &mut Movement, dt: Duration) -> Vec<Command> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);

    let enemies = query::enemy_view(world);
    let player = query::player(world);
    let mut commands = Vec::new();
    movement.handle(&events, &enemies, Some(&player), &mut commands);
    for command in commands.clone() {
        world::apply(world, command, &mut events);
    }
    commands
}

#[test]
fn enemies_close_in_on_a_detected_player() {
    let mut world = running_world();
    let enemy = spawn(&mut world, EnemyKind::Zombie, Vec2::new(-6.0, 0.0));
    let mut movement = Movement::default();

    let commands = step(&mut world, &mut movement, Duration::from_millis(50));
    match commands.as_slice() {
        [Command::SteerEnemy {
            enemy: steered,
            velocity,
            facing,
        }] => {
            assert_eq!(*steered, enemy);
            assert!(velocity.x > 0.0);
            assert!(velocity.y.abs() < 1e-5);
            assert_eq!(*facing, Some(Facing::Right));
        }
        other => panic!("unexpected commands: {other:?}"),
    }

    for _ in 0..40 {
        let _ = step(&mut world, &mut movement, Duration::from_millis(50));
    }
    let snapshot = query::enemy_view(&world).into_vec().remove(0);
    assert!(snapshot.position.x > -6.0 + 4.0, "enemy should approach the player");
}

#[test]
fn velocity_eases_toward_the_desired_speed() {
    let mut world = running_world();
    let _ = spawn(&mut world, EnemyKind::UndeadArcher, Vec2::new(0.0, 8.0));
    let mut movement = Movement::new(Config::new(10.0, 3));

    let commands = step(&mut world, &mut movement, Duration::from_millis(20));
    let Some(Command::SteerEnemy { velocity, .. }) = commands.first() else {
        panic!("expected a steering command");
    };
    // blend of 0.2 toward (0, -3) gives 0.6, above the kick threshold.
    assert!((velocity.y + 0.6).abs() < 1e-4);

    let commands = step(&mut world, &mut movement, Duration::from_millis(200));
    let Some(Command::SteerEnemy { velocity, .. }) = commands.first() else {
        panic!("expected a steering command");
    };
    assert!((velocity.y + 3.0).abs() < 1e-4, "blend saturates at one");
}

#[test]
fn stunned_enemies_are_not_steered() {
    let mut world = running_world();
    let enemy = spawn(&mut world, EnemyKind::Zombie, Vec2::new(4.0, 0.0));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StunEnemy {
            enemy,
            duration: Duration::from_secs(1),
        },
        &mut events,
    );

    let mut movement = Movement::default();
    let commands = step(&mut world, &mut movement, Duration::from_millis(100));
    assert!(commands.is_empty());

    let snapshot = query::enemy_view(&world).into_vec().remove(0);
    assert_eq!(snapshot.velocity, Vec2::ZERO);
    assert_eq!(snapshot.position, Vec2::new(4.0, 0.0));
}

#[test]
fn missing_player_makes_every_enemy_wander() {
    let mut world = running_world();
    let _ = spawn(&mut world, EnemyKind::Zombie, Vec2::new(1.0, 0.0));
    let _ = spawn(&mut world, EnemyKind::KamikazeSlime, Vec2::new(-1.0, 0.0));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(100),
        },
        &mut events,
    );

    let mut movement = Movement::default();
    let mut commands = Vec::new();
    movement.handle(&events, &query::enemy_view(&world), None, &mut commands);
    assert_eq!(commands.len(), 2, "wandering enemies still move");
    for command in &commands {
        let Command::SteerEnemy { velocity, .. } = command else {
            panic!("unexpected command: {command:?}");
        };
        assert!(velocity.length() > 0.0);
    }
}

#[test]
fn events_without_time_produce_no_commands() {
    let mut world = running_world();
    let _ = spawn(&mut world, EnemyKind::Zombie, Vec2::new(2.0, 2.0));
    let mut movement = Movement::default();
    let mut commands = Vec::new();
    movement.handle(
        &[Event::PlayModeChanged {
            mode: PlayMode::Running,
        }],
        &query::enemy_view(&world),
        Some(&query::player(&world)),
        &mut commands,
    );
    assert!(commands.is_empty());
}
