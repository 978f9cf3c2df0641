use std::time::Duration;

use glam::Vec2;
use undead_survival_core::{Command, EnemyKind, EntityId, Event, PlayMode};
use undead_survival_system_melee::{Config, Melee};
use undead_survival_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(100);

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
            move_speed: None,
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("unexpected spawn events: {other:?}"),
    }
}

/// Runs `frames` ticks and returns the number of hits the player received.
fn run(world: &mut World, melee: &mut Melee, frames: usize) -> usize {
    let player = query::player(world).id;
    let mut hits = 0;
    for _ in 0..frames {
        let mut events = Vec::new();
        world::apply(world, Command::Tick { dt: FRAME }, &mut events);

        let enemies = query::enemy_view(world);
        let snapshot = query::player(world);
        let mut commands = Vec::new();
        melee.handle(&events, &enemies, Some(&snapshot), &mut commands);

        let mut generated = Vec::new();
        for command in commands {
            world::apply(world, command, &mut generated);
        }
        hits += generated
            .iter()
            .filter(|event| matches!(event, Event::EntityDamaged { entity, .. } if *entity == player))
            .count();
    }
    hits
}

#[test]
fn each_hit_stuns_the_attacking_zombie() {
    let mut world = running_world();
    let zombie = spawn(&mut world, EnemyKind::Zombie, Vec2::new(0.8, 0.0));
    let mut melee = Melee::default();

    assert_eq!(run(&mut world, &mut melee, 1), 1);
    let attacker = query::enemy_view(&world)
        .get(zombie)
        .cloned()
        .expect("zombie present");
    assert!(attacker.stunned);
    assert_eq!(query::player(&world).health, 95.0);

    // stun lasts a second, so the next hits land at 1.1 s and 2.1 s.
    assert_eq!(run(&mut world, &mut melee, 24), 2);
    assert_eq!(query::player(&world).health, 85.0);
}

#[test]
fn attack_interval_limits_hits_without_stun() {
    let mut world = running_world();
    let _ = spawn(&mut world, EnemyKind::Zombie, Vec2::new(-0.5, 0.5));
    let mut melee = Melee::new(Config::new(5.0, Duration::from_millis(500), Duration::ZERO));

    assert_eq!(run(&mut world, &mut melee, 10), 2);
}

#[test]
fn only_zombies_attack_on_contact() {
    let mut world = running_world();
    let _ = spawn(&mut world, EnemyKind::UndeadArcher, Vec2::new(0.5, 0.0));
    let _ = spawn(&mut world, EnemyKind::KamikazeSlime, Vec2::new(-0.5, 0.0));
    let mut melee = Melee::default();

    assert_eq!(run(&mut world, &mut melee, 10), 0);
    assert_eq!(query::player(&world).health, 100.0);
}

#[test]
fn stunned_zombies_never_hit() {
    let mut world = running_world();
    let zombie = spawn(&mut world, EnemyKind::Zombie, Vec2::new(0.0, 0.9));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StunEnemy {
            enemy: zombie,
            duration: Duration::from_secs(5),
        },
        &mut events,
    );

    let mut melee = Melee::default();
    assert_eq!(run(&mut world, &mut melee, 20), 0);
}
