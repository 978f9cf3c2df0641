use glam::Vec2;
use proptest::prelude::*;
use undead_survival_core::{Command, EnemyKind, EntityId, Event, PlayMode, Tag};
use undead_survival_world::{self as world, query, World};

fn running_world_with_zombie() -> (World, EntityId) {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetPlayMode {
            mode: PlayMode::Running,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Zombie,
            position: Vec2::new(8.0, 0.0),
            move_speed: Some(0.0),
        },
        &mut events,
    );
    let zombie = events
        .iter()
        .find_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .expect("zombie spawned");
    (world, zombie)
}

#[test]
fn empty_hits_produce_no_events_or_feedback() {
    let (mut world, zombie) = running_world_with_zombie();
    let player = query::player(&world).id;
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ApplyDamage {
            target: zombie,
            amount: 0.0,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::QueueDamage {
            target: player,
            amount: 0.0,
        },
        &mut events,
    );
    world::apply(&mut world, Command::EndFrame, &mut events);

    assert!(events.is_empty(), "unexpected events: {events:?}");
    assert_eq!(query::player(&world).health, 100.0);
}

proptest! {
    #[test]
    fn health_never_goes_negative_and_death_fires_once(
        hits in prop::collection::vec(-5.0f32..8.0, 1..24),
    ) {
        let (mut world, zombie) = running_world_with_zombie();
        let mut events = Vec::new();
        for amount in hits {
            world::apply(&mut world, Command::ApplyDamage { target: zombie, amount }, &mut events);
        }

        for event in &events {
            if let Event::EntityDamaged { remaining, .. } = event {
                prop_assert!(*remaining >= 0.0);
            }
        }
        let deaths = events
            .iter()
            .filter(|event| matches!(event, Event::EntityDied { entity, .. } if *entity == zombie))
            .count();
        prop_assert!(deaths <= 1);

        let snapshot = query::enemy_view(&world);
        let zombie = snapshot.get(zombie).expect("corpse lingers until the next tick");
        prop_assert!(zombie.health >= 0.0);
        prop_assert_eq!(zombie.dead, deaths == 1);
    }

    #[test]
    fn queued_damage_lands_as_one_hit_per_frame(
        amounts in prop::collection::vec(0.5f32..20.0, 1..8),
    ) {
        let (mut world, _) = running_world_with_zombie();
        let player = query::player(&world).id;
        let mut events = Vec::new();
        for amount in &amounts {
            world::apply(&mut world, Command::QueueDamage { target: player, amount: *amount }, &mut events);
        }
        prop_assert!(events.is_empty());

        world::apply(&mut world, Command::EndFrame, &mut events);
        let hits: Vec<f32> = events
            .iter()
            .filter_map(|event| match event {
                Event::EntityDamaged { entity, amount, .. } if *entity == player => Some(*amount),
                _ => None,
            })
            .collect();
        let total: f32 = amounts.iter().sum();
        prop_assert_eq!(hits.len(), 1);
        prop_assert!((hits[0] - total).abs() < 1e-3);

        let died = events.contains(&Event::EntityDied { entity: player, tag: Tag::Player });
        prop_assert_eq!(died, total >= 100.0);
        prop_assert_eq!(query::player(&world).health, (100.0 - hits[0]).max(0.0));
    }
}
