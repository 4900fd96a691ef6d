use glam::Vec2;
use glitchrun::*;

const DT: f32 = 1.0 / 60.0;

fn build(rows: &[&str]) -> CollisionSpace {
    TileCollisionBuilder::default().build(&TileGrid::from_rows(32, 32, rows)).0
}

fn actor_with_box_at(x: f32, y: f32, config: CoreConfig) -> Actor {
    let mut actor = Actor::with_config(Vec2::ZERO, config);
    actor.set_box_position(Vec2::new(x, y));
    actor
}

#[test]
fn test_actor_lands_on_single_tile() {
    let space = build(&["#"]);
    let cs = CollisionSystem::new(&space);
    let mut actor = actor_with_box_at(8.0, -40.0, CoreConfig::default());

    let mut ticks = 0;
    while !actor.on_ground() {
        actor.step(DT, &ActorInput::default(), &cs);
        ticks += 1;
        assert!(ticks < 120, "actor never landed");
    }

    let feet = actor.collision_box().bottom();
    assert_eq!(feet, 0.0);
    assert_eq!(actor.velocity.y, 0.0);

    // Resting contact is stable.
    for _ in 0..30 {
        actor.step(DT, &ActorInput::default(), &cs);
        assert!(actor.on_ground());
        assert_eq!(actor.collision_box().bottom(), 0.0);
    }
}

#[test]
fn test_running_into_wall_stops_flush() {
    // Floor on row 2, one-tile wall at column 4 of row 1 (x 128..160).
    let space = build(&["......", "....#.", "######"]);
    let cs = CollisionSystem::new(&space);
    let mut actor = actor_with_box_at(20.0, 34.0, CoreConfig::default());
    actor.step(DT, &ActorInput::default(), &cs);
    assert!(actor.on_ground());

    let run = ActorInput {
        right: true,
        ..Default::default()
    };
    let mut contact_tick = None;
    for tick in 0..120 {
        actor.step(DT, &run, &cs);
        if actor.velocity.x == 0.0 {
            contact_tick = Some(tick);
            break;
        }
        assert_eq!(actor.velocity.x, actor.config().max_speed);
    }

    assert!(contact_tick.is_some(), "never reached the wall");
    assert_eq!(actor.collision_box().right(), 128.0);
    assert!(!actor.is_stuck(&cs));

    // Pushing on keeps it pinned without penetrating.
    for _ in 0..10 {
        actor.step(DT, &run, &cs);
        assert_eq!(actor.collision_box().right(), 128.0);
    }
}

#[test]
fn test_buffered_jump_fires_on_landing_tick() {
    let space = build(&["....", "....", "....", "....", "####"]);
    let cs = CollisionSystem::new(&space);
    let mut config = CoreConfig::default();
    config.actor.double_jump_enabled = false;
    assert_eq!(config.actor.jump_buffer_time, 0.1);
    let start = actor_with_box_at(20.0, 0.0, config);

    // Dry run to find the landing tick.
    let mut probe = start.clone();
    let mut landing_tick = 0;
    while !probe.on_ground() {
        probe.step(DT, &ActorInput::default(), &cs);
        landing_tick += 1;
        assert!(landing_tick < 200);
    }
    assert!(landing_tick > 3);

    // Press three ticks (50 ms) before touching down.
    let mut actor = start;
    let press_at = landing_tick - 3;
    for tick in 1..=landing_tick {
        let input = ActorInput {
            jump_pressed: tick == press_at,
            jump_held: tick >= press_at,
            ..Default::default()
        };
        actor.step(DT, &input, &cs);
        if tick < landing_tick {
            assert!(actor.velocity.y > 0.0);
        }
    }

    assert_eq!(actor.velocity.y, -actor.config().jump_power);
    assert!(!actor.timers().active(Timer::JumpBuffer));
    assert_eq!(actor.collision_box().bottom(), 128.0);
}

#[test]
fn test_corruption_identity_away_from_hazards() {
    let cs = CollisionSystem::detached();
    let hazards = [Hazard::new(Vec2::new(10_000.0, 0.0), 150.0, 1.0)];
    let mut actor = Actor::new(Vec2::ZERO);
    for _ in 0..120 {
        actor.tick(DT, &ActorInput::default(), &cs, &hazards);
        assert_eq!(actor.multipliers(), PhysicsMultipliers::IDENTITY);
    }
}

#[test]
fn test_corruption_bends_gravity_near_hazard() {
    let cs = CollisionSystem::detached();
    let mut plain = Actor::new(Vec2::ZERO);
    let mut corrupted = plain.clone();
    let hazard = [Hazard::new(corrupted.collision_box().center(), 400.0, 1.0)];

    for _ in 0..30 {
        corrupted.update_corruption(&hazard, DT);
    }
    let m = corrupted.multipliers();
    assert_ne!(m, PhysicsMultipliers::IDENTITY);

    plain.step(DT, &ActorInput::default(), &cs);
    corrupted.step(DT, &ActorInput::default(), &cs);
    let expected = plain.velocity.y * m.gravity;
    assert!((corrupted.velocity.y - expected).abs() < 1e-3);
}

#[test]
fn test_degraded_mode_without_level() {
    let cs = CollisionSystem::detached();
    let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(!cs.point_overlap(&rect));
    assert!(!cs.ground_probe(&rect));
    let safe = cs.find_safe_position(&rect);
    assert!(safe.found);
    assert_eq!(safe.pos, rect.pos);

    let mut actor = Actor::new(Vec2::new(0.0, 0.0));
    let run = ActorInput {
        right: true,
        ..Default::default()
    };
    for _ in 0..60 {
        actor.step(DT, &run, &cs);
        assert!(!actor.on_ground());
    }
    assert!(actor.position.x > 0.0 && actor.position.y > 0.0);
}

#[test]
fn test_rebuild_between_ticks() {
    let mut grid = TileGrid::from_rows(32, 32, &["....", "....", "####"]);
    let builder = TileCollisionBuilder::default();
    let (mut space, _) = builder.build(&grid);
    let mut actor = actor_with_box_at(40.0, 34.0, CoreConfig::default());
    actor.step(DT, &ActorInput::default(), &CollisionSystem::new(&space));
    assert!(actor.on_ground());

    // Knock out the floor under the actor.
    grid.layers[0].tiles[9] = 0;
    grid.layers[0].tiles[8] = 0;
    builder.rebuild(&grid, &mut space);
    actor.step(DT, &ActorInput::default(), &CollisionSystem::new(&space));
    assert!(!actor.on_ground());
    assert!(actor.timers().active(Timer::Coyote));
}

#[test]
fn test_enemy_body_shares_resolution_rules() {
    let space = build(&["......", "......", "######"]);
    let cs = CollisionSystem::new(&space);
    let mut body = SimpleBody::new(Rect::new(100.0, 0.0, 24.0, 24.0), 1400.0);
    for _ in 0..120 {
        body.step(DT, &cs);
    }
    assert!(body.on_ground);
    assert_eq!(body.bounds.bottom(), 64.0);
}
