use glam::Vec2;
use glitchrun::*;
use std::time::Instant;

fn main() {
    // 256x64 level of 32px tiles: solid floor, scattered pillars and ledges.
    let (w, h) = (256u32, 64u32);
    let mut tiles = vec![0u32; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            let floor = y >= h - 2;
            let pillar = x % 17 == 0 && y >= h - 6;
            let ledge = (x ^ y) % 23 == 0 && y > 8;
            if floor || pillar || ledge {
                tiles[(y * w + x) as usize] = 1;
            }
        }
    }
    let grid = TileGrid {
        width: w,
        height: h,
        tile_width: 32,
        tile_height: 32,
        layers: vec![TileLayer {
            name: "ground".into(),
            visible: true,
            tiles,
        }],
    };

    let t0 = Instant::now();
    let (space, stats) = TileCollisionBuilder::default().build(&grid);
    let build_secs = t0.elapsed().as_secs_f64();
    println!(
        "build: shapes={} tiles={} secs={:.4}",
        stats.shapes, stats.tiles_scanned, build_secs
    );

    let cs = CollisionSystem::new(&space);

    // Overlap query throughput
    let n_queries = 200_000;
    let t1 = Instant::now();
    let mut hits = 0usize;
    for i in 0..n_queries {
        let x = (i % 8000) as f32;
        let y = ((i * 7) % 2000) as f32;
        if cs.point_overlap(&Rect::new(x, y, 18.0, 30.0)) {
            hits += 1;
        }
    }
    let dt1 = t1.elapsed().as_secs_f64();
    println!(
        "point_overlap: queries={} secs={:.3} throughput={:.0} q/s hits={}",
        n_queries,
        dt1,
        n_queries as f64 / dt1,
        hits
    );

    // Actor ticks with a hazard parked mid-level
    let hazards = [Hazard::new(Vec2::new(4000.0, 1800.0), 300.0, 0.9)];
    let mut actor = Actor::new(Vec2::new(64.0, 1700.0));
    let n_ticks = 20_000;
    let t2 = Instant::now();
    for i in 0..n_ticks {
        let input = ActorInput {
            right: (i / 240) % 2 == 0,
            left: (i / 240) % 2 == 1,
            jump_pressed: i % 45 == 0,
            jump_held: i % 45 < 20,
            roll_pressed: i % 300 == 150,
            ..Default::default()
        };
        actor.tick(1.0 / 60.0, &input, &cs, &hazards);
        if actor.is_stuck(&cs) && !actor.reset_to_safe_position(&cs) {
            actor.respawn(Vec2::new(64.0, 1700.0));
        }
    }
    let dt2 = t2.elapsed().as_secs_f64();
    println!(
        "actor: ticks={} secs={:.3} throughput={:.0} ticks/s final=({:.1}, {:.1}) corruption={:.2}",
        n_ticks,
        dt2,
        n_ticks as f64 / dt2,
        actor.position.x,
        actor.position.y,
        actor.corruption().level
    );
}
