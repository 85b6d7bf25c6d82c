//! Benchmarks for the sub-stepped solver.

use criterion::{criterion_group, criterion_main, Criterion};
use pbd_engine::{math::Vector2, BodyHandle, RigidBody, Solver, SolverConfig};

fn hanging_tube(segments: usize, sub_steps: u32) -> (Solver, BodyHandle) {
    let mut solver = Solver::with_config(SolverConfig { sub_steps, ..SolverConfig::default() }).unwrap();

    let mut rail = RigidBody::segment(1200.0, 1.0).unwrap();
    rail.set_fixed();
    let rail = solver.add_body(rail);

    let mut last: Option<BodyHandle> = None;
    for i in 0..segments {
        let mut body = RigidBody::segment(10.0, 1.0).unwrap();
        body.set_position_instant(Vector2::new(5.0 + 10.0 * i as f64, 0.0));
        let body = solver.add_body(body);

        match last {
            None => {
                solver.create_segment_pin(rail, body, 0, 0.000001).unwrap();
            }
            Some(previous) => {
                let tail = solver.particle_anchor(previous, 1).unwrap();
                let head = solver.particle_anchor(body, 0).unwrap();
                solver.create_pin(tail, head, 0.000001).unwrap();
                solver.create_angular_constraint(previous, body, 0.0, 0.0000001).unwrap();
            }
        }
        last = Some(body);
    }

    (solver, last.unwrap())
}

fn bench_tube_update(c: &mut Criterion) {
    c.bench_function("tube_100_segments_200_substeps_1_frame", |b| {
        let (mut solver, _) = hanging_tube(100, 200);
        b.iter(|| {
            solver.update(1.0 / 60.0);
            solver.get_time()
        });
    });
}

fn bench_tube_with_drag(c: &mut Criterion) {
    c.bench_function("tube_50_segments_dragged_60_frames", |b| {
        b.iter(|| {
            let (mut solver, tip) = hanging_tube(50, 50);
            let drag = solver
                .create_drag_constraint(tip, Vector2::new(5.0, 0.0), Vector2::new(500.0, 0.0), 0.000001)
                .unwrap();
            for frame in 0..60 {
                let target = Vector2::new(500.0, frame as f64 * 5.0);
                solver.constraint_mut(drag).set_target(target);
                solver.update(1.0 / 60.0);
            }
            solver.body(tip).get_position()
        });
    });
}

criterion_group!(benches, bench_tube_update, bench_tube_with_drag);
criterion_main!(benches);
