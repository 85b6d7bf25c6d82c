use pbd_engine::{
    constraints::DragConstraint,
    math::Vector2,
    BodyHandle, RigidBody, Solver, SolverConfig,
};
use std::f64::consts::PI;

const SEGMENT_COUNT: usize = 100;
const SEGMENT_LENGTH: f64 = 10.0;
const COMPLIANCE: f64 = 0.000001;
const WORLD_SIZE: Vector2 = Vector2::new(1600.0, 1600.0);

const FRAME_DT: f64 = 1.0 / 60.0;
const FRAMES: usize = 300;

const GRID_WIDTH: usize = 80;
const GRID_HEIGHT: usize = 30;

/// A fixed rail with a tube of segments hanging from it and its free end dragged around
struct Tube {
    segments: Vec<BodyHandle>,
    drag: pbd_engine::Handle<DragConstraint>,
}

fn build_tube(solver: &mut Solver) -> pbd_engine::Result<Tube> {
    let mut position = Vector2::new(0.0, -WORLD_SIZE.y * 0.5);

    // Top rail, a single long immovable segment
    let mut rail = RigidBody::segment(WORLD_SIZE.x * 0.75, 1.0)?;
    rail.set_position_instant(Vector2::new(0.0, -WORLD_SIZE.y * 0.5 + 30.0));
    rail.set_fixed();
    let rail = solver.add_body(rail);

    let mut first = RigidBody::segment(SEGMENT_LENGTH, 100.0)?;
    first.set_position_instant(position);
    let first = solver.add_body(first);

    solver.create_segment_pin(rail, first, 0, COMPLIANCE)?;
    solver.create_angular_constraint(rail, first, PI * 0.5, 0.0)?;

    let mut segments = vec![first];
    for _ in 1..SEGMENT_COUNT {
        position.x += SEGMENT_LENGTH;
        let mut segment = RigidBody::segment(SEGMENT_LENGTH, 1.0)?;
        segment.set_position_instant(position);
        let segment = solver.add_body(segment);

        let last = segments[segments.len() - 1];
        let tail = solver.particle_anchor(last, 1)?;
        let head = solver.particle_anchor(segment, 0)?;
        solver.create_pin(tail, head, COMPLIANCE)?;
        solver.create_angular_constraint(last, segment, 0.0, COMPLIANCE * 0.1)?;

        segments.push(segment);
    }

    let end = segments[segments.len() - 1];
    let tip = solver.particle_anchor(end, 1)?;
    let drag = solver.create_drag_constraint(end, tip.local, Vector2::zero(), COMPLIANCE)?;

    Ok(Tube { segments, drag })
}

fn render(solver: &Solver, tube: &Tube) -> String {
    let mut grid = vec![vec![' '; GRID_WIDTH]; GRID_HEIGHT];
    let to_cell = |p: Vector2| {
        let x = (p.x / WORLD_SIZE.x + 0.5) * GRID_WIDTH as f64;
        let y = (p.y / WORLD_SIZE.y + 0.5) * GRID_HEIGHT as f64;
        if x >= 0.0 && y >= 0.0 && (x as usize) < GRID_WIDTH && (y as usize) < GRID_HEIGHT {
            Some((x as usize, y as usize))
        } else {
            None
        }
    };

    for &segment in &tube.segments {
        if let Some((x, y)) = to_cell(solver.body(segment).get_position()) {
            grid[y][x] = 'o';
        }
    }
    if let Some((x, y)) = to_cell(solver.constraint(tube.drag).get_current_target()) {
        grid[y][x] = '+';
    }

    let mut frame = String::with_capacity((GRID_WIDTH + 1) * GRID_HEIGHT);
    for row in grid {
        frame.extend(row);
        frame.push('\n');
    }
    frame
}

fn main() -> pbd_engine::Result<()> {
    let config = SolverConfig {
        gravity: Vector2::new(0.0, 2000.0),
        ..SolverConfig::default()
    };
    let mut solver = Solver::with_config(config)?;
    let tube = build_tube(&mut solver)?;

    println!(
        "Hanging tube: {} bodies, {} constraints, {} sub-steps",
        solver.body_count(),
        solver.constraint_count(),
        solver.get_config().sub_steps
    );

    for frame in 0..FRAMES {
        // Sweep the dragged end along a circle
        let t = frame as f64 * FRAME_DT;
        let target = Vector2::from_angle(t * 2.0) * (WORLD_SIZE.x * 0.25);
        solver.constraint_mut(tube.drag).set_target(target);

        solver.update(FRAME_DT);

        if frame % 60 == 0 {
            println!("t = {:.2}s", solver.get_time());
            print!("{}", render(&solver, &tube));
        }
    }

    let tip = solver.body(tube.segments[tube.segments.len() - 1]).get_position();
    println!("Final tip position: {}", tip);
    Ok(())
}
