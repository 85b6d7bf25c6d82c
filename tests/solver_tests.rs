use pbd_engine::{
    constraints::{AngularConstraint, DistanceConstraint, DragConstraint},
    core::{ConstraintKind, SolverEventType},
    error::PhysicsError,
    math::Vector2,
    Anchor, Arena, BodyHandle, Constraint, RigidBody, Solver, SolverConfig,
};
use approx::{assert_relative_eq, assert_abs_diff_eq};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn weightless(sub_steps: u32) -> Solver {
    Solver::with_config(SolverConfig {
        gravity: Vector2::zero(),
        sub_steps,
        ..SolverConfig::default()
    })
    .unwrap()
}

fn add_point(solver: &mut Solver, x: f64, y: f64) -> BodyHandle {
    let mut body = RigidBody::from_particles(vec![Vector2::zero()], 1.0).unwrap();
    body.set_position_instant(Vector2::new(x, y));
    solver.add_body(body)
}

fn add_segment(solver: &mut Solver, x: f64, y: f64, length: f64) -> BodyHandle {
    let mut body = RigidBody::segment(length, 1.0).unwrap();
    body.set_position_instant(Vector2::new(x, y));
    solver.add_body(body)
}

/// A fixed rail with a chain of segments hanging from it, dragged at the free end
fn build_chain(solver: &mut Solver, links: usize, compliance: f64) -> (BodyHandle, Vec<BodyHandle>) {
    let mut rail = RigidBody::segment(400.0, 1.0).unwrap();
    rail.set_position_instant(Vector2::new(0.0, 0.0));
    rail.set_fixed();
    let rail = solver.add_body(rail);

    let mut chain = Vec::new();
    for i in 0..links {
        let mut link = RigidBody::segment(10.0, 1.0).unwrap();
        link.set_position_instant(Vector2::new(5.0 + 10.0 * i as f64, 0.0));
        chain.push(solver.add_body(link));
    }

    solver.create_segment_pin(rail, chain[0], 0, 0.0).unwrap();
    for pair in chain.windows(2) {
        let tail = solver.particle_anchor(pair[0], 1).unwrap();
        let head = solver.particle_anchor(pair[1], 0).unwrap();
        solver.create_pin(tail, head, compliance).unwrap();
        solver.create_angular_constraint(pair[0], pair[1], 0.0, compliance * 10.0).unwrap();
    }

    (rail, chain)
}

#[test]
fn test_default_config() {
    let solver = Solver::new();
    let config = solver.get_config();
    assert_eq!(config.gravity, Vector2::new(0.0, 1000.0));
    assert_eq!(config.friction, 0.0002);
    assert_eq!(config.sub_steps, 200);
}

#[test]
fn test_invalid_config_is_rejected() {
    let zero_steps = SolverConfig { sub_steps: 0, ..SolverConfig::default() };
    assert!(matches!(Solver::with_config(zero_steps), Err(PhysicsError::InvalidParameter(_))));

    let full_friction = SolverConfig { friction: 1.0, ..SolverConfig::default() };
    assert!(Solver::with_config(full_friction).is_err());

    let bad_gravity = SolverConfig { gravity: Vector2::new(f64::NAN, 0.0), ..SolverConfig::default() };
    assert!(Solver::with_config(bad_gravity).is_err());

    let mut solver = Solver::new();
    assert!(solver.set_sub_steps(0).is_err());
    assert!(solver.set_friction(-0.1).is_err());
    assert_eq!(solver.get_config().sub_steps, 200);
}

#[test]
fn test_distance_constraint_against_fixed_body() {
    let mut solver = weightless(200);
    let a = add_point(&mut solver, 0.0, 0.0);
    let b = add_point(&mut solver, 15.0, 0.0);
    solver.body_mut(b).set_fixed();

    let constraint = solver
        .create_distance_constraint(Anchor::center(a), Anchor::center(b), 10.0, 0.0)
        .unwrap();

    solver.update(1.0 / 60.0);

    let length = solver.body(a).get_position().distance(&solver.body(b).get_position());
    assert_relative_eq!(length, 10.0, epsilon = 1e-3);
    assert_eq!(solver.body(b).get_position(), Vector2::new(15.0, 0.0));
    assert_relative_eq!(solver.constraint(constraint).get_current_length(), 10.0, epsilon = 1e-3);
}

#[test]
fn test_distance_constraint_between_free_bodies() {
    let mut solver = weightless(200);
    let a = add_point(&mut solver, 0.0, 0.0);
    let b = add_point(&mut solver, 15.0, 0.0);
    solver
        .create_distance_constraint(Anchor::center(a), Anchor::center(b), 10.0, 0.0)
        .unwrap();

    for _ in 0..10 {
        solver.update(1.0 / 60.0);
        let length = solver.body(a).get_position().distance(&solver.body(b).get_position());
        assert_relative_eq!(length, 10.0, epsilon = 1e-3);
    }

    // Momentum is conserved, so the midpoint never moves
    let midpoint = (solver.body(a).get_position() + solver.body(b).get_position()) * 0.5;
    assert_abs_diff_eq!(midpoint, Vector2::new(7.5, 0.0), epsilon = 1e-6);
}

#[test]
fn test_fixed_body_never_moves() {
    let mut solver = Solver::new();
    let (rail, chain) = build_chain(&mut solver, 5, 0.0);
    let rail_position = solver.body(rail).get_position();

    for _ in 0..30 {
        solver.update(1.0 / 60.0);
    }

    assert_eq!(solver.body(rail).get_position(), rail_position);
    assert_eq!(solver.body(rail).get_angle(), 0.0);

    // The chain hangs below the rail under the default y-down gravity
    let tip = solver.body(*chain.last().unwrap()).get_position();
    assert!(tip.y > 0.0);
    assert!(tip.x.is_finite() && tip.y.is_finite());
}

#[test]
fn test_chain_stays_connected() {
    let mut solver = Solver::new();
    let (_, chain) = build_chain(&mut solver, 8, 0.0);

    for _ in 0..30 {
        solver.update(1.0 / 60.0);
    }

    for pair in chain.windows(2) {
        let tail = solver.body(pair[0]).world_particle(1);
        let head = solver.body(pair[1]).world_particle(0);
        assert!(tail.distance(&head) < 0.5, "links drifted apart: {} vs {}", tail, head);
    }

    // The first link stays on the rail
    assert_abs_diff_eq!(solver.body(chain[0]).world_particle(0).y, 0.0, epsilon = 0.5);
}

#[test]
fn test_surface_pushes_body_away_within_one_update() {
    let mut solver = weightless(200);
    let body = add_point(&mut solver, 0.0, -0.2);
    let surface = solver
        .create_surface(body, Vector2::zero(), Vector2::new(0.0, -1.0), 0.5, 0.0)
        .unwrap();

    solver.update(1.0 / 60.0);

    let y = solver.body(body).get_position().y;
    assert!(y < -0.2, "body did not move away from the plane: y = {}", y);
    assert!(y <= -0.5 + 1e-9);
    assert!(solver.constraint(surface).get_force() > 0.0);
}

/// Three free points joined by two distance constraints, built identically in a
/// solver and in a bare arena so the sweeps can be replayed by hand
fn three_point_chain(sub_steps: u32) -> (Solver, Arena<RigidBody>, [DistanceConstraint; 2]) {
    let mut solver = Solver::with_config(SolverConfig {
        gravity: Vector2::zero(),
        friction: 0.0,
        sub_steps,
    })
    .unwrap();
    let mut bodies = Arena::new();

    let mut handles = Vec::new();
    for x in [0.0, 5.0, 12.0] {
        let mut body = RigidBody::from_particles(vec![Vector2::zero()], 1.0).unwrap();
        body.set_position_instant(Vector2::new(x, 0.0));
        let handle = solver.add_body(body.clone());
        assert_eq!(bodies.insert(body), handle);
        handles.push(handle);
    }

    let left = DistanceConstraint::new(Anchor::center(handles[0]), Anchor::center(handles[1]), 6.0, 0.0);
    let right = DistanceConstraint::new(Anchor::center(handles[1]), Anchor::center(handles[2]), 8.0, 0.0);
    solver.create_distance_constraint(Anchor::center(handles[0]), Anchor::center(handles[1]), 6.0, 0.0).unwrap();
    solver.create_distance_constraint(Anchor::center(handles[1]), Anchor::center(handles[2]), 8.0, 0.0).unwrap();

    (solver, bodies, [left, right])
}

/// One sub-step with the constraints solved in the given order
fn manual_sub_step(bodies: &mut Arena<RigidBody>, constraints: &mut [DistanceConstraint; 2], dt: f64, order: [usize; 2]) {
    for body in bodies.iter_mut() {
        body.predict(dt);
    }
    for constraint in constraints.iter_mut() {
        constraint.reset();
    }
    for index in order {
        constraints[index].solve(dt, bodies);
    }
    for body in bodies.iter_mut() {
        body.derive_velocity(dt, 0.0);
    }
}

fn assert_same_positions(solver: &Solver, bodies: &Arena<RigidBody>) {
    for (handle, body) in bodies.iter_with_handles() {
        assert_abs_diff_eq!(solver.body(handle).get_position(), body.get_position(), epsilon = 1e-12);
    }
}

#[test]
fn test_single_sub_step_sweeps_backward() {
    const FORWARD: [usize; 2] = [0, 1];
    const BACKWARD: [usize; 2] = [1, 0];
    let dt = 1.0 / 60.0;

    let (mut solver, mut bodies, mut constraints) = three_point_chain(1);
    let (_, mut forward_bodies, mut forward_constraints) = three_point_chain(1);

    solver.update(dt);
    manual_sub_step(&mut bodies, &mut constraints, dt, BACKWARD);
    manual_sub_step(&mut forward_bodies, &mut forward_constraints, dt, FORWARD);

    assert_same_positions(&solver, &bodies);

    // The order matters for this chain, so a forward sweep would be caught
    let handle = bodies.handle_at(0).unwrap();
    assert!((bodies[handle].get_position().x - forward_bodies[handle].get_position().x).abs() > 0.1);
}

#[test]
fn test_sweeps_alternate_ending_backward() {
    const FORWARD: [usize; 2] = [0, 1];
    const BACKWARD: [usize; 2] = [1, 0];
    let dt = 1.0 / 60.0;
    let sub_dt = dt / 2.0;

    let (mut solver, mut bodies, mut constraints) = three_point_chain(2);

    solver.update(dt);
    manual_sub_step(&mut bodies, &mut constraints, sub_dt, FORWARD);
    manual_sub_step(&mut bodies, &mut constraints, sub_dt, BACKWARD);

    assert_same_positions(&solver, &bodies);
}

#[test]
fn test_zero_or_negative_dt_is_noop() {
    let mut solver = Solver::new();
    let body = add_point(&mut solver, 1.0, 2.0);

    solver.update(0.0);
    solver.update(-1.0);

    assert_eq!(solver.body(body).get_position(), Vector2::new(1.0, 2.0));
    assert_eq!(solver.get_time(), 0.0);

    solver.update(0.5);
    assert_relative_eq!(solver.get_time(), 0.5);
}

#[test]
fn test_remove_constraint_keeps_other_handles() {
    let mut solver = weightless(10);
    let a = add_point(&mut solver, 0.0, 0.0);
    let b = add_point(&mut solver, 5.0, 0.0);
    let c = add_point(&mut solver, 10.0, 0.0);

    let first = solver.create_distance_constraint(Anchor::center(a), Anchor::center(b), 5.0, 0.0).unwrap();
    let second = solver.create_distance_constraint(Anchor::center(b), Anchor::center(c), 7.0, 0.0).unwrap();
    assert_eq!(solver.constraint_count(), 2);

    let removed = solver.remove(first).unwrap();
    assert_eq!(removed.get_distance(), 5.0);
    assert!(solver.remove(first).is_none());
    assert!(matches!(solver.get_constraint(first), Err(PhysicsError::ResourceNotFound(_))));

    assert_eq!(solver.constraint(second).get_distance(), 7.0);
    assert_eq!(solver.constraint_count_of(ConstraintKind::Distance), 1);

    // A new constraint does not revive the old handle
    let third = solver.create_distance_constraint(Anchor::center(a), Anchor::center(c), 3.0, 0.0).unwrap();
    assert_ne!(third, first);
    assert!(solver.get_constraint(first).is_err());
    assert_eq!(solver.constraint(third).get_distance(), 3.0);
}

#[test]
fn test_remove_body_requires_no_references() {
    let mut solver = weightless(10);
    let a = add_point(&mut solver, 0.0, 0.0);
    let b = add_point(&mut solver, 5.0, 0.0);
    let angular = solver.create_angular_constraint(a, b, 0.0, 0.0).unwrap();

    assert!(matches!(solver.remove_body(a), Err(PhysicsError::InvalidParameter(_))));
    assert_eq!(solver.body_count(), 2);

    solver.remove(angular);
    let body = solver.remove_body(a).unwrap();
    assert_eq!(body.get_position(), Vector2::zero());
    assert!(solver.get_body(a).is_err());
    assert_eq!(solver.body(b).get_position(), Vector2::new(5.0, 0.0));
}

#[test]
fn test_creation_validates_handles_and_particles() {
    let mut solver = weightless(10);
    let point = add_point(&mut solver, 0.0, 0.0);
    let segment = add_segment(&mut solver, 0.0, 0.0, 4.0);

    // A single particle cannot act as a rail
    assert!(solver.create_segment_pin(point, segment, 0, 0.0).is_err());
    assert!(solver.create_segment_pin(segment, point, 1, 0.0).is_err());
    assert!(solver.create_segment_pin(segment, point, 0, 0.0).is_ok());

    assert!(solver.particle_anchor(segment, 2).is_err());
    assert!(solver.create_non_penetration(point, 0, 1.0, segment, 5, 1.0).is_err());
    assert!(solver.create_surface(point, Vector2::zero(), Vector2::zero(), 1.0, 0.0).is_err());

    let stale = solver.create_body();
    solver.remove_body(stale).unwrap();
    assert!(matches!(
        solver.create_angular_constraint(point, stale, 0.0, 0.0),
        Err(PhysicsError::ResourceNotFound(_))
    ));
    assert!(solver.create_drag_constraint(stale, Vector2::zero(), Vector2::zero(), 0.0).is_err());
}

#[test]
fn test_events() {
    let mut solver = weightless(10);
    let a = add_point(&mut solver, 0.0, 0.0);
    let b = add_point(&mut solver, 5.0, 0.0);
    let angular = solver.create_angular_constraint(a, b, 0.0, 0.0).unwrap();
    solver.remove(angular);

    let events = solver.get_events();
    assert_eq!(events.len(), 4);
    assert_eq!(events.events_of_type(SolverEventType::BodyAdded).len(), 2);
    assert_eq!(events.events_for_body(b).len(), 1);

    let removed = events.events_of_type(SolverEventType::ConstraintRemoved);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].constraint, Some(ConstraintKind::Angular));

    // Every update starts with an empty queue
    solver.update(1.0 / 60.0);
    assert!(solver.get_events().is_empty());
}

#[test]
fn test_drag_follows_moving_target() {
    let mut solver = weightless(20);
    let body = add_point(&mut solver, 0.0, 0.0);
    let drag = solver
        .create_drag_constraint(body, Vector2::zero(), Vector2::zero(), 0.0)
        .unwrap();
    assert_eq!(solver.constraint(drag).get_steps_count(), 20);

    solver.constraint_mut(drag).set_target(Vector2::new(10.0, 0.0));
    solver.update(1.0 / 60.0);

    // The ramp spans exactly one update
    assert!(solver.constraint(drag).is_settled());
    assert_abs_diff_eq!(solver.body(body).get_position(), Vector2::new(10.0, 0.0), epsilon = 1e-9);
    assert!(solver.constraint(drag).get_force() >= 0.0);
}

#[test]
fn test_bulk_compliance_edit() {
    let mut solver = Solver::new();
    build_chain(&mut solver, 4, 0.0);

    for constraint in solver.constraints_mut::<DistanceConstraint>() {
        constraint.set_compliance(0.001);
    }
    for constraint in solver.constraints_mut::<AngularConstraint>() {
        constraint.set_compliance(0.01);
    }

    assert!(solver.constraints::<DistanceConstraint>().iter().all(|c| c.get_compliance() == 0.001));
    assert!(solver.constraints::<AngularConstraint>().iter().all(|c| c.get_compliance() == 0.01));
    assert!(solver.constraints::<DragConstraint>().is_empty());
}

#[test]
fn test_simulation_is_deterministic() {
    fn run(seed: u64) -> Vec<(Vector2, f64)> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut solver = Solver::new();
        let (_, chain) = build_chain(&mut solver, 6, 0.0);
        let tip = *chain.last().unwrap();
        let drag = solver
            .create_drag_constraint(tip, Vector2::new(5.0, 0.0), Vector2::new(60.0, 0.0), 0.0001)
            .unwrap();

        for frame in 0..20 {
            for constraint in solver.constraints_mut::<DistanceConstraint>() {
                constraint.set_compliance(rng.gen_range(0.0..0.001));
            }
            let target = Vector2::new(60.0 + frame as f64, rng.gen_range(0.0..20.0));
            solver.constraint_mut(drag).set_target(target);
            solver.update(1.0 / 60.0);
        }

        chain
            .iter()
            .map(|&h| (solver.body(h).get_position(), solver.body(h).get_angle()))
            .collect()
    }

    assert_eq!(run(42), run(42));
}

#[test]
fn test_clear() {
    let mut solver = Solver::new();
    build_chain(&mut solver, 3, 0.0);
    solver.update(1.0 / 60.0);

    solver.clear();
    assert_eq!(solver.body_count(), 0);
    assert_eq!(solver.constraint_count(), 0);
    assert_eq!(solver.get_time(), 0.0);
}
