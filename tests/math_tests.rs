use pbd_engine::math::{closest_segment_point, distance_to_line, Transform2, Vector2};
use std::f64::consts::PI;
use approx::{assert_relative_eq, assert_abs_diff_eq};

#[test]
fn test_vector2_operations() {
    let v1 = Vector2::new(1.0, 2.0);
    let v2 = Vector2::new(4.0, 5.0);

    // Addition
    let sum = v1 + v2;
    assert_eq!(sum, Vector2::new(5.0, 7.0));

    // Subtraction
    let diff = v2 - v1;
    assert_eq!(diff, Vector2::new(3.0, 3.0));

    // Scalar multiplication, both sides
    assert_eq!(v1 * 2.0, Vector2::new(2.0, 4.0));
    assert_eq!(2.0 * v1, Vector2::new(2.0, 4.0));

    // Dot and scalar cross product
    assert_eq!(v1.dot(&v2), 14.0);
    assert_eq!(v1.cross(&v2), 1.0 * 5.0 - 2.0 * 4.0);

    // Normalize
    let normalized = v2.normalize();
    assert_relative_eq!(normalized.length(), 1.0);
    assert_relative_eq!(normalized.x, 4.0 / 41.0f64.sqrt());
}

#[test]
fn test_try_normalize_zero_vector() {
    assert!(Vector2::zero().try_normalize().is_none());

    let (unit, length) = Vector2::new(3.0, 4.0).try_normalize().unwrap();
    assert_relative_eq!(length, 5.0);
    assert_relative_eq!(unit, Vector2::new(0.6, 0.8));
}

#[test]
fn test_rotation_and_angles() {
    let v = Vector2::unit_x().rotate(PI / 2.0);
    assert_abs_diff_eq!(v, Vector2::unit_y(), epsilon = 1e-12);

    // Perpendicular is a counter-clockwise quarter turn
    assert_eq!(Vector2::new(1.0, 2.0).perpendicular(), Vector2::new(-2.0, 1.0));

    // Signed angle between directions is wrapped to (-PI, PI]
    let a = Vector2::from_angle(3.0);
    let b = Vector2::from_angle(-3.0);
    assert_relative_eq!(a.angle_to(&b), 2.0 * PI - 6.0, epsilon = 1e-12);
    assert_relative_eq!(b.angle_to(&a), 6.0 - 2.0 * PI, epsilon = 1e-12);
}

#[test]
fn test_transform_operations() {
    let transform = Transform2::new(Vector2::new(1.0, 2.0), PI / 2.0);

    let point = Vector2::new(1.0, 0.0);
    let world = transform.transform_point(point);
    assert_abs_diff_eq!(world, Vector2::new(1.0, 3.0), epsilon = 1e-12);

    let local = transform.inverse_transform_point(world);
    assert_abs_diff_eq!(local, point, epsilon = 1e-12);

    // Vectors ignore the translation
    let direction = transform.transform_vector(point);
    assert_abs_diff_eq!(direction, Vector2::new(0.0, 1.0), epsilon = 1e-12);

    // Round trip through nalgebra
    let back = Transform2::from_isometry(&transform.to_isometry());
    assert_abs_diff_eq!(back.position, transform.position, epsilon = 1e-12);
    assert_relative_eq!(back.angle, transform.angle, epsilon = 1e-12);
}

#[test]
fn test_distance_to_line() {
    let distance = distance_to_line(Vector2::new(3.0, -4.0), Vector2::unit_x(), Vector2::new(10.0, 0.0));
    assert_relative_eq!(distance, 4.0);

    let distance = distance_to_line(Vector2::new(1.0, 1.0), Vector2::new(1.0, 1.0).normalize(), Vector2::zero());
    assert_abs_diff_eq!(distance, 0.0, epsilon = 1e-12);
}

#[test]
fn test_closest_segment_point() {
    let start = Vector2::new(0.0, 0.0);
    let end = Vector2::new(10.0, 0.0);

    // Projection lands inside the segment from either side
    assert_abs_diff_eq!(closest_segment_point(Vector2::new(3.0, 4.0), start, end), Vector2::new(3.0, 0.0), epsilon = 1e-12);
    assert_abs_diff_eq!(closest_segment_point(Vector2::new(3.0, -4.0), start, end), Vector2::new(3.0, 0.0), epsilon = 1e-12);

    // Clamped to the endpoints
    assert_eq!(closest_segment_point(Vector2::new(-2.0, 1.0), start, end), start);
    assert_eq!(closest_segment_point(Vector2::new(12.0, -1.0), start, end), end);

    // Slanted segment
    let closest = closest_segment_point(Vector2::new(0.0, 2.0), Vector2::zero(), Vector2::new(2.0, 2.0));
    assert_abs_diff_eq!(closest, Vector2::new(1.0, 1.0), epsilon = 1e-12);

    // A degenerate segment collapses to its start
    let point = Vector2::new(5.0, 5.0);
    assert_eq!(closest_segment_point(point, Vector2::new(1.0, 1.0), Vector2::new(1.0, 1.0)), Vector2::new(1.0, 1.0));
}
