use crate::math::{Real, Vector2, EPSILON};

/// Distance from `point` to the infinite line through `origin` along the unit vector `direction`
#[inline]
pub fn distance_to_line(point: Vector2, direction: Vector2, origin: Vector2) -> Real {
    let u = point - origin;
    let along = direction * u.dot(&direction);
    (u - along).length()
}

/// Returns the point of the segment `[segment_start, segment_end]` closest to `point`.
///
/// The point is first projected onto the segment's supporting line using its signed
/// perpendicular offset, then the along-axis parameter is clamped to the segment.
/// A zero-length segment collapses to `segment_start`.
pub fn closest_segment_point(point: Vector2, segment_start: Vector2, segment_end: Vector2) -> Vector2 {
    let segment = segment_end - segment_start;
    let length = segment.length();
    if length < EPSILON {
        return segment_start;
    }

    let direction = segment / length;
    let normal = direction.perpendicular();

    let offset = distance_to_line(point, direction, segment_start);
    let side = (segment_start - point).dot(&normal);
    let sign = if side < 0.0 { -1.0 } else { 1.0 };
    let projected = point + normal * (sign * offset);

    let along = direction.dot(&(projected - segment_start));
    if along < 0.0 {
        segment_start
    } else if along > length {
        segment_end
    } else {
        projected
    }
}
