//! Pure geometry helpers used by the crop and board engines.

/// A point in normalized image-fractional coordinates, each axis in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Clamps `value` into `[min, max]`.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Converts an absolute pointer position into container-relative fractional
/// coordinates, clamped to [0, 1] per axis. Returns `None` for a degenerate
/// container (zero or negative size), which callers treat as a no-op tick.
pub fn pointer_to_fraction(
    pointer: (f32, f32),
    origin: (f32, f32),
    size: (f32, f32),
) -> Option<Point> {
    if size.0 <= 0.0 || size.1 <= 0.0 {
        return None;
    }
    Some(Point::new(
        clamp((pointer.0 - origin.0) / size.0, 0.0, 1.0),
        clamp((pointer.1 - origin.1) / size.1, 0.0, 1.0),
    ))
}

/// Axis-aligned bounding box of a corner set as `(min_x, min_y, max_x, max_y)`.
pub fn bounding_box(points: &[Point]) -> (f32, f32, f32, f32) {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    (min_x, min_y, max_x, max_y)
}
