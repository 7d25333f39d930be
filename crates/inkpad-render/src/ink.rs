//! Variable-width ink outlines for freehand strokes.
//!
//! A raw point sequence becomes a closed, fillable outline whose width
//! varies with simulated pressure: fast segments thin out, slow ones
//! thicken, mimicking natural ink. Filling the outline reads far better
//! than stroking a polyline, which flattens the hand's rhythm.

use kurbo::{BezPath, Point, Vec2};

/// Outline generation parameters.
#[derive(Debug, Clone, Copy)]
pub struct InkOptions {
    /// Full stroke diameter at maximum pressure.
    pub size: f64,
    /// How strongly pressure affects width, in [0, 1].
    pub thinning: f64,
    /// Exponential smoothing applied to simulated pressure, in [0, 1].
    pub smoothing: f64,
    /// Input smoothing: how strongly each point is pulled toward its
    /// predecessor, in [0, 1).
    pub streamline: f64,
}

impl Default for InkOptions {
    fn default() -> Self {
        Self {
            size: 8.0,
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
        }
    }
}

impl InkOptions {
    /// Options for an element with the given stroke width.
    pub fn for_stroke_width(width: f64) -> Self {
        Self {
            size: width * 2.5,
            ..Self::default()
        }
    }
}

/// Build a closed outline around `points`.
///
/// Fewer than two distinct points yield a dot: a small circle at the
/// first point. The result always ends with a close, so it can be
/// filled directly.
pub fn stroke_outline(points: &[Point], options: &InkOptions) -> BezPath {
    let smoothed = streamline(points, options.streamline);
    if smoothed.len() < 2 {
        let center = smoothed.first().copied().unwrap_or(Point::ZERO);
        return dot(center, options.size / 2.0);
    }

    let pressures = simulate_pressure(&smoothed, options);
    let radii: Vec<f64> = pressures
        .iter()
        .map(|p| (options.size / 2.0) * (1.0 - options.thinning * (1.0 - p)).max(0.05))
        .collect();

    // Left and right offset rails, perpendicular to the local direction.
    let mut left = Vec::with_capacity(smoothed.len());
    let mut right = Vec::with_capacity(smoothed.len());
    for i in 0..smoothed.len() {
        let dir = direction_at(&smoothed, i);
        let perp = Vec2::new(-dir.y, dir.x);
        left.push(smoothed[i] + perp * radii[i]);
        right.push(smoothed[i] - perp * radii[i]);
    }

    // Walk down the left rail and back up the right one.
    let mut outline = Vec::with_capacity(left.len() * 2);
    outline.extend(left);
    outline.extend(right.into_iter().rev());
    smooth_polygon(&outline)
}

/// Pull each point toward its predecessor to damp pointer jitter.
fn streamline(points: &[Point], amount: f64) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        match out.last() {
            Some(&prev) => {
                let next = prev + (p - prev) * (1.0 - amount);
                // Collapse samples that barely move.
                if (next - prev).hypot() > 0.01 {
                    out.push(next);
                }
            }
            None => out.push(p),
        }
    }
    out
}

/// Speed-derived pressure per point: long inter-sample distances mean
/// fast movement and low pressure. Smoothed so width never jumps.
fn simulate_pressure(points: &[Point], options: &InkOptions) -> Vec<f64> {
    let mut pressures = Vec::with_capacity(points.len());
    let mut pressure = 1.0_f64;
    pressures.push(pressure);
    for w in points.windows(2) {
        let speed = ((w[1] - w[0]).hypot() / options.size).min(1.0);
        let target = (1.0 - speed).clamp(0.2, 1.0);
        pressure += (target - pressure) * options.smoothing;
        pressures.push(pressure);
    }
    pressures
}

fn direction_at(points: &[Point], i: usize) -> Vec2 {
    let v = if i + 1 < points.len() {
        points[i + 1] - points[i]
    } else {
        points[i] - points[i - 1]
    };
    let len = v.hypot();
    if len > 1e-9 {
        v / len
    } else {
        Vec2::new(1.0, 0.0)
    }
}

/// Closed path through `points`, smoothed with quadratics through
/// segment midpoints.
fn smooth_polygon(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if points.is_empty() {
        return path;
    }
    path.move_to(points[0]);
    for w in points.windows(2) {
        let mid = Point::new((w[0].x + w[1].x) / 2.0, (w[0].y + w[1].y) / 2.0);
        path.quad_to(w[0], mid);
    }
    if let Some(&last) = points.last() {
        path.quad_to(last, points[0]);
    }
    path.close_path();
    path
}

fn dot(center: Point, radius: f64) -> BezPath {
    use kurbo::{Circle, Shape};
    Circle::new(center, radius.max(0.5)).to_path(0.01)
}
