//! Hand-drawn path synthesis for lines and rectangles.
//!
//! Mimics the rough.js look: endpoints overshoot slightly, segment
//! midpoints bow sideways, and each element is drawn with two offset
//! passes so corners read as sketched rather than ruled. All randomness
//! comes from a seed derived from the element id, so an element keeps
//! its exact wobble across frames and reloads.

use inkpad_core::ElementId;
use kurbo::{BezPath, PathEl, Point};

/// Default roughness used by the frame builder.
pub const ROUGHNESS: f64 = 1.0;

/// Number of offset passes per element.
pub const STROKE_PASSES: u32 = 2;

/// Simple seeded random number generator (xorshift32).
struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    fn new(seed: u32) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Random float in [-1, 1].
    fn next_f64(&mut self) -> f64 {
        (self.next_u32() as f64 / u32::MAX as f64) * 2.0 - 1.0
    }

    fn offset(&mut self, amount: f64) -> f64 {
        self.next_f64() * amount
    }
}

/// Stable rough seed for an element.
pub fn seed_from_id(id: ElementId) -> u32 {
    let v = id.as_u128();
    (v ^ (v >> 32) ^ (v >> 64) ^ (v >> 96)) as u32
}

/// Perturb `path` into a hand-drawn variant.
///
/// `zoom` keeps the wobble visually consistent across zoom levels;
/// `stroke_index` selects a fully independent random sequence per pass.
pub fn roughen(path: &BezPath, roughness: f64, zoom: f64, seed: u32, stroke_index: u32) -> BezPath {
    if roughness <= 0.0 {
        return path.clone();
    }

    let scale = 1.0 / zoom.sqrt();
    let max_offset = roughness * 2.0 * scale;
    let bowing = roughness;

    // Large prime so each pass gets a very different sequence.
    let combined_seed = seed.wrapping_add(stroke_index.wrapping_mul(99991));
    let mut rng = SimpleRng::new(combined_seed);

    let mut result = BezPath::new();
    let mut last_point = Point::ZERO;

    for el in path.elements() {
        match el {
            PathEl::MoveTo(p) => {
                let wobbled = Point::new(
                    p.x + rng.offset(max_offset),
                    p.y + rng.offset(max_offset),
                );
                result.move_to(wobbled);
                last_point = *p;
            }
            PathEl::LineTo(p) => {
                // Bow the midpoint perpendicular to the segment, then
                // offset the endpoint for the overshoot at corners.
                let dx = p.x - last_point.x;
                let dy = p.y - last_point.y;
                let len = (dx * dx + dy * dy).sqrt();

                let bow_offset = bowing * roughness * len / 200.0;
                let bow = rng.offset(bow_offset) * scale;
                let (perp_x, perp_y) = if len > 0.001 {
                    (-dy / len, dx / len)
                } else {
                    (0.0, 0.0)
                };

                let mid = Point::new(
                    (last_point.x + p.x) / 2.0 + perp_x * bow,
                    (last_point.y + p.y) / 2.0 + perp_y * bow,
                );
                let end = Point::new(
                    p.x + rng.offset(max_offset),
                    p.y + rng.offset(max_offset),
                );
                result.quad_to(mid, end);
                last_point = *p;
            }
            PathEl::QuadTo(p1, p2) => {
                let w1 = Point::new(
                    p1.x + rng.offset(max_offset * 0.7),
                    p1.y + rng.offset(max_offset * 0.7),
                );
                let w2 = Point::new(
                    p2.x + rng.offset(max_offset),
                    p2.y + rng.offset(max_offset),
                );
                result.quad_to(w1, w2);
                last_point = *p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                let w1 = Point::new(
                    p1.x + rng.offset(max_offset * 0.5),
                    p1.y + rng.offset(max_offset * 0.5),
                );
                let w2 = Point::new(
                    p2.x + rng.offset(max_offset * 0.5),
                    p2.y + rng.offset(max_offset * 0.5),
                );
                let w3 = Point::new(
                    p3.x + rng.offset(max_offset),
                    p3.y + rng.offset(max_offset),
                );
                result.curve_to(w1, w2, w3);
                last_point = *p3;
            }
            PathEl::ClosePath => {
                // Leave the closing corner open-ish: endpoints won't
                // match perfectly, which is where the overshoot shows.
                result.close_path();
            }
        }
    }

    result
}

/// The two sketch passes for an element path.
pub fn rough_passes(path: &BezPath, zoom: f64, seed: u32) -> Vec<BezPath> {
    (0..STROKE_PASSES)
        .map(|i| roughen(path, ROUGHNESS, zoom, seed, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_path() -> BezPath {
        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, 0.0));
        path.line_to(Point::new(100.0, 0.0));
        path.line_to(Point::new(100.0, 80.0));
        path
    }

    #[test]
    fn test_deterministic_per_seed() {
        let path = sample_path();
        let a = roughen(&path, 1.0, 1.0, 42, 0);
        let b = roughen(&path, 1.0, 1.0, 42, 0);
        assert_eq!(a.elements(), b.elements());
    }

    #[test]
    fn test_passes_differ_from_each_other() {
        let path = sample_path();
        let passes = rough_passes(&path, 1.0, 42);
        assert_eq!(passes.len(), STROKE_PASSES as usize);
        assert_ne!(passes[0].elements(), passes[1].elements());
    }

    #[test]
    fn test_zero_roughness_is_identity() {
        let path = sample_path();
        let out = roughen(&path, 0.0, 1.0, 42, 0);
        assert_eq!(out.elements(), path.elements());
    }

    #[test]
    fn test_lines_become_quads() {
        let path = sample_path();
        let out = roughen(&path, 1.0, 1.0, 42, 0);
        assert!(out
            .elements()
            .iter()
            .skip(1)
            .all(|el| matches!(el, PathEl::QuadTo(..))));
    }

    #[test]
    fn test_wobble_stays_bounded() {
        let path = sample_path();
        let out = roughen(&path, 1.0, 1.0, 7, 0);
        for (orig, wobbled) in path.elements().iter().zip(out.elements()) {
            let (o, w) = match (orig, wobbled) {
                (PathEl::MoveTo(o), PathEl::MoveTo(w)) => (o, w),
                (PathEl::LineTo(o), PathEl::QuadTo(_, w)) => (o, w),
                other => panic!("unexpected element pair {:?}", other),
            };
            assert!((o.x - w.x).abs() <= 2.0);
            assert!((o.y - w.y).abs() <= 2.0);
        }
    }

    #[test]
    fn test_seed_from_id_is_stable() {
        let id = Uuid::new_v4();
        assert_eq!(seed_from_id(id), seed_from_id(id));
    }
}
