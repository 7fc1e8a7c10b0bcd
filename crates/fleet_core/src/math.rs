//! Vector math and toroidal arena geometry.
//!
//! The simulation uses [`glam::Vec2`] for all positions, velocities and
//! forces. Every distance the AI or guidance code measures goes through
//! [`Arena`], which resolves the shortest path across the wrapped edges.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Length below which a vector is treated as zero when normalising.
pub const EPSILON: f32 = 1e-6;

/// Steering helpers missing from [`glam::Vec2`].
pub trait VecExt {
    /// Rescale to `magnitude`, keeping direction. Zero stays zero.
    fn with_magnitude(self, magnitude: f32) -> Self;

    /// Clamp the length to at most `max`.
    fn limit(self, max: f32) -> Self;

    /// Counter-clockwise perpendicular.
    fn perp_ccw(self) -> Self;

    /// Heading angle in radians, or `fallback` for a zero vector.
    fn heading_or(self, fallback: f32) -> f32;
}

impl VecExt for Vec2 {
    #[inline]
    fn with_magnitude(self, magnitude: f32) -> Self {
        let len = self.length();
        if len > EPSILON {
            self * (magnitude / len)
        } else {
            Vec2::ZERO
        }
    }

    #[inline]
    fn limit(self, max: f32) -> Self {
        self.clamp_length_max(max.max(0.0))
    }

    #[inline]
    fn perp_ccw(self) -> Self {
        Vec2::new(-self.y, self.x)
    }

    #[inline]
    fn heading_or(self, fallback: f32) -> f32 {
        if self.length_squared() > EPSILON * EPSILON {
            self.y.atan2(self.x)
        } else {
            fallback
        }
    }
}

/// Wrap an angle into `[-π, π)`.
///
/// Non-finite angles are returned unchanged.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped >= PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Rotate `next` so its heading differs from `prev` by at most `max_turn`
/// radians. Speed is preserved. A stationary `prev` imposes no limit.
pub fn clamp_turn(prev: Vec2, next: Vec2, max_turn: f32) -> Vec2 {
    if prev.length_squared() <= EPSILON || next.length_squared() <= EPSILON {
        return next;
    }
    let prev_angle = prev.y.atan2(prev.x);
    let delta = normalize_angle(next.y.atan2(next.x) - prev_angle);
    if delta.abs() <= max_turn {
        return next;
    }
    let clamped = prev_angle + max_turn.copysign(delta);
    Vec2::from_angle(clamped) * next.length()
}

/// The rectangular, edge-wrapped battle space.
///
/// Coordinates run from `0` to `width`/`height`. Ships leaving one edge
/// reappear on the opposite one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// Width in world units.
    pub width: f32,
    /// Height in world units.
    pub height: f32,
}

impl Arena {
    /// Create a new arena.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Shortest displacement from `from` to `to` across wrapped edges.
    #[must_use]
    pub fn delta(&self, from: Vec2, to: Vec2) -> Vec2 {
        Vec2::new(
            wrap_axis(to.x - from.x, self.width),
            wrap_axis(to.y - from.y, self.height),
        )
    }

    /// Shortest wrapped distance between two points.
    #[must_use]
    pub fn distance(&self, a: Vec2, b: Vec2) -> f32 {
        self.delta(a, b).length()
    }

    /// Shortest wrapped distance squared.
    #[must_use]
    pub fn distance_squared(&self, a: Vec2, b: Vec2) -> f32 {
        self.delta(a, b).length_squared()
    }

    /// Teleport a point that has crossed an edge to the opposite side.
    #[must_use]
    pub fn wrap(&self, p: Vec2) -> Vec2 {
        let mut out = p;
        if out.x > self.width {
            out.x = 0.0;
        } else if out.x < 0.0 {
            out.x = self.width;
        }
        if out.y > self.height {
            out.y = 0.0;
        } else if out.y < 0.0 {
            out.y = self.height;
        }
        out
    }

    /// True when `p` is further than `margin` outside the arena.
    #[must_use]
    pub fn is_outside(&self, p: Vec2, margin: f32) -> bool {
        p.x < -margin || p.x > self.width + margin || p.y < -margin || p.y > self.height + margin
    }

    /// Centre of the arena.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(5000.0, 3000.0)
    }
}

#[inline]
fn wrap_axis(d: f32, extent: f32) -> f32 {
    let half = extent * 0.5;
    if d > half {
        d - extent
    } else if d < -half {
        d + extent
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_takes_short_way_round() {
        let arena = Arena::new(100.0, 50.0);
        let d = arena.delta(Vec2::new(95.0, 5.0), Vec2::new(5.0, 45.0));
        assert!((d.x - 10.0).abs() < 1e-4);
        assert!((d.y + 10.0).abs() < 1e-4);
        assert!((arena.distance(Vec2::new(95.0, 5.0), Vec2::new(5.0, 45.0)) - 200f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_teleports_to_opposite_edge() {
        let arena = Arena::new(100.0, 50.0);
        assert_eq!(arena.wrap(Vec2::new(101.0, 10.0)), Vec2::new(0.0, 10.0));
        assert_eq!(arena.wrap(Vec2::new(-1.0, -2.0)), Vec2::new(100.0, 50.0));
        assert_eq!(arena.wrap(Vec2::new(40.0, 20.0)), Vec2::new(40.0, 20.0));
    }

    #[test]
    fn test_with_magnitude_and_limit() {
        let v = Vec2::new(3.0, 4.0);
        assert!((v.with_magnitude(10.0).length() - 10.0).abs() < 1e-5);
        assert_eq!(Vec2::ZERO.with_magnitude(10.0), Vec2::ZERO);
        assert!((v.limit(1.0).length() - 1.0).abs() < 1e-5);
        assert_eq!(v.limit(100.0), v);
    }

    #[test]
    fn test_clamp_turn_limits_heading_change() {
        let prev = Vec2::new(1.0, 0.0);
        let next = Vec2::new(0.0, 2.0);
        let out = clamp_turn(prev, next, 0.1);
        assert!((out.length() - 2.0).abs() < 1e-5);
        assert!((out.y.atan2(out.x) - 0.1).abs() < 1e-5);

        // Small turns pass through untouched.
        let gentle = Vec2::new(1.0, 0.05);
        assert_eq!(clamp_turn(prev, gentle, 0.1), gentle);
    }

    #[test]
    fn test_normalize_angle_range() {
        use std::f32::consts::PI;
        for angle in [3.0 * PI, -1.5 * PI, 0.25, 7.0, -40.0] {
            let wrapped = normalize_angle(angle);
            assert!((-PI..=PI).contains(&wrapped), "{angle} -> {wrapped}");
            assert!((wrapped.sin() - angle.sin()).abs() < 1e-2, "{angle}");
            assert!((wrapped.cos() - angle.cos()).abs() < 1e-2, "{angle}");
        }
        assert!((normalize_angle(-1.5 * PI) - 0.5 * PI).abs() < 1e-4);
    }

    #[test]
    fn test_normalize_angle_terminates_on_extreme_input() {
        assert!(normalize_angle(f32::NAN).is_nan());
        assert_eq!(normalize_angle(f32::INFINITY), f32::INFINITY);
        assert!(normalize_angle(1.0e30).abs() <= std::f32::consts::PI);
    }
}
