use glam::Vec3;

/// Fixed cubic Bézier path sampled by curve-following position moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Vec3,
    pub control_a: Vec3,
    pub control_b: Vec3,
    pub end: Vec3,
}

impl CubicBezier {
    pub fn new(start: Vec3, control_a: Vec3, control_b: Vec3, end: Vec3) -> Self {
        Self {
            start,
            control_a,
            control_b,
            end,
        }
    }

    /// Point at `t`, clamped to `[0, 1]`.
    pub fn sample(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let inv = 1.0 - t;
        self.start * (inv * inv * inv)
            + self.control_a * (3.0 * inv * inv * t)
            + self.control_b * (3.0 * inv * t * t)
            + self.end * (t * t * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        let curve = CubicBezier::new(Vec3::ZERO, Vec3::Y, Vec3::new(1.0, 1.0, 0.0), Vec3::X);
        assert_eq!(curve.sample(0.0), Vec3::ZERO);
        assert_eq!(curve.sample(1.0), Vec3::X);
        assert_eq!(curve.sample(2.0), Vec3::X);
    }

    #[test]
    fn midpoint_of_a_straight_curve_is_halfway() {
        let curve = CubicBezier::new(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
        );
        let mid = curve.sample(0.5);
        assert!((mid.x - 1.5).abs() < 1e-6, "{mid:?}");
    }
}
