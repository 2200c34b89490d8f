use glam::{Quat, Vec3};

pub trait Interpolate: Copy {
    fn interpolate(left: Self, right: Self, n: f32) -> Self;
}

impl Interpolate for f32 {
    #[inline]
    fn interpolate(left: Self, right: Self, n: f32) -> Self {
        left + (right - left) * n
    }
}

impl Interpolate for Vec3 {
    #[inline]
    fn interpolate(left: Self, right: Self, n: f32) -> Self {
        left.lerp(right, n)
    }
}

impl Interpolate for Quat {
    #[inline]
    fn interpolate(left: Self, right: Self, n: f32) -> Self {
        // Stay in the neighborhood of `left` so the slerp takes the
        // shortest arc.
        let right = if left.dot(right) < 0.0 { -right } else { right };
        left.slerp(right, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quat_hemisphere_flip_takes_shortest_arc() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let b_flipped = Quat::from_xyzw(-b.x, -b.y, -b.z, -b.w);

        let mid = Quat::interpolate(a, b_flipped, 0.5);
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(mid.dot(expected).abs() > 1.0 - 1e-4);
    }

    #[test]
    fn quat_sweep_has_no_sign_flip() {
        let a = Quat::from_rotation_z(0.1);
        let b = Quat::from_xyzw(-0.0, -0.0, -0.6, -0.8).normalize();

        let mut prev = Quat::interpolate(a, b, 0.0);
        for step in 1..=100 {
            let n = step as f32 / 100.0;
            let q = Quat::interpolate(a, b, n);
            // A discontinuity would show up as a near-negative dot between
            // successive samples.
            assert!(prev.dot(q) > 0.9, "flip at n={n}");
            prev = q;
        }
    }
}
