//! Interpolation helpers:
//! - linear interpolation of scalars and vectors
//! - quaternion NLERP with shortest-arc correction
//! - quaternion product / inverse via `nalgebra`

use nalgebra::{Quaternion, UnitQuaternion};

/// Identity rotation as `[x, y, z, w]`.
pub const IDENTITY_QUAT: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

/// Component-wise product, used to combine scales.
#[inline]
pub fn mul_vec3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2]]
}

#[inline]
fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
fn normalize4(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        q[0] *= inv_len;
        q[1] *= inv_len;
        q[2] *= inv_len;
        q[3] *= inv_len;
    }
    q
}

#[inline]
pub fn quat_norm(q: [f32; 4]) -> f32 {
    dot4(q, q).sqrt()
}

/// True when `q` is within `tolerance` of unit length.
#[inline]
pub fn is_unit_quat(q: [f32; 4], tolerance: f32) -> bool {
    let n = quat_norm(q);
    n.is_finite() && (n - 1.0).abs() <= tolerance
}

/// Quaternion NLERP with shortest-arc correction.
/// If dot < 0, negate the second quaternion to ensure the shortest path.
/// Returns a normalized quaternion (x,y,z,w).
#[inline]
pub fn nlerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    if dot4(a, b) < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
    }
    let q = [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ];
    normalize4(q)
}

#[inline]
fn to_unit(q: [f32; 4]) -> UnitQuaternion<f32> {
    UnitQuaternion::new_normalize(Quaternion::new(q[3], q[0], q[1], q[2]))
}

#[inline]
fn from_unit(q: &UnitQuaternion<f32>) -> [f32; 4] {
    [q.i, q.j, q.k, q.w]
}

/// Rotation composition `a × b` (apply `b` first, then `a`).
pub fn quat_mul(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    from_unit(&(to_unit(a) * to_unit(b)))
}

/// Inverse rotation of `q`.
pub fn quat_inverse(q: [f32; 4]) -> [f32; 4] {
    from_unit(&to_unit(q).inverse())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx4(a: [f32; 4], b: [f32; 4]) {
        for i in 0..4 {
            assert!((a[i] - b[i]).abs() <= 1e-5, "left={a:?} right={b:?}");
        }
    }

    #[test]
    fn nlerp_takes_shortest_arc() {
        let a = IDENTITY_QUAT;
        let b = [0.0, 0.0, 0.0, -1.0];
        approx4(nlerp_quat(a, b, 0.5), IDENTITY_QUAT);
    }

    #[test]
    fn mul_by_inverse_is_identity() {
        let h = std::f32::consts::FRAC_1_SQRT_2;
        let q = [0.0, h, 0.0, h];
        approx4(quat_mul(q, quat_inverse(q)), IDENTITY_QUAT);
        approx4(quat_inverse(q), [0.0, -h, 0.0, h]);
    }

    #[test]
    fn mul_composes_right_to_left() {
        // 90 degrees about Z twice is 180 degrees about Z.
        let h = std::f32::consts::FRAC_1_SQRT_2;
        let z90 = [0.0, 0.0, h, h];
        approx4(quat_mul(z90, z90), [0.0, 0.0, 1.0, 0.0]);
    }
}
