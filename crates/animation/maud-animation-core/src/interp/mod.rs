//! Interpolation and rotation helpers.
//!
//! Values are kept as raw component arrays (`[x, y, z]`, `[x, y, z, w]`) so the
//! data model stays serde-friendly; rotation composition goes through
//! `nalgebra` at the edges.

pub mod functions;

pub use functions::{
    is_unit_quat, lerp_f32, lerp_vec3, mul_vec3, nlerp_quat, quat_inverse, quat_mul, quat_norm,
    IDENTITY_QUAT,
};
