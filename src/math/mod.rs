//! Math utilities module
//!
//! Re-exports the glam types used across the core, plus transform and Euler helpers.

mod transform;

pub use transform::{euler_to_quat, Transform};

// Re-export commonly used glam types
pub use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
