//! Controllers run once per tick or frame
//!
//! Gravity and the camera both derive from the same sensor rotation; the
//! actuator controller follows the control latches.

pub mod actuator;
pub mod camera;
pub mod gravity;

pub use actuator::{Actuator, ActuatorSpec};
pub use camera::{Camera, CameraFollowController};
pub use gravity::{sensor_rotation, GravityResolver};
