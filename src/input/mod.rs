//! Input signals consumed by the controllers
//!
//! Event adapters (winit on native, DOM listeners on the web) write into
//! these caches; the frame loop reads them once per tick without blocking.

pub mod controls;
pub mod orientation;

pub use controls::{Control, Controls};
pub use orientation::{DeviceOrientation, OrientationSample, OrientationSampler, PermissionGate};
