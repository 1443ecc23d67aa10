//! # tilt-tank
//!
//! Control core of a tilt-driven water ring toy: tip the device (or move the
//! pointer) and gravity inside the tank follows, press the buttons and the
//! pushers on the tank floor blow the rings upward, and any ring that comes
//! to rest on a target turns gold.
//!
//! ## Features
//! - Device-orientation to gravity and camera mapping, with pointer fallback
//! - Compound ring bodies generated from a parametric circle
//! - First-order follow law for kinematic actuators
//! - Settle detection against capture targets
//! - Engine-agnostic [`physics::PhysicsBackend`] seam plus a small reference world
//! - Cross-platform: Native + WASM support
//!
//! ## Example
//! ```rust,ignore
//! use tilt_tank::{Control, DemoScene, PointWorld, ToyConfig, WaterToy};
//!
//! let mut toy = WaterToy::new(ToyConfig::default(), PointWorld::default(), false)?;
//! DemoScene::new(1).build(&mut toy)?;
//!
//! toy.controls_mut().press(Control::Left);
//! let frame = toy.frame(1.0 / 60.0);
//! println!("gravity {:?}, settled {}", frame.gravity, toy.settled_count());
//! ```

pub mod bodies;
pub mod config;
pub mod control;
pub mod dynamics;
pub mod error;
pub mod input;
pub mod math;
pub mod physics;
pub mod scene;
pub mod settle;
pub mod toy;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use bodies::{Color, RingBodyGenerator, RingPlane, RingSpec, TankLayout};
pub use config::{
    ActuatorConfig, CameraConfig, GravityConfig, RingShapeConfig, SettleConfig, ToyConfig,
};
pub use control::{Actuator, ActuatorSpec, CameraFollowController, GravityResolver};
pub use dynamics::{FirstOrderFollow, Interpolatable};
pub use error::ToyError;
pub use input::{Control, Controls, OrientationSample, OrientationSampler, PermissionGate};
pub use math::Transform;
pub use physics::{PhysicsBackend, PointWorld};
pub use scene::DemoScene;
pub use settle::{SettleDetector, SettleState, TargetSet};
pub use toy::{FrameOutput, RingVisual, WaterToy};
