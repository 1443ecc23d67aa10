//! Physics engine seam
//!
//! The control core talks to a rigid-body engine only through
//! [`PhysicsBackend`]: it hands over body descriptions once, sends gravity and
//! kinematic position commands, and polls body state after every step.
//! [`PointWorld`] is a small backend that is good enough to drive the toy
//! and its tests without a full engine.

mod obstacle;
mod world;

use glam::{Quat, Vec3};

use crate::bodies::CompoundShapeDescriptor;

pub use obstacle::{AabbObstacle, Contact, Obstacle, ObstacleSet, SphereObstacle};
pub use world::{PointWorld, PointWorldConfig};

/// Reference to a body owned by a backend.
///
/// Backends may reuse a freed index; the generation tells a stale handle
/// apart from the body that took its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    /// Moved by the solver; responds to gravity and contacts.
    Dynamic { mass: f32 },
    /// Zero mass, moved only by position commands; pushes dynamic bodies.
    Kinematic,
    /// Never moves.
    Static,
}

/// Contact response coefficients of a body's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            friction: 0.3,
            restitution: 0.0,
        }
    }
}

/// Everything a backend needs to construct a body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    pub rotation: Vec3,
    pub shapes: CompoundShapeDescriptor,
    pub material: SurfaceMaterial,
}

/// Live state of a body after the latest step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
}

pub trait PhysicsBackend {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle;
    /// Returns `false` when the handle was already gone.
    fn remove_body(&mut self, handle: BodyHandle) -> bool;
    fn set_gravity(&mut self, gravity: Vec3);
    fn gravity(&self) -> Vec3;
    /// Position command; meaningful for kinematic bodies.
    fn set_position(&mut self, handle: BodyHandle, position: Vec3);
    fn body_state(&self, handle: BodyHandle) -> Option<BodyState>;
    fn step(&mut self, dt: f32);
}
