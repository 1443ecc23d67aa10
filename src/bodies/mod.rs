//! Rigid-body descriptions built by the core
//!
//! Ring bodies are generated from a parametric circle; tank colliders and
//! capture targets come from the tank layout. Both are handed to the physics
//! backend once and never mutated afterwards.

mod ring;
mod shape;
mod tank;

pub use ring::{Color, RingBodyGenerator, RingPlane, RingSpec};
pub use shape::{CompoundShapeDescriptor, ShapeDescriptor, ShapeKind};
pub use tank::{TankLayout, TankNode, TANK_MATERIAL};
