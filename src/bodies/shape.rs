use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::euler_to_quat;

/// Primitive making up one piece of a compound body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShapeKind {
    Sphere {
        radius: f32,
    },
    Box {
        #[serde(rename = "halfExtents")]
        half_extents: Vec3,
    },
}

impl ShapeKind {
    /// Radius of the smallest sphere around the shape's own origin that contains it.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            ShapeKind::Sphere { radius } => *radius,
            ShapeKind::Box { half_extents } => half_extents.length(),
        }
    }
}

/// One sub-shape placed in its body's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDescriptor {
    pub kind: ShapeKind,
    pub local_position: Vec3,
    /// XYZ Euler angles in radians.
    pub local_rotation: Vec3,
}

impl ShapeDescriptor {
    pub fn new(kind: ShapeKind, local_position: Vec3, local_rotation: Vec3) -> Self {
        Self {
            kind,
            local_position,
            local_rotation,
        }
    }

    pub fn at_origin(kind: ShapeKind) -> Self {
        Self::new(kind, Vec3::ZERO, Vec3::ZERO)
    }

    /// Furthest extent of this shape from the body origin.
    pub fn reach(&self) -> f32 {
        self.local_position.length() + self.kind.bounding_radius()
    }
}

/// Ordered list of sub-shapes forming a single rigid body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundShapeDescriptor {
    shapes: Vec<ShapeDescriptor>,
}

impl CompoundShapeDescriptor {
    pub fn new(shapes: Vec<ShapeDescriptor>) -> Self {
        Self { shapes }
    }

    pub fn single(kind: ShapeKind) -> Self {
        Self::new(vec![ShapeDescriptor::at_origin(kind)])
    }

    pub fn shapes(&self) -> &[ShapeDescriptor] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn bounding_radius(&self) -> f32 {
        self.shapes.iter().map(ShapeDescriptor::reach).fold(0.0, f32::max)
    }

    /// Extents of the axis-aligned box around every sub-shape, ignoring rotation of boxes.
    pub fn half_extents(&self) -> Vec3 {
        self.shapes
            .iter()
            .map(|s| {
                let own = match s.kind {
                    ShapeKind::Sphere { radius } => Vec3::splat(radius),
                    ShapeKind::Box { half_extents } => {
                        let rot = euler_to_quat(s.local_rotation);
                        let axes = [rot * Vec3::X, rot * Vec3::Y, rot * Vec3::Z];
                        axes[0].abs() * half_extents.x
                            + axes[1].abs() * half_extents.y
                            + axes[2].abs() * half_extents.z
                    }
                };
                s.local_position.abs() + own
            })
            .fold(Vec3::ZERO, Vec3::max)
    }
}
