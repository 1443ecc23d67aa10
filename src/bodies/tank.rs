use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::shape::{CompoundShapeDescriptor, ShapeKind};
use crate::error::ToyError;
use crate::physics::{BodyDesc, BodyKind, SurfaceMaterial};
use crate::settle::TargetSet;

/// Glass is slippery and a little bouncy.
pub const TANK_MATERIAL: SurfaceMaterial = SurfaceMaterial {
    friction: 0.01,
    restitution: 0.2,
};

/// One invisible box collider of the tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TankNode {
    #[serde(default)]
    pub name: String,
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    #[serde(default)]
    pub rotation: Vec3,
    /// Half extents of the box.
    pub scale: Vec3,
}

impl TankNode {
    pub fn new(name: &str, position: Vec3, scale: Vec3) -> Self {
        Self {
            name: name.to_string(),
            position,
            rotation: Vec3::ZERO,
            scale,
        }
    }

    pub fn body_desc(&self) -> BodyDesc {
        BodyDesc {
            kind: BodyKind::Static,
            position: self.position,
            rotation: self.rotation,
            shapes: CompoundShapeDescriptor::single(ShapeKind::Box {
                half_extents: self.scale,
            }),
            material: TANK_MATERIAL,
        }
    }
}

/// Static colliders plus the capture targets of a tank scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankLayout {
    pub colliders: Vec<TankNode>,
    #[serde(default)]
    pub targets: TargetSet,
}

impl Default for TankLayout {
    /// Open-top tank, 20 wide and 4 deep, with a target resting spot near
    /// each side wall. The middle of the floor is left to the pushers.
    fn default() -> Self {
        let wall = Vec3::new(1.0, 16.0, 3.0);
        let pane = Vec3::new(12.0, 16.0, 1.0);
        Self {
            colliders: vec![
                TankNode::new("floor", Vec3::new(0.0, -13.0, 0.0), Vec3::new(12.0, 1.0, 3.0)),
                TankNode::new("left", Vec3::new(-11.0, -5.0, 0.0), wall),
                TankNode::new("right", Vec3::new(11.0, -5.0, 0.0), wall),
                TankNode::new("back", Vec3::new(0.0, -5.0, -3.0), pane),
                TankNode::new("front", Vec3::new(0.0, -5.0, 3.0), pane),
            ],
            targets: TargetSet::new(vec![Vec3::new(-6.5, -10.6, 0.0), Vec3::new(6.5, -10.6, 0.0)]),
        }
    }
}

impl TankLayout {
    pub fn new(colliders: Vec<TankNode>, targets: TargetSet) -> Self {
        Self { colliders, targets }
    }

    pub fn from_json(json: &str) -> Result<Self, ToyError> {
        let layout: TankLayout = serde_json::from_str(json)?;
        if let Some(node) = layout.colliders.iter().find(|n| n.scale.min_element() <= 0.0) {
            return Err(ToyError::InvalidConfig(format!(
                "tank collider '{}' has non-positive scale {:?}",
                node.name, node.scale
            )));
        }
        Ok(layout)
    }

    pub fn collider_descs(&self) -> Vec<BodyDesc> {
        self.colliders.iter().map(TankNode::body_desc).collect()
    }

    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }
}
