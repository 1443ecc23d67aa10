use glam::Vec3;

use crate::bodies::{CompoundShapeDescriptor, ShapeKind};
use crate::config::ActuatorConfig;
use crate::dynamics::FirstOrderFollow;
use crate::input::Control;
use crate::physics::{BodyDesc, BodyKind, SurfaceMaterial};

/// Where an actuator sits and which control drives it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorSpec {
    pub control: Control,
    pub position: Vec3,
    pub half_extents: Vec3,
}

impl ActuatorSpec {
    /// Pusher block whose top sits 4 units above `position`.
    pub fn new(control: Control, position: Vec3) -> Self {
        Self {
            control,
            position,
            half_extents: Vec3::new(1.5, 4.0, 2.0),
        }
    }

    pub fn with_half_extents(mut self, half_extents: Vec3) -> Self {
        self.half_extents = half_extents;
        self
    }

    /// Zero-mass box body, moved only by position commands.
    pub fn body_desc(&self) -> BodyDesc {
        BodyDesc {
            kind: BodyKind::Kinematic,
            position: self.position,
            rotation: Vec3::ZERO,
            shapes: CompoundShapeDescriptor::single(ShapeKind::Box {
                half_extents: self.half_extents,
            }),
            material: SurfaceMaterial::default(),
        }
    }
}

/// Kinematic pusher that eases its height toward a raised or lowered setpoint.
///
/// Only the vertical axis moves; x and z stay where the actuator was placed.
#[derive(Debug, Clone, Copy)]
pub struct Actuator {
    control: Control,
    base: Vec3,
    height: FirstOrderFollow<f32>,
    raised: f32,
    lowered: f32,
    up: bool,
}

impl Actuator {
    pub fn new(spec: &ActuatorSpec, config: &ActuatorConfig) -> Self {
        Self {
            control: spec.control,
            base: spec.position,
            height: FirstOrderFollow::new(config.stiffness, config.time_scale, spec.position.y),
            raised: config.raised,
            lowered: config.lowered,
            up: false,
        }
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn is_up(&self) -> bool {
        self.up
    }

    pub fn setpoint(&self) -> f32 {
        if self.up {
            self.raised
        } else {
            self.lowered
        }
    }

    pub fn setpoints(&self) -> (f32, f32) {
        (self.raised, self.lowered)
    }

    pub fn target_position(&self) -> Vec3 {
        Vec3::new(self.base.x, self.setpoint(), self.base.z)
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.base.x, self.height.current(), self.base.z)
    }

    /// Shifts both setpoints, e.g. one arrow-key step.
    pub fn nudge(&mut self, delta: f32) {
        self.raised += delta;
        self.lowered += delta;
    }

    /// Advances one physics tick and returns the position to command.
    pub fn update(&mut self, up: bool, dt: f32) -> Vec3 {
        if up != self.up {
            log::debug!("actuator {:?} {}", self.control, if up { "raised" } else { "lowered" });
        }
        self.up = up;
        self.height.update(self.setpoint(), dt);
        self.position()
    }

    pub fn reset(&mut self) {
        self.height.reset(self.base.y);
        self.up = false;
    }
}
