use std::f32::consts::FRAC_PI_2;

use glam::{EulerRot, Quat, Vec3};

use crate::config::GravityConfig;
use crate::input::{DeviceOrientation, OrientationSample};

/// Aligns the sensor's flat-on-table reference with the scene's upright one.
fn sensor_correction() -> Quat {
    Quat::from_rotation_x(-FRAC_PI_2)
}

/// Orientation of the device in scene space.
///
/// Intrinsic YXZ from (alpha, beta, -gamma); raw gamma is mirrored relative
/// to the scene's roll direction. The screen rotation is undone about the
/// device's own Z axis.
pub fn sensor_rotation(orientation: DeviceOrientation, screen_angle_deg: f32) -> Quat {
    let device = Quat::from_euler(
        EulerRot::YXZ,
        orientation.alpha.to_radians(),
        orientation.beta.to_radians(),
        -orientation.gamma.to_radians(),
    );
    let screen = Quat::from_rotation_z(-screen_angle_deg.to_radians());
    (device * sensor_correction() * screen).normalize()
}

/// Maps the current orientation sample to the physics engine's gravity vector.
#[derive(Debug, Clone, Copy)]
pub struct GravityResolver {
    config: GravityConfig,
}

impl GravityResolver {
    pub fn new(config: GravityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GravityConfig {
        &self.config
    }

    /// Gravity with no sensor input: straight down.
    pub fn reference(&self) -> Vec3 {
        Vec3::new(0.0, -self.config.magnitude, 0.0)
    }

    pub fn resolve(&self, sample: &OrientationSample) -> Vec3 {
        match *sample {
            OrientationSample::Device {
                orientation,
                screen_angle,
            } => self.resolve_device(orientation, screen_angle),
            OrientationSample::Pointer(_) => self.reference(),
        }
    }

    /// World down as felt by the device, expressed in the scene frame and tilted by the bias.
    pub fn resolve_device(&self, orientation: DeviceOrientation, screen_angle_deg: f32) -> Vec3 {
        let device_from_world = sensor_rotation(orientation, screen_angle_deg).inverse();
        let bias = Quat::from_rotation_x(self.config.tilt_bias_deg.to_radians());
        let rotation = (bias * sensor_correction() * device_from_world).normalize();

        let direction = (rotation * Vec3::NEG_Y).normalize_or_zero();
        if direction == Vec3::ZERO {
            return self.reference();
        }
        direction * self.config.magnitude
    }
}
