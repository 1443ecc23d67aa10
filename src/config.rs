//! Tuning values for every controller in the core.
//!
//! Defaults reproduce the shipped tank scene. A config can be loaded from
//! JSON; any section or field left out keeps its default.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::bodies::{RingPlane, ShapeKind};
use crate::error::ToyError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GravityConfig {
    /// Constant magnitude of the resolved gravity vector.
    pub magnitude: f32,
    /// Extra tilt about the scene's horizontal axis, in degrees.
    pub tilt_bias_deg: f32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            magnitude: 50.0,
            tilt_bias_deg: 0.0,
        }
    }
}

impl GravityConfig {
    pub fn new(magnitude: f32) -> Self {
        Self {
            magnitude,
            ..Default::default()
        }
    }

    pub fn with_tilt_bias(mut self, degrees: f32) -> Self {
        self.tilt_bias_deg = degrees;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    /// Rig distance from the look-at point when orientation drives the camera.
    pub distance: f32,
    /// Pointer offset to rig offset scale, per axis.
    pub pointer_scale: Vec2,
    /// Rig depth when the pointer drives the camera.
    pub pointer_depth: f32,
    /// Fraction of the remaining distance covered each frame.
    pub lerp_factor: f32,
    pub look_at: Vec3,
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 50.0,
            pointer_scale: Vec2::splat(10.0),
            pointer_depth: 50.0,
            lerp_factor: 0.1,
            look_at: Vec3::ZERO,
            fov_deg: 45.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

impl CameraConfig {
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_lerp_factor(mut self, factor: f32) -> Self {
        self.lerp_factor = factor;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActuatorConfig {
    /// Convergence constant `k` of the follow law.
    pub stiffness: f32,
    /// Delta-time scale applied inside the follow denominator.
    pub time_scale: f32,
    /// Vertical setpoint while the control is held.
    pub raised: f32,
    /// Vertical setpoint while the control is released.
    pub lowered: f32,
    /// Setpoint shift applied by a single nudge.
    pub nudge_step: f32,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            stiffness: 20.0,
            time_scale: 10.0,
            raised: -10.0,
            lowered: -16.0,
            nudge_step: 0.25,
        }
    }
}

impl ActuatorConfig {
    pub fn with_setpoints(mut self, raised: f32, lowered: f32) -> Self {
        self.raised = raised;
        self.lowered = lowered;
        self
    }

    pub fn with_gains(mut self, stiffness: f32, time_scale: f32) -> Self {
        self.stiffness = stiffness;
        self.time_scale = time_scale;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettleConfig {
    /// Speed under which a ring counts as resting.
    pub velocity_threshold: f32,
    /// Simulated seconds a ring must stay slow before the target check.
    pub delay_secs: f32,
    /// Distance from a target within which a resting ring is captured.
    pub capture_radius: f32,
    /// Opacity of rings that are not captured.
    pub base_opacity: f32,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            velocity_threshold: 1.0,
            delay_secs: 0.1,
            capture_radius: 1.0,
            base_opacity: 0.6,
        }
    }
}

impl SettleConfig {
    pub fn with_capture_radius(mut self, radius: f32) -> Self {
        self.capture_radius = radius;
        self
    }

    pub fn with_delay(mut self, secs: f32) -> Self {
        self.delay_secs = secs;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RingShapeConfig {
    /// Primitive placed at every ring segment.
    pub segment: ShapeKind,
    pub plane: RingPlane,
    /// Total mass of the compound ring body.
    pub mass: f32,
}

impl Default for RingShapeConfig {
    fn default() -> Self {
        Self {
            segment: ShapeKind::Sphere { radius: 0.4 },
            plane: RingPlane::Xy,
            mass: 1.0,
        }
    }
}

impl RingShapeConfig {
    pub fn with_segment(mut self, segment: ShapeKind) -> Self {
        self.segment = segment;
        self
    }

    pub fn with_plane(mut self, plane: RingPlane) -> Self {
        self.plane = plane;
        self
    }
}

/// Complete tuning set for a [`crate::WaterToy`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToyConfig {
    pub gravity: GravityConfig,
    pub camera: CameraConfig,
    pub actuator: ActuatorConfig,
    pub settle: SettleConfig,
    pub ring: RingShapeConfig,
}

impl ToyConfig {
    pub fn from_json(json: &str) -> Result<Self, ToyError> {
        let config: ToyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_gravity(mut self, gravity: GravityConfig) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_actuator(mut self, actuator: ActuatorConfig) -> Self {
        self.actuator = actuator;
        self
    }

    pub fn with_settle(mut self, settle: SettleConfig) -> Self {
        self.settle = settle;
        self
    }

    pub fn with_ring(mut self, ring: RingShapeConfig) -> Self {
        self.ring = ring;
        self
    }

    pub fn validate(&self) -> Result<(), ToyError> {
        fn check(ok: bool, msg: &str) -> Result<(), ToyError> {
            if ok {
                Ok(())
            } else {
                Err(ToyError::InvalidConfig(msg.to_string()))
            }
        }

        check(
            self.gravity.magnitude.is_finite() && self.gravity.magnitude > 0.0,
            "gravity magnitude must be positive",
        )?;
        check(
            self.camera.lerp_factor > 0.0 && self.camera.lerp_factor <= 1.0,
            "camera lerp factor must be in (0, 1]",
        )?;
        check(
            self.actuator.stiffness > 0.0 && self.actuator.time_scale > 0.0,
            "actuator stiffness and time scale must be positive",
        )?;
        check(
            self.settle.velocity_threshold >= 0.0
                && self.settle.delay_secs >= 0.0
                && self.settle.capture_radius >= 0.0,
            "settle thresholds must not be negative",
        )?;
        check(
            (0.0..=1.0).contains(&self.settle.base_opacity),
            "base opacity must be in [0, 1]",
        )?;
        check(self.ring.mass > 0.0, "ring mass must be positive")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ToyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ToyConfig::from_json(
            r#"{ "gravity": { "magnitude": 90.0, "tiltBiasDeg": 80.0 }, "actuator": { "timeScale": 100.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.gravity.magnitude, 90.0);
        assert_eq!(config.gravity.tilt_bias_deg, 80.0);
        assert_eq!(config.actuator.time_scale, 100.0);
        assert_eq!(config.actuator.stiffness, 20.0);
        assert_eq!(config.settle, SettleConfig::default());
    }

    #[test]
    fn test_box_segments_from_json() {
        let config = ToyConfig::from_json(
            r#"{ "ring": { "segment": { "type": "box", "halfExtents": [0.5, 0.5, 0.5] }, "plane": "xz" } }"#,
        )
        .unwrap();
        assert_eq!(
            config.ring.segment,
            ShapeKind::Box {
                half_extents: Vec3::splat(0.5)
            }
        );
        assert_eq!(config.ring.plane, RingPlane::Xz);
    }

    #[test]
    fn test_rejects_zero_gravity() {
        let err = ToyConfig::from_json(r#"{ "gravity": { "magnitude": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ToyError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = ToyConfig::from_json("{ gravity: ").unwrap_err();
        assert!(matches!(err, ToyError::Parse(_)));
    }
}
