use glam::{Mat4, Vec3};

use super::gravity::sensor_rotation;
use crate::config::CameraConfig;
use crate::input::OrientationSample;
use crate::math::Transform;

pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 50.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, config.pointer_depth),
            target: config.look_at,
            fov: config.fov_deg.to_radians(),
            near: config.near,
            far: config.far,
            ..Default::default()
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Rig transform for the renderer, aimed at the look-at point.
    pub fn transform(&self) -> Transform {
        Transform::look_at(self.position, self.target, self.up)
    }
}

/// Eases the camera rig toward the position implied by the current sample.
///
/// Orientation input orbits the rig around the look-at point at a fixed
/// distance; pointer input slides it across a plane at a fixed depth.
pub struct CameraFollowController {
    config: CameraConfig,
    position: Vec3,
    up: Vec3,
}

impl CameraFollowController {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, config.pointer_depth),
            up: Vec3::Y,
            config,
        }
    }

    /// Where the rig would sit if it followed the sample instantly, with its up vector.
    pub fn desired(&self, sample: &OrientationSample) -> (Vec3, Vec3) {
        match *sample {
            OrientationSample::Device {
                orientation,
                screen_angle,
            } => {
                let rotation = sensor_rotation(orientation, screen_angle);
                (
                    self.config.look_at + rotation * Vec3::Z * self.config.distance,
                    rotation * Vec3::Y,
                )
            }
            OrientationSample::Pointer(offset) => (
                Vec3::new(
                    offset.x * self.config.pointer_scale.x,
                    offset.y * self.config.pointer_scale.y,
                    self.config.pointer_depth,
                ),
                Vec3::Y,
            ),
        }
    }

    /// Moves the rig a fixed fraction of the way toward the desired pose. Called once per frame.
    pub fn update(&mut self, sample: &OrientationSample) -> Vec3 {
        let (desired, desired_up) = self.desired(sample);
        let t = self.config.lerp_factor;
        self.position = self.position.lerp(desired, t);

        let up = self.up.lerp(desired_up, t).normalize_or_zero();
        if up != Vec3::ZERO {
            self.up = up;
        }
        self.position
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn reset(&mut self) {
        self.position = Vec3::new(0.0, 0.0, self.config.pointer_depth);
        self.up = Vec3::Y;
    }

    pub fn update_camera(&self, camera: &mut Camera) {
        camera.position = self.position;
        camera.target = self.config.look_at;
        camera.up = self.up;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::DeviceOrientation;
    use glam::Vec2;

    #[test]
    fn test_pointer_target() {
        let controller = CameraFollowController::new(CameraConfig::default());
        let (desired, up) = controller.desired(&OrientationSample::Pointer(Vec2::new(0.5, -1.0)));
        assert_eq!(desired, Vec3::new(5.0, -10.0, 50.0));
        assert_eq!(up, Vec3::Y);
    }

    #[test]
    fn test_rig_eases_toward_target() {
        let mut controller = CameraFollowController::new(CameraConfig::default().with_lerp_factor(0.1));
        let sample = OrientationSample::Pointer(Vec2::new(1.0, 0.0));

        let first = controller.update(&sample);
        assert!((first.x - 1.0).abs() < 1e-5);

        let mut previous = first.x;
        for _ in 0..100 {
            let x = controller.update(&sample).x;
            assert!(x > previous && x <= 10.0);
            previous = x;
        }
        assert!((previous - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_upright_device_puts_rig_in_front() {
        let controller = CameraFollowController::new(CameraConfig::default().with_distance(50.0));
        let sample = OrientationSample::Device {
            orientation: DeviceOrientation::new(0.0, 90.0, 0.0),
            screen_angle: 0.0,
        };
        let (desired, up) = controller.desired(&sample);
        assert!((desired - Vec3::new(0.0, 0.0, 50.0)).length() < 1e-3);
        assert!((up - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn test_flat_device_looks_down_from_above() {
        let controller = CameraFollowController::new(CameraConfig::default());
        let sample = OrientationSample::Device {
            orientation: DeviceOrientation::default(),
            screen_angle: 0.0,
        };
        let (desired, up) = controller.desired(&sample);
        assert!((desired - Vec3::new(0.0, 50.0, 0.0)).length() < 1e-3);
        assert!((up - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_camera_aims_at_look_at_point() {
        let mut controller = CameraFollowController::new(CameraConfig::default());
        let mut camera = Camera::from_config(&CameraConfig::default());
        controller.update(&OrientationSample::Pointer(Vec2::new(-1.0, 1.0)));
        controller.update_camera(&mut camera);

        let transform = camera.transform();
        let expected = (Vec3::ZERO - camera.position).normalize();
        assert!((transform.forward() - expected).length() < 1e-4);
        assert_eq!(camera.target, Vec3::ZERO);
    }
}
