use glam::{EulerRot, Mat4, Quat, Vec3};

/// Converts an XYZ Euler triple in radians (the scene-description convention) into a quaternion.
pub fn euler_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
}

/// Position and orientation handed to the renderer for a camera rig, ring or actuator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    pub fn from_position_euler(position: Vec3, euler: Vec3) -> Self {
        Self::from_position_rotation(position, euler_to_quat(euler))
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * (point * self.scale) + self.position
    }

    /// Builds a transform at `position` whose forward axis (-Z) points at `target`.
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - position).normalize_or_zero();
        let right = forward.cross(up).normalize_or_zero();
        if forward == Vec3::ZERO || right == Vec3::ZERO {
            return Self::from_position(position);
        }
        let corrected_up = right.cross(forward);

        Self {
            position,
            rotation: Quat::from_mat4(&Mat4::from_cols(
                right.extend(0.0),
                corrected_up.extend(0.0),
                (-forward).extend(0.0),
                Vec3::ZERO.extend(1.0),
            )),
            scale: Vec3::ONE,
        }
    }
}
