use glam::Vec3;
use std::fmt::Debug;

use super::SurfaceMaterial;

/// Solid that dynamic bodies are pushed out of.
pub trait Obstacle: Debug {
    fn signed_distance(&self, point: Vec3) -> f32;
    fn surface_normal(&self, point: Vec3) -> Vec3;
    fn push_out(&self, point: Vec3, margin: f32) -> Vec3;
    fn center(&self) -> Vec3;
}

#[derive(Debug, Clone, Copy)]
pub struct SphereObstacle {
    pub center: Vec3,
    pub radius: f32,
}

impl SphereObstacle {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Obstacle for SphereObstacle {
    fn signed_distance(&self, point: Vec3) -> f32 {
        (point - self.center).length() - self.radius
    }

    fn surface_normal(&self, point: Vec3) -> Vec3 {
        let dir = (point - self.center).normalize_or_zero();
        if dir == Vec3::ZERO {
            Vec3::Y
        } else {
            dir
        }
    }

    fn push_out(&self, point: Vec3, margin: f32) -> Vec3 {
        self.center + self.surface_normal(point) * (self.radius + margin)
    }

    fn center(&self) -> Vec3 {
        self.center
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AabbObstacle {
    pub min: Vec3,
    pub max: Vec3,
}

impl AabbObstacle {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    fn closest_surface_point(&self, point: Vec3) -> Vec3 {
        if !self.contains_point(point) {
            return point.clamp(self.min, self.max);
        }

        let p = point - self.center();
        let distances = self.half_extents() - p.abs();
        let min_dist = distances.min_element();
        let mut result = point;

        if (distances.x - min_dist).abs() < 0.0001 {
            result.x = if p.x > 0.0 { self.max.x } else { self.min.x };
        } else if (distances.y - min_dist).abs() < 0.0001 {
            result.y = if p.y > 0.0 { self.max.y } else { self.min.y };
        } else {
            result.z = if p.z > 0.0 { self.max.z } else { self.min.z };
        }
        result
    }
}

impl Obstacle for AabbObstacle {
    fn signed_distance(&self, point: Vec3) -> f32 {
        let q = (point - self.center()).abs() - self.half_extents();
        q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
    }

    fn surface_normal(&self, point: Vec3) -> Vec3 {
        let p = (point - self.center()) / self.half_extents().max(Vec3::splat(0.0001));

        let abs_p = p.abs();
        if abs_p.x > abs_p.y && abs_p.x > abs_p.z {
            Vec3::X * p.x.signum()
        } else if abs_p.y > abs_p.z {
            Vec3::Y * p.y.signum()
        } else {
            Vec3::Z * p.z.signum()
        }
    }

    fn push_out(&self, point: Vec3, margin: f32) -> Vec3 {
        let surface_pt = self.closest_surface_point(point);
        if self.contains_point(point) {
            return surface_pt + self.surface_normal(surface_pt) * margin;
        }
        let outward = (point - surface_pt).normalize_or_zero();
        if outward == Vec3::ZERO {
            surface_pt + self.surface_normal(surface_pt) * margin
        } else {
            surface_pt + outward * margin
        }
    }

    fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Result of resolving one sphere against an [`ObstacleSet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub position: Vec3,
    pub velocity: Vec3,
    pub touched: bool,
}

#[derive(Debug)]
struct Entry {
    shape: Box<dyn Obstacle>,
    velocity: Vec3,
    material: SurfaceMaterial,
}

/// Static and kinematic solids rebuilt by the backend before every step.
#[derive(Debug, Default)]
pub struct ObstacleSet {
    entries: Vec<Entry>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a solid moving at `velocity`; contact response is measured relative to it.
    pub fn add<T: Obstacle + 'static>(&mut self, obstacle: T, velocity: Vec3, material: SurfaceMaterial) {
        self.entries.push(Entry {
            shape: Box::new(obstacle),
            velocity,
            material,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pushes a sphere of `radius` at `position` out of every solid it overlaps.
    ///
    /// The velocity component into each touched surface is reflected by the
    /// surface restitution and the tangential part is scaled down by its friction.
    pub fn resolve_sphere(&self, position: Vec3, velocity: Vec3, radius: f32) -> Contact {
        let mut result = Contact {
            position,
            velocity,
            touched: false,
        };

        for _ in 0..4 {
            let mut pushed = false;
            for entry in &self.entries {
                if entry.shape.signed_distance(result.position) >= radius {
                    continue;
                }

                let moved = entry.shape.push_out(result.position, radius);
                let normal = (moved - result.position).normalize_or_zero();
                result.position = moved;
                pushed = true;
                result.touched = true;

                if normal == Vec3::ZERO {
                    continue;
                }

                let relative = result.velocity - entry.velocity;
                let into = relative.dot(normal);
                if into < 0.0 {
                    let normal_part = normal * into;
                    let tangent = relative - normal_part;
                    let response = tangent * (1.0 - entry.material.friction).clamp(0.0, 1.0)
                        - normal_part * entry.material.restitution;
                    result.velocity = entry.velocity + response;
                }
            }
            if !pushed {
                break;
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bouncy() -> SurfaceMaterial {
        SurfaceMaterial {
            friction: 0.0,
            restitution: 0.5,
        }
    }

    #[test]
    fn test_sphere_push_out_reaches_margin() {
        let s = SphereObstacle::new(Vec3::ZERO, 1.0);
        let p = s.push_out(Vec3::new(0.5, 0.0, 0.0), 0.25);
        assert!((p - Vec3::new(1.25, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_aabb_signed_distance_inside_and_out() {
        let b = AabbObstacle::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        assert!((b.signed_distance(Vec3::new(3.0, 0.0, 0.0)) - 2.0).abs() < 1e-5);
        assert!((b.signed_distance(Vec3::new(0.5, 0.0, 0.0)) + 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_aabb_push_out_from_inside_uses_nearest_face() {
        let b = AabbObstacle::from_center_half_extents(Vec3::ZERO, Vec3::new(5.0, 1.0, 5.0));
        let p = b.push_out(Vec3::new(0.0, 0.8, 0.0), 0.5);
        assert!((p - Vec3::new(0.0, 1.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_resting_sphere_on_floor_bounces_with_restitution() {
        let mut set = ObstacleSet::new();
        set.add(
            AabbObstacle::new(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 0.0, 10.0)),
            Vec3::ZERO,
            bouncy(),
        );

        let contact = set.resolve_sphere(Vec3::new(0.0, 0.2, 0.0), Vec3::new(1.0, -4.0, 0.0), 0.5);
        assert!(contact.touched);
        assert!((contact.position.y - 0.5).abs() < 1e-5);
        assert!((contact.velocity - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_separating_sphere_keeps_velocity() {
        let mut set = ObstacleSet::new();
        set.add(SphereObstacle::new(Vec3::ZERO, 1.0), Vec3::ZERO, bouncy());

        let contact = set.resolve_sphere(Vec3::new(1.2, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), 0.5);
        assert!(contact.touched);
        assert_eq!(contact.velocity, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_moving_obstacle_carries_sphere() {
        let mut set = ObstacleSet::new();
        set.add(
            AabbObstacle::from_center_half_extents(Vec3::ZERO, Vec3::splat(5.0)),
            Vec3::new(0.0, 2.0, 0.0),
            SurfaceMaterial {
                friction: 0.0,
                restitution: 0.0,
            },
        );

        let contact = set.resolve_sphere(Vec3::new(0.0, 5.1, 0.0), Vec3::ZERO, 0.5);
        assert!((contact.velocity.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_far_sphere_untouched() {
        let mut set = ObstacleSet::new();
        set.add(SphereObstacle::new(Vec3::ZERO, 1.0), Vec3::ZERO, bouncy());
        let contact = set.resolve_sphere(Vec3::new(10.0, 0.0, 0.0), Vec3::X, 0.5);
        assert!(!contact.touched);
        assert_eq!(contact.position, Vec3::new(10.0, 0.0, 0.0));
    }
}
