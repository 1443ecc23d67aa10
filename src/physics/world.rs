use glam::{Quat, Vec3};

use super::obstacle::{AabbObstacle, ObstacleSet, SphereObstacle};
use super::{BodyDesc, BodyHandle, BodyKind, BodyState, PhysicsBackend, SurfaceMaterial};
use crate::bodies::ShapeKind;
use crate::math::{euler_to_quat, Transform};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointWorldConfig {
    /// Linear drag per second applied to dynamic bodies (the water).
    pub linear_damping: f32,
    /// Largest step integrated at once; longer steps are split.
    pub max_substep: f32,
    pub ring_restitution: f32,
}

impl Default for PointWorldConfig {
    fn default() -> Self {
        Self {
            linear_damping: 1.5,
            max_substep: 1.0 / 60.0,
            ring_restitution: 0.2,
        }
    }
}

impl PointWorldConfig {
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }
}

#[derive(Debug)]
struct Body {
    desc: BodyDesc,
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    /// Kinematic position at the start of the current step.
    previous_position: Vec3,
    radius: f32,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Reference backend that treats each dynamic body as its bounding sphere.
///
/// Static and kinematic shapes collide as axis-aligned boxes or spheres;
/// box rotation is folded into the box's axis-aligned extents. Rotation of
/// dynamic bodies is carried but not integrated.
#[derive(Debug)]
pub struct PointWorld {
    config: PointWorldConfig,
    gravity: Vec3,
    slots: Vec<Slot>,
    free: Vec<u32>,
    obstacles: ObstacleSet,
}

impl Default for PointWorld {
    fn default() -> Self {
        Self::new(PointWorldConfig::default())
    }
}

impl PointWorld {
    pub fn new(config: PointWorldConfig) -> Self {
        Self {
            config,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            slots: Vec::new(),
            free: Vec::new(),
            obstacles: ObstacleSet::new(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies().count()
    }

    /// Live plus free slots; stays at the high-water mark of live bodies.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, handle: BodyHandle) -> Option<&Slot> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
    }

    fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.slot(handle).and_then(|s| s.body.as_ref())
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.body.as_mut())
    }

    fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.slots.iter().filter_map(|s| s.body.as_ref())
    }

    fn bodies_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.slots.iter_mut().filter_map(|s| s.body.as_mut())
    }

    fn rebuild_obstacles(&mut self, dt: f32) {
        self.obstacles.clear();
        for body in self.slots.iter().filter_map(|s| s.body.as_ref()) {
            let velocity = match body.desc.kind {
                BodyKind::Dynamic { .. } => continue,
                BodyKind::Static => Vec3::ZERO,
                BodyKind::Kinematic if dt > 0.0 => (body.position - body.previous_position) / dt,
                BodyKind::Kinematic => Vec3::ZERO,
            };

            let transform = Transform::from_position_rotation(body.position, body.rotation);
            for shape in body.desc.shapes.shapes() {
                let center = transform.transform_point(shape.local_position);
                match shape.kind {
                    ShapeKind::Sphere { radius } => {
                        self.obstacles
                            .add(SphereObstacle::new(center, radius), velocity, body.desc.material)
                    }
                    ShapeKind::Box { half_extents } => {
                        let rotation = body.rotation * euler_to_quat(shape.local_rotation);
                        let extents = (rotation * Vec3::X).abs() * half_extents.x
                            + (rotation * Vec3::Y).abs() * half_extents.y
                            + (rotation * Vec3::Z).abs() * half_extents.z;
                        self.obstacles.add(
                            AabbObstacle::from_center_half_extents(center, extents),
                            velocity,
                            body.desc.material,
                        )
                    }
                }
            }
        }
    }

    fn integrate(&mut self, dt: f32) {
        let drag = 1.0 / (1.0 + self.config.linear_damping * dt);
        let gravity = self.gravity;
        let obstacles = &self.obstacles;

        for body in self.slots.iter_mut().filter_map(|s| s.body.as_mut()) {
            if !matches!(body.desc.kind, BodyKind::Dynamic { .. }) {
                continue;
            }
            body.velocity = (body.velocity + gravity * dt) * drag;
            body.position += body.velocity * dt;

            let contact = obstacles.resolve_sphere(body.position, body.velocity, body.radius);
            body.position = contact.position;
            body.velocity = contact.velocity;
        }
    }

    fn separate_dynamic_pairs(&mut self) {
        let restitution = self.config.ring_restitution;
        let n = self.slots.len();

        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.slots.split_at_mut(j);
                let (Some(a), Some(b)) = (head[i].body.as_mut(), tail[0].body.as_mut()) else {
                    continue;
                };
                let (BodyKind::Dynamic { mass: ma }, BodyKind::Dynamic { mass: mb }) =
                    (a.desc.kind, b.desc.kind)
                else {
                    continue;
                };

                let offset = b.position - a.position;
                let distance = offset.length();
                let overlap = a.radius + b.radius - distance;
                if overlap <= 0.0 {
                    continue;
                }

                let normal = if distance > 0.0001 { offset / distance } else { Vec3::Y };
                let total = (ma + mb).max(f32::EPSILON);
                a.position -= normal * overlap * (mb / total);
                b.position += normal * overlap * (ma / total);

                let closing = (b.velocity - a.velocity).dot(normal);
                if closing < 0.0 {
                    let impulse = -(1.0 + restitution) * closing / (1.0 / ma + 1.0 / mb);
                    a.velocity -= normal * impulse / ma;
                    b.velocity += normal * impulse / mb;
                }
            }
        }
    }

    fn substep(&mut self, dt: f32) {
        self.rebuild_obstacles(dt);
        self.integrate(dt);
        self.separate_dynamic_pairs();
        for body in self.bodies_mut() {
            body.previous_position = body.position;
        }
    }
}

impl PhysicsBackend for PointWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let handle = BodyHandle {
            index,
            generation: slot.generation,
        };

        let radius = desc.shapes.bounding_radius();
        log::trace!("create body {:?} ({:?}, radius {:.2})", handle, desc.kind, radius);
        slot.body = Some(Body {
            position: desc.position,
            previous_position: desc.position,
            rotation: euler_to_quat(desc.rotation),
            velocity: Vec3::ZERO,
            radius,
            desc,
        });
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let Some(slot) = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation && s.body.is_some())
        else {
            return false;
        };
        slot.body = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        true
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec3) {
        if let Some(body) = self.body_mut(handle) {
            body.position = position;
        }
    }

    fn body_state(&self, handle: BodyHandle) -> Option<BodyState> {
        self.body(handle).map(|b| BodyState {
                position: b.position,
                rotation: b.rotation,
                velocity: b.velocity,
            })
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let max = self.config.max_substep.max(0.0001);
        let count = (dt / max).ceil().max(1.0) as u32;
        let h = dt / count as f32;

        // Kinematic bodies sweep from their last stepped position to the commanded one.
        let sweeps: Vec<Option<(Vec3, Vec3)>> = self
            .slots
            .iter()
            .map(|s| match &s.body {
                Some(body) if body.desc.kind == BodyKind::Kinematic => {
                    Some((body.previous_position, body.position))
                }
                _ => None,
            })
            .collect();

        for i in 1..=count {
            let t = i as f32 / count as f32;
            for (slot, sweep) in self.slots.iter_mut().zip(&sweeps) {
                if let (Some(body), Some((from, to))) = (slot.body.as_mut(), sweep) {
                    body.position = from.lerp(*to, t);
                }
            }
            self.substep(h);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::CompoundShapeDescriptor;

    fn slick() -> SurfaceMaterial {
        SurfaceMaterial {
            friction: 0.0,
            restitution: 0.0,
        }
    }

    fn ball(position: Vec3) -> BodyDesc {
        BodyDesc {
            kind: BodyKind::Dynamic { mass: 1.0 },
            position,
            rotation: Vec3::ZERO,
            shapes: CompoundShapeDescriptor::single(ShapeKind::Sphere { radius: 0.5 }),
            material: SurfaceMaterial::default(),
        }
    }

    fn floor() -> BodyDesc {
        BodyDesc {
            kind: BodyKind::Static,
            position: Vec3::new(0.0, -1.0, 0.0),
            rotation: Vec3::ZERO,
            shapes: CompoundShapeDescriptor::single(ShapeKind::Box {
                half_extents: Vec3::new(20.0, 1.0, 20.0),
            }),
            material: slick(),
        }
    }

    #[test]
    fn test_free_fall_follows_gravity() {
        let mut world = PointWorld::new(PointWorldConfig::default().with_damping(0.0));
        world.set_gravity(Vec3::new(0.0, -10.0, 0.0));
        let h = world.create_body(ball(Vec3::new(0.0, 100.0, 0.0)));

        world.step(1.0);
        let state = world.body_state(h).unwrap();
        assert!((state.velocity.y + 10.0).abs() < 1e-3);
        assert!(state.position.y < 95.5 && state.position.y > 94.0);
    }

    #[test]
    fn test_body_comes_to_rest_on_floor() {
        let mut world = PointWorld::new(PointWorldConfig::default());
        world.set_gravity(Vec3::new(0.0, -10.0, 0.0));
        world.create_body(floor());
        let h = world.create_body(ball(Vec3::new(0.0, 3.0, 0.0)));

        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        let state = world.body_state(h).unwrap();
        assert!((state.position.y - 0.5).abs() < 0.05, "y = {}", state.position.y);
        assert!(state.velocity.length() < 1.0);
    }

    #[test]
    fn test_kinematic_body_lifts_resting_ball() {
        let mut world = PointWorld::new(PointWorldConfig::default());
        world.set_gravity(Vec3::new(0.0, -10.0, 0.0));
        let lift = world.create_body(BodyDesc {
            kind: BodyKind::Kinematic,
            ..floor()
        });
        let h = world.create_body(ball(Vec3::new(0.0, 0.5, 0.0)));

        for i in 1..=60 {
            world.set_position(lift, Vec3::new(0.0, -1.0 + i as f32 * 0.05, 0.0));
            world.step(1.0 / 60.0);
        }
        let state = world.body_state(h).unwrap();
        assert!(state.position.y > 3.0, "y = {}", state.position.y);
    }

    #[test]
    fn test_overlapping_balls_separate() {
        let mut world = PointWorld::new(PointWorldConfig::default());
        world.set_gravity(Vec3::ZERO);
        let a = world.create_body(ball(Vec3::ZERO));
        let b = world.create_body(ball(Vec3::new(0.5, 0.0, 0.0)));

        world.step(1.0 / 60.0);
        let pa = world.body_state(a).unwrap().position;
        let pb = world.body_state(b).unwrap().position;
        assert!((pb - pa).length() >= 1.0 - 1e-4);
    }

    #[test]
    fn test_removed_body_has_no_state() {
        let mut world = PointWorld::default();
        let h = world.create_body(ball(Vec3::ZERO));
        assert_eq!(world.body_count(), 1);
        assert!(world.remove_body(h));
        assert!(!world.remove_body(h));
        assert!(world.body_state(h).is_none());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_freed_slot_is_reused_and_stale_handle_rejected() {
        let mut world = PointWorld::default();
        let old = world.create_body(ball(Vec3::ZERO));
        world.remove_body(old);

        let new = world.create_body(ball(Vec3::new(0.0, 7.0, 0.0)));
        assert_eq!(new.index, old.index);
        assert_ne!(new.generation, old.generation);
        assert_eq!(world.slot_count(), 1);

        assert!(world.body_state(old).is_none());
        assert!(!world.remove_body(old));
        world.set_position(old, Vec3::splat(100.0));
        assert_eq!(world.body_state(new).unwrap().position, Vec3::new(0.0, 7.0, 0.0));
    }

    #[test]
    fn test_repeated_rebuilds_keep_slots_bounded() {
        let mut world = PointWorld::default();
        for _ in 0..100 {
            let handles: Vec<_> = (0..13)
                .map(|i| world.create_body(ball(Vec3::new(i as f32 * 2.0, 0.0, 0.0))))
                .collect();
            world.step(1.0 / 60.0);
            for h in handles {
                assert!(world.remove_body(h));
            }
        }
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.slot_count(), 13);
    }
}
