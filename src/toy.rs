//! The water toy: one frame state wiring every controller to a physics backend.

use glam::Vec3;

use crate::bodies::{RingBodyGenerator, RingSpec, TankLayout};
use crate::config::ToyConfig;
use crate::control::{Actuator, ActuatorSpec, Camera, CameraFollowController, GravityResolver};
use crate::error::ToyError;
use crate::input::{Control, Controls, OrientationSampler};
use crate::math::Transform;
use crate::physics::{BodyHandle, PhysicsBackend};
use crate::settle::{Appearance, SettleDetector, SettleState, TargetSet};

/// Render data for one ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingVisual {
    pub id: u32,
    pub transform: Transform,
    pub appearance: Appearance,
}

/// Everything a renderer needs after one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub camera: Transform,
    /// Gravity applied this frame; also drives the gravity-arrow helper.
    pub gravity: Vec3,
    pub rings: Vec<RingVisual>,
    pub actuators: Vec<Transform>,
}

#[derive(Debug)]
struct RingSlot {
    spec: RingSpec,
    handle: BodyHandle,
    detector: SettleDetector,
}

#[derive(Debug)]
struct ActuatorSlot {
    actuator: Actuator,
    handle: BodyHandle,
}

/// Owns the frame state and every body handle it creates.
///
/// Event adapters write into the sampler and the control latches; the host
/// loop calls [`WaterToy::frame`] once per rendered frame.
pub struct WaterToy<B: PhysicsBackend> {
    config: ToyConfig,
    backend: B,
    sampler: OrientationSampler,
    controls: Controls,
    gravity: GravityResolver,
    follow: CameraFollowController,
    camera: Camera,
    generator: RingBodyGenerator,
    targets: TargetSet,
    rings: Vec<RingSlot>,
    actuators: Vec<ActuatorSlot>,
    colliders: Vec<BodyHandle>,
    applied_gravity: Vec3,
}

impl<B: PhysicsBackend> WaterToy<B> {
    /// Fails with [`ToyError::InvalidConfig`] before touching the backend if
    /// `config` does not validate.
    pub fn new(config: ToyConfig, mut backend: B, orientation_supported: bool) -> Result<Self, ToyError> {
        config.validate()?;
        let gravity = GravityResolver::new(config.gravity);
        let applied_gravity = gravity.reference();
        backend.set_gravity(applied_gravity);

        Ok(Self {
            backend,
            sampler: OrientationSampler::new(orientation_supported),
            controls: Controls::new(),
            gravity,
            follow: CameraFollowController::new(config.camera),
            camera: Camera::from_config(&config.camera),
            generator: RingBodyGenerator::new(config.ring),
            targets: TargetSet::default(),
            rings: Vec::new(),
            actuators: Vec::new(),
            colliders: Vec::new(),
            applied_gravity,
            config,
        })
    }

    pub fn config(&self) -> &ToyConfig {
        &self.config
    }

    /// Adds the tank colliders and one dynamic body per ring.
    ///
    /// Every ring is validated before the first body is created, so a bad
    /// ring leaves the backend untouched.
    pub fn populate(&mut self, rings: &[RingSpec], tank: &TankLayout) -> Result<(), ToyError> {
        let ring_bodies = rings
            .iter()
            .map(|spec| self.generator.body_desc(spec))
            .collect::<Result<Vec<_>, _>>()?;

        for desc in tank.collider_descs() {
            let handle = self.backend.create_body(desc);
            self.colliders.push(handle);
        }
        self.targets = tank.targets().clone();

        for (spec, desc) in rings.iter().zip(ring_bodies) {
            let handle = self.backend.create_body(desc);
            self.rings.push(RingSlot {
                spec: spec.clone(),
                handle,
                detector: SettleDetector::new(self.config.settle),
            });
        }

        log::info!(
            "populated {} rings, {} colliders, {} targets",
            self.rings.len(),
            self.colliders.len(),
            self.targets.len()
        );
        Ok(())
    }

    pub fn add_actuator(&mut self, spec: ActuatorSpec) -> BodyHandle {
        let handle = self.backend.create_body(spec.body_desc());
        self.actuators.push(ActuatorSlot {
            actuator: Actuator::new(&spec, &self.config.actuator),
            handle,
        });
        handle
    }

    pub fn sampler(&self) -> &OrientationSampler {
        &self.sampler
    }

    pub fn sampler_mut(&mut self) -> &mut OrientationSampler {
        &mut self.sampler
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut Controls {
        &mut self.controls
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    /// Gravity sent to the backend on the latest tick.
    pub fn gravity(&self) -> Vec3 {
        self.applied_gravity
    }

    /// Shifts the setpoints of every actuator bound to `control` by whole nudge steps.
    pub fn nudge(&mut self, control: Control, steps: i32) {
        let delta = self.config.actuator.nudge_step * steps as f32;
        for slot in self.actuators.iter_mut().filter(|s| s.actuator.control() == control) {
            slot.actuator.nudge(delta);
        }
    }

    /// Advances the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let sample = self.sampler.sample();
        self.applied_gravity = self.gravity.resolve(&sample);
        self.backend.set_gravity(self.applied_gravity);

        for slot in &mut self.actuators {
            let up = self.controls.is_up(slot.actuator.control());
            let position = slot.actuator.update(up, dt);
            self.backend.set_position(slot.handle, position);
        }

        self.backend.step(dt);

        for ring in &mut self.rings {
            if let Some(state) = self.backend.body_state(ring.handle) {
                ring.detector
                    .update(dt, state.velocity, state.position, &self.targets);
            }
        }
    }

    /// Ticks, eases the camera rig, then collects render data.
    pub fn frame(&mut self, dt: f32) -> FrameOutput {
        self.tick(dt);

        let sample = self.sampler.sample();
        self.follow.update(&sample);
        self.follow.update_camera(&mut self.camera);

        let rings = self
            .rings
            .iter()
            .filter_map(|ring| {
                let state = self.backend.body_state(ring.handle)?;
                Some(RingVisual {
                    id: ring.spec.id,
                    transform: Transform::from_position_rotation(state.position, state.rotation),
                    appearance: ring.detector.appearance(ring.spec.color),
                })
            })
            .collect();

        let actuators = self
            .actuators
            .iter()
            .map(|slot| Transform::from_position(slot.actuator.position()))
            .collect();

        FrameOutput {
            camera: self.camera.transform(),
            gravity: self.applied_gravity,
            rings,
            actuators,
        }
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    pub fn ring_state(&self, id: u32) -> Option<SettleState> {
        self.rings
            .iter()
            .find(|r| r.spec.id == id)
            .map(|r| r.detector.state())
    }

    pub fn settled_count(&self) -> usize {
        self.rings.iter().filter(|r| r.detector.is_settled()).count()
    }

    /// Removes every body and cancels pending settle checks. Input stays attached.
    pub fn reset(&mut self) {
        for ring in &mut self.rings {
            ring.detector.cancel();
        }

        let handles = self
            .rings
            .drain(..)
            .map(|r| r.handle)
            .chain(self.actuators.drain(..).map(|a| a.handle))
            .chain(self.colliders.drain(..));
        let mut removed = 0;
        for handle in handles {
            if self.backend.remove_body(handle) {
                removed += 1;
            }
        }

        self.targets = TargetSet::default();
        self.follow.reset();
        self.applied_gravity = self.gravity.reference();
        self.backend.set_gravity(self.applied_gravity);
        log::debug!("reset removed {} bodies", removed);
    }

    /// Reset, then stop listening for input for good.
    pub fn teardown(&mut self) {
        self.reset();
        self.sampler.detach();
        self.controls.release_all();
        log::info!("water toy torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GravityConfig, SettleConfig};
    use crate::physics::{PointWorld, PointWorldConfig};

    fn toy() -> WaterToy<PointWorld> {
        WaterToy::new(ToyConfig::default(), PointWorld::default(), false).unwrap()
    }

    #[test]
    fn test_new_sends_reference_gravity() {
        let toy = toy();
        assert_eq!(toy.backend().gravity(), Vec3::new(0.0, -50.0, 0.0));
        assert_eq!(toy.gravity(), Vec3::new(0.0, -50.0, 0.0));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ToyConfig::default().with_gravity(GravityConfig::new(0.0));
        let err = WaterToy::new(config, PointWorld::default(), false).err();
        assert!(matches!(err, Some(ToyError::InvalidConfig(_))));

        let config = ToyConfig::default().with_settle(SettleConfig::default().with_capture_radius(-1.0));
        assert!(WaterToy::new(config, PointWorld::default(), false).is_err());
    }

    #[test]
    fn test_populate_creates_all_bodies() {
        let mut toy = toy();
        let rings = RingSpec::scatter(4, Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 5.0, 0.0), 7);
        toy.populate(&rings, &TankLayout::default()).unwrap();
        toy.add_actuator(ActuatorSpec::new(Control::Left, Vec3::new(-5.0, -16.0, 0.0)));

        assert_eq!(toy.ring_count(), 4);
        assert_eq!(toy.backend().body_count(), 4 + 5 + 1);
    }

    #[test]
    fn test_bad_ring_creates_nothing() {
        let mut toy = toy();
        let rings = vec![
            RingSpec::new(0, Vec3::ZERO),
            RingSpec::new(1, Vec3::ZERO).with_segments(0),
        ];
        let err = toy.populate(&rings, &TankLayout::default()).unwrap_err();
        assert!(matches!(err, ToyError::InvalidRing { id: 1, .. }));
        assert_eq!(toy.backend().body_count(), 0);
        assert_eq!(toy.ring_count(), 0);
    }

    #[test]
    fn test_held_control_raises_its_actuator() {
        let mut toy = toy();
        toy.add_actuator(ActuatorSpec::new(Control::Left, Vec3::new(-5.0, -16.0, 0.0)));
        toy.add_actuator(ActuatorSpec::new(Control::Right, Vec3::new(5.0, -16.0, 0.0)));
        toy.controls_mut().press(Control::Left);

        let mut out = toy.frame(0.016);
        for _ in 0..300 {
            out = toy.frame(0.016);
        }
        assert!((out.actuators[0].position.y + 10.0).abs() < 0.05);
        assert!((out.actuators[1].position.y + 16.0).abs() < 1e-4);
    }

    #[test]
    fn test_nudge_targets_one_control() {
        let mut toy = toy();
        toy.add_actuator(ActuatorSpec::new(Control::Left, Vec3::new(-5.0, -16.0, 0.0)));
        toy.add_actuator(ActuatorSpec::new(Control::Right, Vec3::new(5.0, -16.0, 0.0)));
        toy.nudge(Control::Right, 4);

        for _ in 0..400 {
            toy.tick(0.016);
        }
        let out = toy.frame(0.016);
        assert!((out.actuators[0].position.y + 16.0).abs() < 1e-3);
        assert!((out.actuators[1].position.y + 15.0).abs() < 1e-2);
    }

    #[test]
    fn test_zero_dt_is_ignored() {
        let mut toy = WaterToy::new(
            ToyConfig::default(),
            PointWorld::new(PointWorldConfig::default()),
            false,
        )
        .unwrap();
        toy.populate(&[RingSpec::new(0, Vec3::new(0.0, 5.0, 0.0))], &TankLayout::default())
            .unwrap();
        let before = toy.frame(0.0);
        let after = toy.frame(0.0);
        assert_eq!(before.rings[0].transform.position, after.rings[0].transform.position);
    }

    #[test]
    fn test_reset_removes_bodies_but_keeps_input() {
        let mut toy = toy();
        toy.populate(&[RingSpec::new(0, Vec3::ZERO)], &TankLayout::default())
            .unwrap();
        toy.controls_mut().press(Control::Left);
        toy.reset();

        assert_eq!(toy.backend().body_count(), 0);
        assert_eq!(toy.ring_count(), 0);
        assert!(toy.sampler().is_attached());
        assert!(toy.controls().is_up(Control::Left));
    }

    #[test]
    fn test_teardown_detaches_input() {
        let mut toy = toy();
        toy.populate(&[RingSpec::new(0, Vec3::ZERO)], &TankLayout::default())
            .unwrap();
        toy.controls_mut().press(Control::Right);
        toy.teardown();

        assert_eq!(toy.backend().body_count(), 0);
        assert!(!toy.sampler().is_attached());
        assert!(!toy.controls().is_up(Control::Right));
        assert!(toy.frame(0.016).rings.is_empty());
    }
}
