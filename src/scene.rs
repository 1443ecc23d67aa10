//! The stock scene shared by the native demo and the browser handle.

use glam::Vec3;

use crate::bodies::{RingSpec, TankLayout};
use crate::control::ActuatorSpec;
use crate::error::ToyError;
use crate::input::Control;
use crate::physics::PhysicsBackend;
use crate::toy::WaterToy;

/// Rings dropped into a fresh scene.
pub const RING_COUNT: u32 = 8;

/// Rings, tank and actuators of one playable scene.
///
/// The pushers sit in the middle of the floor, between the two targets, so
/// rings can come to rest on a target while both pushers are lowered.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoScene {
    pub rings: Vec<RingSpec>,
    pub tank: TankLayout,
    pub actuators: Vec<ActuatorSpec>,
}

impl DemoScene {
    /// Default tank with [`RING_COUNT`] rings scattered above the floor.
    pub fn new(seed: u64) -> Self {
        Self {
            rings: RingSpec::scatter(
                RING_COUNT,
                Vec3::new(-8.0, -4.0, 0.0),
                Vec3::new(8.0, 8.0, 0.0),
                seed,
            ),
            tank: TankLayout::default(),
            actuators: vec![
                ActuatorSpec::new(Control::Left, Vec3::new(-2.5, -16.0, 0.0)),
                ActuatorSpec::new(Control::Right, Vec3::new(2.5, -16.0, 0.0)),
            ],
        }
    }

    pub fn with_rings(mut self, rings: Vec<RingSpec>) -> Self {
        self.rings = rings;
        self
    }

    pub fn with_tank(mut self, tank: TankLayout) -> Self {
        self.tank = tank;
        self
    }

    /// Populates `toy` with the rings and tank, then adds the actuators.
    pub fn build<B: PhysicsBackend>(&self, toy: &mut WaterToy<B>) -> Result<(), ToyError> {
        toy.populate(&self.rings, &self.tank)?;
        for spec in &self.actuators {
            toy.add_actuator(*spec);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToyConfig;
    use crate::physics::PointWorld;
    use crate::settle::SettleState;

    fn toy() -> WaterToy<PointWorld> {
        WaterToy::new(ToyConfig::default(), PointWorld::default(), false).unwrap()
    }

    #[test]
    fn test_build_creates_every_body() {
        let scene = DemoScene::new(3);
        let mut toy = toy();
        scene.build(&mut toy).unwrap();

        assert_eq!(toy.ring_count(), RING_COUNT as usize);
        assert_eq!(
            toy.backend().body_count(),
            RING_COUNT as usize + scene.tank.colliders.len() + scene.actuators.len()
        );
    }

    #[test]
    fn test_lowered_actuators_clear_targets() {
        let scene = DemoScene::new(1);
        let config = ToyConfig::default();
        let floor = &scene.tank.colliders[0];
        let floor_top = floor.position.y + floor.scale.y;
        // widest ring footprint: ring radius plus segment radius
        let ring_reach = 1.4 + config.settle.capture_radius;

        for spec in &scene.actuators {
            let top = config.actuator.lowered + spec.half_extents.y;
            assert!(top <= floor_top + 1e-4, "{:?} pokes through the floor", spec);
            for target in scene.tank.targets().points() {
                let gap = (target.x - spec.position.x).abs() - spec.half_extents.x;
                assert!(gap > ring_reach, "{:?} covers target {:?}", spec, target);
            }
        }
    }

    #[test]
    fn test_ring_dropped_over_each_target_settles() {
        let scene = DemoScene::new(1);
        for (i, target) in scene.tank.targets().points().iter().enumerate() {
            let id = i as u32;
            let scene = scene
                .clone()
                .with_rings(vec![RingSpec::new(id, Vec3::new(target.x, -4.0, 0.0))]);
            let mut toy = toy();
            scene.build(&mut toy).unwrap();

            for _ in 0..600 {
                toy.frame(1.0 / 60.0);
            }
            assert_eq!(toy.ring_state(id), Some(SettleState::Settled), "target {:?}", target);
        }
    }
}
