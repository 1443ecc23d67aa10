use glam::Vec3;
use tilt_tank::bodies::TankNode;
use tilt_tank::input::DeviceOrientation;
use tilt_tank::{
    ActuatorConfig, ActuatorSpec, Control, FirstOrderFollow, GravityConfig, GravityResolver,
    OrientationSample, PhysicsBackend, PointWorld, RingSpec, SettleConfig, SettleDetector,
    SettleState, TankLayout, TargetSet, ToyConfig, WaterToy,
};

fn hold_still(position: Vec3) -> SettleState {
    let mut detector = SettleDetector::new(SettleConfig::default());
    let targets = TargetSet::new(vec![Vec3::ZERO]);
    let mut state = detector.state();
    // first slow sample at t=0, then held through 100 ms
    for _ in 0..11 {
        state = detector.update(0.01, Vec3::ZERO, position, &targets);
    }
    state
}

#[test]
fn ring_at_rest_near_target_settles() {
    assert_eq!(hold_still(Vec3::new(0.5, 0.0, 0.0)), SettleState::Settled);
}

#[test]
fn ring_at_rest_away_from_target_stays_moving() {
    assert_eq!(hold_still(Vec3::new(5.0, 0.0, 0.0)), SettleState::Moving);
}

#[test]
fn raised_setpoint_converges_without_overshoot() {
    let mut follow = FirstOrderFollow::new(20.0, 100.0, -16.0_f32);
    let mut previous = follow.current();

    for tick in 1..=205 {
        let y = follow.update(-10.0, 0.016);
        assert!(y > previous && y <= -10.0, "tick {}: {}", tick, y);
        previous = y;

        // 6 * (31/32)^200 is just over 0.01
        if tick == 200 {
            assert!((y + 10.0).abs() < 0.011, "y = {}", y);
        }
    }
    assert!((previous + 10.0).abs() < 0.01);
}

#[test]
fn gravity_keeps_its_magnitude_for_any_orientation() {
    let resolver = GravityResolver::new(GravityConfig::new(50.0).with_tilt_bias(20.0));
    for alpha in (0..360).step_by(45) {
        for beta in (-180..180).step_by(30) {
            for gamma in (-90..90).step_by(30) {
                let sample = OrientationSample::Device {
                    orientation: DeviceOrientation::new(alpha as f32, beta as f32, gamma as f32),
                    screen_angle: 0.0,
                };
                let g = resolver.resolve(&sample);
                assert!((g.length() - 50.0).abs() < 1e-3, "{:?} -> {:?}", sample, g);
            }
        }
    }
}

fn flat_tank() -> TankLayout {
    TankLayout::new(
        vec![TankNode::new("floor", Vec3::new(0.0, -1.0, 0.0), Vec3::new(10.0, 1.0, 3.0))],
        TargetSet::new(vec![Vec3::new(0.0, 1.4, 0.0)]),
    )
}

#[test]
fn dropped_ring_lands_on_target_and_turns_gold() {
    let mut toy = WaterToy::new(ToyConfig::default(), PointWorld::default(), false).unwrap();
    toy.populate(&[RingSpec::new(0, Vec3::new(0.0, 6.0, 0.0))], &flat_tank())
        .unwrap();

    let mut frame = toy.frame(1.0 / 60.0);
    for _ in 0..240 {
        frame = toy.frame(1.0 / 60.0);
    }

    assert_eq!(toy.ring_state(0), Some(SettleState::Settled));
    assert_eq!(toy.settled_count(), 1);
    let ring = frame.rings[0];
    assert!((ring.transform.position.y - 1.4).abs() < 0.1);
    assert_eq!(ring.appearance.opacity, 1.0);
    assert_eq!(ring.appearance.color, tilt_tank::Color::GOLD);
}

#[test]
fn ring_off_target_never_turns_gold() {
    let mut toy = WaterToy::new(ToyConfig::default(), PointWorld::default(), false).unwrap();
    toy.populate(&[RingSpec::new(3, Vec3::new(6.0, 6.0, 0.0))], &flat_tank())
        .unwrap();

    for _ in 0..240 {
        toy.frame(1.0 / 60.0);
    }
    assert_eq!(toy.ring_state(3), Some(SettleState::Moving));
    assert_eq!(toy.settled_count(), 0);
}

#[test]
fn actuator_lifts_a_resting_ring() {
    let config = ToyConfig::default().with_actuator(ActuatorConfig::default().with_setpoints(0.0, -1.0));
    let mut toy = WaterToy::new(config, PointWorld::default(), false).unwrap();
    let tank = TankLayout::new(
        vec![TankNode::new("floor", Vec3::new(0.0, -3.0, 0.0), Vec3::new(10.0, 1.0, 3.0))],
        TargetSet::default(),
    );
    toy.populate(&[RingSpec::new(0, Vec3::new(0.0, 2.0, 0.0))], &tank)
        .unwrap();
    toy.add_actuator(
        ActuatorSpec::new(Control::Left, Vec3::new(0.0, -1.0, 0.0))
            .with_half_extents(Vec3::new(4.0, 1.0, 2.0)),
    );

    for _ in 0..120 {
        toy.frame(1.0 / 60.0);
    }
    let resting = toy.frame(1.0 / 60.0).rings[0].transform.position.y;

    toy.controls_mut().press(Control::Left);
    let mut highest = resting;
    for _ in 0..60 {
        highest = highest.max(toy.frame(1.0 / 60.0).rings[0].transform.position.y);
    }
    assert!(highest > resting + 0.5, "resting {} highest {}", resting, highest);
}

#[test]
fn teardown_leaves_nothing_behind() {
    let mut toy = WaterToy::new(ToyConfig::default(), PointWorld::default(), true).unwrap();
    toy.sampler_mut().resolve_permission(true);
    toy.populate(
        &RingSpec::scatter(5, Vec3::splat(-3.0), Vec3::splat(3.0), 11),
        &TankLayout::default(),
    )
    .unwrap();
    toy.add_actuator(ActuatorSpec::new(Control::Right, Vec3::new(5.0, -16.0, 0.0)));
    toy.frame(1.0 / 60.0);

    toy.teardown();
    assert_eq!(toy.backend().body_count(), 0);
    assert_eq!(toy.backend().gravity(), Vec3::new(0.0, -50.0, 0.0));

    // events after teardown are dropped
    toy.sampler_mut().on_device_orientation(Some(0.0), Some(90.0), Some(45.0));
    toy.controls_mut().press(Control::Right);
    let frame = toy.frame(1.0 / 60.0);
    assert!(frame.rings.is_empty() && frame.actuators.is_empty());
}
