use glam::Vec3;

use super::targets::TargetSet;
use crate::bodies::Color;
use crate::config::SettleConfig;

/// Absorbs float drift when summing frame deltas against the delay.
const DELAY_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettleState {
    Moving,
    /// Slow for `elapsed` simulated seconds since the first slow sample.
    PendingSleep { elapsed: f32 },
    Settled,
}

/// Color and opacity the renderer should give a ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub color: Color,
    pub opacity: f32,
}

/// Per-ring state machine deciding whether the ring has come to rest on a target.
///
/// Time only advances through `update`, so the pending check can never fire
/// after the ring is gone: dropping or cancelling the detector is enough.
#[derive(Debug, Clone)]
pub struct SettleDetector {
    config: SettleConfig,
    state: SettleState,
}

impl SettleDetector {
    pub fn new(config: SettleConfig) -> Self {
        Self {
            config,
            state: SettleState::Moving,
        }
    }

    pub fn state(&self) -> SettleState {
        self.state
    }

    pub fn is_settled(&self) -> bool {
        self.state == SettleState::Settled
    }

    /// Feeds one tick of polled body state.
    pub fn update(&mut self, dt: f32, velocity: Vec3, position: Vec3, targets: &TargetSet) -> SettleState {
        let dt = dt.max(0.0);
        let slow = velocity.length() < self.config.velocity_threshold;

        self.state = match (self.state, slow) {
            (SettleState::Settled, false) => {
                log::debug!("ring left target at {:?}", position);
                SettleState::Moving
            }
            (_, false) => SettleState::Moving,
            (SettleState::Settled, true) => SettleState::Settled,
            (SettleState::Moving, true) => SettleState::PendingSleep { elapsed: 0.0 },
            (SettleState::PendingSleep { elapsed }, true) => SettleState::PendingSleep { elapsed: elapsed + dt },
        };

        if let SettleState::PendingSleep { elapsed } = self.state {
            if elapsed + DELAY_EPSILON >= self.config.delay_secs {
                self.state = self.check(position, targets);
            }
        }
        self.state
    }

    fn check(&self, position: Vec3, targets: &TargetSet) -> SettleState {
        match targets.capture(position, self.config.capture_radius) {
            Some(index) => {
                log::debug!("ring settled on target {} at {:?}", index, position);
                SettleState::Settled
            }
            None => SettleState::Moving,
        }
    }

    /// Drops a pending check; a settled ring keeps its state.
    pub fn cancel(&mut self) {
        if let SettleState::PendingSleep { .. } = self.state {
            self.state = SettleState::Moving;
        }
    }

    pub fn reset(&mut self) {
        self.state = SettleState::Moving;
    }

    pub fn appearance(&self, base: Color) -> Appearance {
        if self.is_settled() {
            Appearance {
                color: Color::GOLD,
                opacity: 1.0,
            }
        } else {
            Appearance {
                color: base,
                opacity: self.config.base_opacity,
            }
        }
    }
}
