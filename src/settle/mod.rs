//! Ring capture detection
//!
//! A ring counts as captured once it has stayed slow for a short delay while
//! resting within the capture radius of one of the tank's targets.

mod detector;
mod targets;

pub use detector::{Appearance, SettleDetector, SettleState};
pub use targets::TargetSet;
