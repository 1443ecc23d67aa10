use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Goal positions supplied once by the tank layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSet {
    points: Vec<Vec3>,
}

impl TargetSet {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the nearest target within `radius` of `position`.
    pub fn capture(&self, position: Vec3, radius: f32) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance(position)))
            .filter(|(_, d)| *d < radius)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }
}

impl From<Vec<Vec3>> for TargetSet {
    fn from(points: Vec<Vec3>) -> Self {
        Self::new(points)
    }
}
