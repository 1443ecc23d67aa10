use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::shape::{CompoundShapeDescriptor, ShapeDescriptor};
use crate::config::RingShapeConfig;
use crate::error::ToyError;
use crate::physics::{BodyDesc, BodyKind, SurfaceMaterial};

/// 24-bit `0xRRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const GOLD: Color = Color(0xffd700);
    pub const PINK: Color = Color(0xee6688);

    pub fn from_hex(hex: u32) -> Self {
        Color(hex & 0x00ff_ffff)
    }

    /// Components in `[0, 1]`.
    pub fn to_rgb(self) -> Vec3 {
        Vec3::new(
            ((self.0 >> 16) & 0xff) as f32 / 255.0,
            ((self.0 >> 8) & 0xff) as f32 / 255.0,
            (self.0 & 0xff) as f32 / 255.0,
        )
    }
}

const PALETTE: [Color; 5] = [
    Color::PINK,
    Color(0x66aaee),
    Color(0x88ee66),
    Color(0xeeaa44),
    Color(0xaa66ee),
];

fn default_radius() -> f32 {
    1.0
}

fn default_segment_count() -> u32 {
    8
}

fn default_color() -> Color {
    Color::PINK
}

/// Placement and size of one ring, fixed at scene-populate time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RingSpec {
    pub id: u32,
    #[serde(alias = "position")]
    pub center: Vec3,
    /// XYZ Euler angles in radians.
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "default_color")]
    pub color: Color,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_segment_count")]
    pub segment_count: u32,
}

impl RingSpec {
    pub fn new(id: u32, center: Vec3) -> Self {
        Self {
            id,
            center,
            rotation: Vec3::ZERO,
            color: default_color(),
            radius: default_radius(),
            segment_count: default_segment_count(),
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_segments(mut self, segment_count: u32) -> Self {
        self.segment_count = segment_count;
        self
    }

    /// Parses a ring list in the `rings.json` layout: `[{ "id", "position", "rotation" }, ...]`.
    pub fn list_from_json(json: &str) -> Result<Vec<RingSpec>, ToyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Scatters `count` rings uniformly inside the box `[min, max]` with random orientation.
    ///
    /// The same seed always yields the same layout.
    pub fn scatter(count: u32, min: Vec3, max: Vec3, seed: u64) -> Vec<RingSpec> {
        let mut rng = StdRng::seed_from_u64(seed);
        let lo = min.min(max);
        let hi = min.max(max);

        (0..count)
            .map(|id| {
                let center = Vec3::new(
                    sample_axis(&mut rng, lo.x, hi.x),
                    sample_axis(&mut rng, lo.y, hi.y),
                    sample_axis(&mut rng, lo.z, hi.z),
                );
                let rotation = Vec3::new(
                    rng.gen_range(0.0..TAU),
                    rng.gen_range(0.0..TAU),
                    rng.gen_range(0.0..TAU),
                );
                RingSpec::new(id, center)
                    .with_rotation(rotation)
                    .with_color(PALETTE[id as usize % PALETTE.len()])
            })
            .collect()
    }
}

fn sample_axis(rng: &mut StdRng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Plane in which ring segments are laid out, in the ring's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RingPlane {
    /// Segments at `(r cos a, r sin a, 0)`, turned about +Z.
    Xy,
    /// Segments at `(r cos a, 0, r sin a)`, turned about -Y.
    Xz,
}

/// Builds torus-approximating compound bodies from ring specs.
#[derive(Debug, Clone, Copy)]
pub struct RingBodyGenerator {
    config: RingShapeConfig,
}

impl RingBodyGenerator {
    pub fn new(config: RingShapeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RingShapeConfig {
        &self.config
    }

    /// One sub-shape per segment, evenly spaced around the ring's circle.
    pub fn generate(&self, spec: &RingSpec) -> Result<CompoundShapeDescriptor, ToyError> {
        if spec.segment_count == 0 {
            return Err(ToyError::InvalidRing {
                id: spec.id,
                segment_count: spec.segment_count,
            });
        }

        let n = spec.segment_count;
        let shapes = (0..n)
            .map(|i| {
                let angle = i as f32 / n as f32 * TAU;
                let (sin, cos) = angle.sin_cos();
                let (position, rotation) = match self.config.plane {
                    RingPlane::Xy => (
                        Vec3::new(spec.radius * cos, spec.radius * sin, 0.0),
                        Vec3::new(0.0, 0.0, angle),
                    ),
                    RingPlane::Xz => (
                        Vec3::new(spec.radius * cos, 0.0, spec.radius * sin),
                        Vec3::new(0.0, -angle, 0.0),
                    ),
                };
                ShapeDescriptor::new(self.config.segment, position, rotation)
            })
            .collect();

        Ok(CompoundShapeDescriptor::new(shapes))
    }

    /// Full dynamic body for the ring, placed at its center with its orientation.
    pub fn body_desc(&self, spec: &RingSpec) -> Result<BodyDesc, ToyError> {
        let shapes = self.generate(spec)?;
        Ok(BodyDesc {
            kind: BodyKind::Dynamic {
                mass: self.config.mass,
            },
            position: spec.center,
            rotation: spec.rotation,
            shapes,
            material: SurfaceMaterial::default(),
        })
    }
}
