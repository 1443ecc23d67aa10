use glam::Vec3;

pub trait Interpolatable: Clone + Copy {
    fn add(self, other: Self) -> Self;
    fn sub(self, other: Self) -> Self;
    fn scale(self, factor: f32) -> Self;
}

impl Interpolatable for f32 {
    fn add(self, other: Self) -> Self { self + other }
    fn sub(self, other: Self) -> Self { self - other }
    fn scale(self, factor: f32) -> Self { self * factor }
}

impl Interpolatable for Vec3 {
    fn add(self, other: Self) -> Self { self + other }
    fn sub(self, other: Self) -> Self { self - other }
    fn scale(self, factor: f32) -> Self { self * factor }
}

/// Exponential approach toward a setpoint:
/// `y += (x - y) / (stiffness * dt * time_scale)`.
///
/// A bigger denominator means a slower approach. The per-step gain is capped
/// at 1, so the output lands on the setpoint instead of overshooting when
/// `dt` is tiny.
#[derive(Debug, Clone, Copy)]
pub struct FirstOrderFollow<T: Interpolatable> {
    y: T,
    stiffness: f32,
    time_scale: f32,
}

impl<T: Interpolatable> FirstOrderFollow<T> {
    pub fn new(stiffness: f32, time_scale: f32, initial: T) -> Self {
        Self {
            y: initial,
            stiffness,
            time_scale,
        }
    }

    pub fn reset(&mut self, value: T) {
        self.y = value;
    }

    /// Fraction of the remaining distance covered by a step of `dt`.
    pub fn gain(&self, dt: f32) -> f32 {
        let denominator = self.stiffness * dt * self.time_scale;
        if denominator <= 0.0 || !denominator.is_finite() {
            return 0.0;
        }
        (1.0 / denominator).min(1.0)
    }

    pub fn update(&mut self, x: T, dt: f32) -> T {
        if dt <= 0.0 {
            return self.y;
        }
        let gain = self.gain(dt);
        self.y = self.y.add(x.sub(self.y).scale(gain));
        self.y
    }

    pub fn current(&self) -> T {
        self.y
    }
}
