use glam::Vec2;

/// Whether device-orientation events may drive the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionGate {
    /// The platform has no orientation sensor; fixed for the session.
    Unavailable,
    /// Supported, but the user-gesture permission request has not resolved yet.
    Pending,
    Granted,
    Denied,
}

/// Device compass/pitch/roll angles in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeviceOrientation {
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
}

impl DeviceOrientation {
    pub fn new(alpha: f32, beta: f32, gamma: f32) -> Self {
        Self { alpha, beta, gamma }
    }

    /// Sensors may omit any component; a missing or non-finite angle reads as 0.
    pub fn from_partial(alpha: Option<f32>, beta: Option<f32>, gamma: Option<f32>) -> Self {
        let clean = |v: Option<f32>| v.filter(|a| a.is_finite()).unwrap_or(0.0);
        Self {
            alpha: clean(alpha),
            beta: clean(beta),
            gamma: clean(gamma),
        }
    }
}

/// The signal the controllers consume this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrientationSample {
    Device {
        orientation: DeviceOrientation,
        /// Screen rotation in degrees (0, 90, -90, 180).
        screen_angle: f32,
    },
    /// Pointer offset from the window center, each axis in `[-1, 1]`, +Y up.
    Pointer(Vec2),
}

/// Caches the most recent orientation and pointer input.
#[derive(Debug, Clone)]
pub struct OrientationSampler {
    gate: PermissionGate,
    device: DeviceOrientation,
    screen_angle: f32,
    pointer: Vec2,
    attached: bool,
}

impl OrientationSampler {
    pub fn new(orientation_supported: bool) -> Self {
        Self {
            gate: if orientation_supported {
                PermissionGate::Pending
            } else {
                PermissionGate::Unavailable
            },
            device: DeviceOrientation::default(),
            screen_angle: 0.0,
            pointer: Vec2::ZERO,
            attached: true,
        }
    }

    pub fn gate(&self) -> PermissionGate {
        self.gate
    }

    pub fn is_device_driven(&self) -> bool {
        self.gate == PermissionGate::Granted
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Applies the outcome of the asynchronous permission request.
    pub fn resolve_permission(&mut self, granted: bool) {
        if self.gate == PermissionGate::Unavailable {
            log::debug!("ignoring orientation permission result: no sensor");
            return;
        }

        self.gate = if granted {
            log::info!("device orientation granted");
            PermissionGate::Granted
        } else {
            log::warn!("device orientation denied; falling back to pointer control");
            self.device = DeviceOrientation::default();
            PermissionGate::Denied
        };
    }

    pub fn on_device_orientation(&mut self, alpha: Option<f32>, beta: Option<f32>, gamma: Option<f32>) {
        if self.attached && self.gate == PermissionGate::Granted {
            self.device = DeviceOrientation::from_partial(alpha, beta, gamma);
        }
    }

    /// Takes the screen rotation in degrees. Stored in (-180, 180], so the
    /// legacy `window.orientation` value -90 and `screen.orientation.angle`
    /// value 270 read the same.
    pub fn on_screen_orientation(&mut self, degrees: f32) {
        if !self.attached || !degrees.is_finite() {
            return;
        }
        let angle = degrees.rem_euclid(360.0);
        let angle = if angle > 180.0 { angle - 360.0 } else { angle };
        if angle != self.screen_angle {
            log::debug!("screen angle {} -> {}", self.screen_angle, angle);
        }
        self.screen_angle = angle;
    }

    pub fn screen_angle(&self) -> f32 {
        self.screen_angle
    }

    /// Takes a cursor position in window pixels.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if !self.attached || width <= 0.0 || height <= 0.0 {
            return;
        }
        self.pointer = Vec2::new((x / width - 0.5) * 2.0, (y / height - 0.5) * -2.0)
            .clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    pub fn sample(&self) -> OrientationSample {
        if self.is_device_driven() {
            OrientationSample::Device {
                orientation: self.device,
                screen_angle: self.screen_angle,
            }
        } else {
            OrientationSample::Pointer(self.pointer)
        }
    }

    /// Stops accepting events; cached values stay readable.
    pub fn detach(&mut self) {
        if self.attached {
            log::debug!("orientation sampler detached");
        }
        self.attached = false;
    }
}
