/// A held/released input bound to one actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
}

impl Control {
    pub const ALL: [Control; 2] = [Control::Left, Control::Right];

    fn index(self) -> usize {
        match self {
            Control::Left => 0,
            Control::Right => 1,
        }
    }
}

/// Up/down latches, set by key and pointer press/release events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    held: [bool; 2],
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, control: Control, held: bool) {
        self.held[control.index()] = held;
    }

    pub fn press(&mut self, control: Control) {
        self.set(control, true);
    }

    pub fn release(&mut self, control: Control) {
        self.set(control, false);
    }

    pub fn is_up(&self, control: Control) -> bool {
        self.held[control.index()]
    }

    /// Drops every latch, e.g. on focus loss or teardown.
    pub fn release_all(&mut self) {
        self.held = [false; 2];
    }
}
