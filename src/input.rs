//! Keyboard to logical control mapping.

/// The two logical directional controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Forward,
    Backward,
}

impl Control {
    /// Maps a DOM `KeyboardEvent.key` value to a control.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Self::Forward),
            "ArrowDown" | "s" | "S" => Some(Self::Backward),
            _ => None,
        }
    }
}

/// Currently held directional controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
}

impl InputState {
    pub fn press(&mut self, control: Control) {
        self.set(control, true);
    }

    pub fn release(&mut self, control: Control) {
        self.set(control, false);
    }

    fn set(&mut self, control: Control, held: bool) {
        match control {
            Control::Forward => self.forward = held,
            Control::Backward => self.backward = held,
        }
    }

    /// -1, 0 or 1. Holding both controls cancels out.
    pub fn direction(&self) -> f64 {
        match (self.forward, self.backward) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}
