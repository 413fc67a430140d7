//! Car position along the track.

use std::fmt;

use tracing::{debug, info};

use crate::config::AutoAdvanceConfig;
use crate::input::InputState;
use crate::timer::{sanitize_dt, Countdown};

/// Distance travelled, always within `[0, max_distance]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct JourneyPosition(f64);

impl JourneyPosition {
    pub const START: Self = Self(0.0);

    /// Non-finite input is treated as the start line.
    pub fn clamped(p: f64, max_distance: f64) -> Self {
        if p.is_finite() {
            Self(p.clamp(0.0, max_distance))
        } else {
            Self::START
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Fraction of the track covered, in `[0, 1]`.
    pub fn normalized(self, max_distance: f64) -> f64 {
        (self.0 / max_distance).clamp(0.0, 1.0)
    }
}

/// Result of one tracker tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerStep {
    pub position: JourneyPosition,
    /// True on the single tick that first reaches the end of the track.
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Input,
    Auto(Countdown),
}

pub type ProgressObserver = Box<dyn FnMut(JourneyPosition)>;

pub struct ProgressTracker {
    position: JourneyPosition,
    max_distance: f64,
    speed: f64,
    auto: AutoAdvanceConfig,
    mode: Mode,
    complete_latch: bool,
    observer: Option<ProgressObserver>,
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("position", &self.position)
            .field("max_distance", &self.max_distance)
            .field("mode", &self.mode)
            .field("complete_latch", &self.complete_latch)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl ProgressTracker {
    #[must_use]
    pub fn new(max_distance: f64, speed: f64, auto: AutoAdvanceConfig) -> Self {
        Self {
            position: JourneyPosition::START,
            max_distance,
            speed,
            auto,
            mode: Mode::Input,
            complete_latch: false,
            observer: None,
        }
    }

    /// Registers the callback that receives the position after every tick.
    pub fn set_observer(&mut self, observer: impl FnMut(JourneyPosition) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn position(&self) -> JourneyPosition {
        self.position
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn is_auto_advancing(&self) -> bool {
        matches!(self.mode, Mode::Auto(_))
    }

    /// Whether the completion edge has already fired this session.
    pub fn is_complete(&self) -> bool {
        self.complete_latch
    }

    /// Drives the car on its own for the configured intro duration.
    /// Held controls are ignored until it runs out.
    pub fn start_auto_advance(&mut self) {
        if self.auto.duration_secs > 0.0 {
            debug!(secs = self.auto.duration_secs, "auto-advance started");
            self.mode = Mode::Auto(Countdown::new(self.auto.duration_secs));
        }
    }

    pub fn advance(&mut self, input: InputState, dt: f64) -> TrackerStep {
        let dt = sanitize_dt(dt);
        let delta = match self.mode {
            Mode::Auto(mut countdown) => {
                self.mode = if countdown.advance(dt) {
                    debug!("auto-advance finished");
                    Mode::Input
                } else {
                    Mode::Auto(countdown)
                };
                self.auto.step
            }
            Mode::Input => input.direction() * self.speed * dt,
        };

        let at_end = self.position.value() >= self.max_distance;
        if !(delta > 0.0 && at_end) {
            let next = self.position.value() + delta;
            self.position = JourneyPosition::clamped(next, self.max_distance);
        }

        let completed = !self.complete_latch && self.position.value() >= self.max_distance;
        if completed {
            self.complete_latch = true;
            info!(distance = self.max_distance, "journey complete");
        }

        if let Some(observer) = self.observer.as_mut() {
            observer(self.position);
        }

        TrackerStep {
            position: self.position,
            completed,
        }
    }

    /// Back to the start line with the completion latch cleared.
    pub fn reset(&mut self) {
        self.position = JourneyPosition::START;
        self.mode = Mode::Input;
        self.complete_latch = false;
    }
}
