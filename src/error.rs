//! Error types for configuration loading and screen sequencing.

use thiserror::Error;

use crate::screen::ScreenState;

/// Rejected journey configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),

    /// A numeric field is out of its allowed range.
    #[error("`{field}` must be {expected}, got {value}")]
    OutOfRange {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human readable constraint.
        expected: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Name length bounds contradict each other.
    #[error("name length bounds invalid: min {min}, max {max}")]
    NameBounds {
        /// Minimum accepted length.
        min: usize,
        /// Maximum kept length.
        max: usize,
    },

    /// A cue threshold lies outside `[0, 1]`.
    #[error("cue {index} threshold {threshold} outside [0, 1]")]
    CueOutOfRange {
        /// Position of the cue in the table.
        index: usize,
        /// The rejected threshold.
        threshold: f64,
    },

    /// Cues must be listed by non-decreasing threshold.
    #[error("cue {index} is out of order")]
    CuesUnordered {
        /// Position of the first cue breaking the order.
        index: usize,
    },

    /// Window policy windows would overlap.
    #[error("window width {width} exceeds step {step}; windows would overlap")]
    OverlappingWindows {
        /// Distance between window starts.
        step: f64,
        /// Length of each window.
        width: f64,
    },
}

/// Rejected visitor name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Fewer characters than required after trimming.
    #[error("ERROR: CALLSIGN TOO SHORT")]
    TooShort {
        /// Trimmed length that was submitted.
        len: usize,
        /// Required minimum.
        min: usize,
    },
}

/// An event arrived on a screen that does not handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("`{event}` is not valid while on {from:?}")]
pub struct TransitionError {
    /// Screen that was current when the event arrived.
    pub from: ScreenState,
    /// Name of the rejected event.
    pub event: &'static str,
}

/// Failure of a screen sequencer operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    /// The submitted name was rejected.
    #[error(transparent)]
    Name(#[from] NameError),

    /// The event does not apply to the current screen.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
