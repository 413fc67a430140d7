//! Top-level screen sequencing.
//!
//! The flow is strictly linear:
//! name entry → loading → active journey → completion → redirect.
//! The only way back is an explicit restart from the redirect screen.
//! Pending timers live inside the screen that scheduled them, so leaving a
//! screen drops its timer with it.

use std::fmt;

use tracing::{debug, warn};

use crate::config::NameRules;
use crate::error::{NameError, SequencerError, TransitionError};
use crate::timer::Countdown;

/// Which top-level view is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenState {
    NameEntry,
    Loading,
    Active,
    Completion,
    Redirect,
}

impl ScreenState {
    /// DOM id of the view for this screen.
    pub fn view_id(self) -> &'static str {
        match self {
            Self::NameEntry => "name-entry",
            Self::Loading => "loading",
            Self::Active => "journey",
            Self::Completion => "completion",
            Self::Redirect => "redirect",
        }
    }

    pub const ALL: [ScreenState; 5] = [
        Self::NameEntry,
        Self::Loading,
        Self::Active,
        Self::Completion,
        Self::Redirect,
    ];
}

/// An accepted visitor name: trimmed, uppercased, length-capped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PilotName(String);

impl PilotName {
    pub fn parse(raw: &str, rules: NameRules) -> Result<Self, NameError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if len < rules.min_len {
            return Err(NameError::TooShort {
                len,
                min: rules.min_len,
            });
        }
        Ok(Self(
            trimmed
                .chars()
                .flat_map(char::to_uppercase)
                .take(rules.max_len)
                .collect(),
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PilotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    NameEntry { rejected: Option<NameError> },
    Loading(Countdown),
    Active,
    Completion(Countdown),
    Redirect,
}

impl Phase {
    fn state(&self) -> ScreenState {
        match self {
            Self::NameEntry { .. } => ScreenState::NameEntry,
            Self::Loading(_) => ScreenState::Loading,
            Self::Active => ScreenState::Active,
            Self::Completion(_) => ScreenState::Completion,
            Self::Redirect => ScreenState::Redirect,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScreenSequencer {
    phase: Phase,
    pilot: Option<PilotName>,
    rules: NameRules,
    loading_secs: f64,
    completion_secs: f64,
}

impl ScreenSequencer {
    #[must_use]
    pub fn new(rules: NameRules, loading_secs: f64, completion_secs: f64) -> Self {
        Self {
            phase: Phase::NameEntry { rejected: None },
            pilot: None,
            rules,
            loading_secs,
            completion_secs,
        }
    }

    pub fn state(&self) -> ScreenState {
        self.phase.state()
    }

    pub fn pilot(&self) -> Option<&PilotName> {
        self.pilot.as_ref()
    }

    /// The validation error raised by the last rejected name, if still shown.
    pub fn name_error(&self) -> Option<&NameError> {
        match &self.phase {
            Phase::NameEntry { rejected } => rejected.as_ref(),
            _ => None,
        }
    }

    pub fn submit_name(&mut self, raw: &str) -> Result<&PilotName, SequencerError> {
        if !matches!(self.phase, Phase::NameEntry { .. }) {
            return Err(self.rejected("submit_name").into());
        }
        match PilotName::parse(raw, self.rules) {
            Ok(name) => {
                debug!(pilot = %name, "name accepted");
                self.enter(Phase::Loading(Countdown::new(self.loading_secs)));
                Ok(&*self.pilot.insert(name))
            }
            Err(err) => {
                warn!(%err, "name rejected");
                self.phase = Phase::NameEntry {
                    rejected: Some(err.clone()),
                };
                Err(err.into())
            }
        }
    }

    /// Runs the current screen's timer. Returns the new screen on a transition.
    pub fn tick(&mut self, dt: f64) -> Option<ScreenState> {
        let expired = match &mut self.phase {
            Phase::Loading(timer) | Phase::Completion(timer) => timer.advance(dt),
            _ => false,
        };
        if !expired {
            return None;
        }
        let next = match self.phase {
            Phase::Loading(_) => Phase::Active,
            _ => Phase::Redirect,
        };
        self.enter(next);
        Some(self.state())
    }

    /// Handles the tracker's one-shot completion edge.
    pub fn journey_complete(&mut self) -> Result<ScreenState, TransitionError> {
        if self.phase != Phase::Active {
            return Err(self.rejected("journey_complete"));
        }
        self.enter(Phase::Completion(Countdown::new(self.completion_secs)));
        Ok(self.state())
    }

    /// Back to name entry. Only offered on the redirect screen.
    pub fn restart(&mut self) -> Result<(), TransitionError> {
        if self.phase != Phase::Redirect {
            return Err(self.rejected("restart"));
        }
        self.pilot = None;
        self.enter(Phase::NameEntry { rejected: None });
        Ok(())
    }

    fn enter(&mut self, next: Phase) {
        debug!(from = ?self.state(), to = ?next.state(), "screen transition");
        self.phase = next;
    }

    fn rejected(&self, event: &'static str) -> TransitionError {
        let err = TransitionError {
            from: self.state(),
            event,
        };
        warn!(%err, "event ignored");
        err
    }
}
