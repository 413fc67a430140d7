//! Journey controller: wires input, the progress tracker, the trigger
//! evaluator and the screen sequencer into one per-frame update.

use tracing::{debug, info};

use crate::config::JourneyConfig;
use crate::error::{ConfigError, NameError, SequencerError};
use crate::input::{Control, InputState};
use crate::screen::{PilotName, ScreenSequencer, ScreenState};
use crate::tracker::{JourneyPosition, ProgressTracker};
use crate::triggers::{Evaluation, TriggerEvaluator};

/// Everything the renderer and screen shell need for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub screen: ScreenState,
    pub position: JourneyPosition,
    /// `position / max_distance`.
    pub progress: f64,
    /// Visible region ids; always empty outside the active journey.
    pub active_regions: Vec<&'a str>,
    /// Empty outside the active journey or when no cue applies.
    pub subtitle: &'a str,
}

#[derive(Debug)]
pub struct JourneyController {
    input: InputState,
    tracker: ProgressTracker,
    evaluator: TriggerEvaluator,
    sequencer: ScreenSequencer,
}

impl Default for JourneyController {
    fn default() -> Self {
        Self::assemble(JourneyConfig::default())
    }
}

impl JourneyController {
    /// Validates `config` and builds the controller from it.
    pub fn new(config: JourneyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config))
    }

    fn assemble(config: JourneyConfig) -> Self {
        let JourneyConfig {
            max_distance,
            drive_speed,
            auto_advance,
            loading_secs,
            completion_secs,
            name,
            regions,
            cues,
        } = config;
        Self {
            input: InputState::default(),
            tracker: ProgressTracker::new(max_distance, drive_speed, auto_advance),
            evaluator: TriggerEvaluator::new(regions.policy, regions.sections, cues, max_distance),
            sequencer: ScreenSequencer::new(name, loading_secs, completion_secs),
        }
    }

    pub fn screen(&self) -> ScreenState {
        self.sequencer.state()
    }

    pub fn position(&self) -> JourneyPosition {
        self.tracker.position()
    }

    pub fn input(&self) -> InputState {
        self.input
    }

    pub fn pilot(&self) -> Option<&PilotName> {
        self.sequencer.pilot()
    }

    pub fn name_error(&self) -> Option<&NameError> {
        self.sequencer.name_error()
    }

    pub fn evaluator(&self) -> &TriggerEvaluator {
        &self.evaluator
    }

    pub fn set_progress_observer(&mut self, observer: impl FnMut(JourneyPosition) + 'static) {
        self.tracker.set_observer(observer);
    }

    /// Returns whether the key maps to a directional control.
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(control) = Control::from_key(key) else {
            return false;
        };
        self.input.press(control);
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(control) = Control::from_key(key) else {
            return false;
        };
        self.input.release(control);
        true
    }

    pub fn submit_name(&mut self, raw: &str) -> Result<&PilotName, SequencerError> {
        self.sequencer.submit_name(raw)
    }

    /// Advances the whole experience by `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> Frame<'_> {
        if self.sequencer.state() == ScreenState::Active {
            let step = self.tracker.advance(self.input, dt);
            if step.completed {
                match self.sequencer.journey_complete() {
                    Ok(screen) => debug!(?screen, "journey handed off"),
                    Err(err) => debug!(%err, "completion edge dropped"),
                }
            }
        } else if self.sequencer.tick(dt) == Some(ScreenState::Active) {
            info!(pilot = ?self.pilot().map(PilotName::as_str), "journey started");
            self.tracker.start_auto_advance();
        }
        self.frame()
    }

    /// Current output without advancing time.
    pub fn frame(&self) -> Frame<'_> {
        let screen = self.sequencer.state();
        let position = self.tracker.position();
        let Evaluation {
            active_regions,
            subtitle,
        } = if screen == ScreenState::Active {
            self.evaluator.evaluate(position)
        } else {
            Evaluation::default()
        };
        Frame {
            screen,
            position,
            progress: position.normalized(self.tracker.max_distance()),
            active_regions,
            subtitle,
        }
    }

    /// Resets every piece of session state back to name entry.
    pub fn restart(&mut self) -> Result<(), SequencerError> {
        self.sequencer.restart()?;
        self.tracker.reset();
        self.input = InputState::default();
        info!("experience restarted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AutoAdvanceConfig;

    fn controller() -> JourneyController {
        JourneyController::new(JourneyConfig {
            auto_advance: AutoAdvanceConfig {
                duration_secs: 0.0,
                step: 0.0,
            },
            ..JourneyConfig::default()
        })
        .unwrap()
    }

    fn drive_to_active(c: &mut JourneyController) {
        c.submit_name("ab").unwrap();
        let frame = c.tick(1.0);
        assert_eq!(frame.screen, ScreenState::Active);
    }

    #[test]
    fn keys_only_affect_mapped_controls() {
        let mut c = controller();
        assert!(c.key_down("w"));
        assert!(!c.key_down("q"));
        assert!(c.input().forward);
        assert!(c.key_up("ArrowUp"));
        assert!(!c.input().forward);
    }

    #[test]
    fn nothing_moves_before_active() {
        let mut c = controller();
        c.key_down("w");
        let frame = c.tick(5.0);
        assert_eq!(frame.screen, ScreenState::NameEntry);
        assert_eq!(frame.position, JourneyPosition::START);
        assert!(frame.active_regions.is_empty());
        assert_eq!(frame.subtitle, "");
    }

    #[test]
    fn active_frame_reports_regions_and_subtitle() {
        let mut c = controller();
        drive_to_active(&mut c);
        assert_eq!(c.frame().subtitle, "Welcome to my digital journey...");
        c.key_down("ArrowUp");
        let frame = c.tick(1.0);
        assert_eq!(frame.position.value(), 12.0);
        assert_eq!(frame.active_regions, vec!["skills"]);
        assert_eq!(frame.subtitle, "Welcome to my digital journey...");
        let frame = c.tick(1.0);
        assert_eq!(frame.subtitle, "Loading career.exe...");
    }

    #[test]
    fn held_keys_survive_loading() {
        let mut c = controller();
        c.submit_name("ab").unwrap();
        c.key_down("s");
        c.key_down("W");
        c.key_up("s");
        c.tick(1.0);
        assert_eq!(c.tick(0.5).position.value(), 6.0);
    }

    #[test]
    fn auto_advance_runs_on_entry() {
        let mut c = JourneyController::default();
        c.submit_name("ab").unwrap();
        c.tick(1.0);
        c.key_down("s");
        let frame = c.tick(0.016);
        assert!((frame.position.value() - 0.15).abs() < 1e-9);
    }

    #[test]
    fn completion_and_restart() {
        let mut c = controller();
        drive_to_active(&mut c);
        c.key_down("w");
        let frame = c.tick(20.0);
        assert_eq!(frame.screen, ScreenState::Completion);
        assert_eq!(frame.progress, 1.0);
        assert!(frame.active_regions.is_empty());
        assert_eq!(c.tick(3.0).screen, ScreenState::Redirect);
        c.restart().unwrap();
        let frame = c.frame();
        assert_eq!(frame.screen, ScreenState::NameEntry);
        assert_eq!(frame.position, JourneyPosition::START);
        assert_eq!(c.input(), InputState::default());
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = JourneyConfig {
            max_distance: f64::NAN,
            ..JourneyConfig::default()
        };
        assert!(matches!(
            JourneyController::new(config),
            Err(ConfigError::OutOfRange { field: "max_distance", .. })
        ));
    }

    #[test]
    fn auto_advance_can_finish_the_journey() {
        let mut c = JourneyController::new(JourneyConfig {
            auto_advance: AutoAdvanceConfig {
                duration_secs: 2.0,
                step: 100.0,
            },
            ..JourneyConfig::default()
        })
        .unwrap();
        c.submit_name("ab").unwrap();
        c.tick(1.0);
        c.key_down("s");
        assert_eq!(c.tick(0.25).position.value(), 100.0);
        let frame = c.tick(0.25);
        assert_eq!(frame.position.value(), 145.0);
        assert_eq!(frame.screen, ScreenState::Completion);
        assert_eq!(c.tick(0.25).position.value(), 145.0);
    }

    #[test]
    fn restart_only_from_redirect() {
        let mut c = controller();
        drive_to_active(&mut c);
        assert!(matches!(c.restart(), Err(SequencerError::Transition(_))));
        assert_eq!(c.screen(), ScreenState::Active);
    }
}
