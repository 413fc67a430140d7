//! Property-based tests for the tracker, trigger tables and name validation.

#![cfg(not(target_arch = "wasm32"))]

use journey_wasm::config::{AutoAdvanceConfig, NameRules};
use journey_wasm::content::{default_cues, default_sections};
use journey_wasm::{
    Control, InputState, JourneyPosition, PilotName, ProgressTracker, RegionPolicy,
    TriggerEvaluator, MAX_DISTANCE,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// One tick: held controls and a frame delta, occasionally a long stall.
fn tick() -> impl Strategy<Value = (InputState, f64)> {
    (any::<bool>(), any::<bool>(), prop_oneof![0.0..0.05f64, 0.0..5.0f64]).prop_map(
        |(forward, backward, dt)| (InputState { forward, backward }, dt),
    )
}

fn ticks() -> impl Strategy<Value = Vec<(InputState, f64)>> {
    prop::collection::vec(tick(), 0..300)
}

fn tracker(auto: bool) -> ProgressTracker {
    let mut t = ProgressTracker::new(
        MAX_DISTANCE,
        12.0,
        AutoAdvanceConfig {
            duration_secs: 2.0,
            step: 0.15,
        },
    );
    if auto {
        t.start_auto_advance();
    }
    t
}

fn evaluator(policy: RegionPolicy) -> TriggerEvaluator {
    TriggerEvaluator::new(policy, default_sections(), default_cues(), MAX_DISTANCE)
}

fn position() -> impl Strategy<Value = JourneyPosition> {
    (-20.0..MAX_DISTANCE + 20.0).prop_map(|p| JourneyPosition::clamped(p, MAX_DISTANCE))
}

// ============================================================================
// Progress tracker
// ============================================================================

proptest! {
    /// Position stays on the track whatever is held and for however long.
    #[test]
    fn position_is_clamped(auto in any::<bool>(), steps in ticks()) {
        let mut t = tracker(auto);
        for (input, dt) in steps {
            let p = t.advance(input, dt).position.value();
            prop_assert!((0.0..=MAX_DISTANCE).contains(&p), "p = {}", p);
        }
    }

    /// The completion edge fires exactly once iff the end was ever reached.
    #[test]
    fn completion_fires_at_most_once(auto in any::<bool>(), steps in ticks()) {
        let mut t = tracker(auto);
        let mut fired = 0;
        let mut reached = false;
        for (input, dt) in steps {
            let step = t.advance(input, dt);
            reached |= step.position.value() >= MAX_DISTANCE;
            if step.completed {
                fired += 1;
                prop_assert!(step.position.value() >= MAX_DISTANCE);
            }
        }
        prop_assert_eq!(fired, usize::from(reached));
    }

    /// Holding forward at the end of the track changes nothing.
    #[test]
    fn forward_at_end_is_noop(dt in 0.0..10.0f64, backward in any::<bool>()) {
        let mut t = tracker(false);
        let mut input = InputState::default();
        input.press(Control::Forward);
        t.advance(input, 60.0);
        prop_assert_eq!(t.position().value(), MAX_DISTANCE);

        let held = InputState { forward: true, backward };
        let before = t.position();
        let after = t.advance(held, dt).position;
        if backward {
            prop_assert_eq!(after, before);
        } else {
            prop_assert_eq!(after.value(), MAX_DISTANCE);
        }
    }
}

// ============================================================================
// Trigger evaluator
// ============================================================================

proptest! {
    /// Subtitle thresholds never go backwards as the car moves forward.
    #[test]
    fn subtitle_is_monotone(mut ps in prop::collection::vec(position(), 1..100)) {
        ps.sort_by(|a, b| a.value().total_cmp(&b.value()));
        let e = evaluator(RegionPolicy::level());
        let thresholds: Vec<f64> = ps
            .iter()
            .map(|p| e.cue_at(p.normalized(MAX_DISTANCE)).map_or(-1.0, |c| c.threshold))
            .collect();
        prop_assert!(thresholds.windows(2).all(|w| w[0] <= w[1]), "{:?}", thresholds);
    }

    /// Under the window policy at most one region shows, and only inside its window.
    #[test]
    fn window_regions_are_exclusive(p in position()) {
        let e = evaluator(RegionPolicy::window());
        let active = e.evaluate(p).active_regions;
        prop_assert!(active.len() <= 1);
        for id in active {
            let region = e.regions().iter().find(|r| r.id() == id).unwrap();
            let end = region.trigger_end.unwrap();
            prop_assert!(region.trigger_start <= p.value() && p.value() < end);
        }
    }

    /// Under the level policy a revealed region stays revealed further along.
    #[test]
    fn level_regions_accumulate(a in position(), b in position()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let e = evaluator(RegionPolicy::level());
        let early = e.evaluate(lo).active_regions;
        let late = e.evaluate(hi).active_regions;
        for id in early {
            prop_assert!(late.contains(&id), "{} lost between {:?} and {:?}", id, lo, hi);
        }
    }
}

// ============================================================================
// Name validation
// ============================================================================

proptest! {
    /// Acceptance depends only on the trimmed character count.
    #[test]
    fn name_acceptance_matches_trimmed_length(raw in "[ \\t]{0,3}[a-zA-Z0-9_ ßéñøÅçÄﬁŉ]{0,16}[ \\t]{0,3}") {
        let rules = NameRules::default();
        let len = raw.trim().chars().count();
        match PilotName::parse(&raw, rules) {
            Ok(name) => {
                prop_assert!(len >= rules.min_len);
                prop_assert!(name.as_str().chars().count() <= rules.max_len);
                prop_assert_eq!(name.as_str(), name.as_str().to_uppercase());
            }
            Err(_) => prop_assert!(len < rules.min_len),
        }
    }
}
