//! Position-driven overlay visibility and subtitle lookup.
//!
//! Both are pure functions of the current [`JourneyPosition`]; nothing here
//! remembers earlier ticks.

use serde::{Deserialize, Serialize};

use crate::content::{Section, SubtitleCue};
use crate::tracker::JourneyPosition;

/// How region trigger ranges are derived from their table index.
///
/// One policy governs the whole table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionPolicy {
    /// Region `i` shows from `base + i * step` to the end of the journey.
    Level {
        #[serde(default = "level_base")]
        base: f64,
        #[serde(default = "level_step")]
        step: f64,
    },
    /// Region `i` shows only inside `[base + i * step, base + i * step + width)`.
    Window {
        #[serde(default = "window_base")]
        base: f64,
        #[serde(default = "window_step")]
        step: f64,
        #[serde(default = "window_width")]
        width: f64,
    },
}

fn level_base() -> f64 {
    10.0
}

fn level_step() -> f64 {
    15.0
}

fn window_base() -> f64 {
    20.0
}

fn window_step() -> f64 {
    30.0
}

fn window_width() -> f64 {
    20.0
}

impl Default for RegionPolicy {
    fn default() -> Self {
        Self::level()
    }
}

impl RegionPolicy {
    pub fn level() -> Self {
        Self::Level {
            base: level_base(),
            step: level_step(),
        }
    }

    pub fn window() -> Self {
        Self::Window {
            base: window_base(),
            step: window_step(),
            width: window_width(),
        }
    }

    /// `(trigger_start, trigger_end)` for the region at `index`.
    pub fn range(&self, index: usize) -> (f64, Option<f64>) {
        let i = index as f64;
        match *self {
            Self::Level { base, step } => (base + i * step, None),
            Self::Window { base, step, width } => {
                let start = base + i * step;
                (start, Some(start + width))
            }
        }
    }
}

/// A section together with the position range that reveals it.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRegion {
    pub trigger_start: f64,
    pub trigger_end: Option<f64>,
    pub section: Section,
}

impl ContentRegion {
    pub fn id(&self) -> &str {
        &self.section.id
    }

    /// Regions stay hidden until the car has left the start line.
    pub fn is_active(&self, p: JourneyPosition) -> bool {
        let p = p.value();
        if p <= 0.0 || p < self.trigger_start {
            return false;
        }
        match self.trigger_end {
            Some(end) => p < end,
            None => true,
        }
    }
}

/// What the renderer should show for one position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation<'a> {
    /// Ids of visible regions, in table order.
    pub active_regions: Vec<&'a str>,
    /// Current subtitle; empty when no cue applies.
    pub subtitle: &'a str,
}

#[derive(Debug, Clone)]
pub struct TriggerEvaluator {
    policy: RegionPolicy,
    regions: Vec<ContentRegion>,
    cues: Vec<SubtitleCue>,
    max_distance: f64,
}

impl TriggerEvaluator {
    /// `cues` must be ordered by non-decreasing threshold.
    pub fn new(
        policy: RegionPolicy,
        sections: Vec<Section>,
        cues: Vec<SubtitleCue>,
        max_distance: f64,
    ) -> Self {
        let regions = sections
            .into_iter()
            .enumerate()
            .map(|(index, section)| {
                let (trigger_start, trigger_end) = policy.range(index);
                ContentRegion {
                    trigger_start,
                    trigger_end,
                    section,
                }
            })
            .collect();
        Self {
            policy,
            regions,
            cues,
            max_distance,
        }
    }

    pub fn policy(&self) -> RegionPolicy {
        self.policy
    }

    pub fn regions(&self) -> &[ContentRegion] {
        &self.regions
    }

    pub fn evaluate(&self, p: JourneyPosition) -> Evaluation<'_> {
        Evaluation {
            active_regions: self
                .regions
                .iter()
                .filter(|r| r.is_active(p))
                .map(ContentRegion::id)
                .collect(),
            subtitle: self
                .cue_at(p.normalized(self.max_distance))
                .map_or("", |cue| cue.text.as_str()),
        }
    }

    /// The cue with the highest threshold not above `fraction`.
    pub fn cue_at(&self, fraction: f64) -> Option<&SubtitleCue> {
        self.cues.iter().rev().find(|cue| cue.threshold <= fraction)
    }
}
