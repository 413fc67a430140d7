//! Tunables for the journey, loadable from JSON.
//!
//! Every field has a default, so an empty object `{}` is a complete config.
//! ```json
//! { "max_distance": 145, "regions": { "policy": { "kind": "window" } } }
//! ```

use serde::{Deserialize, Serialize};

use crate::content::{default_cues, default_sections, Section, SubtitleCue};
use crate::error::ConfigError;
use crate::triggers::RegionPolicy;

/// Track length in distance units.
pub const MAX_DISTANCE: f64 = 145.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JourneyConfig {
    pub max_distance: f64,
    /// Units per second while a directional control is held.
    pub drive_speed: f64,
    pub auto_advance: AutoAdvanceConfig,
    pub loading_secs: f64,
    pub completion_secs: f64,
    pub name: NameRules,
    pub regions: RegionConfig,
    pub cues: Vec<SubtitleCue>,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            max_distance: MAX_DISTANCE,
            drive_speed: 12.0,
            auto_advance: AutoAdvanceConfig::default(),
            loading_secs: 1.0,
            completion_secs: 3.0,
            name: NameRules::default(),
            regions: RegionConfig::default(),
            cues: default_cues(),
        }
    }
}

/// Scripted intro drive on entering the journey.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoAdvanceConfig {
    pub duration_secs: f64,
    /// Distance added per tick, independent of frame time.
    pub step: f64,
}

impl Default for AutoAdvanceConfig {
    fn default() -> Self {
        Self {
            duration_secs: 2.0,
            step: 0.15,
        }
    }
}

/// Character bounds for the visitor name, counted after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameRules {
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for NameRules {
    fn default() -> Self {
        Self {
            min_len: 2,
            max_len: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    pub policy: RegionPolicy,
    pub sections: Vec<Section>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            policy: RegionPolicy::default(),
            sections: default_sections(),
        }
    }
}

impl JourneyConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_distance.is_finite() && self.max_distance > 0.0) {
            return Err(out_of_range("max_distance", "finite and > 0", self.max_distance));
        }
        non_negative("drive_speed", self.drive_speed)?;
        non_negative("auto_advance.duration_secs", self.auto_advance.duration_secs)?;
        non_negative("auto_advance.step", self.auto_advance.step)?;
        non_negative("loading_secs", self.loading_secs)?;
        non_negative("completion_secs", self.completion_secs)?;

        let NameRules { min_len, max_len } = self.name;
        if min_len == 0 || min_len > max_len {
            return Err(ConfigError::NameBounds {
                min: min_len,
                max: max_len,
            });
        }

        self.validate_policy()?;

        for (index, cue) in self.cues.iter().enumerate() {
            if !(0.0..=1.0).contains(&cue.threshold) {
                return Err(ConfigError::CueOutOfRange {
                    index,
                    threshold: cue.threshold,
                });
            }
        }
        if let Some(index) = self
            .cues
            .windows(2)
            .position(|w| w[1].threshold < w[0].threshold)
        {
            return Err(ConfigError::CuesUnordered { index: index + 1 });
        }
        Ok(())
    }

    fn validate_policy(&self) -> Result<(), ConfigError> {
        let many = self.regions.sections.len() > 1;
        match self.regions.policy {
            RegionPolicy::Level { base, step } => {
                non_negative("regions.policy.base", base)?;
                if many && !(step.is_finite() && step > 0.0) {
                    return Err(out_of_range("regions.policy.step", "finite and > 0", step));
                }
            }
            RegionPolicy::Window { base, step, width } => {
                non_negative("regions.policy.base", base)?;
                if !(width.is_finite() && width > 0.0) {
                    return Err(out_of_range("regions.policy.width", "finite and > 0", width));
                }
                if !(step.is_finite() && step > 0.0) {
                    return Err(out_of_range("regions.policy.step", "finite and > 0", step));
                }
                if many && width > step {
                    return Err(ConfigError::OverlappingWindows { step, width });
                }
            }
        }
        Ok(())
    }
}

fn out_of_range(field: &'static str, expected: &'static str, value: f64) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        expected,
        value,
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, "finite and >= 0", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = JourneyConfig::default();
        config.validate().unwrap();
        assert_eq!(config.max_distance, 145.0);
        assert_eq!(config.regions.policy, RegionPolicy::Level { base: 10.0, step: 15.0 });
    }

    #[test]
    fn empty_object_yields_defaults() {
        let config = JourneyConfig::from_json("{}").unwrap();
        assert_eq!(config, JourneyConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = JourneyConfig::from_json(
            r#"{ "loading_secs": 0.5, "regions": { "policy": { "kind": "window" } } }"#,
        )
        .unwrap();
        assert_eq!(config.loading_secs, 0.5);
        assert_eq!(
            config.regions.policy,
            RegionPolicy::Window { base: 20.0, step: 30.0, width: 20.0 }
        );
        assert_eq!(config.regions.sections.len(), 3);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            JourneyConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_bad_distance() {
        let err = JourneyConfig::from_json(r#"{ "max_distance": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "max_distance", .. }));
    }

    #[test]
    fn rejects_overlapping_windows() {
        let err = JourneyConfig::from_json(
            r#"{ "regions": { "policy": { "kind": "window", "base": 0, "step": 10, "width": 15 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::OverlappingWindows { .. }));
    }

    #[test]
    fn rejects_non_finite_window_step() {
        for step in [f64::NAN, f64::INFINITY, 0.0, -30.0] {
            let mut config = JourneyConfig::default();
            config.regions.policy = RegionPolicy::Window { base: 20.0, step, width: 20.0 };
            let err = config.validate().unwrap_err();
            assert!(
                matches!(err, ConfigError::OutOfRange { field: "regions.policy.step", .. }),
                "step {step}: {err}"
            );
        }
    }

    #[test]
    fn rejects_unordered_cues() {
        let err = JourneyConfig::from_json(
            r#"{ "cues": [ { "threshold": 0.5, "text": "b" }, { "threshold": 0.1, "text": "a" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::CuesUnordered { index: 1 }));

        let err = JourneyConfig::from_json(r#"{ "cues": [ { "threshold": 1.5, "text": "x" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::CueOutOfRange { index: 0, .. }));
    }

    #[test]
    fn rejects_bad_name_bounds() {
        let err = JourneyConfig::from_json(r#"{ "name": { "min_len": 5, "max_len": 3 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NameBounds { min: 5, max: 3 }));
    }
}
