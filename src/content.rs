//! Portfolio payloads and narrative cues.

use serde::{Deserialize, Serialize};

/// Seconds between the reveal animations of consecutive overlays.
pub const REVEAL_STAGGER_SECS: f64 = 0.8;

/// Screen anchor of an overlay, in percent of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x_percent: f64,
    pub y_percent: f64,
}

/// One hologram overlay of portfolio content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub lines: Vec<String>,
    pub anchor: Anchor,
}

/// A narrative subtitle shown from `threshold` (fraction of the track) onward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    pub threshold: f64,
    pub text: String,
}

/// Delay before the overlay at `index` starts its reveal animation.
pub fn reveal_delay(index: usize) -> f64 {
    index as f64 * REVEAL_STAGGER_SECS
}

fn section(id: &str, title: &str, lines: &[&str], x_percent: f64, y_percent: f64) -> Section {
    Section {
        id: id.to_owned(),
        title: title.to_owned(),
        lines: lines.iter().map(|l| (*l).to_owned()).collect(),
        anchor: Anchor {
            x_percent,
            y_percent,
        },
    }
}

pub fn default_sections() -> Vec<Section> {
    vec![
        section(
            "skills",
            "SKILLS.EXE",
            &[
                "JavaScript / TypeScript / React",
                "Node.js / Python / MongoDB",
                "Three.js / React-Three-Fiber",
                "GSAP / CSS Animations",
                "Git / Docker / AWS",
            ],
            5.0,
            5.0,
        ),
        section(
            "projects",
            "PROJECTS.SYS",
            &[
                "3D Portfolio Experience",
                "E-commerce Platform",
                "Real-time Chat Application",
                "Data Visualization Dashboard",
            ],
            65.0,
            5.0,
        ),
        section(
            "experience",
            "EXPERIENCE.LOG",
            &[
                "Full Stack Developer (2+ years)",
                "Frontend Specialist",
                "3D Web Developer",
                "UI/UX Designer",
            ],
            35.0,
            5.0,
        ),
    ]
}

pub fn default_cues() -> Vec<SubtitleCue> {
    [
        (0.0, "Welcome to my digital journey..."),
        (0.1, "Loading career.exe..."),
        (0.2, "Initiating skill protocols..."),
        (0.3, "My journey began with curiosity and code..."),
        (0.4, "Learning new technologies, one commit at a time..."),
        (0.5, "Building projects that solve real problems..."),
        (0.6, "Collaborating with amazing teams..."),
        (0.7, "Growing from challenges and failures..."),
        (0.8, "Mastering the art of clean code..."),
        (0.9, "Ready for the next adventure..."),
        (0.95, "Journey complete. Thank you for traveling with me."),
    ]
    .into_iter()
    .map(|(threshold, text)| SubtitleCue {
        threshold,
        text: text.to_owned(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_are_populated() {
        let sections = default_sections();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].title, "SKILLS.EXE");
        assert_eq!(sections[2].anchor.x_percent, 35.0);

        let cues = default_cues();
        assert_eq!(cues.len(), 11);
        assert!(cues.windows(2).all(|w| w[0].threshold <= w[1].threshold));
    }

    #[test]
    fn reveal_is_staggered() {
        assert_eq!(reveal_delay(0), 0.0);
        assert!((reveal_delay(2) - 1.6).abs() < 1e-12);
    }
}
