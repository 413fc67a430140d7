//! Interactive resume journey: a keyboard-driven drive along a fixed track
//! that reveals portfolio overlays and narrative subtitles, framed by a
//! linear sequence of screens.
//!
//! The core modules are platform independent and drive everything from
//! discrete ticks and key events. The browser shell under `wasm` mounts them
//! on a page.

pub mod config;
pub mod content;
pub mod error;
pub mod input;
pub mod journey;
pub mod screen;
mod timer;
pub mod tracker;
pub mod triggers;

pub use config::{JourneyConfig, MAX_DISTANCE};
pub use error::{ConfigError, NameError, SequencerError, TransitionError};
pub use input::{Control, InputState};
pub use journey::{Frame, JourneyController};
pub use screen::{PilotName, ScreenSequencer, ScreenState};
pub use tracker::{JourneyPosition, ProgressTracker, TrackerStep};
pub use triggers::{ContentRegion, Evaluation, RegionPolicy, TriggerEvaluator};

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::journey::JourneyController;

    mod console;
    mod dom;
    mod render;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
        console::init_tracing();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        // Pages without the journey markup (e.g. test harnesses) just load the module.
        let Some(canvas) = document.get_element_by_id("c") else {
            tracing::debug!("no #c canvas, shell not mounted");
            return Ok(());
        };
        let canvas = canvas.dyn_into::<web_sys::HtmlCanvasElement>()?;

        let controller = JourneyController::new(dom::read_config(&document))
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        render::start(&document, canvas, controller)?;
        Ok(())
    }
}
