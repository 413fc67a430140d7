use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent,
    WebGl2RenderingContext as GL,
};

use super::dom::{by_id, Views};
use crate::error::SequencerError;
use crate::journey::JourneyController;
use crate::screen::{PilotName, ScreenState};

/// Longest frame delta fed to the controller; covers tab switches.
const MAX_FRAME_SECS: f64 = 0.1;

struct Shell {
    controller: JourneyController,
    views: Views,
    last_ts: Option<f64>,
}

impl Shell {
    fn submit_name(&mut self, raw: &str) -> Result<(), JsValue> {
        match self.controller.submit_name(raw) {
            Ok(name) => {
                self.views.set_pilot(Some(name.as_str()));
                self.views.show_name_error(None)
            }
            Err(SequencerError::Name(err)) => self.views.show_name_error(Some(&err.to_string())),
            Err(SequencerError::Transition(err)) => {
                warn!(%err, "name submit ignored");
                Ok(())
            }
        }
    }

    fn restart(&mut self) {
        match self.controller.restart() {
            Ok(()) => self.views.set_pilot(self.controller.pilot().map(PilotName::as_str)),
            Err(err) => warn!(%err, "restart ignored"),
        }
    }

    fn frame(&mut self, ts: f64, gl: &GL) -> Result<(), JsValue> {
        let dt = self
            .last_ts
            .map_or(0.0, |last| ((ts - last) / 1000.0).clamp(0.0, MAX_FRAME_SECS));
        self.last_ts = Some(ts);

        let Shell {
            controller, views, ..
        } = self;
        let frame = controller.tick(dt);
        views.apply(&frame)?;

        let [r, g, b, a] = backdrop(frame.screen, frame.progress);
        gl.clear_color(r, g, b, a);
        gl.clear(GL::COLOR_BUFFER_BIT);
        Ok(())
    }
}

/// Clear colour standing in for the scene: a function of screen and progress only.
fn backdrop(screen: ScreenState, progress: f64) -> [f32; 4] {
    let t = progress.clamp(0.0, 1.0) as f32;
    match screen {
        ScreenState::NameEntry | ScreenState::Redirect => [0.0, 0.0, 0.0, 1.0],
        ScreenState::Loading => [0.0, 0.06, 0.0, 1.0],
        ScreenState::Active => [0.05 + 0.30 * t, 0.0, 0.15 + 0.10 * t, 1.0],
        ScreenState::Completion => [0.0, 0.05, 0.08, 1.0],
    }
}

fn listen<E: FromWasmAbi + 'static>(
    target: &web_sys::EventTarget,
    kind: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

/// Mount the shell and start the frame loop.
pub fn start(
    document: &Document,
    canvas: HtmlCanvasElement,
    mut controller: JourneyController,
) -> Result<(), JsValue> {
    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or("WebGL2 not supported")?
        .dyn_into()?;
    let win = window().ok_or("no window")?;

    // Resize canvas to fit window
    {
        let canvas = canvas.clone();
        listen(&win, "resize", move |_: web_sys::Event| {
            let Some(w) = window() else { return };
            let width = w.inner_width().ok().and_then(|v| v.as_f64());
            let height = w.inner_height().ok().and_then(|v| v.as_f64());
            if let (Some(width), Some(height)) = (width, height) {
                canvas.set_width(width as u32);
                canvas.set_height(height as u32);
            }
        })?;
    }

    let odometer = by_id(document, "odometer")?;
    controller.set_progress_observer(move |p| {
        odometer.set_text_content(Some(&format!("{:05.1}", p.value())));
    });

    let views = Views::mount(document, controller.evaluator().regions())?;
    let shell = Rc::new(RefCell::new(Shell {
        controller,
        views,
        last_ts: None,
    }));

    for (kind, pressed) in [("keydown", true), ("keyup", false)] {
        let shell = Rc::clone(&shell);
        listen(&win, kind, move |event: KeyboardEvent| {
            let mut shell = shell.borrow_mut();
            if shell.controller.screen() == ScreenState::NameEntry {
                return;
            }
            let key = event.key();
            let handled = if pressed {
                shell.controller.key_down(&key)
            } else {
                shell.controller.key_up(&key)
            };
            if handled {
                event.prevent_default();
            }
        })?;
    }

    let name_input: HtmlInputElement = by_id(document, "name-input")?.dyn_into()?;
    {
        let shell = Rc::clone(&shell);
        let input = name_input.clone();
        listen(&name_input, "keydown", move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                if let Err(err) = shell.borrow_mut().submit_name(&input.value()) {
                    warn!(?err, "name submit failed");
                }
            }
        })?;
    }
    {
        let shell = Rc::clone(&shell);
        listen(&by_id(document, "launch")?, "click", move |_: web_sys::Event| {
            if let Err(err) = shell.borrow_mut().submit_name(&name_input.value()) {
                warn!(?err, "name submit failed");
            }
        })?;
    }
    {
        let shell = Rc::clone(&shell);
        listen(&by_id(document, "restart")?, "click", move |_: web_sys::Event| {
            shell.borrow_mut().restart();
        })?;
    }

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        if let Err(err) = shell.borrow_mut().frame(ts, &gl) {
            warn!(?err, "frame update failed");
        }

        // schedule next
        let scheduled = window().ok_or(JsValue::from_str("no window")).and_then(|w| {
            let next = f.borrow();
            let callback = next.as_ref().ok_or("frame loop dropped")?;
            w.request_animation_frame(callback.as_ref().unchecked_ref())
        });
        if let Err(err) = scheduled {
            warn!(?err, "frame loop stopped");
        }
    }) as Box<dyn FnMut(f64)>));

    let first = g.borrow();
    let callback = first.as_ref().ok_or("frame loop missing")?;
    win.request_animation_frame(callback.as_ref().unchecked_ref())?;
    debug!("frame loop started");

    Ok(())
}
