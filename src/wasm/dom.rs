//! Page lookups and the per-frame DOM update.

use js_sys::{Reflect, JSON};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::config::JourneyConfig;
use crate::content::reveal_delay;
use crate::journey::Frame;
use crate::screen::ScreenState;
use crate::triggers::ContentRegion;

pub const CONFIG_ID: &str = "journey-config";
pub const CONFIG_GLOBAL: &str = "JOURNEY_CONFIG";

pub fn by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("#{id} not found")))
}

/// Reads the inline JSON config, else a `globalThis.JOURNEY_CONFIG` object,
/// falling back to defaults.
pub fn read_config(document: &Document) -> JourneyConfig {
    let Some(text) = inline_config(document).or_else(global_config) else {
        return JourneyConfig::default();
    };
    JourneyConfig::from_json(&text).unwrap_or_else(|err| {
        warn!(%err, "ignoring supplied config, using defaults");
        JourneyConfig::default()
    })
}

fn inline_config(document: &Document) -> Option<String> {
    document
        .get_element_by_id(CONFIG_ID)
        .and_then(|el| el.text_content())
}

fn global_config() -> Option<String> {
    let value = Reflect::get(&js_sys::global(), &JsValue::from_str(CONFIG_GLOBAL)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    JSON::stringify(&value).ok().map(String::from)
}

/// Handles to every element the frame loop writes to.
pub struct Views {
    screens: Vec<(ScreenState, Element)>,
    regions: Vec<(String, Element)>,
    subtitle: Element,
    name_error: Element,
    pilot: Element,
    shown: Option<ScreenState>,
}

impl Views {
    pub fn mount(document: &Document, regions: &[ContentRegion]) -> Result<Self, JsValue> {
        let screens = ScreenState::ALL
            .iter()
            .map(|&screen| Ok((screen, by_id(document, screen.view_id())?)))
            .collect::<Result<Vec<_>, JsValue>>()?;

        let container = by_id(document, "regions")?;
        let regions = regions
            .iter()
            .enumerate()
            .map(|(index, region)| {
                let el = hologram(document, index, region)?;
                container.append_child(&el)?;
                Ok((region.id().to_owned(), el))
            })
            .collect::<Result<Vec<_>, JsValue>>()?;

        Ok(Self {
            screens,
            regions,
            subtitle: by_id(document, "subtitle")?,
            name_error: by_id(document, "name-error")?,
            pilot: by_id(document, "pilot")?,
            shown: None,
        })
    }

    pub fn show_name_error(&self, message: Option<&str>) -> Result<(), JsValue> {
        self.name_error.set_text_content(message);
        self.name_error
            .toggle_attribute_with_force("hidden", message.is_none())?;
        Ok(())
    }

    pub fn set_pilot(&self, name: Option<&str>) {
        self.pilot.set_text_content(name);
    }

    pub fn apply(&mut self, frame: &Frame<'_>) -> Result<(), JsValue> {
        if self.shown != Some(frame.screen) {
            for (screen, el) in &self.screens {
                el.toggle_attribute_with_force("hidden", *screen != frame.screen)?;
            }
            self.shown = Some(frame.screen);
        }

        for (id, el) in &self.regions {
            let active = frame.active_regions.contains(&id.as_str());
            el.class_list().toggle_with_force("active", active)?;
        }

        if self.subtitle.text_content().as_deref() != Some(frame.subtitle) {
            self.subtitle.set_text_content(Some(frame.subtitle));
        }
        self.subtitle
            .class_list()
            .toggle_with_force("visible", !frame.subtitle.is_empty())?;
        Ok(())
    }
}

fn hologram(document: &Document, index: usize, region: &ContentRegion) -> Result<Element, JsValue> {
    let section = &region.section;
    let el = document.create_element("div")?;
    el.set_id(&format!("region-{}", section.id));
    el.set_class_name("hologram");

    let style = el.dyn_ref::<HtmlElement>().ok_or("hologram is not an HtmlElement")?.style();
    style.set_property("left", &format!("{}%", section.anchor.x_percent))?;
    style.set_property("top", &format!("{}%", section.anchor.y_percent))?;
    style.set_property("transition-delay", &format!("{}s", reveal_delay(index)))?;

    let title = document.create_element("h3")?;
    title.set_text_content(Some(&section.title));
    el.append_child(&title)?;

    let list = document.create_element("ul")?;
    for line in &section.lines {
        let item = document.create_element("li")?;
        item.set_text_content(Some(line));
        list.append_child(&item)?;
    }
    el.append_child(&list)?;
    Ok(el)
}
