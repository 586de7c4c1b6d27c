//! DOM side of the grand overlay.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlAudioElement, HtmlElement, MouseEvent, window};

use super::timers;
use crate::confetti::{MusicNote, NOTE_LIFE_MS, NoteHost};
use crate::error::PageError;
use crate::overlay::{EmojiDrop, OverlayHost};

pub const OVERLAY_ID: &str = "grandOverlay";
const MESSAGE_ID: &str = "grandMessage";
const RAIN_ID: &str = "emojiRain";
const AUDIO_ID: &str = "bgMusic";

pub struct DomOverlayHost {
    doc: Document,
    overlay: HtmlElement,
    message: Option<Element>,
    rain: Option<Element>,
    audio: Option<HtmlAudioElement>,
    dismiss: Closure<dyn FnMut(MouseEvent)>,
    armed: bool,
}

impl DomOverlayHost {
    /// `on_dismiss` runs for a click on the overlay while dismissal is armed.
    pub fn new(doc: &Document, on_dismiss: impl FnMut() + 'static) -> Result<Self, PageError> {
        let overlay: HtmlElement = doc
            .get_element_by_id(OVERLAY_ID)
            .ok_or(PageError::MissingElement(OVERLAY_ID))?
            .dyn_into()
            .map_err(|_| PageError::MissingElement(OVERLAY_ID))?;
        let audio = doc
            .get_element_by_id(AUDIO_ID)
            .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok());
        let mut on_dismiss = on_dismiss;
        let dismiss = Closure::wrap(Box::new(move |_evt: MouseEvent| on_dismiss())
            as Box<dyn FnMut(MouseEvent)>);
        Ok(Self {
            doc: doc.clone(),
            overlay,
            message: doc.get_element_by_id(MESSAGE_ID),
            rain: doc.get_element_by_id(RAIN_ID),
            audio,
            dismiss,
            armed: false,
        })
    }
}

fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

impl OverlayHost for DomOverlayHost {
    fn show_overlay(&mut self, visible: bool) {
        set_class(&self.overlay, "active", visible);
        let _ = self
            .overlay
            .set_attribute("aria-hidden", if visible { "false" } else { "true" });
    }

    fn show_message(&mut self, visible: bool) {
        if let Some(msg) = &self.message {
            set_class(msg, "visible", visible);
        }
    }

    fn spawn_emoji(&mut self, drop: EmojiDrop) {
        let Some(rain) = &self.rain else { return };
        let Ok(el) = self.doc.create_element("span") else {
            return;
        };
        el.set_class_name("emoji-drop");
        el.set_text_content(Some(drop.glyph));
        let _ = el.set_attribute(
            "style",
            &format!(
                "left:{:.1}%; font-size:{:.2}rem; animation-duration:{:.2}s;",
                drop.left_pct, drop.size_rem, drop.fall_secs
            ),
        );
        if rain.append_child(&el).is_ok() {
            let _ = timers::after(drop.fall_secs * 1_000.0 + 200.0, move || el.remove());
        }
    }

    fn clear_emoji(&mut self) {
        if let Some(rain) = &self.rain {
            rain.set_inner_html("");
        }
    }

    fn start_confetti(&mut self) {
        super::page::launch_confetti();
    }

    fn ensure_audio(&mut self, volume: f64) {
        let Some(audio) = &self.audio else { return };
        if !audio.paused() {
            return;
        }
        audio.set_volume(volume);
        if let Ok(promise) = audio.play() {
            // Autoplay policy rejections are expected; the next gesture retries.
            let ignore = Closure::wrap(Box::new(|_err: JsValue| {
                log::debug!("audio: play() rejected");
            }) as Box<dyn FnMut(JsValue)>);
            let _ = promise.catch(&ignore);
            ignore.forget();
        }
    }

    fn arm_dismiss(&mut self) {
        if self.armed {
            return;
        }
        if self
            .overlay
            .add_event_listener_with_callback("click", self.dismiss.as_ref().unchecked_ref())
            .is_ok()
        {
            self.armed = true;
        }
    }

    fn disarm_dismiss(&mut self) {
        if !self.armed {
            return;
        }
        let _ = self
            .overlay
            .remove_event_listener_with_callback("click", self.dismiss.as_ref().unchecked_ref());
        self.armed = false;
    }
}

/// Append a free-floating element to the body and remove it after `life_ms`. Its
/// CSS transition toward `transform` starts on the next frame.
pub(super) fn float_away(
    doc: &Document,
    css: &str,
    text: Option<&str>,
    transform: String,
    life_ms: f64,
) {
    let Some(body) = doc.body() else { return };
    let Ok(el) = doc.create_element(if text.is_some() { "span" } else { "div" }) else {
        return;
    };
    let Ok(el) = el.dyn_into::<HtmlElement>() else { return };
    el.set_text_content(text);
    let _ = el.set_attribute("style", css);
    if body.append_child(&el).is_err() {
        return;
    }
    let moving = el.clone();
    let start = Closure::once_into_js(move || {
        let style = moving.style();
        let _ = style.set_property("transform", &transform);
        let _ = style.set_property("opacity", "0");
    });
    if let Some(win) = window() {
        let _ = win.request_animation_frame(start.unchecked_ref());
    }
    let _ = timers::after(life_ms, move || el.remove());
}

/// Music notes around the surprise button.
pub struct DomNoteHost {
    doc: Document,
    button: Element,
}

impl DomNoteHost {
    pub fn find(doc: &Document) -> Option<Self> {
        let button = doc.get_element_by_id("surpriseBtn")?;
        Some(Self {
            doc: doc.clone(),
            button,
        })
    }
}

impl NoteHost for DomNoteHost {
    fn origin(&self) -> Option<(f64, f64)> {
        let rect = self.button.get_bounding_client_rect();
        Some((
            rect.left() + rect.width() / 2.0,
            rect.top() + rect.height() / 2.0,
        ))
    }

    fn spawn_note(&self, (x, y): (f64, f64), note: &MusicNote) {
        let css = format!(
            "position:fixed; left:{x:.1}px; top:{y:.1}px; font-size:{:.2}rem; \
             pointer-events:none; z-index:9997; opacity:1; \
             transition:all {:.2}s cubic-bezier(0.34,1.56,0.64,1);",
            note.size_rem, note.flight_secs
        );
        let end = format!("translate({:.1}px, {:.1}px) scale(1.5)", note.dx, note.dy);
        float_away(&self.doc, &css, Some(note.glyph), end, NOTE_LIFE_MS);
    }
}
