//! DOM side of the cursor follower.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, MouseEvent};

use super::frame;
use super::host::float_away;
use super::timers::now_ms;
use crate::animation::AnimationLoop;
use crate::cursor::{CursorHost, CursorSpark, CursorTrail, SPARK_LIFE_MS};
use crate::error::PageError;
use crate::surface::HeadlessSurface;

const CURSOR_ID: &str = "cursorTrail";

pub struct DomCursorHost {
    doc: Document,
    cursor: HtmlElement,
}

impl CursorHost for DomCursorHost {
    fn place_cursor(&self, x: f64, y: f64) {
        let style = self.cursor.style();
        let _ = style.set_property("left", &format!("{x:.1}px"));
        let _ = style.set_property("top", &format!("{y:.1}px"));
    }

    fn show_cursor(&self, visible: bool) {
        let _ = self
            .cursor
            .style()
            .set_property("opacity", if visible { "1" } else { "0" });
    }

    fn spawn_spark(&self, spark: CursorSpark) {
        let css = format!(
            "position:fixed; pointer-events:none; z-index:9997; \
             width:5px; height:5px; border-radius:50%; background:{color}; \
             left:{x:.1}px; top:{y:.1}px; transform:translate(-50%,-50%); \
             box-shadow:0 0 8px 2px currentColor; \
             transition:opacity 0.6s ease, transform 0.6s ease; opacity:0.85;",
            color = spark.color,
            x = spark.x,
            y = spark.y,
        );
        let end = format!("translate({:.1}px, {:.1}px) scale(0)", spark.dx, spark.dy);
        float_away(&self.doc, &css, None, end, SPARK_LIFE_MS);
    }
}

/// Follow the pointer with `#cursorTrail` for the page's lifetime.
pub fn start(doc: &Document) -> Result<(), PageError> {
    let cursor: HtmlElement = doc
        .get_element_by_id(CURSOR_ID)
        .ok_or(PageError::MissingElement(CURSOR_ID))?
        .dyn_into()
        .map_err(|_| PageError::MissingElement(CURSOR_ID))?;
    let host = DomCursorHost {
        doc: doc.clone(),
        cursor,
    };
    let trail = Rc::new(RefCell::new(AnimationLoop::endless(CursorTrail::new(host))));

    let moved = trail.clone();
    let on_move = Closure::wrap(Box::new(move |evt: MouseEvent| {
        moved
            .borrow_mut()
            .effect_mut()
            .pointer_moved(evt.client_x() as f64, evt.client_y() as f64, now_ms());
    }) as Box<dyn FnMut(MouseEvent)>);
    doc.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    for (event, entered) in [("mouseleave", false), ("mouseenter", true)] {
        let toggled = trail.clone();
        let on_edge = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            let trail = toggled.borrow();
            if entered {
                trail.effect().pointer_entered();
            } else {
                trail.effect().pointer_left();
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        doc.add_event_listener_with_callback(event, on_edge.as_ref().unchecked_ref())?;
        on_edge.forget();
    }

    // The follower positions an element; nothing is painted on a canvas.
    let mut idle = HeadlessSurface::new(0.0, 0.0);
    let _ = frame::run(move |_ts| trail.borrow_mut().tick(&mut idle));
    Ok(())
}
