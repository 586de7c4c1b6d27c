//! Page bootstrap and the gesture entry points exported to JS.
//!
//! `start_page` looks up every element the effects need, starts the background
//! loops and installs the listeners. Each effect is wired independently: a missing
//! element only disables that effect, with a warning in the console.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MouseEvent, Window, window,
};

use super::canvas::CanvasSurface;
use super::frame::{self, FrameHandle};
use super::cursor;
use super::host::{DomNoteHost, DomOverlayHost};
use super::timers::{self, now_ms};
use crate::animation::{AnimationLoop, LoopStatus};
use crate::candles::{CandleController, Celebration};
use crate::confetti::{ConfettiDriver, burst_notes};
use crate::error::PageError;
use crate::overlay::GrandOverlay;
use crate::particles::ParticleField;
use crate::surface::Surface;
use crate::tier::RenderQualityTier;

/// Pause between the last candle catching and the finale.
pub const CELEBRATION_DELAY_MS: f64 = 300.0;
/// Fraction of the cake section that must be visible to start lighting.
const CAKE_VISIBLE_THRESHOLD: f64 = 0.4;

struct Cake {
    controller: CandleController,
    elements: Vec<Element>,
}

impl Cake {
    fn render(&self, idx: usize) {
        let Some(el) = self.elements.get(idx) else { return };
        let lit = self.controller.candles().is_lit(idx);
        let flag = if lit { "true" } else { "false" };
        let _ = el.class_list().toggle_with_force("lit", lit);
        let _ = el.set_attribute("data-lit", flag);
        let _ = el.set_attribute("aria-pressed", flag);
    }
}

struct OverlayRig {
    overlay: GrandOverlay<CanvasSurface, DomOverlayHost>,
    frames: Option<FrameHandle>,
}

struct ConfettiRig {
    surface: CanvasSurface,
    run: AnimationLoop<ConfettiDriver>,
    frames: Option<FrameHandle>,
}

struct Page {
    tier: RenderQualityTier,
    cake: RefCell<Option<Cake>>,
    overlay: RefCell<Option<OverlayRig>>,
    confetti: RefCell<Option<ConfettiRig>>,
}

thread_local! {
    static PAGE: RefCell<Option<Rc<Page>>> = const { RefCell::new(None) };
}

fn page() -> Option<Rc<Page>> {
    PAGE.with(|p| p.borrow().clone())
}

fn document() -> Result<(Window, Document), PageError> {
    let win = window().ok_or(PageError::NoWindow)?;
    let doc = win.document().ok_or(PageError::NoDocument)?;
    Ok((win, doc))
}

fn detect_tier(win: &Window) -> RenderQualityTier {
    let nav = win.navigator();
    let touch = nav.max_touch_points() > 0;
    let cores = nav.hardware_concurrency() as u32;
    let tier = RenderQualityTier::detect(touch, cores);
    log::info!(
        "quality: touch={touch} cores={cores} constrained={}",
        tier.constrained
    );
    tier
}

fn soft(effect: &str, result: Result<(), PageError>) {
    if let Err(e) = result {
        log::warn!("{effect} disabled: {e}");
    }
}

// --- Entry points ------------------------------------------------------------

#[wasm_bindgen]
pub fn start_page() -> Result<(), JsValue> {
    boot(None).map_err(Into::into)
}

/// Like [`start_page`] but with an explicit quality tier, e.g.
/// `{"constrained": true, "bokeh_count": 20}`. Missing fields use the full tier.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_page_with_quality(json: &str) -> Result<(), JsValue> {
    let tier: RenderQualityTier =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    boot(Some(tier)).map_err(Into::into)
}

fn boot(tier: Option<RenderQualityTier>) -> Result<(), PageError> {
    let (win, doc) = document()?;
    let tier = tier.unwrap_or_else(|| detect_tier(&win));
    let page = Rc::new(Page {
        tier,
        cake: RefCell::new(None),
        overlay: RefCell::new(None),
        confetti: RefCell::new(None),
    });
    PAGE.with(|p| p.replace(Some(page.clone())));

    soft(
        "bokeh",
        start_background(&win, &doc, "particleCanvas", |size| {
            ParticleField::bokeh(page.tier.bokeh_count, size)
        }),
    );
    soft(
        "stars",
        start_background(&win, &doc, "starCanvas", |_| {
            ParticleField::stars(page.tier.star_count)
        }),
    );
    soft("cursor", cursor::start(&doc));
    soft("cake", init_cake(&page, &doc));
    soft("overlay", init_overlay(&page, &doc));
    soft("buttons", init_buttons(&doc));
    Ok(())
}

#[wasm_bindgen]
pub fn trigger_confetti() {
    launch_confetti();
}

#[wasm_bindgen]
pub fn open_grand_overlay() {
    let Some(page) = page() else { return };
    {
        let mut rig = page.overlay.borrow_mut();
        let Some(rig) = rig.as_mut() else { return };
        if rig.overlay.is_open() {
            return;
        }
        // Resizing the backing store also clears it.
        if let Some(win) = window() {
            rig.overlay.surface().fit_to_window(&win);
        }
        if !rig.overlay.open(now_ms()) {
            return;
        }
        let driver = page.clone();
        rig.frames = Some(frame::run(move |_ts| {
            let mut rig = driver.overlay.borrow_mut();
            match rig.as_mut() {
                Some(rig) => rig.overlay.frame(),
                None => LoopStatus::Cancelled,
            }
        }));
    }
    schedule_pump(&page);
}

#[wasm_bindgen]
pub fn close_grand_overlay() {
    let Some(page) = page() else { return };
    let mut rig = page.overlay.borrow_mut();
    if let Some(rig) = rig.as_mut() {
        rig.overlay.close();
        if let Some(frames) = rig.frames.take() {
            frames.cancel();
        }
    }
}

#[wasm_bindgen]
pub fn toggle_candle(idx: usize) {
    let Some(page) = page() else { return };
    let celebration = {
        let mut cake = page.cake.borrow_mut();
        let Some(cake) = cake.as_mut() else { return };
        let c = cake.controller.toggle(idx);
        cake.render(idx);
        c
    };
    if let Some(c) = celebration {
        celebrate(c);
    }
}

// --- Background loops --------------------------------------------------------

fn start_background(
    win: &Window,
    doc: &Document,
    id: &'static str,
    build: impl FnOnce((f64, f64)) -> ParticleField,
) -> Result<(), PageError> {
    let surface = CanvasSurface::from_id(doc, id)?;
    surface.fit_to_element();

    let resized = surface.clone();
    let on_resize = Closure::wrap(Box::new(move || resized.fit_to_element()) as Box<dyn FnMut()>);
    win.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    let mut drawn = surface.clone();
    let mut lp = AnimationLoop::endless(build(surface.size()));
    log::debug!("{id}: {} particles", lp.effect().len());
    // Runs for the page's lifetime; the chain keeps itself alive.
    let _ = frame::run(move |_ts| lp.tick(&mut drawn));
    Ok(())
}

// --- Confetti ----------------------------------------------------------------

/// Start a confetti run, or restart the one in progress with fresh pieces.
pub(crate) fn launch_confetti() {
    let Some(page) = page() else { return };
    let Ok((win, doc)) = document() else { return };
    let mut slot = page.confetti.borrow_mut();
    if slot.is_none() {
        match CanvasSurface::from_id(&doc, "confettiCanvas") {
            Ok(surface) => {
                let driver = ConfettiDriver::new(&page.tier, surface.size());
                let duration = driver.duration();
                *slot = Some(ConfettiRig {
                    surface,
                    run: AnimationLoop::bounded(driver, duration),
                    frames: None,
                });
            }
            Err(e) => {
                log::warn!("confetti disabled: {e}");
                return;
            }
        }
    }
    let Some(rig) = slot.as_mut() else { return };
    rig.surface.fit_to_window(&win);
    rig.surface.set_visible(true);
    let size = rig.surface.size();
    rig.run.effect_mut().restart(&page.tier, size);
    rig.run.rewind();
    if let Some(notes) = DomNoteHost::find(&doc) {
        burst_notes(&notes);
    }

    let running = rig.frames.as_ref().is_some_and(FrameHandle::is_active);
    if !running {
        let driver = page.clone();
        rig.frames = Some(frame::run(move |_ts| {
            let mut slot = driver.confetti.borrow_mut();
            match slot.as_mut() {
                Some(rig) => rig.run.tick(&mut rig.surface),
                None => LoopStatus::Cancelled,
            }
        }));
    }
}

// --- Cake ----------------------------------------------------------------------

fn init_cake(page: &Rc<Page>, doc: &Document) -> Result<(), PageError> {
    let nodes = doc.query_selector_all(".candle")?;
    let elements: Vec<Element> = (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect();
    if elements.is_empty() {
        return Err(PageError::MissingElement("candle"));
    }

    for (idx, el) in elements.iter().enumerate() {
        let on_click = Closure::wrap(Box::new(move |_evt: MouseEvent| toggle_candle(idx))
            as Box<dyn FnMut(MouseEvent)>);
        el.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }

    let count = elements.len();
    *page.cake.borrow_mut() = Some(Cake {
        controller: CandleController::new(count),
        elements,
    });
    log::debug!("cake: {count} candles");

    let section = doc
        .get_element_by_id("celebrate")
        .ok_or(PageError::MissingElement("celebrate"))?;
    let on_visible = Closure::wrap(Box::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            let visible = entries
                .get(0)
                .dyn_into::<IntersectionObserverEntry>()
                .map(|e| e.is_intersecting())
                .unwrap_or(false);
            if visible {
                observer.disconnect();
                light_candles();
            }
        },
    ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);
    let opts = IntersectionObserverInit::new();
    opts.set_threshold(&JsValue::from_f64(CAKE_VISIBLE_THRESHOLD));
    let observer =
        IntersectionObserver::new_with_options(on_visible.as_ref().unchecked_ref(), &opts)?;
    observer.observe(&section);
    on_visible.forget();
    Ok(())
}

fn light_candles() {
    let Some(page) = page() else { return };
    let started = page
        .cake
        .borrow_mut()
        .as_mut()
        .is_some_and(|cake| cake.controller.light_sequentially(now_ms()));
    if started {
        pump();
    }
}

fn celebrate(_: Celebration) {
    if let Err(e) = timers::after(CELEBRATION_DELAY_MS, open_grand_overlay) {
        log::warn!("celebration not scheduled: {e}");
    }
}

// --- Overlay & buttons ----------------------------------------------------------

fn init_overlay(page: &Rc<Page>, doc: &Document) -> Result<(), PageError> {
    let surface = CanvasSurface::from_id(doc, "fireworksCanvas")?;
    let host = DomOverlayHost::new(doc, close_grand_overlay)?;
    *page.overlay.borrow_mut() = Some(OverlayRig {
        overlay: GrandOverlay::new(surface, host, page.tier.clone()),
        frames: None,
    });
    Ok(())
}

fn init_buttons(doc: &Document) -> Result<(), PageError> {
    let mut wired = 0;
    for (id, action) in [
        ("surpriseBtn", trigger_confetti as fn()),
        ("finaleBtn", open_grand_overlay as fn()),
    ] {
        let Some(btn) = doc.get_element_by_id(id) else {
            continue;
        };
        let on_click =
            Closure::wrap(Box::new(move |_evt: MouseEvent| action()) as Box<dyn FnMut(MouseEvent)>);
        btn.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
        wired += 1;
    }
    if wired == 0 {
        return Err(PageError::MissingElement("surpriseBtn"));
    }
    Ok(())
}

// --- Timed steps -----------------------------------------------------------------

/// Apply every due candle / overlay step, then re-arm for the next one.
fn pump() {
    let Some(page) = page() else { return };
    let now = now_ms();
    let celebration = {
        let mut cake = page.cake.borrow_mut();
        match cake.as_mut() {
            Some(cake) => {
                let (lit, celebration) = cake.controller.poll(now);
                for idx in lit {
                    cake.render(idx);
                }
                celebration
            }
            None => None,
        }
    };
    if let Some(rig) = page.overlay.borrow_mut().as_mut() {
        rig.overlay.poll(now);
    }
    if let Some(c) = celebration {
        celebrate(c);
    }
    schedule_pump(&page);
}

fn schedule_pump(page: &Page) {
    let cake_due = page
        .cake
        .borrow()
        .as_ref()
        .and_then(|c| c.controller.next_due());
    let overlay_due = page
        .overlay
        .borrow()
        .as_ref()
        .and_then(|r| r.overlay.next_due());
    let next = match (cake_due, overlay_due) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    if let Some(at) = next {
        if let Err(e) = timers::after(at - now_ms(), pump) {
            log::warn!("timer not scheduled: {e}");
        }
    }
}
