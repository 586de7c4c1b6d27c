//! `requestAnimationFrame` chain driving one step closure per display refresh.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::animation::LoopStatus;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Handle to a running chain.
#[derive(Clone)]
pub struct FrameHandle {
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameHandle {
    /// Still has a frame queued (the step has not reported a stop).
    pub fn is_active(&self) -> bool {
        self.callback.borrow().is_some()
    }

    /// Drop the queued frame. Must not be called from inside the step itself.
    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            if let Some(w) = window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
        self.callback.borrow_mut().take();
    }
}

fn request(callback: &FrameCallback, pending: &Cell<Option<i32>>) {
    let Some(w) = window() else { return };
    if let Some(cb) = callback.borrow().as_ref() {
        if let Ok(id) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            pending.set(Some(id));
        }
    }
}

/// Call `step` once per frame until it reports anything but `Running`.
pub fn run<F>(mut step: F) -> FrameHandle
where
    F: FnMut(f64) -> LoopStatus + 'static,
{
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let g = f.clone();
    let queued = pending.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        queued.set(None);
        match step(ts) {
            LoopStatus::Running => request(&f, &queued),
            // Breaks the self-reference so the closure is freed.
            _ => {
                let _ = f.borrow_mut().take();
            }
        }
    }) as Box<dyn FnMut(f64)>));
    request(&g, &pending);
    FrameHandle {
        callback: g,
        pending,
    }
}
