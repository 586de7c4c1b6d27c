//! One-shot `setTimeout` wrapper and the page clock.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::error::PageError;

pub fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Run `f` once after `delay_ms`.
pub fn after<F: FnOnce() + 'static>(delay_ms: f64, f: F) -> Result<i32, PageError> {
    let win = window().ok_or(PageError::NoWindow)?;
    let cb = Closure::once_into_js(f);
    let id = win.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.unchecked_ref(),
        delay_ms.max(0.0).ceil() as i32,
    )?;
    Ok(id)
}
