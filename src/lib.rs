//! Celebration FX core crate.
//!
//! Canvas effects for a celebration page: bokeh and starfield backgrounds, a cursor
//! follower, the cake candles that gate the finale, confetti with a burst of music
//! notes, and the grand overlay with fireworks and emoji rain. The simulations are plain Rust drawing onto a [`surface::Surface`] and
//! run natively under `cargo test`; the `web` module binds them to the DOM and
//! `requestAnimationFrame`.

use wasm_bindgen::prelude::*;

pub mod animation;
pub mod candles;
pub mod confetti;
pub mod cursor;
pub mod error;
pub mod fireworks;
mod logging;
pub mod overlay;
pub mod particles;
pub mod random;
pub mod surface;
pub mod tier;
pub mod timeline;
pub mod web;

pub use animation::{AnimationLoop, CancelToken, Effect, LoopStatus};
pub use surface::{HeadlessSurface, Rgb, Shape, Surface};
pub use tier::RenderQualityTier;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
}
