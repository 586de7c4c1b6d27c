//! Browser bindings: canvas surface, frame driver, timers, DOM hosts and page wiring.
//!
//! Everything here is a thin adapter over `web-sys`; the behavior lives in the
//! platform-independent modules at the crate root.

pub mod canvas;
mod cursor;
pub mod frame;
mod host;
pub mod page;
pub mod timers;
