//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Viewport size
//! - Seeds

use crate::sim::Viewport;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or_default()
}

/// Window inner size, read once at session start
#[cfg(target_arch = "wasm32")]
pub fn viewport() -> Viewport {
    let size = web_sys::window().and_then(|w| {
        let width = w.inner_width().ok()?.as_f64()?;
        let height = w.inner_height().ok()?.as_f64()?;
        Some((width as f32, height as f32))
    });
    match size {
        Some((width, height)) => Viewport::new(width, height),
        None => {
            log::warn!("Could not read window size, using 800x600");
            Viewport::new(800.0, 600.0)
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn viewport() -> Viewport {
    Viewport::new(800.0, 600.0)
}

/// Seed for a new session
pub fn seed() -> u64 {
    now_ms() as u64
}
