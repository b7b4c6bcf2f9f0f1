//! Global cache switch
//!
//! Rasterized text masks can be cached per (text, face, size). Caching is a
//! speed knob only; renders are identical with it on or off. It is
//! **disabled by default** and turned on via `set_caching_enabled(true)` or
//! the `WMARK_CACHE=1` environment variable.
//!
//! ```
//! use wmark_core::cache_config;
//!
//! cache_config::set_caching_enabled(true);
//! assert!(cache_config::is_caching_enabled());
//! cache_config::set_caching_enabled(false);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

/// Name of the environment variable read on first use
pub const CACHE_ENV_VAR: &str = "WMARK_CACHE";

static MASK_CACHE_ON: AtomicBool = AtomicBool::new(false);
static READ_ENV: Once = Once::new();

/// `1`, `true`, `yes` and `on` switch caching on, in any case
fn truthy(value: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|word| value.trim().eq_ignore_ascii_case(word))
}

fn apply_env() {
    READ_ENV.call_once(|| {
        let wanted = std::env::var(CACHE_ENV_VAR).map(|v| truthy(&v)).unwrap_or(false);
        if wanted {
            MASK_CACHE_ON.store(true, Ordering::SeqCst);
            log::info!("Mask caching on ({} is set)", CACHE_ENV_VAR);
        }
    });
}

/// Whether mask caching is on
pub fn is_caching_enabled() -> bool {
    apply_env();
    MASK_CACHE_ON.load(Ordering::SeqCst)
}

/// Turns mask caching on or off, overriding the environment
pub fn set_caching_enabled(enabled: bool) {
    apply_env();
    MASK_CACHE_ON.store(enabled, Ordering::SeqCst);
    log::debug!("Mask caching switched {}", if enabled { "on" } else { "off" });
}
