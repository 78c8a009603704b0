//! Compile modes and mode detection.

use once_cell::sync::Lazy;
use std::sync::Mutex;

/// How a theme's lifecycle behaves after the first compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Registrations stay open after compile; every change triggers
    /// re-resolution and a change notification (hot reload).
    Development,
    /// The first compile freezes the registry; later registrations fail
    /// with [`crate::ThemeError::AlreadyCompiled`] and repeated compiles
    /// return the identical cached result.
    Production,
}

type ModeDetector = fn() -> Mode;

static MODE_DETECTOR: Lazy<Mutex<ModeDetector>> = Lazy::new(|| Mutex::new(build_profile_detector));

/// Overrides the detector used to pick the default mode for new themes.
///
/// This is useful for testing or when the build profile is not the right
/// signal for the deployment environment. Themes built with an explicit
/// mode via [`crate::ThemeBuilder::mode`] are unaffected.
pub fn set_mode_detector(detector: ModeDetector) {
    let mut guard = MODE_DETECTOR.lock().unwrap();
    *guard = detector;
}

pub(crate) fn detect_mode() -> Mode {
    let detector = MODE_DETECTOR.lock().unwrap();
    (*detector)()
}

fn build_profile_detector() -> Mode {
    if cfg!(debug_assertions) {
        Mode::Development
    } else {
        Mode::Production
    }
}
