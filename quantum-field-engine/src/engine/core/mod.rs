//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, runtime settings
//! and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the app, schedules the scene build on entering `Running`, and
/// gates per-frame work on the render loop.
pub mod app_setup;

/// Application states and start-up ordering.
pub mod app_state;

/// Runtime settings asset with compiled defaults.
pub mod settings;

/// Platform-specific window configuration for native and WASM builds.
///
/// Binds the canvas on web targets and checks it exists before start-up.
pub mod window_config;
