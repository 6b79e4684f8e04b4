//! Core runtime systems for loop control, motion and diagnostics.

/// Particle field drift applied every running frame.
pub mod drift;

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the host via RPC and updates the native overlay.
pub mod fps_tracking;

/// Render loop state and the commands that start, stop or dispose it.
pub mod render_loop;
