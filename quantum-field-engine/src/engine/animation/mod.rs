//! Time-based interpolation of overlay boxes and scene depth.

/// Tween component, easing curves and the per-frame advance system.
///
/// Reports each tween's end exactly once, whether it completed or was cancelled.
pub mod tween;
