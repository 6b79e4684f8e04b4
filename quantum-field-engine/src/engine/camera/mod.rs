//! Perspective camera and viewport tracking for the particle scene.

/// Scene camera, viewport size resource and resize handling.
pub mod scene_camera;
