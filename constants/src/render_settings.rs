/// CSS selector of the page canvas the WASM build draws into
pub const CANVAS_SELECTOR: &str = "#quantumCanvas";

/// Render layer reserved for the background noise sprite
pub const BACKGROUND_RENDER_LAYER: usize = 1;

/// Camera order of the background pass; the particle camera draws after it
pub const BACKGROUND_CAMERA_ORDER: isize = -1;

/// Upper bound on the device pixel ratio used for the canvas
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Asset path of the runtime settings file
pub const SETTINGS_PATH: &str = "quantum.settings.json";

/// Seconds between FPS notifications pushed to the host page
pub const FPS_NOTIFY_INTERVAL: f32 = 0.5;
