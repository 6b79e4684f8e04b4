/// Scroll offset, as a fraction of viewport height, that reveals the manifest
pub const SCROLL_THRESHOLD_FRACTION: f32 = 0.6;

/// Story particles emitted by one scroll-triggered wave
pub const WAVE_PARTICLE_COUNT: usize = 50;
/// Each story particle is its own UI node
pub const MAX_WAVE_PARTICLES: usize = 500;
pub const WAVE_PARTICLE_SIZE: f32 = 4.0;
/// Maximum horizontal drift of a story particle either side of centre (px)
pub const WAVE_HORIZONTAL_SPREAD: f32 = 50.0;
pub const WAVE_DURATION: f32 = 2.0;

pub const MANIFEST_REVEAL_DURATION: f32 = 0.8;

pub const RIPPLE_START_SIZE: f32 = 120.0;
pub const RIPPLE_END_SIZE: f32 = 300.0;
pub const RIPPLE_BORDER: f32 = 2.0;
pub const RIPPLE_DURATION: f32 = 1.0;

pub const PORTAL_SIZE: f32 = 120.0;
/// Distance of the portal from the right and bottom viewport edges (px)
pub const PORTAL_MARGIN: f32 = 40.0;

pub const PANEL_WIDTH: f32 = 320.0;
pub const PANEL_HEIGHT: f32 = 220.0;
/// Upward slide applied when the panel opens (px)
pub const PANEL_SLIDE: f32 = 140.0;
pub const PANEL_OPEN_DURATION: f32 = 0.5;

/// Depth every scene node travels to once transmission starts
pub const TRANSMISSION_DEPTH: f32 = 100.0;
pub const TRANSMISSION_DURATION: f32 = 2.0;
pub const TRANSMISSION_STAGGER: f32 = 0.1;

/// Appearance delays of the hologram input placeholders (seconds)
pub const HOLOGRAM_INPUT_DELAYS: [f32; 2] = [0.2, 0.4];
pub const HOLOGRAM_INPUT_FADE: f32 = 0.5;
pub const TRANSMISSION_LABEL: &str = "INITIATE TRANSMISSION";

/// Pixels scrolled per mouse-wheel line on native builds
pub const WHEEL_LINE_PIXELS: f32 = 40.0;
