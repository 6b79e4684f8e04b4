use bevy::color::Color;

/// Edge length of the cube particles are scattered in, centred on the origin
pub const FIELD_EXTENT: f32 = 50.0;

/// Bright cyan used by the primary storm and the narrative overlay
pub const QUANTUM_BLUE: Color = Color::srgb(0.0, 0.953, 1.0);

/// Upper bound on particles per field. Four vertices each must stay
/// addressable by a `u32` mesh index.
pub const MAX_FIELD_PARTICLES: usize = 1_000_000;

pub const PRIMARY_STORM_COUNT: usize = 20_000;
pub const PRIMARY_STORM_SIZE: f32 = 0.3;
pub const PRIMARY_STORM_COLOUR: &str = "#00f3ff";
/// Rotation about Y added every frame (radians)
pub const PRIMARY_STORM_SPIN: f32 = 0.001;
pub const PRIMARY_STORM_AMPLITUDE: f32 = 0.5;
pub const PRIMARY_STORM_FREQUENCY: f32 = 1.0;

pub const CHAOS_FIELD_COUNT: usize = 50_000;
pub const CHAOS_FIELD_SIZE: f32 = 0.1;
pub const CHAOS_FIELD_COLOUR: &str = "#bc13fe";
/// Initial tilt about X (radians)
pub const CHAOS_FIELD_TILT: f32 = std::f32::consts::FRAC_PI_4;
/// Rotation about X added every frame (radians)
pub const CHAOS_FIELD_SPIN: f32 = 0.0005;
pub const CHAOS_FIELD_AMPLITUDE: f32 = 0.3;
pub const CHAOS_FIELD_FREQUENCY: f32 = 0.5;
