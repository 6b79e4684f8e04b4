pub mod camera;
pub mod narrative;
pub mod particle_field;
pub mod render_settings;
pub mod texture;
