//! Rendering of the particle fields.
//!
//! Points are drawn as camera-facing quads expanded in the vertex shader and
//! blended additively.

/// Particle field material with its uniform and vertex layout.
pub mod particle_material;
