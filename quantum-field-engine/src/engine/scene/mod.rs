//! Scene content: the two particle fields and the noise background.

/// Procedural space noise texture and the background camera pass.
pub mod background;

/// Random particle clouds, their billboard mesh and per-frame drift.
///
/// Each field is tagged with its place in the scene graph.
pub mod particle_field;
