//! Error types shared by the renderer and the narrative layer.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuantumError {
    /// The page has no canvas to draw into. Start-up cannot continue.
    #[error("drawing surface `{0}` not found")]
    MissingSurface(String),

    /// An overlay element the narrative needs is gone. The renderer keeps running.
    #[error("narrative element `{0}` not found")]
    MissingNarrativeElement(&'static str),

    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("invalid colour `{0}`")]
    InvalidColour(String),

    #[error("{0} particles exceed the mesh index range")]
    TooManyParticles(usize),
}
