use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

/// Ordering of the `OnEnter(AppState::Running)` work. The overlay is built
/// after the scene so its nodes draw over the scene camera.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartupPhase {
    Scene,
    Narrative,
}
