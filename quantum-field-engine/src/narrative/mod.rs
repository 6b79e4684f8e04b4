//! Scroll and click driven story told on top of the particle scene.
//!
//! The overlay is plain `bevy_ui`. Every transition is a [`Tween`] so the
//! render loop gate stops the story together with the scene.
//!
//! [`Tween`]: crate::engine::animation::tween::Tween

/// Manifest text, portal button and consultation panel.
pub mod overlay;

/// Portal click sequence, ripples and the panel reveal.
pub mod portal;

/// Scroll threshold trigger and the story particle wave.
pub mod scroll_trigger;

/// Scene recession and the hologram form.
pub mod transmission;

use bevy::prelude::*;

use crate::engine::core::app_state::{AppState, StartupPhase};
use crate::engine::systems::render_loop::render_loop_running;
use overlay::{
    NarrativeElements, relayout_narrative_overlay, resolve_narrative_elements,
    spawn_narrative_overlay,
};
use portal::{PortalClicked, PortalSequence, portal_click_system, portal_interaction_system};
use scroll_trigger::{
    NarrativeRng, PageScroll, ScrollChanged, arm_scroll_trigger, scroll_trigger_system,
};
use transmission::transmission_button_system;

/// Milestones of the story, forwarded to the host page.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum NarrativeEvent {
    ManifestActivated { scroll_offset: f32 },
    PortalOpened,
    TransmissionInitiated,
    TransmissionRequested,
}

impl NarrativeEvent {
    pub fn method(&self) -> &'static str {
        match self {
            NarrativeEvent::ManifestActivated { .. } => "manifest_activated",
            NarrativeEvent::PortalOpened => "portal_opened",
            NarrativeEvent::TransmissionInitiated => "transmission_initiated",
            NarrativeEvent::TransmissionRequested => "transmission_requested",
        }
    }
}

pub struct NarrativePlugin;

impl Plugin for NarrativePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<NarrativeEvent>()
            .add_event::<ScrollChanged>()
            .add_event::<PortalClicked>()
            .init_resource::<PageScroll>()
            .init_resource::<NarrativeRng>()
            .init_resource::<PortalSequence>()
            .add_systems(
                OnEnter(AppState::Running),
                (
                    spawn_narrative_overlay,
                    resolve_narrative_elements,
                    arm_scroll_trigger,
                )
                    .chain()
                    .in_set(StartupPhase::Narrative),
            )
            .add_systems(
                Update,
                (
                    portal_interaction_system,
                    portal_click_system,
                    scroll_trigger_system,
                    transmission_button_system,
                    relayout_narrative_overlay,
                )
                    .chain()
                    .run_if(in_state(AppState::Running))
                    .run_if(resource_exists::<NarrativeElements>)
                    .run_if(render_loop_running),
            );

        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(
            Update,
            scroll_trigger::wheel_scroll_input
                .before(scroll_trigger_system)
                .run_if(in_state(AppState::Running)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_method_names() {
        assert_eq!(
            NarrativeEvent::ManifestActivated { scroll_offset: 1.0 }.method(),
            "manifest_activated"
        );
        assert_eq!(NarrativeEvent::PortalOpened.method(), "portal_opened");
        assert_eq!(
            NarrativeEvent::TransmissionInitiated.method(),
            "transmission_initiated"
        );
    }
}
