use bevy::prelude::*;
use constants::narrative::*;
use constants::particle_field::QUANTUM_BLUE;

use crate::engine::animation::tween::{Transient, Tween, TweenTrack, UiFrame, px};
use crate::engine::scene::particle_field::SceneNode;
use crate::narrative::NarrativeEvent;
use crate::narrative::overlay::{NarrativeElements, PanelHeading, PortalButton};
use crate::narrative::transmission::initiate_transmission;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PortalStage {
    #[default]
    Idle,
    PortalOpen,
    /// Terminal.
    TransmissionInitiated,
}

impl PortalStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortalStage::Idle => "idle",
            PortalStage::PortalOpen => "portal_open",
            PortalStage::TransmissionInitiated => "transmission_initiated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalTransition {
    OpenPanel,
    InitiateTransmission,
}

/// Click counter for the portal. Only ever moves forward.
#[derive(Resource, Debug, Default)]
pub struct PortalSequence {
    clicks: u32,
    stage: PortalStage,
}

impl PortalSequence {
    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn stage(&self) -> PortalStage {
        self.stage
    }

    /// Count a click and return the transition it causes, if any.
    /// The first click opens the panel; the first click after that starts
    /// the transmission. Later clicks change nothing.
    pub fn register_click(&mut self) -> Option<PortalTransition> {
        self.clicks = self.clicks.saturating_add(1);
        match self.stage {
            PortalStage::Idle => {
                self.stage = PortalStage::PortalOpen;
                Some(PortalTransition::OpenPanel)
            }
            PortalStage::PortalOpen => {
                self.stage = PortalStage::TransmissionInitiated;
                Some(PortalTransition::InitiateTransmission)
            }
            PortalStage::TransmissionInitiated => None,
        }
    }
}

/// A click on the portal, from the overlay button or the host page.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct PortalClicked;

#[derive(Component)]
pub struct Ripple;

pub fn portal_interaction_system(
    interactions: Query<&Interaction, (Changed<Interaction>, With<PortalButton>)>,
    mut clicks: EventWriter<PortalClicked>,
) {
    for interaction in &interactions {
        if *interaction == Interaction::Pressed {
            clicks.write(PortalClicked);
        }
    }
}

/// Ring that grows out of the portal's corner while fading away.
pub fn spawn_ripple(commands: &mut Commands, left: f32, top: f32) -> Entity {
    let from = UiFrame::new(left, top, RIPPLE_START_SIZE, RIPPLE_START_SIZE, 1.0);
    let to = UiFrame {
        width: RIPPLE_END_SIZE,
        height: RIPPLE_END_SIZE,
        alpha: 0.0,
        ..from
    };

    let mut node = Node {
        position_type: PositionType::Absolute,
        border: UiRect::all(Val::Px(RIPPLE_BORDER)),
        ..default()
    };
    from.write_to(&mut node);

    commands
        .spawn((
            Name::new("hologram_ripple"),
            node,
            BorderColor(QUANTUM_BLUE),
            BorderRadius::MAX,
            Tween::new(TweenTrack::Ui { from, to }, RIPPLE_DURATION),
            Transient,
            Ripple,
        ))
        .id()
}

/// Show the panel and slide it up into place while it and its heading fade in.
pub fn open_panel(
    commands: &mut Commands,
    panel: Entity,
    node: &mut Node,
    headings: impl Iterator<Item = Entity>,
) {
    node.display = Display::Flex;

    let from = UiFrame::of_node(node, 0.0);
    let to = UiFrame {
        top: from.top - PANEL_SLIDE,
        alpha: 1.0,
        ..from
    };
    commands
        .entity(panel)
        .insert(Tween::new(TweenTrack::Ui { from, to }, PANEL_OPEN_DURATION));

    for heading in headings {
        commands.entity(heading).insert(Tween::new(
            TweenTrack::Alpha { from: 0.0, to: 1.0 },
            PANEL_OPEN_DURATION,
        ));
    }
}

pub fn portal_click_system(
    mut commands: Commands,
    mut clicks: EventReader<PortalClicked>,
    mut sequence: ResMut<PortalSequence>,
    elements: Res<NarrativeElements>,
    mut nodes: Query<&mut Node>,
    headings: Query<Entity, With<PanelHeading>>,
    scene_nodes: Query<(Entity, &Transform, &SceneNode)>,
    mut narrative_events: EventWriter<NarrativeEvent>,
) {
    for _ in clicks.read() {
        match nodes.get(elements.portal) {
            Ok(portal) => {
                spawn_ripple(&mut commands, px(portal.left), px(portal.top));
            }
            Err(_) => warn!("Portal node missing, skipping ripple"),
        }

        let transition = sequence.register_click();
        debug!(
            "Portal click {} -> {}",
            sequence.clicks(),
            sequence.stage().as_str()
        );

        match transition {
            Some(PortalTransition::OpenPanel) => {
                if let Ok(mut panel) = nodes.get_mut(elements.panel) {
                    open_panel(&mut commands, elements.panel, &mut panel, headings.iter());
                }
                narrative_events.write(NarrativeEvent::PortalOpened);
            }
            Some(PortalTransition::InitiateTransmission) => {
                let count = initiate_transmission(&mut commands, elements.panel, scene_nodes.iter());
                info!("Transmission initiated across {} scene nodes", count);
                narrative_events.write(NarrativeEvent::TransmissionInitiated);
            }
            None => {}
        }
    }
}
