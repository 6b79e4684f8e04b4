use bevy::prelude::*;
use constants::narrative::*;
use constants::particle_field::QUANTUM_BLUE;

use crate::engine::animation::tween::{Ease, Tween, TweenTrack};
use crate::engine::scene::particle_field::SceneNode;
use crate::narrative::NarrativeEvent;

const INPUT_WIDTH: f32 = 260.0;
const INPUT_HEIGHT: f32 = 36.0;

#[derive(Component)]
pub struct HologramInput;

#[derive(Component)]
pub struct TransmissionButton;

/// Push every scene node deep into the screen, one after another, and
/// replace the panel's contents with the transmission form.
/// Returns how many scene nodes were sent away.
pub fn initiate_transmission<'a>(
    commands: &mut Commands,
    panel: Entity,
    scene_nodes: impl IntoIterator<Item = (Entity, &'a Transform, &'a SceneNode)>,
) -> usize {
    let mut nodes: Vec<_> = scene_nodes.into_iter().collect();
    nodes.sort_by_key(|(_, _, node)| node.order);

    for (i, (entity, transform, _)) in nodes.iter().enumerate() {
        commands.entity(*entity).insert(
            Tween::new(
                TweenTrack::Depth {
                    from: transform.translation.z,
                    to: TRANSMISSION_DEPTH,
                },
                TRANSMISSION_DURATION,
            )
            .with_delay(i as f32 * TRANSMISSION_STAGGER)
            .with_ease(Ease::Power4InOut),
        );
    }

    commands
        .entity(panel)
        .despawn_related::<Children>()
        .with_children(|parent| {
            for delay in HOLOGRAM_INPUT_DELAYS {
                spawn_hologram_input(parent, delay);
            }
            parent
                .spawn((
                    Name::new("transmission_button"),
                    Button,
                    Node {
                        width: Val::Px(INPUT_WIDTH),
                        height: Val::Px(INPUT_HEIGHT),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(QUANTUM_BLUE.with_alpha(0.2)),
                    TransmissionButton,
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new(TRANSMISSION_LABEL),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(QUANTUM_BLUE),
                    ));
                });
        });

    nodes.len()
}

fn spawn_hologram_input(parent: &mut ChildSpawnerCommands, delay: f32) {
    let node = Node {
        width: Val::Px(INPUT_WIDTH),
        height: Val::Px(INPUT_HEIGHT),
        border: UiRect::bottom(Val::Px(1.0)),
        ..default()
    };
    parent.spawn((
        Name::new("hologram_input"),
        node,
        BorderColor(QUANTUM_BLUE.with_alpha(0.0)),
        BackgroundColor(QUANTUM_BLUE.with_alpha(0.0)),
        Tween::new(
            TweenTrack::Alpha { from: 0.0, to: 1.0 },
            HOLOGRAM_INPUT_FADE,
        )
        .with_delay(delay),
        HologramInput,
    ));
}

/// The form's own button. The request goes out to the host page.
pub fn transmission_button_system(
    interactions: Query<&Interaction, (Changed<Interaction>, With<TransmissionButton>)>,
    mut narrative_events: EventWriter<NarrativeEvent>,
) {
    for interaction in &interactions {
        if *interaction == Interaction::Pressed {
            info!("Transmission requested");
            narrative_events.write(NarrativeEvent::TransmissionRequested);
        }
    }
}
