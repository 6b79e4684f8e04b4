use bevy::prelude::*;
use constants::narrative::*;
use constants::particle_field::QUANTUM_BLUE;

use crate::engine::animation::tween::{Tween, TweenFinished, UiFrame};
use crate::engine::camera::scene_camera::ViewportSize;
use crate::error::QuantumError;
use crate::narrative::portal::{PortalSequence, PortalStage};

/// Text block revealed once the page is scrolled past the trigger point.
#[derive(Component)]
pub struct ManifestElement;

/// Marker set on the manifest element once the scroll trigger fires.
#[derive(Component, Debug)]
pub struct ManifestActive;

#[derive(Component)]
pub struct PortalButton;

/// Consultation panel shown by the first portal click.
#[derive(Component)]
pub struct PortalPanel;

/// Panel title. Hidden until the panel opens, then faded in with it.
#[derive(Component)]
pub struct PanelHeading;

/// Overlay elements the narrative drives, resolved once at start-up.
#[derive(Resource, Debug, Clone, Copy)]
pub struct NarrativeElements {
    pub manifest: Entity,
    pub portal: Entity,
    pub panel: Entity,
}

/// Pixel boxes of the fixed overlay elements for a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrativeLayout {
    pub manifest: UiFrame,
    pub portal: UiFrame,
    /// Closed position. Opening slides the panel up by `PANEL_SLIDE`.
    pub panel: UiFrame,
}

pub fn narrative_layout(viewport: &ViewportSize) -> NarrativeLayout {
    let portal = UiFrame::new(
        viewport.width - PORTAL_MARGIN - PORTAL_SIZE,
        viewport.height - PORTAL_MARGIN - PORTAL_SIZE,
        PORTAL_SIZE,
        PORTAL_SIZE,
        1.0,
    );
    let panel = UiFrame::new(
        viewport.width - PORTAL_MARGIN - PANEL_WIDTH,
        portal.top - PANEL_HEIGHT - PORTAL_MARGIN * 0.5 + PANEL_SLIDE,
        PANEL_WIDTH,
        PANEL_HEIGHT,
        0.0,
    );
    let manifest = UiFrame::new(
        viewport.width * 0.1,
        viewport.height * 0.3,
        viewport.width * 0.8,
        120.0,
        0.0,
    );

    NarrativeLayout {
        manifest,
        portal,
        panel,
    }
}

fn absolute_node(frame: &UiFrame) -> Node {
    let mut node = Node {
        position_type: PositionType::Absolute,
        ..default()
    };
    frame.write_to(&mut node);
    node
}

pub fn spawn_narrative_overlay(mut commands: Commands, viewport: Res<ViewportSize>) {
    let layout = narrative_layout(&viewport);

    commands.spawn((
        Name::new("quantum_manifest"),
        absolute_node(&layout.manifest),
        Text::new("WE DO NOT PREDICT THE FUTURE. WE COLLAPSE IT."),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(QUANTUM_BLUE.with_alpha(0.0)),
        TextLayout::new_with_justify(JustifyText::Center),
        ManifestElement,
    ));

    let mut portal = absolute_node(&layout.portal);
    portal.border = UiRect::all(Val::Px(RIPPLE_BORDER));
    portal.justify_content = JustifyContent::Center;
    portal.align_items = AlignItems::Center;
    commands
        .spawn((
            Name::new("consult_portal"),
            Button,
            portal,
            BorderColor(QUANTUM_BLUE),
            BorderRadius::MAX,
            BackgroundColor(QUANTUM_BLUE.with_alpha(0.08)),
            PortalButton,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("CONSULT"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(QUANTUM_BLUE),
            ));
        });

    let mut panel = absolute_node(&layout.panel);
    panel.display = Display::None;
    panel.flex_direction = FlexDirection::Column;
    panel.row_gap = Val::Px(12.0);
    panel.padding = UiRect::all(Val::Px(16.0));
    panel.border = UiRect::all(Val::Px(1.0));
    commands
        .spawn((
            Name::new("portal_interface"),
            panel,
            BackgroundColor(Color::srgba(0.02, 0.02, 0.08, 0.0)),
            BorderColor(QUANTUM_BLUE.with_alpha(0.0)),
            PortalPanel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("OPEN A CHANNEL"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(QUANTUM_BLUE.with_alpha(0.0)),
                PanelHeading,
            ));
        });
}

fn single_element<F: bevy::ecs::query::QueryFilter>(
    query: &Query<Entity, F>,
    name: &'static str,
) -> Result<Entity, QuantumError> {
    query
        .single()
        .map_err(|_| QuantumError::MissingNarrativeElement(name))
}

pub fn bind_narrative_elements(
    manifest: &Query<Entity, With<ManifestElement>>,
    portal: &Query<Entity, With<PortalButton>>,
    panel: &Query<Entity, With<PortalPanel>>,
) -> Result<NarrativeElements, QuantumError> {
    Ok(NarrativeElements {
        manifest: single_element(manifest, "manifest")?,
        portal: single_element(portal, "portal")?,
        panel: single_element(panel, "portal panel")?,
    })
}

/// Without its elements the narrative stays disabled; the renderer keeps going.
pub fn resolve_narrative_elements(
    mut commands: Commands,
    manifest: Query<Entity, With<ManifestElement>>,
    portal: Query<Entity, With<PortalButton>>,
    panel: Query<Entity, With<PortalPanel>>,
) {
    match bind_narrative_elements(&manifest, &portal, &panel) {
        Ok(elements) => {
            info!("✓ Narrative overlay bound");
            commands.insert_resource(elements);
        }
        Err(e) => error!("Narrative disabled: {}", e),
    }
}

/// Keep the fixed overlay anchored to the viewport edges after a resize.
/// Elements mid-animation are skipped and placed once their tween ends.
pub fn relayout_narrative_overlay(
    viewport: Res<ViewportSize>,
    elements: Res<NarrativeElements>,
    sequence: Res<PortalSequence>,
    mut finished: EventReader<TweenFinished>,
    mut nodes: Query<(&mut Node, Has<Tween>)>,
) {
    let settled: Vec<Entity> = finished.read().map(|event| event.entity).collect();
    let resized = viewport.is_changed();
    if !resized && settled.is_empty() {
        return;
    }
    let layout = narrative_layout(&viewport);

    let mut panel = layout.panel;
    if sequence.stage() != PortalStage::Idle {
        panel.top -= PANEL_SLIDE;
    }

    for (entity, frame) in [
        (elements.manifest, layout.manifest),
        (elements.portal, layout.portal),
        (elements.panel, panel),
    ] {
        let Ok((mut node, tweening)) = nodes.get_mut(entity) else {
            continue;
        };
        // A finished tween's removal may still be queued.
        if settled.contains(&entity) || (resized && !tweening) {
            frame.write_to(&mut node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn layout_anchors_portal_to_bottom_right() {
        let layout = narrative_layout(&ViewportSize::new(1000.0, 800.0).unwrap());
        assert_eq!(layout.portal.left, 1000.0 - 40.0 - 120.0);
        assert_eq!(layout.portal.top, 800.0 - 40.0 - 120.0);
        // Once opened the panel sits above the portal.
        assert!(layout.panel.top - PANEL_SLIDE + PANEL_HEIGHT <= layout.portal.top);
    }

    #[test]
    fn missing_overlay_reports_first_absent_element() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.world_mut().spawn(ManifestElement);

        let result = app
            .world_mut()
            .run_system_once(
                |manifest: Query<Entity, With<ManifestElement>>,
                 portal: Query<Entity, With<PortalButton>>,
                 panel: Query<Entity, With<PortalPanel>>| {
                    bind_narrative_elements(&manifest, &portal, &panel)
                },
            )
            .unwrap();

        assert_eq!(
            result.unwrap_err(),
            QuantumError::MissingNarrativeElement("portal")
        );
    }

    #[test]
    fn spawned_overlay_binds() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ViewportSize>()
            .add_systems(
                Update,
                (spawn_narrative_overlay, resolve_narrative_elements).chain(),
            );
        app.update();

        let elements = *app.world().resource::<NarrativeElements>();
        let panel = app.world().get::<Node>(elements.panel).unwrap();
        assert_eq!(panel.display, Display::None);
        assert!(app.world().get::<ManifestActive>(elements.manifest).is_none());
    }

    #[test]
    fn heading_starts_hidden() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ViewportSize>()
            .add_systems(Update, spawn_narrative_overlay);
        app.update();

        let mut headings = app
            .world_mut()
            .query_filtered::<&TextColor, With<PanelHeading>>();
        let colours: Vec<_> = headings.iter(app.world()).collect();
        assert_eq!(colours.len(), 1);
        assert_eq!(colours[0].0.alpha(), 0.0);
    }

    #[test]
    fn resize_during_panel_tween_lands_after_it_finishes() {
        use crate::engine::animation::tween::{TweenOutcome, TweenTrack};

        let small = ViewportSize::new(1000.0, 800.0).unwrap();
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<TweenFinished>()
            .insert_resource(small)
            .init_resource::<PortalSequence>();
        app.world_mut().run_system_once(spawn_narrative_overlay).unwrap();
        app.world_mut().run_system_once(resolve_narrative_elements).unwrap();
        app.add_systems(Update, relayout_narrative_overlay);

        let elements = *app.world().resource::<NarrativeElements>();
        app.world_mut()
            .resource_mut::<PortalSequence>()
            .register_click();
        let closed = narrative_layout(&small).panel;
        let track = TweenTrack::Ui {
            from: closed,
            to: closed,
        };
        app.world_mut()
            .entity_mut(elements.panel)
            .insert(Tween::new(track, PANEL_OPEN_DURATION));

        *app.world_mut().resource_mut::<ViewportSize>() =
            ViewportSize::new(1600.0, 900.0).unwrap();
        app.update();

        // Still animating, so only the portal moves.
        let panel = app.world().get::<Node>(elements.panel).unwrap();
        assert_eq!(panel.left, Val::Px(closed.left));
        let portal = app.world().get::<Node>(elements.portal).unwrap();
        assert_eq!(portal.left, Val::Px(1600.0 - PORTAL_MARGIN - PORTAL_SIZE));

        app.world_mut().entity_mut(elements.panel).remove::<Tween>();
        app.world_mut().send_event(TweenFinished {
            entity: elements.panel,
            outcome: TweenOutcome::Completed,
        });
        app.update();

        let expected = narrative_layout(app.world().resource::<ViewportSize>()).panel;
        let panel = app.world().get::<Node>(elements.panel).unwrap();
        assert_eq!(panel.left, Val::Px(expected.left));
        assert_eq!(panel.top, Val::Px(expected.top - PANEL_SLIDE));
    }
}
