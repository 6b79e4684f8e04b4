use bevy::prelude::*;
use constants::narrative::*;
use constants::particle_field::QUANTUM_BLUE;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::animation::tween::{Transient, Tween, TweenTrack, UiFrame};
use crate::engine::camera::scene_camera::ViewportSize;
use crate::engine::core::settings::QuantumSettings;
use crate::narrative::NarrativeEvent;
use crate::narrative::overlay::{ManifestActive, NarrativeElements};

/// Vertical scroll offset of the host page, in pixels.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PageScroll {
    pub offset: f32,
}

/// One scroll event from the host page or the native wheel.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ScrollChanged {
    pub offset: f32,
}

/// Random source for the narrative's transient effects.
#[derive(Resource)]
pub struct NarrativeRng(pub StdRng);

impl Default for NarrativeRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// Fires once, the first time the page is scrolled past
/// `threshold_fraction` of the viewport height.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ScrollTrigger {
    pub threshold_fraction: f32,
    pub wave_size: usize,
    fired: bool,
}

impl ScrollTrigger {
    pub fn arm(threshold_fraction: f32) -> Self {
        Self {
            threshold_fraction,
            wave_size: WAVE_PARTICLE_COUNT,
            fired: false,
        }
    }

    pub fn with_wave_size(mut self, wave_size: usize) -> Self {
        self.wave_size = wave_size;
        self
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Returns true exactly once, for the first offset past the threshold.
    pub fn check(&mut self, offset: f32, viewport_height: f32) -> bool {
        if self.fired || offset <= self.threshold_fraction * viewport_height {
            return false;
        }
        self.fired = true;
        true
    }
}

pub fn arm_scroll_trigger(mut commands: Commands, settings: Res<QuantumSettings>) {
    commands.insert_resource(
        ScrollTrigger::arm(settings.scroll_threshold_fraction)
            .with_wave_size(settings.wave_particle_count),
    );
}

#[derive(Component)]
pub struct StoryParticle;

/// Emit a burst of story particles from the bottom centre of the viewport.
/// Each one drifts sideways, rises half the viewport and fades out.
pub fn emit_particle_wave<R: Rng + ?Sized>(
    commands: &mut Commands,
    viewport: &ViewportSize,
    count: usize,
    rng: &mut R,
) {
    let origin = UiFrame::new(
        viewport.width / 2.0,
        viewport.height,
        WAVE_PARTICLE_SIZE,
        WAVE_PARTICLE_SIZE,
        1.0,
    );

    for _ in 0..count {
        let spread = rng.gen_range(-WAVE_HORIZONTAL_SPREAD..=WAVE_HORIZONTAL_SPREAD);
        let target = UiFrame {
            left: origin.left + spread,
            top: origin.top - viewport.height / 2.0,
            alpha: 0.0,
            ..origin
        };

        let mut node = Node {
            position_type: PositionType::Absolute,
            ..default()
        };
        origin.write_to(&mut node);

        commands.spawn((
            Name::new("story_particle"),
            node,
            BackgroundColor(QUANTUM_BLUE),
            BorderRadius::MAX,
            Tween::new(
                TweenTrack::Ui {
                    from: origin,
                    to: target,
                },
                WAVE_DURATION,
            ),
            Transient,
            StoryParticle,
        ));
    }
}

fn activate_manifest(commands: &mut Commands, manifest: Entity, node: Option<&Node>) {
    let mut entity = commands.entity(manifest);
    entity.insert(ManifestActive);

    if let Some(node) = node {
        let hidden = UiFrame::of_node(node, 0.0);
        let shown = UiFrame { alpha: 1.0, ..hidden };
        entity.insert(Tween::new(
            TweenTrack::Ui {
                from: hidden,
                to: shown,
            },
            MANIFEST_REVEAL_DURATION,
        ));
    }
}

/// Check every scroll event against the armed trigger.
pub fn scroll_trigger_system(
    mut commands: Commands,
    mut scrolls: EventReader<ScrollChanged>,
    mut page_scroll: ResMut<PageScroll>,
    trigger: Option<ResMut<ScrollTrigger>>,
    viewport: Res<ViewportSize>,
    elements: Res<NarrativeElements>,
    nodes: Query<&Node>,
    mut rng: ResMut<NarrativeRng>,
    mut narrative_events: EventWriter<NarrativeEvent>,
) {
    let Some(mut trigger) = trigger else {
        scrolls.clear();
        return;
    };

    for scroll in scrolls.read() {
        page_scroll.offset = scroll.offset;

        if !trigger.check(scroll.offset, viewport.height) {
            continue;
        }

        info!("Scroll passed {:.0}px, manifest active", scroll.offset);
        activate_manifest(&mut commands, elements.manifest, nodes.get(elements.manifest).ok());
        emit_particle_wave(&mut commands, &viewport, trigger.wave_size, &mut rng.0);
        narrative_events.write(NarrativeEvent::ManifestActivated {
            scroll_offset: scroll.offset,
        });
    }
}

/// Native builds have no page to scroll, so the wheel scrolls a virtual one.
#[cfg(not(target_arch = "wasm32"))]
pub fn wheel_scroll_input(
    mut wheel: EventReader<bevy::input::mouse::MouseWheel>,
    page_scroll: Res<PageScroll>,
    mut scrolls: EventWriter<ScrollChanged>,
) {
    use bevy::input::mouse::MouseScrollUnit;

    let mut offset = page_scroll.offset;
    let mut scrolled = false;
    for event in wheel.read() {
        let pixels = match event.unit {
            MouseScrollUnit::Line => event.y * WHEEL_LINE_PIXELS,
            MouseScrollUnit::Pixel => event.y,
        };
        offset = (offset - pixels).max(0.0);
        scrolled = true;
    }

    if scrolled {
        scrolls.write(ScrollChanged { offset });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn scroll_app(viewport: ViewportSize) -> (App, NarrativeElements) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<ScrollChanged>()
            .add_event::<NarrativeEvent>()
            .insert_resource(viewport)
            .init_resource::<PageScroll>()
            .insert_resource(NarrativeRng(StdRng::seed_from_u64(11)))
            .insert_resource(ScrollTrigger::arm(0.6))
            .add_systems(Update, scroll_trigger_system);

        let world = app.world_mut();
        let elements = NarrativeElements {
            manifest: world.spawn(Node::default()).id(),
            portal: world.spawn(Node::default()).id(),
            panel: world.spawn(Node::default()).id(),
        };
        app.insert_resource(elements);
        (app, elements)
    }

    fn story_particles(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<StoryParticle>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn trigger_fires_once_past_threshold() {
        let mut trigger = ScrollTrigger::arm(0.6);
        assert!(!trigger.check(600.0, 1000.0));
        assert!(trigger.check(601.0, 1000.0));
        assert!(!trigger.check(900.0, 1000.0));
        assert!(trigger.has_fired());
    }

    #[test]
    fn scrolling_past_sixty_percent_reveals_manifest_and_emits_wave() {
        let (mut app, elements) = scroll_app(ViewportSize::new(1280.0, 1000.0).unwrap());

        app.world_mut().send_event(ScrollChanged { offset: 601.0 });
        app.update();

        assert!(app.world().get::<ManifestActive>(elements.manifest).is_some());
        assert_eq!(story_particles(&mut app), 50);
        assert_eq!(app.world().resource::<PageScroll>().offset, 601.0);
    }

    #[test]
    fn further_scrolling_does_not_emit_again() {
        let (mut app, _) = scroll_app(ViewportSize::new(1280.0, 1000.0).unwrap());

        app.world_mut().send_event(ScrollChanged { offset: 700.0 });
        app.update();
        app.world_mut().send_event(ScrollChanged { offset: 800.0 });
        app.world_mut().send_event(ScrollChanged { offset: 900.0 });
        app.update();

        assert_eq!(story_particles(&mut app), 50);
    }

    #[test]
    fn scrolling_short_of_threshold_does_nothing() {
        let (mut app, elements) = scroll_app(ViewportSize::new(1280.0, 1000.0).unwrap());

        app.world_mut().send_event(ScrollChanged { offset: 600.0 });
        app.update();

        assert!(app.world().get::<ManifestActive>(elements.manifest).is_none());
        assert_eq!(story_particles(&mut app), 0);
    }

    #[test]
    fn wave_particles_rise_half_the_viewport_within_spread() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        let viewport = ViewportSize::new(800.0, 600.0).unwrap();

        app.world_mut()
            .run_system_once(move |mut commands: Commands| {
                let mut rng = StdRng::seed_from_u64(5);
                emit_particle_wave(&mut commands, &viewport, 20, &mut rng);
            })
            .unwrap();

        let mut query = app.world_mut().query::<&Tween>();
        let tweens: Vec<_> = query.iter(app.world()).collect();
        assert_eq!(tweens.len(), 20);
        for tween in tweens {
            let TweenTrack::Ui { from, to } = tween.track else {
                panic!("story particles animate their overlay box");
            };
            assert_eq!(from.left, 400.0);
            assert_eq!(from.top, 600.0);
            assert_eq!(to.top, 300.0);
            assert_eq!(to.alpha, 0.0);
            assert!((to.left - from.left).abs() <= 50.0);
            assert_eq!(tween.duration, 2.0);
        }
    }
}
