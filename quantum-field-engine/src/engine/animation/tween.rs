use bevy::prelude::*;

/// Easing curves, named after the timing functions the page stylesheet uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out.
    #[default]
    Power1Out,
    /// Quintic ease-in-out.
    Power4InOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t).powi(2),
            Ease::Power4InOut => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
        }
    }
}

/// Animatable box of an absolutely positioned overlay node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UiFrame {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub alpha: f32,
}

impl UiFrame {
    pub fn new(left: f32, top: f32, width: f32, height: f32, alpha: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            alpha,
        }
    }

    /// Capture the pixel box of a node. Non-pixel values read as zero.
    pub fn of_node(node: &Node, alpha: f32) -> Self {
        Self::new(
            px(node.left),
            px(node.top),
            px(node.width),
            px(node.height),
            alpha,
        )
    }

    pub fn lerp(&self, to: &Self, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            left: mix(self.left, to.left),
            top: mix(self.top, to.top),
            width: mix(self.width, to.width),
            height: mix(self.height, to.height),
            alpha: mix(self.alpha, to.alpha),
        }
    }

    pub fn write_to(&self, node: &mut Node) {
        node.left = Val::Px(self.left);
        node.top = Val::Px(self.top);
        node.width = Val::Px(self.width);
        node.height = Val::Px(self.height);
    }
}

pub fn px(value: Val) -> f32 {
    match value {
        Val::Px(v) => v,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTrack {
    /// Overlay box and opacity.
    Ui { from: UiFrame, to: UiFrame },
    /// Opacity only. Layout is left to flex or the relayout pass.
    Alpha { from: f32, to: f32 },
    /// Translation along Z of a 3D entity.
    Depth { from: f32, to: f32 },
}

/// Time-bounded interpolation attached to the entity it animates.
/// Removed once finished; finishing is reported through [`TweenFinished`].
#[derive(Component, Debug, Clone)]
pub struct Tween {
    pub track: TweenTrack,
    pub duration: f32,
    pub delay: f32,
    pub ease: Ease,
    elapsed: f32,
}

impl Tween {
    pub fn new(track: TweenTrack, duration: f32) -> Self {
        Self {
            track,
            duration,
            delay: 0.0,
            ease: Ease::default(),
            elapsed: 0.0,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Eased progress in `[0, 1]`. Held at zero while the delay runs.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.elapsed >= self.delay { 1.0 } else { 0.0 };
        }
        let linear = ((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0);
        self.ease.apply(linear)
    }

    pub fn advance(&mut self, delta: f32) -> f32 {
        self.elapsed += delta.max(0.0);
        self.progress()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration.max(0.0)
    }
}

/// Overlay element that removes itself when its tween ends.
#[derive(Component, Debug, Clone, Copy)]
pub struct Transient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenOutcome {
    Completed,
    Cancelled,
}

/// Sent exactly once per tween.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenFinished {
    pub entity: Entity,
    pub outcome: TweenOutcome,
}

fn apply_alpha(
    alpha: f32,
    background: Option<Mut<BackgroundColor>>,
    border: Option<Mut<BorderColor>>,
    text: Option<Mut<TextColor>>,
) {
    if let Some(mut background) = background {
        background.0.set_alpha(alpha);
    }
    if let Some(mut border) = border {
        border.0.set_alpha(alpha);
    }
    if let Some(mut text) = text {
        text.0.set_alpha(alpha);
    }
}

pub fn advance_tweens(
    mut commands: Commands,
    time: Res<Time>,
    mut tweens: Query<(
        Entity,
        &mut Tween,
        Option<&mut Node>,
        Option<&mut Transform>,
        Option<&mut BackgroundColor>,
        Option<&mut BorderColor>,
        Option<&mut TextColor>,
        Has<Transient>,
    )>,
    mut finished: EventWriter<TweenFinished>,
) {
    let delta = time.delta_secs();

    for (entity, mut tween, node, transform, background, border, text, transient) in &mut tweens {
        let t = tween.advance(delta);

        match tween.track {
            TweenTrack::Ui { from, to } => {
                let frame = from.lerp(&to, t);
                if let Some(mut node) = node {
                    frame.write_to(&mut node);
                }
                apply_alpha(frame.alpha, background, border, text);
            }
            TweenTrack::Alpha { from, to } => {
                apply_alpha(from + (to - from) * t, background, border, text);
            }
            TweenTrack::Depth { from, to } => {
                if let Some(mut transform) = transform {
                    transform.translation.z = from + (to - from) * t;
                }
            }
        }

        if tween.is_finished() {
            if transient {
                commands.entity(entity).despawn();
            } else {
                commands.entity(entity).remove::<Tween>();
            }
            finished.write(TweenFinished {
                entity,
                outcome: TweenOutcome::Completed,
            });
        }
    }
}

/// Stop every running tween where it stands and clear transient elements.
pub fn cancel_tweens(
    commands: &mut Commands,
    tweens: &Query<(Entity, Has<Transient>), With<Tween>>,
    finished: &mut EventWriter<TweenFinished>,
) -> usize {
    let mut cancelled = 0;
    for (entity, transient) in tweens.iter() {
        if transient {
            commands.entity(entity).despawn();
        } else {
            commands.entity(entity).remove::<Tween>();
        }
        finished.write(TweenFinished {
            entity,
            outcome: TweenOutcome::Cancelled,
        });
        cancelled += 1;
    }
    cancelled
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bevy::ecs::event::EventCursor;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn test_app(step_ms: u64) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
                step_ms,
            )))
            .add_event::<TweenFinished>()
            .add_systems(Update, advance_tweens);
        app
    }

    fn drain(app: &App, cursor: &mut EventCursor<TweenFinished>) -> Vec<TweenFinished> {
        let events = app.world().resource::<Events<TweenFinished>>();
        cursor.read(events).copied().collect()
    }

    #[test]
    fn easing_curves_hit_endpoints() {
        for ease in [Ease::Linear, Ease::Power1Out, Ease::Power4InOut] {
            assert_relative_eq!(ease.apply(0.0), 0.0);
            assert_relative_eq!(ease.apply(1.0), 1.0);
        }
        assert_relative_eq!(Ease::Power4InOut.apply(0.5), 0.5);
        assert!(Ease::Power4InOut.apply(0.25) < 0.25);
        assert!(Ease::Power1Out.apply(0.25) > 0.25);
    }

    #[test]
    fn delay_holds_progress_at_zero() {
        let mut tween = Tween::new(TweenTrack::Depth { from: 0.0, to: 10.0 }, 1.0)
            .with_delay(0.5)
            .with_ease(Ease::Linear);

        assert_eq!(tween.advance(0.4), 0.0);
        assert_relative_eq!(tween.advance(0.6), 0.5);
        assert!(!tween.is_finished());
        assert_eq!(tween.advance(1.0), 1.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn frame_lerp_blends_every_field() {
        let a = UiFrame::new(0.0, 0.0, 120.0, 120.0, 1.0);
        let b = UiFrame::new(10.0, 20.0, 300.0, 300.0, 0.0);
        assert_eq!(a.lerp(&b, 0.5), UiFrame::new(5.0, 10.0, 210.0, 210.0, 0.5));
    }

    #[test]
    fn transient_element_despawns_and_reports_once() {
        let mut app = test_app(250);
        let from = UiFrame::new(0.0, 0.0, 120.0, 120.0, 1.0);
        let to = UiFrame::new(0.0, 0.0, 300.0, 300.0, 0.0);
        let entity = app
            .world_mut()
            .spawn((
                Node::default(),
                BorderColor(Color::WHITE),
                Tween::new(TweenTrack::Ui { from, to }, 1.0),
                Transient,
            ))
            .id();

        let mut cursor = EventCursor::default();
        let mut reports = Vec::new();
        for _ in 0..12 {
            app.update();
            reports.extend(drain(&app, &mut cursor));
        }

        assert!(app.world().get_entity(entity).is_err());
        assert_eq!(
            reports,
            vec![TweenFinished {
                entity,
                outcome: TweenOutcome::Completed
            }]
        );
    }

    #[test]
    fn alpha_tween_fades_text_without_touching_layout() {
        let mut app = test_app(100);
        let node = Node {
            left: Val::Px(16.0),
            width: Val::Percent(100.0),
            ..default()
        };
        let entity = app
            .world_mut()
            .spawn((
                node.clone(),
                TextColor(Color::WHITE.with_alpha(0.0)),
                Tween::new(TweenTrack::Alpha { from: 0.0, to: 1.0 }, 0.5)
                    .with_ease(Ease::Linear),
            ))
            .id();

        app.update();
        app.update();
        let halfway = app.world().get::<TextColor>(entity).unwrap().0.alpha();
        assert!(halfway > 0.0 && halfway < 1.0);

        for _ in 0..8 {
            app.update();
        }
        assert_eq!(app.world().get::<TextColor>(entity).unwrap().0.alpha(), 1.0);
        assert_eq!(app.world().get::<Node>(entity).unwrap(), &node);
        assert!(app.world().get::<Tween>(entity).is_none());
    }

    #[test]
    fn depth_tween_lands_on_target_and_keeps_entity() {
        let mut app = test_app(500);
        let entity = app
            .world_mut()
            .spawn((
                Transform::from_xyz(1.0, 2.0, 0.0),
                Tween::new(TweenTrack::Depth { from: 0.0, to: 100.0 }, 2.0)
                    .with_ease(Ease::Power4InOut),
            ))
            .id();

        for _ in 0..16 {
            app.update();
        }

        let transform = app.world().get::<Transform>(entity).unwrap();
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 100.0));
        assert!(app.world().get::<Tween>(entity).is_none());
    }

    #[test]
    fn cancelling_reports_each_tween_once() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_event::<TweenFinished>();

        let track = TweenTrack::Depth { from: 0.0, to: 1.0 };
        let transient = app
            .world_mut()
            .spawn((Tween::new(track, 1.0), Transient))
            .id();
        let kept = app.world_mut().spawn(Tween::new(track, 1.0)).id();

        app.add_systems(
            Update,
            |mut commands: Commands,
             tweens: Query<(Entity, Has<Transient>), With<Tween>>,
             mut finished: EventWriter<TweenFinished>| {
                cancel_tweens(&mut commands, &tweens, &mut finished);
            },
        );
        let mut cursor = EventCursor::default();
        app.update();

        assert!(app.world().get_entity(transient).is_err());
        assert!(app.world().get::<Tween>(kept).is_none());
        assert_eq!(drain(&app, &mut cursor).len(), 2);

        app.update();
        assert!(drain(&app, &mut cursor).is_empty());
    }
}
