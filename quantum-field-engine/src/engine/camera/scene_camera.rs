use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use constants::camera::{CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR};

use crate::engine::scene::background::SpaceBackground;
use crate::error::QuantumError;

/// Logical size of the viewport in pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Result<Self, QuantumError> {
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            Ok(Self { width, height })
        } else {
            Err(QuantumError::InvalidViewport { width, height })
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Component)]
pub struct SceneCamera;

pub fn scene_projection(viewport: &ViewportSize) -> PerspectiveProjection {
    PerspectiveProjection {
        fov: CAMERA_FOV_DEGREES.to_radians(),
        aspect_ratio: viewport.aspect_ratio(),
        near: CAMERA_NEAR,
        far: CAMERA_FAR,
    }
}

pub fn spawn_scene_camera(
    commands: &mut Commands,
    viewport: &ViewportSize,
    distance: f32,
    active: bool,
) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            is_active: active,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        Projection::Perspective(scene_projection(viewport)),
        Transform::from_xyz(0.0, 0.0, distance).looking_at(Vec3::ZERO, Vec3::Y),
        IsDefaultUiCamera,
        SceneCamera,
    ));
}

/// Recompute the viewport and camera aspect for a new window size.
/// Applying the same size twice leaves the same state as applying it once.
pub fn apply_resize<'a>(
    viewport: &mut ViewportSize,
    projections: impl IntoIterator<Item = &'a mut Projection>,
    width: f32,
    height: f32,
) -> Result<(), QuantumError> {
    let size = ViewportSize::new(width, height)?;
    *viewport = size;
    for projection in projections {
        if let Projection::Perspective(perspective) = projection {
            perspective.aspect_ratio = size.aspect_ratio();
        }
    }
    Ok(())
}

/// Read the primary window size once the window exists.
pub fn sync_viewport_from_window(
    window: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<ViewportSize>,
) {
    let Ok(window) = window.single() else {
        return;
    };
    match ViewportSize::new(window.width(), window.height()) {
        Ok(size) => *viewport = size,
        Err(e) => warn!("Keeping default viewport: {}", e),
    }
}

pub fn handle_window_resize(
    mut resize_events: EventReader<WindowResized>,
    mut viewport: ResMut<ViewportSize>,
    mut cameras: Query<&mut Projection, With<SceneCamera>>,
    mut backgrounds: Query<&mut Sprite, With<SpaceBackground>>,
) {
    let Some(resize) = resize_events.read().last() else {
        return;
    };

    let projections = cameras.iter_mut().map(|projection| projection.into_inner());
    if let Err(e) = apply_resize(&mut viewport, projections, resize.width, resize.height) {
        warn!("Ignoring resize: {}", e);
        return;
    }

    for mut sprite in &mut backgrounds {
        sprite.custom_size = Some(viewport.as_vec2());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn aspect(projection: &Projection) -> f32 {
        match projection {
            Projection::Perspective(p) => p.aspect_ratio,
            _ => panic!("expected perspective projection"),
        }
    }

    #[test]
    fn resize_is_idempotent() {
        let mut viewport = ViewportSize::default();
        let mut projection = Projection::Perspective(scene_projection(&viewport));

        apply_resize(&mut viewport, [&mut projection], 1920.0, 1080.0).unwrap();
        let once = (viewport, aspect(&projection));
        apply_resize(&mut viewport, [&mut projection], 1920.0, 1080.0).unwrap();

        assert_eq!(once, (viewport, aspect(&projection)));
        assert_relative_eq!(aspect(&projection), 1920.0 / 1080.0);
    }

    #[test]
    fn zero_height_is_rejected_without_changing_state() {
        let mut viewport = ViewportSize::default();
        let mut projection = Projection::Perspective(scene_projection(&viewport));
        let before = aspect(&projection);

        let result = apply_resize(&mut viewport, [&mut projection], 800.0, 0.0);

        assert!(matches!(result, Err(QuantumError::InvalidViewport { .. })));
        assert_eq!(viewport, ViewportSize::default());
        assert_eq!(aspect(&projection), before);
    }

    #[test]
    fn projection_uses_fixed_lens() {
        let projection = scene_projection(&ViewportSize::new(1000.0, 500.0).unwrap());
        assert_relative_eq!(projection.fov, 75f32.to_radians());
        assert_eq!(projection.near, 0.1);
        assert_eq!(projection.far, 1000.0);
        assert_eq!(projection.aspect_ratio, 2.0);
    }

    #[test]
    fn resize_system_updates_camera_and_viewport() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<WindowResized>()
            .init_resource::<ViewportSize>()
            .add_systems(Update, handle_window_resize);

        let camera = app
            .world_mut()
            .spawn((
                Projection::Perspective(scene_projection(&ViewportSize::default())),
                SceneCamera,
            ))
            .id();
        let window = app.world_mut().spawn_empty().id();

        app.world_mut().send_event(WindowResized {
            window,
            width: 600.0,
            height: 300.0,
        });
        app.update();

        assert_eq!(
            *app.world().resource::<ViewportSize>(),
            ViewportSize::new(600.0, 300.0).unwrap()
        );
        let projection = app.world().get::<Projection>(camera).unwrap();
        assert_eq!(aspect(projection), 2.0);
    }
}
