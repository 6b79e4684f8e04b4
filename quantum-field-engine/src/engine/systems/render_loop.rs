use bevy::prelude::*;

use crate::engine::animation::tween::{Transient, Tween, TweenFinished, cancel_tweens};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoopState {
    /// Scene not built yet.
    #[default]
    Pending,
    Stopped,
    Running,
    /// Terminal. The loop cannot be restarted.
    Disposed,
}

impl LoopState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopState::Pending => "pending",
            LoopState::Stopped => "stopped",
            LoopState::Running => "running",
            LoopState::Disposed => "disposed",
        }
    }
}

/// Gate for every per-frame update of the scene and overlay.
#[derive(Resource, Debug, Default)]
pub struct RenderLoop {
    state: LoopState,
}

impl RenderLoop {
    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Returns true if the state changed.
    pub fn start(&mut self) -> bool {
        match self.state {
            LoopState::Pending | LoopState::Stopped => {
                self.state = LoopState::Running;
                true
            }
            LoopState::Running => false,
            LoopState::Disposed => {
                warn!("Render loop already disposed, ignoring start");
                false
            }
        }
    }

    /// Safe to call any number of times. A stop requested before the scene
    /// exists is kept, so [`RenderLoop::begin`] will not run the loop.
    pub fn stop(&mut self) -> bool {
        match self.state {
            LoopState::Pending | LoopState::Running => {
                self.state = LoopState::Stopped;
                true
            }
            LoopState::Stopped | LoopState::Disposed => false,
        }
    }

    /// Start once the scene is built, unless the host already asked for a
    /// stop or dispose. Returns whether the loop is running.
    pub fn begin(&mut self) -> bool {
        if self.state == LoopState::Pending {
            self.state = LoopState::Running;
        }
        self.is_running()
    }

    pub fn dispose(&mut self) -> bool {
        if self.state == LoopState::Disposed {
            return false;
        }
        self.state = LoopState::Disposed;
        true
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderLoopCommand {
    Start,
    Stop,
    Dispose,
}

pub fn render_loop_running(render_loop: Res<RenderLoop>) -> bool {
    render_loop.is_running()
}

/// Apply loop commands. A stopped loop also deactivates every camera so no
/// further frames are drawn; disposing cancels in-flight tweens.
pub fn apply_render_loop_commands(
    mut loop_commands: EventReader<RenderLoopCommand>,
    mut render_loop: ResMut<RenderLoop>,
    mut cameras: Query<&mut Camera>,
    mut commands: Commands,
    tweens: Query<(Entity, Has<Transient>), With<Tween>>,
    mut finished: EventWriter<TweenFinished>,
) {
    let mut changed = false;
    for command in loop_commands.read() {
        let applied = match command {
            RenderLoopCommand::Start => render_loop.start(),
            RenderLoopCommand::Stop => render_loop.stop(),
            RenderLoopCommand::Dispose => {
                let disposed = render_loop.dispose();
                if disposed {
                    let cancelled = cancel_tweens(&mut commands, &tweens, &mut finished);
                    info!("Render loop disposed, {} tweens cancelled", cancelled);
                }
                disposed
            }
        };
        changed |= applied;
    }

    if changed {
        info!("→ Render loop {}", render_loop.state().as_str());
        let active = render_loop.is_running();
        for mut camera in &mut cameras {
            camera.is_active = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::animation::tween::TweenTrack;

    #[test]
    fn stop_is_idempotent() {
        let mut render_loop = RenderLoop::default();
        assert!(render_loop.start());
        assert!(render_loop.stop());
        assert!(!render_loop.stop());
        assert_eq!(render_loop.state(), LoopState::Stopped);
    }

    #[test]
    fn begin_respects_requests_made_before_the_scene() {
        let mut render_loop = RenderLoop::default();
        assert!(!render_loop.is_running());
        assert!(render_loop.begin());

        let mut stopped_early = RenderLoop::default();
        assert!(stopped_early.stop());
        assert!(!stopped_early.begin());
        assert_eq!(stopped_early.state(), LoopState::Stopped);

        let mut disposed_early = RenderLoop::default();
        assert!(disposed_early.dispose());
        assert!(!disposed_early.begin());
        assert_eq!(disposed_early.state(), LoopState::Disposed);
    }

    #[test]
    fn disposed_loop_cannot_restart() {
        let mut render_loop = RenderLoop::default();
        render_loop.start();
        assert!(render_loop.dispose());
        assert!(!render_loop.dispose());
        assert!(!render_loop.start());
        assert!(!render_loop.is_running());
        assert!(!render_loop.stop());
    }

    #[test]
    fn dispose_command_deactivates_cameras_and_clears_transients() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<RenderLoopCommand>()
            .add_event::<TweenFinished>()
            .init_resource::<RenderLoop>()
            .add_systems(Update, apply_render_loop_commands);
        app.world_mut().resource_mut::<RenderLoop>().start();

        let camera = app.world_mut().spawn(Camera::default()).id();
        let track = TweenTrack::Depth { from: 0.0, to: 1.0 };
        let ripple = app
            .world_mut()
            .spawn((Tween::new(track, 1.0), Transient))
            .id();

        app.world_mut().send_event(RenderLoopCommand::Dispose);
        app.world_mut().send_event(RenderLoopCommand::Start);
        app.update();

        assert_eq!(
            app.world().resource::<RenderLoop>().state(),
            LoopState::Disposed
        );
        assert!(!app.world().get::<Camera>(camera).unwrap().is_active);
        assert!(app.world().get_entity(ripple).is_err());
    }

    #[test]
    fn stop_then_start_reactivates_cameras() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<RenderLoopCommand>()
            .add_event::<TweenFinished>()
            .init_resource::<RenderLoop>()
            .add_systems(Update, apply_render_loop_commands);
        app.world_mut().resource_mut::<RenderLoop>().start();
        let camera = app.world_mut().spawn(Camera::default()).id();

        app.world_mut().send_event(RenderLoopCommand::Stop);
        app.update();
        assert!(!app.world().get::<Camera>(camera).unwrap().is_active);

        app.world_mut().send_event(RenderLoopCommand::Start);
        app.update();
        assert!(app.world().get::<Camera>(camera).unwrap().is_active);
    }
}
