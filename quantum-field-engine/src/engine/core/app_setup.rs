use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::animation::tween::{TweenFinished, advance_tweens};
use crate::engine::camera::scene_camera::{
    ViewportSize, handle_window_resize, spawn_scene_camera, sync_viewport_from_window,
};
use crate::engine::core::app_state::{AppState, StartupPhase};
use crate::engine::core::settings::QuantumSettings;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::settings_loader::{SettingsLoader, load_settings_system, start_loading};
use crate::engine::render::particle_material::ParticleFieldMaterial;
use crate::engine::scene::background::spawn_space_background;
use crate::engine::scene::particle_field::spawn_particle_field;
use crate::engine::systems::drift::drift_particle_fields;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::render_loop::{
    RenderLoop, RenderLoopCommand, apply_render_loop_commands, render_loop_running,
};
use crate::narrative::NarrativePlugin;
use crate::rpc::host_events::HostEventsPlugin;
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::{fps_text_update_system, spawn_fps_overlay};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(MaterialPlugin::<ParticleFieldMaterial>::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers QuantumSettings as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<QuantumSettings>::new(&["settings.json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(HostEventsPlugin)
        .add_plugins(NarrativePlugin)
        .insert_resource(ClearColor(Color::BLACK));

    // Initialise resources early
    app.init_resource::<SettingsLoader>()
        .init_resource::<ViewportSize>()
        .init_resource::<RenderLoop>()
        .add_event::<RenderLoopCommand>()
        .add_event::<TweenFinished>();

    app.configure_sets(
        OnEnter(AppState::Running),
        (StartupPhase::Scene, StartupPhase::Narrative).chain(),
    );

    app.add_systems(Startup, start_loading)
        .add_systems(
            Update,
            load_settings_system.run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            OnEnter(AppState::Running),
            (sync_viewport_from_window, setup_scene)
                .chain()
                .in_set(StartupPhase::Scene),
        );

    // Loop commands are applied even while stopped so a stopped loop can restart.
    app.add_systems(Update, apply_render_loop_commands);

    app.add_systems(
        Update,
        (handle_window_resize, drift_particle_fields, advance_tweens)
            .chain()
            .after(apply_render_loop_commands)
            .run_if(in_state(AppState::Running))
            .run_if(render_loop_running),
    );

    app.add_systems(
        Update,
        fps_notification_system
            .run_if(in_state(AppState::Running))
            .run_if(render_loop_running),
    );

    // Add fps_text_update_system only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

/// Build the scene graph: camera, both particle fields in scene order and the
/// noise background. The loop starts here unless the host stopped or disposed
/// it while settings were loading; cameras are spawned to match.
fn setup_scene(
    mut commands: Commands,
    settings: Res<QuantumSettings>,
    viewport: Res<ViewportSize>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ParticleFieldMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut render_loop: ResMut<RenderLoop>,
) {
    let mut rng = rand::thread_rng();
    let active = render_loop.begin();

    spawn_scene_camera(&mut commands, &viewport, settings.camera_distance, active);

    for (order, (name, field)) in settings.fields().into_iter().enumerate() {
        if let Err(e) = spawn_particle_field(
            &mut commands,
            &mut meshes,
            &mut materials,
            name,
            field,
            order,
            &mut rng,
        ) {
            error!("Skipping {}: {}", name, e);
        }
    }

    spawn_space_background(
        &mut commands,
        &mut images,
        viewport.as_vec2(),
        active,
        &mut rng,
    );

    #[cfg(not(target_arch = "wasm32"))]
    spawn_fps_overlay(&mut commands);

    info!("✓ Scene ready, render loop {}", render_loop.state().as_str());
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
