use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::narrative::MAX_WAVE_PARTICLES;
use constants::particle_field::MAX_FIELD_PARTICLES;
use constants::render_settings::SETTINGS_PATH;

use crate::engine::core::app_state::AppState;
use crate::engine::core::settings::{FieldSettings, QuantumSettings};

#[derive(Resource, Default)]
pub struct SettingsLoader {
    handle: Option<Handle<QuantumSettings>>,
}

/// Result of polling the settings asset once.
#[derive(Debug, PartialEq)]
pub enum SettingsStatus {
    Pending,
    Ready(QuantumSettings),
    Fallback,
}

pub fn start_loading(mut loader: ResMut<SettingsLoader>, asset_server: Res<AssetServer>) {
    info!("→ Loading {}", SETTINGS_PATH);
    loader.handle = Some(asset_server.load(SETTINGS_PATH));
}

pub fn settings_status(loaded: Option<&QuantumSettings>, state: &LoadState) -> SettingsStatus {
    if let Some(settings) = loaded {
        return SettingsStatus::Ready(settings.clone());
    }
    match state {
        LoadState::Failed(_) => SettingsStatus::Fallback,
        _ => SettingsStatus::Pending,
    }
}

/// Replace values that would break the scene with their defaults.
pub fn sanitize_settings(mut settings: QuantumSettings) -> QuantumSettings {
    let defaults = QuantumSettings::default();

    for (field, fallback) in [
        (&mut settings.primary_storm, FieldSettings::primary_storm()),
        (&mut settings.chaos_field, FieldSettings::chaos_field()),
    ] {
        if let Err(e) = field.parsed_colour() {
            warn!("{}, using {}", e, fallback.colour);
            field.colour = fallback.colour;
        }
        if !(field.size.is_finite() && field.size > 0.0) {
            warn!("Invalid particle size {}, using {}", field.size, fallback.size);
            field.size = fallback.size;
        }
        if field.count > MAX_FIELD_PARTICLES {
            warn!(
                "Particle count {} above {}, clamping",
                field.count, MAX_FIELD_PARTICLES
            );
            field.count = MAX_FIELD_PARTICLES;
        }
    }

    if settings.wave_particle_count > MAX_WAVE_PARTICLES {
        warn!(
            "Wave particle count {} above {}, clamping",
            settings.wave_particle_count, MAX_WAVE_PARTICLES
        );
        settings.wave_particle_count = MAX_WAVE_PARTICLES;
    }

    if !(0.0..=1.0).contains(&settings.scroll_threshold_fraction) {
        warn!(
            "Scroll threshold {} outside 0..=1, using {}",
            settings.scroll_threshold_fraction, defaults.scroll_threshold_fraction
        );
        settings.scroll_threshold_fraction = defaults.scroll_threshold_fraction;
    }
    if !(settings.camera_distance.is_finite() && settings.camera_distance > 0.0) {
        settings.camera_distance = defaults.camera_distance;
    }

    settings
}

pub fn load_settings_system(
    loader: Res<SettingsLoader>,
    asset_server: Res<AssetServer>,
    settings: Res<Assets<QuantumSettings>>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(handle) = loader.handle.as_ref() else {
        return;
    };

    let resolved = match settings_status(settings.get(handle), &asset_server.load_state(handle.id())) {
        SettingsStatus::Pending => return,
        SettingsStatus::Ready(loaded) => {
            info!("✓ Settings loaded");
            loaded
        }
        SettingsStatus::Fallback => {
            warn!("Could not load {}, using built-in defaults", SETTINGS_PATH);
            QuantumSettings::default()
        }
    };

    commands.insert_resource(sanitize_settings(resolved));
    info!("→ Transitioning to Running state");
    next_state.set(AppState::Running);
}
