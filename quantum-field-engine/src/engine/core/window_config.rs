use bevy::prelude::*;
use bevy::window::PresentMode;

#[cfg(target_arch = "wasm32")]
use bevy::window::WindowResolution;
#[cfg(target_arch = "wasm32")]
use constants::render_settings::{CANVAS_SELECTOR, MAX_PIXEL_RATIO};

#[cfg(target_arch = "wasm32")]
use crate::error::QuantumError;

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some(CANVAS_SELECTOR.into()),
            fit_canvas_to_parent: true,
            resolution: WindowResolution::default()
                .with_scale_factor_override(capped_pixel_ratio()),
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Quantum Field".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn capped_pixel_ratio() -> f32 {
    let ratio = web_sys::window()
        .map(|window| window.device_pixel_ratio() as f32)
        .unwrap_or(1.0);
    ratio.min(MAX_PIXEL_RATIO)
}

/// The page must provide the canvas before the app is built; winit would
/// otherwise create a detached one.
#[cfg(target_arch = "wasm32")]
pub fn verify_canvas_surface() -> Result<(), QuantumError> {
    let missing = || QuantumError::MissingSurface(CANVAS_SELECTOR.to_string());

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(missing)?;
    match document.query_selector(CANVAS_SELECTOR) {
        Ok(Some(_)) => Ok(()),
        _ => Err(missing()),
    }
}
