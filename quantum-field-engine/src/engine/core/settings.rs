use bevy::prelude::*;
use constants::camera::CAMERA_DISTANCE;
use constants::narrative::{SCROLL_THRESHOLD_FRACTION, WAVE_PARTICLE_COUNT};
use constants::particle_field::*;
use serde::Deserialize;

use crate::error::QuantumError;

/// Runtime settings loaded from `quantum.settings.json`.
/// Every field falls back to the compiled defaults when absent.
#[derive(Asset, Resource, TypePath, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct QuantumSettings {
    pub primary_storm: FieldSettings,
    pub chaos_field: FieldSettings,
    pub camera_distance: f32,
    pub scroll_threshold_fraction: f32,
    pub wave_particle_count: usize,
}

impl Default for QuantumSettings {
    fn default() -> Self {
        Self {
            primary_storm: FieldSettings::primary_storm(),
            chaos_field: FieldSettings::chaos_field(),
            camera_distance: CAMERA_DISTANCE,
            scroll_threshold_fraction: SCROLL_THRESHOLD_FRACTION,
            wave_particle_count: WAVE_PARTICLE_COUNT,
        }
    }
}

impl QuantumSettings {
    /// Particle fields in scene order.
    pub fn fields(&self) -> [(&'static str, &FieldSettings); 2] {
        [
            ("primary_storm", &self.primary_storm),
            ("chaos_field", &self.chaos_field),
        ]
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FieldSettings {
    pub count: usize,
    pub size: f32,
    /// CSS style hex colour, `#rrggbb`.
    pub colour: String,
    /// Euler XYZ rotation applied once at spawn (radians).
    #[serde(default)]
    pub initial_rotation: [f32; 3],
    /// Euler XYZ rotation added every frame (radians).
    #[serde(default)]
    pub spin: [f32; 3],
    pub drift: DriftSettings,
}

impl FieldSettings {
    pub fn primary_storm() -> Self {
        Self {
            count: PRIMARY_STORM_COUNT,
            size: PRIMARY_STORM_SIZE,
            colour: PRIMARY_STORM_COLOUR.to_string(),
            initial_rotation: [0.0; 3],
            spin: [0.0, PRIMARY_STORM_SPIN, 0.0],
            drift: DriftSettings {
                axis: DriftAxis::Y,
                wave: Wave::Sine,
                amplitude: PRIMARY_STORM_AMPLITUDE,
                frequency: PRIMARY_STORM_FREQUENCY,
            },
        }
    }

    pub fn chaos_field() -> Self {
        Self {
            count: CHAOS_FIELD_COUNT,
            size: CHAOS_FIELD_SIZE,
            colour: CHAOS_FIELD_COLOUR.to_string(),
            initial_rotation: [CHAOS_FIELD_TILT, 0.0, 0.0],
            spin: [CHAOS_FIELD_SPIN, 0.0, 0.0],
            drift: DriftSettings {
                axis: DriftAxis::X,
                wave: Wave::Cosine,
                amplitude: CHAOS_FIELD_AMPLITUDE,
                frequency: CHAOS_FIELD_FREQUENCY,
            },
        }
    }

    pub fn parsed_colour(&self) -> Result<Color, QuantumError> {
        Srgba::hex(&self.colour)
            .map(Color::Srgba)
            .map_err(|_| QuantumError::InvalidColour(self.colour.clone()))
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DriftSettings {
    pub axis: DriftAxis,
    pub wave: Wave,
    pub amplitude: f32,
    pub frequency: f32,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DriftAxis {
    X,
    Y,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Wave {
    Sine,
    Cosine,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let settings: QuantumSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, QuantumSettings::default());
        assert_eq!(settings.primary_storm.count, 20_000);
        assert_eq!(settings.chaos_field.count, 50_000);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let settings: QuantumSettings = serde_json::from_str(
            r##"{
                "scroll_threshold_fraction": 0.4,
                "chaos_field": {
                    "count": 10,
                    "size": 0.2,
                    "colour": "#ff0000",
                    "drift": { "axis": "y", "wave": "sine", "amplitude": 1.0, "frequency": 2.0 }
                }
            }"##,
        )
        .unwrap();

        assert_eq!(settings.scroll_threshold_fraction, 0.4);
        assert_eq!(settings.chaos_field.count, 10);
        assert_eq!(settings.chaos_field.spin, [0.0; 3]);
        assert_eq!(settings.chaos_field.drift.axis, DriftAxis::Y);
        assert_eq!(settings.primary_storm, FieldSettings::primary_storm());
    }

    #[test]
    fn colour_parsing_reports_bad_hex() {
        let mut field = FieldSettings::primary_storm();
        assert!(field.parsed_colour().is_ok());

        field.colour = "not-a-colour".into();
        assert_eq!(
            field.parsed_colour(),
            Err(QuantumError::InvalidColour("not-a-colour".into()))
        );
    }
}
