use bevy::prelude::*;

use crate::engine::scene::particle_field::ParticleDrift;

/// Advance every particle field one frame from the clock's elapsed time.
pub fn drift_particle_fields(
    time: Res<Time>,
    mut fields: Query<(&ParticleDrift, &mut Transform)>,
) {
    let elapsed = time.elapsed_secs();
    for (drift, mut transform) in &mut fields {
        *transform = drift.advance(&transform, elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::settings::FieldSettings;

    #[test]
    fn fields_move_only_while_system_runs() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_systems(Update, drift_particle_fields);

        let settings = FieldSettings::chaos_field();
        let field = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, 0.0, 7.0),
                ParticleDrift::new(settings.spin, settings.drift),
            ))
            .id();

        app.update();
        app.update();

        let transform = app.world().get::<Transform>(field).unwrap();
        assert_ne!(transform.rotation, Quat::IDENTITY);
        assert_eq!(transform.translation.z, 7.0);
        assert!(transform.translation.x.abs() <= 0.3);
    }
}
