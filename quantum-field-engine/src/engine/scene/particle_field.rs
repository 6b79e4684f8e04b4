use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use constants::particle_field::{FIELD_EXTENT, MAX_FIELD_PARTICLES};
use rand::Rng;

use crate::engine::core::settings::{DriftAxis, DriftSettings, FieldSettings, Wave};
use crate::engine::render::particle_material::ParticleFieldMaterial;
use crate::error::QuantumError;

/// Point cloud scattered uniformly through a cube centred on the origin.
/// The coordinate buffer holds exactly `3 * count` values and is never resized.
#[derive(Component, Debug, Clone)]
pub struct ParticleCloud {
    positions: Box<[f32]>,
    pub size: f32,
    pub colour: Color,
}

impl ParticleCloud {
    pub fn generate<R: Rng + ?Sized>(count: usize, size: f32, colour: Color, rng: &mut R) -> Self {
        let positions = (0..count * 3)
            .map(|_| (rng.r#gen::<f32>() - 0.5) * FIELD_EXTENT)
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            positions,
            size,
            colour,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat xyz buffer.
    pub fn coordinates(&self) -> &[f32] {
        &self.positions
    }

    pub fn points(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }
}

/// Marks an entity as part of the narrative-visible scene graph.
/// `order` is the insertion order used to stagger scene-wide animations.
#[derive(Component, Debug, Clone, Copy)]
pub struct SceneNode {
    pub order: usize,
}

/// Per-frame motion of a particle field.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ParticleDrift {
    /// Euler XYZ rotation added every frame.
    pub spin: Vec3,
    pub axis: DriftAxis,
    pub wave: Wave,
    pub amplitude: f32,
    pub frequency: f32,
}

impl ParticleDrift {
    pub fn new(spin: [f32; 3], drift: DriftSettings) -> Self {
        Self {
            spin: Vec3::from_array(spin),
            axis: drift.axis,
            wave: drift.wave,
            amplitude: drift.amplitude,
            frequency: drift.frequency,
        }
    }

    /// Offset along the drift axis at `elapsed` seconds.
    pub fn offset(&self, elapsed: f32) -> f32 {
        let phase = elapsed * self.frequency;
        let wave = match self.wave {
            Wave::Sine => phase.sin(),
            Wave::Cosine => phase.cos(),
        };
        wave * self.amplitude
    }

    /// Next transform of a field given its current one. Depends only on the
    /// inputs; the Z translation is left untouched.
    pub fn advance(&self, current: &Transform, elapsed: f32) -> Transform {
        let mut next = *current;
        next.rotation *= Quat::from_euler(EulerRot::XYZ, self.spin.x, self.spin.y, self.spin.z);

        let offset = self.offset(elapsed);
        match self.axis {
            DriftAxis::X => next.translation.x = offset,
            DriftAxis::Y => next.translation.y = offset,
        }
        next
    }
}

/// Vertex count of a billboard mesh for `point_count` particles.
pub fn billboard_vertex_count(point_count: usize) -> Result<u32, QuantumError> {
    if point_count > MAX_FIELD_PARTICLES {
        return Err(QuantumError::TooManyParticles(point_count));
    }
    point_count
        .checked_mul(4)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(QuantumError::TooManyParticles(point_count))
}

/// Build a billboard mesh for a particle cloud.
/// Each point expands to a quad: four vertices sharing the point centre,
/// with the corner in UV_0 for the vertex shader to offset in view space.
pub fn create_particle_mesh(cloud: &ParticleCloud) -> Result<Mesh, QuantumError> {
    const CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

    let point_count = cloud.len();
    billboard_vertex_count(point_count)?;
    let mut centres = Vec::with_capacity(point_count * 4);
    let mut corners = Vec::with_capacity(point_count * 4);
    let mut indices = Vec::with_capacity(point_count * 6);

    for (base, point) in (0u32..).step_by(4).zip(cloud.points()) {
        for corner in CORNERS {
            centres.push(point);
            corners.push(corner);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Ok(Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, centres)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, corners)
    .with_inserted_indices(Indices::U32(indices)))
}

/// Spawn one particle field from its settings and tag it as a scene node.
pub fn spawn_particle_field<R: Rng + ?Sized>(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ParticleFieldMaterial>,
    name: &'static str,
    settings: &FieldSettings,
    order: usize,
    rng: &mut R,
) -> Result<Entity, QuantumError> {
    let colour = settings.parsed_colour()?;
    billboard_vertex_count(settings.count)?;
    let cloud = ParticleCloud::generate(settings.count, settings.size, colour, rng);
    let mesh = meshes.add(create_particle_mesh(&cloud)?);
    let material = materials.add(ParticleFieldMaterial::new(colour, settings.size));

    let [rx, ry, rz] = settings.initial_rotation;
    let transform = Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, rx, ry, rz));

    info!("Spawned {} with {} particles", name, cloud.len());

    Ok(commands
        .spawn((
            Name::new(name),
            Mesh3d(mesh),
            MeshMaterial3d(material),
            transform,
            ParticleDrift::new(settings.spin, settings.drift),
            SceneNode { order },
            cloud,
        ))
        .id())
}
