/// Additive billboard material for particle fields
use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::render::mesh::MeshVertexBufferLayoutRef;
use bevy::render::render_resource::{
    RenderPipelineDescriptor, ShaderType, SpecializedMeshPipelineError,
};
use bevy::{
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderRef},
};

const SHADER_PATH: &str = "shaders/particle_field.wgsl";

#[derive(Debug, Clone, Copy, ShaderType)]
pub struct ParticleFieldUniform {
    pub colour: Vec4,
    pub size: f32,
}

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct ParticleFieldMaterial {
    #[uniform(0)]
    pub params: ParticleFieldUniform,
}

impl ParticleFieldMaterial {
    pub fn new(colour: Color, size: f32) -> Self {
        Self {
            params: ParticleFieldUniform {
                colour: colour.to_linear().to_vec4(),
                size,
            },
        }
    }
}

impl Material for ParticleFieldMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }

    // Positions carry the point centre, UV_0 the quad corner.
    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        Ok(())
    }
}
