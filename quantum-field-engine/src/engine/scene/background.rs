use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::render::view::RenderLayers;
use constants::render_settings::{BACKGROUND_CAMERA_ORDER, BACKGROUND_RENDER_LAYER};
use constants::texture::{NOISE_ALPHA, NOISE_TEXEL_BYTES, NOISE_TEXTURE_SIZE};
use rand::Rng;

/// Full-viewport sprite showing the space noise behind the particle fields.
#[derive(Component)]
pub struct SpaceBackground;

#[derive(Component)]
pub struct BackgroundCamera;

/// RGBA8 texels of a grayscale noise square: every texel gets one uniformly
/// random luminance in all three colour channels and full alpha.
pub fn space_noise_texels<R: Rng + ?Sized>(size: u32, rng: &mut R) -> Vec<u8> {
    let texel_count = (size * size) as usize;
    let mut data = Vec::with_capacity(texel_count * NOISE_TEXEL_BYTES);
    for _ in 0..texel_count {
        let value: u8 = rng.r#gen();
        data.extend_from_slice(&[value, value, value, NOISE_ALPHA]);
    }
    data
}

pub fn generate_space_noise<R: Rng + ?Sized>(rng: &mut R) -> Image {
    Image::new(
        Extent3d {
            width: NOISE_TEXTURE_SIZE,
            height: NOISE_TEXTURE_SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        space_noise_texels(NOISE_TEXTURE_SIZE, rng),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
}

/// Background pass: a 2D camera on its own render layer drawing the noise
/// sprite stretched over the viewport. The 3D camera draws on top of it.
pub fn spawn_space_background<R: Rng + ?Sized>(
    commands: &mut Commands,
    images: &mut Assets<Image>,
    viewport: Vec2,
    active: bool,
    rng: &mut R,
) {
    let noise = images.add(generate_space_noise(rng));
    let layer = RenderLayers::layer(BACKGROUND_RENDER_LAYER);

    commands.spawn((
        Camera2d,
        Camera {
            order: BACKGROUND_CAMERA_ORDER,
            is_active: active,
            ..default()
        },
        layer.clone(),
        BackgroundCamera,
    ));

    commands.spawn((
        Sprite {
            image: noise,
            custom_size: Some(viewport),
            ..default()
        },
        layer,
        SpaceBackground,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;

    #[test]
    fn zero_seed_gives_opaque_black_texture() {
        let mut rng = StepRng::new(0, 0);
        let image = generate_space_noise(&mut rng);

        assert_eq!(image.width(), 512);
        assert_eq!(image.height(), 512);
        let data = image.data.as_ref().unwrap();
        assert_eq!(data.len(), 512 * 512 * 4);
        for texel in data.chunks_exact(4) {
            assert_eq!(texel, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn noise_is_grayscale_with_full_alpha() {
        let mut rng = StdRng::seed_from_u64(3);
        let data = space_noise_texels(16, &mut rng);

        assert_eq!(data.len(), 16 * 16 * 4);
        for texel in data.chunks_exact(4) {
            assert_eq!(texel[0], texel[1]);
            assert_eq!(texel[1], texel[2]);
            assert_eq!(texel[3], 255);
        }
        // Not a flat fill.
        assert!(data.chunks_exact(4).any(|t| t[0] != data[0]));
    }
}
