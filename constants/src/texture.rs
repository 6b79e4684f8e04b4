/// Edge length of the generated background noise texture (pixels)
pub const NOISE_TEXTURE_SIZE: u32 = 512;

/// Bytes per noise texel (RGBA8)
pub const NOISE_TEXEL_BYTES: usize = 4;

/// Alpha written into every noise texel
pub const NOISE_ALPHA: u8 = 255;
