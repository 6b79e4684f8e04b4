/// Vertical field of view of the scene camera (degrees)
pub const CAMERA_FOV_DEGREES: f32 = 75.0;

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Default distance of the camera from the origin along +Z
pub const CAMERA_DISTANCE: f32 = 15.0;
