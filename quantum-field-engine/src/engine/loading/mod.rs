//! Start-up loading before the scene exists.
//!
//! Only the runtime settings are loaded; every other asset is generated.

/// Settings asset loading with fallback to built-in defaults.
///
/// Moves the app from `Loading` to `Running` once settings are resolved.
pub mod settings_loader;
