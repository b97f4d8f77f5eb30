//! Locating and loading the [`FlipConfig`] for a run.

use std::path::Path;

use flipstack_core::FlipConfig;
use tracing::debug;

use crate::error::Result;

/// Load and validate `path`, or fall back to the defaults.
///
/// Files ending in `.json` are read as JSON, everything else as TOML.
pub fn load_config(path: Option<&Path>) -> Result<FlipConfig> {
    let Some(path) = path else {
        return Ok(FlipConfig::default());
    };
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        FlipConfig::from_json_file(path)?
    } else {
        FlipConfig::from_toml_file(path)?
    };
    debug!(path = %path.display(), is_json, "loaded config");
    Ok(config.validated()?)
}
