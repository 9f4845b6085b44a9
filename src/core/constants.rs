//! Engine-wide defaults for the preview and rotation behaviour.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Minimum time between two applied rotation steps, in milliseconds.
pub const ROTATION_THROTTLE_MS: f64 = 10.0;

/// Longitude advanced per applied rotation step, in degrees.
pub const ROTATION_STEP_DEG: f64 = 0.05;

/// Frame interval used by timer-driven frame hosts (~60 fps).
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Always-present layer holding one marker per project.
pub const BASE_MARKER_LAYER: &str = "project-circles";

/// Suffix appended to a project id to name its preview layer.
pub const PREVIEW_LAYER_SUFFIX: &str = "-preview";

/// Feature property that carries the project id on the base markers.
pub const FEATURE_ID_PROPERTY: &str = "id";
