//! Engine settings and shared constants

pub mod settings;

pub use settings::Settings;

/// Name of the manifest file at the root of a cloned project
pub const MANIFEST_FILE_NAME: &str = "template.manifest";

/// Lifecycle step used when running scripts without an explicit step
pub const DEFAULT_STEP: &str = "install";

/// Step whose scripts run after an existing project is cloned
pub const CLONE_STEP: &str = "clone";

/// Step whose messages are shown once a project is ready
pub const END_STEP: &str = "end";
