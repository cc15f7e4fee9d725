//! Template manifests and the transformations they describe
//!
//! This module provides:
//! - Manifest types (`Manifest`, transform rules, `FileMode`)
//! - Lazy manifest loading from a cloned project folder
//! - `{path}` placeholder resolution against the project metadata
//! - EJS-style content rendering
//! - The replace / rename / attributes passes

pub mod loader;
pub mod manifest;
pub mod render;
pub mod resolver;
pub mod transformer;

pub use loader::ManifestCache;
pub use manifest::{
    AttributeRule, FileMode, Manifest, RenameRule, ReplaceRule, StepCommands, TransformSection,
};
pub use render::render;
pub use resolver::resolve_placeholders;
pub use transformer::{FileTransformer, TransformReport};
