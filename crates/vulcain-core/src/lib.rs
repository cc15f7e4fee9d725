//! Vulcain Core - Manifest-driven template transformation
//!
//! After a template repository has been cloned, this library turns the
//! generic template into a concrete project by following the template's
//! `template.manifest`.
//!
//! # Architecture
//!
//! - **Metadata** - `context` normalizes upstream project information into a
//!   read-only tree and derives the project folder
//! - **Manifest** - `templates` loads the manifest once, resolves `{path}`
//!   placeholders, renders file contents and applies the replace / rename /
//!   attributes passes
//! - **Lifecycle** - `runtime` runs per-platform scripts for a step and
//!   `messages` prints the informational text of a step
//! - **Engine** - `Engine` ties the above to one project folder
//!
//! # Example Usage
//!
//! ```ignore
//! use vulcain_core::{Engine, NoClipboard, ProjectInfo, Settings, WorkflowContext};
//!
//! let settings = Settings::from_env();
//! let info = ProjectInfo { name: "acme.billing".into(), ns: Some("acme".into()), ..Default::default() };
//! let context = WorkflowContext::new(&info, Some(base.as_path()), &settings, &NoClipboard);
//!
//! // ... clone the template into context.folder() ...
//!
//! let mut engine = Engine::new(context, &settings);
//! engine.transform().await?;
//! engine.exec_scripts(None).await?;
//! engine.display_message("end")?;
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod messages;
pub mod runtime;
pub mod templates;

// Re-export main types for convenience
pub use config::{Settings, CLONE_STEP, DEFAULT_STEP, END_STEP, MANIFEST_FILE_NAME};
pub use context::{
    ClipboardSink, MetaContext, NoClipboard, ProjectInfo, ProjectMeta, WorkflowContext,
};
pub use engine::Engine;
pub use error::{EngineError, RenderError, Warning};
pub use runtime::{Platform, ScriptExecutor, ScriptReport, ScriptStatus, SystemShell};
pub use templates::{Manifest, TransformReport};
