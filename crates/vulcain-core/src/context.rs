//! Project metadata and the workflow context built from it
//!
//! Upstream project information (usually handed over by the registration
//! service) is normalized once into a [`MetaContext`]. That tree is the only
//! input to placeholder resolution and template rendering, and it never
//! changes after construction.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::Settings;

/// Project information as received from upstream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    /// Project name, possibly already prefixed with its namespace
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ns: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub env: Option<String>,
    #[serde(default)]
    pub safe_name: Option<String>,
    #[serde(default)]
    pub hub: Option<String>,
    #[serde(default)]
    pub config_token: Option<String>,
    #[serde(default)]
    pub config_server: Option<String>,
    /// Template repository to clone
    #[serde(default)]
    pub template: Option<String>,
}

/// Identity of the project inside the metadata tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub namespace: String,
    pub safe_name: Option<String>,
    pub name: String,
    pub full_name: String,
}

/// Read-only tree of project facts used for substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaContext {
    pub team_name: Option<String>,
    pub env: String,
    pub project: ProjectMeta,
    pub hub: Option<String>,
    pub config_token: Option<String>,
    pub config_server: Option<String>,
}

impl MetaContext {
    /// Normalize upstream project information.
    ///
    /// A name carrying its namespace (`ns.name`) loses the prefix, and
    /// `full_name` is rebuilt from the stripped name.
    pub fn from_info(info: &ProjectInfo, settings: &Settings) -> Self {
        let ns = info.ns.as_deref().filter(|ns| !ns.is_empty());
        let name = strip_namespace(&info.name, ns).to_string();
        let full_name = match ns {
            Some(ns) => format!("{}.{}", ns, name),
            None => name.clone(),
        };

        Self {
            team_name: info.team.clone(),
            env: info
                .env
                .clone()
                .filter(|env| !env.is_empty())
                .unwrap_or_else(|| settings.default_env.clone()),
            project: ProjectMeta {
                namespace: ns
                    .map(str::to_string)
                    .unwrap_or_else(|| settings.default_namespace.clone()),
                safe_name: info.safe_name.clone(),
                name,
                full_name,
            },
            hub: info.hub.clone(),
            config_token: info.config_token.clone(),
            config_server: info.config_server.clone(),
        }
    }
}

/// Drop a leading `ns.` segment. A name that merely starts with the same
/// letters as the namespace is left untouched.
fn strip_namespace<'a>(name: &'a str, ns: Option<&str>) -> &'a str {
    ns.and_then(|ns| name.strip_prefix(ns))
        .and_then(|rest| rest.strip_prefix('.'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(name)
}

/// Receives the final project folder so the user can paste it
pub trait ClipboardSink {
    fn publish(&self, text: &str) -> anyhow::Result<()>;
}

/// Clipboard that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl ClipboardSink for NoClipboard {
    fn publish(&self, _text: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Metadata plus the folder the project lives in
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    meta: MetaContext,
    folder: PathBuf,
}

impl WorkflowContext {
    /// Build the context for a project cloned under `base_folder`.
    ///
    /// The project folder is `base_folder/<project.name>`; it is published to
    /// the clipboard on a best-effort basis.
    pub fn new(
        info: &ProjectInfo,
        base_folder: Option<&Path>,
        settings: &Settings,
        clipboard: &dyn ClipboardSink,
    ) -> Self {
        let meta = MetaContext::from_info(info, settings);
        let folder = base_folder
            .unwrap_or_else(|| Path::new("."))
            .join(&meta.project.name);

        if let Err(e) = clipboard.publish(&folder.to_string_lossy()) {
            tracing::debug!("Cannot copy project folder to clipboard: {}", e);
        }

        Self { meta, folder }
    }

    /// Context for a folder that already exists, bypassing folder derivation
    pub fn with_folder(meta: MetaContext, folder: impl Into<PathBuf>) -> Self {
        Self {
            meta,
            folder: folder.into(),
        }
    }

    pub fn meta(&self) -> &MetaContext {
        &self.meta
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn info(name: &str, ns: Option<&str>) -> ProjectInfo {
        ProjectInfo {
            name: name.to_string(),
            ns: ns.map(str::to_string),
            team: Some("core".to_string()),
            safe_name: Some(name.replace('.', "-")),
            ..Default::default()
        }
    }

    #[derive(Default)]
    struct RecordingClipboard(RefCell<Vec<String>>);

    impl ClipboardSink for RecordingClipboard {
        fn publish(&self, text: &str) -> anyhow::Result<()> {
            self.0.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl ClipboardSink for BrokenClipboard {
        fn publish(&self, _text: &str) -> anyhow::Result<()> {
            anyhow::bail!("no display")
        }
    }

    #[test]
    fn test_namespace_prefix_is_stripped() {
        let meta = MetaContext::from_info(&info("acme.billing", Some("acme")), &Settings::default());
        assert_eq!(meta.project.name, "billing");
        assert_eq!(meta.project.full_name, "acme.billing");
        assert_eq!(meta.project.namespace, "acme");
    }

    #[test]
    fn test_name_without_prefix_is_kept() {
        let meta = MetaContext::from_info(&info("billing", Some("acme")), &Settings::default());
        assert_eq!(meta.project.name, "billing");
        assert_eq!(meta.project.full_name, "acme.billing");
    }

    #[test]
    fn test_textual_prefix_without_separator_is_kept() {
        let meta = MetaContext::from_info(&info("acmecorp", Some("acme")), &Settings::default());
        assert_eq!(meta.project.name, "acmecorp");
        assert_eq!(meta.project.full_name, "acme.acmecorp");
    }

    #[test]
    fn test_missing_namespace_uses_defaults() {
        let meta = MetaContext::from_info(&info("billing", None), &Settings::default());
        assert_eq!(meta.project.namespace, "vulcain");
        assert_eq!(meta.project.full_name, "billing");
        assert_eq!(meta.env, "test");
        assert_eq!(meta.team_name.as_deref(), Some("core"));
    }

    #[test]
    fn test_empty_namespace_counts_as_missing() {
        let meta = MetaContext::from_info(&info("billing", Some("")), &Settings::default());
        assert_eq!(meta.project.namespace, "vulcain");
        assert_eq!(meta.project.full_name, "billing");
    }

    #[test]
    fn test_folder_uses_stripped_name() {
        let clipboard = RecordingClipboard::default();
        let ctx = WorkflowContext::new(
            &info("acme.billing", Some("acme")),
            Some(Path::new("/work")),
            &Settings::default(),
            &clipboard,
        );
        assert_eq!(ctx.folder(), Path::new("/work/billing"));
        assert_eq!(clipboard.0.borrow().as_slice(), ["/work/billing"]);
    }

    #[test]
    fn test_clipboard_failure_is_ignored() {
        let ctx = WorkflowContext::new(
            &info("billing", None),
            None,
            &Settings::default(),
            &BrokenClipboard,
        );
        assert_eq!(ctx.folder(), Path::new("./billing"));
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = MetaContext::from_info(&info("acme.billing", Some("acme")), &Settings::default());
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["project"]["fullName"], "acme.billing");
        assert_eq!(value["project"]["safeName"], "acme-billing");
        assert_eq!(value["teamName"], "core");
    }
}
