//! Manifest-driven file transformations
//!
//! Three passes run in a fixed order over the project folder: replace
//! (render file contents), rename (rewrite basenames) and attributes
//! (permission bits). Each pass walks its rules in document order and every
//! rule is applied to the entries its glob filter matches.

use glob::{MatchOptions, Pattern};
use regex::RegexBuilder;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

use super::manifest::{AttributeRule, FileMode, RenameRule, ReplaceRule, TransformSection};
use super::render::render;
use super::resolver::resolve_placeholders;
use crate::context::MetaContext;
use crate::error::{EngineError, Result, Warning};
use crate::runtime::Platform;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Everything a `transform()` call changed, plus what it had to skip
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// Files whose content went through the renderer
    pub rendered: Vec<PathBuf>,
    /// `(from, to)` for each successful rename
    pub renamed: Vec<(PathBuf, PathBuf)>,
    /// Entries whose permission bits were set
    pub chmodded: Vec<PathBuf>,
    pub warnings: Vec<Warning>,
}

impl TransformReport {
    fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Files,
    FilesAndDirs,
}

/// Applies the transform section of a manifest to one project folder
pub struct FileTransformer<'a> {
    folder: &'a Path,
    meta: &'a MetaContext,
    platform: Platform,
}

impl<'a> FileTransformer<'a> {
    pub fn new(folder: &'a Path, meta: &'a MetaContext, platform: Platform) -> Self {
        Self {
            folder,
            meta,
            platform,
        }
    }

    /// Run replace, then rename, then attributes.
    ///
    /// Only the replace pass can fail; the other passes turn their failures
    /// into warnings.
    pub async fn apply(&self, section: &TransformSection) -> Result<TransformReport> {
        let mut report = TransformReport::default();

        for rule in &section.replace {
            self.replace(rule, &mut report).await?;
        }

        for rule in &section.rename {
            self.rename(rule, &mut report).await;
        }

        if self.platform.supports_file_modes() {
            for rule in &section.attributes {
                self.chmod(rule, &mut report).await;
            }
        } else if !section.attributes.is_empty() {
            tracing::debug!(
                "Skipping {} attribute rule(s) on {}",
                section.attributes.len(),
                self.platform
            );
        }

        Ok(report)
    }

    /// Glob `filter` under the project folder, or record why it cannot be used
    fn matches(
        &self,
        filter: &str,
        kind: EntryKind,
        report: &mut TransformReport,
    ) -> Option<Vec<PathBuf>> {
        match find_matches(self.folder, filter, kind) {
            Ok(paths) => Some(paths),
            Err(e) => {
                report.warn(Warning::InvalidFilter {
                    filter: filter.to_string(),
                    message: e.to_string(),
                });
                None
            }
        }
    }

    async fn replace(&self, rule: &ReplaceRule, report: &mut TransformReport) -> Result<()> {
        let Some(files) = self.matches(&rule.filter, EntryKind::Files, report) else {
            return Ok(());
        };

        // The rule's context is visible as `data` to every file of this rule
        let mut context = render_context(self.meta, &rule.context);

        for file in files {
            context["fileName"] = Value::String(file.to_string_lossy().into_owned());

            let bytes = fs::read(&file).await.map_err(|source| EngineError::Io {
                path: file.clone(),
                source,
            })?;
            let Ok(content) = String::from_utf8(bytes) else {
                report.warn(Warning::NotText { path: file });
                continue;
            };
            let rendered = render(&content, &context).map_err(|source| EngineError::Render {
                path: file.clone(),
                source,
            })?;

            if rendered != content {
                fs::write(&file, rendered)
                    .await
                    .map_err(|source| EngineError::Io {
                        path: file.clone(),
                        source,
                    })?;
            }
            report.rendered.push(file);
        }

        Ok(())
    }

    async fn rename(&self, rule: &RenameRule, report: &mut TransformReport) {
        // Resolved once for the whole rule, before any file is touched
        let target = match resolve_placeholders(&rule.target, self.meta) {
            Ok(target) => target,
            Err(placeholder) => {
                report.warn(Warning::UnresolvedPlaceholder {
                    target: rule.target.clone(),
                    placeholder,
                });
                return;
            }
        };

        let pattern = match RegexBuilder::new(&rule.pattern)
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(e) => {
                report.warn(Warning::InvalidPattern {
                    pattern: rule.pattern.clone(),
                    message: e.to_string(),
                });
                return;
            }
        };

        let Some(files) = self.matches(&rule.filter, EntryKind::Files, report) else {
            return;
        };
        let replacement = replacement_syntax(&target, pattern.captures_len() - 1);

        for file in files {
            let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let new_name = pattern.replace_all(name, replacement.as_str());
            if new_name == name {
                continue;
            }

            let destination = file.with_file_name(&*new_name);
            if new_name.is_empty() || new_name.contains(['/', '\\']) {
                let message = format!("invalid file name '{}'", new_name);
                report.warn(Warning::RenameFailed {
                    from: file,
                    to: destination,
                    message,
                });
                continue;
            }

            match fs::rename(&file, &destination).await {
                Ok(()) => report.renamed.push((file, destination)),
                Err(e) => report.warn(Warning::RenameFailed {
                    from: file,
                    to: destination,
                    message: e.to_string(),
                }),
            }
        }
    }

    async fn chmod(&self, rule: &AttributeRule, report: &mut TransformReport) {
        let Some(paths) = self.matches(&rule.filter, EntryKind::FilesAndDirs, report) else {
            return;
        };

        let Some(mode) = rule.file_mode() else {
            report.warn(Warning::InvalidMode {
                filter: rule.filter.clone(),
                mode: rule.mode.to_string(),
            });
            return;
        };

        for path in paths {
            match set_mode(&path, mode).await {
                Ok(()) => report.chmodded.push(path),
                Err(e) => report.warn(Warning::ChmodFailed {
                    path,
                    message: e.to_string(),
                }),
            }
        }
    }
}

/// Metadata tree plus the rule's `data`; `fileName` is filled in per file
fn render_context(meta: &MetaContext, data: &Value) -> Value {
    let mut context = json!(meta);
    context["data"] = data.clone();
    context
}

/// Entries under `folder` whose relative, `/`-separated path matches `filter`,
/// in sorted order
fn find_matches(
    folder: &Path,
    filter: &str,
    kind: EntryKind,
) -> std::result::Result<Vec<PathBuf>, glob::PatternError> {
    let pattern = Pattern::new(filter.trim_start_matches("./"))?;

    let paths = WalkDir::new(folder)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| match kind {
            EntryKind::Files => entry.file_type().is_file(),
            EntryKind::FilesAndDirs => entry.file_type().is_file() || entry.file_type().is_dir(),
        })
        .filter(|entry| {
            relative_path(folder, entry.path())
                .is_some_and(|rel| pattern.matches_with(&rel, MATCH_OPTIONS))
        })
        .map(walkdir::DirEntry::into_path)
        .collect();

    Ok(paths)
}

fn relative_path(folder: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(folder).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

/// Translate a `String.prototype.replace` style target (`$1`, `$&`, `$<name>`)
/// into `regex` replacement syntax. References to groups the pattern does not
/// have, and any other `$`, stay literal.
fn replacement_syntax(target: &str, groups: usize) -> String {
    let mut out = String::with_capacity(target.len());
    let mut chars = target.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some('$') => {
                chars.next();
                out.push_str("$$");
            }
            Some('&') => {
                chars.next();
                out.push_str("${0}");
            }
            Some(d) if d.is_ascii_digit() => {
                chars.next();
                let first = d.to_digit(10).unwrap_or(0) as usize;
                let two_digits = chars
                    .peek()
                    .and_then(|n| n.to_digit(10))
                    .map(|second| first * 10 + second as usize)
                    .filter(|n| (1..=groups).contains(n));

                if let Some(group) = two_digits {
                    chars.next();
                    out.push_str(&format!("${{{}}}", group));
                } else if (1..=groups).contains(&first) {
                    out.push_str(&format!("${{{}}}", first));
                } else {
                    out.push_str("$$");
                    out.push(d);
                }
            }
            Some('<') => {
                let name: String = chars.clone().skip(1).take_while(|&n| n != '>').collect();
                let len = name.chars().count();
                if len > 0 && chars.clone().nth(len + 1) == Some('>') {
                    let _ = chars.nth(len + 1);
                    out.push_str(&format!("${{{}}}", name));
                } else {
                    out.push_str("$$");
                }
            }
            _ => out.push_str("$$"),
        }
    }

    out
}

#[cfg(unix)]
async fn set_mode(path: &Path, mode: FileMode) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode.bits())).await
}

#[cfg(not(unix))]
async fn set_mode(_path: &Path, _mode: FileMode) -> std::io::Result<()> {
    Ok(())
}
