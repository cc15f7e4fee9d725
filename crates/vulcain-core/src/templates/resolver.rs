//! `{dotted.path}` placeholder resolution against the project metadata

use regex::Regex;
use std::sync::LazyLock;

use crate::context::MetaContext;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]*)\}").expect("placeholder regex is valid"));

impl MetaContext {
    /// Look up a dotted path such as `project.fullName`.
    ///
    /// Only the fields of the metadata schema are addressable; unknown paths
    /// and absent values give `None`.
    pub fn lookup(&self, path: &str) -> Option<&str> {
        match path.trim() {
            "teamName" => self.team_name.as_deref(),
            "env" => Some(self.env.as_str()),
            "hub" => self.hub.as_deref(),
            "configToken" => self.config_token.as_deref(),
            "configServer" => self.config_server.as_deref(),
            "project.namespace" => Some(self.project.namespace.as_str()),
            "project.safeName" => self.project.safe_name.as_deref(),
            "project.name" => Some(self.project.name.as_str()),
            "project.fullName" => Some(self.project.full_name.as_str()),
            _ => None,
        }
    }
}

/// Replace every `{path}` in `template` with its metadata value.
///
/// Fails with the first placeholder (braces included) that has no value.
pub fn resolve_placeholders(template: &str, meta: &MetaContext) -> Result<String, String> {
    let mut resolved = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let whole = caps.get(0).expect("group 0 always matches");
        let value = meta
            .lookup(&caps[1])
            .ok_or_else(|| whole.as_str().to_string())?;
        resolved.push_str(&template[last..whole.start()]);
        resolved.push_str(value);
        last = whole.end();
    }

    resolved.push_str(&template[last..]);
    Ok(resolved)
}
