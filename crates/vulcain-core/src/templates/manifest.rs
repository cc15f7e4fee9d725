//! Template manifest types and parsing

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Commands per lifecycle step, e.g. `{"install": ["npm install"]}`
pub type StepCommands = BTreeMap<String, Vec<String>>;

/// Project manifest (`template.manifest` at the root of a cloned template)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// File transformations applied right after cloning
    #[serde(default, deserialize_with = "null_as_default")]
    pub transform: TransformSection,

    /// Shell commands per platform bucket (`win32`, `*nix`, `all`)
    #[serde(default, deserialize_with = "null_as_default")]
    pub scripts: BTreeMap<String, StepCommands>,

    /// Informational text per lifecycle step
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: BTreeMap<String, Vec<String>>,
}

impl Manifest {
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Messages declared for a step, if any
    pub fn messages_for(&self, step: &str) -> Option<&[String]> {
        self.messages.get(step).map(Vec::as_slice)
    }
}

/// The three rule lists, applied as three sequential passes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformSection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub replace: Vec<ReplaceRule>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub rename: Vec<RenameRule>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Vec<AttributeRule>,
}

impl TransformSection {
    pub fn is_empty(&self) -> bool {
        self.replace.is_empty() && self.rename.is_empty() && self.attributes.is_empty()
    }
}

/// Render every matched file, exposing `context` to templates as `data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceRule {
    pub filter: String,

    #[serde(default)]
    pub context: Value,
}

/// Rewrite the basename of every matched file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameRule {
    pub filter: String,

    /// Regular expression matched against the basename
    pub pattern: String,

    /// Replacement, with `{path}` placeholders resolved against the metadata
    pub target: String,
}

/// Set the permission bits of every matched entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRule {
    pub filter: String,

    /// Kept as written; checked when the rule is applied
    #[serde(default)]
    pub mode: Value,
}

impl AttributeRule {
    pub fn file_mode(&self) -> Option<FileMode> {
        FileMode::from_value(&self.mode)
    }
}

/// Unix permission bits.
///
/// Written either as an octal string (`"755"`, `"0755"`, `"0o755"`) or as a
/// plain number holding the numeric mode (`493` is `0o755`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMode(pub u32);

impl FileMode {
    pub fn parse_octal(text: &str) -> Option<Self> {
        let text = text.trim();
        let digits = text
            .strip_prefix("0o")
            .or_else(|| text.strip_prefix("0O"))
            .unwrap_or(text);
        if digits.is_empty() {
            return None;
        }
        u32::from_str_radix(digits, 8).ok().and_then(Self::checked)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .and_then(Self::checked),
            Value::String(text) => Self::parse_octal(text),
            _ => None,
        }
    }

    fn checked(mode: u32) -> Option<Self> {
        (mode <= 0o7777).then_some(FileMode(mode))
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

/// `null` reads like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
