//! Workflow defaults with environment overrides

/// Environment variable enabling mock mode (scripts are never executed)
pub const MOCK_ENV: &str = "USE_MOCK";

/// Namespace given to projects that come without one
pub const DEFAULT_NAMESPACE: &str = "vulcain";

/// Environment given to projects that come without one
pub const DEFAULT_ENV: &str = "test";

/// Settings shared by every workflow of one process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub default_namespace: String,
    pub default_env: String,
    /// Suppresses script execution, for workflows that must not touch the host
    pub mock: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            default_env: DEFAULT_ENV.to_string(),
            mock: false,
        }
    }
}

impl Settings {
    /// Defaults, with mock mode taken from `USE_MOCK` when it is set
    pub fn from_env() -> Self {
        let mock = std::env::var(MOCK_ENV)
            .map(|value| parse_flag(&value))
            .unwrap_or(false);
        Self {
            mock,
            ..Self::default()
        }
    }

    pub fn with_mock(mut self, mock: bool) -> Self {
        self.mock = mock;
        self
    }
}

/// `USE_MOCK=1`, `USE_MOCK=2` and `USE_MOCK=true` all enable mock mode
fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    match value.parse::<i64>() {
        Ok(n) => n != 0,
        Err(_) => value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes"),
    }
}
