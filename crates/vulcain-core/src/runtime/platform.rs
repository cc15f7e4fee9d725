//! Host platform family and the script buckets it selects

use std::fmt;

/// Bucket used on Windows hosts
pub const WINDOWS_BUCKET: &str = "win32";

/// Bucket used on every other host
pub const UNIX_BUCKET: &str = "*nix";

/// Bucket used when the platform bucket is not declared
pub const FALLBACK_BUCKET: &str = "all";

/// Operating system family the engine runs for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Script buckets to try, in priority order
    pub fn script_buckets(&self) -> [&'static str; 2] {
        match self {
            Platform::Windows => [WINDOWS_BUCKET, FALLBACK_BUCKET],
            Platform::Unix => [UNIX_BUCKET, FALLBACK_BUCKET],
        }
    }

    /// Whether file permission changes make sense on this platform
    pub fn supports_file_modes(&self) -> bool {
        matches!(self, Platform::Unix)
    }

    /// Program and flag that run a command line through the system shell
    pub fn shell(&self) -> (&'static str, &'static str) {
        match self {
            Platform::Windows => ("cmd", "/C"),
            Platform::Unix => ("sh", "-c"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "{}", WINDOWS_BUCKET),
            Platform::Unix => write!(f, "{}", UNIX_BUCKET),
        }
    }
}
