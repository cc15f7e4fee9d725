//! Platform detection and script execution
//!
//! This module provides:
//! - The host platform family and its script bucket fallback order
//! - Sequential execution of manifest scripts through the system shell

pub mod platform;
pub mod scripts;

pub use platform::Platform;
pub use scripts::{
    run_commands, select_commands, ScriptExecutor, ScriptReport, ScriptStatus, SystemShell,
};
