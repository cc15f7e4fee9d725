//! Manifest script execution
//!
//! Commands are looked up by platform bucket and lifecycle step, then run one
//! at a time through the system shell. A failing command never stops the
//! remaining ones; it only adds a warning to the report.

use colored::Colorize;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

use super::platform::Platform;
use crate::error::Warning;
use crate::templates::manifest::StepCommands;

/// Outcome of one finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStatus {
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
}

/// Runs a single command line to completion
#[allow(async_fn_in_trait)]
pub trait ScriptExecutor {
    async fn execute(&mut self, command: &str, cwd: &Path) -> std::io::Result<ScriptStatus>;
}

/// Executor backed by `sh -c` (or `cmd /C` on Windows) with inherited stdio
#[derive(Debug, Clone, Copy)]
pub struct SystemShell {
    platform: Platform,
}

impl SystemShell {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

impl ScriptExecutor for SystemShell {
    async fn execute(&mut self, command: &str, cwd: &Path) -> std::io::Result<ScriptStatus> {
        let (program, flag) = self.platform.shell();
        let status = TokioCommand::new(program)
            .arg(flag)
            .arg(command)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        Ok(ScriptStatus {
            success: status.success(),
            code: status.code(),
        })
    }
}

/// What happened while running the scripts of one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Bucket the commands came from, `None` when nothing was declared
    pub bucket: Option<String>,
    /// Commands that were started, in order
    pub executed: Vec<String>,
    pub warnings: Vec<Warning>,
}

/// Pick the commands declared for `step`.
///
/// The first bucket of [`Platform::script_buckets`] present in the manifest
/// wins, even when it has nothing for this step.
pub fn select_commands<'a>(
    scripts: &'a BTreeMap<String, StepCommands>,
    platform: Platform,
    step: &str,
) -> Option<(&'static str, &'a [String])> {
    let bucket = platform
        .script_buckets()
        .into_iter()
        .find(|bucket| scripts.contains_key(*bucket))?;
    let commands = scripts.get(bucket)?.get(step)?;
    Some((bucket, commands.as_slice()))
}

/// Run `commands` sequentially in `cwd`, skipping blank entries
pub async fn run_commands<E: ScriptExecutor>(
    executor: &mut E,
    commands: &[String],
    cwd: &Path,
) -> ScriptReport {
    let mut report = ScriptReport::default();

    for command in commands.iter().filter(|c| !c.trim().is_empty()) {
        println!("{} {}", "Running:".dimmed(), command.yellow());
        report.executed.push(command.clone());

        match executor.execute(command, cwd).await {
            Ok(status) if status.success => {}
            Ok(status) => {
                tracing::warn!("Script '{}' failed with {:?}", command, status.code);
                report.warnings.push(Warning::ScriptFailed {
                    command: command.clone(),
                    code: status.code,
                });
            }
            Err(e) => {
                tracing::warn!("Cannot run script '{}': {}", command, e);
                report.warnings.push(Warning::ScriptSpawnFailed {
                    command: command.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Records commands instead of running them; fails the ones listed
    #[derive(Debug, Default)]
    struct RecordingExecutor {
        calls: Vec<(String, PathBuf)>,
        failing: Vec<String>,
    }

    impl ScriptExecutor for RecordingExecutor {
        async fn execute(&mut self, command: &str, cwd: &Path) -> std::io::Result<ScriptStatus> {
            self.calls.push((command.to_string(), cwd.to_path_buf()));
            if self.failing.iter().any(|f| f == command) {
                Ok(ScriptStatus {
                    success: false,
                    code: Some(1),
                })
            } else {
                Ok(ScriptStatus {
                    success: true,
                    code: Some(0),
                })
            }
        }
    }

    fn scripts(json: &str) -> BTreeMap<String, StepCommands> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_platform_bucket_wins() {
        let scripts = scripts(
            r#"{ "*nix": { "install": ["make"] }, "win32": { "install": ["nmake"] }, "all": { "install": ["echo"] } }"#,
        );
        let (bucket, commands) = select_commands(&scripts, Platform::Unix, "install").unwrap();
        assert_eq!(bucket, "*nix");
        assert_eq!(commands, ["make"]);

        let (bucket, commands) = select_commands(&scripts, Platform::Windows, "install").unwrap();
        assert_eq!(bucket, "win32");
        assert_eq!(commands, ["nmake"]);
    }

    #[test]
    fn test_falls_back_to_all() {
        let scripts = scripts(r#"{ "win32": { "install": ["nmake"] }, "all": { "install": ["echo"] } }"#);
        let (bucket, commands) = select_commands(&scripts, Platform::Unix, "install").unwrap();
        assert_eq!(bucket, "all");
        assert_eq!(commands, ["echo"]);
    }

    #[test]
    fn test_declared_bucket_without_step_does_not_fall_back() {
        let scripts = scripts(r#"{ "*nix": { "clone": ["git status"] }, "all": { "install": ["echo"] } }"#);
        assert!(select_commands(&scripts, Platform::Unix, "install").is_none());
    }

    #[test]
    fn test_nothing_declared() {
        let scripts = scripts("{}");
        assert!(select_commands(&scripts, Platform::Unix, "install").is_none());
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_later_commands() {
        let mut executor = RecordingExecutor {
            failing: vec!["false".to_string()],
            ..Default::default()
        };
        let commands = vec![
            "false".to_string(),
            "".to_string(),
            "   ".to_string(),
            "echo done".to_string(),
        ];

        let report = run_commands(&mut executor, &commands, Path::new("/tmp/project")).await;

        let run: Vec<_> = executor.calls.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(run, ["false", "echo done"]);
        assert_eq!(executor.calls[0].1, PathBuf::from("/tmp/project"));
        assert_eq!(
            report.warnings,
            vec![Warning::ScriptFailed {
                command: "false".to_string(),
                code: Some(1)
            }]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_shell_reports_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = SystemShell::new(Platform::Unix);

        let ok = shell.execute("true", dir.path()).await.unwrap();
        assert!(ok.success);

        let failed = shell.execute("exit 3", dir.path()).await.unwrap();
        assert!(!failed.success);
        assert_eq!(failed.code, Some(3));
    }
}
