//! Template cloning through the git command line

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Public template used when none is given
pub const DEFAULT_TEMPLATE: &str = "https://github.com/vulcainjs/vulcain-template-microservice.git";

/// Clone `url` into `folder`, which must not exist yet
pub fn clone(url: &str, folder: &Path, depth: Option<u32>) -> Result<()> {
    if folder.exists() {
        anyhow::bail!("destination path {} already exists", folder.display());
    }

    let mut command = Command::new("git");
    command.arg("clone");
    if let Some(depth) = depth {
        command.arg("--depth").arg(depth.to_string());
    }
    command.arg(url).arg(folder);

    tracing::debug!("Running {:?}", command);
    let output = command.output().context("Failed to run git")?;

    if !output.status.success() {
        anyhow::bail!(
            "Cloning process aborted: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(())
}
