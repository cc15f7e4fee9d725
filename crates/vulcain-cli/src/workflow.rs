//! Shared setup for project workflows: arguments, project info, folders

use anyhow::{Context, Result};
use clap::Args;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use vulcain_core::{ProjectInfo, Warning};

static PROJECT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(([a-z0-9]|[a-z0-9][a-z0-9\-]*[a-z0-9])\.)*([a-z0-9]|[a-z0-9][a-z0-9\-]*[a-z0-9])$")
        .expect("project name regex is valid")
});

/// Arguments identifying the project a workflow works on
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project name (lowercase letters, digits, '.' or '-')
    #[arg(value_parser = parse_project_name)]
    pub name: String,

    /// Folder the project directory is created in
    #[arg(short, long, env = "VULCAIN_FOLDER")]
    pub folder: Option<PathBuf>,

    /// Project namespace
    #[arg(long)]
    pub namespace: Option<String>,

    /// Team owning the project
    #[arg(long)]
    pub team: Option<String>,

    /// Target environment
    #[arg(long)]
    pub env: Option<String>,

    /// YAML or JSON file with project information from the registration service
    #[arg(long)]
    pub info: Option<PathBuf>,
}

fn parse_project_name(name: &str) -> Result<String, String> {
    if PROJECT_NAME.is_match(name) {
        Ok(name.to_string())
    } else {
        Err("Invalid character for project name. Use only lowercase, number, '.' or '-'".to_string())
    }
}

impl ProjectArgs {
    /// Project information from `--info` (if any), overridden by flags
    pub fn project_info(&self) -> Result<ProjectInfo> {
        let mut info = match &self.info {
            Some(path) => load_info(path)?,
            None => ProjectInfo::default(),
        };

        info.name = self.name.clone();
        if self.namespace.is_some() {
            info.ns = self.namespace.clone();
        }
        if self.team.is_some() {
            info.team = self.team.clone();
        }
        if self.env.is_some() {
            info.env = self.env.clone();
        }
        if info.safe_name.is_none() {
            info.safe_name = Some(self.name.clone());
        }

        Ok(info)
    }

    /// Base folder: `--folder` / `VULCAIN_FOLDER`, else the current directory
    pub fn base_folder(&self) -> Result<PathBuf> {
        let current_dir = std::env::current_dir().context("Cannot read current directory")?;
        Ok(resolve_base_folder(self.folder.as_deref(), &current_dir))
    }
}

fn load_info(path: &Path) -> Result<ProjectInfo> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse project info {}", path.display()))
}

fn resolve_base_folder(folder: Option<&Path>, current_dir: &Path) -> PathBuf {
    let Some(folder) = folder else {
        return current_dir.to_path_buf();
    };

    // Values coming from the environment are often quoted
    let cleaned = folder.to_string_lossy().replace(['"', '\''], "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "." {
        current_dir.to_path_buf()
    } else {
        let path = PathBuf::from(cleaned);
        if path.is_absolute() {
            path
        } else {
            current_dir.join(path)
        }
    }
}

/// Create the base folder if needed
pub fn prepare_base_folder(folder: &Path) -> Result<()> {
    std::fs::create_dir_all(folder)
        .with_context(|| format!("Cannot create target folder {}", folder.display()))
}

/// Best-effort removal of a half-created project
pub fn remove_folder(folder: &Path) -> Result<()> {
    cliclack::log::info("Removing project directory...")?;
    if let Err(e) = std::fs::remove_dir_all(folder) {
        tracing::debug!("Cannot remove {}: {}", folder.display(), e);
    }
    Ok(())
}

pub fn print_warnings(warnings: &[Warning]) -> Result<()> {
    for warning in warnings {
        cliclack::log::warning(warning.to_string())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        project: ProjectArgs,
    }

    #[test]
    fn test_project_names() {
        assert!(parse_project_name("billing").is_ok());
        assert!(parse_project_name("acme.billing-api").is_ok());
        assert!(parse_project_name("a").is_ok());
        assert!(parse_project_name("Billing").is_err());
        assert!(parse_project_name("billing-").is_err());
        assert!(parse_project_name("acme..billing").is_err());
        assert!(parse_project_name("acme_billing").is_err());
    }

    #[test]
    fn test_base_folder_resolution() {
        let cwd = Path::new("/home/dev");
        assert_eq!(resolve_base_folder(None, cwd), PathBuf::from("/home/dev"));
        assert_eq!(
            resolve_base_folder(Some(Path::new(".")), cwd),
            PathBuf::from("/home/dev")
        );
        assert_eq!(
            resolve_base_folder(Some(Path::new("projects")), cwd),
            PathBuf::from("/home/dev/projects")
        );
        assert_eq!(
            resolve_base_folder(Some(Path::new("\"/srv/work\" ")), cwd),
            PathBuf::from("/srv/work")
        );
    }

    #[test]
    fn test_flags_override_info_file() {
        let dir = tempfile::tempdir().unwrap();
        let info_path = dir.path().join("info.yaml");
        std::fs::write(
            &info_path,
            "name: ignored\nns: acme\nteam: platform\nenv: prod\nconfigServer: https://config.acme.io\n",
        )
        .unwrap();

        let cli = TestCli::parse_from([
            "test",
            "acme.billing",
            "--team",
            "core",
            "--info",
            info_path.to_str().unwrap(),
        ]);
        let info = cli.project.project_info().unwrap();

        assert_eq!(info.name, "acme.billing");
        assert_eq!(info.ns.as_deref(), Some("acme"));
        assert_eq!(info.team.as_deref(), Some("core"));
        assert_eq!(info.env.as_deref(), Some("prod"));
        assert_eq!(info.config_server.as_deref(), Some("https://config.acme.io"));
        assert_eq!(info.safe_name.as_deref(), Some("acme.billing"));
    }

    #[test]
    fn test_info_file_accepts_json() {
        let dir = tempfile::tempdir().unwrap();
        let info_path = dir.path().join("info.json");
        std::fs::write(&info_path, r#"{"name": "x", "ns": "acme", "hub": "hub.acme.io"}"#).unwrap();

        let info = load_info(&info_path).unwrap();
        assert_eq!(info.hub.as_deref(), Some("hub.acme.io"));
        assert_eq!(info.ns.as_deref(), Some("acme"));
    }
}
