//! Lazy, memoized manifest loading

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::manifest::Manifest;
use crate::config::MANIFEST_FILE_NAME;
use crate::error::{EngineError, Result};

/// Reads `template.manifest` at most once.
///
/// A missing file is cached as "no manifest". A malformed file is cached as
/// an empty manifest, and only the call that hit the parse failure sees the
/// error.
#[derive(Debug)]
pub struct ManifestCache {
    path: PathBuf,
    manifest: OnceLock<Option<Manifest>>,
}

impl ManifestCache {
    pub fn new(project_folder: &Path) -> Self {
        Self {
            path: project_folder.join(MANIFEST_FILE_NAME),
            manifest: OnceLock::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.manifest.get().is_some()
    }

    pub fn read(&self) -> Result<Option<&Manifest>> {
        if let Some(manifest) = self.manifest.get() {
            return Ok(manifest.as_ref());
        }

        match load(&self.path) {
            Ok(manifest) => Ok(self.manifest.get_or_init(|| manifest).as_ref()),
            Err(e) => {
                let _ = self.manifest.set(Some(Manifest::default()));
                Err(e)
            }
        }
    }
}

fn load(path: &Path) -> Result<Option<Manifest>> {
    if !path.exists() {
        tracing::debug!("No manifest at {}", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| EngineError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest = Manifest::from_json(&content).map_err(|source| EngineError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Loaded manifest from {}", path.display());
    Ok(Some(manifest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_manifest_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ManifestCache::new(dir.path());
        assert!(cache.read().unwrap().is_none());
        assert!(cache.is_loaded());
    }

    #[test]
    fn test_manifest_is_read_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE_NAME);
        std::fs::write(&path, r#"{ "messages": { "end": ["first"] } }"#).unwrap();

        let cache = ManifestCache::new(dir.path());
        let first = cache.read().unwrap().unwrap().clone();

        std::fs::write(&path, r#"{ "messages": { "end": ["second"] } }"#).unwrap();
        let second = cache.read().unwrap().unwrap();

        assert_eq!(&first, second);
        assert_eq!(second.messages["end"], vec!["first"]);
    }

    #[test]
    fn test_missing_manifest_is_cached_too() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ManifestCache::new(dir.path());
        assert!(cache.read().unwrap().is_none());

        std::fs::write(dir.path().join(MANIFEST_FILE_NAME), "{}").unwrap();
        assert!(cache.read().unwrap().is_none());
    }

    #[test]
    fn test_parse_error_is_reported_once_then_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE_NAME), "{ not json").unwrap();

        let cache = ManifestCache::new(dir.path());
        let err = cache.read().unwrap_err();
        assert!(matches!(err, EngineError::ManifestParse { .. }));

        let manifest = cache.read().unwrap().unwrap();
        assert_eq!(manifest, &Manifest::default());
    }
}
