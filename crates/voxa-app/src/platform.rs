//! Directory resolution for configuration and log files.

use std::path::{Path, PathBuf};

/// Errors that can occur while preparing directories.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("platform I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where voxa keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// `config.ron` and the optional `atlas.ron`.
    pub config_dir: PathBuf,
    /// JSON log files.
    pub log_dir: PathBuf,
}

const APP_NAME: &str = "voxa";

impl PlatformDirs {
    /// OS conventions (XDG on Linux, Known Folders on Windows, Library on macOS).
    pub fn resolve() -> Result<Self, PlatformError> {
        let base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        Ok(Self::resolve_with_root(&base))
    }

    /// Rooted under `root`; used for `--config` and tests.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.clone(),
            log_dir: app_dir.join("logs"),
        }
    }

    /// A config directory given directly on the command line.
    pub fn from_config_dir(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            log_dir: config_dir.join("logs"),
        }
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_root() {
        let dirs = PlatformDirs::resolve_with_root(Path::new("/tmp/root"));
        assert_eq!(dirs.config_dir, Path::new("/tmp/root/voxa"));
        assert_eq!(dirs.log_dir, Path::new("/tmp/root/voxa/logs"));
    }

    #[test]
    fn test_from_config_dir_keeps_path() {
        let dirs = PlatformDirs::from_config_dir(Path::new("custom"));
        assert_eq!(dirs.config_dir, Path::new("custom"));
        assert_eq!(dirs.log_dir, Path::new("custom/logs"));
    }

    #[test]
    fn test_directory_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
    }
}
