// Application state module
// Holds the validated configuration shared by every connection

use std::io;
use std::path::{Path, PathBuf};

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical document root; every served path must stay inside it
    pub root: PathBuf,
}

impl AppState {
    /// Build state from configuration, validating the document root
    pub fn new(config: Config) -> io::Result<Self> {
        let root = validate_root(Path::new(&config.server.root))?;
        Ok(Self { config, root })
    }
}

/// Canonicalize `root` and make sure it is a directory we can list
fn validate_root(root: &Path) -> io::Result<PathBuf> {
    let canonical = root.canonicalize().map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("Root directory '{}' is not accessible: {e}", root.display()),
        )
    })?;

    if !canonical.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Root path '{}' is not a directory", root.display()),
        ));
    }

    std::fs::read_dir(&canonical).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("Root directory '{}' is not readable: {e}", root.display()),
        )
    })?;

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_root(root: &Path) -> Config {
        let mut cfg = Config::load_from("this-config-file-does-not-exist", None).unwrap();
        cfg.server.root = root.to_string_lossy().into_owned();
        cfg
    }

    #[test]
    fn test_valid_root_is_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(config_with_root(dir.path())).unwrap();
        assert_eq!(state.root, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppState::new(config_with_root(&dir.path().join("nope")))
            .err()
            .unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_file_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();
        let err = AppState::new(config_with_root(&file)).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
