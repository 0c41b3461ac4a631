/// Bundle-aware config path resolution for macOS .app bundles.
///
/// When the binary runs inside an `.app` bundle the working directory is
/// unpredictable (Finder sets it to `/`), so config goes to the platform
/// config directory instead. During development (`cargo run`) the project
/// working directory is used.

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "plane_measure";

/// Returns `true` when the running binary lives inside a macOS `.app` bundle
/// (i.e. the executable path contains `*.app/Contents/MacOS/`).
pub fn is_bundled() -> bool {
    bundle_contents_dir().is_some()
}

/// Returns the `Contents/` directory of the enclosing `.app` bundle, or
/// `None` when running outside a bundle.
fn bundle_contents_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let mut path = exe.as_path();
    loop {
        let parent = path.parent()?;
        if path.file_name().map(|n| n == "MacOS").unwrap_or(false)
            && parent.file_name().map(|n| n == "Contents").unwrap_or(false)
        {
            return Some(parent.to_path_buf());
        }
        path = parent;
    }
}

/// Configuration directory.
///
/// - **Bundled**: `~/Library/Application Support/plane_measure/`
/// - **Dev**: current working directory
pub fn config_dir() -> PathBuf {
    if is_bundled() {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
    } else {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

/// Ensure a directory exists, creating it and all parents if necessary.
/// Returns the path unchanged for chaining.
pub fn ensure_dir(path: &Path) -> &Path {
    let _ = std::fs::create_dir_all(path);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_bundled_returns_false_in_dev() {
        assert!(!is_bundled());
    }

    #[test]
    fn test_config_dir_is_cwd_in_dev() {
        let config = config_dir();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(config, cwd);
    }

    #[test]
    fn test_ensure_dir_creates_nested_dirs() {
        let dir = std::env::temp_dir()
            .join("plane_measure_tests")
            .join(format!("nested_{}", std::process::id()))
            .join("a/b");
        assert_eq!(ensure_dir(&dir), dir.as_path());
        assert!(dir.is_dir());
    }
}
