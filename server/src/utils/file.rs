//! Path helpers

use std::path::PathBuf;

use directories::BaseDirs;

fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Expand a user-supplied path to an absolute path.
///
/// `~` and `~/rest` resolve against the home directory; relative paths and
/// bare names resolve against the current directory; absolute paths pass
/// through. An empty string yields the current directory.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = if path == "~" {
        home_dir().unwrap_or_else(|| PathBuf::from(path))
    } else if let Some(rest) = path.strip_prefix("~/") {
        home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path))
    } else {
        PathBuf::from(path)
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_expand_path_absolute_unix() {
        assert_eq!(expand_path("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_path_relative() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(expand_path("data"), cwd.join("data"));
        assert_eq!(expand_path("  "), cwd);
    }

    #[test]
    fn test_expand_path_tilde() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_path("~"), home);
            assert_eq!(expand_path("~/.kotodo"), home.join(".kotodo"));
        }
    }
}
