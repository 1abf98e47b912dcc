use std::{path::PathBuf, time::Duration};

use directories::ProjectDirs;

use errors::DirectoryError;

pub mod config;
pub mod errors;
pub mod logger;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "aurca", "aurca")
}

/// The platform config directory for aurca, e.g. `~/.config/aurca` on linux.
///
/// # Errors
///
/// Fails if no home directory could be determined.
pub fn get_config_dir() -> Result<PathBuf, DirectoryError> {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(DirectoryError::Config)
}

/// Format a duration as `seconds.millis`, e.g. `12.034`.
#[must_use]
pub fn format_duration(duration: &Duration) -> String {
    format!("{}.{:03}", duration.as_secs(), duration.subsec_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Duration::from_secs(0), "0.000")]
    #[case(Duration::from_millis(1_234), "1.234")]
    #[case(Duration::from_millis(61_005), "61.005")]
    fn test_format_duration(#[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(format_duration(&duration), expected);
    }

    #[test]
    fn test_dirs_are_namespaced() {
        if let Ok(config) = get_config_dir() {
            assert!(config.to_string_lossy().contains("aurca"));
        }
    }
}
