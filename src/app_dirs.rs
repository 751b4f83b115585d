use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "stillness";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/stillness`, falling back to the platform data dir
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME)
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn best_time_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("best.json"))
            .unwrap_or_else(|| PathBuf::from("stillness_best.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("stillness.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_time_and_log_share_a_directory() {
        let best = AppDirs::best_time_path();
        assert!(best.ends_with("best.json"));

        if let Some(log) = AppDirs::log_path() {
            assert_eq!(log.parent(), best.parent());
        }
    }
}
