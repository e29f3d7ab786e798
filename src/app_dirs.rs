use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution. Stores take concrete paths;
/// this is the only place default locations are decided.
pub struct AppDirs;

impl AppDirs {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "lyrik")
    }

    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("lyrik_config.json"))
    }

    pub fn scores_path() -> PathBuf {
        Self::project_dirs()
            .map(|pd| pd.data_local_dir().join("scores.json"))
            .unwrap_or_else(|| PathBuf::from("lyrik_scores.json"))
    }

    pub fn lyrics_dir() -> PathBuf {
        Self::project_dirs()
            .map(|pd| pd.data_local_dir().join("lyrics"))
            .unwrap_or_else(|| PathBuf::from("lyrik_lyrics"))
    }
}
