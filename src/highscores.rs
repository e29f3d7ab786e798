use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The leaderboard never holds more than this many records.
pub const MAX_SCORES: usize = 100;

/// One completed round on the leaderboard. Serialized with an ISO-8601
/// timestamp via chrono's serde support.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HighScore {
    pub song: String,
    pub artist: String,
    pub wpm: u32,
    pub accuracy: u32,
    pub date: DateTime<Utc>,
}

impl HighScore {
    /// One-line rendering used in the menu and results screens.
    pub fn summary(&self) -> String {
        format!(
            "{} WPM | {}% | {} - {}",
            self.wpm, self.accuracy, self.song, self.artist
        )
    }
}

/// Ranked score persistence seam; file-backed in production, stubbed in
/// tests.
pub trait ScoreStore {
    fn record(&self, score: &HighScore) -> io::Result<()>;
    fn top(&self, n: usize) -> Vec<HighScore>;
}

/// JSON-array score file. Missing or corrupt content reads as empty; writes
/// replace the file wholesale after ranking and capping.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> Vec<HighScore> {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(scores) = serde_json::from_slice::<Vec<HighScore>>(&bytes) {
                return scores;
            }
        }
        Vec::new()
    }
}

impl ScoreStore for FileScoreStore {
    fn record(&self, score: &HighScore) -> io::Result<()> {
        let mut scores = self.load();
        scores.push(score.clone());
        rank(&mut scores);
        scores.truncate(MAX_SCORES);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&scores).unwrap_or_default();
        fs::write(&self.path, data)
    }

    fn top(&self, n: usize) -> Vec<HighScore> {
        let mut scores = self.load();
        rank(&mut scores);
        scores.truncate(n);
        scores
    }
}

/// Higher wpm first, accuracy breaks wpm ties. The sort is stable, so fully
/// tied entries keep their insertion order (older scores rank first).
pub fn rank(scores: &mut [HighScore]) {
    scores.sort_by(|a, b| b.wpm.cmp(&a.wpm).then(b.accuracy.cmp(&a.accuracy)));
}
