use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Starter lyrics shipped inside the binary, same as the embedded word lists
/// idea: the menu is never empty on a fresh install.
static SONGS_DIR: Dir = include_dir!("src/songs");

/// Default cap on user-saved songs in the catalog directory.
pub const MAX_SONGS: usize = 20;

/// A song as loaded from the catalog or fetched remotely. Immutable once
/// constructed; `filename` is only set for catalog-backed songs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub lyrics: String,
    #[serde(skip)]
    pub filename: Option<String>,
}

/// Result of trying to persist a song into the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(String),
    LimitReached,
    Failed,
}

/// Directory-backed song catalog. One JSON file per song; records missing a
/// required field are skipped rather than failing the whole load.
#[derive(Debug, Clone)]
pub struct SongCatalog {
    dir: PathBuf,
    cap: usize,
}

impl SongCatalog {
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            cap: MAX_SONGS,
        }
    }

    /// Override the saved-song cap (configured value wins over the default).
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Every valid saved song plus the bundled starters, sorted by title.
    /// A saved song shadows a bundled one with the same title and artist.
    pub fn load_all(&self) -> Vec<Song> {
        let saved = self.load_saved();

        let unshadowed: Vec<Song> = bundled_songs()
            .into_iter()
            .filter(|b| {
                !saved
                    .iter()
                    .any(|s| same_song(&s.title, &s.artist, &b.title, &b.artist))
            })
            .collect();

        unshadowed
            .into_iter()
            .chain(saved)
            .sorted_by_key(|s| s.title.to_lowercase())
            .collect()
    }

    /// Songs saved to the catalog directory. Unreadable dir means empty.
    pub fn load_saved(&self) -> Vec<Song> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut songs = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if let Some(song) = self.get(name) {
                    songs.push(song);
                }
            }
        }
        songs
    }

    pub fn get(&self, filename: &str) -> Option<Song> {
        let bytes = fs::read(self.dir.join(filename)).ok()?;
        let mut song: Song = serde_json::from_slice(&bytes).ok()?;
        if song.title.is_empty() || song.artist.is_empty() || song.lyrics.is_empty() {
            return None;
        }
        song.filename = Some(filename.to_string());
        Some(song)
    }

    /// Number of saved song files, bundled songs excluded.
    pub fn saved_count(&self) -> usize {
        match fs::read_dir(&self.dir) {
            Ok(entries) => entries
                .flatten()
                .filter(|e| {
                    e.path().extension().and_then(|x| x.to_str()) == Some("json")
                })
                .count(),
            Err(_) => 0,
        }
    }

    /// Persist a song, honoring the catalog cap. Capacity exhaustion is an
    /// explicit outcome for the caller to render, not an error.
    pub fn save(&self, song: &Song) -> SaveOutcome {
        if self.saved_count() >= self.cap {
            return SaveOutcome::LimitReached;
        }

        if fs::create_dir_all(&self.dir).is_err() {
            return SaveOutcome::Failed;
        }

        let filename = song
            .filename
            .clone()
            .unwrap_or_else(|| generate_filename(&song.title, &song.artist));

        let body = serde_json::json!({
            "title": song.title,
            "artist": song.artist,
            "lyrics": song.lyrics,
        });
        let data = serde_json::to_vec_pretty(&body).unwrap_or_default();

        match fs::write(self.dir.join(&filename), data) {
            Ok(()) => SaveOutcome::Saved(filename),
            Err(_) => SaveOutcome::Failed,
        }
    }

    pub fn delete(&self, filename: &str) -> bool {
        fs::remove_file(self.dir.join(filename)).is_ok()
    }

    /// Case-insensitive existence check over saved songs.
    pub fn contains(&self, title: &str, artist: &str) -> bool {
        self.load_saved()
            .iter()
            .any(|s| same_song(&s.title, &s.artist, title, artist))
    }
}

fn same_song(title_a: &str, artist_a: &str, title_b: &str, artist_b: &str) -> bool {
    title_a.eq_ignore_ascii_case(title_b) && artist_a.eq_ignore_ascii_case(artist_b)
}

/// `artist-title.json`, lowercased with runs of non-alphanumerics collapsed
/// to single dashes, each part clamped to 30 chars.
fn generate_filename(title: &str, artist: &str) -> String {
    fn safe(s: &str) -> String {
        let mut out = String::new();
        let mut dash = false;
        for c in s.to_lowercase().chars() {
            if c.is_ascii_alphanumeric() {
                out.push(c);
                dash = false;
            } else if !dash && !out.is_empty() {
                out.push('-');
                dash = true;
            }
        }
        let trimmed = out.trim_end_matches('-');
        trimmed.chars().take(30).collect()
    }

    format!("{}-{}.json", safe(artist), safe(title))
}

/// The songs embedded in the binary.
pub fn bundled_songs() -> Vec<Song> {
    SONGS_DIR
        .files()
        .filter_map(|f| {
            let text = f.contents_utf8()?;
            let song: Song = serde_json::from_str(text).ok()?;
            if song.title.is_empty() || song.artist.is_empty() || song.lyrics.is_empty() {
                return None;
            }
            Some(song)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_song() -> Song {
        Song {
            title: "Test Song".into(),
            artist: "Test Artist".into(),
            lyrics: "la la la\nla la la".into(),
            filename: None,
        }
    }

    #[test]
    fn test_bundled_songs_present_and_valid() {
        let songs = bundled_songs();
        assert!(!songs.is_empty());
        for song in &songs {
            assert!(!song.title.is_empty());
            assert!(!song.artist.is_empty());
            assert!(!song.lyrics.is_empty());
        }
    }

    #[test]
    fn test_save_and_get_roundtrip() {
        let dir = tempdir().unwrap();
        let catalog = SongCatalog::with_dir(dir.path());

        let outcome = catalog.save(&sample_song());
        let SaveOutcome::Saved(filename) = outcome else {
            panic!("expected Saved, got {outcome:?}");
        };
        assert_eq!(filename, "test-artist-test-song.json");

        let loaded = catalog.get(&filename).unwrap();
        assert_eq!(loaded.title, "Test Song");
        assert_eq!(loaded.artist, "Test Artist");
        assert_eq!(loaded.filename.as_deref(), Some(filename.as_str()));
    }

    #[test]
    fn test_load_all_skips_malformed_files() {
        let dir = tempdir().unwrap();
        let catalog = SongCatalog::with_dir(dir.path());

        fs::write(dir.path().join("bad.json"), b"{ not json").unwrap();
        fs::write(
            dir.path().join("missing-fields.json"),
            br#"{"title":"x","artist":"y"}"#,
        )
        .unwrap();
        catalog.save(&sample_song());

        let saved = catalog.load_saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].title, "Test Song");
    }

    #[test]
    fn test_missing_dir_is_empty_not_fatal() {
        let catalog = SongCatalog::with_dir("/nonexistent/lyrik-test-dir");
        assert!(catalog.load_saved().is_empty());
        assert_eq!(catalog.saved_count(), 0);
        assert!(!catalog.contains("a", "b"));
    }

    #[test]
    fn test_save_rejects_beyond_limit() {
        let dir = tempdir().unwrap();
        let catalog = SongCatalog::with_dir(dir.path());

        for i in 0..MAX_SONGS {
            let song = Song {
                title: format!("Song {i}"),
                artist: "A".into(),
                lyrics: "words here".into(),
                filename: None,
            };
            assert!(matches!(catalog.save(&song), SaveOutcome::Saved(_)));
        }

        assert_eq!(catalog.save(&sample_song()), SaveOutcome::LimitReached);
        assert_eq!(catalog.saved_count(), MAX_SONGS);
    }

    #[test]
    fn test_save_honors_configured_cap() {
        let dir = tempdir().unwrap();
        let catalog = SongCatalog::with_dir(dir.path()).with_cap(2);
        assert_eq!(catalog.cap(), 2);

        for i in 0..2 {
            let song = Song {
                title: format!("Song {i}"),
                artist: "A".into(),
                lyrics: "words here".into(),
                filename: None,
            };
            assert!(matches!(catalog.save(&song), SaveOutcome::Saved(_)));
        }

        assert_eq!(catalog.save(&sample_song()), SaveOutcome::LimitReached);
        assert_eq!(catalog.saved_count(), 2);
    }

    #[test]
    fn test_delete_song() {
        let dir = tempdir().unwrap();
        let catalog = SongCatalog::with_dir(dir.path());

        let SaveOutcome::Saved(filename) = catalog.save(&sample_song()) else {
            panic!("save failed");
        };
        assert!(catalog.delete(&filename));
        assert!(catalog.get(&filename).is_none());
        assert!(!catalog.delete(&filename));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let dir = tempdir().unwrap();
        let catalog = SongCatalog::with_dir(dir.path());
        catalog.save(&sample_song());

        assert!(catalog.contains("TEST SONG", "test artist"));
        assert!(!catalog.contains("Other", "Test Artist"));
    }

    #[test]
    fn test_saved_song_shadows_bundled_duplicate() {
        let dir = tempdir().unwrap();
        let catalog = SongCatalog::with_dir(dir.path());

        let bundled = &bundled_songs()[0];
        let dupe = Song {
            title: bundled.title.to_uppercase(),
            artist: bundled.artist.clone(),
            lyrics: "different words".into(),
            filename: None,
        };
        catalog.save(&dupe);

        let all = catalog.load_all();
        let matches: Vec<_> = all
            .iter()
            .filter(|s| s.title.eq_ignore_ascii_case(&bundled.title))
            .collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].lyrics, "different words");
    }

    #[test]
    fn test_generate_filename_sanitizes() {
        assert_eq!(
            generate_filename("Hey, Jude!", "The Beatles"),
            "the-beatles-hey-jude.json"
        );
    }
}
