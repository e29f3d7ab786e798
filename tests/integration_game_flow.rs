// End-to-end core flow without a terminal: catalog -> snippet -> session ->
// scoring -> score store, all against temp directories.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

use lyrik::highscores::{FileScoreStore, HighScore, ScoreStore};
use lyrik::session::{Phase, TypingSession};
use lyrik::snippet::{extract_snippet_with, SnippetOptions};
use lyrik::song::{SaveOutcome, Song, SongCatalog};

#[test]
fn full_round_from_catalog_to_leaderboard() {
    let dir = tempdir().unwrap();
    let catalog = SongCatalog::with_dir(dir.path().join("lyrics"));
    let store = FileScoreStore::with_path(dir.path().join("scores.json"));

    // Save a short song, load it back through the catalog
    let song = Song {
        title: "Integration".into(),
        artist: "Tester".into(),
        lyrics: "type me quickly".into(),
        filename: None,
    };
    let SaveOutcome::Saved(filename) = catalog.save(&song) else {
        panic!("song save failed");
    };
    let loaded = catalog.get(&filename).expect("saved song loads");

    // Short lyrics take the fast path: the snippet is the whole song
    let opts = SnippetOptions::default();
    let snippet = extract_snippet_with(&loaded, opts, &mut StdRng::seed_from_u64(9));
    assert_eq!(snippet.text, "type me quickly");

    // Type it through the session
    let mut session = TypingSession::new();
    session.start(snippet.clone());
    for c in "type me quickly".chars() {
        session.press_char(c);
    }
    assert_eq!(session.phase(), Phase::Complete);

    let stats = *session.stats().unwrap();
    assert_eq!(stats.correct, 15);
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.accuracy, 100);

    // Persist and read back the leaderboard
    store
        .record(&HighScore {
            song: snippet.source_title.clone(),
            artist: snippet.source_artist.clone(),
            wpm: stats.wpm,
            accuracy: stats.accuracy,
            date: Utc::now(),
        })
        .unwrap();

    let top = store.top(5);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].song, "Integration");
    assert_eq!(top[0].accuracy, 100);
}

#[test]
fn abandoned_round_leaves_no_score() {
    let dir = tempdir().unwrap();
    let store = FileScoreStore::with_path(dir.path().join("scores.json"));

    let mut session = TypingSession::new();
    session.start(lyrik::snippet::Snippet {
        text: "abc".into(),
        word_count: 1,
        source_title: "S".into(),
        source_artist: "A".into(),
    });
    session.press_char('a');
    session.cancel();

    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.stats().is_none());
    assert!(store.top(5).is_empty());
}

#[test]
fn bundled_songs_extract_playable_snippets() {
    let opts = SnippetOptions::default();

    for song in lyrik::song::bundled_songs() {
        for seed in 0..10 {
            let snippet = extract_snippet_with(&song, opts, &mut StdRng::seed_from_u64(seed));
            assert!(
                !snippet.text.is_empty(),
                "{} produced an empty snippet",
                song.title
            );
            assert!(snippet.word_count <= opts.max_words);
            assert_eq!(snippet.source_title, song.title);
        }
    }
}
