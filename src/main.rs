mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use chrono::Utc;
use lyrik::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    highscores::{FileScoreStore, HighScore, ScoreStore},
    lyrics::{LrclibClient, LyricsProvider, SearchHit},
    runtime::{CrosstermEventSource, GameEvent, Runner},
    scoring::TypingStats,
    session::{Phase, SessionInput, TypingSession},
    snippet::{extract_snippet, Snippet, SnippetOptions},
    song::{SaveOutcome, Song, SongCatalog},
};

const TICK_RATE_MS: u64 = 100;
const MENU_SCORES: usize = 5;

/// typing trainer driven by song lyrics
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing game that extracts snippets from song lyrics, scores each round, and keeps a ranked leaderboard. Songs come from a local catalog or an lrclib.net search."
)]
pub struct Cli {
    /// ad-hoc text to type instead of a song snippet
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// minimum words in an extracted snippet
    #[clap(long)]
    min_words: Option<usize>,

    /// maximum words in an extracted snippet
    #[clap(long)]
    max_words: Option<usize>,

    /// high-score file location (defaults to the platform data dir)
    #[clap(long)]
    scores_file: Option<PathBuf>,

    /// saved-lyrics directory (defaults to the platform data dir)
    #[clap(long)]
    lyrics_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Search,
    Playing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    Query,
    Results,
}

#[derive(Debug)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub selected: usize,
    pub focus: SearchFocus,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            selected: 0,
            focus: SearchFocus::Query,
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub songs: Vec<Song>,
    pub selected: usize,
    pub session: TypingSession,
    pub current_song: Option<Song>,
    pub scores: Vec<HighScore>,
    pub search: SearchState,
    pub notice: Option<String>,
    opts: SnippetOptions,
    catalog: SongCatalog,
    score_store: FileScoreStore,
    lyrics: Box<dyn LyricsProvider>,
}

impl App {
    pub fn new(cli: &Cli, config: &Config) -> Self {
        let scores_path = cli
            .scores_file
            .clone()
            .unwrap_or_else(AppDirs::scores_path);
        let lyrics_dir = cli.lyrics_dir.clone().unwrap_or_else(AppDirs::lyrics_dir);

        let opts = SnippetOptions {
            min_words: cli.min_words.unwrap_or(config.min_snippet_words),
            max_words: cli.max_words.unwrap_or(config.max_snippet_words),
        };

        let catalog = SongCatalog::with_dir(lyrics_dir).with_cap(config.max_songs);
        let score_store = FileScoreStore::with_path(scores_path);
        let songs = catalog.load_all();
        let scores = score_store.top(MENU_SCORES);

        let mut app = Self {
            screen: Screen::Menu,
            songs,
            selected: 0,
            session: TypingSession::new(),
            current_song: None,
            scores,
            search: SearchState::default(),
            notice: None,
            opts,
            catalog,
            score_store,
            lyrics: Box::new(LrclibClient::new()),
        };

        if let Some(text) = &cli.prompt {
            app.start_custom(text.clone());
        }

        app
    }

    /// Jump straight into a round typing the given text verbatim.
    fn start_custom(&mut self, text: String) {
        if text.trim().is_empty() {
            self.notice = Some("Nothing to type".into());
            return;
        }
        let snippet = Snippet {
            word_count: text.split_whitespace().count(),
            text,
            source_title: "Custom".into(),
            source_artist: "Practice".into(),
        };
        self.session.cancel();
        self.session.start(snippet);
        self.current_song = None;
        self.screen = Screen::Playing;
    }

    fn start_game(&mut self, song: Song) {
        let snippet = extract_snippet(&song, self.opts);
        if snippet.text.is_empty() {
            self.notice = Some(format!("\"{}\" has no usable lyrics", song.title));
            return;
        }
        self.session.cancel();
        self.session.start(snippet);
        self.current_song = Some(song);
        self.notice = None;
        self.screen = Screen::Playing;
    }

    /// Complete transition: persist the score, refresh the leaderboard and
    /// show the results screen. Keystrokes are not processed in between.
    fn finish_game(&mut self) {
        if let (Some(snippet), Some(stats)) = (self.session.snippet(), self.session.stats()) {
            let score = score_from(snippet, stats);
            let _ = self.score_store.record(&score);
        }
        self.scores = self.score_store.top(MENU_SCORES);
        self.screen = Screen::Results;
    }

    fn abandon_game(&mut self) {
        self.session.cancel();
        self.screen = Screen::Menu;
    }

    /// Run the exact same snippet again from the results screen.
    fn replay_round(&mut self) {
        let Some(snippet) = self.session.snippet().cloned() else {
            return;
        };
        self.session.cancel();
        self.session.start(snippet);
        self.screen = Screen::Playing;
    }

    /// Draw a fresh snippet from the same song. Custom-prompt rounds have
    /// no song to draw from, so they run the same text again.
    fn new_round(&mut self) {
        match self.current_song.clone() {
            Some(song) => self.start_game(song),
            None => self.replay_round(),
        }
    }

    fn navigate(&mut self, delta: isize) {
        if self.songs.is_empty() {
            return;
        }
        let len = self.songs.len() as isize;
        self.selected = ((self.selected as isize + delta).rem_euclid(len)) as usize;
    }

    fn refresh_songs(&mut self) {
        self.songs = self.catalog.load_all();
        if self.selected >= self.songs.len() {
            self.selected = self.songs.len().saturating_sub(1);
        }
    }

    fn delete_selected(&mut self) {
        let Some(song) = self.songs.get(self.selected) else {
            return;
        };
        match &song.filename {
            Some(filename) => {
                let title = song.title.clone();
                if self.catalog.delete(filename) {
                    self.notice = Some(format!("Deleted \"{title}\""));
                } else {
                    self.notice = Some(format!("Could not delete \"{title}\""));
                }
                self.refresh_songs();
            }
            None => {
                self.notice = Some("Built-in songs can't be deleted".into());
            }
        }
    }

    fn run_search(&mut self) {
        let query = self.search.query.trim().to_string();
        if query.is_empty() {
            return;
        }
        self.search.results = self.lyrics.search(&query);
        self.search.selected = 0;
        if self.search.results.is_empty() {
            self.notice = Some("No results found".into());
            self.search.focus = SearchFocus::Query;
        } else {
            self.notice = None;
            self.search.focus = SearchFocus::Results;
        }
    }

    fn fetch_selected_hit(&mut self) -> Option<Song> {
        let hit = self.search.results.get(self.search.selected)?;
        let song = self.lyrics.get_by_id(hit.id);
        if song.is_none() {
            self.notice = Some("Could not fetch lyrics for that track".into());
        }
        song
    }

    fn save_selected_hit(&mut self) {
        let Some(song) = self.fetch_selected_hit() else {
            return;
        };
        if self.catalog.contains(&song.title, &song.artist) {
            self.notice = Some(format!("\"{}\" is already in the catalog", song.title));
            return;
        }
        match self.catalog.save(&song) {
            SaveOutcome::Saved(_) => {
                self.notice = Some(format!("Saved \"{}\" to the catalog", song.title));
                self.refresh_songs();
            }
            SaveOutcome::LimitReached => {
                self.notice = Some(format!(
                    "Catalog limit reached ({} songs), delete one first",
                    self.catalog.cap()
                ));
            }
            SaveOutcome::Failed => {
                self.notice = Some("Could not save the song".into());
            }
        }
    }
}

fn score_from(snippet: &Snippet, stats: &TypingStats) -> HighScore {
    HighScore {
        song: snippet.source_title.clone(),
        artist: snippet.source_artist.clone(),
        wpm: stats.wpm,
        accuracy: stats.accuracy,
        date: Utc::now(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = FileConfigStore::new().load();

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli, &config);
    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| ui::ui(app, f))?;

    loop {
        match runner.step() {
            GameEvent::Tick => {
                // Live WPM only moves while a started round is on screen
                if app.screen == Screen::Playing && app.session.has_started() {
                    terminal.draw(|f| ui::ui(app, f))?;
                }
            }
            GameEvent::Resize => {
                terminal.draw(|f| ui::ui(app, f))?;
            }
            GameEvent::Key(key) => {
                if is_ctrl_c(&key) {
                    break;
                }
                if !handle_key(app, &key) {
                    break;
                }
                terminal.draw(|f| ui::ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Route one keystroke to the current screen. Returns false to quit.
fn handle_key(app: &mut App, key: &KeyEvent) -> bool {
    match app.screen {
        Screen::Menu => handle_menu_key(app, key),
        Screen::Search => handle_search_key(app, key),
        Screen::Playing => {
            handle_playing_key(app, key);
            true
        }
        Screen::Results => handle_results_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return false,
        KeyCode::Up | KeyCode::Char('k') => app.navigate(-1),
        KeyCode::Down | KeyCode::Char('j') => app.navigate(1),
        KeyCode::Enter => {
            if let Some(song) = app.songs.get(app.selected).cloned() {
                app.start_game(song);
            }
        }
        KeyCode::Char('/') | KeyCode::Char('s') => {
            app.search = SearchState::default();
            app.notice = None;
            app.screen = Screen::Search;
        }
        KeyCode::Char('d') => app.delete_selected(),
        _ => {}
    }
    true
}

fn handle_search_key(app: &mut App, key: &KeyEvent) -> bool {
    match app.search.focus {
        SearchFocus::Query => match key.code {
            KeyCode::Esc => {
                app.notice = None;
                app.screen = Screen::Menu;
            }
            KeyCode::Enter => app.run_search(),
            KeyCode::Backspace => {
                app.search.query.pop();
            }
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    app.search.query.push(c);
                }
            }
            _ => {}
        },
        SearchFocus::Results => match key.code {
            KeyCode::Esc => {
                app.search.focus = SearchFocus::Query;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.search.selected > 0 {
                    app.search.selected -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.search.selected + 1 < app.search.results.len() {
                    app.search.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(song) = app.fetch_selected_hit() {
                    app.start_game(song);
                }
            }
            KeyCode::Char('s') => app.save_selected_hit(),
            _ => {}
        },
    }
    true
}

fn handle_playing_key(app: &mut App, key: &KeyEvent) {
    match SessionInput::from_key_event(key) {
        SessionInput::Escape => app.abandon_game(),
        input => {
            if app.session.handle_input(input) == Phase::Complete {
                app.finish_game();
            }
        }
    }
}

fn handle_results_key(app: &mut App, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Char('r') => app.replay_round(),
        KeyCode::Char('n') => app.new_round(),
        KeyCode::Char('m') => app.abandon_game(),
        _ => {}
    }
    true
}
