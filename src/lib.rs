// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only rendering in main.rs.
pub mod app_dirs;
pub mod config;
pub mod highscores;
pub mod lyrics;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod snippet;
pub mod song;
