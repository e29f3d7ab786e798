//! Remote lyrics lookup against the lrclib.net API.
//!
//! No API key is required; the service asks for an identifying User-Agent.
//! Every failure mode here (transport, HTTP status, parse) degrades to an
//! empty result so the search screen never has a fatal path.

use crate::song::Song;
use serde::Deserialize;
use std::time::Duration;

const API_BASE: &str = "https://lrclib.net/api";
const USER_AGENT: &str = "lyrik/0.3.0 (https://github.com/martintrojer/lyrik)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One row in the remote search results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub has_lyrics: bool,
}

/// Track payload as lrclib returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LrclibTrack {
    id: u64,
    track_name: String,
    artist_name: String,
    album_name: Option<String>,
    #[serde(default)]
    instrumental: bool,
    plain_lyrics: Option<String>,
}

/// Seam for the remote collaborator so the search flow is testable without
/// the network.
pub trait LyricsProvider {
    fn search(&self, query: &str) -> Vec<SearchHit>;
    fn get_by_id(&self, id: u64) -> Option<Song>;
}

pub struct LrclibClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl LrclibClient {
    pub fn new() -> Self {
        Self::with_base_url(API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl Default for LrclibClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsProvider for LrclibClient {
    fn search(&self, query: &str) -> Vec<SearchHit> {
        let url = format!("{}/search", self.base_url);
        let response = match self.client.get(&url).query(&[("q", query)]).send() {
            Ok(r) if r.status().is_success() => r,
            _ => return Vec::new(),
        };

        let tracks: Vec<LrclibTrack> = match response.json() {
            Ok(t) => t,
            Err(_) => return Vec::new(),
        };

        tracks
            .into_iter()
            .filter(|t| !t.instrumental && t.plain_lyrics.is_some())
            .map(|t| SearchHit {
                id: t.id,
                title: t.track_name,
                artist: t.artist_name,
                album: t.album_name,
                has_lyrics: true,
            })
            .collect()
    }

    fn get_by_id(&self, id: u64) -> Option<Song> {
        let url = format!("{}/get/{}", self.base_url, id);
        let response = self.client.get(&url).send().ok()?;
        if !response.status().is_success() {
            return None;
        }

        let track: LrclibTrack = response.json().ok()?;
        let lyrics = track.plain_lyrics?;

        Some(Song {
            title: track.track_name,
            artist: track.artist_name,
            lyrics,
            filename: None,
        })
    }
}
