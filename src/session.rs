use crate::scoring::{self, TypingStats};
use crate::snippet::Snippet;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::SystemTime;

/// Session lifecycle. One tagged state instead of scattered flags: every
/// transition goes through the methods on `TypingSession`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Complete,
}

/// A keystroke as the session understands it, already stripped of terminal
/// details. Arrows, modifier chords and other control keys map to `Ignored`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionInput {
    Char(char),
    Backspace,
    Escape,
    Ignored,
}

impl SessionInput {
    pub fn from_key_event(key: &KeyEvent) -> Self {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
        {
            return SessionInput::Ignored;
        }
        match key.code {
            KeyCode::Char(c) => SessionInput::Char(c),
            KeyCode::Backspace | KeyCode::Delete => SessionInput::Backspace,
            KeyCode::Esc => SessionInput::Escape,
            _ => SessionInput::Ignored,
        }
    }
}

/// The typing round state machine.
///
/// Input follows the error-blocking rule: once the most recently typed
/// character mismatches the target, further characters are rejected until the
/// error is deleted. The final character is the one exception — reaching the
/// target length completes the round even on a miss.
#[derive(Debug)]
pub struct TypingSession {
    phase: Phase,
    snippet: Option<Snippet>,
    target: Vec<char>,
    typed: Vec<char>,
    started_at: Option<SystemTime>,
    stats: Option<TypingStats>,
}

impl TypingSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            snippet: None,
            target: Vec::new(),
            typed: Vec::new(),
            started_at: None,
            stats: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn snippet(&self) -> Option<&Snippet> {
        self.snippet.as_ref()
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn stats(&self) -> Option<&TypingStats> {
        self.stats.as_ref()
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whether the character committed at `idx` matches the target there.
    pub fn is_correct(&self, idx: usize) -> bool {
        self.typed.get(idx).is_some() && self.typed.get(idx) == self.target.get(idx)
    }

    /// True while the last typed character is an uncorrected error, i.e. new
    /// input is currently rejected.
    pub fn is_blocked(&self) -> bool {
        match self.typed.last() {
            Some(&c) => self.target.get(self.typed.len() - 1) != Some(&c),
            None => false,
        }
    }

    /// Load a snippet and begin accepting keystrokes. Only valid when Idle.
    pub fn start(&mut self, snippet: Snippet) {
        if self.phase != Phase::Idle {
            return;
        }
        self.target = snippet.text.chars().collect();
        self.snippet = Some(snippet);
        self.typed.clear();
        self.started_at = None;
        self.stats = None;
        self.phase = Phase::Active;
    }

    /// Feed one printable character. No-op outside Active, while blocked on
    /// an uncorrected error, or when the target is already filled.
    pub fn press_char(&mut self, c: char) {
        if self.phase != Phase::Active {
            return;
        }
        if self.typed.len() >= self.target.len() {
            return;
        }
        if self.is_blocked() {
            return;
        }

        if self.started_at.is_none() {
            self.started_at = Some(SystemTime::now());
        }

        self.typed.push(c);

        if self.typed.len() == self.target.len() {
            self.complete();
        }
    }

    /// Remove the last typed character. This is the only way out of a
    /// blocked state, so it is never conditional on correctness.
    pub fn backspace(&mut self) {
        if self.phase != Phase::Active {
            return;
        }
        self.typed.pop();
    }

    /// Abandon the session and return to Idle. Valid from Active or
    /// Complete; stats already handed out at completion are not rolled back.
    pub fn cancel(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        *self = Self::new();
    }

    /// Route a classified keystroke. Returns the phase afterwards so the
    /// caller can react to the Complete transition.
    pub fn handle_input(&mut self, input: SessionInput) -> Phase {
        match input {
            SessionInput::Char(c) => self.press_char(c),
            SessionInput::Backspace => self.backspace(),
            SessionInput::Escape => self.cancel(),
            SessionInput::Ignored => {}
        }
        self.phase
    }

    /// Stats over the buffer as it stands right now, for the live HUD.
    pub fn live_stats(&self) -> TypingStats {
        let text: String = self.target.iter().collect();
        scoring::compute_stats(&self.typed, &text, self.elapsed_ms())
    }

    fn elapsed_ms(&self) -> u64 {
        self.started_at
            .and_then(|t| t.elapsed().ok())
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn complete(&mut self) {
        let text: String = self.target.iter().collect();
        self.stats = Some(scoring::compute_stats(
            &self.typed,
            &text,
            self.elapsed_ms(),
        ));
        self.phase = Phase::Complete;
    }
}

impl Default for TypingSession {
    fn default() -> Self {
        Self::new()
    }
}
