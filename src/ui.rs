use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{App, Screen, SearchFocus};

const HORIZONTAL_MARGIN: u16 = 5;

pub fn ui(app: &App, f: &mut Frame) {
    match app.screen {
        Screen::Menu => render_menu(app, f),
        Screen::Search => render_search(app, f),
        Screen::Playing => render_playing(app, f),
        Screen::Results => render_results(app, f),
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn title_line() -> Line<'static> {
    Line::from(Span::styled(
        "♪ lyrik — type the lyrics ♪",
        bold().fg(Color::Magenta),
    ))
}

fn render_menu(app: &App, f: &mut Frame) {
    let mut lines: Vec<Line> = vec![title_line(), Line::default()];

    if app.songs.is_empty() {
        lines.push(Line::from(Span::styled(
            "No songs in the catalog. Press / to search for lyrics.",
            dim(),
        )));
    } else {
        for (i, song) in app.songs.iter().enumerate() {
            let marker = if i == app.selected { "→ " } else { "  " };
            let style = if i == app.selected {
                bold().fg(Color::Cyan)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(marker.to_string(), style),
                Span::styled(format!("{} - {}", song.title, song.artist), style),
            ]));
        }
    }

    if !app.scores.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("High Scores", bold().fg(Color::Yellow))));
        for score in &app.scores {
            lines.push(Line::from(Span::styled(score.summary(), dim())));
        }
    }

    if let Some(notice) = &app.notice {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "↑/↓ select   Enter play   / search   d delete saved song   q quit",
        dim(),
    )));

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(widget, padded(f.area()));
}

fn render_search(app: &App, f: &mut Frame) {
    let mut lines: Vec<Line> = vec![title_line(), Line::default()];

    let cursor = if app.search.focus == SearchFocus::Query {
        "▏"
    } else {
        ""
    };
    lines.push(Line::from(vec![
        Span::styled("Search: ", bold()),
        Span::raw(app.search.query.clone()),
        Span::styled(cursor, dim()),
    ]));
    lines.push(Line::default());

    if app.search.focus == SearchFocus::Results {
        if app.search.results.is_empty() {
            lines.push(Line::from(Span::styled("No results.", dim())));
        } else {
            for (i, hit) in app.search.results.iter().enumerate() {
                let marker = if i == app.search.selected { "→ " } else { "  " };
                let style = if i == app.search.selected {
                    bold().fg(Color::Cyan)
                } else {
                    Style::default()
                };
                let album = hit
                    .album
                    .as_deref()
                    .map(|a| format!(" ({a})"))
                    .unwrap_or_default();
                lines.push(Line::from(Span::styled(
                    format!("{marker}{} - {}{album}", hit.title, hit.artist),
                    style,
                )));
            }
        }
    }

    if let Some(notice) = &app.notice {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }

    lines.push(Line::default());
    let hint = match app.search.focus {
        SearchFocus::Query => "type a song or artist   Enter search   Esc back to menu",
        SearchFocus::Results => "↑/↓ select   Enter play   s save to catalog   Esc edit query",
    };
    lines.push(Line::from(Span::styled(hint, dim())));

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(widget, padded(f.area()));
}

fn render_playing(app: &App, f: &mut Frame) {
    let session = &app.session;
    let Some(snippet) = session.snippet() else {
        return;
    };

    let area = f.area();
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let mut prompt_occupied_lines =
        ((snippet.text.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;
    if snippet.text.width() <= max_chars_per_line as usize {
        prompt_occupied_lines = 1;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Length(
                    ((area.height.saturating_sub(4) as f64 - prompt_occupied_lines as f64) / 2.0)
                        .max(0.0) as u16,
                ),
                Constraint::Length(prompt_occupied_lines),
                Constraint::Min(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(snippet.source_title.clone(), bold().fg(Color::Cyan)),
        Span::styled(format!(" - {}", snippet.source_artist), dim()),
        Span::styled(format!(" ({} words)", snippet.word_count), dim()),
    ]));
    f.render_widget(header, chunks[0]);

    f.render_widget(prompt_paragraph(app, prompt_occupied_lines), chunks[2]);

    let live = session.live_stats();
    let progress = format!(
        "{} wpm   {}% acc   {}/{} chars",
        live.wpm,
        live.accuracy,
        session.typed().len(),
        session.target().len(),
    );
    let footer_style = if session.is_blocked() {
        bold().fg(Color::Red)
    } else {
        dim()
    };
    let footer_text = if session.is_blocked() {
        format!("{progress}   fix the error (backspace)")
    } else {
        format!("{progress}   Esc to quit")
    };
    let footer = Paragraph::new(Span::styled(footer_text, footer_style))
        .alignment(Alignment::Center);
    f.render_widget(footer, chunks[4]);
}

/// The colored prompt: green for committed correct characters, red for the
/// pending error (wrong spaces shown as `·`), underlined cursor, dim
/// remainder. Centered when the whole snippet fits one line.
fn prompt_paragraph(app: &App, prompt_occupied_lines: u16) -> Paragraph<'_> {
    let session = &app.session;
    let target = session.target();

    let green_bold = bold().fg(Color::Green);
    let red_bold = bold().fg(Color::Red);
    let underlined_dim = dim().patch(bold()).add_modifier(Modifier::UNDERLINED);

    let mut spans = session
        .typed()
        .iter()
        .enumerate()
        .map(|(idx, &c)| {
            if session.is_correct(idx) {
                Span::styled(target[idx].to_string(), green_bold)
            } else {
                Span::styled(
                    match c {
                        ' ' => "·".to_owned(),
                        other => other.to_string(),
                    },
                    red_bold,
                )
            }
        })
        .collect::<Vec<Span>>();

    let cursor = session.typed().len();
    if cursor < target.len() {
        spans.push(Span::styled(target[cursor].to_string(), underlined_dim));
        let rest: String = target[cursor + 1..].iter().collect();
        spans.push(Span::styled(rest, dim().patch(bold())));
    }

    Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: false })
}

fn render_results(app: &App, f: &mut Frame) {
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("Complete!", bold().fg(Color::Green))),
        Line::default(),
    ];

    if let Some(snippet) = app.session.snippet() {
        lines.push(Line::from(vec![
            Span::styled("Song: ", bold().fg(Color::Cyan)),
            Span::raw(format!(
                "{} - {}",
                snippet.source_title, snippet.source_artist
            )),
        ]));
    }

    if let Some(stats) = app.session.stats() {
        lines.push(Line::from(vec![
            Span::styled("WPM: ", bold().fg(Color::Yellow)),
            Span::raw(stats.wpm.to_string()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Accuracy: ", bold().fg(Color::Magenta)),
            Span::raw(format!("{}%", stats.accuracy)),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Characters: ", bold()),
            Span::raw(format!("{} correct, {} errors", stats.correct, stats.errors)),
        ]));
    }

    if !app.scores.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("High Scores", bold().fg(Color::Yellow))));
        for score in &app.scores {
            lines.push(Line::from(Span::styled(score.summary(), dim())));
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "[r] replay   [n] new snippet   [m] menu   [q] quit",
        dim(),
    )));

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(widget, padded(f.area()));
}

fn padded(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN.min(area.width / 4))
        .vertical_margin(1)
        .constraints([Constraint::Min(1)].as_ref())
        .split(area);
    chunks[0]
}
