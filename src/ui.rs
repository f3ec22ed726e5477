//! UI rendering helpers for the terminal user interface.
//!
//! Layout, top to bottom: header, the Playlists and Tracks panes side by
//! side, a now-playing bar, the status line and the key help footer.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Pane};
use crate::config::UiSettings;
use crate::keys::KeyMap;
use crate::player::PlaybackState;
use crate::service::{Track, format_mmss};

/// What the player is doing, as far as the UI needs to know.
#[derive(Clone, Copy, Debug, Default)]
pub struct NowPlaying<'a> {
    pub track: Option<&'a Track>,
    pub state: PlaybackState,
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

/// A list state with no selection when the pane is empty.
fn list_state(selected: Option<usize>) -> ListState {
    let mut state = ListState::default();
    state.select(selected);
    state
}

fn track_row(track: &Track, ui: &UiSettings) -> String {
    let text = track.display(&ui.track_separator);
    if ui.show_durations && track.duration_secs > 0 {
        format!("{text} [{}]", format_mmss(track.duration_secs))
    } else {
        text
    }
}

fn now_playing_text(now: NowPlaying<'_>, ui: &UiSettings) -> String {
    let Some(track) = now.track else {
        return "No track playing".to_string();
    };
    let icon = match now.state {
        PlaybackState::Playing => "▶",
        PlaybackState::Paused => "⏸",
        PlaybackState::Stopped => "■",
    };
    format!("{icon} {}", track.display(&ui.track_separator))
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, now: NowPlaying<'_>, ui: &UiSettings, keymap: &KeyMap) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tidal-tui ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(chunks[1]);

    let playlist_items: Vec<ListItem> = app
        .playlists
        .iter()
        .map(|p| ListItem::new(p.title.as_str()))
        .collect();
    let playlists = List::new(playlist_items)
        .block(pane_block(
            format!(" {} ", Pane::Playlists.title()),
            app.focus == Pane::Playlists,
        ))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = list_state(app.selected(Pane::Playlists));
    frame.render_stateful_widget(playlists, panes[0], &mut state);

    let track_items: Vec<ListItem> = app
        .tracks
        .iter()
        .map(|t| ListItem::new(track_row(t, ui)))
        .collect();
    let tracks_title = match app.open_playlist_title() {
        Some(name) => format!(" {}: {name} ", Pane::Tracks.title()),
        None => format!(" {} ", Pane::Tracks.title()),
    };
    let tracks = List::new(track_items)
        .block(pane_block(tracks_title, app.focus == Pane::Tracks))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = list_state(app.selected(Pane::Tracks));
    frame.render_stateful_widget(tracks, panes[1], &mut state);

    let player_bar = Paragraph::new(now_playing_text(now, ui)).block(
        Block::bordered()
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            })
            .title(" player "),
    );
    frame.render_widget(player_bar, chunks[2]);

    let status = Paragraph::new(app.status.as_deref().unwrap_or(""))
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(status, chunks[3]);

    let footer = Paragraph::new(keymap.help_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
