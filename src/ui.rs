pub mod screen;
pub mod session_card;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
    Frame,
};

use crate::{
    app::App,
    clock::Clock,
    session::{Session, SessionStatus},
    toast::ToastKind,
    util::{format_hms, truncate_to_width},
};

const HORIZONTAL_MARGIN: u16 = 1;
const LIST_WIDTH_PERCENT: u16 = 38;

pub fn draw<C: Clock>(app: &App<C>, f: &mut Frame) {
    screen::current_screen::<C>(&app.mode).render(app, f);
}

pub(crate) fn status_style(status: SessionStatus) -> Style {
    match status {
        SessionStatus::Active => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        SessionStatus::Paused => Style::default().fg(Color::Yellow),
        SessionStatus::Idle => Style::default().fg(Color::DarkGray),
    }
}

pub(crate) fn status_badge(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Active => "▶ ACTIVE",
        SessionStatus::Paused => "⏸ PAUSED",
        SessionStatus::Idle => "  IDLE",
    }
}

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(0),    // Sessions
                Constraint::Length(1), // Toast
                Constraint::Length(1), // Help
            ])
            .split(area);

        render_header(self, chunks[0], buf);

        if self.store.is_empty() {
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No sessions yet",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Press n to start one",
                    Style::default().add_modifier(Modifier::DIM),
                )),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .render(chunks[1], buf);
        } else {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(LIST_WIDTH_PERCENT),
                    Constraint::Percentage(100 - LIST_WIDTH_PERCENT),
                ])
                .split(chunks[1]);

            render_session_list(self, body[0], buf);
            if let Some(session) = self.selected_session() {
                session_card::render_session_card(self, session, body[1], buf);
            }
        }

        render_toast(self, chunks[2], buf);
        render_help(self, chunks[3], buf);
    }
}

fn render_header<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let active = app
        .store
        .active_id()
        .and_then(|id| app.store.elapsed_secs(id))
        .map(format_hms);

    let mut spans = vec![Span::styled(
        "Gaming Session Tracker",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw(format!("  {} session(s)", app.store.len())));
    if let Some(clock) = active {
        spans.push(Span::raw("  ⏱ "));
        spans.push(Span::styled(
            clock,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ));
    }

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .render(area, buf);
}

fn session_line<C: Clock>(app: &App<C>, session: &Session, width: usize) -> Line<'static> {
    let elapsed = app.store.elapsed_secs(session.id).unwrap_or(0);
    let clock = format_hms(elapsed);
    let badge = status_badge(session.status);
    // name gets whatever is left after badge, clock and separators
    let name_width = width.saturating_sub(badge.chars().count() + clock.len() + 4);

    Line::from(vec![
        Span::styled(
            format!("{:<name_width$}", truncate_to_width(&session.name, name_width)),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(badge, status_style(session.status)),
        Span::raw(" "),
        Span::styled(clock, Style::default().add_modifier(Modifier::DIM)),
    ])
}

fn render_session_list<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let inner_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .store
        .sessions()
        .iter()
        .map(|s| ListItem::new(session_line(app, s, inner_width)))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Sessions"))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("› ");

    let mut state = ListState::default();
    state.select(Some(app.selected));
    StatefulWidget::render(list, area, buf, &mut state);
}

fn render_toast<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    if let Some(toast) = app.toasts.latest() {
        let style = match toast.kind {
            ToastKind::Success => Style::default().fg(Color::Green),
            ToastKind::Info => Style::default().fg(Color::Blue),
        };
        Paragraph::new(Span::styled(
            toast.message.clone(),
            style.add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(area, buf);
    }
}

fn render_help<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let help = match app.selected_session().map(|s| s.status) {
        Some(SessionStatus::Active) => {
            "(n)ew (p)ause (x) end (e)dit name (1-7) record ↑/↓ select (q)uit"
        }
        Some(SessionStatus::Paused) => "(n)ew (r)esume (x) end (e)dit name ↑/↓ select (q)uit",
        _ => "(n)ew session (q)uit",
    };
    Paragraph::new(help)
        .style(Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}
