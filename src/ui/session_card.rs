use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget},
};

use crate::{
    app::App,
    clock::Clock,
    session::{EventKind, Session},
    ui::{status_badge, status_style},
    util::format_hms,
};

const GRID_COLUMNS: usize = 4;

/// Detail pane for the selected session: clock, event grid, event log and tallies
pub fn render_session_card<C: Clock>(app: &App<C>, session: &Session, area: Rect, buf: &mut Buffer) {
    let grid_rows = if session.is_active() {
        EventKind::ALL.len().div_ceil(GRID_COLUMNS) as u16
    } else {
        1
    };

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", session.name))
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = outer.inner(area);
    outer.render(area, buf);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),         // Clock + status
            Constraint::Length(grid_rows), // Event grid
            Constraint::Min(0),            // Event log
            Constraint::Length(1),         // Tallies
        ])
        .split(inner);

    let elapsed = app.store.elapsed_secs(session.id).unwrap_or(0);
    Paragraph::new(Line::from(vec![
        Span::styled(status_badge(session.status), status_style(session.status)),
        Span::raw("   "),
        Span::styled(
            format_hms(elapsed),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "   started {}   id {}",
                session.created_at.format("%H:%M:%S"),
                session.id.short()
            ),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    render_event_grid(session, chunks[1], buf);
    render_event_log(session, chunks[2], buf);
    render_tally(app, session, chunks[3], buf);
}

fn render_event_grid(session: &Session, area: Rect, buf: &mut Buffer) {
    if !session.is_active() {
        Paragraph::new(Span::styled(
            "Resume the session to record events",
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(area, buf);
        return;
    }

    let cell_width = (area.width as usize / GRID_COLUMNS).max(1);
    let lines: Vec<Line> = EventKind::ALL
        .chunks(GRID_COLUMNS)
        .map(|row| {
            Line::from(
                row.iter()
                    .flat_map(|kind| {
                        let label = kind.to_string();
                        let pad = cell_width.saturating_sub(label.len() + 4);
                        [
                            Span::styled(
                                format!("[{}]", kind.hotkey()),
                                Style::default().fg(Color::Cyan),
                            ),
                            Span::raw(format!(" {label}{}", " ".repeat(pad))),
                        ]
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    Paragraph::new(lines).render(area, buf);
}

fn render_event_log(session: &Session, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::TOP)
        .title("Session Events");

    if session.events.is_empty() {
        Paragraph::new(Span::styled(
            "No events recorded",
            Style::default().add_modifier(Modifier::DIM),
        ))
        .block(block)
        .render(area, buf);
        return;
    }

    // oldest first, scrolled so the newest stays visible
    let visible = area.height.saturating_sub(1) as usize;
    let skip = session.events.len().saturating_sub(visible);
    let items: Vec<ListItem> = session
        .events
        .iter()
        .skip(skip)
        .map(|event| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    event.timestamp.format("%H:%M:%S").to_string(),
                    Style::default().fg(Color::Magenta),
                ),
                Span::raw("  "),
                Span::raw(event.description()),
            ]))
        })
        .collect();

    List::new(items).block(block).render(area, buf);
}

fn render_tally<C: Clock>(app: &App<C>, session: &Session, area: Rect, buf: &mut Buffer) {
    let tally = app.store.event_tally(session.id);
    if tally.is_empty() {
        return;
    }
    let text = tally
        .iter()
        .map(|(kind, n)| format!("{kind} ×{n}"))
        .collect::<Vec<_>>()
        .join("  ");
    Paragraph::new(text)
        .style(Style::default().add_modifier(Modifier::DIM))
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::clock::{Clock, ManualClock};
    use crate::config::Config;
    use crate::session::EventKind;
    use crate::ui::tests::rendered;
    use ratatui::layout::Rect;
    use std::time::Instant;

    #[test]
    fn grid_only_for_active_session() {
        let mut app = App::with_clock(&Config::default(), ManualClock::default());
        let now = Instant::now();
        app.start_session(now);

        let out = rendered(&app, Rect::new(0, 0, 120, 30));
        assert!(out.contains("[1]"));
        assert!(out.contains("[7]"));

        app.pause_selected(now);
        let out = rendered(&app, Rect::new(0, 0, 120, 30));
        assert!(!out.contains("[1]"));
        assert!(out.contains("Resume the session to record events"));
    }

    #[test]
    fn log_keeps_newest_visible() {
        let mut app = App::with_clock(&Config::default(), ManualClock::default());
        let now = Instant::now();
        app.start_session(now);
        for _ in 0..40 {
            app.record_event(EventKind::Kill, now);
        }
        app.record_event(EventKind::Achievement, now);

        let out = rendered(&app, Rect::new(0, 0, 120, 20));
        assert!(out
            .lines()
            .any(|l| l.contains("  Achievement") && !l.contains("[7]")));
        assert!(out.contains("Kill ×40  Achievement ×1"));
    }

    #[test]
    fn header_shows_start_time() {
        let clock = ManualClock::default();
        let mut app = App::with_clock(&Config::default(), clock.clone());
        app.start_session(Instant::now());
        let started = app.selected_session().unwrap().created_at;
        assert_eq!(started, clock.now_local());

        let out = rendered(&app, Rect::new(0, 0, 160, 30));
        assert!(out.contains(&format!("started {}", started.format("%H:%M:%S"))));
    }

    #[test]
    fn empty_log_hint() {
        let mut app = App::with_clock(&Config::default(), ManualClock::default());
        app.start_session(Instant::now());
        let out = rendered(&app, Rect::new(0, 0, 120, 30));
        assert!(out.contains("No events recorded"));
    }
}
