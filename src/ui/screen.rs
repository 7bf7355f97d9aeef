use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    app::{App, AppMode},
    clock::Clock,
};

/// A UI Screen boundary: responsible for rendering the current mode
pub trait Screen<C: Clock> {
    fn render(&self, app: &App<C>, f: &mut Frame);
}

/// Session list plus the selected session card
pub struct DashboardScreen;

impl<C: Clock> Screen<C> for DashboardScreen {
    fn render(&self, app: &App<C>, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Dashboard with the rename prompt on top
pub struct RenameScreen;

impl<C: Clock> Screen<C> for RenameScreen {
    fn render(&self, app: &App<C>, f: &mut Frame) {
        f.render_widget(app, f.area());

        let AppMode::Renaming { buffer } = &app.mode else {
            return;
        };
        let popup = centered_rect(50, 3, f.area());
        let input = Paragraph::new(Line::from(vec![
            Span::raw(buffer.clone()),
            Span::styled("▏", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Rename session (enter to save, esc to cancel)")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(Clear, popup);
        f.render_widget(input, popup);
    }
}

/// Rect of `percent_x` width and `height` rows centered in `area`
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Helper to construct the appropriate screen for the current mode
pub fn current_screen<C: Clock>(mode: &AppMode) -> Box<dyn Screen<C>> {
    match mode {
        AppMode::Tracking => Box::new(DashboardScreen),
        AppMode::Renaming { .. } => Box::new(RenameScreen),
    }
}
