//! UI widgets for the visualizer

pub mod history;
pub mod status;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{App, InputMode};
use crate::application::controller::TrackingView;

/// Terminal color for a status class
pub fn class_color(class: &str) -> Color {
    match class {
        "status-success" => Color::Green,
        "status-warning" => Color::Yellow,
        "status-danger" => Color::Red,
        _ => Color::Cyan,
    }
}

/// Draw the main UI layout
pub fn draw(frame: &mut Frame, app: &App) {
    let view = app.view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Order id input
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_input(frame, app, chunks[1]);
    draw_main(frame, app, &view, chunks[2]);
    draw_footer(frame, app, &view, chunks[3]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let health = app.health();

    let header = Paragraph::new(Line::from(vec![
        Span::raw(format!(" Client: {} | Backend: ", app.client_id)),
        Span::styled(
            format!("{} {}", health.icon(), health.message),
            Style::default().fg(class_color(health.status_class())),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" SwiftTrack Live Tracking "));

    frame.render_widget(header, area);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let text = if editing {
        format!(" {}_", app.input)
    } else {
        format!(" {}", app.input)
    };

    let input = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Order ID "));

    frame.render_widget(input, area);
}

fn draw_main(frame: &mut Frame, app: &App, view: &TrackingView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Status card and timeline
            Constraint::Length(36), // Recent searches
        ])
        .split(area);

    status::draw(frame, view, chunks[0]);
    history::draw(frame, app, chunks[1]);
}

fn draw_footer(frame: &mut Frame, app: &App, view: &TrackingView, area: Rect) {
    let poll = &view.poll;
    let refresh = if poll.enabled {
        let state = if poll.in_flight { "refreshing" } else { "on" };
        Span::styled(
            format!(
                " Auto-refresh: {} ({} every {}s)",
                state,
                poll.subject_order_id,
                app.poll_interval().as_secs()
            ),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw(" Auto-refresh: off")
    };

    let hint = match (&app.status_message, app.input_mode) {
        (Some(message), _) => format!(" | {}", message),
        (None, InputMode::Editing) => " | Enter=track Esc=done".to_string(),
        (None, InputMode::Normal) => " | i=edit Enter=track p=auto-refresh c=clear 1-5=recent q=quit".to_string(),
    };

    let footer = Paragraph::new(Line::from(vec![refresh, Span::raw(hint)]))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
