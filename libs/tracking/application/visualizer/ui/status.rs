//! Status card and progress timeline

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::class_color;
use crate::application::controller::{TrackingPhase, TrackingView};
use crate::domain::Timeline;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

pub fn draw(frame: &mut Frame, view: &TrackingView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Status card
            Constraint::Min(0),    // Timeline
        ])
        .split(area);

    draw_card(frame, view, chunks[0]);

    match &view.timeline {
        Some(timeline) => draw_timeline(frame, timeline, chunks[1]),
        None => {
            let empty = Paragraph::new("")
                .block(Block::default().borders(Borders::ALL).title(" Progress "));
            frame.render_widget(empty, chunks[1]);
        }
    }
}

fn draw_card(frame: &mut Frame, view: &TrackingView, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Order Status ");

    let lines = match view.phase() {
        TrackingPhase::Idle => vec![Line::from(" Enter an order id to start tracking.")],
        TrackingPhase::Loading => vec![Line::styled(
            " Loading...",
            Style::default().fg(Color::Yellow),
        )],
        TrackingPhase::Failed => vec![Line::styled(
            format!(" ❌ {}", view.error.as_deref().unwrap_or("Request failed")),
            Style::default().fg(Color::Red),
        )],
        TrackingPhase::Success => match (&view.snapshot, &view.display) {
            (Some(snapshot), Some(display)) => {
                let color = class_color(display.color_class);
                let mut lines = vec![
                    Line::from(vec![
                        Span::raw(format!(" {} ", display.glyph)),
                        Span::styled(
                            snapshot.order_id.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw("  "),
                        Span::styled(
                            snapshot.status.to_uppercase(),
                            Style::default().fg(color).add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::styled(format!(" {}", display.stage_label), Style::default().fg(color)),
                    Line::from(format!(" Received:     {}", snapshot.received_at.format(TIME_FORMAT))),
                    Line::from(format!(" Last updated: {}", snapshot.last_updated.format(TIME_FORMAT))),
                ];
                if let Some(error) = &snapshot.error {
                    lines.push(Line::styled(format!(" Error: {}", error), Style::default().fg(Color::Red)));
                }
                lines
            }
            _ => Vec::new(),
        },
    };

    let card = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    frame.render_widget(card, area);
}

fn draw_timeline(frame: &mut Frame, timeline: &Timeline, area: Rect) {
    let lines: Vec<Line> = timeline
        .stages
        .iter()
        .flat_map(|stage| {
            let color = class_color(stage.progress.color_class());
            [
                Line::from(vec![
                    Span::styled(
                        format!(" {}. {:<28}", stage.number, stage.title),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("[{}]", stage.badge()), Style::default().fg(color)),
                ]),
                Line::styled(format!("    {}", stage.description), Style::default().fg(Color::Gray)),
            ]
        })
        .collect();

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Progress "));
    frame.render_widget(widget, area);
}
