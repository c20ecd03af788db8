//! Recent searches list

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use super::class_color;
use crate::application::visualizer::App;
use crate::domain::map_status;

/// Draw recent searches, newest first, numbered for quick-track
pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let history = app.recent_searches();

    let items: Vec<ListItem> = if history.is_empty() {
        vec![ListItem::new(Line::styled(" No recent searches", Style::default().fg(Color::DarkGray)))]
    } else {
        history
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let display = map_status(&entry.snapshot.status);
                ListItem::new(Line::from(vec![
                    Span::raw(format!(" {} {:<10} ", i + 1, entry.order_id())),
                    Span::styled(
                        format!("{} {}", display.glyph, entry.snapshot.status),
                        Style::default().fg(class_color(display.color_class)),
                    ),
                    Span::styled(
                        format!(" {}", entry.searched_at.format("%H:%M:%S")),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect()
    };

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Recent Searches "));
    frame.render_widget(list, area);
}
