//! Layout helpers — split the terminal area into the shell's regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Sidebar width in columns, borders included.
const SIDEBAR_WIDTH: u16 = 30;

/// Header bar on top, sidebar and content side by side, status bar below.
pub struct AppLayout {
    pub header_area: Rect,
    pub sidebar_area: Rect,
    pub content_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn from_area(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // header bar
                Constraint::Min(3),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
            .split(rows[1]);

        Self {
            header_area: rows[0],
            sidebar_area: body[0],
            content_area: body[1],
            status_area: rows[2],
        }
    }
}
