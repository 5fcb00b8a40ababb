//! Content pane — title and breadcrumb of the current route.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::core::nav::{breadcrumb, NavigationItem};

use super::theme::Theme;

pub struct ContentPane<'a> {
    pub tree: &'a [NavigationItem],
    pub path: &'a str,
    pub login_path: &'a str,
    pub block: Option<Block<'a>>,
}

impl ContentPane<'_> {
    fn lines(&self) -> Vec<Line<'static>> {
        if self.path == self.login_path {
            return vec![
                Line::from(Span::styled("Signed out", Theme::title_style())),
                Line::raw(""),
                Line::from(Span::styled(
                    "Your session has ended. Quit and sign in again to continue.",
                    Theme::muted_style(),
                )),
            ];
        }

        let crumbs = breadcrumb(self.tree, self.path);
        let title = crumbs.last().copied().unwrap_or("Not found").to_string();
        let trail = if crumbs.is_empty() {
            self.path.to_string()
        } else {
            crumbs.join(" / ")
        };
        vec![
            Line::from(Span::styled(trail, Theme::muted_style())),
            Line::raw(""),
            Line::from(Span::styled(title, Theme::title_style())),
            Line::from(Span::styled(self.path.to_string(), Theme::muted_style())),
        ]
    }
}

impl Widget for ContentPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut paragraph = Paragraph::new(self.lines()).wrap(Wrap { trim: false });
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        paragraph.render(area, buf);
    }
}
