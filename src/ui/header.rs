//! Header bar — product title on the left, signed-in user on the right.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::core::session::UserData;

use super::theme::Theme;

pub struct HeaderBar<'a> {
    pub title: &'a str,
    pub user: Option<&'a UserData>,
    /// Shown while a logout request is in flight.
    pub signing_out: bool,
}

impl HeaderBar<'_> {
    fn user_spans(&self) -> Vec<Span<'static>> {
        let Some(user) = self.user else {
            return vec![Span::styled("not signed in ", Theme::muted_style())];
        };
        let initial = user.avatar_initial().unwrap_or('?');
        let mut spans = vec![
            Span::styled(format!(" {initial} "), Theme::avatar_style()),
            Span::raw(format!(" {} ", user.user_name)),
            Span::styled(format!("· {} ", user.role), Theme::muted_style()),
        ];
        if self.signing_out {
            spans.push(Span::styled("(signing out) ", Theme::muted_style()));
        }
        spans
    }
}

impl Widget for HeaderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", self.title),
            Theme::title_style(),
        )))
        .render(area, buf);

        Paragraph::new(Line::from(self.user_spans()))
            .alignment(Alignment::Right)
            .render(area, buf);
    }
}
