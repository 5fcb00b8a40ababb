//! Sidebar widget — draws the visible navigation rows as an indented,
//! collapsible list.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::render::{RenderedLink, RenderedNode};

use super::theme::Theme;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the sidebar (selected row, scroll offset).
#[derive(Debug, Default)]
pub struct SidebarState {
    /// Index into the visible rows that is currently highlighted.
    pub selected: usize,
    /// First visible row.
    pub offset: usize,
}

impl SidebarState {
    /// Keep the selected row inside a viewport of `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected - height + 1;
        }
    }
}

// ───────────────────────────────────────── row text ──────────

const INDENT: &str = "  ";

fn chevron(link: &RenderedLink) -> &'static str {
    match (link.has_children && !link.truncated, link.expanded) {
        (false, _) => "",
        (true, true) => " ▾",
        (true, false) => " ▸",
    }
}

/// Plain-text rendering of one row.  `width` is used to draw dividers.
pub fn row_text(node: &RenderedNode, width: usize) -> String {
    let indent = INDENT.repeat(node.depth());
    match node {
        RenderedNode::Divider { .. } => {
            let len = width.saturating_sub(indent.len()).max(1);
            format!("{indent}{}", "─".repeat(len))
        }
        RenderedNode::Header { title, .. } => format!("{indent}{}", title.to_uppercase()),
        RenderedNode::Link(link) => {
            let icon = link.icon.as_deref().unwrap_or("•");
            format!("{indent}{icon} {}{}", link.title, chevron(link))
        }
    }
}

// ───────────────────────────────────────── widget ────────────

/// The sidebar widget, created fresh each frame from the visible rows.
pub struct SidebarWidget<'a> {
    rows: &'a [&'a RenderedNode],
    block: Option<Block<'a>>,
}

impl<'a> SidebarWidget<'a> {
    pub fn new(rows: &'a [&'a RenderedNode]) -> Self {
        Self { rows, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn row_style(node: &RenderedNode, is_selected: bool) -> Style {
        if is_selected && matches!(node, RenderedNode::Link(_)) {
            return Theme::selected_style();
        }
        match node {
            RenderedNode::Divider { .. } => Theme::divider_style(),
            RenderedNode::Header { .. } => Theme::section_header_style(),
            RenderedNode::Link(link) if link.active => Theme::active_style(),
            RenderedNode::Link(_) => Theme::link_style(),
        }
    }
}

impl<'a> StatefulWidget for SidebarWidget<'a> {
    type State = SidebarState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        state.selected = state.selected.min(self.rows.len().saturating_sub(1));
        state.clamp_scroll(inner.height as usize);

        let visible = self
            .rows
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(inner.height as usize);

        for (i, (row_idx, node)) in visible.enumerate() {
            let y = inner.y + i as u16;
            let is_selected = row_idx == state.selected;
            let text = row_text(node, inner.width as usize);
            let line = Line::from(Span::styled(text, Self::row_style(node, is_selected)));
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nav::{NavLink, NavigationItem};
    use crate::core::render::{visible_rows, NavRenderer};

    fn tree() -> Vec<NavigationItem> {
        vec![
            NavigationItem::Header {
                title: "Main".into(),
            },
            NavLink::new("dashboard", "Dashboard").icon("◆").into(),
            NavigationItem::Divider,
            NavLink::new("reports", "Reports")
                .children(vec![NavLink::new("monthly", "Monthly").into()])
                .into(),
        ]
    }

    fn line(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn chevron_only_on_groups() {
        let nav = NavRenderer::default();
        let nodes = nav.render(&tree(), "/dashboard");
        let rows = visible_rows(&nodes);
        assert_eq!(row_text(rows[0], 10), "MAIN");
        assert_eq!(row_text(rows[1], 10), "◆ Dashboard");
        assert_eq!(row_text(rows[2], 4), "────");
        assert_eq!(row_text(rows[3], 10), "• Reports ▸");
    }

    #[test]
    fn no_chevron_on_group_at_depth_limit() {
        let t: Vec<NavigationItem> = vec![NavLink::new("reports", "Reports")
            .children(vec![NavLink::new("monthly", "Monthly").into()])
            .into()];
        let nav = NavRenderer::new(1);
        let nodes = nav.render(&t, "");
        assert_eq!(row_text(visible_rows(&nodes)[0], 10), "• Reports");
    }

    #[test]
    fn renders_expanded_children_indented() {
        let mut nav = NavRenderer::default();
        let t = tree();
        let nodes = nav.render(&t, "");
        let reports = visible_rows(&nodes)[3].as_link().cloned().unwrap();
        nav.click(&reports);

        let nodes = nav.render(&t, "/reports/monthly");
        let rows = visible_rows(&nodes);
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);
        let mut state = SidebarState::default();
        SidebarWidget::new(&rows).render(area, &mut buf, &mut state);

        assert_eq!(line(&buf, 3), "• Reports ▾");
        assert_eq!(line(&buf, 4), "  • Monthly");
        assert_eq!(buf[(2, 4)].style().fg, Theme::active_style().fg);
    }

    #[test]
    fn scrolls_to_keep_selection_visible() {
        let nav = NavRenderer::default();
        let nodes = nav.render(&tree(), "");
        let rows = visible_rows(&nodes);
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        let mut state = SidebarState {
            selected: 3,
            offset: 0,
        };
        SidebarWidget::new(&rows).render(area, &mut buf, &mut state);
        assert_eq!(state.offset, 2);
        assert_eq!(line(&buf, 1), "• Reports ▸");
    }
}
