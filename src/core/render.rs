//! Navigation tree renderer — turns the navigation tree, the current path and
//! the expanded set into rendered nodes, and owns expand/collapse transitions.
//!
//! Rendering is recursive over [`NavigationItem`]s.  Each link computes its
//! full path from its ancestors, decides whether it is active, and either
//! navigates or toggles its group when clicked.
//!
//! Active matching is deliberately loose: a link is active when its full path
//! occurs anywhere in the current path.  `reports` is active under
//! `/reports/monthly`, and also under `/reports-archive/2024`.

use std::cell::Cell;
use std::collections::HashSet;

use super::nav::{NavLink, NavigationItem};

/// Recursion limit used when the config does not override it.
pub const DEFAULT_MAX_DEPTH: usize = 16;

// ───────────────────────────────────────── expanded set ──────

/// Segments of the groups currently shown with their children visible.
///
/// Keyed by segment rather than full path, so two groups that share a
/// segment in different subtrees expand together.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExpandedSet(HashSet<String>);

impl ExpandedSet {
    pub fn contains(&self, segment: &str) -> bool {
        self.0.contains(segment)
    }

    /// Add `segment` if absent, remove it if present.  Returns whether the
    /// segment is expanded afterwards.
    pub fn toggle(&mut self, segment: &str) -> bool {
        if self.0.remove(segment) {
            false
        } else {
            self.0.insert(segment.to_string());
            true
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ───────────────────────────────────────── path helpers ──────

/// `parent/segment`, or just `segment` at the root.
pub fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}/{segment}")
    }
}

/// Substring match of `full_path` against the current location.
pub fn is_active(current_path: &str, full_path: &str) -> bool {
    current_path.contains(full_path)
}

// ───────────────────────────────────────── output ────────────

/// One rendered node.  Links carry their children (if mounted) so collapsed
/// groups keep their structure while hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedNode {
    Divider { depth: usize },
    Header { depth: usize, title: String },
    Link(RenderedLink),
}

impl RenderedNode {
    pub fn depth(&self) -> usize {
        match self {
            RenderedNode::Divider { depth } | RenderedNode::Header { depth, .. } => *depth,
            RenderedNode::Link(link) => link.depth,
        }
    }

    pub fn as_link(&self) -> Option<&RenderedLink> {
        match self {
            RenderedNode::Link(link) => Some(link),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLink {
    pub depth: usize,
    pub segment: String,
    pub full_path: String,
    pub title: String,
    pub icon: Option<String>,
    pub active: bool,
    pub has_children: bool,
    /// The group sits at the depth limit and its children are never
    /// rendered.  It still toggles when clicked but draws no chevron.
    pub truncated: bool,
    pub expanded: bool,
    /// Collapsible container.  `None` until the group is first expanded;
    /// afterwards always present, shown only while `expanded`.
    pub children: Option<Vec<RenderedNode>>,
}

/// Result of clicking a link row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Toggled { segment: String, expanded: bool },
    Navigate(String),
}

// ───────────────────────────────────────── renderer ──────────

/// Owns the expand/collapse state of the sidebar.
#[derive(Debug)]
pub struct NavRenderer {
    expanded: ExpandedSet,
    /// Groups that have been expanded at least once.
    mounted: HashSet<String>,
    max_depth: usize,
    depth_warned: Cell<bool>,
}

impl Default for NavRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl NavRenderer {
    pub fn new(max_depth: usize) -> Self {
        Self {
            expanded: ExpandedSet::default(),
            mounted: HashSet::new(),
            max_depth: max_depth.max(1),
            depth_warned: Cell::new(false),
        }
    }

    pub fn expanded(&self) -> &ExpandedSet {
        &self.expanded
    }

    /// Render the whole tree against `current_path`.
    pub fn render(&self, tree: &[NavigationItem], current_path: &str) -> Vec<RenderedNode> {
        let mut out = Vec::with_capacity(tree.len());
        for item in tree {
            if let Some(node) = self.render_item(item, "", 0, current_path) {
                out.push(node);
            }
        }
        out
    }

    fn render_item(
        &self,
        item: &NavigationItem,
        parent_path: &str,
        depth: usize,
        current_path: &str,
    ) -> Option<RenderedNode> {
        match item {
            NavigationItem::Divider => Some(RenderedNode::Divider { depth }),
            NavigationItem::Header { title } => Some(RenderedNode::Header {
                depth,
                title: title.clone(),
            }),
            NavigationItem::Link(link) => self
                .render_link(link, parent_path, depth, current_path)
                .map(RenderedNode::Link),
        }
    }

    fn render_link(
        &self,
        link: &NavLink,
        parent_path: &str,
        depth: usize,
        current_path: &str,
    ) -> Option<RenderedLink> {
        if !link.visible {
            return None;
        }

        let full_path = join_path(parent_path, &link.segment);
        let has_children = !link.children.is_empty();
        let truncated = has_children && depth + 1 >= self.max_depth;
        if truncated && !self.depth_warned.replace(true) {
            tracing::warn!(
                "navigation tree deeper than {} levels under '{full_path}'; truncating",
                self.max_depth
            );
        }
        let expanded = has_children && self.expanded.contains(&link.segment);

        let mounted = expanded || self.mounted.contains(&link.segment);
        let children = (has_children && !truncated && mounted)
            .then(|| {
                link.children
                    .iter()
                    .filter_map(|child| self.render_item(child, &full_path, depth + 1, current_path))
                    .collect()
            });

        Some(RenderedLink {
            depth,
            segment: link.segment.clone(),
            active: is_active(current_path, &full_path),
            full_path,
            title: link.title.clone(),
            icon: link.icon.clone(),
            has_children,
            truncated,
            expanded,
            children,
        })
    }

    /// Click on a rendered link: groups toggle, leaves navigate.
    pub fn click(&mut self, link: &RenderedLink) -> ClickOutcome {
        if link.has_children {
            let expanded = self.expanded.toggle(&link.segment);
            if expanded {
                self.mounted.insert(link.segment.clone());
            }
            tracing::debug!("toggle group '{}' → expanded={expanded}", link.segment);
            ClickOutcome::Toggled {
                segment: link.segment.clone(),
                expanded,
            }
        } else {
            ClickOutcome::Navigate(format!("/{}", link.full_path))
        }
    }
}

/// Flatten rendered nodes into the rows currently on screen: collapsed
/// children are skipped.
pub fn visible_rows(nodes: &[RenderedNode]) -> Vec<&RenderedNode> {
    let mut rows = Vec::new();
    collect_visible(nodes, &mut rows);
    rows
}

fn collect_visible<'a>(nodes: &'a [RenderedNode], rows: &mut Vec<&'a RenderedNode>) {
    for node in nodes {
        rows.push(node);
        if let RenderedNode::Link(RenderedLink {
            expanded: true,
            children: Some(children),
            ..
        }) = node
        {
            collect_visible(children, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nav::NavLink;

    fn sample_tree() -> Vec<NavigationItem> {
        vec![
            NavLink::new("dashboard", "Dashboard").into(),
            NavLink::new("reports", "Reports")
                .children(vec![NavLink::new("monthly", "Monthly").into()])
                .into(),
        ]
    }

    fn link<'a>(rows: &[&'a RenderedNode], title: &str) -> &'a RenderedLink {
        rows.iter()
            .filter_map(|row| row.as_link())
            .find(|l| l.title == title)
            .unwrap_or_else(|| panic!("no row titled {title}"))
    }

    fn titles(rows: &[&RenderedNode]) -> Vec<String> {
        rows.iter()
            .filter_map(|row| row.as_link())
            .map(|l| l.title.clone())
            .collect()
    }

    #[test]
    fn hidden_links_never_render() {
        let tree = vec![
            NavLink::new("secret", "Secret").hidden().into(),
            NavLink::new("group", "Group")
                .children(vec![
                    NavLink::new("hidden-child", "Hidden Child").hidden().into(),
                    NavLink::new("shown", "Shown").into(),
                ])
                .into(),
        ];
        let mut nav = NavRenderer::default();
        for path in ["", "/secret", "/group/hidden-child"] {
            let nodes = nav.render(&tree, path);
            assert!(!titles(&visible_rows(&nodes)).contains(&"Secret".to_string()));
        }

        let nodes = nav.render(&tree, "");
        let group = link(&visible_rows(&nodes), "Group").clone();
        nav.click(&group);
        let nodes = nav.render(&tree, "/group/hidden-child");
        assert_eq!(titles(&visible_rows(&nodes)), vec!["Group", "Shown"]);
    }

    #[test]
    fn end_to_end_expand_then_navigate() {
        let tree = sample_tree();
        let mut nav = NavRenderer::default();
        assert!(nav.expanded().is_empty());

        let nodes = nav.render(&tree, "/dashboard");
        let rows = visible_rows(&nodes);
        assert_eq!(titles(&rows), vec!["Dashboard", "Reports"]);

        let outcome = nav.click(link(&rows, "Reports"));
        assert_eq!(
            outcome,
            ClickOutcome::Toggled {
                segment: "reports".into(),
                expanded: true
            }
        );
        assert!(nav.expanded().contains("reports"));
        assert_eq!(nav.expanded().len(), 1);

        let nodes = nav.render(&tree, "/dashboard");
        let rows = visible_rows(&nodes);
        assert_eq!(titles(&rows), vec!["Dashboard", "Reports", "Monthly"]);

        let before = nav.expanded().clone();
        let outcome = nav.click(link(&rows, "Monthly"));
        assert_eq!(outcome, ClickOutcome::Navigate("/reports/monthly".into()));
        assert_eq!(nav.expanded(), &before);
    }

    #[test]
    fn leaf_click_navigates_to_full_path() {
        let tree = sample_tree();
        let mut nav = NavRenderer::default();
        let nodes = nav.render(&tree, "");
        let outcome = nav.click(link(&visible_rows(&nodes), "Dashboard"));
        assert_eq!(outcome, ClickOutcome::Navigate("/dashboard".into()));
        assert!(nav.expanded().is_empty());
    }

    #[test]
    fn double_toggle_is_identity() {
        let tree = sample_tree();
        let mut nav = NavRenderer::default();
        let before = nav.expanded().clone();
        let nodes = nav.render(&tree, "");
        let reports = link(&visible_rows(&nodes), "Reports").clone();
        nav.click(&reports);
        nav.click(&reports);
        assert_eq!(nav.expanded(), &before);
    }

    #[test]
    fn toggle_touches_exactly_one_segment() {
        let mut set = ExpandedSet::default();
        set.toggle("a");
        set.toggle("b");
        assert!(!set.toggle("a"));
        assert_eq!(set.len(), 1);
        assert!(set.contains("b"));
    }

    #[test]
    fn active_highlight_is_substring_match() {
        let tree = vec![
            NavLink::new("reports", "Reports").into(),
            NavLink::new("reports-archive", "Archive").into(),
        ];
        let nav = NavRenderer::default();
        let nodes = nav.render(&tree, "reports/monthly");
        let rows = visible_rows(&nodes);
        assert!(link(&rows, "Reports").active);
        assert!(!link(&rows, "Archive").active);

        // The loose policy also lights up the shorter sibling here.
        let nodes = nav.render(&tree, "reports-archive/2024");
        let rows = visible_rows(&nodes);
        assert!(link(&rows, "Reports").active);
        assert!(link(&rows, "Archive").active);
    }

    #[test]
    fn parent_and_child_both_active() {
        let tree = sample_tree();
        let mut nav = NavRenderer::default();
        let nodes = nav.render(&tree, "");
        let reports = link(&visible_rows(&nodes), "Reports").clone();
        nav.click(&reports);
        let nodes = nav.render(&tree, "/reports/monthly");
        let rows = visible_rows(&nodes);
        assert!(link(&rows, "Reports").active);
        assert!(link(&rows, "Monthly").active);
        assert!(!link(&rows, "Dashboard").active);
    }

    #[test]
    fn collapsed_group_keeps_children_after_first_expand() {
        let tree = sample_tree();
        let mut nav = NavRenderer::default();

        let nodes = nav.render(&tree, "");
        let reports = link(&visible_rows(&nodes), "Reports").clone();
        assert!(reports.has_children);
        assert_eq!(reports.children, None);

        nav.click(&reports);
        nav.click(&reports);
        let nodes = nav.render(&tree, "");
        let reports = link(&visible_rows(&nodes), "Reports").clone();
        assert!(!reports.expanded);
        assert_eq!(reports.children.as_ref().map(Vec::len), Some(1));
        assert_eq!(titles(&visible_rows(&nodes)), vec!["Dashboard", "Reports"]);
    }

    #[test]
    fn dividers_and_headers_render_without_state() {
        let tree = vec![
            NavigationItem::Header {
                title: "Main".into(),
            },
            NavigationItem::Divider,
        ];
        let nav = NavRenderer::default();
        let nodes = nav.render(&tree, "");
        assert_eq!(
            nodes,
            vec![
                RenderedNode::Header {
                    depth: 0,
                    title: "Main".into()
                },
                RenderedNode::Divider { depth: 0 },
            ]
        );
    }

    #[test]
    fn depth_guard_truncates_deep_trees() {
        let mut item: NavigationItem = NavLink::new("leaf", "Leaf").into();
        for i in (0..5).rev() {
            item = NavLink::new(format!("l{i}"), format!("Level {i}"))
                .children(vec![item])
                .into();
        }
        let tree = vec![item];

        let mut nav = NavRenderer::new(3);
        for _ in 0..5 {
            let nodes = nav.render(&tree, "");
            let last = visible_rows(&nodes)
                .last()
                .and_then(|row| row.as_link())
                .cloned()
                .unwrap();
            if last.has_children && !last.expanded {
                nav.click(&last);
            }
        }
        let nodes = nav.render(&tree, "");
        let rows = visible_rows(&nodes);
        assert_eq!(titles(&rows), vec!["Level 0", "Level 1", "Level 2"]);
        assert_eq!(rows.last().map(|r| r.depth()), Some(2));
    }

    #[test]
    fn group_at_depth_limit_is_marked_truncated() {
        let tree = vec![NavLink::new("a", "A")
            .children(vec![NavLink::new("b", "B").into()])
            .into()];
        let mut nav = NavRenderer::new(1);
        let nodes = nav.render(&tree, "");
        let a = visible_rows(&nodes)[0].as_link().cloned().unwrap();
        assert!(a.has_children);
        assert!(a.truncated);

        assert!(matches!(nav.click(&a), ClickOutcome::Toggled { expanded: true, .. }));
        let nodes = nav.render(&tree, "");
        assert_eq!(visible_rows(&nodes).len(), 1);
        assert_eq!(nodes[0].as_link().and_then(|l| l.children.as_ref()), None);
    }

    #[test]
    fn join_path_at_root_and_below() {
        assert_eq!(join_path("", "reports"), "reports");
        assert_eq!(join_path("reports", "monthly"), "reports/monthly");
    }
}
