//! Navigation model — the ordered tree of sidebar items.
//!
//! The tree is owned by configuration outside the renderer: either the
//! built-in default or a JSON file passed with `--nav`.  Items are a tagged
//! union so every consumer matches exhaustively over the variants.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ───────────────────────────────────────── items ─────────────

/// One entry in the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NavigationItem {
    /// Visual separator.
    Divider,
    /// Non-interactive grouping label.
    Header { title: String },
    /// A navigable link, or a collapsible group when it has children.
    Link(NavLink),
}

/// Attributes of a [`NavigationItem::Link`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    /// Path fragment relative to the parent link.
    pub segment: String,
    pub title: String,
    /// Opaque glyph drawn before the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationItem>,
}

fn default_visible() -> bool {
    true
}

impl NavLink {
    pub fn new(segment: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            title: title.into(),
            icon: None,
            visible: true,
            children: Vec::new(),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn children(mut self, children: Vec<NavigationItem>) -> Self {
        self.children = children;
        self
    }
}

impl From<NavLink> for NavigationItem {
    fn from(link: NavLink) -> Self {
        NavigationItem::Link(link)
    }
}

/// Root-level ordered sequence of items.
pub type NavigationTree = Vec<NavigationItem>;

// ───────────────────────────────────────── source ────────────

#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("cannot read navigation file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid navigation file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the navigation tree comes from.
#[derive(Debug, Clone)]
pub enum NavSource {
    Builtin,
    File(PathBuf),
}

impl NavSource {
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        path.map_or(NavSource::Builtin, NavSource::File)
    }

    /// Load the tree.  Called at startup and again on reload.
    pub fn load(&self) -> Result<NavigationTree, NavError> {
        match self {
            NavSource::Builtin => Ok(default_tree()),
            NavSource::File(path) => load_file(path),
        }
    }
}

fn load_file(path: &Path) -> Result<NavigationTree, NavError> {
    let contents = std::fs::read_to_string(path).map_err(|source| NavError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tree = parse_tree(&contents).map_err(|source| NavError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("loaded {} root nav items from {}", tree.len(), path.display());
    Ok(tree)
}

/// Parse a JSON array of navigation items.
pub fn parse_tree(json: &str) -> Result<NavigationTree, serde_json::Error> {
    serde_json::from_str(json)
}

/// The built-in admin console navigation.
pub fn default_tree() -> NavigationTree {
    vec![
        NavLink::new("dashboard", "Dashboard").icon("◆").into(),
        NavigationItem::Header {
            title: "People".into(),
        },
        NavLink::new("employees", "Employees").icon("☺").into(),
        NavLink::new("attendance", "Attendance")
            .icon("◷")
            .children(vec![
                NavLink::new("overview", "Overview").into(),
                NavLink::new("detail", "Detail").into(),
                NavLink::new("import", "Bulk Import").hidden().into(),
            ])
            .into(),
        NavigationItem::Divider,
        NavigationItem::Header {
            title: "Insights".into(),
        },
        NavLink::new("reports", "Reports")
            .icon("▤")
            .children(vec![
                NavLink::new("monthly", "Monthly").into(),
                NavLink::new("yearly", "Yearly").into(),
            ])
            .into(),
        NavigationItem::Divider,
        NavLink::new("settings", "Settings").icon("⚙").into(),
    ]
}

/// Titles of the links along `path` (e.g. `"/reports/monthly"` →
/// `["Reports", "Monthly"]`).  Stops at the first segment with no match.
pub fn breadcrumb<'a>(tree: &'a [NavigationItem], path: &str) -> Vec<&'a str> {
    let mut titles = Vec::new();
    let mut level = tree;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let found = level.iter().find_map(|item| match item {
            NavigationItem::Link(link) if link.segment == segment => Some(link),
            _ => None,
        });
        let Some(link) = found else {
            break;
        };
        titles.push(link.title.as_str());
        level = &link.children;
    }
    titles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_items_with_defaults() {
        let json = r#"[
            {"kind": "divider"},
            {"kind": "header", "title": "Main"},
            {"kind": "link", "segment": "reports", "title": "Reports",
             "children": [{"kind": "link", "segment": "monthly", "title": "Monthly"}]},
            {"kind": "link", "segment": "secret", "title": "Secret", "visible": false}
        ]"#;
        let tree = parse_tree(json).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree[0], NavigationItem::Divider);
        let NavigationItem::Link(reports) = &tree[2] else {
            panic!("expected link");
        };
        assert!(reports.visible);
        assert_eq!(reports.icon, None);
        assert_eq!(reports.children.len(), 1);
        let NavigationItem::Link(secret) = &tree[3] else {
            panic!("expected link");
        };
        assert!(!secret.visible);
        assert!(secret.children.is_empty());
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(parse_tree(r#"[{"kind": "widget"}]"#).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = NavSource::File("/nonexistent/nav.json".into())
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/nav.json"));
    }

    #[test]
    fn loads_tree_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nav.json");
        let json = serde_json::to_string(&default_tree()).unwrap();
        std::fs::write(&path, json).unwrap();
        let tree = NavSource::File(path).load().unwrap();
        assert_eq!(tree, default_tree());
    }

    #[test]
    fn breadcrumb_follows_segments() {
        let tree = default_tree();
        assert_eq!(breadcrumb(&tree, "/reports/monthly"), vec!["Reports", "Monthly"]);
        assert_eq!(breadcrumb(&tree, "/dashboard"), vec!["Dashboard"]);
        assert!(breadcrumb(&tree, "/login").is_empty());
        assert_eq!(breadcrumb(&tree, "/reports/unknown"), vec!["Reports"]);
    }
}
