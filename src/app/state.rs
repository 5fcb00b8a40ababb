//! Central application state.
//!
//! All mutable state lives here so that rendering is a pure function over
//! `&AppState` and event handling is a function over `&mut AppState`.

use std::sync::Arc;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{
    auth::{Authenticator, LogoutGuard},
    nav::{NavSource, NavigationTree},
    render::{visible_rows, NavRenderer, RenderedNode},
    router::Router,
    session::{SessionStore, UserData},
};
use crate::ui::sidebar::SidebarState;

use super::event::EventSender;

/// Top-level application state.
pub struct AppState {
    /// The navigation tree as last loaded.
    pub tree: NavigationTree,
    pub nav_source: NavSource,
    /// Expand/collapse state of the sidebar.
    pub nav: NavRenderer,
    /// Widget-level state (selection, scroll).
    pub sidebar_state: SidebarState,
    pub router: Router,
    pub session: Box<dyn SessionStore>,
    /// User record shown in the header.  Refreshed from `session` at
    /// startup and after logout.
    pub user: Option<UserData>,
    pub auth: Arc<dyn Authenticator>,
    pub logout: LogoutGuard,
    /// Where background jobs report back.
    pub events: EventSender,
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Sidebar area from the last draw, for mouse hit-testing.
    pub sidebar_area: Rect,
}

impl AppState {
    pub fn new(
        tree: NavigationTree,
        nav_source: NavSource,
        router: Router,
        session: Box<dyn SessionStore>,
        auth: Arc<dyn Authenticator>,
        events: EventSender,
        config: AppConfig,
    ) -> Self {
        let mut state = Self {
            tree,
            nav_source,
            nav: NavRenderer::new(config.max_nav_depth),
            sidebar_state: SidebarState::default(),
            router,
            session,
            user: None,
            auth,
            logout: LogoutGuard::default(),
            events,
            config,
            should_quit: false,
            status_message: None,
            sidebar_area: Rect::default(),
        };
        state.refresh_user();
        state.sidebar_state.selected = visible_rows(&state.rendered_nav())
            .iter()
            .position(|row| row.as_link().is_some())
            .unwrap_or(0);
        state
    }

    /// Re-read the user record from the session store.  A malformed record
    /// is logged and treated as signed out.
    pub fn refresh_user(&mut self) {
        self.user = match self.session.get() {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("ignoring session record: {e}");
                None
            }
        };
    }

    /// Render the sidebar against the current route.
    pub fn rendered_nav(&self) -> Vec<RenderedNode> {
        self.nav.render(&self.tree, self.router.current())
    }

    /// Number of rows currently visible in the sidebar.
    pub fn visible_row_count(&self) -> usize {
        visible_rows(&self.rendered_nav()).len()
    }
}
