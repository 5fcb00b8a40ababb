//! Input handling — maps key/mouse events and job results to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::config::Action;
use crate::core::auth::AuthError;
use crate::core::render::{visible_rows, ClickOutcome, RenderedNode};

use super::auth_runtime;
use super::event::AppEvent;
use super::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Dispatch any event from the main loop.
pub fn handle_event(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Key(k) => handle_key(state, k),
        AppEvent::Mouse(m) => handle_mouse(state, m),
        AppEvent::Resize => {}
        AppEvent::LogoutFinished(result) => finish_logout(state, result),
    }
}

pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Home => {
            select_edge(state, Direction::Down, 0);
            return;
        }
        KeyCode::End => {
            let last = state.visible_row_count().saturating_sub(1);
            select_edge(state, Direction::Up, last);
            return;
        }
        _ => {}
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::MoveUp => move_selection(state, Direction::Up),
        Action::MoveDown => move_selection(state, Direction::Down),
        Action::Activate => {
            let row = state.sidebar_state.selected;
            activate_row(state, row);
        }
        Action::Back => {
            if state.router.back() {
                state.status_message = None;
            }
        }
        Action::ReloadNav => reload_nav(state),
        Action::Logout => request_logout(state),
        Action::Quit => state.should_quit = true,
    }
}

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let area = state.sidebar_area;
    if !area.contains(Position::new(mouse.column, mouse.row)) {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            // The sidebar block has a one-cell border.
            let inner_top = area.y + 1;
            if mouse.row < inner_top || mouse.row >= area.bottom().saturating_sub(1) {
                return;
            }
            let row = state.sidebar_state.offset + usize::from(mouse.row - inner_top);
            let nodes = state.rendered_nav();
            let hit_link = visible_rows(&nodes).get(row).is_some_and(|r| is_link(r));
            if hit_link {
                state.sidebar_state.selected = row;
                activate_row(state, row);
            }
        }
        MouseEventKind::ScrollUp => move_selection(state, Direction::Up),
        MouseEventKind::ScrollDown => move_selection(state, Direction::Down),
        _ => {}
    }
}

// ── sidebar ─────────────────────────────────────────────────────

fn is_link(row: &RenderedNode) -> bool {
    matches!(row, RenderedNode::Link(_))
}

/// Move to the next link row in `dir`, skipping dividers and headers.
fn move_selection(state: &mut AppState, dir: Direction) {
    let nodes = state.rendered_nav();
    let rows = visible_rows(&nodes);
    let current = state.sidebar_state.selected.min(rows.len().saturating_sub(1));
    let next = match dir {
        Direction::Up => (0..current).rev().find(|&i| is_link(rows[i])),
        Direction::Down => (current + 1..rows.len()).find(|&i| is_link(rows[i])),
    };
    if let Some(i) = next {
        state.sidebar_state.selected = i;
    }
}

/// Select the first link row at or after `from` walking in `dir`.
fn select_edge(state: &mut AppState, dir: Direction, from: usize) {
    let nodes = state.rendered_nav();
    let rows = visible_rows(&nodes);
    if rows.is_empty() {
        return;
    }
    let from = from.min(rows.len() - 1);
    let found = match dir {
        Direction::Down => (from..rows.len()).find(|&i| is_link(rows[i])),
        Direction::Up => (0..=from).rev().find(|&i| is_link(rows[i])),
    };
    if let Some(i) = found {
        state.sidebar_state.selected = i;
    }
}

/// Click semantics for the row at `index`: groups toggle, leaves navigate.
pub fn activate_row(state: &mut AppState, index: usize) {
    let nodes = state.rendered_nav();
    let rows = visible_rows(&nodes);
    let Some(RenderedNode::Link(link)) = rows.get(index).copied() else {
        return;
    };
    match state.nav.click(link) {
        ClickOutcome::Toggled { .. } => {}
        ClickOutcome::Navigate(path) => {
            state.router.navigate(&path);
            state.status_message = None;
        }
    }
}

fn reload_nav(state: &mut AppState) {
    match state.nav_source.load() {
        Ok(tree) => {
            state.tree = tree;
            let rows = state.visible_row_count();
            state.sidebar_state.selected = state.sidebar_state.selected.min(rows.saturating_sub(1));
            state.status_message = Some("Navigation reloaded".into());
        }
        Err(e) => {
            tracing::error!("{e}");
            state.status_message = Some(format!("Reload failed: {e}"));
        }
    }
}

// ── logout ──────────────────────────────────────────────────────

/// Start a logout unless one is already in flight.
pub fn request_logout(state: &mut AppState) {
    if !state.logout.try_begin() {
        tracing::debug!("logout already pending; ignoring");
        return;
    }
    tracing::info!("signing out");
    state.status_message = Some("Signing out…".into());
    auth_runtime::spawn_logout(state.events.clone(), state.auth.clone());
}

fn finish_logout(state: &mut AppState, result: Result<(), AuthError>) {
    state.logout.finish();
    state.status_message = None;
    match result {
        Ok(()) => {
            // The user stays shown until the store is really empty.
            if let Err(e) = state.session.clear() {
                tracing::error!("failed to clear session: {e}");
                state.status_message = Some(format!("Sign-out incomplete: {e}"));
                return;
            }
            state.user = None;
            let login = state.config.login_path.clone();
            state.router.navigate(&login);
            tracing::info!("signed out");
        }
        Err(e) => {
            // Nothing changes for the user; they can try again.
            tracing::error!("logout failed: {e}");
        }
    }
}
