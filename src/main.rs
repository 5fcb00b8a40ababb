//! A terminal admin console.
//!
//! Run the binary to open the console: a collapsible navigation sidebar, a
//! header with the signed-in user, and a content pane for the current route.
//! Run with `--dump` to print the sidebar as text and exit.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::app::{
    event::{self, EventReceiver},
    handler,
    state::AppState,
};
use crate::core::{
    auth::HttpAuthenticator,
    nav::{NavSource, NavigationItem},
    render::{visible_rows, NavRenderer, RenderedNode},
    router::Router,
    session::{self, FileStore, LayeredSession, MemoryStore, Persistence, UserData},
};
use crate::ui::{
    content::ContentPane, header::HeaderBar, layout::AppLayout, sidebar, sidebar::SidebarWidget,
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Terminal admin console")]
struct Cli {
    /// Navigation tree as a JSON file (defaults to the built-in tree).
    #[arg(long)]
    nav: Option<PathBuf>,

    /// Session store file (defaults to `$XDG_STATE_HOME/navdeck/session.json`).
    #[arg(long)]
    session: Option<PathBuf>,

    /// Sign in with a `user_data` JSON record (kept for this run only).
    #[arg(long)]
    user: Option<PathBuf>,

    /// Keep the `--user` record in the session file across runs.
    #[arg(long, requires = "user")]
    remember: bool,

    /// Route to open.
    #[arg(long, default_value = "/dashboard")]
    path: String,

    /// Admin API base URL (overrides the config file).
    #[arg(long)]
    api: Option<String>,

    /// Write logs to this file.  The console defaults to
    /// `$XDG_STATE_HOME/navdeck/navdeck.log`; `--dump` and `--init-config`
    /// log to stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the current configuration (defaults filled in) and exit.
    #[arg(long = "init-config")]
    init_config: bool,

    /// Print the sidebar as text and exit.
    #[arg(long)]
    dump: bool,

    /// Group segment to expand before dumping (repeatable).
    #[arg(long = "expand", requires = "dump")]
    expand: Vec<String>,
}

/// Where log output goes for this run.
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// The console draws on stderr, so an interactive run never logs there.
fn log_target(log_file: Option<&Path>, interactive: bool) -> LogTarget {
    match log_file {
        Some(path) => LogTarget::File(path.to_path_buf()),
        None if interactive => LogTarget::File(session::state_dir().join("navdeck.log")),
        None => LogTarget::Stderr,
    }
}

fn init_tracing(target: &LogTarget) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match target {
        LogTarget::File(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("cannot create log directory {}", dir.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── dump mode ─────────

/// Expand the named group segments, outermost first.
fn expand_segments(nav: &mut NavRenderer, tree: &[NavigationItem], path: &str, segments: &[String]) {
    for segment in segments {
        let nodes = nav.render(tree, path);
        let group = visible_rows(&nodes)
            .into_iter()
            .filter_map(RenderedNode::as_link)
            .find(|l| &l.segment == segment && l.has_children && !l.expanded)
            .cloned();
        match group {
            Some(link) => {
                nav.click(&link);
            }
            None => tracing::warn!("--expand {segment}: no visible collapsed group"),
        }
    }
}

fn dump(tree: &[NavigationItem], router: &Router, max_depth: usize, expand: &[String]) -> Result<()> {
    let mut nav = NavRenderer::new(max_depth);
    expand_segments(&mut nav, tree, router.current(), expand);
    let nodes = nav.render(tree, router.current());

    let mut out = io::stdout().lock();
    for row in visible_rows(&nodes) {
        let marker = match row {
            RenderedNode::Link(link) if link.active => "  *",
            _ => "",
        };
        writeln!(out, "{}{marker}", sidebar::row_text(row, 24))?;
    }
    Ok(())
}

// ───────────────────────────────────────── drawing ───────────

fn draw(frame: &mut Frame, state: &mut AppState) {
    let layout = AppLayout::from_area(frame.area());
    state.sidebar_area = layout.sidebar_area;

    frame.render_widget(
        HeaderBar {
            title: env!("CARGO_PKG_NAME"),
            user: state.user.as_ref(),
            signing_out: state.logout.is_pending(),
        },
        layout.header_area,
    );

    let nodes = state.rendered_nav();
    let rows = visible_rows(&nodes);
    let sidebar_block = Block::default()
        .title(" Navigation ")
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    frame.render_stateful_widget(
        SidebarWidget::new(&rows).block(sidebar_block),
        layout.sidebar_area,
        &mut state.sidebar_state,
    );

    let content_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    frame.render_widget(
        ContentPane {
            tree: &state.tree,
            path: state.router.current(),
            login_path: &state.config.login_path,
            block: Some(content_block),
        },
        layout.content_area,
    );

    let hint = state.config.status_bar_hint();
    let status_text = state.status_message.as_deref().unwrap_or(&hint);
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
    events: &mut EventReceiver,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, state))?;

        let Some(event) = events.recv().await else {
            break;
        };
        handler::handle_event(state, event);

        // Drain everything already queued before redrawing.
        while let Ok(event) = events.try_recv() {
            handler::handle_event(state, event);
        }

        if state.should_quit {
            break;
        }
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = !cli.dump && !cli.init_config;
    init_tracing(&log_target(cli.log_file.as_deref(), interactive))?;

    let mut config = config::AppConfig::load();
    if let Some(api) = cli.api {
        config.api_base_url = api;
    }

    if cli.init_config {
        config.save()?;
        println!("{}", config::config_path().display());
        return Ok(());
    }

    let nav_source = NavSource::from_arg(cli.nav);
    let tree = nav_source.load()?;
    let router = Router::new(&cli.path);

    // ── dump mode ─────────────────────────────────────────────
    if cli.dump {
        return dump(&tree, &router, config.max_nav_depth, &cli.expand);
    }

    // ── collaborators ─────────────────────────────────────────
    let session_path = cli.session.unwrap_or_else(session::default_session_path);
    let file_store = FileStore::new(session_path);
    tracing::debug!("session file {}", file_store.path().display());
    let mut session = LayeredSession::new(MemoryStore::default(), file_store);
    if let Some(path) = cli.user {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read user record {}", path.display()))?;
        let user: UserData = serde_json::from_str(&raw)
            .with_context(|| format!("invalid user record {}", path.display()))?;
        let persistence = if cli.remember {
            Persistence::Session
        } else {
            Persistence::Page
        };
        session.store(&user, persistence)?;
    }
    let auth = Arc::new(HttpAuthenticator::new(&config.api_base_url));

    let (tx, mut rx) = event::channel();
    let mut state = AppState::new(
        tree,
        nav_source,
        router,
        Box::new(session),
        auth,
        tx.clone(),
        config,
    );

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    event::spawn_terminal_reader(tx, Duration::from_millis(100));
    let result = run(&mut terminal, &mut state, &mut rx).await;

    // ── teardown ──────────────────────────────────────────────
    // Dropping the receiver stops the terminal reader.
    drop(rx);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_never_logs_to_stderr() {
        match log_target(None, true) {
            LogTarget::File(path) => assert!(path.ends_with("navdeck/navdeck.log")),
            LogTarget::Stderr => panic!("interactive run logging to stderr"),
        }
        assert_eq!(
            log_target(Some(Path::new("/tmp/nd.log")), true),
            LogTarget::File(PathBuf::from("/tmp/nd.log"))
        );
    }

    #[test]
    fn one_shot_modes_log_to_stderr_unless_told_otherwise() {
        assert_eq!(log_target(None, false), LogTarget::Stderr);
        assert_eq!(
            log_target(Some(Path::new("out.log")), false),
            LogTarget::File(PathBuf::from("out.log"))
        );
    }
}
