//! Event plumbing.
//!
//! Terminal input and background job results share one channel so the main
//! loop has a single place to wait.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

use crate::core::auth::AuthError;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// The terminal was resized; the next draw picks up the new size.
    Resize,
    /// The in-flight logout request returned.
    LogoutFinished(Result<(), AuthError>),
}

pub type EventSender = mpsc::UnboundedSender<AppEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<AppEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Forward terminal input into `tx` from a blocking task.  Stops when the
/// receiver is dropped.
pub fn spawn_terminal_reader(tx: EventSender, poll_interval: Duration) {
    tokio::task::spawn_blocking(move || loop {
        if tx.is_closed() {
            break;
        }
        if !event::poll(poll_interval).unwrap_or(false) {
            continue;
        }
        let Ok(ev) = event::read() else {
            continue;
        };
        let app_event = match ev {
            // Windows reports both press and release.
            CtEvent::Key(k) if k.kind == KeyEventKind::Press => AppEvent::Key(k),
            CtEvent::Mouse(m) => AppEvent::Mouse(m),
            CtEvent::Resize(..) => AppEvent::Resize,
            _ => continue,
        };
        if tx.send(app_event).is_err() {
            break;
        }
    });
}
