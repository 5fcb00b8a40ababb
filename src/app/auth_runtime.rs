//! Background logout job so the UI thread never blocks on the network.

use std::sync::Arc;

use crate::core::auth::Authenticator;

use super::event::{AppEvent, EventSender};

/// Run `auth.logout()` on its own thread and report through `tx`.  The
/// request is never cancelled; quitting simply drops the result.
pub fn spawn_logout(tx: EventSender, auth: Arc<dyn Authenticator>) {
    std::thread::spawn(move || {
        let result = auth.logout();
        let _ = tx.send(AppEvent::LogoutFinished(result));
    });
}
