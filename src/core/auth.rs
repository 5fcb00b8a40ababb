//! Logout, the one call the console makes to the backend.
//!
//! The call is opaque: it either succeeds or fails.  [`LogoutGuard`] keeps a
//! second trigger from issuing a second request while one is in flight.

use ureq::Agent;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("logout rejected with HTTP {0}")]
    Status(u16),
    #[error("logout request failed: {0}")]
    Transport(String),
}

impl From<ureq::Error> for AuthError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => AuthError::Status(code),
            other => AuthError::Transport(other.to_string()),
        }
    }
}

/// Backend capability used by the shell.  Implementations block; the shell
/// runs them off the UI thread.
pub trait Authenticator: Send + Sync {
    fn logout(&self) -> Result<(), AuthError>;
}

/// `POST {api_base_url}/logout/`.
pub struct HttpAuthenticator {
    agent: Agent,
    logout_url: String,
}

impl HttpAuthenticator {
    pub fn new(api_base_url: &str) -> Self {
        // No client-side timeout: a logout runs until the backend answers.
        let agent = Agent::config_builder().build().into();
        Self {
            agent,
            logout_url: logout_url(api_base_url),
        }
    }
}

impl Authenticator for HttpAuthenticator {
    fn logout(&self) -> Result<(), AuthError> {
        tracing::debug!("POST {}", self.logout_url);
        self.agent.post(self.logout_url.as_str()).send_empty()?;
        Ok(())
    }
}

fn logout_url(api_base_url: &str) -> String {
    format!("{}/logout/", api_base_url.trim_end_matches('/'))
}

// ───────────────────────────────────────── in-flight guard ───

/// Tracks whether a logout request is pending.
#[derive(Debug, Default)]
pub struct LogoutGuard {
    pending: bool,
}

impl LogoutGuard {
    /// Claim the guard.  Returns `false` if a logout is already pending.
    pub fn try_begin(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn finish(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
