//! Session storage — the signed-in user's record.
//!
//! The record lives under the `"user_data"` key in one of two key-value
//! stores: a page-lifetime store (memory, gone when the process exits) and a
//! session-lifetime store (a JSON file on disk).  Reads prefer the page store.
//! The shell only sees the [`SessionStore`] capability, so tests can swap in
//! memory-only stores.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Key under which the user record is stored.
pub const USER_DATA_KEY: &str = "user_data";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session store {path} is not a JSON object: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed user_data record: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ───────────────────────────────────────── user record ───────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: u64,
    pub user_name: String,
    pub role: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub employee_code: String,
}

impl UserData {
    /// First character of the user name, upper-cased.
    pub fn avatar_initial(&self) -> Option<char> {
        self.user_name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
    }
}

// ───────────────────────────────────────── key-value stores ──

/// String-to-string storage with the semantics of a browser storage area.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set_item(&mut self, key: &str, value: String) -> Result<(), SessionError>;
    fn clear(&mut self) -> Result<(), SessionError>;
}

/// Page-lifetime store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.items.clear();
        Ok(())
    }
}

/// Session-lifetime store backed by a JSON object on disk.  A missing file
/// is an empty store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&contents).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(items).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value);
        self.write_all(&items)
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

// ───────────────────────────────────────── session capability ─

/// What the layout shell needs from session storage.
pub trait SessionStore {
    /// The current user record, or `None` when nobody is signed in.
    fn get(&self) -> Result<Option<UserData>, SessionError>;
    /// Drop every persisted trace of the session.
    fn clear(&mut self) -> Result<(), SessionError>;
}

/// Which store a newly signed-in record goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Page,
    Session,
}

/// Page store in front of a session store.
#[derive(Debug)]
pub struct LayeredSession<P, S> {
    page: P,
    session: S,
}

impl<P: KeyValueStore, S: KeyValueStore> LayeredSession<P, S> {
    pub fn new(page: P, session: S) -> Self {
        Self { page, session }
    }

    /// Store `user` as the signed-in record.
    pub fn store(&mut self, user: &UserData, persistence: Persistence) -> Result<(), SessionError> {
        let json = serde_json::to_string(user)?;
        match persistence {
            Persistence::Page => self.page.set_item(USER_DATA_KEY, json),
            Persistence::Session => self.session.set_item(USER_DATA_KEY, json),
        }
    }
}

impl<P: KeyValueStore, S: KeyValueStore> SessionStore for LayeredSession<P, S> {
    fn get(&self) -> Result<Option<UserData>, SessionError> {
        let raw = match self.page.get_item(USER_DATA_KEY)? {
            Some(raw) => Some(raw),
            None => self.session.get_item(USER_DATA_KEY)?,
        };
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.page.clear()?;
        self.session.clear()
    }
}

/// Default location of the session file (`$XDG_STATE_HOME/navdeck/session.json`).
pub fn default_session_path() -> PathBuf {
    state_dir().join("session.json")
}

/// `$XDG_STATE_HOME/navdeck`, falling back to `~/.local/state/navdeck`.
pub fn state_dir() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".local").join("state")
        })
        .join("navdeck")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserData {
        UserData {
            user_id: 7,
            user_name: "alice".into(),
            role: "Admin".into(),
            is_active: true,
            is_staff: true,
            is_superuser: false,
            employee_code: "E-007".into(),
        }
    }

    fn bob() -> UserData {
        UserData {
            user_id: 8,
            user_name: "Bob".into(),
            role: "Viewer".into(),
            ..alice()
        }
    }

    #[test]
    fn avatar_initial_is_uppercased() {
        assert_eq!(alice().avatar_initial(), Some('A'));
        let nameless = UserData {
            user_name: String::new(),
            ..alice()
        };
        assert_eq!(nameless.avatar_initial(), None);
    }

    #[test]
    fn empty_stores_mean_signed_out() {
        let session = LayeredSession::new(MemoryStore::default(), MemoryStore::default());
        assert_eq!(session.get().unwrap(), None);
    }

    #[test]
    fn page_store_wins_over_session_store() {
        let mut session = LayeredSession::new(MemoryStore::default(), MemoryStore::default());
        session.store(&bob(), Persistence::Session).unwrap();
        assert_eq!(session.get().unwrap(), Some(bob()));
        session.store(&alice(), Persistence::Page).unwrap();
        assert_eq!(session.get().unwrap(), Some(alice()));
    }

    #[test]
    fn clear_empties_both_stores() {
        let dir = tempfile::tempdir().unwrap();
        let file = FileStore::new(dir.path().join("state").join("session.json"));
        let mut session = LayeredSession::new(MemoryStore::default(), file.clone());
        session.store(&alice(), Persistence::Page).unwrap();
        session.store(&bob(), Persistence::Session).unwrap();
        assert!(file.path().exists());

        session.clear().unwrap();
        assert_eq!(session.get().unwrap(), None);
        assert!(!file.path().exists());
        // Clearing twice is fine.
        session.clear().unwrap();
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = LayeredSession::new(MemoryStore::default(), FileStore::new(&path));
        session.store(&alice(), Persistence::Session).unwrap();

        let reopened = LayeredSession::new(MemoryStore::default(), FileStore::new(&path));
        assert_eq!(reopened.get().unwrap(), Some(alice()));
    }

    #[test]
    fn malformed_record_is_an_error() {
        let mut page = MemoryStore::default();
        page.set_item(USER_DATA_KEY, r#"{"user_name": 12}"#.into())
            .unwrap();
        let session = LayeredSession::new(page, MemoryStore::default());
        assert!(matches!(session.get(), Err(SessionError::Malformed(_))));
    }

    #[test]
    fn corrupt_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        let err = FileStore::new(&path).get_item(USER_DATA_KEY).unwrap_err();
        assert!(matches!(err, SessionError::Corrupt { .. }));
        assert!(err.to_string().contains("session.json"));
    }
}
