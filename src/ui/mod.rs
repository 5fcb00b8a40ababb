//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No storage or network I/O happens here.

pub mod content;
pub mod header;
pub mod layout;
pub mod sidebar;
pub mod theme;
