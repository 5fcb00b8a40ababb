//! Core logic — navigation model, tree rendering, routing, session and auth.
//!
//! Nothing in this module depends on any TUI or rendering crate, so every
//! piece can be exercised from plain unit tests.

pub mod auth;
pub mod nav;
pub mod render;
pub mod router;
pub mod session;
