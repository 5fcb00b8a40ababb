//! Application orchestration — state, events, input handling and the logout job.

pub mod auth_runtime;
pub mod event;
pub mod handler;
pub mod state;
