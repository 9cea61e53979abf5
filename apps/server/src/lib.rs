pub mod api;
pub mod auth;
pub mod config;
pub mod error;
mod main_lib;

pub use main_lib::{assemble_state, build_state, init_tracing, AppState};
