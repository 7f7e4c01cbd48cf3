//! Shelfbot — chat-driven inventory server, library crate.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `sb-e2e-tests`) can access internal types like `AppState`,
//! `build_router`, and `IntentEnricher`.

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod enrich;
pub mod error;
pub mod routes;
pub mod state;
