/// CAFM Desk - terminal client for facility service requests.
///
/// Core library providing the CAFM API client, the service-request
/// wizard draft state, and the ratatui TUI shell.

pub mod api;
pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
