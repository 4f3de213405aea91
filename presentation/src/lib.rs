//! Presentation layer for planqa
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the HTTP surface.

pub mod cli;
pub mod http;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use http::{AppState, router, serve, status_for};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
