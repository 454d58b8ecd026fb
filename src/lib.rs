pub mod app;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod emoji;
pub mod handler;
pub mod history;
pub mod state;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use app::{Action, App, Effect};
pub use client::ChatClient;
pub use config::Config;
pub use history::{HistoryStore, Transcript, MAX_TURNS};
pub use state::{ChatTurn, Origin};
