pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod format;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod types;
pub mod views;

pub use app::router;
pub use error::ConsoleError;
pub use state::AppState;
