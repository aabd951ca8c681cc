//! Terminal admin console for a bookstore catalog served over HTTP.
//!
//! The crate is split in layers: `api` talks to the server, `view` holds the
//! page controllers as plain state machines, `dispatch` runs their requests
//! off the UI thread and `ui` renders everything with Ratatui.
pub mod api;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod models;
pub mod ui;
pub mod view;

/// Client and the trait the pages are driven through.
pub use api::{ApiClient, ApiError, Catalog};

pub use config::AppConfig;
pub use dispatch::Dispatcher;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
