//! Terminal front end: the [`App`] state machine, its forms and the draw loop.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
