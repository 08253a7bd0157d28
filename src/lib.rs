pub mod admin;
pub mod api;
pub mod app;
pub mod auth;
pub mod chat;
pub mod cli;
pub mod constants;
pub mod gesture;
pub mod runtime;
pub mod session;
pub mod shop;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use gesture::{GestureEvent, GestureTranslator, Navigation, SwipeDirection};
pub use session::SessionStore;
pub use tui::run_ui;
pub use utils::MessengerError;
