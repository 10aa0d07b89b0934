//! Session Services

mod session_controller;

pub use session_controller::SessionController;
