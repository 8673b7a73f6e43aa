// src/api/handlers/mod.rs
mod assets;
mod health;
pub mod page;
mod session;

pub use assets::static_file_handler;
pub use health::health_check;
pub use page::{SESSION_COOKIE, edit_field, index, reset, submit};
pub use session::get_session;
