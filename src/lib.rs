pub mod api;
pub mod error;
pub mod event;
pub mod expand;
pub mod ui;
pub mod vim;
