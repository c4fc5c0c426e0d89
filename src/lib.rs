pub mod api;
pub mod config;
pub mod driver;
pub mod error;
pub mod format;
pub mod logging;
pub mod models;
pub mod notify;
pub mod validation;
