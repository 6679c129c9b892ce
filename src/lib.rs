pub mod analytics;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod finance;
pub mod forms;
pub mod kassa;
pub mod models;
pub mod ui;
pub mod vacation;

pub use error::{AppError, Result};
