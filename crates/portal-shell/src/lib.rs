//! Host shell for the banking portal.
//!
//! Owns what the remotes share:
//! - Configuration and logging
//! - The notification bus, host listener and host inbox
//! - The module registry
//! - The `portal` command-line surface over the order desk

pub mod app;
pub mod cli;
pub mod config;
pub mod error;

pub use app::Application;
pub use cli::{Command, OrderArgs};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
