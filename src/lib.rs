//! Library root for hostmgmt
pub mod models;
pub mod util;
pub mod error;
pub mod logging;
pub mod validation;

pub mod bootstrap;
pub mod config;
pub mod messages;
pub mod repository;
pub mod controller;
pub mod tui;
pub mod commands;

// Convenience re-exports
pub use controller::{HostManagement, IndexPage, SaveRequest};
pub use error::{Error, Result};
