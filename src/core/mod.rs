//! Core application layer
//!
//! This module provides shared infrastructure including:
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{ErrorResponse, LiftlogError, Result};
pub use logging::Logger;
