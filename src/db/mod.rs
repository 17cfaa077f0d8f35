//! Database module
//!
//! This module provides database management functionality including:
//! - SQLite connection pool management
//! - Repository pattern implementations
//! - Versioned schema migrations
//! - Data models

pub mod manager;
pub mod migrations;
pub mod models;
pub mod repository;

pub use manager::DatabaseManager;
pub use models::{User, Workout};
pub use repository::{Repository, UserRepository, WorkoutRepository};
