//! Database module for sqleton
//!
//! This module handles the connection to the inspected database.

pub mod connection;

// Re-export key types
pub use connection::DatabaseConnection;
