//! Schema module for sqleton
//!
//! This module holds the schema snapshot types and the analyzer that reads
//! them from the database.

pub mod analyzer;
pub mod types;

// Re-export key types
pub use analyzer::{fetch_tables, MetadataSource, SchemaAnalyzer, SqliteSource};
pub use types::{Column, DatabaseSchema, ForeignKey, Index, Table};
