//! sqleton: visualize SQLite database schemas with Graphviz
//!
//! sqleton reads the tables, columns, foreign keys and indexes of a SQLite
//! database and writes them as a DOT digraph: one record-shaped node per
//! table and one edge per foreign key. The document can be printed, saved, or
//! piped through a Graphviz layout command to produce an image.

pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod output;
pub mod schema;
pub mod utils;


use std::io::Write;
use std::path::Path;

// Re-export main types for easier access
pub use config::{Config, Direction, Layout, RenderConfig, RenderOptions};
pub use db::connection::DatabaseConnection;
pub use error::{Error, Result};
pub use graph::write_digraph;
pub use output::{OutputTarget, Sink};
pub use schema::analyzer::SchemaAnalyzer;
pub use schema::types::DatabaseSchema;

/// Render the database at `db_file` to `out` (stdout when `None`).
///
/// `overrides` are layered over the `[render]` section of `config` and
/// validated before the database is opened or any output is created.
pub async fn run(
    db_file: impl AsRef<Path>,
    config: &Config,
    overrides: RenderConfig,
    out: Option<&Path>,
) -> Result<RenderSummary> {
    let options = RenderOptions::try_from(config.render.clone().merge(overrides))?;
    let target = OutputTarget::from_path(out);

    let sqleton = Sqleton::connect(db_file, config, options).await?;
    let result = sqleton.render_to(&target).await;
    sqleton.close().await;

    result
}

/// Counts of what ended up in a rendered document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub tables: usize,
    pub edges: usize,
}

/// Renders one database with one set of options
pub struct Sqleton {
    connection: DatabaseConnection,
    options: RenderOptions,
}

impl Sqleton {
    /// Open the database at `path` read-only
    pub async fn connect(
        path: impl AsRef<Path>,
        config: &Config,
        options: RenderOptions,
    ) -> Result<Self> {
        let connection = DatabaseConnection::connect(path, &config.database).await?;
        Ok(Self {
            connection,
            options,
        })
    }

    /// Take a snapshot of the database schema
    pub async fn analyze(&self) -> Result<DatabaseSchema> {
        SchemaAnalyzer::new(self.connection.clone())
            .analyze(&self.options)
            .await
    }

    /// Write the DOT document for an already fetched schema
    pub fn write<W: Write + ?Sized>(&self, schema: &DatabaseSchema, out: &mut W) -> Result<()> {
        write_digraph(out, schema, &self.options)
    }

    /// Fetch the schema and deliver the document to `target`.
    ///
    /// The target is opened only after the whole schema has been fetched, so a
    /// failed fetch never leaves a partial output behind.
    pub async fn render_to(&self, target: &OutputTarget) -> Result<RenderSummary> {
        let schema = self.analyze().await?;

        let mut sink = target.open(self.options.layout)?;
        if let Err(e) = self.write(&schema, &mut sink) {
            return Err(sink.abort(e));
        }
        sink.finish()?;

        let summary = RenderSummary {
            tables: schema.tables.len(),
            edges: schema.foreign_key_count(),
        };
        tracing::info!(tables = summary.tables, edges = summary.edges, "Rendered schema");

        Ok(summary)
    }

    /// Release the database connection
    pub async fn close(self) {
        self.connection.close().await;
    }
}
