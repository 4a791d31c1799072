//! Database schema analyzer
//!
//! This module reads the structure of an existing SQLite database. Metadata
//! for every table is fetched concurrently: columns, foreign keys and indexes
//! of one table are independent queries, and so are the tables themselves.

use async_trait::async_trait;
use futures::future::try_join_all;
use sqlx::{FromRow, SqlitePool};

use crate::config::RenderOptions;
use crate::db::connection::DatabaseConnection;
use crate::error::{Error, Result};
use crate::schema::types::{Column, DatabaseSchema, ForeignKey, Index, Table};

/// Source of structural metadata, one query per kind and table
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Names of all user tables, in catalog order
    async fn table_names(&self) -> Result<Vec<String>>;

    /// Columns of `table`, in declaration order
    async fn columns(&self, table: &str) -> Result<Vec<Column>>;

    /// Outgoing foreign keys of `table`
    async fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>>;

    /// Indexes defined on `table`
    async fn indexes(&self, table: &str) -> Result<Vec<Index>>;
}

/// Fetch every table the source knows about.
///
/// The returned tables are in the order of [`MetadataSource::table_names`],
/// regardless of which per-table fetch finishes first. The first failing
/// query aborts the whole fetch.
pub async fn fetch_tables<S>(source: &S, options: &RenderOptions) -> Result<Vec<Table>>
where
    S: MetadataSource + ?Sized,
{
    let names = source.table_names().await?;
    tracing::debug!(count = names.len(), "Fetching table metadata");

    try_join_all(names.iter().map(|name| fetch_table(source, name, options))).await
}

async fn fetch_table<S>(source: &S, name: &str, options: &RenderOptions) -> Result<Table>
where
    S: MetadataSource + ?Sized,
{
    let indexes = async {
        if options.skip_index {
            Ok(Vec::new())
        } else {
            source.indexes(name).await
        }
    };

    let (columns, foreign_keys, indexes) =
        futures::try_join!(source.columns(name), source.foreign_keys(name), indexes)?;

    tracing::debug!(
        table = name,
        columns = columns.len(),
        foreign_keys = foreign_keys.len(),
        indexes = indexes.len(),
        "Fetched table"
    );

    Ok(Table {
        name: name.to_string(),
        columns,
        foreign_keys,
        indexes,
    })
}

/// Schema analyzer for database schema introspection
pub struct SchemaAnalyzer {
    connection: DatabaseConnection,
}

impl SchemaAnalyzer {
    /// Create a new schema analyzer
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Take a snapshot of the current database schema
    pub async fn analyze(&self, options: &RenderOptions) -> Result<DatabaseSchema> {
        let source = SqliteSource::new(self.connection.pool());
        let tables = fetch_tables(&source, options).await?;

        let mut schema = DatabaseSchema::new(
            &self.connection.display_name(),
            &self.connection.file_name(),
        );
        schema.tables = tables;

        tracing::info!(
            database = %schema.name,
            tables = schema.tables.len(),
            foreign_keys = schema.foreign_key_count(),
            "Analyzed database schema"
        );

        Ok(schema)
    }
}

#[derive(FromRow)]
struct TableRow {
    table_name: String,
}

#[derive(FromRow)]
struct ColumnRow {
    name: String,
    data_type: Option<String>,
    pk: i64,
    dflt_value: Option<String>,
}

#[derive(FromRow)]
struct ForeignKeyRow {
    column_name: Option<String>,
    ref_table: String,
    ref_column: Option<String>,
}

#[derive(FromRow)]
struct IndexRow {
    name: String,
    is_unique: i64,
    is_partial: i64,
}

/// Metadata source backed by SQLite's catalog and pragma functions
pub struct SqliteSource<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SqliteSource<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<'a> MetadataSource for SqliteSource<'a> {
    async fn table_names(&self) -> Result<Vec<String>> {
        let sql = r#"
            SELECT name AS table_name
            FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite\_%' ESCAPE '\'
        "#;

        let rows = sqlx::query_as::<_, TableRow>(sql)
            .fetch_all(self.pool)
            .await
            .map_err(|e| Error::metadata(None, e))?;

        Ok(rows.into_iter().map(|row| row.table_name).collect())
    }

    async fn columns(&self, table: &str) -> Result<Vec<Column>> {
        let sql = r#"
            SELECT name, type AS data_type, pk, dflt_value
            FROM pragma_table_info(?1)
            ORDER BY cid
        "#;

        let rows = sqlx::query_as::<_, ColumnRow>(sql)
            .bind(table)
            .fetch_all(self.pool)
            .await
            .map_err(|e| Error::metadata(Some(table), e))?;

        Ok(rows
            .into_iter()
            .map(|row| Column {
                name: row.name,
                data_type: row.data_type.unwrap_or_default(),
                primary_key: row.pk > 0,
                default: row.dflt_value,
            })
            .collect())
    }

    async fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
        let sql = r#"
            SELECT "from" AS column_name, "table" AS ref_table, "to" AS ref_column
            FROM pragma_foreign_key_list(?1)
        "#;

        let rows = sqlx::query_as::<_, ForeignKeyRow>(sql)
            .bind(table)
            .fetch_all(self.pool)
            .await
            .map_err(|e| Error::metadata(Some(table), e))?;

        Ok(rows
            .into_iter()
            .map(|row| ForeignKey {
                column: row.column_name,
                ref_table: row.ref_table,
                ref_column: row.ref_column,
            })
            .collect())
    }

    async fn indexes(&self, table: &str) -> Result<Vec<Index>> {
        let sql = r#"
            SELECT name, "unique" AS is_unique, partial AS is_partial
            FROM pragma_index_list(?1)
        "#;

        let rows = sqlx::query_as::<_, IndexRow>(sql)
            .bind(table)
            .fetch_all(self.pool)
            .await
            .map_err(|e| Error::metadata(Some(table), e))?;

        Ok(rows
            .into_iter()
            .map(|row| Index {
                name: row.name,
                is_unique: row.is_unique != 0,
                is_partial: row.is_partial != 0,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory source; earlier tables answer more slowly so that
    /// completion order is the reverse of listing order.
    struct StaticSource {
        tables: Vec<Table>,
        index_queries: AtomicUsize,
        failing_table: Option<&'static str>,
    }

    impl StaticSource {
        fn new(tables: Vec<Table>) -> Self {
            Self {
                tables,
                index_queries: AtomicUsize::new(0),
                failing_table: None,
            }
        }

        async fn lookup(&self, name: &str) -> Result<&Table> {
            let position = self.tables.iter().position(|t| t.name == name);
            let delay = self.tables.len() - position.unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(5 * delay as u64)).await;

            if self.failing_table == Some(name) {
                return Err(Error::metadata(Some(name), "no such table"));
            }
            position
                .map(|i| &self.tables[i])
                .ok_or_else(|| Error::metadata(Some(name), "no such table"))
        }
    }

    #[async_trait]
    impl MetadataSource for StaticSource {
        async fn table_names(&self) -> Result<Vec<String>> {
            Ok(self.tables.iter().map(|t| t.name.clone()).collect())
        }

        async fn columns(&self, table: &str) -> Result<Vec<Column>> {
            Ok(self.lookup(table).await?.columns.clone())
        }

        async fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
            Ok(self.lookup(table).await?.foreign_keys.clone())
        }

        async fn indexes(&self, table: &str) -> Result<Vec<Index>> {
            self.index_queries.fetch_add(1, Ordering::SeqCst);
            Ok(self.lookup(table).await?.indexes.clone())
        }
    }

    fn sample_tables() -> Vec<Table> {
        let mut users = Table::new("users");
        users.add_column(Column::new("id", "INTEGER").primary_key(true));
        users.add_column(Column::new("email", "TEXT"));
        users.add_index(Index::new("users_email", true, false));

        let mut orders = Table::new("orders");
        orders.add_column(Column::new("id", "INTEGER").primary_key(true));
        orders.add_column(Column::new("user_id", "INTEGER"));
        orders.add_foreign_key(ForeignKey::new(Some("user_id"), "users", Some("id")));

        let mut items = Table::new("items");
        items.add_column(Column::new("sku", "TEXT").default("'none'"));

        vec![users, orders, items]
    }

    #[tokio::test]
    async fn keeps_listing_order_regardless_of_completion_order() {
        let source = StaticSource::new(sample_tables());

        let tables = fetch_tables(&source, &RenderOptions::default())
            .await
            .unwrap();

        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["users", "orders", "items"]);
        assert_eq!(tables, sample_tables());
    }

    #[tokio::test]
    async fn skip_index_issues_no_index_queries() {
        let source = StaticSource::new(sample_tables());
        let options = RenderOptions {
            skip_index: true,
            ..Default::default()
        };

        let tables = fetch_tables(&source, &options).await.unwrap();

        assert_eq!(source.index_queries.load(Ordering::SeqCst), 0);
        assert!(tables.iter().all(|t| t.indexes.is_empty()));
        assert_eq!(tables[1].foreign_keys.len(), 1);
    }

    #[tokio::test]
    async fn queries_indexes_once_per_table() {
        let source = StaticSource::new(sample_tables());

        fetch_tables(&source, &RenderOptions::default())
            .await
            .unwrap();

        assert_eq!(source.index_queries.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn any_failure_aborts_the_fetch() {
        let mut source = StaticSource::new(sample_tables());
        source.failing_table = Some("orders");

        let err = fetch_tables(&source, &RenderOptions::default())
            .await
            .unwrap_err();

        match err {
            Error::MetadataFetchError { table, .. } => assert_eq!(table.as_deref(), Some("orders")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_database_has_no_tables() {
        let source = StaticSource::new(Vec::new());

        let tables = fetch_tables(&source, &RenderOptions::default())
            .await
            .unwrap();

        assert!(tables.is_empty());
    }
}
