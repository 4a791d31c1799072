//! Type definitions for database schema objects

/// A snapshot of every table in the inspected database
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSchema {
    /// Name the graph is given, usually the database file stem
    pub name: String,
    /// Database file name, used as the default diagram title
    pub file_name: String,
    pub tables: Vec<Table>,
}

impl DatabaseSchema {
    /// Create a new, empty schema snapshot
    pub fn new(name: &str, file_name: &str) -> Self {
        Self {
            name: name.to_string(),
            file_name: file_name.to_string(),
            tables: Vec::new(),
        }
    }

    /// Add a table to the schema
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Total number of foreign keys across all tables
    pub fn foreign_key_count(&self) -> usize {
        self.tables.iter().map(|t| t.foreign_keys.len()).sum()
    }
}

/// Represents a database table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indexes: Vec<Index>,
}

impl Table {
    /// Create a new table with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Add a column to the table
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Add an index to the table
    pub fn add_index(&mut self, index: Index) {
        self.indexes.push(index);
    }

    /// Add a foreign key to the table
    pub fn add_foreign_key(&mut self, fk: ForeignKey) {
        self.foreign_keys.push(fk);
    }
}

/// Represents a database column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    /// Declared type as written in the DDL; may be empty
    pub data_type: String,
    pub primary_key: bool,
    pub default: Option<String>,
}

impl Column {
    /// Create a new column with the given name and type
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            primary_key: false,
            default: None,
        }
    }

    /// Mark the column as part of the primary key
    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Set a default value for the column
    pub fn default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }
}

/// A reference from one column of a table to another table.
///
/// The target is held by name only; it is not checked against the tables
/// of the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub column: Option<String>,
    pub ref_table: String,
    pub ref_column: Option<String>,
}

impl ForeignKey {
    pub fn new(column: Option<&str>, ref_table: &str, ref_column: Option<&str>) -> Self {
        Self {
            column: column.map(str::to_string),
            ref_table: ref_table.to_string(),
            ref_column: ref_column.map(str::to_string),
        }
    }
}

/// Represents an index
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub name: String,
    pub is_unique: bool,
    pub is_partial: bool,
}

impl Index {
    pub fn new(name: &str, is_unique: bool, is_partial: bool) -> Self {
        Self {
            name: name.to_string(),
            is_unique,
            is_partial,
        }
    }
}
