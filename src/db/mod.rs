mod postgres;
mod sqlite;

use anyhow::Result;

use crate::schema::ColumnSpec;
use crate::seed::Employee;

pub use self::postgres::Postgres;
pub use self::sqlite::Sqlite;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    Postgres,
    Sqlite,
}

impl DatabaseType {
    /// Pick a backend from the connection string. Anything that is not an
    /// explicit `sqlite:` target is handed to the PostgreSQL client, which
    /// accepts both URLs and libpq key/value strings.
    pub fn detect(connection_string: &str) -> DatabaseType {
        if sqlite_target(connection_string).is_some() {
            DatabaseType::Sqlite
        } else {
            DatabaseType::Postgres
        }
    }
}

/// `sqlite:///var/db/hr.db` -> `/var/db/hr.db`, `sqlite::memory:` -> `:memory:`.
pub fn sqlite_target(connection_string: &str) -> Option<&str> {
    let s = connection_string.trim();
    s.strip_prefix("sqlite://").or_else(|| s.strip_prefix("sqlite:"))
}

/// Quote an identifier for interpolation into DDL/DML text.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub trait DBBehavior {
    /// Cheap round trip proving the server is reachable.
    fn ping(&mut self) -> Result<()>;
    fn table_exists(&mut self, table: &str) -> Result<bool>;
    fn create_table(&mut self, table: &str, columns: &[ColumnSpec]) -> Result<()>;
    fn insert_employee(&mut self, table: &str, employee: &Employee) -> Result<()>;
    fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>>;
    fn count_rows(&mut self, table: &str) -> Result<i64>;
}

/// An open connection to one of the supported backends.
pub enum DB {
    Postgres(Postgres),
    Sqlite(Sqlite),
}

impl DB {
    pub fn database_type(&self) -> DatabaseType {
        match self {
            DB::Postgres(_) => DatabaseType::Postgres,
            DB::Sqlite(_) => DatabaseType::Sqlite,
        }
    }
}

impl DBBehavior for DB {
    fn ping(&mut self) -> Result<()> {
        match self {
            DB::Postgres(db) => db.ping(),
            DB::Sqlite(db) => db.ping(),
        }
    }
    fn table_exists(&mut self, table: &str) -> Result<bool> {
        match self {
            DB::Postgres(db) => db.table_exists(table),
            DB::Sqlite(db) => db.table_exists(table),
        }
    }
    fn create_table(&mut self, table: &str, columns: &[ColumnSpec]) -> Result<()> {
        match self {
            DB::Postgres(db) => db.create_table(table, columns),
            DB::Sqlite(db) => db.create_table(table, columns),
        }
    }
    fn insert_employee(&mut self, table: &str, employee: &Employee) -> Result<()> {
        match self {
            DB::Postgres(db) => db.insert_employee(table, employee),
            DB::Sqlite(db) => db.insert_employee(table, employee),
        }
    }
    fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        match self {
            DB::Postgres(db) => db.columns(table),
            DB::Sqlite(db) => db.columns(table),
        }
    }
    fn count_rows(&mut self, table: &str) -> Result<i64> {
        match self {
            DB::Postgres(db) => db.count_rows(table),
            DB::Sqlite(db) => db.count_rows(table),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub primary_key: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_sqlite_targets() {
        assert_eq!(DatabaseType::detect("sqlite:///tmp/hr.db"), DatabaseType::Sqlite);
        assert_eq!(DatabaseType::detect("sqlite::memory:"), DatabaseType::Sqlite);
        assert_eq!(sqlite_target("sqlite:///tmp/hr.db"), Some("/tmp/hr.db"));
        assert_eq!(sqlite_target("sqlite::memory:"), Some(":memory:"));
        assert_eq!(sqlite_target("sqlite://:memory:"), Some(":memory:"));
    }

    #[test]
    fn everything_else_is_postgres() {
        for s in [
            "postgres://app@localhost/hr",
            "postgresql://app@localhost:5432/hr?sslmode=disable",
            "host=localhost user=app dbname=hr sslmode=disable",
        ] {
            assert_eq!(DatabaseType::detect(s), DatabaseType::Postgres, "{s}");
        }
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("employees"), "\"employees\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
