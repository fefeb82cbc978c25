use log::{debug, info};

use crate::db::{quote_ident, DBBehavior};
use crate::error::{ProvisionError, Result};

pub const EMPLOYEES_TABLE: &str = "employees";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Auto-incrementing integer primary key, assigned by storage.
    Serial,
    Varchar(u16),
    Boolean,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

pub const EMPLOYEE_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { name: "emp_id", kind: ColumnKind::Serial },
    ColumnSpec { name: "firstname", kind: ColumnKind::Varchar(50) },
    ColumnSpec { name: "lastname", kind: ColumnKind::Varchar(50) },
    ColumnSpec { name: "email", kind: ColumnKind::Varchar(100) },
    ColumnSpec { name: "news", kind: ColumnKind::Boolean },
    ColumnSpec { name: "role", kind: ColumnKind::Varchar(50) },
];

/// Render a `CREATE TABLE` statement, letting the backend spell each column type.
pub fn create_table_sql(
    table: &str,
    columns: &[ColumnSpec],
    render: impl Fn(ColumnKind) -> String,
) -> String {
    let defs = columns
        .iter()
        .map(|c| format!("    {} {}", quote_ident(c.name), render(c.kind)))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("CREATE TABLE {} (\n{}\n)", quote_ident(table), defs)
}

pub fn table_exists(db: &mut impl DBBehavior, table: &str) -> Result<bool> {
    let exists = db.table_exists(table).map_err(|source| ProvisionError::Query {
        table: table.to_string(),
        source,
    })?;
    debug!("table {} exists: {}", table, exists);
    Ok(exists)
}

/// Create `table` with the employee schema. Fails if it already exists.
pub fn create_table(db: &mut impl DBBehavior, table: &str) -> Result<()> {
    db.create_table(table, EMPLOYEE_COLUMNS)
        .map_err(|source| ProvisionError::Schema {
            table: table.to_string(),
            source,
        })?;
    info!("created table {}", table);
    if log::log_enabled!(log::Level::Debug) {
        if let Ok(cols) = db.columns(table) {
            for c in cols {
                debug!(
                    "  {} {}{}{}",
                    c.name,
                    c.data_type,
                    if c.primary_key { " primary key" } else { "" },
                    if c.nullable { "" } else { " not null" },
                );
            }
        }
    }
    Ok(())
}
