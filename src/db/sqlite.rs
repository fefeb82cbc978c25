use anyhow::Result;
use log::debug;
use rusqlite::params;

use crate::db::{quote_ident, ColumnInfo, DBBehavior};
use crate::schema::{create_table_sql, ColumnKind, ColumnSpec};
use crate::seed::Employee;

pub struct Sqlite {
    conn: rusqlite::Connection,
}

impl Sqlite {
    /// `target` is a file path or `:memory:`.
    pub fn open(target: &str) -> Result<Self> {
        debug!("sqlite: opening {}", target);
        let conn = if target == ":memory:" {
            rusqlite::Connection::open_in_memory()?
        } else {
            rusqlite::Connection::open(target)?
        };
        debug!("sqlite: opened");
        Ok(Self { conn })
    }
}

fn column_type(kind: ColumnKind) -> String {
    match kind {
        ColumnKind::Serial => "INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
        ColumnKind::Varchar(n) => format!("VARCHAR({n})"),
        ColumnKind::Boolean => "BOOLEAN".to_string(),
    }
}

impl DBBehavior for Sqlite {
    fn ping(&mut self) -> Result<()> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    fn table_exists(&mut self, table: &str) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE)",
            params![table],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(exists)
    }

    fn create_table(&mut self, table: &str, columns: &[ColumnSpec]) -> Result<()> {
        let sql = create_table_sql(table, columns, column_type);
        debug!("sqlite: {}", sql);
        self.conn.execute_batch(&sql)?;
        Ok(())
    }

    fn insert_employee(&mut self, table: &str, employee: &Employee) -> Result<()> {
        let q = format!(
            "INSERT INTO {} (firstname, lastname, email, news, role) VALUES (?1, ?2, ?3, ?4, ?5)",
            quote_ident(table)
        );
        self.conn.execute(
            &q,
            params![
                employee.firstname,
                employee.lastname,
                employee.email,
                employee.news,
                employee.role,
            ],
        )?;
        Ok(())
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        // cid, name, type, notnull, dflt_value, pk
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
        let rows = stmt.query_map([], |row| {
            Ok(ColumnInfo {
                name: row.get(1)?,
                data_type: row.get(2)?,
                nullable: row.get::<_, i64>(3)? == 0,
                primary_key: row.get::<_, i64>(5)? > 0,
            })
        })?;
        let mut columns = Vec::new();
        for c in rows {
            columns.push(c?);
        }
        Ok(columns)
    }

    fn count_rows(&mut self, table: &str) -> Result<i64> {
        let q = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        Ok(self.conn.query_row(&q, [], |row| row.get(0))?)
    }
}

#[cfg(test)]
impl Sqlite {
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.conn
    }
}
