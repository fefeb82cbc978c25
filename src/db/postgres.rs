use anyhow::Result;
use log::debug;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;

use crate::db::{quote_ident, ColumnInfo, DBBehavior};
use crate::schema::{create_table_sql, ColumnKind, ColumnSpec};
use crate::seed::Employee;

pub struct Postgres {
    client: postgres::Client,
}

impl Postgres {
    /// Accepts `postgres://` URLs as well as libpq `key=value` strings.
    ///
    /// TLS follows libpq's `sslmode`: `require` encrypts without checking the
    /// certificate, `verify-ca`/`verify-full` check it, `disable` never
    /// negotiates TLS.
    pub fn connect(connection_string: &str) -> Result<Self> {
        let mode = SslMode::parse(connection_string);
        let connection_string = mode.normalize(connection_string);
        debug!("postgres: connecting (sslmode {:?})", mode);
        let client = postgres::Client::connect(&connection_string, tls_connector(mode)?)?;
        debug!("postgres: connected");
        Ok(Self { client })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SslMode {
    Disable,
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl SslMode {
    fn parse(connection_string: &str) -> SslMode {
        match sslmode_value(connection_string) {
            Some("disable") => SslMode::Disable,
            Some("require") => SslMode::Require,
            Some("verify-ca") => SslMode::VerifyCa,
            Some("verify-full") => SslMode::VerifyFull,
            _ => SslMode::Prefer,
        }
    }

    /// The client only understands disable/prefer/require; the verifying
    /// modes are enforced by the connector instead.
    fn normalize(self, connection_string: &str) -> String {
        match (self, sslmode_span(connection_string)) {
            (SslMode::VerifyCa | SslMode::VerifyFull, Some((start, end))) => format!(
                "{}require{}",
                &connection_string[..start],
                &connection_string[end..]
            ),
            _ => connection_string.to_string(),
        }
    }
}

/// Byte range of the raw `sslmode` value, quotes included.
fn sslmode_span(connection_string: &str) -> Option<(usize, usize)> {
    let start = connection_string.find("sslmode=")? + "sslmode=".len();
    let rest = &connection_string[start..];
    let len = rest
        .find(|c: char| c == '&' || c.is_whitespace())
        .unwrap_or(rest.len());
    Some((start, start + len))
}

fn sslmode_value(connection_string: &str) -> Option<&str> {
    let (start, end) = sslmode_span(connection_string)?;
    Some(connection_string[start..end].trim_matches('\''))
}

fn tls_connector(mode: SslMode) -> Result<MakeTlsConnector> {
    let mut builder = TlsConnector::builder();
    match mode {
        SslMode::Disable | SslMode::Prefer | SslMode::Require => {
            builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }
        SslMode::VerifyCa => {
            builder.danger_accept_invalid_hostnames(true);
        }
        SslMode::VerifyFull => {}
    }
    Ok(MakeTlsConnector::new(builder.build()?))
}

fn column_type(kind: ColumnKind) -> String {
    match kind {
        ColumnKind::Serial => "SERIAL PRIMARY KEY".to_string(),
        ColumnKind::Varchar(n) => format!("VARCHAR({n})"),
        ColumnKind::Boolean => "BOOLEAN".to_string(),
    }
}

impl DBBehavior for Postgres {
    fn ping(&mut self) -> Result<()> {
        self.client.simple_query("SELECT 1")?;
        Ok(())
    }

    fn table_exists(&mut self, table: &str) -> Result<bool> {
        // to_regclass resolves through search_path and yields NULL for unknown names.
        let row = self
            .client
            .query_one("SELECT to_regclass($1::text)::text", &[&quote_ident(table)])?;
        let oid: Option<String> = row.get(0);
        Ok(oid.is_some())
    }

    fn create_table(&mut self, table: &str, columns: &[ColumnSpec]) -> Result<()> {
        let sql = create_table_sql(table, columns, column_type);
        debug!("postgres: {}", sql);
        self.client.batch_execute(&sql)?;
        Ok(())
    }

    fn insert_employee(&mut self, table: &str, employee: &Employee) -> Result<()> {
        let q = format!(
            "INSERT INTO {} (firstname, lastname, email, news, role) VALUES ($1, $2, $3, $4, $5)",
            quote_ident(table)
        );
        self.client.execute(
            &q,
            &[
                &employee.firstname,
                &employee.lastname,
                &employee.email,
                &employee.news,
                &employee.role,
            ],
        )?;
        Ok(())
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        let cols_rows = self.client.query(
            "SELECT column_name::text, data_type::text, is_nullable::text
             FROM information_schema.columns
             WHERE table_schema = current_schema() AND table_name = $1
             ORDER BY ordinal_position",
            &[&table],
        )?;
        let mut columns: Vec<ColumnInfo> = cols_rows
            .into_iter()
            .map(|r| ColumnInfo {
                name: r.get::<_, String>(0),
                data_type: r.get::<_, String>(1),
                nullable: {
                    let s: String = r.get(2);
                    s.eq_ignore_ascii_case("YES")
                },
                primary_key: false, // fill below
            })
            .collect();

        let pk_rows = self.client.query(
            "SELECT kcu.column_name::text
             FROM information_schema.table_constraints tc
             JOIN information_schema.key_column_usage kcu
               ON tc.constraint_name = kcu.constraint_name
              AND tc.table_schema = kcu.table_schema
             WHERE tc.constraint_type = 'PRIMARY KEY'
               AND tc.table_schema = current_schema()
               AND tc.table_name = $1",
            &[&table],
        )?;
        let pk: std::collections::HashSet<String> =
            pk_rows.into_iter().map(|r| r.get::<_, String>(0)).collect();
        for c in &mut columns {
            if pk.contains(&c.name) {
                c.primary_key = true;
            }
        }

        Ok(columns)
    }

    fn count_rows(&mut self, table: &str) -> Result<i64> {
        let q = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let row = self.client.query_one(&q, &[])?;
        Ok(row.get::<_, i64>(0))
    }
}
