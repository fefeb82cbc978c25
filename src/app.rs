use std::io::Write;
use std::path::Path;

use log::info;
use rand::Rng;

use crate::config::load_connection_string;
use crate::connection;
use crate::db::DBBehavior;
use crate::error::{ProvisionError, Result};
use crate::schema::{self, EMPLOYEES_TABLE};
use crate::seed::{seed_employees, SEED_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created { inserted: usize },
    AlreadyExists,
}

/// Load the descriptor at `config_path`, then create and seed the employees
/// table unless it already exists. Progress lines are written to `out`.
pub fn run_app<R, W>(config_path: &Path, rng: &mut R, out: &mut W) -> Result<Outcome>
where
    R: Rng,
    W: Write,
{
    let connection_string = load_connection_string(config_path)?;
    let mut db = connection::open(&connection_string)?;
    say(out, "Successfully connected to the database")?;

    if schema::table_exists(&mut db, EMPLOYEES_TABLE)? {
        say(out, &format!("Table {} already exists", EMPLOYEES_TABLE))?;
        if let Ok(rows) = db.count_rows(EMPLOYEES_TABLE) {
            info!("{} holds {} rows, leaving it untouched", EMPLOYEES_TABLE, rows);
        }
        return Ok(Outcome::AlreadyExists);
    }

    schema::create_table(&mut db, EMPLOYEES_TABLE)?;
    say(out, &format!("Table {} created successfully", EMPLOYEES_TABLE))?;

    let inserted = seed_employees(&mut db, EMPLOYEES_TABLE, rng, SEED_COUNT)?;
    say(out, &format!("{} employees inserted successfully", inserted))?;

    if let Ok(rows) = db.count_rows(EMPLOYEES_TABLE) {
        info!("{} now holds {} rows", EMPLOYEES_TABLE, rows);
    }
    Ok(Outcome::Created { inserted })
}

fn say<W: Write>(out: &mut W, line: &str) -> Result<()> {
    writeln!(out, "{}", line).map_err(ProvisionError::Output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        config: PathBuf,
        db_path: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("hr.db");
        let config = dir.path().join("conString.json");
        let body = serde_json::json!({ "connectionString": format!("sqlite://{}", db_path.display()) });
        std::fs::write(&config, body.to_string()).unwrap();
        Fixture { dir, config, db_path }
    }

    fn row_count(path: &Path) -> i64 {
        let conn = rusqlite::Connection::open(path).unwrap();
        conn.query_row("SELECT COUNT(*) FROM employees", [], |r| r.get(0))
            .unwrap()
    }

    fn run(config: &Path) -> (Result<Outcome>, String) {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut out = Vec::new();
        let result = run_app(config, &mut rng, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn fresh_database_is_created_and_seeded() {
        let fx = fixture();
        let (result, output) = run(&fx.config);

        assert_eq!(result.unwrap(), Outcome::Created { inserted: 50 });
        assert_eq!(
            output,
            "Successfully connected to the database\n\
             Table employees created successfully\n\
             50 employees inserted successfully\n"
        );
        assert_eq!(row_count(&fx.db_path), 50);
    }

    #[test]
    fn existing_table_is_left_alone() {
        let fx = fixture();
        {
            let conn = rusqlite::Connection::open(&fx.db_path).unwrap();
            conn.execute_batch(
                "CREATE TABLE employees (emp_id INTEGER PRIMARY KEY, firstname TEXT);
                 INSERT INTO employees (firstname) VALUES ('a'), ('b'), ('c');",
            )
            .unwrap();
        }

        let (result, output) = run(&fx.config);

        assert_eq!(result.unwrap(), Outcome::AlreadyExists);
        assert_eq!(
            output,
            "Successfully connected to the database\nTable employees already exists\n"
        );
        assert_eq!(row_count(&fx.db_path), 3);
    }

    #[test]
    fn second_run_changes_nothing() {
        let fx = fixture();
        let (first, _) = run(&fx.config);
        assert_eq!(first.unwrap(), Outcome::Created { inserted: 50 });

        let (second, output) = run(&fx.config);
        assert_eq!(second.unwrap(), Outcome::AlreadyExists);
        assert!(output.ends_with("Table employees already exists\n"));
        assert_eq!(row_count(&fx.db_path), 50);
    }

    #[test]
    fn missing_config_stops_before_connecting() {
        let fx = fixture();
        let (result, output) = run(&fx.dir.path().join("nope.json"));
        assert!(matches!(result, Err(ProvisionError::Io { .. })));
        assert!(output.is_empty());
        assert!(!fx.db_path.exists());
    }

    #[test]
    fn unreachable_database_stops_before_output() {
        let fx = fixture();
        let missing = fx.dir.path().join("missing").join("hr.db");
        let body = serde_json::json!({ "connectionString": format!("sqlite://{}", missing.display()) });
        std::fs::write(&fx.config, body.to_string()).unwrap();

        let (result, output) = run(&fx.config);
        assert!(matches!(result, Err(ProvisionError::Connection(_))));
        assert!(output.is_empty());
    }
}
