use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Every stage of a run fails with one of these. None are retried.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to connect to the database")]
    Connection(#[source] anyhow::Error),
    #[error("failed to check whether table {table} exists")]
    Query {
        table: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to create table {table}")]
    Schema {
        table: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to insert row {row} into {table}")]
    Insert {
        table: String,
        row: usize,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to write progress output")]
    Output(#[source] std::io::Error),
}
