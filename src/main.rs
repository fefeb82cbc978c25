mod app;
mod config;
mod connection;
mod db;
mod error;
mod logger;
mod schema;
mod seed;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use log::error;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::app::run_app;

/// Create the employees table and fill it with sample rows if it does not exist yet.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON file holding `{ "connectionString": "..." }`
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() {
    logger::init();
    let args = Args::parse();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let mut rng = StdRng::seed_from_u64(seed);

    let stdout = std::io::stdout();
    if let Err(err) = run_app(&args.config, &mut rng, &mut stdout.lock()) {
        error!("fatal error: {:#}", anyhow::Error::from(err));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn config_defaults_to_working_directory_file() {
        let args = Args::try_parse_from(["empseed"]).unwrap();
        assert_eq!(args.config, PathBuf::from("conString.json"));
    }

    #[test]
    fn config_path_can_be_overridden() {
        let args = Args::try_parse_from(["empseed", "--config", "/etc/empseed/db.json"]).unwrap();
        assert_eq!(args.config, PathBuf::from("/etc/empseed/db.json"));
    }
}
