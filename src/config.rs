use std::path::PathBuf;

use clap::Parser;

/// Data file read on startup when no path is given.
pub const DEFAULT_DATA_FILE: &str = "clustered_jobs.csv";

#[derive(Parser, Debug)]
#[command(name = "joblens")]
#[command(about = "Explore skills by job title across precomputed job clusters", long_about = None)]
pub struct Cli {
    /// Clustered jobs file (.csv, .json or .parquet)
    #[arg(env = "JOBLENS_DATA", default_value = DEFAULT_DATA_FILE)]
    pub data: PathBuf,

    /// How many keywords and titles to list for the selected cluster
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
    pub top_n: u16,
}

/// Runtime settings handed to the app.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            top_n: 10,
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            data_path: cli.data,
            top_n: cli.top_n as usize,
        }
    }
}
