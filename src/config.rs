//! Configuration management for the library catalog

use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::{
    error::AppResult,
    models::loan::{LoanRules, PenaltyPolicy},
};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one `<key>.json` file per collection
    pub data_dir: PathBuf,
    pub books_key: String,
    pub members_key: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoansConfig {
    pub max_loans: usize,
    pub duration_days: i64,
    pub penalty_policy: PenaltyPolicy,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SeedBook {
    pub title: String,
    pub author: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    /// Add `seed_books` when the books store does not exist yet
    pub seed_on_first_run: bool,
    pub seed_books: Vec<SeedBook>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// When set, logs go to this file instead of stderr
    pub file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub loans: LoansConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::from_sources(&run_mode, Self::environment(), env::var("LIBRARY_DATA_DIR").ok())
    }

    /// Environment variables such as `LIBRARY_LOANS__MAX_LOANS=5`
    fn environment() -> Environment {
        Environment::with_prefix("LIBRARY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn from_sources(
        run_mode: &str,
        environment: Environment,
        data_dir: Option<String>,
    ) -> AppResult<Self> {
        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment)
            .set_override_option("storage.data_dir", data_dir)?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn loan_rules(&self) -> LoanRules {
        LoanRules {
            max_loans: self.loans.max_loans,
            duration: chrono::Duration::days(self.loans.duration_days),
            penalty_policy: self.loans.penalty_policy,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            books_key: "books".to_string(),
            members_key: "members".to_string(),
        }
    }
}

impl Default for LoansConfig {
    fn default() -> Self {
        let rules = LoanRules::default();
        Self {
            max_loans: rules.max_loans,
            duration_days: rules.duration.num_days(),
            penalty_policy: rules.penalty_policy,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_on_first_run: true,
            seed_books: vec![
                SeedBook {
                    title: "1984".to_string(),
                    author: "George Orwell".to_string(),
                },
                SeedBook {
                    title: "Le Petit Prince".to_string(),
                    author: "Antoine de Saint-Exupéry".to_string(),
                },
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}
