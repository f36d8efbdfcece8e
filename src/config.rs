//! Runtime configuration shared by the CLI and the MCP server.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `POKEDEX_DATA_DIR` | data | Data directory (`pokemon/*.ron`) or a JSON collection file |
//! | `POKEDEX_GENERATIONS_FILE` | (built-in) | RON file with the generation table |
//! | `POKEDEX_LOG_LEVEL` | info | Log level |
//! | `POKEDEX_DEFAULT_PER_PAGE` | 20 | Page size when a request gives none |
//! | `POKEDEX_MAX_PER_PAGE` | 100 | Upper bound page sizes are clamped to |

use crate::errors::{ConfigError, PokedexResult};
use crate::generations::GenerationTable;
use crate::pokedex::Pokedex;
use crate::query::{QueryLimits, DEFAULT_PER_PAGE, MAX_PER_PAGE};
use crate::store::MemoryStore;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Args)]
pub struct PokedexConfig {
    /// Data directory holding `pokemon/*.ron`, or a JSON file of records.
    #[arg(long, env = "POKEDEX_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// RON file listing generation descriptors; the built-in table is used
    /// when omitted.
    #[arg(long, env = "POKEDEX_GENERATIONS_FILE")]
    pub generations: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "POKEDEX_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "POKEDEX_DEFAULT_PER_PAGE", default_value_t = DEFAULT_PER_PAGE)]
    pub default_per_page: u32,

    #[arg(long, env = "POKEDEX_MAX_PER_PAGE", default_value_t = MAX_PER_PAGE)]
    pub max_per_page: u32,
}

impl Default for PokedexConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            generations: None,
            log_level: "info".to_string(),
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

impl PokedexConfig {
    /// Collects every configuration problem rather than stopping at the first.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        if self.max_per_page == 0 {
            errors.push(ConfigError::InvalidSetting {
                name: "max_per_page",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.default_per_page == 0 {
            errors.push(ConfigError::InvalidSetting {
                name: "default_per_page",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.default_per_page > self.max_per_page {
            errors.push(ConfigError::InvalidSetting {
                name: "default_per_page",
                reason: format!("must not exceed max_per_page ({})", self.max_per_page),
            });
        }
        if !matches!(
            self.log_level.to_ascii_lowercase().as_str(),
            "error" | "warn" | "info" | "debug" | "trace"
        ) {
            errors.push(ConfigError::InvalidSetting {
                name: "log_level",
                reason: format!("unknown level '{}'", self.log_level),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn limits(&self) -> QueryLimits {
        QueryLimits {
            default_per_page: self.default_per_page,
            max_per_page: self.max_per_page,
        }
    }

    pub fn load_generations(&self) -> PokedexResult<GenerationTable> {
        match &self.generations {
            Some(path) => Ok(GenerationTable::load(path)?),
            None => Ok(GenerationTable::default()),
        }
    }

    /// Loads the collection and generation table and assembles the service.
    pub fn build_pokedex(&self) -> PokedexResult<Pokedex> {
        let store = MemoryStore::load(&self.data_dir)?;
        let generations = self.load_generations()?;
        Ok(Pokedex::new(Arc::new(store), generations).with_limits(self.limits()))
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` takes precedence over
/// `level`. Output goes to stderr so stdio transports stay clean.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pokedex={},schema={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
