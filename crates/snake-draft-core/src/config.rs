// Configuration loading and parsing (draft.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_PARTIES: usize = 10;
pub const DEFAULT_ROUNDS: u32 = 10;
pub const DEFAULT_HUMAN_PARTY: usize = 0;
pub const DEFAULT_AUTO_PICK_DELAY_MS: u64 = 900;
pub const DEFAULT_SOURCE_PATH: &str = "data/rankings.csv";

fn default_parties() -> usize {
    DEFAULT_PARTIES
}

fn default_rounds() -> u32 {
    DEFAULT_ROUNDS
}

fn default_human_party() -> usize {
    DEFAULT_HUMAN_PARTY
}

fn default_auto_pick_delay_ms() -> u64 {
    DEFAULT_AUTO_PICK_DELAY_MS
}

fn default_source_path() -> String {
    DEFAULT_SOURCE_PATH.to_string()
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

/// The engine-facing draft shape. Fixed for the lifetime of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftSettings {
    pub parties: usize,
    pub rounds: u32,
    pub human_party: usize,
    /// Optional display names, one per party.
    pub party_names: Vec<String>,
}

impl Default for DraftSettings {
    fn default() -> Self {
        DraftSettings {
            parties: DEFAULT_PARTIES,
            rounds: DEFAULT_ROUNDS,
            human_party: DEFAULT_HUMAN_PARTY,
            party_names: Vec::new(),
        }
    }
}

impl DraftSettings {
    pub fn new(parties: usize, rounds: u32, human_party: usize) -> Self {
        DraftSettings {
            parties,
            rounds,
            human_party,
            party_names: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parties == 0 {
            return Err(ConfigError::ValidationError {
                field: "draft.parties".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.rounds == 0 {
            return Err(ConfigError::ValidationError {
                field: "draft.rounds".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.human_party >= self.parties {
            return Err(ConfigError::ValidationError {
                field: "draft.human_party".into(),
                message: format!(
                    "must be less than draft.parties ({}), got {}",
                    self.parties, self.human_party
                ),
            });
        }

        if !self.party_names.is_empty() && self.party_names.len() != self.parties {
            return Err(ConfigError::ValidationError {
                field: "draft.party_names".into(),
                message: format!(
                    "must be empty or list exactly {} names, got {}",
                    self.parties,
                    self.party_names.len()
                ),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub draft: DraftSettings,
    /// Visible pause before each automated pick. Pacing only.
    pub auto_pick_delay: Duration,
    /// Ranked list to load (`.csv` or `.json`), relative to the working dir.
    pub source_path: String,
}

// ---------------------------------------------------------------------------
// draft.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire draft.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    #[serde(default)]
    draft: DraftSection,
    #[serde(default)]
    source: SourceSection,
}

#[derive(Debug, Clone, Deserialize)]
struct DraftSection {
    #[serde(default = "default_parties")]
    parties: usize,
    #[serde(default = "default_rounds")]
    rounds: u32,
    #[serde(default = "default_human_party")]
    human_party: usize,
    #[serde(default = "default_auto_pick_delay_ms")]
    auto_pick_delay_ms: u64,
    #[serde(default)]
    party_names: Vec<String>,
}

impl Default for DraftSection {
    fn default() -> Self {
        DraftSection {
            parties: DEFAULT_PARTIES,
            rounds: DEFAULT_ROUNDS,
            human_party: DEFAULT_HUMAN_PARTY,
            auto_pick_delay_ms: DEFAULT_AUTO_PICK_DELAY_MS,
            party_names: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SourceSection {
    #[serde(default = "default_source_path")]
    path: String,
}

impl Default for SourceSection {
    fn default() -> Self {
        SourceSection {
            path: default_source_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate the contents of a draft.toml file.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: DraftFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = Config {
        draft: DraftSettings {
            parties: file.draft.parties,
            rounds: file.draft.rounds,
            human_party: file.draft.human_party,
            party_names: file.draft.party_names,
        },
        auto_pick_delay: Duration::from_millis(file.draft.auto_pick_delay_ms),
        source_path: file.source.path,
    };

    config.draft.validate()?;
    Ok(config)
}

/// File name shared by `defaults/` and `config/`.
const CONFIG_FILE: &str = "draft.toml";

/// Load and validate configuration from `config/draft.toml` under `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    parse_config(&text, &path)
}

/// Seed `config/draft.toml` from `defaults/draft.toml` on first run.
///
/// An existing config file is never overwritten. Returns the path written,
/// or `None` when there was nothing to do.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let default = base_dir.join("defaults").join(CONFIG_FILE);
    if !default.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "{} is missing and there is no {} to seed it from; \
                 run from the project root",
                target.display(),
                default.display()
            ),
        });
    }

    let config_dir = base_dir.join("config");
    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create {}: {e}", config_dir.display()),
    })?;
    std::fs::copy(&default, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", default.display(), target.display()),
    })?;
    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
