//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{JpbError, Result};
use crate::logger::jsonl::JsonlConfig;
use crate::view::columns;
use crate::view::model::{
    DEFAULT_PAGE_SIZE, SortDirection, SortField, ViewDefaults, is_known_department,
};

/// Full jpb configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub view: ViewConfig,
    pub source: SourceConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

/// Initial board state applied when a session starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewConfig {
    /// Rows revealed initially and per "show more".
    pub page_size: usize,
    /// Department filter value; empty for all.
    pub default_department: String,
    /// Sortable column field name (`Name` or `Open_Date__c`).
    pub default_sort_field: String,
    /// `asc` or `desc`.
    pub default_sort_direction: String,
}

/// Where postings are read from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    /// JSON file holding an array of posting records.
    pub path: PathBuf,
}

/// Activity log behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub max_size_bytes: u64,
    pub max_rotated_files: u32,
}

/// Filesystem paths used by jpb.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub jsonl_log: PathBuf,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_department: String::new(),
            default_sort_field: SortField::Name.field_name().to_string(),
            default_sort_direction: SortDirection::Ascending.as_str().to_string(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("postings.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[JPB-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        Self {
            config_file: home_dir.join(".config").join("jpb").join("config.toml"),
            jsonl_log: home_dir
                .join(".local")
                .join("share")
                .join("jpb")
                .join("activity.jsonl"),
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| JpbError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(JpbError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for display.
    ///
    /// FNV-1a over the canonical JSON form, stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    /// Initial board state described by `[view]`.
    pub fn view_defaults(&self) -> Result<ViewDefaults> {
        let sort_field = SortField::from_field_name(&self.view.default_sort_field)
            .filter(|f| columns::column(f.field_name()).is_some_and(|c| c.sortable))
            .ok_or_else(|| JpbError::InvalidConfig {
                details: format!(
                    "view.default_sort_field must name a sortable column, got {:?}",
                    self.view.default_sort_field
                ),
            })?;
        let sort_direction =
            SortDirection::parse(&self.view.default_sort_direction).ok_or_else(|| {
                JpbError::InvalidConfig {
                    details: format!(
                        "view.default_sort_direction must be asc or desc, got {:?}",
                        self.view.default_sort_direction
                    ),
                }
            })?;
        Ok(ViewDefaults {
            department: self.view.default_department.clone(),
            sort_field,
            sort_direction,
            page_size: self.view.page_size,
        })
    }

    /// Activity log writer settings.
    #[must_use]
    pub fn jsonl_config(&self) -> JsonlConfig {
        JsonlConfig {
            path: self.paths.jsonl_log.clone(),
            max_size_bytes: self.logging.max_size_bytes,
            max_rotated_files: self.logging.max_rotated_files,
        }
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = non_empty(lookup("JPB_VIEW_PAGE_SIZE")) {
            self.view.page_size = parse_env_usize("JPB_VIEW_PAGE_SIZE", &raw)?;
        }
        // Empty is a real value here: it selects "All Departments".
        if let Some(raw) = lookup("JPB_VIEW_DEFAULT_DEPARTMENT") {
            self.view.default_department = raw;
        }
        if let Some(raw) = non_empty(lookup("JPB_VIEW_DEFAULT_SORT_FIELD")) {
            self.view.default_sort_field = raw;
        }
        if let Some(raw) = non_empty(lookup("JPB_VIEW_DEFAULT_SORT_DIRECTION")) {
            self.view.default_sort_direction = raw;
        }
        if let Some(raw) = non_empty(lookup("JPB_SOURCE_PATH")) {
            self.source.path = PathBuf::from(raw);
        }
        if let Some(raw) = non_empty(lookup("JPB_LOGGING_ENABLED")) {
            self.logging.enabled = parse_env_bool("JPB_LOGGING_ENABLED", &raw)?;
        }
        if let Some(raw) = non_empty(lookup("JPB_JSONL_LOG")) {
            self.paths.jsonl_log = PathBuf::from(raw);
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.view.page_size == 0 {
            return Err(JpbError::InvalidConfig {
                details: "view.page_size must be >= 1".to_string(),
            });
        }

        if !is_known_department(&self.view.default_department) {
            return Err(JpbError::InvalidConfig {
                details: format!(
                    "view.default_department {:?} is not a department option",
                    self.view.default_department
                ),
            });
        }

        self.view_defaults()?;

        if self.logging.max_size_bytes == 0 {
            return Err(JpbError::InvalidConfig {
                details: "logging.max_size_bytes must be > 0".to_string(),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|raw| !raw.trim().is_empty())
}

fn parse_env_usize(name: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|error| JpbError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    raw.trim()
        .parse::<bool>()
        .map_err(|error| JpbError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}
