//! Layered configuration
//!
//! Flag, then environment (clap reads both, `.env` is loaded first), then the
//! TOML file, then built-in defaults.

use acal_core::logging_facility::Profile;
use acal_core::{AcademicTerm, ExError, ExErrorKind, Result};
use acal_store::{CatalogConfig, StoreConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File read when `--config` is not given, if it exists
pub const DEFAULT_CONFIG_FILE: &str = "acal.toml";

/// Contents of `acal.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub catalog: CatalogConfig,
    pub log_profile: Option<Profile>,
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
    pub term: Option<String>,
    pub log_profile: Option<String>,
}

/// Fully resolved settings for one process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store: StoreConfig,
    pub catalog: CatalogConfig,
    pub log_profile: Profile,
}

impl AppConfig {
    /// Parse a config file's text
    ///
    /// # Errors
    /// `Config` when the text is not valid TOML for this layout.
    pub fn from_toml(source: &str, origin: &Path) -> Result<Self> {
        toml::from_str(source).map_err(|e| {
            ExError::new(ExErrorKind::Config)
                .with_op("load_config")
                .with_entity_id(origin.display().to_string())
                .with_message(e.to_string())
        })
    }

    /// Read the explicit file, or the default file when present
    ///
    /// # Errors
    /// `Config` when an explicit file is missing, or any file is unreadable
    /// or invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let source = std::fs::read_to_string(&path).map_err(|e| {
            ExError::new(ExErrorKind::Config)
                .with_op("load_config")
                .with_entity_id(path.display().to_string())
                .with_message(e.to_string())
        })?;
        Self::from_toml(&source, &path)
    }
}

impl Settings {
    /// Apply overrides on top of a loaded config file
    ///
    /// # Errors
    /// `Validation` for a non-numeric term, `Config` for an unknown log
    /// profile.
    pub fn resolve(file: AppConfig, overrides: &Overrides) -> Result<Self> {
        let mut store = file.store;
        if let Some(db) = &overrides.db {
            store.path = db.clone();
        }

        let mut catalog = file.catalog;
        if let Some(term) = &overrides.term {
            catalog.reporting_term = AcademicTerm::parse(term)?;
        }

        let log_profile = match &overrides.log_profile {
            Some(raw) => raw.parse::<Profile>().map_err(|msg| {
                ExError::new(ExErrorKind::Config)
                    .with_op("resolve_settings")
                    .with_message(msg)
            })?,
            None => file.log_profile.unwrap_or(Profile::Standard),
        };

        Ok(Self {
            store,
            catalog,
            log_profile,
        })
    }

    /// Load the config file named by the overrides, then apply them
    ///
    /// # Errors
    /// See [`AppConfig::load`] and [`Settings::resolve`].
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let file = AppConfig::load(overrides.config.as_deref())?;
        Self::resolve(file, overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file_or_overrides() {
        let settings = Settings::resolve(AppConfig::default(), &Overrides::default()).unwrap();
        assert_eq!(settings.store.path, PathBuf::from("acal.db"));
        assert_eq!(settings.store.busy_timeout_ms, 5_000);
        assert_eq!(settings.catalog.reporting_term.code(), 202502);
        assert_eq!(settings.log_profile, Profile::Standard);
    }

    #[test]
    fn test_file_values_are_used() {
        let file = AppConfig::from_toml(
            r#"
            log_profile = "production"

            [store]
            path = "/var/lib/acal/calendar.db"
            busy_timeout_ms = 250

            [catalog]
            reporting_term = 202601
            "#,
            Path::new("acal.toml"),
        )
        .unwrap();

        let settings = Settings::resolve(file, &Overrides::default()).unwrap();
        assert_eq!(settings.store.path, PathBuf::from("/var/lib/acal/calendar.db"));
        assert_eq!(settings.store.busy_timeout_ms, 250);
        assert!(settings.store.foreign_keys);
        assert_eq!(settings.catalog.reporting_term.code(), 202601);
        assert_eq!(settings.log_profile, Profile::Production);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = AppConfig::from_toml(
            "[store]\npath = \"file.db\"\n[catalog]\nreporting_term = 202601\n",
            Path::new("acal.toml"),
        )
        .unwrap();
        let overrides = Overrides {
            db: Some(PathBuf::from("flag.db")),
            term: Some("202401".to_string()),
            log_profile: Some("test".to_string()),
            ..Overrides::default()
        };

        let settings = Settings::resolve(file, &overrides).unwrap();
        assert_eq!(settings.store.path, PathBuf::from("flag.db"));
        assert_eq!(settings.catalog.reporting_term.code(), 202401);
        assert_eq!(settings.log_profile, Profile::Test);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let err = AppConfig::from_toml("[store]\npath = 3\n", Path::new("bad.toml")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Config);
        assert_eq!(err.entity_id(), Some("bad.toml"));

        let err = AppConfig::from_toml("colour = \"red\"\n", Path::new("bad.toml")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Config);

        let overrides = Overrides {
            term: Some("spring".to_string()),
            ..Overrides::default()
        };
        let err = Settings::resolve(AppConfig::default(), &overrides).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Validation);

        let overrides = Overrides {
            log_profile: Some("loud".to_string()),
            ..Overrides::default()
        };
        let err = Settings::resolve(AppConfig::default(), &overrides).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Config);
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Config);
    }
}
