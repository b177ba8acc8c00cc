//! Options file loading for nudge.
//!
//! Finds the JSON options file, parses it with figment, and merges it
//! under the CLI source and over the built-in defaults. The result is a
//! validated `nudge_core::RunConfig`.

use std::io::Read;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use figment::{
    Figment,
    providers::{Format, Json},
};
use json_comments::StripComments;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use nudge_core::{CoreError, ExclusionSet, ReconnectOptions, RunConfig};

/// Directory name under `~/.config`.
pub const APP_NAME: &str = "nudge";

/// File name looked up when no path is given.
pub const OPTIONS_FILE_NAME: &str = "config.json";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse options file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: Box<figment::Error>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

// ── File structure ──────────────────────────────────────────────────

/// Shape of the JSON options file. Every key is optional and unknown keys
/// are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileOptions {
    #[serde(rename = "baseUri", alias = "BaseUri")]
    pub base_uri: Option<Url>,

    #[serde(alias = "Username")]
    pub username: Option<String>,

    /// Wrapped in a `SecretString` as soon as it is merged.
    #[serde(alias = "Password")]
    pub password: Option<String>,

    #[serde(rename = "minimumSignalStrength", alias = "MinimumSignalStrength")]
    pub minimum_signal_strength: Option<i32>,

    #[serde(rename = "insecureTLS", alias = "InsecureTLS")]
    pub insecure_tls: Option<bool>,

    #[serde(rename = "excludedMacs", alias = "ExcludedMacs")]
    pub excluded_macs: Vec<String>,

    #[serde(rename = "excludedSSIDs", alias = "ExcludedSSIDs")]
    pub excluded_ssids: Vec<String>,

    #[serde(alias = "Verbose")]
    pub verbose: bool,
}

impl From<FileOptions> for ReconnectOptions {
    fn from(file: FileOptions) -> Self {
        Self {
            base_uri: file.base_uri,
            username: file.username,
            password: file.password.map(SecretString::from),
            minimum_signal_strength: file.minimum_signal_strength,
            insecure_tls: file.insecure_tls,
            excluded_macs: file.excluded_macs.into_iter().collect::<ExclusionSet>(),
            excluded_ssids: file.excluded_ssids.into_iter().collect::<ExclusionSet>(),
            verbose: file.verbose,
            options_file: None,
        }
    }
}

// ── Path resolution ─────────────────────────────────────────────────

/// `~/.config/nudge/config.json`, or `None` if there is no home directory.
pub fn default_options_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join(APP_NAME)
            .join(OPTIONS_FILE_NAME)
    })
}

/// Resolve the options file to read.
///
/// An explicit path is made absolute against the current directory. An
/// absent or empty path means the default location.
pub fn resolve_options_path(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match explicit.filter(|path| !path.as_os_str().is_empty()) {
        Some(path) => Ok(Some(std::path::absolute(path)?)),
        None => Ok(default_options_path()),
    }
}

// ── Loading ─────────────────────────────────────────────────────────

/// Parse the options file at `path`, or `None` if it doesn't exist.
///
/// `//` and `/* */` comments are allowed and stripped before parsing.
pub fn read_options_file(path: &Path) -> Result<Option<FileOptions>, ConfigError> {
    if !path.is_file() {
        debug!(path = %path.display(), "no options file");
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)?;
    let mut json = String::with_capacity(raw.len());
    StripComments::new(raw.as_bytes()).read_to_string(&mut json)?;

    let options = Figment::new()
        .merge(Json::string(&json))
        .extract::<FileOptions>()
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    Ok(Some(options))
}

/// Validated settings plus the options file they were read from, if any.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: RunConfig,
    pub source: Option<PathBuf>,
}

/// Merge `cli` over the options file and the built-in defaults, then
/// validate.
///
/// The file comes from `cli.options_file` or the default location. A
/// missing file is skipped; a malformed one is an error.
pub fn load(cli: ReconnectOptions) -> Result<LoadedConfig, ConfigError> {
    let mut options = cli;

    let path = resolve_options_path(options.options_file.as_deref())?;
    let mut source = None;
    if let Some(path) = path {
        if let Some(file) = read_options_file(&path)? {
            options.merge(file.into());
            source = Some(path);
        }
    }

    options.merge(ReconnectOptions::defaults());
    let config = options.validate()?;

    Ok(LoadedConfig { config, source })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::fs;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use nudge_core::{DEFAULT_MINIMUM_SIGNAL_STRENGTH, RequiredField};

    use super::*;

    fn write_options(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        fs::write(&path, body).unwrap();
        path
    }

    fn cli_with_file(path: PathBuf) -> ReconnectOptions {
        ReconnectOptions {
            options_file: Some(path),
            ..ReconnectOptions::default()
        }
    }

    #[test]
    fn file_supplies_missing_cli_values() {
        let dir = TempDir::new().unwrap();
        let path = write_options(
            &dir,
            r#"{
                "baseUri": "https://10.0.0.1:8443",
                "username": "admin",
                "password": "hunter2",
                "minimumSignalStrength": -65,
                "insecureTLS": true,
                "excludedMacs": ["AA:BB:CC:DD:EE:FF"],
                "excludedSSIDs": ["IoT"]
            }"#,
        );

        let loaded = load(cli_with_file(path.clone())).unwrap();
        let config = loaded.config;

        assert_eq!(loaded.source, Some(path));
        assert_eq!(config.base_uri.as_str(), "https://10.0.0.1:8443/");
        assert_eq!(config.username, "admin");
        assert_eq!(config.password.expose_secret(), "hunter2");
        assert!(config.insecure_tls);
        assert_eq!(config.policy.minimum_signal_strength, -65);
        assert!(config.policy.excluded_macs.contains("aa:bb:cc:dd:ee:ff"));
        assert!(config.policy.excluded_ssids.contains("iot"));
    }

    #[test]
    fn cli_values_win_and_sets_are_unioned() {
        let dir = TempDir::new().unwrap();
        let path = write_options(
            &dir,
            r#"{
                "baseUri": "https://file.local",
                "username": "file-user",
                "password": "file-pass",
                "minimumSignalStrength": -65,
                "excludedSSIDs": ["Guest"]
            }"#,
        );
        let cli = ReconnectOptions {
            base_uri: Some("https://cli.local".parse().unwrap()),
            minimum_signal_strength: Some(-70),
            excluded_ssids: ["IoT"].into_iter().collect(),
            ..cli_with_file(path)
        };

        let config = load(cli).unwrap().config;

        assert_eq!(config.base_uri.host_str(), Some("cli.local"));
        assert_eq!(config.username, "file-user");
        assert_eq!(config.policy.minimum_signal_strength, -70);
        assert_eq!(
            config.policy.excluded_ssids.iter().collect::<Vec<_>>(),
            vec!["guest", "iot"]
        );
    }

    #[test]
    fn pascal_case_keys_are_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write_options(
            &dir,
            r#"{
                "BaseUri": "https://legacy.local",
                "Username": "admin",
                "Password": "hunter2",
                "InsecureTLS": true,
                "ExcludedSSIDs": ["Guest"],
                "Verbose": true
            }"#,
        );

        let config = load(cli_with_file(path)).unwrap().config;

        assert_eq!(config.base_uri.host_str(), Some("legacy.local"));
        assert!(config.insecure_tls);
        assert!(config.verbose);
        assert!(config.policy.excluded_ssids.contains("guest"));
    }

    #[test]
    fn comments_are_stripped_before_parsing() {
        let dir = TempDir::new().unwrap();
        let path = write_options(
            &dir,
            "{\n  // lab controller\n  \"baseUri\": \"https://unifi.local\", /* admin */ \"username\": \"admin\"\n}",
        );

        let file = read_options_file(&path).unwrap().unwrap();

        assert_eq!(
            file.base_uri.map(String::from),
            Some("https://unifi.local/".to_string())
        );
        assert_eq!(file.username.as_deref(), Some("admin"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write_options(
            &dir,
            r#"{ "baseUri": "https://unifi.local", "theme": "dark", "retries": 9 }"#,
        );

        let file = read_options_file(&path).unwrap().unwrap();

        assert_eq!(
            file.base_uri.map(String::from),
            Some("https://unifi.local/".to_string())
        );
        assert!(file.username.is_none());
    }

    #[test]
    fn missing_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let cli = ReconnectOptions {
            base_uri: Some("https://unifi.local".parse().unwrap()),
            username: Some("admin".into()),
            password: Some(SecretString::from("hunter2".to_string())),
            ..cli_with_file(dir.path().join("absent.json"))
        };

        let loaded = load(cli).unwrap();

        assert!(loaded.source.is_none());
        assert_eq!(
            loaded.config.policy.minimum_signal_strength,
            DEFAULT_MINIMUM_SIGNAL_STRENGTH
        );
        assert!(!loaded.config.insecure_tls);
    }

    #[test]
    fn malformed_file_is_a_parse_error_naming_the_path() {
        let dir = TempDir::new().unwrap();
        let path = write_options(&dir, r#"{ "baseUri": "https://unifi.local", "#);

        let err = load(cli_with_file(path.clone())).unwrap_err();

        match err {
            ConfigError::Parse { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected Parse error, got: {other:?}"),
        }
    }

    #[test]
    fn wrongly_typed_value_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_options(&dir, r#"{ "minimumSignalStrength": "weak" }"#);

        let err = read_options_file(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_required_field_after_merge_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_options(&dir, r#"{ "baseUri": "https://unifi.local" }"#);

        let err = load(cli_with_file(path)).unwrap_err();

        assert!(
            matches!(
                err,
                ConfigError::Invalid(CoreError::MissingRequiredField {
                    field: RequiredField::Username
                })
            ),
            "got: {err:?}"
        );
    }

    #[test]
    fn relative_path_is_made_absolute() {
        let resolved = resolve_options_path(Some(Path::new("nudge.json")))
            .unwrap()
            .unwrap();

        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("nudge.json"));
    }

    #[test]
    fn empty_path_falls_back_to_default() {
        let resolved = resolve_options_path(Some(Path::new(""))).unwrap();

        assert_eq!(resolved, default_options_path());
    }

    #[test]
    fn default_path_lives_under_dot_config() {
        if let Some(path) = default_options_path() {
            assert!(path.ends_with(".config/nudge/config.json"));
        }
    }
}
