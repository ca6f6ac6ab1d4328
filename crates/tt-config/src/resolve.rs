//! Configuration resolution: CLI flag → environment → XDG config dir → built-in defaults.

use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::file::load_config_file;
use crate::scenario::ScenarioCatalogue;
use crate::selector::SelectorConfig;
use crate::ConfigError;

/// Environment variable naming a scenario configuration file.
pub const SCENARIOS_ENV: &str = "THRESHOLD_TUNER_SCENARIOS";

/// Directory under the user config dir that holds `scenarios.*`.
const CONFIG_DIR_NAME: &str = "threshold_tuner";

/// File names looked up in the user config dir, in order.
const CONFIG_FILE_NAMES: [&str; 4] = [
    "scenarios.toml",
    "scenarios.json",
    "scenarios.yaml",
    "scenarios.yml",
];

/// Where the effective configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    Flag,
    Env,
    UserConfigDir,
    Builtin,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Flag => write!(f, "flag"),
            ConfigSource::Env => write!(f, "env"),
            ConfigSource::UserConfigDir => write!(f, "user_config_dir"),
            ConfigSource::Builtin => write!(f, "builtin"),
        }
    }
}

/// The effective configuration after resolution and validation.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub catalogue: ScenarioCatalogue,
    pub selector: SelectorConfig,
    pub source: ConfigSource,
    pub path: Option<PathBuf>,
}

impl ResolvedConfig {
    pub fn builtin() -> Self {
        Self {
            catalogue: ScenarioCatalogue::default(),
            selector: SelectorConfig::default(),
            source: ConfigSource::Builtin,
            path: None,
        }
    }
}

/// Resolve configuration using the process environment and the user's config dir.
pub fn resolve_config(cli_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    resolve_config_with(
        cli_path,
        std::env::var_os(SCENARIOS_ENV),
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME)),
    )
}

/// Resolve configuration from explicit inputs.
///
/// An explicit flag or environment path must exist; a missing file in the
/// user config dir silently falls through to the built-in catalogue.
pub fn resolve_config_with(
    cli_path: Option<&Path>,
    env_path: Option<OsString>,
    user_dir: Option<PathBuf>,
) -> Result<ResolvedConfig, ConfigError> {
    if let Some(path) = cli_path {
        return load_from(path.to_path_buf(), ConfigSource::Flag);
    }

    if let Some(env) = env_path.filter(|v| !v.is_empty()) {
        return load_from(PathBuf::from(env), ConfigSource::Env);
    }

    if let Some(dir) = user_dir {
        if let Some(path) = CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
        {
            return load_from(path, ConfigSource::UserConfigDir);
        }
        debug!(dir = %dir.display(), "no scenario config in user config dir");
    }

    debug!("using built-in scenario catalogue");
    Ok(ResolvedConfig::builtin())
}

fn load_from(path: PathBuf, source: ConfigSource) -> Result<ResolvedConfig, ConfigError> {
    let (catalogue, selector) = load_config_file(&path)?.into_parts()?;
    debug!(
        path = %path.display(),
        %source,
        scenarios = catalogue.len(),
        grid_points = selector.grid_points,
        "loaded scenario config"
    );
    Ok(ResolvedConfig {
        catalogue,
        selector,
        source,
        path: Some(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const JSON_CONFIG: &str =
        r#"{"scenarios":[{"name":"only","assumed_prevalence":0.02,"target_fn":2}]}"#;

    #[test]
    fn nothing_configured_uses_builtin() {
        let resolved = resolve_config_with(None, None, None).unwrap();
        assert_eq!(resolved.source, ConfigSource::Builtin);
        assert_eq!(resolved.catalogue, ScenarioCatalogue::default());
        assert!(resolved.path.is_none());
    }

    #[test]
    fn empty_user_dir_uses_builtin() {
        let dir = tempdir().unwrap();
        let resolved = resolve_config_with(None, None, Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved.source, ConfigSource::Builtin);
    }

    #[test]
    fn user_dir_file_is_found() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("scenarios.json"), JSON_CONFIG).unwrap();
        let resolved = resolve_config_with(None, None, Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved.source, ConfigSource::UserConfigDir);
        assert_eq!(resolved.catalogue.len(), 1);
    }

    #[test]
    fn env_beats_user_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("scenarios.json"), JSON_CONFIG).unwrap();
        let env_file = dir.path().join("env.yaml");
        let yaml = "scenarios:\n\
            \x20 - {name: a, assumed_prevalence: 0.1, target_fn: 0}\n\
            \x20 - {name: b, assumed_prevalence: 0.1, target_fn: 1}\n";
        fs::write(&env_file, yaml).unwrap();
        let resolved = resolve_config_with(
            None,
            Some(env_file.clone().into_os_string()),
            Some(dir.path().to_path_buf()),
        )
        .unwrap();
        assert_eq!(resolved.source, ConfigSource::Env);
        assert_eq!(resolved.catalogue.len(), 2);
        assert_eq!(resolved.path, Some(env_file));
    }

    #[test]
    fn flag_beats_env() {
        let dir = tempdir().unwrap();
        let flag_file = dir.path().join("flag.json");
        fs::write(&flag_file, JSON_CONFIG).unwrap();
        let resolved = resolve_config_with(
            Some(&flag_file),
            Some(OsString::from("/nonexistent/env.toml")),
            None,
        )
        .unwrap();
        assert_eq!(resolved.source, ConfigSource::Flag);
    }

    #[test]
    fn missing_flag_file_is_error() {
        let missing = Path::new("/nonexistent/s.toml");
        let err = resolve_config_with(Some(missing), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn empty_env_value_is_ignored() {
        let resolved = resolve_config_with(None, Some(OsString::new()), None).unwrap();
        assert_eq!(resolved.source, ConfigSource::Builtin);
    }
}
