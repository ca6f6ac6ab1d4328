//! On-disk configuration files (TOML, JSON or YAML).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::scenario::{Scenario, ScenarioCatalogue};
use crate::selector::{SearchStrategy, SelectorConfig};
use crate::ConfigError;

/// File format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Raw configuration file contents. Every field is optional; missing
/// fields fall back to the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TunerConfig {
    #[serde(default)]
    pub schema_version: Option<String>,
    #[serde(default)]
    pub grid_points: Option<usize>,
    #[serde(default)]
    pub strategy: Option<SearchStrategy>,
    #[serde(default)]
    pub scenarios: Option<Vec<Scenario>>,
}

impl TunerConfig {
    pub fn parse(content: &str, format: ConfigFormat, origin: &str) -> Result<Self, ConfigError> {
        let parsed: Result<Self, String> = match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ConfigError::Parse {
            path: origin.to_string(),
            message,
        })
    }

    /// Validate and split into the catalogue and selector settings.
    pub fn into_parts(self) -> Result<(ScenarioCatalogue, SelectorConfig), ConfigError> {
        if let Some(version) = &self.schema_version {
            if !tt_common::schema::is_compatible(version) {
                return Err(ConfigError::UnsupportedVersion(version.clone()));
            }
        }

        let mut selector = SelectorConfig::default();
        if let Some(points) = self.grid_points {
            selector.grid_points = points;
        }
        if let Some(strategy) = self.strategy {
            selector.strategy = strategy;
        }
        selector.validate()?;

        let catalogue = match self.scenarios {
            Some(list) => ScenarioCatalogue::new(list)?,
            None => ScenarioCatalogue::default(),
        };
        Ok((catalogue, selector))
    }
}

/// Read and parse a configuration file, picking the format from its extension.
pub fn load_config_file(path: &Path) -> Result<TunerConfig, ConfigError> {
    let format = ConfigFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    TunerConfig::parse(&content, format, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TOML_CONFIG: &str = r#"
schema_version = "1.0.0"
grid_points = 1001
strategy = "sweep"

[[scenarios]]
name = "low_safe"
assumed_prevalence = 0.005
target_fn = 0

[[scenarios]]
name = "low_optimal"
assumed_prevalence = 0.005
target_false_negatives = 1
"#;

    #[test]
    fn toml_config_parses() {
        let cfg = TunerConfig::parse(TOML_CONFIG, ConfigFormat::Toml, "inline").unwrap();
        let (catalogue, selector) = cfg.into_parts().unwrap();
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.scenarios()[1].target_false_negatives, 1);
        assert_eq!(selector.grid_points, 1001);
        assert_eq!(selector.strategy, SearchStrategy::Sweep);
    }

    #[test]
    fn yaml_config_parses() {
        let yaml = "scenarios:\n  - name: high\n    assumed_prevalence: 0.04\n    target_fn: 1\n";
        let cfg = TunerConfig::parse(yaml, ConfigFormat::Yaml, "inline").unwrap();
        let (catalogue, selector) = cfg.into_parts().unwrap();
        assert_eq!(catalogue.len(), 1);
        assert_eq!(selector, SelectorConfig::default());
    }

    #[test]
    fn empty_json_uses_defaults() {
        let cfg = TunerConfig::parse("{}", ConfigFormat::Json, "inline").unwrap();
        let (catalogue, selector) = cfg.into_parts().unwrap();
        assert_eq!(catalogue, ScenarioCatalogue::default());
        assert_eq!(selector, SelectorConfig::default());
    }

    #[test]
    fn unknown_field_is_parse_error() {
        let err = TunerConfig::parse(r#"{"grid": 3}"#, ConfigFormat::Json, "cfg.json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("cfg.json"));
    }

    #[test]
    fn incompatible_schema_version_rejected() {
        let cfg = TunerConfig {
            schema_version: Some("2.0.0".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            cfg.into_parts(),
            Err(ConfigError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn invalid_grid_rejected() {
        let cfg = TunerConfig {
            grid_points: Some(0),
            ..Default::default()
        };
        let err = cfg.into_parts().unwrap_err();
        assert!(err.to_string().contains("grid_points"));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("a.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert!(ConfigFormat::from_path(Path::new("a.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenarios.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(TOML_CONFIG.as_bytes()).unwrap();
        let cfg = load_config_file(&path).unwrap();
        assert_eq!(cfg.scenarios.unwrap().len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config_file(Path::new("/nonexistent/scenarios.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
