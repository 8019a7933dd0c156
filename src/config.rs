// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings come from an optional YAML file and can be overridden on the
//! command line.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File read from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "boxmark.yaml";

/// Where images come from, where results go, and the starting labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub result_dir: PathBuf,
    pub labels: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            result_dir: PathBuf::from("result"),
            labels: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` if given, else the default file when present, else the
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_yaml_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_yaml_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply command line overrides. Labels are appended.
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        result_dir: Option<PathBuf>,
        labels: Vec<String>,
    ) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(dir) = result_dir {
            self.result_dir = dir;
        }
        self.labels.extend(labels);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.result_dir, PathBuf::from("result"));
        assert!(config.labels.is_empty());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("boxmark.yaml");
        std::fs::write(&path, "data_dir: /srv/images\nlabels:\n  - cat\n  - dog\n").unwrap();

        let config = AppConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/images"));
        assert_eq!(config.result_dir, PathBuf::from("result"));
        assert_eq!(config.labels, vec!["cat", "dog"]);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        assert!(AppConfig::load(Some(&dir.path().join("nope.yaml"))).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig {
            labels: vec!["cat".to_string()],
            ..AppConfig::default()
        }
        .with_overrides(Some(PathBuf::from("imgs")), None, vec!["dog".to_string()]);

        assert_eq!(config.data_dir, PathBuf::from("imgs"));
        assert_eq!(config.result_dir, PathBuf::from("result"));
        assert_eq!(config.labels, vec!["cat", "dog"]);
    }
}
