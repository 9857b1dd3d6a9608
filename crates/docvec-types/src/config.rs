//! Configuration loading for docvec.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The config file lives at ~/.config/docvec/config.toml; CLI flags are
//! applied by the caller after loading.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::DocvecError;

/// Embedding model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// HuggingFace repository id of the embedding model
    #[serde(default = "default_model_repo")]
    pub repo_id: String,

    /// Override for the model file cache directory
    #[serde(default)]
    pub cache_dir: Option<String>,
}

fn default_model_repo() -> String {
    "intfloat/e5-large-v2".to_string()
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            repo_id: default_model_repo(),
            cache_dir: None,
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory containing source documents
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Directory containing derived embedding records
    #[serde(default = "default_embeddings_dir")]
    pub embeddings_dir: String,

    /// File extension of source documents (without the dot)
    #[serde(default = "default_doc_extension")]
    pub doc_extension: String,

    /// File extension of embedding records (without the dot)
    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Embedding model configuration
    #[serde(default)]
    pub model: ModelSettings,
}

fn default_docs_dir() -> String {
    "./docs".to_string()
}

fn default_embeddings_dir() -> String {
    "./embeddings".to_string()
}

fn default_doc_extension() -> String {
    "md".to_string()
}

fn default_artifact_extension() -> String {
    "json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            embeddings_dir: default_embeddings_dir(),
            doc_extension: default_doc_extension(),
            artifact_extension: default_artifact_extension(),
            log_level: default_log_level(),
            model: ModelSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/docvec/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (DOCVEC_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, DocvecError> {
        let config_dir = ProjectDirs::from("", "", "docvec")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("docs_dir", default_docs_dir())
            .map_err(|e| DocvecError::Config(e.to_string()))?
            .set_default("embeddings_dir", default_embeddings_dir())
            .map_err(|e| DocvecError::Config(e.to_string()))?
            .set_default("doc_extension", default_doc_extension())
            .map_err(|e| DocvecError::Config(e.to_string()))?
            .set_default("artifact_extension", default_artifact_extension())
            .map_err(|e| DocvecError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| DocvecError::Config(e.to_string()))?
            .set_default("model.repo_id", default_model_repo())
            .map_err(|e| DocvecError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: DOCVEC_DOCS_DIR, DOCVEC_LOG_LEVEL, etc.
        builder = builder.add_source(
            Environment::with_prefix("DOCVEC")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| DocvecError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| DocvecError::Config(e.to_string()))
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), DocvecError> {
        if self.docs_dir.trim().is_empty() {
            return Err(DocvecError::Config("docs_dir must not be empty".into()));
        }
        if self.embeddings_dir.trim().is_empty() {
            return Err(DocvecError::Config(
                "embeddings_dir must not be empty".into(),
            ));
        }
        for (name, ext) in [
            ("doc_extension", &self.doc_extension),
            ("artifact_extension", &self.artifact_extension),
        ] {
            if ext.is_empty() {
                return Err(DocvecError::Config(format!("{} must not be empty", name)));
            }
            if ext.contains('.') || ext.contains('/') {
                return Err(DocvecError::Config(format!(
                    "{} must be a bare extension, got {:?}",
                    name, ext
                )));
            }
        }
        Ok(())
    }

    /// Expand ~ in a configured path to the actual home directory
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                return PathBuf::from(home).join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Resolved docs directory
    pub fn docs_path(&self) -> PathBuf {
        Self::expand_path(&self.docs_dir)
    }

    /// Resolved embeddings directory
    pub fn embeddings_path(&self) -> PathBuf {
        Self::expand_path(&self.embeddings_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.doc_extension, "md");
        assert_eq!(settings.artifact_extension, "json");
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.model.repo_id, "intfloat/e5-large-v2");
    }

    #[test]
    fn test_default_settings_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_extension() {
        let settings = Settings {
            doc_extension: String::new(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let settings = Settings {
            artifact_extension: ".json".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_docs_dir() {
        let settings = Settings {
            docs_dir: "  ".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
docs_dir = "/srv/docs"
embeddings_dir = "/srv/embeddings"

[model]
repo_id = "intfloat/e5-base-v2"
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(config_path.to_str().unwrap())).unwrap();
        assert_eq!(settings.docs_dir, "/srv/docs");
        assert_eq!(settings.embeddings_dir, "/srv/embeddings");
        assert_eq!(settings.model.repo_id, "intfloat/e5-base-v2");
        // Unspecified fields fall back to defaults
        assert_eq!(settings.doc_extension, "md");
    }

    #[test]
    fn test_expand_path_passthrough() {
        assert_eq!(
            Settings::expand_path("/absolute/path"),
            PathBuf::from("/absolute/path")
        );
        assert_eq!(
            Settings::expand_path("relative/path"),
            PathBuf::from("relative/path")
        );
    }
}
