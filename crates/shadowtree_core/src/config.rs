//! Mirror configuration surface.
//!
//! # Responsibility
//! - Define the recognized mirror options and their defaults.
//! - Load directory-scoped configuration from the outline document's
//!   directory.
//!
//! # Invariants
//! - Entry names are single path components; separators are rejected.
//! - An absent configuration file means defaults, never an error.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory-scoped configuration file name.
pub const CONFIG_FILE_NAME: &str = ".shadowtree.json";

/// Default name of the symlinks subdirectory inside a physical
/// attachment directory.
pub const DEFAULT_SYMLINKS_DIR: &str = ".tree.symlinks";

/// Default name of the data-symlink entry inside a symlinks directory.
pub const DEFAULT_DATA_LINK: &str = "_data";

/// Result type used by configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors from configuration loading and validation.
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file exists but cannot be read.
    Io { path: PathBuf, source: io::Error },
    /// Configuration file content is not valid JSON for `MirrorConfig`.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// An entry name is empty or not a single path component.
    InvalidName { field: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "cannot parse config `{}`: {source}", path.display())
            }
            Self::InvalidName { field, value } => {
                write!(f, "config field `{field}` must be a single path component, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidName { .. } => None,
        }
    }
}

/// Recognized mirror options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Name of the symlinks subdirectory inside each physical
    /// attachment directory.
    #[serde(default = "default_symlinks_dir")]
    pub symlinks_dir: String,
    /// Name of the data-symlink entry pointing at the physical
    /// attachment directory.
    #[serde(default = "default_data_link")]
    pub data_link: String,
    /// Root mirror location. When unset, the outline document's own
    /// directory is used.
    #[serde(default)]
    pub mirror_root: Option<PathBuf>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            symlinks_dir: default_symlinks_dir(),
            data_link: default_data_link(),
            mirror_root: None,
        }
    }
}

impl MirrorConfig {
    /// Loads configuration scoped to `document_dir`.
    ///
    /// Reads `CONFIG_FILE_NAME` from the directory; an absent file yields
    /// defaults. A present but unreadable or malformed file is an error.
    pub fn load_for(document_dir: &Path) -> ConfigResult<Self> {
        let path = document_dir.join(CONFIG_FILE_NAME);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        let config: Self = serde_json::from_str(&content)
            .map_err(|source| ConfigError::Parse { path, source })?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the effective mirror root for an outline document living
    /// in `document_dir`.
    pub fn root_for(&self, document_dir: &Path) -> PathBuf {
        self.mirror_root
            .clone()
            .unwrap_or_else(|| document_dir.to_path_buf())
    }

    /// Validates entry names as safe single path components.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_component("symlinks_dir", &self.symlinks_dir)?;
        validate_component("data_link", &self.data_link)?;
        Ok(())
    }
}

fn validate_component(field: &'static str, value: &str) -> ConfigResult<()> {
    let is_component = !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains(['/', '\\']);
    if is_component {
        Ok(())
    } else {
        Err(ConfigError::InvalidName {
            field,
            value: value.to_string(),
        })
    }
}

fn default_symlinks_dir() -> String {
    DEFAULT_SYMLINKS_DIR.to_string()
}

fn default_data_link() -> String {
    DEFAULT_DATA_LINK.to_string()
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, MirrorConfig, CONFIG_FILE_NAME, DEFAULT_DATA_LINK, DEFAULT_SYMLINKS_DIR};
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn defaults_match_documented_names() {
        let config = MirrorConfig::default();
        assert_eq!(config.symlinks_dir, DEFAULT_SYMLINKS_DIR);
        assert_eq!(config.data_link, DEFAULT_DATA_LINK);
        assert!(config.mirror_root.is_none());
        config.validate().expect("defaults should validate");
    }

    #[test]
    fn absent_file_yields_defaults() {
        let tmp = tempfile::tempdir().expect("temp dir should be creatable");
        let config = MirrorConfig::load_for(tmp.path()).expect("load should succeed");
        assert_eq!(config, MirrorConfig::default());
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let tmp = tempfile::tempdir().expect("temp dir should be creatable");
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"{ "mirror_root": "/srv/mirror" }"#,
        )
        .expect("config should be writable");

        let config = MirrorConfig::load_for(tmp.path()).expect("load should succeed");
        assert_eq!(config.symlinks_dir, DEFAULT_SYMLINKS_DIR);
        assert_eq!(config.mirror_root, Some(PathBuf::from("/srv/mirror")));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().expect("temp dir should be creatable");
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "{ not json")
            .expect("config should be writable");

        let err = MirrorConfig::load_for(tmp.path()).expect_err("load should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn entry_names_must_be_single_components() {
        let config = MirrorConfig {
            symlinks_dir: "links/nested".to_string(),
            ..MirrorConfig::default()
        };
        let err = config.validate().expect_err("separator should be rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidName { field: "symlinks_dir", .. }
        ));

        let config = MirrorConfig {
            data_link: String::new(),
            ..MirrorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn root_for_prefers_configured_location() {
        let config = MirrorConfig {
            mirror_root: Some(PathBuf::from("/srv/mirror")),
            ..MirrorConfig::default()
        };
        assert_eq!(
            config.root_for(&PathBuf::from("/home/user/doc")),
            PathBuf::from("/srv/mirror")
        );

        let config = MirrorConfig::default();
        assert_eq!(
            config.root_for(&PathBuf::from("/home/user/doc")),
            PathBuf::from("/home/user/doc")
        );
    }
}
