//! `lumen.toml`: where the palette lives and the contrast policy.
//!
//! ```toml
//! palette = "palette/palette.json"
//!
//! [[contrast.pairs]]
//! foreground = "text"
//! background = "bg"
//! min_ratio = 4.5
//!
//! [[contrast.margins]]
//! lighter = "text"
//! darker = "bg"
//! min_gap = 100
//! modes = ["dark"]
//! ```
//!
//! Every field is optional. A relative `palette` path is taken relative to
//! the directory holding the config file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::policy::{ContrastPolicy, PolicyError};

pub const DEFAULT_PALETTE: &str = "palette/palette.json";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub palette: PathBuf,
    pub contrast: ContrastPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            palette: PathBuf::from(DEFAULT_PALETTE),
            contrast: ContrastPolicy::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid contrast policy: {0}")]
    Policy(#[from] PolicyError),
}

impl Config {
    /// Parse and validate TOML text. Paths are kept as written.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Toml`] for syntax or shape errors,
    /// [`ConfigError::Policy`] for thresholds that fail validation.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.contrast.validate()?;
        Ok(config)
    }

    /// Read a config file, resolving the palette path against its directory.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] naming `path`, or anything
    /// [`from_toml`](Self::from_toml) returns.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text)?;
        if config.palette.is_relative() {
            if let Some(dir) = path.parent() {
                config.palette = dir.join(&config.palette);
            }
        }
        debug!(path = %path.display(), palette = %config.palette.display(), "config loaded");
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Any error other than the file not existing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{ChannelMargin, ContrastRequirement};
    use crate::token::{Mode, TokenKey};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_is_the_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn contrast_section_replaces_the_table() {
        let config = Config::from_toml(
            r#"
            palette = "tokens.json"

            [[contrast.pairs]]
            foreground = "onAccent"
            background = "accent"
            min_ratio = 7.0

            [[contrast.margins]]
            lighter = "text"
            darker = "bg"
            min_gap = 120
            modes = ["dark"]
            "#,
        )
        .unwrap();
        assert_eq!(config.palette, PathBuf::from("tokens.json"));
        assert_eq!(
            config.contrast.pairs,
            vec![ContrastRequirement::new(TokenKey::OnAccent, TokenKey::Accent, 7.0)]
        );
        assert_eq!(
            config.contrast.margins,
            vec![ChannelMargin::new(TokenKey::Text, TokenKey::Bg, 120.0, Mode::Dark)]
        );
    }

    #[test]
    fn omitted_margins_keep_defaults() {
        let config = Config::from_toml(
            r#"
            [contrast]
            pairs = []
            "#,
        )
        .unwrap();
        assert!(config.contrast.pairs.is_empty());
        assert_eq!(config.contrast.margins, ContrastPolicy::default().margins);
    }

    #[test]
    fn unknown_token_key_is_rejected() {
        let err = Config::from_toml(
            r#"
            [[contrast.pairs]]
            foreground = "headline"
            background = "bg"
            min_ratio = 4.5
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().contains("headline"), "{err}");
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(matches!(Config::from_toml("palettes = \"x\""), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let err = Config::from_toml(
            r#"
            [[contrast.pairs]]
            foreground = "text"
            background = "bg"
            min_ratio = 0.5
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Policy(PolicyError::RatioOutOfRange { .. })));
    }

    #[test]
    fn palette_path_is_relative_to_the_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lumen.toml");
        fs::write(&path, "palette = \"colors/palette.json\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.palette, dir.path().join("colors/palette.json"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("lumen.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(Config::load(&dir.path().join("lumen.toml")).is_err());
    }
}
