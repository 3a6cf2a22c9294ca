use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::rewrite::LinkStyle;

/// Configuration for link rewriting.
///
/// Stored as a versioned TOML document at `.wikify/config.toml` under the
/// documentation root. Every field has a default, so a missing file or a
/// file containing only the version tag is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The substitution style used when rewriting links.
    ///
    /// `legacy` reproduces the original publishing script exactly, including
    /// its unbalanced-parenthesis output. `balanced` is the corrected form.
    pub style: LinkStyle,

    /// The file extension treated as markdown, without the leading dot.
    extension: String,

    /// Whether the traversal follows symbolic links.
    ///
    /// Defaults to `false` to avoid infinite recursion through link cycles.
    pub follow_symlinks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            style: LinkStyle::default(),
            extension: default_extension(),
            follow_symlinks: false,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or
    /// if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the markdown file extension, without the leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Sets the markdown file extension.
    ///
    /// A leading dot is stripped if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is empty after stripping.
    pub fn set_extension(&mut self, extension: &str) -> Result<(), String> {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        if extension.is_empty() {
            return Err("extension must not be empty".to_string());
        }
        self.extension = extension.to_string();
        Ok(())
    }
}

fn default_extension() -> String {
    "md".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the
/// domain type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        style: LinkStyle,

        /// The file extension treated as markdown, without the leading dot.
        #[serde(default = "default_extension")]
        extension: String,

        #[serde(default)]
        follow_symlinks: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                style,
                extension,
                follow_symlinks,
            } => Self {
                style,
                extension,
                follow_symlinks,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            style: config.style,
            extension: config.extension,
            follow_symlinks: config.follow_symlinks,
        }
    }
}
