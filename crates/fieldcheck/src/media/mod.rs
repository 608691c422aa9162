//! Classification of files by extension.
//!
//! Media types (and repository models) are chosen either by a single
//! configured value applying to every file, or by an ordered list of
//! extension rules where the first matching rule wins.
//!
//! # Example
//!
//! ```
//! use fieldcheck::media::{ExtensionRule, MediaTypeConfig};
//!
//! let config = MediaTypeConfig::rule_list(vec![
//!     ExtensionRule::new("image", ["png", "jpg"]),
//!     ExtensionRule::new("video", ["mp4"]),
//! ]);
//!
//! assert_eq!(config.resolve("/tmp/photo.PNG"), "image");
//! assert_eq!(config.resolve("/tmp/archive.zip"), "file");
//! ```

use std::collections::HashSet;
use std::path::Path;

use crate::config::{Config, ExtensionMapping};
use crate::error::{FieldcheckError, Result};

/// Media type used when no rule matches a file's extension.
pub const FALLBACK_MEDIA_TYPE: &str = "file";

/// Mappings used when the configuration names no media types.
const DEFAULT_MEDIA_TYPES: &[(&str, &[&str])] = &[
    ("image", &["png", "gif", "jpg", "jpeg"]),
    ("document", &["pdf", "doc", "docx", "ppt", "pptx"]),
    ("file", &["tif", "tiff", "jp2", "zip", "tar"]),
    ("audio", &["mp3", "wav", "aac"]),
    ("video", &["mp4"]),
    ("extracted_text", &["txt"]),
];

/// A label and the extensions it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRule {
    pub label: String,
    /// Lowercased extensions without the leading dot.
    pub extensions: HashSet<String>,
}

impl ExtensionRule {
    /// Create a rule. Extensions are normalized to lowercase without a leading dot.
    pub fn new<I, S>(label: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            label: label.into(),
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Returns true if this rule lists `extension` (already normalized).
    pub fn matches(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }
}

/// How media types are assigned to files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaTypeConfig {
    /// Every file gets the same media type.
    Uniform(String),
    /// First rule listing the file's extension wins; otherwise `fallback`.
    RuleList {
        rules: Vec<ExtensionRule>,
        fallback: String,
    },
}

impl MediaTypeConfig {
    /// Build an ordered rule list with the `file` fallback.
    pub fn rule_list(rules: Vec<ExtensionRule>) -> Self {
        MediaTypeConfig::RuleList {
            rules,
            fallback: FALLBACK_MEDIA_TYPE.to_string(),
        }
    }

    /// The rule list used when nothing is configured.
    pub fn default_rules() -> Self {
        Self::rule_list(
            DEFAULT_MEDIA_TYPES
                .iter()
                .map(|(label, extensions)| ExtensionRule::new(*label, extensions.iter()))
                .collect(),
        )
    }

    /// Build from the `media_type` / `media_types` options.
    ///
    /// `media_type` takes precedence when both are set.
    pub fn from_config(config: &Config) -> Result<Self> {
        if let Some(label) = &config.media_type {
            if label.trim().is_empty() {
                return Err(FieldcheckError::Config("media_type must not be empty".to_string()));
            }
            return Ok(MediaTypeConfig::Uniform(label.clone()));
        }

        match &config.media_types {
            Some(mappings) => Ok(Self::rule_list(rules_from_mappings(mappings, "media_types")?)),
            None => Ok(Self::default_rules()),
        }
    }

    /// Media type for the file at `path`.
    pub fn resolve(&self, path: impl AsRef<Path>) -> &str {
        match self {
            MediaTypeConfig::Uniform(label) => label.as_str(),
            MediaTypeConfig::RuleList { rules, fallback } => {
                let extension = normalized_extension(path.as_ref());
                rules
                    .iter()
                    .find(|rule| rule.matches(&extension))
                    .map(|rule| rule.label.as_str())
                    .unwrap_or(fallback.as_str())
            }
        }
    }
}

/// Media type for the file at `path`.
pub fn resolve_media_type<'a>(path: impl AsRef<Path>, config: &'a MediaTypeConfig) -> &'a str {
    config.resolve(path)
}

/// How repository models are assigned to files created from a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelConfig {
    /// Every file gets the same model.
    Uniform(String),
    /// First rule listing the extension wins. A rule listing the empty
    /// extension `""` catches files no other rule lists.
    RuleList(Vec<ExtensionRule>),
}

impl ModelConfig {
    /// Build from the `model` / `models` options, if either is set.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        if let Some(model) = &config.model {
            return Ok(Some(ModelConfig::Uniform(model.clone())));
        }
        match &config.models {
            Some(mappings) => Ok(Some(ModelConfig::RuleList(rules_from_mappings(
                mappings, "models",
            )?))),
            None => Ok(None),
        }
    }

    /// Model for the file at `path`, if any rule applies.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Option<&str> {
        match self {
            ModelConfig::Uniform(model) => Some(model.as_str()),
            ModelConfig::RuleList(rules) => {
                let extension = normalized_extension(path.as_ref());
                rules
                    .iter()
                    .find(|rule| rule.matches(&extension))
                    .or_else(|| rules.iter().find(|rule| rule.matches("")))
                    .map(|rule| rule.label.as_str())
            }
        }
    }
}

/// Lowercased extension of `path` without the dot, or `""`.
pub fn normalized_extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn rules_from_mappings(mappings: &[ExtensionMapping], option: &str) -> Result<Vec<ExtensionRule>> {
    mappings
        .iter()
        .enumerate()
        .map(|(idx, mapping)| {
            let mut entries = mapping.iter();
            match (entries.next(), entries.next()) {
                (Some((label, extensions)), None) => Ok(ExtensionRule::new(label.clone(), extensions)),
                _ => Err(FieldcheckError::Config(format!(
                    "{option} entry {} must map exactly one label to a list of extensions, found {} labels",
                    idx + 1,
                    mapping.len()
                ))),
            }
        })
        .collect()
}
