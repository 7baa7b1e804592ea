//! Color palette for rendered scenes
//!
//! Rendering refers to colors by token (`block-fill`, `ramp-stroke`, ...).
//! A stylesheet maps those tokens to concrete values and can be loaded from
//! TOML so scenes can be re-themed without touching the renderer.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A stylesheet mapping color tokens to concrete values
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Color mappings: token name -> color
    pub colors: BTreeMap<String, String>,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Default graybox palette
const DEFAULT_PALETTE: [(&str, &str); 7] = [
    ("background", "#ffffff"),
    ("grid-line", "#e6e6e6"),
    ("block-fill", "#d0d0d0"),
    ("block-stroke", "#404040"),
    ("ramp-fill", "#f2d49b"),
    ("ramp-stroke", "#8a6d3b"),
    ("label-text", "#1a1a1a"),
];

/// Used when a token is unknown to both the stylesheet and the default palette
const FALLBACK_COLOR: &str = "#333333";

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors: parsed.colors,
        })
    }

    /// Resolve a color token to a concrete value
    ///
    /// Returns None if the token is not defined in this stylesheet.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Resolve a token, falling back to the default palette
    pub fn resolve_or_default(&self, token: &str) -> String {
        if let Some(color) = self.resolve(token) {
            return color.to_string();
        }
        DEFAULT_PALETTE
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, color)| color.to_string())
            .unwrap_or_else(|| FALLBACK_COLOR.to_string())
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            name: Some("graybox".to_string()),
            description: None,
            colors: DEFAULT_PALETTE
                .iter()
                .map(|(token, color)| (token.to_string(), color.to_string()))
                .collect(),
        }
    }
}
