//! Document parsers for the supported wire formats
//!
//! Every format parses into a [`serde_json::Value`] tree first and typed
//! decoding runs on that tree, so a type decodes the same way whether it
//! arrived as JSON or YAML.

use crate::error::{DecodeError, EncodeError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::path::Path;

mod json;
mod yaml;

pub use json::JsonParser;
pub use yaml::YamlParser;

/// Parser trait for converting raw bytes into a value tree
///
/// Implement this trait to add support for new wire formats.
pub trait DocumentParser: Send + Sync + 'static {
    /// Format name used in error messages
    fn name(&self) -> &'static str;

    /// Parse bytes into a value tree
    fn parse(&self, bytes: &[u8]) -> Result<Value, DecodeError>;

    /// Render a value tree as text
    fn render(&self, value: &Value) -> Result<String, EncodeError>;

    /// Supported file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Check if this parser can handle the given path
    fn can_parse(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().iter().any(|known| known.eq_ignore_ascii_case(ext)))
    }
}

/// Wire format of a decoding session
///
/// One format is chosen per session and reused for every fetched document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// JSON documents
    #[default]
    Json,
    /// YAML documents (a superset of JSON)
    Yaml,
}

impl DocumentFormat {
    /// All supported formats
    pub const ALL: [Self; 2] = [Self::Json, Self::Yaml];

    /// Parser for this format
    #[must_use]
    pub fn parser(self) -> &'static dyn DocumentParser {
        match self {
            Self::Json => &JsonParser,
            Self::Yaml => &YamlParser,
        }
    }

    /// Format for a file extension
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| {
            format
                .parser()
                .extensions()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
    }

    /// Format for a file path
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.parser().can_parse(path))
    }

    /// Decode bytes into a typed value
    ///
    /// # Errors
    /// [`DecodeError::Syntax`] for malformed input, [`DecodeError::Schema`]
    /// when the tree does not match `T`.
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T, DecodeError> {
        let value = self.parser().parse(bytes)?;
        serde_json::from_value(value).map_err(|e| DecodeError::Schema(e.to_string()))
    }

    /// Encode a typed value as text
    ///
    /// # Errors
    /// [`EncodeError::Format`] if the value cannot be represented.
    pub fn encode<T: Serialize>(self, value: &T) -> Result<String, EncodeError> {
        let parser = self.parser();
        let tree = serde_json::to_value(value).map_err(|e| EncodeError::Format {
            format: parser.name(),
            message: e.to_string(),
        })?;
        parser.render(&tree)
    }
}

impl Display for DocumentFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.parser().name())
    }
}
