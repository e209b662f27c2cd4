//! YAML document parser
//!
//! Uses serde_yaml. Exactly one document per input; a stream with several
//! `---` separated documents is rejected.

use crate::error::{DecodeError, EncodeError};
use crate::parsers::DocumentParser;
use serde::Deserialize;
use serde_json::Value;

/// YAML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Create new YAML parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for YamlParser {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn parse(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DecodeError::syntax("yaml", format!("invalid UTF-8: {}", e)))?;

        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(text) {
            let value = Value::deserialize(document)
                .map_err(|e| DecodeError::syntax("yaml", format!("YAML parse error: {}", e)))?;
            documents.push(value);
        }

        match documents.len() {
            0 => Err(DecodeError::Empty("yaml")),
            1 => match documents.pop() {
                Some(Value::Null) | None => Err(DecodeError::Empty("yaml")),
                Some(value) => Ok(value),
            },
            n => Err(DecodeError::Schema(format!(
                "expected a single YAML document, found {}",
                n
            ))),
        }
    }

    fn render(&self, value: &Value) -> Result<String, EncodeError> {
        serde_yaml::to_string(value).map_err(|e| EncodeError::Format {
            format: "yaml",
            message: e.to_string(),
        })
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_parser_valid() {
        let parser = YamlParser;
        let content = r#"
name: Base Plan
weeks:
  - days: []
"#;

        let value = parser.parse(content.as_bytes()).unwrap();
        assert_eq!(value, json!({"name": "Base Plan", "weeks": [{"days": []}]}));
    }

    #[test]
    fn yaml_parser_accepts_json() {
        let parser = YamlParser;
        let value = parser.parse(br#"{"work": "5 km"}"#).unwrap();
        assert_eq!(value, json!({"work": "5 km"}));
    }

    #[test]
    fn yaml_parser_empty() {
        let parser = YamlParser;
        assert_eq!(parser.parse(b"").unwrap_err(), DecodeError::Empty("yaml"));
    }

    #[test]
    fn yaml_parser_multiple_documents() {
        let parser = YamlParser;
        let err = parser.parse(b"name: a\n---\nname: b\n").unwrap_err();
        assert!(matches!(err, DecodeError::Schema(ref m) if m.contains("found 2")));
    }

    #[test]
    fn yaml_parser_invalid() {
        let parser = YamlParser;
        let err = parser.parse(b"key: [unclosed").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax { format: "yaml", .. }));
    }
}
