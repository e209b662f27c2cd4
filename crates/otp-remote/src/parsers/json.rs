//! JSON document parser
//!
//! Uses serde_json for parsing and pretty rendering.

use crate::error::{DecodeError, EncodeError};
use crate::parsers::DocumentParser;
use serde_json::Value;

/// JSON parser
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Create new JSON parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for JsonParser {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
        serde_json::from_slice(bytes)
            .map_err(|e| DecodeError::syntax("json", format!("JSON parse error: {}", e)))
    }

    fn render(&self, value: &Value) -> Result<String, EncodeError> {
        serde_json::to_string_pretty(value).map_err(|e| EncodeError::Format {
            format: "json",
            message: e.to_string(),
        })
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_parser_valid() {
        let parser = JsonParser;
        let value = parser.parse(br#"{"name": "test", "value": 42}"#).unwrap();

        assert_eq!(value, json!({"name": "test", "value": 42}));
    }

    #[test]
    fn json_parser_invalid() {
        let parser = JsonParser;
        let err = parser.parse(b"{invalid json}").unwrap_err();

        assert!(matches!(err, DecodeError::Syntax { format: "json", .. }));
    }

    #[test]
    fn json_parser_empty() {
        let parser = JsonParser;
        assert!(parser.parse(b"").is_err());
    }

    #[test]
    fn json_render_is_parseable() {
        let parser = JsonParser::new();
        let value = json!({"weeks": [{"days": []}]});

        let text = parser.render(&value).unwrap();
        assert_eq!(parser.parse(text.as_bytes()).unwrap(), value);
    }
}
