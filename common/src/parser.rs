//! Classifier response parsing
//!
//! AI CLI providers wrap their answer in prose or a fenced code block;
//! this module extracts the JSON payload and parses the suggestion.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::FALLBACK_CATEGORY;

/// Amount/category suggestion returned by the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifySuggestion {
    pub amount: f64,
    pub category_suggestion: String,
}

impl ClassifySuggestion {
    /// The recovery value used whenever classification fails:
    /// amount 0, category "Misc".
    pub fn fallback() -> Self {
        Self {
            amount: 0.0,
            category_suggestion: FALLBACK_CATEGORY.to_string(),
        }
    }
}

/// Extracts the JSON part of an AI response.
///
/// Extraction order:
/// 1. ```json ... ``` block
/// 2. raw `{...}` object
/// 3. raw `[...]` array
/// 4. error
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // length of "```json"
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    if let Some(start) = response.find('[') {
        if let Some(end) = response.rfind(']') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("no JSON found in response".into()))
}

/// Parses a classify response into a suggestion.
///
/// Missing or empty fields are normalized to the fallback values
/// (amount 0, category "Misc"); a response with no parseable JSON is an
/// error for the caller to recover from.
pub fn parse_classify_response(response: &str) -> Result<ClassifySuggestion> {
    let json_str = extract_json(response)?;
    let mut suggestion: ClassifySuggestion = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("classify JSON parse failed: {}", e)))?;

    if suggestion.category_suggestion.trim().is_empty() {
        suggestion.category_suggestion = FALLBACK_CATEGORY.to_string();
    }
    if !suggestion.amount.is_finite() || suggestion.amount < 0.0 {
        suggestion.amount = 0.0;
    }
    Ok(suggestion)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // extract_json tests
    // =============================================

    #[test]
    fn test_extract_json_with_block() {
        let response = r#"Here is the result:
```json
{"amount": 42.5, "categorySuggestion": "Petrol"}
```
Some additional text."#;

        let json = extract_json(response).unwrap();
        assert!(json.contains("amount"));
        assert!(json.contains("Petrol"));
    }

    #[test]
    fn test_extract_json_raw_object() {
        let response = r#"{"amount": 1.0, "categorySuggestion": "Toll"}"#;
        let json = extract_json(response).unwrap();
        assert_eq!(json, response);
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = r#"The receipt shows: {"amount": 9.9} — done."#;
        let json = extract_json(response).unwrap();
        assert_eq!(json, r#"{"amount": 9.9}"#);
    }

    #[test]
    fn test_extract_json_error() {
        let result = extract_json("No JSON here, just plain text.");
        assert!(result.is_err());
        if let Err(Error::Parse(msg)) = result {
            assert!(msg.contains("no JSON"));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_extract_json_empty_response() {
        assert!(extract_json("").is_err());
    }

    #[test]
    fn test_extract_json_nested_object() {
        let response = r#"{"amount": 5, "extra": {"nested": [1, 2]}}"#;
        let json = extract_json(response).unwrap();
        assert!(json.contains("nested"));
    }

    // =============================================
    // parse_classify_response tests
    // =============================================

    #[test]
    fn test_parse_classify_response() {
        let response = r#"```json
{"amount": 86.40, "categorySuggestion": "Petrol"}
```"#;

        let suggestion = parse_classify_response(response).unwrap();
        assert_eq!(suggestion.amount, 86.40);
        assert_eq!(suggestion.category_suggestion, "Petrol");
    }

    #[test]
    fn test_parse_classify_response_missing_fields() {
        let suggestion = parse_classify_response(r#"{"amount": 12.0}"#).unwrap();
        assert_eq!(suggestion.amount, 12.0);
        assert_eq!(suggestion.category_suggestion, "Misc");

        let suggestion = parse_classify_response(r#"{"categorySuggestion": "Toll"}"#).unwrap();
        assert_eq!(suggestion.amount, 0.0);
        assert_eq!(suggestion.category_suggestion, "Toll");
    }

    #[test]
    fn test_parse_classify_response_empty_category_normalized() {
        let suggestion =
            parse_classify_response(r#"{"amount": 3.0, "categorySuggestion": "  "}"#).unwrap();
        assert_eq!(suggestion.category_suggestion, "Misc");
    }

    #[test]
    fn test_parse_classify_response_negative_amount_normalized() {
        let suggestion =
            parse_classify_response(r#"{"amount": -5.0, "categorySuggestion": "Misc"}"#).unwrap();
        assert_eq!(suggestion.amount, 0.0);
    }

    #[test]
    fn test_parse_classify_response_error() {
        assert!(parse_classify_response("nothing useful").is_err());
    }

    #[test]
    fn test_fallback_value() {
        let fallback = ClassifySuggestion::fallback();
        assert_eq!(fallback.amount, 0.0);
        assert_eq!(fallback.category_suggestion, "Misc");
    }
}
