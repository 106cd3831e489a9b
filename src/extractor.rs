//! Extraction of the structured analysis payload from raw model output.
//!
//! The journaling prompt asks the model for a bare JSON object, but real
//! responses routinely arrive wrapped in prose, markdown fences, or with
//! sloppy punctuation. The extractor slices the first `{` .. last `}` region
//! and runs three textual repair passes before parsing.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("No JSON object found in model response")]
    NoPayloadFound { raw: String },
    #[error("Model response could not be parsed as JSON")]
    MalformedPayload { raw: String, repaired: String },
    #[error("Language model request failed: {reason}")]
    ExternalCallFailed { reason: String },
}

impl ExtractionError {
    /// Human-readable diagnostics for the fallback record: the error reason
    /// first, then the raw text when we have it.
    pub fn into_diagnostics(self) -> Vec<String> {
        let reason = self.to_string();
        match self {
            ExtractionError::NoPayloadFound { raw } => vec![reason, raw],
            ExtractionError::MalformedPayload { raw, .. } => vec![reason, raw],
            ExtractionError::ExternalCallFailed { .. } => vec![reason],
        }
    }
}

// Trailing separators immediately before a closing bracket/brace: `, }` -> `}`
static TRAILING_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r",(\s*[}\]])").unwrap());
// Bare field names before a colon: `{mood:` -> `{ "mood":`
static BARE_KEYS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([{,])\s*([A-Za-z0-9_]+)\s*:").unwrap());

/// Locate and parse the embedded payload in `raw`.
///
/// Pure and deterministic: identical input text always yields the identical
/// result. No field validation happens here; that is the builder's job.
pub fn extract(raw: &str) -> Result<serde_json::Value, ExtractionError> {
    let (start, end) = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => (start, end),
        _ => {
            return Err(ExtractionError::NoPayloadFound {
                raw: raw.to_string(),
            })
        }
    };

    let repaired = repair(&raw[start..=end]);

    match serde_json::from_str(&repaired) {
        Ok(value) => Ok(value),
        Err(_) => Err(ExtractionError::MalformedPayload {
            raw: raw.to_string(),
            repaired,
        }),
    }
}

/// The three repair passes, applied in order on the sliced text.
fn repair(slice: &str) -> String {
    let no_trailing = TRAILING_SEPARATORS.replace_all(slice, "${1}");
    let quoted_keys = BARE_KEYS.replace_all(&no_trailing, "${1} \"${2}\":");
    quoted_keys.replace('\'', "\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_payload_surrounded_by_prose() {
        let raw = "Here you go: {\"mood\": \"Negative\", \"emotions\": [\"sad\"], \"sentiment\": 0.2, \"keyThemes\": [\"Health\"], \"suggestions\": [\"rest\"]} Hope that helps!";
        let value = extract(raw).unwrap();
        assert_eq!(value["mood"], json!("Negative"));
        assert_eq!(value["emotions"], json!(["sad"]));
        assert_eq!(value["sentiment"], json!(0.2));
        assert_eq!(value["keyThemes"], json!(["Health"]));
        assert_eq!(value["suggestions"], json!(["rest"]));
    }

    #[test]
    fn test_repairs_unquoted_keys_single_quotes_and_trailing_commas() {
        let raw = "Sure! {mood: 'Positive', sentiment: 0.8,} Enjoy.";
        let value = extract(raw).unwrap();
        assert_eq!(value["mood"], json!("Positive"));
        assert_eq!(value["sentiment"], json!(0.8));
    }

    #[test]
    fn test_repairs_trailing_comma_inside_arrays() {
        let raw = "{\"emotions\": [\"calm\", \"hopeful\",], \"mood\": \"Neutral\", \"sentiment\": 0.5}";
        let value = extract(raw).unwrap();
        assert_eq!(value["emotions"], json!(["calm", "hopeful"]));
    }

    #[test]
    fn test_no_braces_is_no_payload_found() {
        let raw = "I'm not able to help with that.";
        match extract(raw) {
            Err(ExtractionError::NoPayloadFound { raw: carried }) => {
                assert_eq!(carried, raw);
            }
            other => panic!("expected NoPayloadFound, got {:?}", other),
        }
    }

    #[test]
    fn test_closing_brace_before_opening_brace_is_no_payload_found() {
        assert!(matches!(
            extract("} nothing useful {"),
            Err(ExtractionError::NoPayloadFound { .. })
        ));
    }

    #[test]
    fn test_unparseable_slice_is_malformed_and_carries_both_texts() {
        let raw = "result: {mood: Positive, sentiment: high}";
        match extract(raw) {
            Err(ExtractionError::MalformedPayload { raw: carried, repaired }) => {
                assert_eq!(carried, raw);
                assert!(repaired.contains("\"mood\""));
            }
            other => panic!("expected MalformedPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let raw = "note {mood: 'Neutral', sentiment: 0.5} note";
        assert_eq!(extract(raw), extract(raw));
    }

    #[test]
    fn test_adversarial_inputs_do_not_panic() {
        // Braces inside quoted values and nested malformed structures can
        // yield wrong-but-parseable output; we only assert no crash.
        let inputs = [
            "{\"mood\": \"odd } value\", \"sentiment\": 0.4}",
            "{{{{}}}}",
            "{'a': {'b': [1,2,,]}}",
            "{:}",
            "{}",
            "prefix { \"sentiment\": } suffix",
            "{\u{1F600}: 'emoji key'}",
        ];
        for input in inputs {
            let _ = extract(input);
        }
    }
}
