use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extractor::ExtractionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Positive => "Positive",
            Mood::Negative => "Negative",
            Mood::Neutral => "Neutral",
            Mood::Unknown => "Unknown",
        }
    }

    /// Map a free-text label from the model onto the enum. Unrecognized
    /// labels become Unknown rather than failing the whole record.
    pub fn from_label(label: &str) -> Mood {
        match label.to_lowercase().as_str() {
            "positive" => Mood::Positive,
            "negative" => Mood::Negative,
            "neutral" => Mood::Neutral,
            _ => Mood::Unknown,
        }
    }
}

/// The normalized output of text analysis. Always fully populated: every
/// failure upstream collapses into the Unknown fallback, never into a
/// partially-filled record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub mood: Mood,
    pub emotions: Vec<String>,
    pub sentiment: f64,
    #[serde(rename = "keyThemes")]
    pub key_themes: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Analysis {
    /// The canonical fallback record. `diagnostics` surfaces in the
    /// suggestions field so the failure is visible in-place in the UI.
    pub fn unknown(diagnostics: Vec<String>) -> Self {
        Analysis {
            mood: Mood::Unknown,
            emotions: Vec::new(),
            sentiment: 0.5,
            key_themes: Vec::new(),
            suggestions: diagnostics,
        }
    }
}

/// Validate and default an extracted payload into an Analysis.
///
/// Total over its input: an extraction error or a shape-invalid payload
/// produces the Unknown fallback, so callers never special-case a failure.
pub fn build(payload: Result<Value, ExtractionError>) -> Analysis {
    let value = match payload {
        Ok(value) => value,
        Err(err) => return Analysis::unknown(err.into_diagnostics()),
    };

    let Some(object) = value.as_object() else {
        return Analysis::unknown(vec!["Model payload was not a JSON object".to_string()]);
    };

    let Some(mood) = object.get("mood").and_then(Value::as_str) else {
        return Analysis::unknown(vec![
            "Model payload is missing a textual mood field".to_string()
        ]);
    };

    let Some(sentiment) = object.get("sentiment").and_then(Value::as_f64) else {
        return Analysis::unknown(vec![
            "Model payload is missing a numeric sentiment field".to_string(),
        ]);
    };

    Analysis {
        mood: Mood::from_label(mood),
        emotions: string_seq(object.get("emotions")),
        sentiment: sentiment.clamp(0.0, 1.0),
        key_themes: string_seq(object.get("keyThemes")),
        suggestions: string_seq(object.get("suggestions")),
    }
}

/// Absent sequences default to empty; non-string items are dropped.
fn string_seq(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
