//! Lexical fallback analyzer. No model, no network: fixed keyword sets and a
//! bounded sentiment formula, used whenever no generative source is
//! configured. This is a placeholder signal generator, not a clinically
//! validated instrument.

use crate::analysis::{Analysis, Mood};

const POSITIVE_WORDS: &[&str] = &[
    "happy",
    "good",
    "great",
    "amazing",
    "wonderful",
    "excited",
    "love",
    "joy",
    "grateful",
    "blessed",
    "fantastic",
    "excellent",
];

const NEGATIVE_WORDS: &[&str] = &[
    "sad",
    "bad",
    "terrible",
    "awful",
    "hate",
    "angry",
    "depressed",
    "anxious",
    "worried",
    "stressed",
    "overwhelmed",
    "frustrated",
];

// Checked independently of the negative set; overlap is intentional.
const ANXIETY_WORDS: &[&str] = &[
    "nervous",
    "worried",
    "anxious",
    "panic",
    "fear",
    "scared",
    "overwhelmed",
    "stress",
];

const FATIGUE_WORDS: &[&str] = &["tired", "exhausted", "drained"];
const HOPE_WORDS: &[&str] = &["hope", "optimistic", "future"];

// Evaluated top-to-bottom; order fixes the output order of detected themes.
const THEME_RULES: &[(&str, &[&str])] = &[
    ("Work", &["work", "job", "boss", "colleague", "office"]),
    (
        "Relationships",
        &["family", "parent", "child", "spouse", "relationship"],
    ),
    ("Health", &["health", "doctor", "medicine", "sick"]),
    ("Finances", &["money", "financial", "bills", "budget"]),
    ("Future Planning", &["future", "goal", "plan", "dream"]),
];

fn count_matches(words: &[&str], set: &[&str]) -> usize {
    words.iter().filter(|word| set.contains(word)).count()
}

fn contains_any(words: &[&str], set: &[&str]) -> bool {
    words.iter().any(|word| set.contains(word))
}

/// Derive an Analysis directly from the input text. Always succeeds and is
/// fully deterministic.
pub fn analyze_text(text: &str) -> Analysis {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    let pos_count = count_matches(&words, POSITIVE_WORDS);
    let neg_count = count_matches(&words, NEGATIVE_WORDS);
    let anx_count = count_matches(&words, ANXIETY_WORDS);

    // Neutral text sits at 0.5, each match shifts by 0.1, bounded away from
    // the extremes so short text never scores 0 or 1.
    let sentiment = ((pos_count as f64 - neg_count as f64 + 5.0) / 10.0).clamp(0.1, 0.9);

    let mood = if sentiment >= 0.7 {
        Mood::Positive
    } else if sentiment < 0.4 {
        Mood::Negative
    } else {
        Mood::Neutral
    };

    let mut emotions = Vec::new();
    if pos_count > 0 {
        emotions.push("Happiness".to_string());
    }
    if neg_count > 0 {
        emotions.push("Sadness".to_string());
    }
    if anx_count > 0 {
        emotions.push("Anxiety".to_string());
    }
    if contains_any(&words, FATIGUE_WORDS) {
        emotions.push("Fatigue".to_string());
    }
    if contains_any(&words, HOPE_WORDS) {
        emotions.push("Hope".to_string());
    }
    if emotions.is_empty() {
        emotions.push("Calm".to_string());
    }

    let mut key_themes: Vec<String> = THEME_RULES
        .iter()
        .filter(|(_, keywords)| contains_any(&words, keywords))
        .map(|(theme, _)| theme.to_string())
        .collect();
    if key_themes.is_empty() {
        key_themes.push("Daily Life".to_string());
    }

    let mut suggestions = Vec::new();
    if sentiment < 0.5 {
        suggestions
            .push("Consider practicing deep breathing exercises when feeling overwhelmed".to_string());
        suggestions.push("Remember that difficult emotions are temporary and valid".to_string());
    }
    if anx_count > 0 {
        suggestions.push("Try the 5-4-3-2-1 grounding technique when feeling anxious".to_string());
    }
    if pos_count > 0 {
        suggestions.push("Your positive outlook is a strength - continue building on it".to_string());
    }
    // Always last, whatever else matched.
    suggestions.push(
        "Consider speaking with a mental health professional if these feelings persist".to_string(),
    );

    Analysis {
        mood,
        emotions,
        sentiment,
        key_themes,
        suggestions,
    }
}
