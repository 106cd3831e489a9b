// Simulated voice analysis. The recorded sample is decoded and (optionally)
// retained, but the reading itself is random-but-realistic placeholder
// signal, not acoustics.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pitch {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pace {
    Slow,
    Steady,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Energy {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceFeatures {
    pub pitch: Pitch,
    pub pace: Pace,
    pub energy: Energy,
}

const PITCHES: [Pitch; 3] = [Pitch::Low, Pitch::Normal, Pitch::High];
const PACES: [Pace; 3] = [Pace::Slow, Pace::Steady, Pace::Fast];
const ENERGIES: [Energy; 3] = [Energy::Low, Energy::Moderate, Energy::High];

const EMOTIONAL_STATES: [&str; 6] = [
    "Calm",
    "Slightly Stressed",
    "Anxious",
    "Relaxed",
    "Energetic",
    "Tired",
];

/// One simulated reading, before it is stamped with an id and timestamp and
/// persisted as a VoiceAnalysis.
#[derive(Debug, Clone)]
pub struct VoiceReading {
    pub stress_level: i64,
    pub emotional_state: String,
    pub voice_features: VoiceFeatures,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Draw a reading. Stress stays in the 20-79 band so the simulation never
/// claims a perfectly calm or maximally distressed voice.
pub fn simulate_reading() -> VoiceReading {
    let mut rng = rand::rng();

    let stress_level = rng.random_range(20..80);
    let emotional_state = EMOTIONAL_STATES[rng.random_range(0..EMOTIONAL_STATES.len())].to_string();
    let voice_features = VoiceFeatures {
        pitch: PITCHES[rng.random_range(0..PITCHES.len())],
        pace: PACES[rng.random_range(0..PACES.len())],
        energy: ENERGIES[rng.random_range(0..ENERGIES.len())],
    };

    let (risk_factors, recommendations) = assess(stress_level, &voice_features);

    VoiceReading {
        stress_level,
        emotional_state,
        voice_features,
        risk_factors,
        recommendations,
    }
}

/// Deterministic rules over the drawn features.
pub fn assess(stress_level: i64, features: &VoiceFeatures) -> (Vec<String>, Vec<String>) {
    let mut risk_factors = Vec::new();
    if stress_level > 60 {
        risk_factors.push("Elevated stress levels detected".to_string());
    }
    if features.pace == Pace::Fast {
        risk_factors.push("Rapid speech patterns may indicate anxiety".to_string());
    }
    if features.energy == Energy::Low {
        risk_factors.push("Low energy levels detected".to_string());
    }

    let mut recommendations = Vec::new();
    if stress_level < 40 {
        recommendations.push("Your voice indicates good emotional stability".to_string());
        recommendations.push("Continue with current stress management practices".to_string());
    } else {
        recommendations.push("Consider taking breaks throughout the day".to_string());
        recommendations.push("Practice relaxation techniques like deep breathing".to_string());
    }
    if features.energy == Energy::Low {
        recommendations.push("Ensure you're getting adequate sleep and nutrition".to_string());
    }

    (risk_factors, recommendations)
}

/// Decode the base64 sample the webview recorded.
pub fn decode_sample(sample_b64: &str) -> Result<Vec<u8>, base64::DecodeError> {
    BASE64.decode(sample_b64.trim())
}

/// Write the raw sample under `<data_dir>/voice/`. Only called when the
/// privacy voice-retention toggle is on.
pub fn retain_sample(data_dir: &Path, id: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    let voice_dir = data_dir.join("voice");
    fs::create_dir_all(&voice_dir)?;
    let path = voice_dir.join(format!("{}.webm", id));
    fs::write(&path, bytes)?;
    Ok(path)
}
