use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

use crate::analysis::Analysis;
use crate::logging;
use crate::voice::VoiceFeatures;

// Logical collection keys. Persisted data must keep serializing under
// exactly these names.
pub const JOURNAL_ENTRIES: &str = "journal_entries";
pub const VOICE_ANALYSES: &str = "voice_analyses";
pub const CHAT_MESSAGES: &str = "chat_messages";
pub const MOOD_ENTRIES: &str = "mood_entries";
pub const USER_SETTINGS: &str = "user_settings";

// ============ Records ============

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JournalEntry {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAnalysis {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub stress_level: i64,
    pub emotional_state: String,
    pub voice_features: VoiceFeatures,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Keyed by calendar date rather than an opaque id: one entry per day,
/// re-saving a date replaces it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MoodEntry {
    pub date: NaiveDate,
    pub mood: i64,
    pub stress: i64,
    pub energy: i64,
    pub sleep: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ============ Settings ============

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub daily_reminders: bool,
    pub weekly_reports: bool,
    pub crisis_alerts: bool,
    pub research_updates: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            daily_reminders: true,
            weekly_reports: true,
            crisis_alerts: true,
            research_updates: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub data_analytics: bool,
    pub voice_retention: bool,
    pub research_participation: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            data_analytics: true,
            voice_retention: false,
            research_participation: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct UserSettings {
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
}

// ============ Store ============

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistent storage unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
    #[error("failed to serialize {collection}: {source}")]
    Serialize {
        collection: &'static str,
        source: serde_json::Error,
    },
}

/// The local store: independent, homogeneous, insertion-ordered collections,
/// each serialized as one JSON document under its key in a key-value table.
/// Constructed once at startup and handed to commands as managed state; tests
/// get an in-memory instance. Single execution context by design - not safe
/// for multiple independent writers.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS collections (
                key TEXT PRIMARY KEY,
                data TEXT NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn read_slot(&self, key: &str) -> Option<String> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT data FROM collections WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .unwrap_or_else(|e| {
            logging::log_error(&format!("read of {} failed: {}", key, e));
            None
        })
    }

    fn write_slot(&self, key: &str, data: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO collections (key, data) VALUES (?1, ?2)",
            params![key, data],
        )?;
        Ok(())
    }

    /// Deserialize a collection. Absent or unreadable slots come back empty;
    /// listing is never an error.
    fn load<T: DeserializeOwned>(&self, key: &'static str) -> Vec<T> {
        let Some(raw) = self.read_slot(key) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                logging::log_error(&format!("unreadable {} collection: {}", key, e));
                Vec::new()
            }
        }
    }

    fn save_collection<T: Serialize>(
        &self,
        key: &'static str,
        items: &[T],
    ) -> Result<(), StoreError> {
        let data = serde_json::to_string(items).map_err(|source| StoreError::Serialize {
            collection: key,
            source,
        })?;
        self.write_slot(key, &data)
    }

    // ============ Journal ============

    pub fn journal_entries(&self) -> Vec<JournalEntry> {
        self.load(JOURNAL_ENTRIES)
    }

    /// Upsert by id: re-saving an existing id fully replaces that entry,
    /// otherwise the entry is appended.
    pub fn save_journal_entry(&self, entry: &JournalEntry) -> Result<(), StoreError> {
        let mut entries = self.journal_entries();
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry.clone(),
            None => entries.push(entry.clone()),
        }
        self.save_collection(JOURNAL_ENTRIES, &entries)
    }

    /// No-op when the id is absent.
    pub fn delete_journal_entry(&self, id: &str) -> Result<(), StoreError> {
        let mut entries = self.journal_entries();
        entries.retain(|e| e.id != id);
        self.save_collection(JOURNAL_ENTRIES, &entries)
    }

    // ============ Voice ============

    pub fn voice_analyses(&self) -> Vec<VoiceAnalysis> {
        self.load(VOICE_ANALYSES)
    }

    /// Append-only: id collisions are the caller's responsibility.
    pub fn save_voice_analysis(&self, analysis: &VoiceAnalysis) -> Result<(), StoreError> {
        let mut analyses = self.voice_analyses();
        analyses.push(analysis.clone());
        self.save_collection(VOICE_ANALYSES, &analyses)
    }

    pub fn delete_voice_analysis(&self, id: &str) -> Result<(), StoreError> {
        let mut analyses = self.voice_analyses();
        analyses.retain(|a| a.id != id);
        self.save_collection(VOICE_ANALYSES, &analyses)
    }

    // ============ Chat ============

    pub fn chat_messages(&self) -> Vec<ChatMessage> {
        self.load(CHAT_MESSAGES)
    }

    pub fn save_chat_message(&self, message: &ChatMessage) -> Result<(), StoreError> {
        let mut messages = self.chat_messages();
        messages.push(message.clone());
        self.save_collection(CHAT_MESSAGES, &messages)
    }

    pub fn clear_chat_messages(&self) -> Result<(), StoreError> {
        self.save_collection::<ChatMessage>(CHAT_MESSAGES, &[])
    }

    // ============ Mood ============

    pub fn mood_entries(&self) -> Vec<MoodEntry> {
        self.load(MOOD_ENTRIES)
    }

    /// Upsert by date: one entry per calendar day.
    pub fn save_mood_entry(&self, entry: &MoodEntry) -> Result<(), StoreError> {
        let mut entries = self.mood_entries();
        match entries.iter_mut().find(|e| e.date == entry.date) {
            Some(existing) => *existing = entry.clone(),
            None => entries.push(entry.clone()),
        }
        self.save_collection(MOOD_ENTRIES, &entries)
    }

    // ============ Settings ============

    /// Singleton read; built-in defaults when nothing was ever saved.
    pub fn user_settings(&self) -> UserSettings {
        let Some(raw) = self.read_slot(USER_SETTINGS) else {
            return UserSettings::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            logging::log_error(&format!("unreadable settings, using defaults: {}", e));
            UserSettings::default()
        })
    }

    /// Full replace of the stored settings object.
    pub fn save_user_settings(&self, settings: &UserSettings) -> Result<(), StoreError> {
        let data = serde_json::to_string(settings).map_err(|source| StoreError::Serialize {
            collection: USER_SETTINGS,
            source,
        })?;
        self.write_slot(USER_SETTINGS, &data)
    }

    // ============ Export / Reset ============

    /// Full snapshot of all five collections as one aggregate document.
    pub fn export_all(&self) -> serde_json::Value {
        serde_json::json!({
            "journalEntries": self.journal_entries(),
            "voiceAnalyses": self.voice_analyses(),
            "chatMessages": self.chat_messages(),
            "moodEntries": self.mood_entries(),
            "settings": self.user_settings(),
        })
    }

    pub fn reset_all(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM collections", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Mood;
    use crate::voice::{Energy, Pace, Pitch};

    fn store() -> Store {
        Store::open_in_memory().unwrap()
    }

    fn entry(id: &str, content: &str) -> JournalEntry {
        JournalEntry {
            id: id.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
            analysis: None,
        }
    }

    fn mood_entry(date: &str, mood: i64) -> MoodEntry {
        MoodEntry {
            date: date.parse().unwrap(),
            mood,
            stress: 5,
            energy: 6,
            sleep: 7,
            notes: None,
        }
    }

    #[test]
    fn test_fresh_store_lists_empty_collections() {
        let store = store();
        assert!(store.journal_entries().is_empty());
        assert!(store.voice_analyses().is_empty());
        assert!(store.chat_messages().is_empty());
        assert!(store.mood_entries().is_empty());
    }

    #[test]
    fn test_journal_entries_keep_insertion_order() {
        let store = store();
        store.save_journal_entry(&entry("a", "first")).unwrap();
        store.save_journal_entry(&entry("b", "second")).unwrap();
        let entries = store.journal_entries();
        assert_eq!(entries[0].content, "first");
        assert_eq!(entries[1].content, "second");
    }

    #[test]
    fn test_journal_resave_replaces_by_id() {
        let store = store();
        store.save_journal_entry(&entry("a", "draft")).unwrap();
        store.save_journal_entry(&entry("b", "other")).unwrap();
        store.save_journal_entry(&entry("a", "revised")).unwrap();

        let entries = store.journal_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content, "revised");
        assert_eq!(entries[0].id, "a");
    }

    #[test]
    fn test_journal_delete_missing_id_is_a_no_op() {
        let store = store();
        store.save_journal_entry(&entry("a", "kept")).unwrap();
        store.delete_journal_entry("nope").unwrap();
        assert_eq!(store.journal_entries().len(), 1);

        store.delete_journal_entry("a").unwrap();
        assert!(store.journal_entries().is_empty());
    }

    #[test]
    fn test_journal_timestamp_round_trips_as_instant() {
        let store = store();
        let mut e = entry("a", "timed");
        e.timestamp = "2026-08-07T09:30:00Z".parse().unwrap();
        e.analysis = Some(Analysis {
            mood: Mood::Positive,
            emotions: vec!["Happiness".to_string()],
            sentiment: 0.8,
            key_themes: vec!["Work".to_string()],
            suggestions: vec!["keep going".to_string()],
        });
        store.save_journal_entry(&e).unwrap();
        assert_eq!(store.journal_entries()[0], e);
    }

    #[test]
    fn test_voice_analyses_append_even_on_id_collision() {
        let store = store();
        let analysis = VoiceAnalysis {
            id: "v1".to_string(),
            timestamp: Utc::now(),
            stress_level: 45,
            emotional_state: "Calm".to_string(),
            voice_features: VoiceFeatures {
                pitch: Pitch::Normal,
                pace: Pace::Steady,
                energy: Energy::Moderate,
            },
            risk_factors: vec![],
            recommendations: vec!["Consider taking breaks throughout the day".to_string()],
        };
        store.save_voice_analysis(&analysis).unwrap();
        store.save_voice_analysis(&analysis).unwrap();
        assert_eq!(store.voice_analyses().len(), 2);

        store.delete_voice_analysis("v1").unwrap();
        assert!(store.voice_analyses().is_empty());
    }

    #[test]
    fn test_chat_messages_append_and_clear_atomically() {
        let store = store();
        for i in 0..3 {
            store
                .save_chat_message(&ChatMessage {
                    id: format!("m{}", i),
                    role: if i % 2 == 0 { Role::User } else { Role::Ai },
                    content: format!("message {}", i),
                    timestamp: Utc::now(),
                    suggestions: None,
                })
                .unwrap();
        }
        assert_eq!(store.chat_messages().len(), 3);

        store.clear_chat_messages().unwrap();
        assert!(store.chat_messages().is_empty());
    }

    #[test]
    fn test_mood_save_is_an_upsert_by_date() {
        let store = store();
        store.save_mood_entry(&mood_entry("2026-08-06", 4)).unwrap();
        store.save_mood_entry(&mood_entry("2026-08-07", 6)).unwrap();
        store.save_mood_entry(&mood_entry("2026-08-07", 9)).unwrap();

        let entries = store.mood_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].mood, 9);
        assert_eq!(entries[1].date, "2026-08-07".parse::<NaiveDate>().unwrap());
    }

    #[test]
    fn test_settings_default_until_saved_then_fully_replaced() {
        let store = store();
        let defaults = store.user_settings();
        assert!(defaults.notifications.daily_reminders);
        assert!(defaults.notifications.weekly_reports);
        assert!(defaults.notifications.crisis_alerts);
        assert!(!defaults.notifications.research_updates);
        assert!(defaults.privacy.data_analytics);
        assert!(!defaults.privacy.voice_retention);
        assert!(defaults.privacy.research_participation);

        let mut updated = defaults.clone();
        updated.privacy.voice_retention = true;
        updated.notifications.daily_reminders = false;
        store.save_user_settings(&updated).unwrap();
        assert_eq!(store.user_settings(), updated);
    }

    #[test]
    fn test_settings_serialize_with_camel_case_names() {
        let wire = serde_json::to_value(UserSettings::default()).unwrap();
        assert_eq!(wire["notifications"]["dailyReminders"], true);
        assert_eq!(wire["privacy"]["voiceRetention"], false);
    }

    #[test]
    fn test_chat_role_serializes_lowercase() {
        let message = ChatMessage {
            id: "m".to_string(),
            role: Role::Ai,
            content: "hi".to_string(),
            timestamp: Utc::now(),
            suggestions: Some(vec!["one".to_string()]),
        };
        let wire = serde_json::to_value(&message).unwrap();
        assert_eq!(wire["role"], "ai");
    }

    #[test]
    fn test_export_snapshot_carries_all_five_collections() {
        let store = store();
        store.save_journal_entry(&entry("a", "hello")).unwrap();
        store.save_mood_entry(&mood_entry("2026-08-07", 7)).unwrap();

        let snapshot = store.export_all();
        assert_eq!(snapshot["journalEntries"].as_array().unwrap().len(), 1);
        assert!(snapshot["voiceAnalyses"].as_array().unwrap().is_empty());
        assert!(snapshot["chatMessages"].as_array().unwrap().is_empty());
        assert_eq!(snapshot["moodEntries"].as_array().unwrap().len(), 1);
        assert_eq!(snapshot["settings"]["privacy"]["dataAnalytics"], true);
    }

    #[test]
    fn test_reset_empties_every_collection() {
        let store = store();
        store.save_journal_entry(&entry("a", "gone soon")).unwrap();
        store.save_user_settings(&UserSettings::default()).unwrap();
        store.reset_all().unwrap();
        assert!(store.journal_entries().is_empty());
        assert_eq!(store.user_settings(), UserSettings::default());
    }

    #[test]
    fn test_collections_are_independent() {
        let store = store();
        store.save_journal_entry(&entry("a", "journal")).unwrap();
        store.clear_chat_messages().unwrap();
        assert_eq!(store.journal_entries().len(), 1);
    }
}
