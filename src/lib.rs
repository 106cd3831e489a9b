mod analysis;
mod companion;
mod db;
mod extractor;
mod heuristics;
mod llama;
mod logging;
mod voice;

use analysis::Analysis;
use chrono::{NaiveDate, Utc};
use db::{ChatMessage, JournalEntry, MoodEntry, Role, Store, UserSettings, VoiceAnalysis};
use extractor::ExtractionError;
use llama::{RequestMode, TogetherClient};
use serde::Serialize;
use tauri::{Manager, State};
use uuid::Uuid;

// ============ App Initialization ============

#[derive(Debug, Serialize)]
pub struct InitResult {
    pub status: String,
    /// Whether a generative source is configured; the UI shows heuristic
    /// mode otherwise.
    pub generative_available: bool,
}

#[tauri::command]
fn init_app() -> Result<InitResult, String> {
    let _ = logging::cleanup_old_logs();
    Ok(InitResult {
        status: "ready".to_string(),
        generative_available: TogetherClient::from_env().is_some(),
    })
}

// ============ Journal ============

/// Analyze journal text into the normalized record. Never errors toward the
/// UI: every failure path collapses into the Unknown fallback record, with
/// the diagnostic visible in its suggestions.
#[tauri::command]
async fn analyze_journal_entry(text: String) -> Result<Analysis, String> {
    let record = match TogetherClient::from_env() {
        Some(client) => {
            let payload = match client.complete(RequestMode::Journal, &text).await {
                Ok(raw) => extractor::extract(&raw),
                Err(e) => {
                    logging::log_error(&format!("journal analysis request failed: {}", e));
                    Err(ExtractionError::ExternalCallFailed {
                        reason: e.to_string(),
                    })
                }
            };
            analysis::build(payload)
        }
        // No generative source configured: heuristic analyzer is the default.
        None => heuristics::analyze_text(&text),
    };

    logging::log_analysis(&format!(
        "analyzed entry: mood={} sentiment={:.2} themes={}",
        record.mood.as_str(),
        record.sentiment,
        record.key_themes.len()
    ));

    Ok(record)
}

/// Raw passthrough to the generative source. The mode string from the
/// webview is validated here; the response text is returned untouched (the
/// journal command layers extraction and building on top).
#[tauri::command]
async fn generate_text(prompt: String, mode: String) -> Result<String, String> {
    let mode = RequestMode::from_str(&mode).ok_or("Invalid mode specified")?;
    let client = TogetherClient::from_env().ok_or("No generative source configured")?;
    logging::log_analysis(&format!("generate_text request, mode={}", mode.as_str()));
    client
        .complete(mode, &prompt)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
fn save_journal_entry(
    id: Option<String>,
    content: String,
    analysis: Option<Analysis>,
    store: State<'_, Store>,
) -> Result<JournalEntry, String> {
    let entry = JournalEntry {
        id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        content,
        timestamp: Utc::now(),
        analysis,
    };
    store.save_journal_entry(&entry).map_err(|e| e.to_string())?;
    logging::log_storage(&format!("saved journal entry {}", entry.id));
    Ok(entry)
}

#[tauri::command]
fn get_journal_entries(store: State<'_, Store>) -> Result<Vec<JournalEntry>, String> {
    Ok(store.journal_entries())
}

#[tauri::command]
fn delete_journal_entry(id: String, store: State<'_, Store>) -> Result<(), String> {
    store.delete_journal_entry(&id).map_err(|e| e.to_string())?;
    logging::log_storage(&format!("deleted journal entry {}", id));
    Ok(())
}

// ============ Chat ============

#[tauri::command]
async fn send_chat_message(
    content: String,
    store: State<'_, Store>,
) -> Result<ChatMessage, String> {
    let user_message = ChatMessage {
        id: Uuid::new_v4().to_string(),
        role: Role::User,
        content: content.clone(),
        timestamp: Utc::now(),
        suggestions: None,
    };
    store
        .save_chat_message(&user_message)
        .map_err(|e| e.to_string())?;

    let (reply, suggestions) = match TogetherClient::from_env() {
        Some(client) => match client.complete(RequestMode::Chat, &content).await {
            Ok(text) => (text, None),
            Err(e) => {
                logging::log_error(&format!(
                    "chat request failed, using scripted responder: {}",
                    e
                ));
                let (reply, followups) = companion::scripted_reply(&content);
                (reply, Some(followups))
            }
        },
        None => {
            let (reply, followups) = companion::scripted_reply(&content);
            (reply, Some(followups))
        }
    };

    let ai_message = ChatMessage {
        id: Uuid::new_v4().to_string(),
        role: Role::Ai,
        content: reply,
        timestamp: Utc::now(),
        suggestions,
    };
    store
        .save_chat_message(&ai_message)
        .map_err(|e| e.to_string())?;

    logging::log_chat(&format!("exchange of {} chars handled", content.len()));

    Ok(ai_message)
}

/// List the chat history; an empty history is seeded with the companion's
/// welcome message and its starter suggestions.
#[tauri::command]
fn get_chat_messages(store: State<'_, Store>) -> Result<Vec<ChatMessage>, String> {
    let messages = store.chat_messages();
    if !messages.is_empty() {
        return Ok(messages);
    }

    let welcome = ChatMessage {
        id: Uuid::new_v4().to_string(),
        role: Role::Ai,
        content: companion::WELCOME_MESSAGE.to_string(),
        timestamp: Utc::now(),
        suggestions: Some(
            companion::WELCOME_SUGGESTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
    };
    store
        .save_chat_message(&welcome)
        .map_err(|e| e.to_string())?;
    Ok(vec![welcome])
}

#[tauri::command]
fn clear_chat_messages(store: State<'_, Store>) -> Result<(), String> {
    store.clear_chat_messages().map_err(|e| e.to_string())?;
    logging::log_chat("chat history cleared");
    Ok(())
}

// ============ Voice ============

#[tauri::command]
fn analyze_voice_recording(
    sample: String,
    app_handle: tauri::AppHandle,
    store: State<'_, Store>,
) -> Result<VoiceAnalysis, String> {
    let bytes = voice::decode_sample(&sample).map_err(|e| format!("invalid audio sample: {}", e))?;
    let id = Uuid::new_v4().to_string();

    if store.user_settings().privacy.voice_retention {
        let data_dir = app_handle
            .path()
            .app_data_dir()
            .map_err(|e| e.to_string())?;
        match voice::retain_sample(&data_dir, &id, &bytes) {
            Ok(path) => logging::log_voice(&format!(
                "retained {} byte sample at {}",
                bytes.len(),
                path.display()
            )),
            Err(e) => logging::log_error(&format!("failed to retain voice sample: {}", e)),
        }
    }

    let reading = voice::simulate_reading();
    let record = VoiceAnalysis {
        id,
        timestamp: Utc::now(),
        stress_level: reading.stress_level,
        emotional_state: reading.emotional_state,
        voice_features: reading.voice_features,
        risk_factors: reading.risk_factors,
        recommendations: reading.recommendations,
    };

    store
        .save_voice_analysis(&record)
        .map_err(|e| e.to_string())?;
    logging::log_voice(&format!(
        "voice check-in: stress={} state={}",
        record.stress_level, record.emotional_state
    ));

    Ok(record)
}

#[tauri::command]
fn get_voice_analyses(store: State<'_, Store>) -> Result<Vec<VoiceAnalysis>, String> {
    Ok(store.voice_analyses())
}

#[tauri::command]
fn delete_voice_analysis(id: String, store: State<'_, Store>) -> Result<(), String> {
    store.delete_voice_analysis(&id).map_err(|e| e.to_string())
}

// ============ Mood ============

#[tauri::command]
fn save_mood_entry(
    date: Option<NaiveDate>,
    mood: i64,
    stress: i64,
    energy: i64,
    sleep: i64,
    notes: Option<String>,
    store: State<'_, Store>,
) -> Result<MoodEntry, String> {
    for (name, value) in [
        ("mood", mood),
        ("stress", stress),
        ("energy", energy),
        ("sleep", sleep),
    ] {
        if !(1..=10).contains(&value) {
            return Err(format!("{} must be between 1 and 10", name));
        }
    }

    let entry = MoodEntry {
        date: date.unwrap_or_else(|| Utc::now().date_naive()),
        mood,
        stress,
        energy,
        sleep,
        notes: notes.filter(|n| !n.trim().is_empty()),
    };
    store.save_mood_entry(&entry).map_err(|e| e.to_string())?;
    logging::log_storage(&format!("recorded mood for {}", entry.date));
    Ok(entry)
}

#[tauri::command]
fn get_mood_entries(store: State<'_, Store>) -> Result<Vec<MoodEntry>, String> {
    Ok(store.mood_entries())
}

// ============ Settings ============

#[tauri::command]
fn get_user_settings(store: State<'_, Store>) -> Result<UserSettings, String> {
    Ok(store.user_settings())
}

#[tauri::command]
fn save_user_settings(settings: UserSettings, store: State<'_, Store>) -> Result<(), String> {
    store
        .save_user_settings(&settings)
        .map_err(|e| e.to_string())?;
    logging::log_storage("user settings replaced");
    Ok(())
}

// ============ Export / Reset ============

#[derive(Debug, Serialize)]
pub struct ExportBundle {
    pub filename: String,
    pub data: serde_json::Value,
}

#[tauri::command]
fn export_all_data(store: State<'_, Store>) -> Result<ExportBundle, String> {
    let data = store.export_all();
    let filename = format!("mindscope-data-{}.json", Utc::now().format("%Y-%m-%d"));
    logging::log_storage("exported full data snapshot");
    Ok(ExportBundle { filename, data })
}

#[tauri::command]
fn reset_all_data(store: State<'_, Store>) -> Result<(), String> {
    store.reset_all().map_err(|e| e.to_string())?;
    logging::log_storage("all collections reset");
    Ok(())
}

// ============ Run ============

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            if let Err(e) = logging::init_logging() {
                eprintln!("Failed to initialize logging: {}", e);
            }

            let data_dir = app
                .path()
                .app_data_dir()
                .expect("Failed to get app data dir");
            std::fs::create_dir_all(&data_dir).expect("Failed to create app data dir");
            let store =
                Store::open(&data_dir.join("mindscope.db")).expect("Failed to open local store");
            app.manage(store);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            init_app,
            generate_text,
            analyze_journal_entry,
            save_journal_entry,
            get_journal_entries,
            delete_journal_entry,
            send_chat_message,
            get_chat_messages,
            clear_chat_messages,
            analyze_voice_recording,
            get_voice_analyses,
            delete_voice_analysis,
            save_mood_entry,
            get_mood_entries,
            get_user_settings,
            save_user_settings,
            export_all_data,
            reset_all_data,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
