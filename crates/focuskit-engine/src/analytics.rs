//! Fire-and-forget analytics events.
//!
//! Timers report starts, completions and laps through an [`Analytics`]
//! handle. Delivery is best-effort: a missing sink or a closed channel is
//! ignored and never affects timer state.

use crate::focus::AmbientSound;
use crate::pomodoro::Phase;
use crate::tools::ToolKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Category tag carried by every productivity event.
pub const CATEGORY: &str = "productivity";

/// An analytics event with its timer-specific metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    PomodoroStart { session_type: Phase },
    PomodoroComplete { session_type: Phase },
    StopwatchStart,
    StopwatchLap { lap_number: usize },
    CountdownStart { duration_seconds: u64, has_label: bool },
    CountdownComplete { duration_seconds: u64 },
    FocusModeStart { ambient_sound: AmbientSound, sound_volume: u8 },
    AmbientSoundChange { sound_type: AmbientSound },
    ProductivityToolSelect { tool_name: ToolKind },
}

impl AnalyticsEvent {
    /// Event name as it appears in the serialized `event` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PomodoroStart { .. } => "pomodoro_start",
            Self::PomodoroComplete { .. } => "pomodoro_complete",
            Self::StopwatchStart => "stopwatch_start",
            Self::StopwatchLap { .. } => "stopwatch_lap",
            Self::CountdownStart { .. } => "countdown_start",
            Self::CountdownComplete { .. } => "countdown_complete",
            Self::FocusModeStart { .. } => "focus_mode_start",
            Self::AmbientSoundChange { .. } => "ambient_sound_change",
            Self::ProductivityToolSelect { .. } => "productivity_tool_select",
        }
    }

    pub fn category(&self) -> &'static str {
        CATEGORY
    }
}

/// Envelope sent to the analytics collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsRecord {
    pub session_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub category: &'static str,
    #[serde(flatten)]
    pub event: AnalyticsEvent,
}

impl AnalyticsRecord {
    fn new(session_id: Uuid, event: AnalyticsEvent) -> Self {
        Self {
            session_id,
            timestamp: Utc::now(),
            category: event.category(),
            event,
        }
    }
}

/// Handle timers use to emit analytics events.
#[derive(Debug, Clone)]
pub struct Analytics {
    session_id: Uuid,
    tx: Option<mpsc::UnboundedSender<AnalyticsRecord>>,
}

impl Analytics {
    /// A handle with no collaborator attached; every event is dropped.
    pub fn disabled() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            tx: None,
        }
    }

    /// A handle paired with the receiver that collects its records.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AnalyticsRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let analytics = Self {
            session_id: Uuid::new_v4(),
            tx: Some(tx),
        };
        (analytics, rx)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Emit an event. Never fails and never blocks.
    pub fn emit(&self, event: AnalyticsEvent) {
        debug!(event = event.name(), "analytics event");
        let Some(tx) = &self.tx else {
            return;
        };
        let _ = tx.send(AnalyticsRecord::new(self.session_id, event));
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Spawn a task that appends every received record to `path` as JSON lines.
///
/// The task ends when all [`Analytics`] handles for the channel are dropped.
/// Write failures are logged and the record is skipped.
pub fn spawn_jsonl_recorder(
    mut rx: mpsc::UnboundedReceiver<AnalyticsRecord>,
    path: PathBuf,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(record) = rx.recv().await {
            if let Err(e) = append_record(&path, &record).await {
                warn!(path = %path.display(), error = %e, "failed to record analytics event");
            }
        }
    })
}

async fn append_record(path: &Path, record: &AnalyticsRecord) -> Result<(), AnalyticsError> {
    let mut line = serde_json::to_string(record).map_err(AnalyticsError::Serialize)?;
    line.push('\n');

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// Errors that can occur while recording analytics.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// I/O error writing the record file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error serializing a record.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_match_serialized_tag() {
        let events = [
            AnalyticsEvent::PomodoroStart {
                session_type: Phase::Work,
            },
            AnalyticsEvent::StopwatchStart,
            AnalyticsEvent::StopwatchLap { lap_number: 3 },
            AnalyticsEvent::CountdownComplete {
                duration_seconds: 300,
            },
            AnalyticsEvent::ProductivityToolSelect {
                tool_name: ToolKind::Focus,
            },
        ];
        for event in events {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["event"], event.name());
            assert_eq!(event.category(), "productivity");
        }
    }

    #[test]
    fn test_record_serialization() {
        let record = AnalyticsRecord::new(
            Uuid::nil(),
            AnalyticsEvent::CountdownStart {
                duration_seconds: 300,
                has_label: true,
            },
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["event"], "countdown_start");
        assert_eq!(value["category"], "productivity");
        assert_eq!(value["duration_seconds"], 300);
        assert_eq!(value["has_label"], true);
    }

    #[test]
    fn test_session_type_serializes_lowercase() {
        let event = AnalyticsEvent::PomodoroComplete {
            session_type: Phase::Break,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""session_type":"break""#));
    }

    #[test]
    fn test_disabled_emit_is_silent() {
        let analytics = Analytics::disabled();
        assert!(!analytics.is_enabled());
        analytics.emit(AnalyticsEvent::StopwatchStart);
    }

    #[test]
    fn test_channel_delivers_in_order() {
        let (analytics, mut rx) = Analytics::channel();
        analytics.emit(AnalyticsEvent::StopwatchStart);
        analytics.emit(AnalyticsEvent::StopwatchLap { lap_number: 1 });

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!(first.event, AnalyticsEvent::StopwatchStart);
        assert_eq!(second.event, AnalyticsEvent::StopwatchLap { lap_number: 1 });
        assert_eq!(first.session_id, analytics.session_id());
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (analytics, rx) = Analytics::channel();
        drop(rx);
        analytics.emit(AnalyticsEvent::StopwatchStart);
    }

    #[tokio::test]
    async fn test_jsonl_recorder_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("analytics.jsonl");

        let (analytics, rx) = Analytics::channel();
        let task = spawn_jsonl_recorder(rx, path.clone());
        analytics.emit(AnalyticsEvent::StopwatchStart);
        analytics.emit(AnalyticsEvent::StopwatchLap { lap_number: 1 });
        drop(analytics);
        task.await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("stopwatch_start"));
        assert!(lines[1].contains(r#""lap_number":1"#));
    }
}
