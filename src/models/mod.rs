use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Track {
    pub id: Uuid,
    pub title: String,
    pub url: Option<String>,
    pub file_path: PathBuf,
    pub duration: u64,
    pub added_at: DateTime<Utc>,
}

impl Track {
    pub fn new(title: String, url: Option<String>, duration: u64, file_path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            url,
            file_path,
            duration,
            added_at: Utc::now(),
        }
    }

    pub fn format_duration(&self) -> String {
        let minutes = self.duration / 60;
        let seconds = self.duration % 60;
        format!("{minutes}:{seconds:02}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Playback {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl std::fmt::Display for Playback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Playback::Stopped => write!(f, "stopped"),
            Playback::Playing => write!(f, "playing"),
            Playback::Paused => write!(f, "paused"),
        }
    }
}
