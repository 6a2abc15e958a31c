use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::thread_rng;
use thiserror::Error;
use tracing::info;

use crate::audio::AudioOutput;
use crate::fetch::TrackSource;
use crate::models::{Playback, Track};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Search failed: {0}")]
    Fetch(String),
    #[error("No track at index {index}; the list has {len} track(s)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("The track list is empty")]
    EmptyLibrary,
    #[error("Cannot read batch file {}: {source}", .path.display())]
    BatchRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No track is selected")]
    NothingSelected,
    #[error("Audio output error: {0}")]
    Audio(anyhow::Error),
}

/// Per-line outcome of a `batch_add` run.
#[derive(Debug)]
pub struct BatchReport {
    pub added: usize,
    pub failures: Vec<(String, SessionError)>,
}

/// Owns the track list, the cursor, and the playback state for one running
/// instance, and drives the fetch/audio collaborators. Mutated only by the
/// command loop thread.
pub struct Session {
    tracks: Vec<Track>,
    current: Option<usize>,
    playback: Playback,
    volume: u8,
    source: Box<dyn TrackSource>,
    output: Box<dyn AudioOutput>,
}

impl Session {
    pub fn new(source: Box<dyn TrackSource>, output: Box<dyn AudioOutput>, volume: u8) -> Self {
        Self {
            tracks: Vec::new(),
            current: None,
            playback: Playback::Stopped,
            volume: volume.min(100),
            source,
            output,
        }
    }

    /// Appends already-known tracks (the startup scan) without touching the
    /// cursor or the playback flag.
    pub fn preload(&mut self, tracks: Vec<Track>) {
        self.tracks.extend(tracks);
    }

    pub fn tracks(&self) -> impl Iterator<Item = (usize, &Track)> {
        self.tracks.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn now_playing(&self) -> Option<(usize, &Track)> {
        self.current
            .and_then(|index| self.tracks.get(index).map(|track| (index, track)))
    }

    /// Fetches a track by free-text query and appends it to the list. On
    /// failure the list, cursor, and playback flag are untouched.
    pub fn search(&mut self, query: &str) -> Result<&Track, SessionError> {
        let track = self
            .source
            .fetch(query)
            .map_err(|e| SessionError::Fetch(format!("{e:#}")))?;

        info!(id = %track.id, title = %track.title, "track added");
        let index = self.tracks.len();
        self.tracks.push(track);
        Ok(&self.tracks[index])
    }

    /// Runs every non-blank line of the file through `search`. A failing
    /// line is recorded and the rest of the file is still processed.
    pub fn batch_add(&mut self, path: &Path) -> Result<BatchReport, SessionError> {
        let content = fs::read_to_string(path).map_err(|source| SessionError::BatchRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut report = BatchReport {
            added: 0,
            failures: Vec::new(),
        };

        for line in content.lines() {
            let query = line.trim();
            if query.is_empty() {
                continue;
            }
            match self.search(query) {
                Ok(_) => report.added += 1,
                Err(err) => report.failures.push((query.to_string(), err)),
            }
        }

        Ok(report)
    }

    /// Points the cursor at `index` and starts playback of that track.
    /// Out-of-range indices leave all state unchanged.
    pub fn select(&mut self, index: usize) -> Result<&Track, SessionError> {
        if index >= self.tracks.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.tracks.len(),
            });
        }

        self.current = Some(index);
        self.start_current()
    }

    pub fn play(&mut self) -> Result<(), SessionError> {
        if self.current.is_none() {
            return Err(SessionError::NothingSelected);
        }
        self.output.play().map_err(SessionError::Audio)?;
        self.playback = Playback::Playing;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        if self.current.is_none() {
            return Err(SessionError::NothingSelected);
        }
        self.output.pause().map_err(SessionError::Audio)?;
        self.playback = Playback::Paused;
        Ok(())
    }

    /// Advances the cursor by one, wrapping to 0 past the end, and plays
    /// the new current track. With no selection yet, starts at 0.
    pub fn skip(&mut self) -> Result<&Track, SessionError> {
        let len = self.tracks.len();
        if len == 0 {
            return Err(SessionError::EmptyLibrary);
        }

        let next = match self.current {
            Some(index) => (index + 1) % len,
            None => 0,
        };
        self.current = Some(next);
        self.start_current()
    }

    /// `skip` in the other direction, wrapping from 0 to the end.
    pub fn skip_back(&mut self) -> Result<&Track, SessionError> {
        let len = self.tracks.len();
        if len == 0 {
            return Err(SessionError::EmptyLibrary);
        }

        let next = match self.current {
            Some(index) => (index + len - 1) % len,
            None => 0,
        };
        self.current = Some(next);
        self.start_current()
    }

    /// Reorders the list uniformly at random. The cursor keeps its numeric
    /// value, so the track it denotes may change; playback of the already
    /// loaded audio continues unaffected.
    pub fn shuffle(&mut self) {
        self.tracks.shuffle(&mut thread_rng());
    }

    /// Clamps any integer input to [0, 100], stores it, and forwards it to
    /// the audio collaborator. Returns the clamped value.
    pub fn set_volume(&mut self, level: i64) -> Result<u8, SessionError> {
        let clamped = level.clamp(0, 100) as u8;
        self.volume = clamped;
        self.output.set_volume(clamped).map_err(SessionError::Audio)?;
        Ok(clamped)
    }

    /// Stops the audio collaborator on the way out of the command loop.
    pub fn stop(&mut self) {
        let _ = self.output.stop();
        self.playback = Playback::Stopped;
    }

    fn start_current(&mut self) -> Result<&Track, SessionError> {
        let Some(index) = self.current else {
            return Err(SessionError::NothingSelected);
        };

        let track = &self.tracks[index];
        match self.output.load(track) {
            Ok(()) => {
                self.playback = Playback::Playing;
                Ok(track)
            }
            Err(e) => {
                // The selection stands; only playback failed to start.
                self.playback = Playback::Stopped;
                Err(SessionError::Audio(e))
            }
        }
    }
}
