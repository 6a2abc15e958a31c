use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::config::Config;
use crate::models::Track;

/// External search-and-download collaborator. A query goes in, a playable
/// track comes out.
pub trait TrackSource {
    fn fetch(&self, query: &str) -> Result<Track>;
}

#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    #[allow(dead_code)]
    id: String,
    title: String,
    duration: Option<f64>,
    webpage_url: String,
}

pub struct YtDlpSource {
    config: Config,
}

impl YtDlpSource {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn check_dependencies() -> Result<()> {
        // Check yt-dlp
        let yt_dlp = Command::new("yt-dlp").arg("--version").output();

        if yt_dlp.is_err() {
            bail!(
                "yt-dlp is not installed. Please install it: https://github.com/yt-dlp/yt-dlp#installation"
            );
        }

        // Check ffmpeg
        let ffmpeg = Command::new("ffmpeg").arg("-version").output();

        if ffmpeg.is_err() {
            bail!("ffmpeg is not installed. Please install it: https://ffmpeg.org/download.html");
        }

        Ok(())
    }

    fn resolve(&self, target: &str) -> Result<(String, String, u64)> {
        let output = Command::new("yt-dlp")
            .args(["--dump-json", "--no-download", "--no-playlist", target])
            .output()
            .with_context(|| "Failed to run yt-dlp")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("yt-dlp failed: {stderr}");
        }

        let info: YtDlpInfo = serde_json::from_slice(&output.stdout)
            .with_context(|| "Failed to parse yt-dlp output")?;

        let duration = info.duration.unwrap_or(0.0) as u64;
        Ok((info.title, info.webpage_url, duration))
    }

    fn download(&self, title: &str, url: &str) -> Result<PathBuf> {
        let audio_dir = self.config.audio_dir();
        let format = &self.config.audio.format;
        let quality = &self.config.audio.quality;

        let safe_title = safe_file_name(title);
        let output_template = audio_dir.join(format!("{safe_title}.%(ext)s"));
        let Some(template) = output_template.to_str() else {
            bail!("Audio directory path is not valid UTF-8");
        };

        let output = Command::new("yt-dlp")
            .args([
                "-x", // Extract audio
                "--audio-format",
                format,
                "--audio-quality",
                quality,
                "--no-playlist",
                "-o",
                template,
                "--print",
                "after_move:filepath",
                url,
            ])
            .output()
            .with_context(|| "Failed to run yt-dlp")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("Download failed: {stderr}");
        }

        let file_path = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if file_path.is_empty() || !Path::new(&file_path).exists() {
            // yt-dlp versions differ in what --print emits; fall back to
            // the path the template implies
            let expected_path = audio_dir.join(format!("{safe_title}.{format}"));
            if expected_path.exists() {
                return Ok(expected_path);
            }
            bail!("Download completed but file not found");
        }

        Ok(PathBuf::from(file_path))
    }
}

impl TrackSource for YtDlpSource {
    fn fetch(&self, query: &str) -> Result<Track> {
        let target = search_target(query);
        debug!(%target, "resolving search target");

        let (title, canonical_url, duration) = self.resolve(&target)?;
        let file_path = self.download(&title, &canonical_url)?;
        debug!(path = %file_path.display(), "downloaded audio");

        Ok(Track::new(title, Some(canonical_url), duration, file_path))
    }
}

/// First YouTube search result for a free-text query, in yt-dlp's target
/// syntax.
fn search_target(query: &str) -> String {
    format!("ytsearch1:{}", query.trim())
}

fn safe_file_name(title: &str) -> String {
    let safe: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    safe.trim().to_string()
}
