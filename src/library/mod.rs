use std::path::Path;
use tracing::info;
use walkdir::WalkDir;

use crate::models::Track;
use crate::tags;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "flac", "ogg", "wav", "opus"];

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.iter().any(|e| *e == ext)
        })
        .unwrap_or(false)
}

/// Collects previously downloaded tracks from the audio directory so they
/// are selectable again without re-fetching. Non-recursive: the audio dir
/// is flat.
pub fn scan(dir: &Path) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    for entry in WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file() && is_audio_file(path) {
            let file_tags = tags::probe(path);
            tracks.push(Track::new(
                file_tags.title,
                None,
                file_tags.duration,
                path.to_path_buf(),
            ));
        }
    }

    tracks.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    info!(count = tracks.len(), "scanned audio directory");
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_audio_file_case_insensitive() {
        assert!(is_audio_file(Path::new("/tmp/a.mp3")));
        assert!(is_audio_file(Path::new("/tmp/a.MP3")));
        assert!(is_audio_file(Path::new("/tmp/a.flac")));
        assert!(!is_audio_file(Path::new("/tmp/a.txt")));
        assert!(!is_audio_file(Path::new("/tmp/a")));
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b side.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("Anthem.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();

        let tracks = scan(dir.path());
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].title, "Anthem");
        assert_eq!(tracks[1].title, "b side");
        assert!(tracks.iter().all(|t| t.url.is_none()));
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let tracks = scan(&dir.path().join("does-not-exist"));
        assert!(tracks.is_empty());
    }

    #[test]
    fn test_scan_ignores_subdirectories() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("top.mp3"), b"not real").unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("deep.mp3"), b"not real").unwrap();

        let tracks = scan(dir.path());
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "top");
    }
}
