use lofty::{AudioFile, ItemKey, TaggedFileExt};
use std::path::Path;

/// Best-effort tag data for a local audio file.
pub struct FileTags {
    pub title: String,
    pub duration: u64,
}

/// Reads the primary tag of `path`. An unreadable file or a missing title
/// falls back to the file stem; an undecodable stream reports duration 0.
pub fn probe(path: &Path) -> FileTags {
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown Title")
        .to_string();
    let mut duration = 0u64;

    if let Ok(tagged) = lofty::read_from_path(path) {
        duration = tagged.properties().duration().as_secs();

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
                if !v.trim().is_empty() {
                    title = v.to_string();
                }
            }
        }
    }

    FileTags { title, duration }
}
