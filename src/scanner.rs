//! Media file discovery.
//!
//! Walks media directories and turns every recognised file into a
//! `MediaRecord` ready for `upsert_batch`. Tags are read with lofty; a file
//! whose tags cannot be read still produces a record titled by its file
//! stem, so an unreadable header never hides a playable file from the
//! catalog.

use crate::media_store::MediaRecord;
use lofty::prelude::{ItemKey, TaggedFileExt};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Recognised extensions and the MIME type recorded for them.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("mp3", "audio/mpeg"),
    ("flac", "audio/flac"),
    ("ogg", "audio/ogg"),
    ("oga", "audio/ogg"),
    ("opus", "audio/opus"),
    ("wav", "audio/x-wav"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    ("wma", "audio/x-ms-wma"),
    ("mp4", "video/mp4"),
    ("mkv", "video/x-matroska"),
    ("webm", "video/webm"),
    ("avi", "video/x-msvideo"),
    ("mov", "video/quicktime"),
];

/// MIME type for a path, if its extension names a supported media format.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Walk `root` and produce a record for every supported media file found.
/// Unreadable directory entries are logged and skipped; discovery order is
/// not significant to the store.
pub fn scan_directory(root: &Path) -> Vec<MediaRecord> {
    let mut records = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {:?}: {}", root, e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(mime) = mime_for_path(entry.path()) else {
            continue;
        };
        records.push(record_for_file(entry.path(), mime));
    }

    info!("Discovered {} media files under {:?}", records.len(), root);
    records
}

fn record_for_file(path: &Path, mime: &'static str) -> MediaRecord {
    let fallback_title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    let mut record = MediaRecord::new(fallback_title, 0, path.to_string_lossy(), mime);

    let tagged = match lofty::read_from_path(path) {
        Ok(tagged) => tagged,
        Err(e) => {
            debug!("No readable tags in {:?}: {}", path, e);
            return record;
        }
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(title) = tag.get_string(&ItemKey::TrackTitle) {
            if !title.is_empty() {
                record.title = title.to_string();
            }
        }
        record.track_number = tag
            .get_string(&ItemKey::TrackNumber)
            .and_then(parse_track_number)
            .unwrap_or(0);
        record.artist = tag
            .get_string(&ItemKey::TrackArtist)
            .unwrap_or_default()
            .to_string();
        record.album = tag
            .get_string(&ItemKey::AlbumTitle)
            .unwrap_or_default()
            .to_string();
        // Album artist becomes the performing group, which overrides the
        // per-track artist for display.
        record.band = tag
            .get_string(&ItemKey::AlbumArtist)
            .unwrap_or_default()
            .to_string();
        record.genre = tag
            .get_string(&ItemKey::Genre)
            .unwrap_or_default()
            .to_string();
    }

    record
}

/// Track numbers often arrive as "3" or "3/12".
fn parse_track_number(text: &str) -> Option<u32> {
    text.split('/').next().unwrap_or(text).trim().parse().ok()
}
