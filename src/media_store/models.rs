//! Data model for the media catalog.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One catalogued media file. The `path` is the natural key: re-inserting a
/// known path replaces the stored row instead of duplicating it.
///
/// Optional descriptive fields (`artist`, `album`, `band`, `genre`) use the
/// empty string for "not known"; they round-trip through the store as empty,
/// never as a separate null sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Surrogate key, assigned by the store. `None` until persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub track_number: u32,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    /// Performing group, when it differs from (and overrides) the artist
    /// for display purposes.
    #[serde(default)]
    pub band: String,
    #[serde(default)]
    pub genre: String,
    pub path: String,
    pub mime_type: String,
}

impl MediaRecord {
    /// A record with only the required fields set.
    pub fn new(
        title: impl Into<String>,
        track_number: u32,
        path: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        MediaRecord {
            id: None,
            title: title.into(),
            track_number,
            artist: String::new(),
            album: String::new(),
            band: String::new(),
            genre: String::new(),
            path: path.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Searchable fields of a media record.
///
/// This is a closed set mapped to fixed column names at compile time; query
/// text never selects a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaField {
    Title,
    Artist,
    Album,
    Genre,
    MimeType,
}

impl MediaField {
    /// The backing column for this field.
    pub fn column(&self) -> &'static str {
        match self {
            MediaField::Title => "title",
            MediaField::Artist => "artist",
            MediaField::Album => "album",
            MediaField::Genre => "genre",
            MediaField::MimeType => "mimetype",
        }
    }
}

/// How a search term is matched against a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Field starts with the term.
    Prefix,
    /// Field ends with the term.
    Suffix,
    /// Field equals the term.
    Exact,
    /// Field contains the term anywhere.
    Substring,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_empty_optionals() {
        let record = MediaRecord::new("Taxman", 1, "/music/taxman.mp3", "audio/mpeg");
        assert_eq!(record.id, None);
        assert_eq!(record.artist, "");
        assert_eq!(record.album, "");
        assert_eq!(record.band, "");
        assert_eq!(record.genre, "");
    }

    #[test]
    fn field_columns_are_fixed() {
        assert_eq!(MediaField::Title.column(), "title");
        assert_eq!(MediaField::Artist.column(), "artist");
        assert_eq!(MediaField::Album.column(), "album");
        assert_eq!(MediaField::Genre.column(), "genre");
        assert_eq!(MediaField::MimeType.column(), "mimetype");
    }

    #[test]
    fn record_serializes_without_unassigned_id() {
        let record = MediaRecord::new("Taxman", 1, "/music/taxman.mp3", "audio/mpeg");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["path"], "/music/taxman.mp3");
    }
}
