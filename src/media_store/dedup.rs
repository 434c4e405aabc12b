//! Result set deduplication.

use super::models::MediaRecord;
use std::collections::HashSet;

/// Drop later duplicates (by path) from an ordered result set, keeping the
/// first occurrence. The path-uniqueness constraint means the store should
/// never produce duplicates today, but composed filters may; result sets are
/// always passed through here before reaching a caller.
pub fn dedup_by_path(records: Vec<MediaRecord>) -> Vec<MediaRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.path.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, title: &str) -> MediaRecord {
        MediaRecord::new(title, 1, path, "audio/mpeg")
    }

    #[test]
    fn first_occurrence_wins() {
        let records = vec![
            record("/m/a.mp3", "first"),
            record("/m/b.mp3", "other"),
            record("/m/a.mp3", "second"),
        ];
        let deduped = dedup_by_path(records);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "first");
        assert_eq!(deduped[1].path, "/m/b.mp3");
    }

    #[test]
    fn order_is_preserved() {
        let records = vec![
            record("/m/c.mp3", "c"),
            record("/m/a.mp3", "a"),
            record("/m/b.mp3", "b"),
        ];
        let paths: Vec<String> = dedup_by_path(records).into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/m/c.mp3", "/m/a.mp3", "/m/b.mp3"]);
    }

    #[test]
    fn empty_input_is_fine() {
        assert!(dedup_by_path(Vec::new()).is_empty());
    }
}
