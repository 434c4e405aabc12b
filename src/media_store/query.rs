//! Search query construction.
//!
//! A `SearchQuery` turns a `(field, mode, term, limit)` tuple into SQL whose
//! user-supplied parts are carried exclusively by bound parameters. The field
//! name comes from the closed `MediaField` mapping, so neither the term nor
//! the field can alter the statement's structure.

use super::models::{MatchMode, MediaField};

/// Escape character used for `LIKE` patterns.
const LIKE_ESCAPE: char = '\\';

/// A fully described search over one field of the catalog.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub field: MediaField,
    pub mode: MatchMode,
    term: String,
    limit: Option<usize>,
}

impl SearchQuery {
    /// `limit = None` is the unbounded sentinel: return everything matching.
    pub fn new(field: MediaField, mode: MatchMode, term: &str, limit: Option<usize>) -> Self {
        SearchQuery {
            field,
            mode,
            term: term.to_string(),
            limit,
        }
    }

    /// The SELECT statement for this query. Row columns follow the schema
    /// declaration order; ordering is always `track ASC, id ASC`.
    pub fn sql(&self) -> String {
        let column = self.field.column();
        let predicate = match self.mode {
            MatchMode::Exact => format!("{column} = ?1"),
            _ => format!("{column} LIKE ?1 ESCAPE '{LIKE_ESCAPE}'"),
        };
        let limit = match self.limit {
            Some(_) => " LIMIT ?2",
            None => "",
        };
        format!(
            "SELECT id, title, track, artist, album, band, genre, path, mimetype \
             FROM media_items WHERE {predicate} ORDER BY track ASC, id ASC{limit}"
        )
    }

    /// The value to bind for `?1`: the raw term for exact matches, a
    /// metacharacter-escaped `LIKE` pattern otherwise.
    pub fn bound_term(&self) -> String {
        match self.mode {
            MatchMode::Exact => self.term.clone(),
            MatchMode::Prefix => format!("{}%", escape_like(&self.term)),
            MatchMode::Suffix => format!("%{}", escape_like(&self.term)),
            MatchMode::Substring => format!("%{}%", escape_like(&self.term)),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

/// Escape `LIKE` metacharacters in a user term so it only ever matches
/// itself literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}
