mod dedup;
mod models;
mod query;
mod schema;
mod store;
mod trait_def;

pub use dedup::dedup_by_path;
pub use models::{MatchMode, MediaField, MediaRecord};
pub use query::SearchQuery;
pub use store::{SqliteMediaStore, StoreError};
pub use trait_def::MediaStore;
