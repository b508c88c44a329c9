//! SQLite persistence layer for normalized gamelist records.
//!
//! Caches the output of a library scan per search mode so repeat
//! listings don't have to re-walk the ROM tree. Backed by SQLite
//! (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{CacheError, clear, replace_games};
pub use queries::{CacheStats, cached_games, stats};
pub use schema::{SchemaError, open_database, open_memory};

pub use rusqlite::Connection;
