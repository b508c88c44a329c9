//! Read queries for the gamelist cache.

use std::path::PathBuf;

use romshelf_core::{GameRecord, LATEST_LIMIT, SearchMode};
use rusqlite::{Connection, Row, params};

use crate::operations::CacheError;

/// Cached records for one search mode, in presentation order.
///
/// Favorites come back in the order they were stored. Latest additions
/// come back newest first, capped at [`LATEST_LIMIT`].
pub fn cached_games(conn: &Connection, mode: SearchMode) -> Result<Vec<GameRecord>, CacheError> {
    match mode {
        SearchMode::Favorites => {
            let mut stmt = conn.prepare(
                "SELECT name, description, rating, year, genre, developer, platform,
                        thumbnail, fanart, path, last_modified
                 FROM games WHERE search_mode = ?1 ORDER BY position",
            )?;
            let rows = stmt.query_map(params![mode.as_str()], row_to_record)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        }
        SearchMode::Latest => {
            let mut stmt = conn.prepare(
                "SELECT name, description, rating, year, genre, developer, platform,
                        thumbnail, fanart, path, last_modified
                 FROM games WHERE search_mode = ?1
                 ORDER BY last_modified DESC, path LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![mode.as_str(), LATEST_LIMIT as i64], row_to_record)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        }
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<GameRecord> {
    Ok(GameRecord {
        name: row.get(0)?,
        description: row.get(1)?,
        rating: row.get(2)?,
        year: row.get(3)?,
        genre: row.get(4)?,
        developer: row.get(5)?,
        platform: row.get(6)?,
        thumbnail: row.get::<_, Option<String>>(7)?.map(PathBuf::from),
        fanart: row.get::<_, Option<String>>(8)?.map(PathBuf::from),
        path: PathBuf::from(row.get::<_, String>(9)?),
        last_modified: row.get(10)?,
    })
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Get cached row counts for both search modes.
pub fn stats(conn: &Connection) -> Result<CacheStats, CacheError> {
    let favorites: i64 = conn.query_row(
        "SELECT COUNT(*) FROM games WHERE search_mode = ?1",
        params![SearchMode::Favorites.as_str()],
        |r| r.get(0),
    )?;
    let latest: i64 = conn.query_row(
        "SELECT COUNT(*) FROM games WHERE search_mode = ?1",
        params![SearchMode::Latest.as_str()],
        |r| r.get(0),
    )?;

    Ok(CacheStats { favorites, latest })
}

/// Cached record counts per search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub favorites: i64,
    pub latest: i64,
}
