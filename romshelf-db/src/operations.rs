//! Write operations for the gamelist cache.

use romshelf_core::{GameRecord, SearchMode};
use rusqlite::{Connection, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Replace the cached snapshot for one search mode.
///
/// The previous snapshot for `mode` is deleted and the new records are
/// inserted in order, all within a single transaction. Records for the
/// other mode are untouched.
pub fn replace_games(
    conn: &mut Connection,
    mode: SearchMode,
    records: &[GameRecord],
) -> Result<(), CacheError> {
    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM games WHERE search_mode = ?1",
        params![mode.as_str()],
    )?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO games (path, search_mode, name, description, rating, year,
                                genre, developer, platform, thumbnail, fanart,
                                last_modified, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(path, search_mode) DO UPDATE SET
                 name = excluded.name,
                 description = excluded.description,
                 rating = excluded.rating,
                 year = excluded.year,
                 genre = excluded.genre,
                 developer = excluded.developer,
                 platform = excluded.platform,
                 thumbnail = excluded.thumbnail,
                 fanart = excluded.fanart,
                 last_modified = excluded.last_modified,
                 position = excluded.position",
        )?;
        for (position, record) in records.iter().enumerate() {
            stmt.execute(params![
                record.path.to_string_lossy(),
                mode.as_str(),
                record.name,
                record.description,
                record.rating,
                record.year,
                record.genre,
                record.developer,
                record.platform,
                record
                    .thumbnail
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                record
                    .fanart
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                record.last_modified,
                position as i64,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Delete every cached record. Returns the number of rows removed.
pub fn clear(conn: &Connection) -> Result<usize, CacheError> {
    let removed = conn.execute("DELETE FROM games", [])?;
    Ok(removed)
}
