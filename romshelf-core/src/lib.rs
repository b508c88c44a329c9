//! Core engine for browsing EmulationStation-style ROM collections.
//!
//! Walks a collection root (one console folder per system, each carrying a
//! `gamelist.xml`), normalizes the entries into display-ready records, and
//! applies a search mode: the flagged favorites, or the most recently added
//! ROMs. Bad files and bad fields degrade softly with a logged skip or a
//! documented default; the only hard failure is a missing collection root.

pub mod error;
pub mod gamelist;
pub mod normalize;
pub mod platform_map;
pub mod scanner;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use error::GamelistError;
pub use gamelist::{RawGame, parse_gamelist};
pub use normalize::normalize;
pub use platform_map::PlatformMap;
pub use scanner::{GamelistFile, GamelistWalker, scan_gamelists};

/// Maximum number of records returned in latest mode.
pub const LATEST_LIMIT: usize = 25;

/// A fully normalized game entry, ready for display.
///
/// Every string field is populated; fields the gamelist left out carry the
/// documented "Unknown ..." defaults instead of being optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub name: String,
    pub description: String,
    /// Rating in the 0.0..=1.0 range EmulationStation uses; 0.0 when absent
    /// or unparseable.
    pub rating: f32,
    /// Four-digit release year, or "Unknown".
    pub year: String,
    pub genre: String,
    pub developer: String,
    /// Display label derived from the console folder name.
    pub platform: String,
    pub thumbnail: Option<PathBuf>,
    pub fanart: Option<PathBuf>,
    /// Resolved on-disk ROM path. Entries whose ROM is missing are dropped
    /// during normalization, so this existed at scan time.
    pub path: PathBuf,
    /// ROM file modification time, seconds since the Unix epoch.
    pub last_modified: i64,
}

/// Which slice of the collection to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    /// Games flagged favorite in their gamelist. No cap.
    Favorites,
    /// The most recently modified ROMs across the whole collection,
    /// capped at [`LATEST_LIMIT`].
    Latest,
}

impl SearchMode {
    /// Canonical lowercase name, used for CLI args and cache tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::Latest => "latest",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string cannot be parsed into a `SearchMode`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown search mode: '{0}'")]
pub struct SearchModeParseError(pub String);

impl std::str::FromStr for SearchMode {
    type Err = SearchModeParseError;

    /// Parse a mode name (case-insensitive). Accepts the British spelling
    /// of favorites, matching the gamelist tag tolerance.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "favorites" | "favourites" => Ok(Self::Favorites),
            "latest" => Ok(Self::Latest),
            _ => Err(SearchModeParseError(s.to_string())),
        }
    }
}

/// List games under `root` according to `mode`.
///
/// Walks every console folder for gamelists, parses and normalizes each
/// one, and merges the results. Unreadable, empty, or malformed files are
/// logged and skipped; entries whose ROM no longer exists are dropped.
/// Latest mode sorts the merged records by modification time (newest
/// first, ties broken by path so repeated runs agree) and truncates to
/// [`LATEST_LIMIT`]; favorites mode returns everything in scan order.
///
/// The walk is deterministic, so two calls over an unchanged tree return
/// identical sequences.
pub fn list_games(
    root: &Path,
    mode: SearchMode,
    platforms: &PlatformMap,
) -> Result<Vec<GameRecord>, GamelistError> {
    if !root.is_dir() {
        return Err(GamelistError::RootNotFound(root.to_path_buf()));
    }

    let mut records: Vec<GameRecord> = Vec::new();
    for gamelist in scan_gamelists(root) {
        let file = match std::fs::File::open(&gamelist.path) {
            Ok(f) => f,
            Err(e) => {
                log::warn!("skipping {}: {}", gamelist.path.display(), e);
                continue;
            }
        };
        let raw_games = match parse_gamelist(std::io::BufReader::new(file)) {
            Ok(games) => games,
            Err(e) => {
                log::warn!(
                    "skipping malformed gamelist {}: {}",
                    gamelist.path.display(),
                    e
                );
                continue;
            }
        };
        log::debug!("{}: {} entries", gamelist.path.display(), raw_games.len());
        records.extend(
            raw_games
                .iter()
                .filter_map(|raw| normalize(raw, &gamelist.dir, mode, platforms)),
        );
    }

    if mode == SearchMode::Latest {
        records.sort_by(|a, b| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| a.path.cmp(&b.path))
        });
        records.truncate(LATEST_LIMIT);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_round_trip() {
        for mode in [SearchMode::Favorites, SearchMode::Latest] {
            let parsed: SearchMode = mode.as_str().parse().unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn mode_parsing_is_case_insensitive() {
        let parsed: SearchMode = "Latest".parse().unwrap();
        assert_eq!(parsed, SearchMode::Latest);
        let parsed: SearchMode = "FAVORITES".parse().unwrap();
        assert_eq!(parsed, SearchMode::Favorites);
    }

    #[test]
    fn mode_accepts_british_spelling() {
        let parsed: SearchMode = "favourites".parse().unwrap();
        assert_eq!(parsed, SearchMode::Favorites);
    }

    #[test]
    fn unknown_mode_returns_err() {
        let result: Result<SearchMode, _> = "newest".parse();
        assert!(result.is_err());
    }

    #[test]
    fn display_matches_canonical_name() {
        assert_eq!(SearchMode::Favorites.to_string(), "favorites");
        assert_eq!(SearchMode::Latest.to_string(), "latest");
    }
}
