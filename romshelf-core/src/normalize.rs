//! Normalization of raw gamelist entries into display-ready records.
//!
//! This is where policy lives: favorites filtering, per-field defaults,
//! year extraction, folder-derived platform labels, path resolution, and
//! the on-disk existence check that drops stale entries.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::gamelist::RawGame;
use crate::platform_map::PlatformMap;
use crate::{GameRecord, SearchMode};

pub const DEFAULT_NAME: &str = "Unknown Game";
pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub const DEFAULT_GENRE: &str = "Unknown Genre";
pub const DEFAULT_DEVELOPER: &str = "Unknown Developer";
pub const DEFAULT_YEAR: &str = "Unknown";

/// Convert one raw entry into a display-ready record.
///
/// Returns `None` when the entry is filtered out (non-favorite in
/// favorites mode) or dropped (no ROM path, or the resolved ROM no longer
/// exists on disk). Field-level problems never drop an entry; they fall
/// back to the documented defaults.
pub fn normalize(
    raw: &RawGame,
    gamelist_dir: &Path,
    mode: SearchMode,
    platforms: &PlatformMap,
) -> Option<GameRecord> {
    if mode == SearchMode::Favorites && !is_favorite(raw) {
        return None;
    }

    let rom_path = match raw.path.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => resolve_path(p, gamelist_dir),
        _ => {
            log::debug!(
                "dropping entry without a ROM path in {}",
                gamelist_dir.display()
            );
            return None;
        }
    };

    // One stat call answers both existence and recency.
    let last_modified = match std::fs::metadata(&rom_path) {
        Ok(meta) => mtime_epoch(&meta),
        Err(_) => {
            log::debug!("dropping {}: ROM file not found", rom_path.display());
            return None;
        }
    };

    let folder = gamelist_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    Some(GameRecord {
        name: text_or(raw.name.as_deref(), DEFAULT_NAME),
        description: text_or(raw.desc.as_deref(), DEFAULT_DESCRIPTION),
        rating: raw
            .rating
            .as_deref()
            .and_then(|r| r.trim().parse::<f32>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(0.0),
        year: raw
            .releasedate
            .as_deref()
            .map(str::trim)
            .and_then(|d| d.get(..4))
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_YEAR.to_string()),
        genre: text_or(raw.genre.as_deref(), DEFAULT_GENRE),
        developer: text_or(raw.developer.as_deref(), DEFAULT_DEVELOPER),
        platform: platforms.label_for(folder).to_string(),
        thumbnail: media_path(raw.thumbnail.as_deref(), gamelist_dir),
        fanart: media_path(
            raw.fanart.as_deref().or(raw.image.as_deref()),
            gamelist_dir,
        ),
        path: rom_path,
        last_modified,
    })
}

/// A favorite marker counts only when its text is a case-insensitive
/// "true"; anything else (including "1" or "yes") is not a favorite.
fn is_favorite(raw: &RawGame) -> bool {
    raw.favorite
        .as_deref()
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

fn text_or(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

fn media_path(value: Option<&str>, dir: &Path) -> Option<PathBuf> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    Some(resolve_path(value, dir))
}

/// Resolve a gamelist path. EmulationStation writes `./rom.sfc` style
/// relative paths; absolute paths pass through untouched.
fn resolve_path(value: &str, dir: &Path) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let relative = value.strip_prefix("./").unwrap_or(value);
    dir.join(relative)
}

fn mtime_epoch(meta: &std::fs::Metadata) -> i64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    fn rom_entry(path: &str) -> RawGame {
        RawGame {
            path: Some(path.to_string()),
            ..Default::default()
        }
    }

    fn console_dir(root: &Path, name: &str, rom: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(rom), b"rom").unwrap();
        dir
    }

    #[test]
    fn applies_defaults_for_missing_fields() {
        let root = tempfile::tempdir().unwrap();
        let dir = console_dir(root.path(), "misc", "game.bin");

        let record = normalize(
            &rom_entry("./game.bin"),
            &dir,
            SearchMode::Latest,
            &PlatformMap::builtin(),
        )
        .unwrap();

        assert_eq!(record.name, DEFAULT_NAME);
        assert_eq!(record.description, DEFAULT_DESCRIPTION);
        assert_eq!(record.rating, 0.0);
        assert_eq!(record.year, DEFAULT_YEAR);
        assert_eq!(record.genre, DEFAULT_GENRE);
        assert_eq!(record.developer, DEFAULT_DEVELOPER);
        assert_eq!(record.platform, "Unknown Platform");
        assert_eq!(record.thumbnail, None);
        assert_eq!(record.fanart, None);
        assert_eq!(record.path, dir.join("game.bin"));
    }

    #[test]
    fn keeps_populated_fields() {
        let root = tempfile::tempdir().unwrap();
        let dir = console_dir(root.path(), "snes", "smw.sfc");

        let raw = RawGame {
            name: Some("Super Mario World".to_string()),
            desc: Some("Jump on things.".to_string()),
            rating: Some("0.85".to_string()),
            genre: Some("Platformer".to_string()),
            developer: Some("Nintendo".to_string()),
            ..rom_entry("./smw.sfc")
        };
        let record = normalize(&raw, &dir, SearchMode::Latest, &PlatformMap::builtin()).unwrap();

        assert_eq!(record.name, "Super Mario World");
        assert_eq!(record.description, "Jump on things.");
        assert_eq!(record.rating, 0.85);
        assert_eq!(record.genre, "Platformer");
        assert_eq!(record.developer, "Nintendo");
        assert_eq!(record.platform, "Super Nintendo Entertainment System");
    }

    #[test]
    fn invalid_rating_defaults_to_zero() {
        let root = tempfile::tempdir().unwrap();
        let dir = console_dir(root.path(), "misc", "g.bin");

        let raw = RawGame {
            rating: Some("five stars".to_string()),
            ..rom_entry("./g.bin")
        };
        let record = normalize(&raw, &dir, SearchMode::Latest, &PlatformMap::builtin()).unwrap();
        assert_eq!(record.rating, 0.0);
    }

    #[test]
    fn non_finite_and_negative_ratings_default_to_zero() {
        let root = tempfile::tempdir().unwrap();
        let dir = console_dir(root.path(), "misc", "g.bin");
        let platforms = PlatformMap::builtin();

        for text in ["nan", "inf", "-inf", "-0.5"] {
            let raw = RawGame {
                rating: Some(text.to_string()),
                ..rom_entry("./g.bin")
            };
            let record = normalize(&raw, &dir, SearchMode::Latest, &platforms).unwrap();
            assert_eq!(record.rating, 0.0, "rating {text:?} should default");

            // A defaulted rating keeps records comparable across scans.
            let again = normalize(&raw, &dir, SearchMode::Latest, &platforms).unwrap();
            assert_eq!(record, again);
        }
    }

    #[test]
    fn year_is_first_four_characters_of_release_date() {
        let root = tempfile::tempdir().unwrap();
        let dir = console_dir(root.path(), "misc", "g.bin");

        let raw = RawGame {
            releasedate: Some("19981203T000000".to_string()),
            ..rom_entry("./g.bin")
        };
        let record = normalize(&raw, &dir, SearchMode::Latest, &PlatformMap::builtin()).unwrap();
        assert_eq!(record.year, "1998");
    }

    #[test]
    fn short_release_date_falls_back_to_unknown() {
        let root = tempfile::tempdir().unwrap();
        let dir = console_dir(root.path(), "misc", "g.bin");

        let raw = RawGame {
            releasedate: Some("98".to_string()),
            ..rom_entry("./g.bin")
        };
        let record = normalize(&raw, &dir, SearchMode::Latest, &PlatformMap::builtin()).unwrap();
        assert_eq!(record.year, DEFAULT_YEAR);
    }

    #[test]
    fn favorites_mode_filters_unflagged_entries() {
        let root = tempfile::tempdir().unwrap();
        let dir = console_dir(root.path(), "misc", "g.bin");
        let platforms = PlatformMap::builtin();

        let unflagged = rom_entry("./g.bin");
        assert!(normalize(&unflagged, &dir, SearchMode::Favorites, &platforms).is_none());

        let negated = RawGame {
            favorite: Some("false".to_string()),
            ..rom_entry("./g.bin")
        };
        assert!(normalize(&negated, &dir, SearchMode::Favorites, &platforms).is_none());

        let flagged = RawGame {
            favorite: Some("TRUE".to_string()),
            ..rom_entry("./g.bin")
        };
        assert!(normalize(&flagged, &dir, SearchMode::Favorites, &platforms).is_some());
    }

    #[test]
    fn latest_mode_keeps_unflagged_entries() {
        let root = tempfile::tempdir().unwrap();
        let dir = console_dir(root.path(), "misc", "g.bin");

        let unflagged = rom_entry("./g.bin");
        assert!(
            normalize(
                &unflagged,
                &dir,
                SearchMode::Latest,
                &PlatformMap::builtin()
            )
            .is_some()
        );
    }

    #[test]
    fn drops_entry_when_rom_is_missing() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("misc");
        fs::create_dir_all(&dir).unwrap();

        let raw = rom_entry("./deleted.bin");
        assert!(normalize(&raw, &dir, SearchMode::Latest, &PlatformMap::builtin()).is_none());
    }

    #[test]
    fn drops_entry_without_path() {
        let root = tempfile::tempdir().unwrap();
        let dir = console_dir(root.path(), "misc", "g.bin");

        let raw = RawGame {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };
        assert!(normalize(&raw, &dir, SearchMode::Latest, &PlatformMap::builtin()).is_none());
    }

    #[test]
    fn absolute_paths_pass_through() {
        let root = tempfile::tempdir().unwrap();
        let dir = console_dir(root.path(), "misc", "g.bin");
        let absolute = dir.join("g.bin");

        let raw = rom_entry(absolute.to_str().unwrap());
        let record = normalize(&raw, &dir, SearchMode::Latest, &PlatformMap::builtin()).unwrap();
        assert_eq!(record.path, absolute);
    }

    #[test]
    fn relative_media_paths_resolve_against_gamelist_dir() {
        let root = tempfile::tempdir().unwrap();
        let dir = console_dir(root.path(), "snes", "smw.sfc");

        let raw = RawGame {
            thumbnail: Some("img/a.png".to_string()),
            image: Some("./img/b.png".to_string()),
            ..rom_entry("./smw.sfc")
        };
        let record = normalize(&raw, &dir, SearchMode::Latest, &PlatformMap::builtin()).unwrap();
        assert_eq!(record.thumbnail, Some(dir.join("img/a.png")));
        assert_eq!(record.fanart, Some(dir.join("img/b.png")));
    }

    #[test]
    fn explicit_fanart_beats_image_fallback() {
        let root = tempfile::tempdir().unwrap();
        let dir = console_dir(root.path(), "snes", "smw.sfc");

        let raw = RawGame {
            fanart: Some("./art/fanart.png".to_string()),
            image: Some("./img/screenshot.png".to_string()),
            ..rom_entry("./smw.sfc")
        };
        let record = normalize(&raw, &dir, SearchMode::Latest, &PlatformMap::builtin()).unwrap();
        assert_eq!(record.fanart, Some(dir.join("art/fanart.png")));
    }

    #[test]
    fn last_modified_tracks_the_rom_file() {
        let root = tempfile::tempdir().unwrap();
        let dir = console_dir(root.path(), "misc", "g.bin");

        let stamp = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        let file = fs::OpenOptions::new()
            .write(true)
            .open(dir.join("g.bin"))
            .unwrap();
        file.set_modified(stamp).unwrap();
        drop(file);

        let record = normalize(
            &rom_entry("./g.bin"),
            &dir,
            SearchMode::Latest,
            &PlatformMap::builtin(),
        )
        .unwrap();
        assert_eq!(record.last_modified, 1_600_000_000);
    }
}
