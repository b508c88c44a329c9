//! Directory scanner for gamelist discovery.
//!
//! Walks a collection root looking for EmulationStation `gamelist.xml`
//! files, one per console folder. The walk is lazy (callers that stop
//! consuming the iterator stop the traversal) and deterministic: entries
//! are visited in sorted order, so repeated walks over an unchanged tree
//! yield the same sequence.

use std::path::{Path, PathBuf};

/// File name a gamelist must have, exactly (case-sensitive).
pub const GAMELIST_FILE_NAME: &str = "gamelist.xml";

/// A discovered gamelist file and the console folder containing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamelistFile {
    /// Full path to the `gamelist.xml` file.
    pub path: PathBuf,
    /// The directory the file sits in. Relative ROM and media paths
    /// resolve against this, and its base name drives platform lookup.
    pub dir: PathBuf,
}

/// Walk `root` and yield every readable, non-empty `gamelist.xml` below it.
///
/// Hidden directories (names starting with `.`) are pruned before descent,
/// so EmulationStation's own `.emulationstation` state folder is never
/// scanned. Zero-byte files and unreadable directories are logged and
/// skipped; symlinked directories are not followed.
pub fn scan_gamelists(root: &Path) -> GamelistWalker {
    GamelistWalker {
        pending: vec![root.to_path_buf()],
    }
}

/// Lazy depth-first iterator over the gamelist files under a root.
///
/// Restartable by calling [`scan_gamelists`] again; the walker holds no
/// state beyond its pending-directory stack.
#[derive(Debug)]
pub struct GamelistWalker {
    pending: Vec<PathBuf>,
}

impl Iterator for GamelistWalker {
    type Item = GamelistFile;

    fn next(&mut self) -> Option<GamelistFile> {
        while let Some(dir) = self.pending.pop() {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("skipping unreadable directory {}: {}", dir.display(), e);
                    continue;
                }
            };

            let mut dir_entries: Vec<std::fs::DirEntry> = entries.flatten().collect();
            dir_entries.sort_by_key(|e| e.path());

            let mut gamelist: Option<PathBuf> = None;
            let mut subdirs: Vec<PathBuf> = Vec::new();

            for entry in &dir_entries {
                let path = entry.path();
                let file_type = match entry.file_type() {
                    Ok(t) => t,
                    Err(e) => {
                        log::warn!("skipping unreadable entry {}: {}", path.display(), e);
                        continue;
                    }
                };

                if file_type.is_dir() {
                    if !is_hidden(&path) {
                        subdirs.push(path);
                    }
                } else if path.file_name().is_some_and(|n| n == GAMELIST_FILE_NAME) {
                    gamelist = Some(path);
                }
            }

            // The stack pops last-pushed first, so push reversed to keep
            // the sorted order.
            for sub in subdirs.into_iter().rev() {
                self.pending.push(sub);
            }

            if let Some(path) = gamelist {
                match std::fs::metadata(&path) {
                    Ok(meta) if !meta.is_file() => {
                        log::warn!("skipping {}: not a regular file", path.display());
                    }
                    Ok(meta) if meta.len() == 0 => {
                        log::warn!("skipping empty gamelist {}", path.display());
                    }
                    Ok(_) => {
                        return Some(GamelistFile { path, dir });
                    }
                    Err(e) => {
                        log::warn!("skipping unreadable gamelist {}: {}", path.display(), e);
                    }
                }
            }
        }
        None
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn found_dirs(root: &Path) -> Vec<String> {
        scan_gamelists(root)
            .map(|g| g.dir.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn finds_gamelists_in_sorted_order() {
        let root = tempfile::tempdir().unwrap();
        write_file(&root.path().join("snes/gamelist.xml"), "<gameList/>");
        write_file(&root.path().join("genesis/gamelist.xml"), "<gameList/>");
        write_file(&root.path().join("nes/gamelist.xml"), "<gameList/>");

        assert_eq!(found_dirs(root.path()), vec!["genesis", "nes", "snes"]);
    }

    #[test]
    fn yields_file_path_inside_its_dir() {
        let root = tempfile::tempdir().unwrap();
        write_file(&root.path().join("snes/gamelist.xml"), "<gameList/>");

        let found: Vec<GamelistFile> = scan_gamelists(root.path()).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, found[0].dir.join("gamelist.xml"));
        assert_eq!(found[0].dir, root.path().join("snes"));
    }

    #[test]
    fn walks_nested_console_folders() {
        let root = tempfile::tempdir().unwrap();
        write_file(&root.path().join("nes/gamelist.xml"), "<gameList/>");
        write_file(&root.path().join("nes/hacks/gamelist.xml"), "<gameList/>");

        assert_eq!(found_dirs(root.path()), vec!["nes", "hacks"]);
    }

    #[test]
    fn prunes_hidden_directories_before_descent() {
        let root = tempfile::tempdir().unwrap();
        write_file(
            &root.path().join(".emulationstation/gamelist.xml"),
            "<gameList/>",
        );
        write_file(
            &root.path().join(".hidden/nested/gamelist.xml"),
            "<gameList/>",
        );
        write_file(&root.path().join("snes/gamelist.xml"), "<gameList/>");

        assert_eq!(found_dirs(root.path()), vec!["snes"]);
    }

    #[test]
    fn skips_zero_byte_gamelists() {
        let root = tempfile::tempdir().unwrap();
        write_file(&root.path().join("broken/gamelist.xml"), "");
        write_file(&root.path().join("snes/gamelist.xml"), "<gameList/>");

        assert_eq!(found_dirs(root.path()), vec!["snes"]);
    }

    #[cfg(unix)]
    #[test]
    fn skips_gamelist_that_is_not_a_regular_file() {
        let root = tempfile::tempdir().unwrap();
        let media = root.path().join("broken/media");
        fs::create_dir_all(&media).unwrap();
        std::os::unix::fs::symlink(&media, root.path().join("broken/gamelist.xml")).unwrap();
        write_file(&root.path().join("snes/gamelist.xml"), "<gameList/>");

        assert_eq!(found_dirs(root.path()), vec!["snes"]);
    }

    #[test]
    fn requires_exact_file_name() {
        let root = tempfile::tempdir().unwrap();
        write_file(&root.path().join("a/Gamelist.xml"), "<gameList/>");
        write_file(&root.path().join("b/gamelist.xml.bak"), "<gameList/>");
        write_file(&root.path().join("c/gamelist.xml"), "<gameList/>");

        assert_eq!(found_dirs(root.path()), vec!["c"]);
    }

    #[test]
    fn walk_is_restartable() {
        let root = tempfile::tempdir().unwrap();
        write_file(&root.path().join("nes/gamelist.xml"), "<gameList/>");
        write_file(&root.path().join("snes/gamelist.xml"), "<gameList/>");

        let first: Vec<GamelistFile> = scan_gamelists(root.path()).collect();
        let second: Vec<GamelistFile> = scan_gamelists(root.path()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_root_yields_nothing() {
        let root = tempfile::tempdir().unwrap();
        let gone = root.path().join("nope");
        assert_eq!(scan_gamelists(&gone).count(), 0);
    }
}
