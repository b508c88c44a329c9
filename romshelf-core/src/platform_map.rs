//! Console-folder-name to platform-label mapping.
//!
//! The platform shown for a game comes from the folder its gamelist lives
//! in, not from anything inside the XML. Lookups are case-insensitive and
//! misses are never errors; an unmapped folder (homebrew, ports, one-off
//! collections) just reads as "Unknown Platform".

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::GamelistError;

/// Label returned for folder names with no mapping.
pub const UNKNOWN_PLATFORM: &str = "Unknown Platform";

/// Folder names used by stock Batocera and RetroPie images.
const BUILTIN_LABELS: &[(&str, &str)] = &[
    // Nintendo
    ("nes", "Nintendo Entertainment System"),
    ("famicom", "Nintendo Entertainment System"),
    ("snes", "Super Nintendo Entertainment System"),
    ("sfc", "Super Nintendo Entertainment System"),
    ("n64", "Nintendo 64"),
    ("gamecube", "Nintendo GameCube"),
    ("gc", "Nintendo GameCube"),
    ("wii", "Nintendo Wii"),
    ("gb", "Game Boy"),
    ("gbc", "Game Boy Color"),
    ("gba", "Game Boy Advance"),
    ("nds", "Nintendo DS"),
    ("3ds", "Nintendo 3DS"),
    ("virtualboy", "Virtual Boy"),
    // Sega
    ("mastersystem", "Sega Master System"),
    ("sms", "Sega Master System"),
    ("genesis", "Sega Genesis"),
    ("megadrive", "Sega Mega Drive"),
    ("segacd", "Sega CD"),
    ("sega32x", "Sega 32X"),
    ("saturn", "Sega Saturn"),
    ("dreamcast", "Sega Dreamcast"),
    ("gamegear", "Sega Game Gear"),
    ("sg1000", "Sega SG-1000"),
    // Sony
    ("psx", "Sony PlayStation"),
    ("ps1", "Sony PlayStation"),
    ("ps2", "Sony PlayStation 2"),
    ("ps3", "Sony PlayStation 3"),
    ("psp", "Sony PlayStation Portable"),
    ("psvita", "Sony PlayStation Vita"),
    // Microsoft
    ("xbox", "Microsoft Xbox"),
    ("xbox360", "Microsoft Xbox 360"),
    // Atari
    ("atari2600", "Atari 2600"),
    ("atari5200", "Atari 5200"),
    ("atari7800", "Atari 7800"),
    ("lynx", "Atari Lynx"),
    ("jaguar", "Atari Jaguar"),
    // NEC
    ("pcengine", "PC Engine"),
    ("pcenginecd", "PC Engine CD"),
    ("tg16", "TurboGrafx-16"),
    // SNK
    ("neogeo", "Neo Geo"),
    ("ngp", "Neo Geo Pocket"),
    ("ngpc", "Neo Geo Pocket Color"),
    // Bandai
    ("wonderswan", "WonderSwan"),
    ("wonderswancolor", "WonderSwan Color"),
    // Arcade
    ("arcade", "Arcade"),
    ("mame", "Arcade (MAME)"),
    ("fba", "Arcade (FinalBurn Alpha)"),
    ("fbneo", "Arcade (FinalBurn Neo)"),
    // Computers
    ("amiga", "Commodore Amiga"),
    ("c64", "Commodore 64"),
    ("amstradcpc", "Amstrad CPC"),
    ("zxspectrum", "ZX Spectrum"),
    ("msx", "MSX"),
    ("atarist", "Atari ST"),
    ("dos", "MS-DOS"),
    ("pc", "PC"),
    ("scummvm", "ScummVM"),
    // Catch-alls
    ("ports", "Ports"),
];

/// Maps console folder names (e.g. `snes`, `megadrive`) to display labels.
#[derive(Debug, Clone)]
pub struct PlatformMap {
    labels: HashMap<String, String>,
}

impl PlatformMap {
    /// Build a map from explicit pairs. Keys are lowercased so lookups are
    /// case-insensitive; a later duplicate key wins.
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let labels = entries
            .into_iter()
            .map(|(folder, label)| (folder.to_lowercase(), label))
            .collect();
        Self { labels }
    }

    /// The compiled-in table covering stock Batocera and RetroPie folder
    /// names.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_LABELS
                .iter()
                .map(|&(folder, label)| (folder.to_string(), label.to_string())),
        )
    }

    /// Load a map from a JSON object of `"folder": "label"` pairs. The
    /// loaded map replaces the builtin table entirely.
    pub fn load(path: &Path) -> Result<Self, GamelistError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    /// Load a map from JSON, e.g. a `platform_map.json` shipped next to
    /// the frontend's settings.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, GamelistError> {
        let labels: HashMap<String, String> = serde_json::from_reader(reader)?;
        Ok(Self::new(labels))
    }

    /// Display label for a console folder name.
    pub fn label_for(&self, folder: &str) -> &str {
        self.labels
            .get(&folder.to_lowercase())
            .map(String::as_str)
            .unwrap_or(UNKNOWN_PLATFORM)
    }

    /// All (folder, label) pairs, sorted by folder name.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .labels
            .iter()
            .map(|(folder, label)| (folder.as_str(), label.as_str()))
            .collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for PlatformMap {
    fn default() -> Self {
        Self::builtin()
    }
}
