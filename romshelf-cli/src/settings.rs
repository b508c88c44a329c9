//! Shared application settings (library flavor, ROM root, launcher).
//!
//! Every command reads the same `~/.config/romshelf/settings.toml` so
//! root resolution stays consistent across invocations.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

/// Canonical path to the settings file: `~/.config/romshelf/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("romshelf").join("settings.toml")
}

/// Which distribution layout the ROM root comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryFlavor {
    Batocera,
    Retropie,
    Custom,
}

impl LibraryFlavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryFlavor::Batocera => "batocera",
            LibraryFlavor::Retropie => "retropie",
            LibraryFlavor::Custom => "custom",
        }
    }

    /// The stock ROM root for this flavor. Custom has none; the saved
    /// root from `settings.toml` applies instead.
    pub fn default_root(&self) -> Option<PathBuf> {
        match self {
            LibraryFlavor::Batocera => Some(PathBuf::from("/userdata/roms")),
            LibraryFlavor::Retropie => Some(PathBuf::from("/home/pi/RetroPie/roms")),
            LibraryFlavor::Custom => None,
        }
    }
}

impl fmt::Display for LibraryFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown library flavor '{0}', expected batocera, retropie, or custom")]
pub struct FlavorParseError(String);

impl FromStr for LibraryFlavor {
    type Err = FlavorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "batocera" => Ok(LibraryFlavor::Batocera),
            "retropie" => Ok(LibraryFlavor::Retropie),
            "custom" => Ok(LibraryFlavor::Custom),
            _ => Err(FlavorParseError(s.to_string())),
        }
    }
}

/// Resolve the ROM root using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. The configured flavor: stock flavors use their fixed root,
///    custom reads `library.root` from `settings.toml`
/// 3. Current working directory
pub fn resolve_rom_root(cli_override: Option<PathBuf>) -> PathBuf {
    if let Some(p) = cli_override {
        return p;
    }
    let flavor = load_flavor().unwrap_or(LibraryFlavor::Batocera);
    let configured = match flavor {
        LibraryFlavor::Custom => load_saved_root(),
        _ => flavor.default_root(),
    };
    if let Some(p) = configured {
        return p;
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn load_doc() -> Option<toml::Value> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    contents.parse().ok()
}

/// Read `library.flavor` from `settings.toml`, if set.
pub fn load_flavor() -> Option<LibraryFlavor> {
    let doc = load_doc()?;
    doc.get("library")?.get("flavor")?.as_str()?.parse().ok()
}

/// Read `library.root` from `settings.toml`, if set.
pub fn load_saved_root() -> Option<PathBuf> {
    let doc = load_doc()?;
    let root = doc.get("library")?.get("root")?.as_str()?;
    if root.is_empty() {
        None
    } else {
        Some(PathBuf::from(root))
    }
}

/// Read `launcher.command` from `settings.toml`, if set.
pub fn load_launch_command() -> Option<String> {
    let doc = load_doc()?;
    let command = doc.get("launcher")?.get("command")?.as_str()?;
    if command.trim().is_empty() {
        None
    } else {
        Some(command.to_string())
    }
}

/// Read `library.platform_map` from `settings.toml`, if set.
pub fn load_platform_map_path() -> Option<PathBuf> {
    let doc = load_doc()?;
    let path = doc.get("library")?.get("platform_map")?.as_str()?;
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Save the library flavor in `settings.toml`.
pub fn save_flavor(flavor: LibraryFlavor) -> io::Result<()> {
    update_settings(
        "library",
        "flavor",
        toml::Value::String(flavor.as_str().to_string()),
    )
}

/// Save a custom ROM root and switch the flavor to custom.
pub fn save_root(path: &Path) -> io::Result<()> {
    update_settings(
        "library",
        "root",
        toml::Value::String(path.to_string_lossy().into_owned()),
    )?;
    save_flavor(LibraryFlavor::Custom)
}

/// Save the launch command template in `settings.toml`.
pub fn save_launch_command(command: &str) -> io::Result<()> {
    update_settings(
        "launcher",
        "command",
        toml::Value::String(command.to_string()),
    )
}

/// Save the platform map path in `settings.toml`.
pub fn save_platform_map_path(path: &Path) -> io::Result<()> {
    update_settings(
        "library",
        "platform_map",
        toml::Value::String(path.to_string_lossy().into_owned()),
    )
}

/// Set one key in a section of `settings.toml`.
///
/// Uses `toml::Value` for a surgical update so fields written by other
/// tools or newer versions are preserved.
fn update_settings(section: &str, key: &str, value: toml::Value) -> io::Result<()> {
    let settings = settings_path();
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(&settings) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let entry = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let section_table = entry
        .as_table_mut()
        .ok_or_else(|| io::Error::other(format!("[{section}] is not a table")))?;
    section_table.insert(key.to_string(), value);

    // Write atomically
    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, &settings)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let doc = load_doc()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flavor_parses_case_insensitively() {
        assert_eq!(
            "batocera".parse::<LibraryFlavor>().unwrap(),
            LibraryFlavor::Batocera
        );
        assert_eq!(
            "RetroPie".parse::<LibraryFlavor>().unwrap(),
            LibraryFlavor::Retropie
        );
        assert_eq!(
            "CUSTOM".parse::<LibraryFlavor>().unwrap(),
            LibraryFlavor::Custom
        );
        assert!("emudeck".parse::<LibraryFlavor>().is_err());
    }

    #[test]
    fn stock_flavors_have_fixed_roots() {
        assert_eq!(
            LibraryFlavor::Batocera.default_root(),
            Some(PathBuf::from("/userdata/roms"))
        );
        assert_eq!(
            LibraryFlavor::Retropie.default_root(),
            Some(PathBuf::from("/home/pi/RetroPie/roms"))
        );
        assert_eq!(LibraryFlavor::Custom.default_root(), None);
    }
}
