//! romshelf CLI
//!
//! Command-line interface for browsing EmulationStation game libraries.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romshelf_core::{GameRecord, GamelistError, PlatformMap, SearchMode, list_games};

mod launch;
mod settings;

use settings::LibraryFlavor;

#[derive(Parser)]
#[command(name = "romshelf")]
#[command(about = "Browse EmulationStation game libraries", long_about = None)]
struct Cli {
    /// ROM root containing console folders (overrides the configured flavor)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List games from the library
    List {
        /// Which view to build: favorites or latest
        #[arg(short, long, default_value = "favorites")]
        mode: SearchMode,

        /// Platform map JSON file (overrides the configured one)
        #[arg(long)]
        platform_map: Option<PathBuf>,

        /// Rescan the library even when cached records exist
        #[arg(long)]
        refresh: bool,

        /// Skip the cache entirely (no read, no store)
        #[arg(long)]
        no_cache: bool,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Launch a ROM with the configured command
    Launch {
        /// Path to the ROM file
        rom: PathBuf,

        /// Command template to use instead of the configured one
        #[arg(short, long)]
        command: Option<String>,
    },

    /// List built-in platform folder names
    Platforms,

    /// Manage the scan cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage romshelf configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show cached record counts
    Stats,

    /// Remove all cached records
    Clear,

    /// Print the cache database path
    Path,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current settings
    Show,

    /// Set the library flavor (batocera, retropie, custom)
    SetFlavor { flavor: LibraryFlavor },

    /// Set a custom ROM root (switches the flavor to custom)
    SetRoot { path: PathBuf },

    /// Set the launch command template ({rom} is replaced by the ROM path)
    SetCommand { command: String },

    /// Set the platform map JSON file
    SetPlatformMap { path: PathBuf },

    /// Print the settings file path
    Path,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            mode,
            platform_map,
            refresh,
            no_cache,
            json,
        } => {
            run_list(cli.root, mode, platform_map, refresh, no_cache, json);
        }
        Commands::Launch { rom, command } => run_launch(rom, command),
        Commands::Platforms => run_platforms(),
        Commands::Cache { action } => match action {
            CacheAction::Stats => run_cache_stats(),
            CacheAction::Clear => run_cache_clear(),
            CacheAction::Path => run_cache_path(),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(cli.root),
            ConfigAction::SetFlavor { flavor } => run_config_set_flavor(flavor),
            ConfigAction::SetRoot { path } => run_config_set_root(path),
            ConfigAction::SetCommand { command } => run_config_set_command(command),
            ConfigAction::SetPlatformMap { path } => run_config_set_platform_map(path),
            ConfigAction::Path => run_config_path(),
        },
    }
}

/// Run the list command.
///
/// Serves cached records when they exist, otherwise scans the ROM root
/// and stores the result for next time.
fn run_list(
    root: Option<PathBuf>,
    mode: SearchMode,
    platform_map: Option<PathBuf>,
    refresh: bool,
    no_cache: bool,
    json: bool,
) {
    if !refresh && !no_cache {
        if let Some(conn) = open_cache() {
            match romshelf_db::cached_games(&conn, mode) {
                Ok(records) if !records.is_empty() => {
                    render_records(&records, mode, json, true);
                    return;
                }
                Ok(_) => {}
                Err(e) => log::warn!("Failed to read cache: {e}"),
            }
        }
    }

    let root_path = settings::resolve_rom_root(root);
    let platforms = load_platforms(platform_map);

    let records = match list_games(&root_path, mode, &platforms) {
        Ok(records) => records,
        Err(GamelistError::RootNotFound(path)) => {
            eprintln!(
                "{} ROM root not found: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                path.display(),
            );
            eprintln!("Set one with 'romshelf config set-root <path>' or pass --root.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!(
                "{} Error listing games: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            std::process::exit(1);
        }
    };

    if !no_cache {
        store_in_cache(mode, &records);
    }
    render_records(&records, mode, json, false);
}

/// Load the platform map: explicit flag first, then the configured
/// file, then the built-in table.
fn load_platforms(flag: Option<PathBuf>) -> PlatformMap {
    let path = flag.or_else(settings::load_platform_map_path);
    match path {
        Some(p) => match PlatformMap::load(&p) {
            Ok(map) => map,
            Err(e) => {
                eprintln!(
                    "{} Failed to load platform map {}: {}",
                    "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                    p.display(),
                    e,
                );
                PlatformMap::builtin()
            }
        },
        None => PlatformMap::builtin(),
    }
}

fn render_records(records: &[GameRecord], mode: SearchMode, json: bool, cached: bool) {
    if json {
        match serde_json::to_string_pretty(records) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!(
                    "{} Failed to encode records: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    e,
                );
                std::process::exit(1);
            }
        }
        return;
    }

    let heading = match mode {
        SearchMode::Favorites => "Favorite games",
        SearchMode::Latest => "Latest additions",
    };
    let suffix = if cached { " (cached)" } else { "" };
    println!(
        "{}{}",
        heading.if_supports_color(Stdout, |t| t.bold()),
        suffix.if_supports_color(Stdout, |t| t.dimmed()),
    );
    println!();

    if records.is_empty() {
        println!(
            "{}",
            "No games found.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return;
    }

    for record in records {
        println!(
            "  {} [{}]",
            record.name.if_supports_color(Stdout, |t| t.bold()),
            record.platform.if_supports_color(Stdout, |t| t.cyan()),
        );
        println!(
            "    {} | {} | {} | added {}",
            record.year,
            record.genre,
            record.developer,
            format_modified(record.last_modified),
        );
    }
    println!();
    println!("Total: {} games", records.len());
}

/// Format an mtime epoch as a calendar date.
fn format_modified(epoch: i64) -> String {
    match chrono::DateTime::from_timestamp(epoch, 0) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "unknown".to_string(),
    }
}

/// Launch a ROM through the configured command template.
fn run_launch(rom: PathBuf, command_override: Option<String>) {
    if !rom.is_file() {
        eprintln!(
            "{} ROM not found: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            rom.display(),
        );
        std::process::exit(1);
    }

    let template = command_override
        .or_else(settings::load_launch_command)
        .unwrap_or_else(|| launch::DEFAULT_COMMAND.to_string());

    let Some(mut command) = launch::build_command(&template, &rom) else {
        eprintln!(
            "{} Empty launch command template",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
        );
        std::process::exit(1);
    };

    println!(
        "Launching {}...",
        rom.display().if_supports_color(Stdout, |t| t.bold()),
    );

    match command.status() {
        Ok(status) if status.success() => {
            println!(
                "{} Launcher exited cleanly",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Ok(status) => {
            eprintln!(
                "{} Launcher exited with {}",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                status,
            );
            std::process::exit(status.code().unwrap_or(1));
        }
        Err(e) => {
            eprintln!(
                "{} Failed to run '{}': {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                template,
                e,
            );
            std::process::exit(1);
        }
    }
}

/// List the built-in platform folder table.
fn run_platforms() {
    let map = PlatformMap::builtin();
    println!(
        "{}",
        "Built-in platform folders:".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();
    for (folder, label) in map.entries() {
        println!(
            "  {:<14} {}",
            folder,
            label.if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    println!();
    println!("Total: {} folders", map.len());
}

// -- Cache subcommands --

/// Path to the cache database: `~/.cache/romshelf/games.db`.
fn cache_db_path() -> PathBuf {
    let cache = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
    cache.join("romshelf").join("games.db")
}

/// Open the cache database, logging instead of failing.
fn open_cache() -> Option<romshelf_db::Connection> {
    let path = cache_db_path();
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::warn!(
                "Failed to create cache directory {}: {e}",
                parent.display()
            );
        }
    }
    match romshelf_db::open_database(&path) {
        Ok(conn) => Some(conn),
        Err(e) => {
            log::warn!("Failed to open cache database {}: {e}", path.display());
            None
        }
    }
}

/// Store a scan result, logging instead of failing.
fn store_in_cache(mode: SearchMode, records: &[GameRecord]) {
    let Some(mut conn) = open_cache() else {
        return;
    };
    if let Err(e) = romshelf_db::replace_games(&mut conn, mode, records) {
        log::warn!("Failed to store records in cache: {e}");
    }
}

/// Show cached record counts.
fn run_cache_stats() {
    let Some(conn) = open_cache() else {
        eprintln!(
            "{} Could not open cache database",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
        );
        std::process::exit(1);
    };

    match romshelf_db::stats(&conn) {
        Ok(stats) => {
            println!(
                "{}",
                "Cache contents:".if_supports_color(Stdout, |t| t.bold()),
            );
            println!();
            println!("  Favorites: {} games", stats.favorites);
            println!("  Latest: {} games", stats.latest);
        }
        Err(e) => {
            eprintln!(
                "{} Error reading cache: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            std::process::exit(1);
        }
    }
}

/// Clear the cache.
fn run_cache_clear() {
    let Some(conn) = open_cache() else {
        eprintln!(
            "{} Could not open cache database",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
        );
        std::process::exit(1);
    };

    match romshelf_db::clear(&conn) {
        Ok(removed) => {
            println!(
                "{} Cache cleared ({} records removed)",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                removed,
            );
        }
        Err(e) => {
            eprintln!(
                "{} Error clearing cache: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
        }
    }
}

/// Print the cache database path.
fn run_cache_path() {
    println!("{}", cache_db_path().display());
}

// -- Config subcommands --

/// Show the settings file and the effective configuration.
fn run_config_show(root_override: Option<PathBuf>) {
    let path = settings::settings_path();

    println!(
        "{}",
        "romshelf Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    if path.exists() {
        println!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        println!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let flavor = settings::load_flavor().unwrap_or(LibraryFlavor::Batocera);
    println!(
        "  Flavor: {}",
        flavor.as_str().if_supports_color(Stdout, |t| t.cyan()),
    );
    println!(
        "  Effective root: {}",
        settings::resolve_rom_root(root_override)
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    println!(
        "  Launch command: {}",
        settings::load_launch_command()
            .unwrap_or_else(|| launch::DEFAULT_COMMAND.to_string())
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    match settings::load_platform_map_path() {
        Some(p) => println!(
            "  Platform map: {}",
            p.display().if_supports_color(Stdout, |t| t.cyan()),
        ),
        None => println!(
            "  Platform map: {}",
            "built-in".if_supports_color(Stdout, |t| t.dimmed()),
        ),
    }

    if let Some(contents) = settings::load_settings_string() {
        println!();
        println!(
            "{}",
            "Settings file contents:".if_supports_color(Stdout, |t| t.bold()),
        );
        for line in contents.lines() {
            println!("  {line}");
        }
    }
}

/// Set the library flavor.
fn run_config_set_flavor(flavor: LibraryFlavor) {
    match settings::save_flavor(flavor) {
        Ok(()) => {
            println!(
                "{} Flavor set to {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                flavor.as_str().if_supports_color(Stdout, |t| t.cyan()),
            );
            match flavor.default_root() {
                Some(root) => println!("ROM root: {}", root.display()),
                None => {
                    if settings::load_saved_root().is_none() {
                        println!("Set a root with 'romshelf config set-root <path>'.");
                    }
                }
            }
        }
        Err(e) => {
            eprintln!(
                "{} Failed to save settings: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            std::process::exit(1);
        }
    }
}

/// Set a custom ROM root.
fn run_config_set_root(path: PathBuf) {
    if !path.is_dir() {
        eprintln!(
            "{} Not a directory (saving anyway): {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            path.display(),
        );
    }
    match settings::save_root(&path) {
        Ok(()) => {
            println!(
                "{} ROM root set to {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                path.display().if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        Err(e) => {
            eprintln!(
                "{} Failed to save settings: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            std::process::exit(1);
        }
    }
}

/// Set the launch command template.
fn run_config_set_command(command: String) {
    if !command.contains("{rom}") {
        eprintln!(
            "{} Template has no {{rom}} placeholder; the ROM path will be appended",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
        );
    }
    match settings::save_launch_command(&command) {
        Ok(()) => {
            println!(
                "{} Launch command set to '{}'",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                command.if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        Err(e) => {
            eprintln!(
                "{} Failed to save settings: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            std::process::exit(1);
        }
    }
}

/// Set the platform map JSON file.
fn run_config_set_platform_map(path: PathBuf) {
    match PlatformMap::load(&path) {
        Ok(map) => {
            if let Err(e) = settings::save_platform_map_path(&path) {
                eprintln!(
                    "{} Failed to save settings: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    e,
                );
                std::process::exit(1);
            }
            println!(
                "{} Platform map set to {} ({} folders)",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                path.display().if_supports_color(Stdout, |t| t.cyan()),
                map.len(),
            );
        }
        Err(e) => {
            eprintln!(
                "{} Could not load platform map {}: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                path.display(),
                e,
            );
            std::process::exit(1);
        }
    }
}

/// Print the settings file path.
fn run_config_path() {
    println!("{}", settings::settings_path().display());
}
