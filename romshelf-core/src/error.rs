use std::path::PathBuf;

/// Errors that can occur while scanning and parsing gamelists.
///
/// Only [`GamelistError::RootNotFound`] crosses the `list_games` boundary
/// during a normal scan; file-level problems are logged and skipped so one
/// bad console folder never hides the rest of the collection.
#[derive(Debug, thiserror::Error)]
pub enum GamelistError {
    #[error("ROM root not found or not a directory: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
