//! EmulationStation `gamelist.xml` parsing.
//!
//! Extracts raw per-game field sets without applying any policy; defaults,
//! filtering, and path resolution happen in [`crate::normalize`]. Only the
//! enumerated metadata tags are read, so unknown tags (and `<folder>`
//! entries) pass through silently.

use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::GamelistError;

/// Raw field values for one `<game>` element, in document order.
///
/// Every field is optional; a sparse entry is normal and still produces a
/// usable record once defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGame {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub rating: Option<String>,
    pub releasedate: Option<String>,
    pub genre: Option<String>,
    pub developer: Option<String>,
    /// Text of `<favorite>` or `<favourite>`, whichever the file uses.
    pub favorite: Option<String>,
    pub path: Option<String>,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub fanart: Option<String>,
}

/// Parse a gamelist document into raw per-game field sets.
///
/// A malformed document is an error; the caller decides whether that skips
/// the file or aborts. An empty `<gameList/>` is fine and yields no games.
pub fn parse_gamelist<R: BufRead>(reader: R) -> Result<Vec<RawGame>, GamelistError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut games = Vec::new();
    let mut current_game: Option<RawGame> = None;
    let mut current_tag = String::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag_name == "game" {
                    current_game = Some(RawGame::default());
                    current_tag.clear();
                } else {
                    current_tag = tag_name;
                }
            }
            Event::Text(ref e) => {
                if let Some(ref mut game) = current_game {
                    let text = e.unescape()?.to_string();
                    set_field(game, &current_tag, text);
                }
            }
            Event::CData(ref e) => {
                if let Some(ref mut game) = current_game {
                    let text = String::from_utf8_lossy(e.as_ref()).to_string();
                    set_field(game, &current_tag, text);
                }
            }
            Event::End(ref e) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag_name == "game" {
                    if let Some(game) = current_game.take() {
                        games.push(game);
                    }
                } else {
                    current_tag.clear();
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(games)
}

fn set_field(game: &mut RawGame, tag: &str, text: String) {
    match tag {
        "name" => game.name = Some(text),
        "desc" => game.desc = Some(text),
        "rating" => game.rating = Some(text),
        "releasedate" => game.releasedate = Some(text),
        "genre" => game.genre = Some(text),
        "developer" => game.developer = Some(text),
        "favorite" | "favourite" => game.favorite = Some(text),
        "path" => game.path = Some(text),
        "thumbnail" => game.thumbnail = Some(text),
        "image" => game.image = Some(text),
        "fanart" => game.fanart = Some(text),
        _ => {}
    }
}
