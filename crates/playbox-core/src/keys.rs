//! Object key construction
//!
//! Centralized so every handler derives the same storage layout:
//! `games/{id}/...` for bundles, `misc-files/{id}{ext}` for uploads.
//! Identifiers are percent-escaped with the path-segment encode set;
//! sub-paths are router-forwarded relative paths and are not re-escaped.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::AppError;

/// Path-segment encode set, matching what a URL path segment must escape.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/');

/// Entry document served when a bundle is requested without a sub-path.
pub const BUNDLE_ROOT_DOCUMENT: &str = "index.html";

const GAMES_PREFIX: &str = "games";
const MISC_FILES_PREFIX: &str = "misc-files";

/// Percent-escape an identifier for use as a single path segment.
pub fn escape_id(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

/// Storage key for a game bundle object. An empty sub-path addresses the
/// bundle's root document.
pub fn game_bundle_key(game_id: &str, sub_path: &str) -> Result<String, AppError> {
    let game_id = game_id.trim();
    if game_id.is_empty() {
        return Err(AppError::BadRequest("Game ID is required".to_string()));
    }

    let key = if sub_path.is_empty() {
        format!(
            "{}/{}/{}",
            GAMES_PREFIX,
            escape_id(game_id),
            BUNDLE_ROOT_DOCUMENT
        )
    } else {
        format!("{}/{}/{}", GAMES_PREFIX, escape_id(game_id), sub_path)
    };

    Ok(key)
}

/// Storage key for an uploaded misc file. `ext` is the trailing extension
/// taken from the request path (empty string when none).
pub fn misc_file_key(file_id: &str, ext: &str) -> Result<String, AppError> {
    let file_id = file_id.trim();
    if file_id.is_empty() {
        return Err(AppError::BadRequest("File ID is required".to_string()));
    }

    Ok(format!("{}/{}{}", MISC_FILES_PREFIX, file_id, ext))
}

/// Public URL for an object key against the store's public base URL.
pub fn public_url(public_base_url: &str, key: &str) -> String {
    format!("{}/{}", public_base_url.trim_end_matches('/'), key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_key_defaults_to_root_document() {
        let key = game_bundle_key("space-cat", "").unwrap();
        assert_eq!(key, "games/space-cat/index.html");
    }

    #[test]
    fn bundle_key_appends_sub_path_unescaped() {
        let key = game_bundle_key("space-cat", "assets/sprites.png").unwrap();
        assert_eq!(key, "games/space-cat/assets/sprites.png");
    }

    #[test]
    fn bundle_key_escapes_the_identifier() {
        let key = game_bundle_key("my game/v2", "").unwrap();
        assert_eq!(key, "games/my%20game%2Fv2/index.html");
    }

    #[test]
    fn empty_identifiers_are_rejected() {
        assert!(matches!(
            game_bundle_key("", ""),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            game_bundle_key("   ", "index.js"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(misc_file_key("", ".png"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn misc_file_key_concatenates_extension() {
        assert_eq!(
            misc_file_key("0190cafe", ".png").unwrap(),
            "misc-files/0190cafe.png"
        );
        assert_eq!(misc_file_key("0190cafe", "").unwrap(), "misc-files/0190cafe");
    }

    #[test]
    fn public_url_joins_base_and_key() {
        assert_eq!(
            public_url("https://assets.example.com/", "games/space-cat/index.html"),
            "https://assets.example.com/games/space-cat/index.html"
        );
    }
}
