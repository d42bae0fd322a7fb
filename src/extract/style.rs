//! Inline style parsing
//!
//! Images and colour swatches on the catalog are carried in `style`
//! attributes rather than `src`. Both matchers are first-match-only and have
//! no fallback: a style that does not match is a parse error, so layout
//! changes on the site are reported instead of producing empty fields.

use super::ExtractError;
use regex::Regex;
use std::sync::LazyLock;

static BACKGROUND_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"background-image:url\((.*)\)").expect("background-image pattern is valid")
});

static COLOR_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"background(-color)?:(.*)").expect("colour pattern is valid")
});

/// Extracts the URL from a `background-image:url(...)` declaration
///
/// # Examples
///
/// ```
/// use autospot_crawler::extract::background_image_from;
///
/// let url = background_image_from("background-image:url(/img/a.png)").unwrap();
/// assert_eq!(url, "/img/a.png");
/// ```
pub fn background_image_from(style: &str) -> Result<String, ExtractError> {
    BACKGROUND_IMAGE
        .captures(style.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ExtractError::StylePattern {
            kind: "background image",
            style: style.to_string(),
        })
}

/// Extracts the value of a `background` or `background-color` declaration
///
/// Everything after the colon is captured, trimmed of surrounding whitespace.
pub fn color_code_from(style: &str) -> Result<String, ExtractError> {
    COLOR_CODE
        .captures(style.trim())
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
        .ok_or_else(|| ExtractError::StylePattern {
            kind: "colour code",
            style: style.to_string(),
        })
}
