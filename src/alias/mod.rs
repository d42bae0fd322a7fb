//! Alias generation for catalog entries
//!
//! Every artifact key and join key in the crawl is derived from display text
//! through [`alias`]. The function is total and pure: any input, including the
//! empty string, maps to a lowercase ASCII identifier built from Latin
//! letters, digits and underscores.

/// Latin spellings for the Cyrillic alphabet.
///
/// Index 0 is `ё`; indices 1..=32 follow `а`..`я` in code point order.
const CYRILLIC_TABLE: [&str; 33] = [
    "yo", "a", "b", "v", "g", "d", "e", "zh", "z", "i", "y", "k", "l", "m", "n", "o", "p", "r",
    "s", "t", "u", "f", "h", "c", "ch", "sh", "shch", "", "y", "", "e", "yu", "ya",
];

/// Derives a stable slug from display text
///
/// Pipeline:
/// 1. Surrounding whitespace is ignored and Cyrillic letters are transliterated
/// 2. Runs of whitespace, `_` and `-` collapse into a single `_`
/// 3. Anything that is not an ASCII letter, digit, `_` or `-` is dropped
/// 4. The result is lowercased
///
/// Distinct inputs may collapse to the same alias (`"BMW X5"` and `"bmw-x5"`
/// both give `bmw_x5`).
///
/// # Examples
///
/// ```
/// use autospot_crawler::alias;
///
/// assert_eq!(alias("Тойота Камри"), "toyota_kamri");
/// assert_eq!(alias("BMW X5"), "bmw_x5");
/// assert_eq!(alias("  "), "");
/// ```
pub fn alias(text: &str) -> String {
    let latin = transliterate(text.trim());
    let collapsed = collapse_separators(&latin);

    collapsed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Replaces Cyrillic letters with their Latin spelling, leaving everything else as is
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match cyrillic_index(c) {
            Some(index) => out.push_str(CYRILLIC_TABLE[index]),
            None => out.push(c),
        }
    }
    out
}

fn cyrillic_index(c: char) -> Option<usize> {
    match c {
        'Ё' | 'ё' => Some(0),
        'а'..='я' => Some(c as usize - 'а' as usize + 1),
        'А'..='Я' => Some(c as usize - 'А' as usize + 1),
        _ => None,
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '_' || c == '-'
}

fn collapse_separators(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if is_separator(c) {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}
