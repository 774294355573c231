//! Emoji codepoint resolution
//!
//! Converts between raw user input (emoji glyphs, `U+XXXX` codes, bare hex
//! codepoints) and the canonical hyphen-joined lowercase hex form used in
//! asset file names. Validation goes through the emoji name table.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

/// Trailing hex codepoint inside a token. Lowercase, 4-6 digits, no leading
/// zero on the first digit.
static CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-f1-9][a-f0-9]{3,5}$").expect("codepoint regex"));

#[derive(Debug, Error)]
#[error("no codepoint could be obtained from the given input")]
pub struct CodepointError;

/// Extract the meaningful hex portion of a codepoint token.
///
/// `"U+1f1f8"` and `"1f466"` both resolve; tokens carrying no trailing
/// codepoint yield `None`.
pub fn trim_code(codepoint: &str) -> Option<&str> {
    CODE_REGEX.find(codepoint).map(|m| m.as_str())
}

/// Lowercase hex codepoint of a single scalar.
pub fn glyph_codepoint(glyph: char) -> String {
    format!("{:x}", glyph as u32)
}

/// The character a codepoint token refers to, in any accepted format.
pub fn emoji_from_code(codepoint: &str) -> Option<char> {
    let code = trim_code(codepoint)?;
    char::from_u32(u32::from_str_radix(code, 16).ok()?)
}

/// Whether the string is a single emoji in the name table.
pub fn is_known_emoji(candidate: &str) -> bool {
    emojis::get(candidate).is_some()
}

/// Emoji name with the first letter capitalised, e.g. "Falling leaf".
pub fn display_name(glyph: &str) -> Option<String> {
    let name = emojis::get(glyph)?.name();
    let mut chars = name.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// Rebuild the emoji string for a canonical hyphen-joined codepoint.
pub fn emoji_for_codepoints(codepoint: &str) -> String {
    codepoint.split('-').filter_map(emoji_from_code).collect()
}

/// Resolve raw user input to a canonical hyphen-joined codepoint string.
///
/// The input is either a single emoji glyph or whitespace-separated
/// codepoint tokens describing one emoji (component codepoints of a flag or
/// ZWJ sequence). The result matches the format used in asset file URLs.
pub fn codepoint_from_input(raw: &str) -> Result<String, CodepointError> {
    let tokens: Vec<String> = raw.split_whitespace().map(|t| t.to_lowercase()).collect();
    let first = tokens.first().ok_or(CodepointError)?;

    if is_known_emoji(first) {
        return Ok(join_codepoints(first));
    }

    // Tokens without a recognizable codepoint contribute nothing.
    let candidate: String = tokens.iter().filter_map(|t| emoji_from_code(t)).collect();
    if !candidate.is_empty() && is_known_emoji(&candidate) {
        return Ok(join_codepoints(&candidate));
    }

    Err(CodepointError)
}

fn join_codepoints(emoji: &str) -> String {
    emoji
        .chars()
        .map(glyph_codepoint)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_prefixed_and_bare_codes() {
        assert_eq!(trim_code("U+1f1f8"), Some("1f1f8"));
        assert_eq!(trim_code("1f466"), Some("1f466"));
        assert_eq!(trim_code("emoji_u1f605"), Some("1f605"));
        assert_eq!(trim_code(""), None);
        assert_eq!(trim_code("hello"), None);
    }

    #[test]
    fn resolves_a_plain_glyph() {
        assert_eq!(codepoint_from_input("\u{1f40d}").unwrap(), "1f40d");
    }

    #[test]
    fn resolves_component_codepoints_of_a_flag() {
        assert_eq!(codepoint_from_input("1f1f8 1f1ea").unwrap(), "1f1f8-1f1ea");
    }

    #[test]
    fn resolves_uppercase_prefixed_input() {
        assert_eq!(codepoint_from_input("U+1F40D").unwrap(), "1f40d");
    }

    #[test]
    fn resolves_a_zwj_sequence_glyph() {
        // Family: man, girl, boy
        let family = "\u{1f468}\u{200d}\u{1f467}\u{200d}\u{1f466}";
        assert_eq!(
            codepoint_from_input(family).unwrap(),
            "1f468-200d-1f467-200d-1f466"
        );
    }

    #[test]
    fn rejects_text_that_is_not_an_emoji() {
        assert!(codepoint_from_input("hello").is_err());
        assert!(codepoint_from_input("").is_err());
        // A lone zero-width joiner is a valid codepoint but not an emoji.
        assert!(codepoint_from_input("200d").is_err());
    }

    #[test]
    fn rebuilds_emoji_from_canonical_codepoints() {
        assert_eq!(emoji_for_codepoints("1f40d"), "\u{1f40d}");
        assert_eq!(emoji_for_codepoints("1f1f8-1f1ea"), "\u{1f1f8}\u{1f1ea}");
    }

    #[test]
    fn names_are_capitalised() {
        assert_eq!(display_name("\u{1f40d}").as_deref(), Some("Snake"));
        assert_eq!(display_name("not an emoji"), None);
    }
}
