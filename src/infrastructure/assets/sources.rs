//! Asset source URL construction
//!
//! Maps a canonical codepoint string and format onto the deterministic
//! download URLs of the Twemoji and Noto emoji source repositories.

use std::fmt;

const TWEMOJI_PNG_BASE: &str =
    "https://raw.githubusercontent.com/twitter/twemoji/master/assets/72x72/";
const TWEMOJI_SVG_BASE: &str =
    "https://raw.githubusercontent.com/twitter/twemoji/master/assets/svg/";
const NOTO_BASE: &str = "https://raw.githubusercontent.com/googlefonts/noto-emoji/main";

/// Source file format of an emoji asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    Png,
    Svg,
}

impl AssetFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AssetFormat::Png => "png",
            AssetFormat::Svg => "svg",
        }
    }
}

/// Raster sizes published by the Noto emoji repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotoSize {
    S32,
    S72,
    S128,
    S512,
}

impl NotoSize {
    pub fn pixels(&self) -> u32 {
        match self {
            NotoSize::S32 => 32,
            NotoSize::S72 => 72,
            NotoSize::S128 => 128,
            NotoSize::S512 => 512,
        }
    }
}

impl fmt::Display for NotoSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pixels())
    }
}

/// Source file URL for a Twemoji, in the corresponding format.
pub fn twemoji_url(codepoint: &str, format: AssetFormat) -> String {
    let base = match format {
        AssetFormat::Png => TWEMOJI_PNG_BASE,
        AssetFormat::Svg => TWEMOJI_SVG_BASE,
    };
    format!("{}{}.{}", base, codepoint, format.extension())
}

/// Source file URL for a Noto emoji, in the corresponding format.
///
/// Noto file names join component codepoints with underscores; the size
/// only applies to PNG assets.
pub fn noto_url(codepoint: &str, format: AssetFormat, size: NotoSize) -> String {
    let codepoint = codepoint.replace('-', "_");
    match format {
        AssetFormat::Svg => format!("{}/svg/emoji_u{}.svg", NOTO_BASE, codepoint),
        AssetFormat::Png => format!("{}/png/{}/emoji_u{}.png", NOTO_BASE, size, codepoint),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twemoji_urls_match_the_source_layout() {
        assert_eq!(
            twemoji_url("1f40d", AssetFormat::Png),
            "https://raw.githubusercontent.com/twitter/twemoji/master/assets/72x72/1f40d.png"
        );
        assert_eq!(
            twemoji_url("1f1f8-1f1ea", AssetFormat::Svg),
            "https://raw.githubusercontent.com/twitter/twemoji/master/assets/svg/1f1f8-1f1ea.svg"
        );
    }

    #[test]
    fn noto_urls_use_underscores_and_size_tiers() {
        assert_eq!(
            noto_url("1f1f8-1f1ea", AssetFormat::Svg, NotoSize::S128),
            "https://raw.githubusercontent.com/googlefonts/noto-emoji/main/svg/emoji_u1f1f8_1f1ea.svg"
        );
        assert_eq!(
            noto_url("1f605", AssetFormat::Png, NotoSize::S128),
            "https://raw.githubusercontent.com/googlefonts/noto-emoji/main/png/128/emoji_u1f605.png"
        );
    }
}
