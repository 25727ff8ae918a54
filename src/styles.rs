//! Style registry: maps a style name and a digit to an image asset.
//!
//! The set of styles is closed. Adding a style means adding a variant and
//! its asset table; lookup logic does not change.
//!
//! # Examples
//!
//! ```rust
//! use hitcounter::styles::{resolve, Style};
//!
//! assert_eq!(resolve("yellow", '7'), Some("/hitcounter/yellow/7.gif"));
//!
//! // Unknown styles resolve with the default style.
//! assert_eq!(resolve("neon", '7'), Style::default().asset(7));
//!
//! // Only decimal digits have assets.
//! assert_eq!(resolve("green", 'x'), None);
//! ```

/// Reference to a digit image, usable as an `src` attribute.
pub type AssetRef = &'static str;

macro_rules! digit_assets {
    ($style:literal) => {
        [
            concat!("/hitcounter/", $style, "/0.gif"),
            concat!("/hitcounter/", $style, "/1.gif"),
            concat!("/hitcounter/", $style, "/2.gif"),
            concat!("/hitcounter/", $style, "/3.gif"),
            concat!("/hitcounter/", $style, "/4.gif"),
            concat!("/hitcounter/", $style, "/5.gif"),
            concat!("/hitcounter/", $style, "/6.gif"),
            concat!("/hitcounter/", $style, "/7.gif"),
            concat!("/hitcounter/", $style, "/8.gif"),
            concat!("/hitcounter/", $style, "/9.gif"),
        ]
    };
}

const GREEN: [AssetRef; 10] = digit_assets!("green");
const YELLOW: [AssetRef; 10] = digit_assets!("yellow");
const ODOMETER: [AssetRef; 10] = digit_assets!("odometer");
const CLASSIC: [AssetRef; 10] = digit_assets!("classic");

/// Available digit styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Style {
    /// Green seven-segment digits (default)
    #[default]
    Green,
    /// Yellow seven-segment digits
    Yellow,
    /// Mechanical odometer wheels
    Odometer,
    /// Black-on-white serif digits
    Classic,
}

impl Style {
    /// Every known style, in declaration order.
    pub const ALL: [Style; 4] = [Style::Green, Style::Yellow, Style::Odometer, Style::Classic];

    /// Looks up a style by name, falling back to [`Style::default`].
    ///
    /// Matching is ASCII case-insensitive and ignores surrounding whitespace,
    /// so an empty name yields the default style.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    /// Returns the canonical name of the style.
    pub const fn name(self) -> &'static str {
        match self {
            Style::Green => "green",
            Style::Yellow => "yellow",
            Style::Odometer => "odometer",
            Style::Classic => "classic",
        }
    }

    /// Returns the asset for a digit value, or `None` if `digit > 9`.
    pub fn asset(self, digit: u32) -> Option<AssetRef> {
        let table = match self {
            Style::Green => &GREEN,
            Style::Yellow => &YELLOW,
            Style::Odometer => &ODOMETER,
            Style::Classic => &CLASSIC,
        };
        table.get(digit as usize).copied()
    }
}

/// Resolves the asset for `digit` in the style named `style`.
///
/// Returns `None` only when `digit` is not an ASCII decimal digit.
pub fn resolve(style: &str, digit: char) -> Option<AssetRef> {
    let value = digit.to_digit(10)?;
    Style::from_name(style).asset(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_style() {
        assert_eq!(resolve("green", '0'), Some("/hitcounter/green/0.gif"));
        assert_eq!(resolve("odometer", '9'), Some("/hitcounter/odometer/9.gif"));
        assert_eq!(resolve("classic", '4'), Some("/hitcounter/classic/4.gif"));
    }

    #[test]
    fn test_resolve_is_total_over_digits() {
        for style in Style::ALL {
            for digit in '0'..='9' {
                let asset = resolve(style.name(), digit).unwrap();
                assert!(asset.contains(style.name()));
                assert!(asset.ends_with(&format!("{digit}.gif")));
            }
        }
    }

    #[test]
    fn test_unknown_style_falls_back_to_default() {
        assert_eq!(Style::from_name("does-not-exist"), Style::Green);
        assert_eq!(resolve("does-not-exist", '3'), resolve("green", '3'));
    }

    #[test]
    fn test_empty_style_is_default() {
        assert_eq!(Style::from_name(""), Style::default());
    }

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(Style::from_name("Yellow"), Style::Yellow);
        assert_eq!(Style::from_name(" ODOMETER "), Style::Odometer);
    }

    #[test]
    fn test_non_digit_has_no_asset() {
        assert_eq!(resolve("green", '-'), None);
        assert_eq!(resolve("green", 'a'), None);
        assert_eq!(Style::Green.asset(10), None);
    }

    #[test]
    fn test_name_round_trips() {
        for style in Style::ALL {
            assert_eq!(Style::from_name(style.name()), style);
        }
    }
}
