//! Digit renderer: turns a count into a row of digit images.
//!
//! The count is formatted in base 10, left-padded with zeros up to the pad
//! width, and each digit becomes an `<img>` whose `alt` text is the digit
//! itself. The images are wrapped in a `<span>` labelled "Hit counter".
//!
//! ```rust
//! use hitcounter::render::render;
//!
//! let html = render(99, 4, "green");
//! assert_eq!(html.matches("<img").count(), 4);
//! assert!(html.contains(r#"alt="0""#));
//! assert!(html.contains(r#"alt="9""#));
//! ```

use crate::styles::Style;

/// Accessible label carried by the wrapping element.
pub const LABEL: &str = "Hit counter";

/// Largest pad width honoured; wider settings are clamped to it.
pub const MAX_PAD_DIGITS: i32 = 32;

/// Formats `count` in base 10, left-padded with `'0'` to at least
/// `pad_digits` characters.
///
/// Padding is a floor: counts wider than `pad_digits` are never truncated,
/// and `pad_digits <= 0` leaves the natural representation unchanged.
/// Widths above [`MAX_PAD_DIGITS`] are clamped.
pub fn pad(count: u64, pad_digits: i32) -> String {
    let width = usize::try_from(pad_digits.min(MAX_PAD_DIGITS)).unwrap_or(0);
    format!("{count:0>width$}")
}

/// Renders `count` as markup using the digit images of `style`.
///
/// Unknown style names use the default style, so rendering never fails.
pub fn render(count: u64, pad_digits: i32, style: &str) -> String {
    let style = Style::from_name(style);
    let digits = pad(count, pad_digits);

    let mut out = String::with_capacity(64 + digits.len() * 48);
    out.push_str(r#"<span class="hit-counter" title=""#);
    out.push_str(LABEL);
    out.push_str(r#"" aria-label=""#);
    out.push_str(LABEL);
    out.push_str(r#"">"#);
    for ch in digits.chars() {
        // `digits` holds only ASCII digits, which always resolve.
        if let Some(asset) = ch.to_digit(10).and_then(|d| style.asset(d)) {
            out.push_str(&format!(r#"<img src="{asset}" alt="{ch}">"#));
        }
    }
    out.push_str("</span>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alts(html: &str) -> Vec<String> {
        html.split(r#"alt=""#)
            .skip(1)
            .map(|rest| rest.split('"').next().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_pad_shorter_than_width() {
        assert_eq!(pad(99, 4), "0099");
        assert_eq!(pad(0, 3), "000");
    }

    #[test]
    fn test_pad_never_truncates() {
        assert_eq!(pad(123456, 3), "123456");
        assert_eq!(pad(u64::MAX, 5), "18446744073709551615");
    }

    #[test]
    fn test_pad_width_is_clamped() {
        assert_eq!(pad(7, i32::MAX).len(), MAX_PAD_DIGITS as usize);
        assert_eq!(pad(7, MAX_PAD_DIGITS + 1), pad(7, MAX_PAD_DIGITS));
    }

    #[test]
    fn test_render_markup_shape() {
        assert_eq!(
            render(5, 0, "green"),
            concat!(
                r#"<span class="hit-counter" title="Hit counter" aria-label="Hit counter">"#,
                r#"<img src="/hitcounter/green/5.gif" alt="5">"#,
                "</span>"
            )
        );
    }

    #[test]
    fn test_pad_non_positive_width() {
        assert_eq!(pad(42, 0), "42");
        assert_eq!(pad(42, -5), "42");
    }

    #[test]
    fn test_render_padded_digits() {
        let html = render(99, 4, "green");
        assert_eq!(html.matches("<img").count(), 4);
        assert_eq!(alts(&html), vec!["0", "0", "9", "9"]);
    }

    #[test]
    fn test_render_wider_than_pad() {
        let html = render(12345, 2, "green");
        assert_eq!(alts(&html), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_render_zero() {
        let html = render(0, 0, "green");
        assert_eq!(alts(&html), vec!["0"]);
    }

    #[test]
    fn test_render_has_label() {
        let html = render(7, 0, "yellow");
        assert!(html.starts_with("<span"));
        assert!(html.ends_with("</span>"));
        assert!(html.contains("Hit counter"));
        assert!(html.contains("/hitcounter/yellow/7.gif"));
    }

    #[test]
    fn test_render_unknown_style_uses_default() {
        assert_eq!(render(31, 3, "no-such-style"), render(31, 3, "green"));
        assert_eq!(render(31, 3, ""), render(31, 3, "green"));
    }

    #[test]
    fn test_render_digits_in_order() {
        let html = render(907, 0, "odometer");
        let first = html.find("/odometer/9.gif").unwrap();
        let second = html.find("/odometer/0.gif").unwrap();
        let third = html.find("/odometer/7.gif").unwrap();
        assert!(first < second && second < third);
    }
}
