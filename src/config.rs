//! Counter configuration.
//!
//! A [`HitCounterConfig`] holds the three settings of a counter: the digit
//! style, the minimum number of rendered digits and the seed for unseen
//! keys. It can be built from a directive block:
//!
//! ```text
//! hitCounter {
//!     style odometer      # digit images
//!     pad_digits 7
//!     initial_seed 50000
//! }
//! ```
//!
//! or from its JSON form:
//!
//! ```json
//! { "style": "odometer", "pad_digits": 7, "initial_seed": 50000 }
//! ```
//!
//! Every setting is optional. Malformed values are rejected here so that a
//! provisioned counter never fails because of its configuration.
//!
//! ```rust
//! use hitcounter::config::HitCounterConfig;
//!
//! let config: HitCounterConfig = "hitCounter {\n  pad_digits 4\n}".parse().unwrap();
//! assert_eq!(config.pad_digits, 4);
//! assert_eq!(config.initial_seed, 0);
//! assert_eq!(config.style, "");
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::MAX_PAD_DIGITS;

/// Settings of a hit counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HitCounterConfig {
    /// Style name, resolved when rendering. Empty means the default style.
    pub style: String,
    /// Minimum number of rendered digits. Zero or less disables padding.
    pub pad_digits: i32,
    /// Starting value for keys seen for the first time.
    pub initial_seed: u64,
}

impl HitCounterConfig {
    /// Name of the directive opening a configuration block.
    pub const DIRECTIVE: &'static str = "hitCounter";

    /// Parses a `hitCounter { ... }` directive block.
    ///
    /// Each property takes exactly one argument and a repeated property
    /// keeps its last value. `#` starts a comment and arguments may be
    /// double-quoted.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let tokens = tokenize(input)?;
        let mut tokens = tokens.iter().peekable();

        let directive = tokens.next().ok_or_else(|| ConfigError::Syntax {
            message: format!("expected '{}' directive", Self::DIRECTIVE),
            line: 1,
        })?;
        if directive.quoted || directive.text != Self::DIRECTIVE {
            return Err(ConfigError::Syntax {
                message: format!(
                    "expected '{}' directive, found '{}'",
                    Self::DIRECTIVE,
                    directive.text
                ),
                line: directive.line,
            });
        }

        let mut config = Self::default();

        let open = match tokens.next() {
            None => return Ok(config),
            Some(token) => token,
        };
        if !open.is_open() {
            return Err(ConfigError::Syntax {
                message: format!("unexpected '{}' after directive", open.text),
                line: open.line,
            });
        }

        loop {
            let property = tokens.next().ok_or_else(|| ConfigError::Syntax {
                message: "unclosed block, expected '}'".to_string(),
                line: open.line,
            })?;
            if property.is_close() {
                break;
            }
            if property.is_open() {
                return Err(ConfigError::Syntax {
                    message: "unexpected '{'".to_string(),
                    line: property.line,
                });
            }

            let mut args = Vec::new();
            while let Some(arg) = tokens.next_if(|t| t.line == property.line && !t.is_close()) {
                if arg.is_open() {
                    return Err(ConfigError::Syntax {
                        message: format!("unexpected '{{' after '{}'", property.text),
                        line: arg.line,
                    });
                }
                args.push(arg.text.as_str());
            }
            config.apply(&property.text, &args, property.line)?;
        }

        if let Some(extra) = tokens.next() {
            return Err(ConfigError::Syntax {
                message: format!("unexpected '{}' after block", extra.text),
                line: extra.line,
            });
        }
        Ok(config)
    }

    /// Decodes the JSON form of the configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        check_pad_digits(config.pad_digits, &config.pad_digits.to_string(), 0)?;
        Ok(config)
    }

    /// Applies a single `property args...` line.
    fn apply(&mut self, property: &str, args: &[&str], line: usize) -> Result<(), ConfigError> {
        let value = match property {
            "style" | "pad_digits" | "initial_seed" => single_arg(property, args, line)?,
            _ => {
                return Err(ConfigError::UnknownProperty {
                    property: property.to_string(),
                    line,
                })
            }
        };

        match property {
            "style" => self.style = value.to_string(),
            "pad_digits" => {
                let pad_digits = value.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidPadDigits {
                        value: value.to_string(),
                        reason: e.to_string(),
                        line,
                    }
                })?;
                self.pad_digits = check_pad_digits(pad_digits, value, line)?;
            }
            _ => {
                // `u64::from_str` takes a leading '+'; a seed is digits only.
                if !value.starts_with(|c: char| c.is_ascii_digit()) {
                    return Err(ConfigError::InvalidInitialSeed {
                        value: value.to_string(),
                        reason: "not a non-negative integer".to_string(),
                        line,
                    });
                }
                self.initial_seed = value.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidInitialSeed {
                        value: value.to_string(),
                        reason: e.to_string(),
                        line,
                    }
                })?;
            }
        }
        Ok(())
    }
}

impl FromStr for HitCounterConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn check_pad_digits(pad_digits: i32, value: &str, line: usize) -> Result<i32, ConfigError> {
    if pad_digits > MAX_PAD_DIGITS {
        return Err(ConfigError::InvalidPadDigits {
            value: value.to_string(),
            reason: format!("must be at most {MAX_PAD_DIGITS}"),
            line,
        });
    }
    Ok(pad_digits)
}

fn single_arg<'a>(property: &str, args: &[&'a str], line: usize) -> Result<&'a str, ConfigError> {
    match args {
        [value] => Ok(*value),
        [] => Err(ConfigError::MissingArgument {
            property: property.to_string(),
            line,
        }),
        _ => Err(ConfigError::TooManyArguments {
            property: property.to_string(),
            line,
        }),
    }
}

#[derive(Debug)]
struct Token {
    text: String,
    line: usize,
    quoted: bool,
}

impl Token {
    fn is_open(&self) -> bool {
        !self.quoted && self.text == "{"
    }

    fn is_close(&self) -> bool {
        !self.quoted && self.text == "}"
    }
}

/// Splits `input` into whitespace-separated tokens.
///
/// Braces are always tokens of their own unless quoted.
fn tokenize(input: &str) -> Result<Vec<Token>, ConfigError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;

    while let Some(&ch) = chars.peek() {
        match ch {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while chars.next_if(|&c| c != '\n').is_some() {}
            }
            '{' | '}' => {
                chars.next();
                tokens.push(Token {
                    text: ch.to_string(),
                    line,
                    quoted: false,
                });
            }
            '"' => {
                chars.next();
                let start = line;
                let mut text = String::new();
                loop {
                    match chars.next() {
                        None => {
                            return Err(ConfigError::Syntax {
                                message: "unterminated quoted string".to_string(),
                                line: start,
                            })
                        }
                        Some('"') => break,
                        Some('\\') if chars.peek() == Some(&'"') => {
                            chars.next();
                            text.push('"');
                        }
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            text.push(c);
                        }
                    }
                }
                tokens.push(Token {
                    text,
                    line: start,
                    quoted: true,
                });
            }
            _ => {
                let mut text = String::new();
                while let Some(c) =
                    chars.next_if(|&c| !c.is_whitespace() && c != '{' && c != '}' && c != '"')
                {
                    text.push(c);
                }
                tokens.push(Token {
                    text,
                    line,
                    quoted: false,
                });
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<HitCounterConfig, ConfigError> {
        HitCounterConfig::parse(input)
    }

    fn config(style: &str, pad_digits: i32, initial_seed: u64) -> HitCounterConfig {
        HitCounterConfig {
            style: style.to_string(),
            pad_digits,
            initial_seed,
        }
    }

    #[test]
    fn test_valid_blocks() {
        let cases = [
            ("hitCounter {\n}", config("", 0, 0)),
            ("hitCounter {\n  style green\n}", config("green", 0, 0)),
            ("hitCounter {\n  pad_digits 5\n}", config("", 5, 0)),
            ("hitCounter {\n  initial_seed 1000\n}", config("", 0, 1000)),
            (
                "hitCounter {\n  style odometer\n  pad_digits 7\n  initial_seed 50000\n}",
                config("odometer", 7, 50000),
            ),
            (
                "hitCounter {\n  initial_seed 9999999999\n}",
                config("", 0, 9_999_999_999),
            ),
            (
                "hitCounter {\n  style green\n  style yellow\n}",
                config("yellow", 0, 0),
            ),
        ];

        for (input, want) in cases {
            assert_eq!(parse(input).unwrap(), want, "input: {input:?}");
        }
    }

    #[test]
    fn test_invalid_blocks() {
        let cases = [
            "hitCounter {\n  initial_seed abc\n}",
            "hitCounter {\n  initial_seed -100\n}",
            "hitCounter {\n  pad_digits xyz\n}",
            "hitCounter {\n  style\n}",
            "hitCounter {\n  initial_seed\n}",
            "hitCounter {\n  initial_seed 100 200\n}",
            "hitCounter {\n  unknown_property value\n}",
        ];

        for input in cases {
            assert!(parse(input).is_err(), "input: {input:?}");
        }
    }

    #[test]
    fn test_max_seed() {
        let config = parse("hitCounter {\n  initial_seed 18446744073709551615\n}").unwrap();
        assert_eq!(config.initial_seed, u64::MAX);
    }

    #[test]
    fn test_seed_overflow() {
        let err = parse("hitCounter {\n  initial_seed 18446744073709551616\n}").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInitialSeed { line: 2, .. }));
        assert!(err.to_string().contains("invalid initial seed value"));
    }

    #[test]
    fn test_zero_seed() {
        assert_eq!(parse("hitCounter {\n  initial_seed 0\n}").unwrap().initial_seed, 0);
    }

    #[test]
    fn test_signed_seed_rejected() {
        for input in [
            "hitCounter {\n  initial_seed +100\n}",
            "hitCounter {\n  initial_seed -0\n}",
        ] {
            let err = parse(input).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidInitialSeed { .. }), "input: {input:?}");
            assert!(err.to_string().contains("invalid initial seed value"));
        }
    }

    #[test]
    fn test_brace_as_argument_rejected() {
        assert!(matches!(
            parse("hitCounter {\n  style {\n}"),
            Err(ConfigError::Syntax { line: 2, .. })
        ));
        assert_eq!(
            parse("hitCounter {\n  style \"{\"\n}").unwrap().style,
            "{"
        );
    }

    #[test]
    fn test_pad_digits_upper_bound() {
        let at_max = format!("hitCounter {{\n  pad_digits {MAX_PAD_DIGITS}\n}}");
        assert_eq!(parse(&at_max).unwrap().pad_digits, MAX_PAD_DIGITS);

        assert!(matches!(
            parse("hitCounter {\n  pad_digits 2000000000\n}"),
            Err(ConfigError::InvalidPadDigits { .. })
        ));
        assert!(matches!(
            HitCounterConfig::from_json(r#"{"pad_digits": 2000000000}"#),
            Err(ConfigError::InvalidPadDigits { .. })
        ));
    }

    #[test]
    fn test_negative_pad_digits_accepted() {
        assert_eq!(parse("hitCounter {\n  pad_digits -3\n}").unwrap().pad_digits, -3);
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(
            parse("hitCounter {\n  style\n}"),
            Err(ConfigError::MissingArgument { .. })
        ));
        assert!(matches!(
            parse("hitCounter {\n  initial_seed 100 200\n}"),
            Err(ConfigError::TooManyArguments { .. })
        ));
        assert!(matches!(
            parse("hitCounter {\n  unknown_property value\n}"),
            Err(ConfigError::UnknownProperty { .. })
        ));
        assert!(matches!(
            parse("hitCounter {\n  pad_digits xyz\n}"),
            Err(ConfigError::InvalidPadDigits { .. })
        ));
    }

    #[test]
    fn test_bare_directive() {
        assert_eq!(parse("hitCounter").unwrap(), HitCounterConfig::default());
    }

    #[test]
    fn test_single_line_block() {
        assert_eq!(parse("hitCounter { }").unwrap(), HitCounterConfig::default());
        assert_eq!(
            parse("hitCounter {\n  style yellow }").unwrap(),
            config("yellow", 0, 0)
        );
    }

    #[test]
    fn test_comments_and_quotes() {
        let input = r#"
            # counter for the landing page
            hitCounter {
                style "odometer"   # wheels
                pad_digits 6
            }
        "#;
        assert_eq!(parse(input).unwrap(), config("odometer", 6, 0));
    }

    #[test]
    fn test_syntax_errors() {
        for input in [
            "",
            "counter {\n}",
            "hitCounter {\n  style green\n",
            "hitCounter extra",
            "hitCounter {\n}\n}",
            "hitCounter {\n  style \"green\n}",
        ] {
            assert!(
                matches!(parse(input), Err(ConfigError::Syntax { .. })),
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn test_from_str() {
        let config: HitCounterConfig = "hitCounter {\n  initial_seed 12\n}".parse().unwrap();
        assert_eq!(config.initial_seed, 12);
    }

    #[test]
    fn test_from_json() {
        let config =
            HitCounterConfig::from_json(r#"{"style":"yellow","pad_digits":4,"initial_seed":98}"#)
                .unwrap();
        assert_eq!(config, self::config("yellow", 4, 98));

        assert_eq!(
            HitCounterConfig::from_json("{}").unwrap(),
            HitCounterConfig::default()
        );
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        for json in [
            r#"{"initial_seed": -1}"#,
            r#"{"initial_seed": 18446744073709551616}"#,
            r#"{"pad_digits": "four"}"#,
            r#"{"colour": "green"}"#,
        ] {
            assert!(
                matches!(HitCounterConfig::from_json(json), Err(ConfigError::Json(_))),
                "json: {json}"
            );
        }
    }
}
