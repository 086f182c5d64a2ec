//! Rendering configuration.
//!
//! A [`Dialect`] decides how the dialect-neutral [`Sql`](crate::Sql) fragment
//! becomes text: which placeholder token marks a bound argument, which
//! characters quote identifiers, and whether `LIKE` patterns are spliced as
//! literals or bound.
//!
//! # Example
//!
//! ```
//! use sqlcompose::{Dialect, PatternMode, Placeholder};
//!
//! let dialect = Dialect::mysql()
//!     .with_placeholder(Placeholder::Question)
//!     .with_pattern_mode(PatternMode::Bind);
//! assert_eq!(dialect.placeholder, Placeholder::Question);
//!
//! let from_file = Dialect::from_toml_str(r#"
//!     placeholder = "numbered"
//!     quote = { open = '"', close = '"' }
//! "#).unwrap();
//! assert_eq!(from_file, Dialect::postgres());
//! ```

use crate::error::QbResult;
use serde::{Deserialize, Serialize};

/// Positional placeholder token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// `%s` (DB-API format style)
    #[default]
    Format,
    /// `?`
    Question,
    /// `$1`, `$2`, ... numbered in final order
    Numbered,
}

/// How `LIKE`-family operands are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternMode {
    /// Splice the wildcarded operand into the SQL text as a quoted literal.
    ///
    /// The operand is not parameterized; only use it with application-controlled
    /// strings.
    #[default]
    Inline,
    /// Bind the wildcarded operand as an argument.
    Bind,
}

/// Identifier quote pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub open: char,
    pub close: char,
}

impl Quote {
    pub const BACKTICK: Quote = Quote::new('`', '`');
    pub const DOUBLE: Quote = Quote::new('"', '"');
    pub const BRACKET: Quote = Quote::new('[', ']');

    pub const fn new(open: char, close: char) -> Self {
        Self { open, close }
    }

    /// Quote `name`, doubling any embedded closing character.
    pub fn write(&self, name: &str, out: &mut String) {
        out.push(self.open);
        for ch in name.chars() {
            if ch == self.close {
                out.push(ch);
            }
            out.push(ch);
        }
        out.push(self.close);
    }
}

impl Default for Quote {
    fn default() -> Self {
        Self::BACKTICK
    }
}

/// Rendering configuration. Defaults to the MySQL conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    pub placeholder: Placeholder,
    pub quote: Quote,
    pub pattern: PatternMode,
}

impl Dialect {
    /// `%s` placeholders, backtick quoting, inline patterns.
    pub fn mysql() -> Self {
        Self::default()
    }

    /// `?` placeholders, double-quote quoting.
    pub fn sqlite() -> Self {
        Self {
            placeholder: Placeholder::Question,
            quote: Quote::DOUBLE,
            pattern: PatternMode::Inline,
        }
    }

    /// `$n` placeholders, double-quote quoting.
    pub fn postgres() -> Self {
        Self {
            placeholder: Placeholder::Numbered,
            quote: Quote::DOUBLE,
            pattern: PatternMode::Inline,
        }
    }

    /// Set the placeholder style.
    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Set the identifier quote pair.
    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quote = quote;
        self
    }

    /// Set how pattern operands are rendered.
    pub fn with_pattern_mode(mut self, pattern: PatternMode) -> Self {
        self.pattern = pattern;
        self
    }

    /// Load a dialect from a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> QbResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Load a dialect from a JSON document; missing keys keep their defaults.
    pub fn from_json_str(raw: &str) -> QbResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub(crate) fn write_placeholder(&self, index: usize, out: &mut String) {
        match self.placeholder {
            Placeholder::Format => out.push_str("%s"),
            Placeholder::Question => out.push('?'),
            Placeholder::Numbered => {
                use std::fmt::Write;
                let _ = write!(out, "${}", index);
            }
        }
    }

    /// Quote a literal pattern for inline splicing.
    pub(crate) fn write_literal(&self, text: &str, out: &mut String) {
        out.push('\'');
        for ch in text.chars() {
            match ch {
                '\'' => out.push_str("''"),
                '%' if self.placeholder == Placeholder::Format => out.push_str("%%"),
                _ => out.push(ch),
            }
        }
        out.push('\'');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_mysql() {
        let d = Dialect::default();
        assert_eq!(d.placeholder, Placeholder::Format);
        assert_eq!(d.quote, Quote::BACKTICK);
        assert_eq!(d.pattern, PatternMode::Inline);
    }

    #[test]
    fn quote_doubles_closing_char() {
        let mut out = String::new();
        Quote::BACKTICK.write("we`ird", &mut out);
        assert_eq!(out, "`we``ird`");

        let mut out = String::new();
        Quote::BRACKET.write("a]b", &mut out);
        assert_eq!(out, "[a]]b]");
    }

    #[test]
    fn literal_escaping_follows_placeholder() {
        let mut out = String::new();
        Dialect::mysql().write_literal("%it's%", &mut out);
        assert_eq!(out, "'%%it''s%%'");

        let mut out = String::new();
        Dialect::sqlite().write_literal("%it's%", &mut out);
        assert_eq!(out, "'%it''s%'");
    }

    #[test]
    fn toml_partial_override() {
        let d = Dialect::from_toml_str("pattern = \"bind\"").unwrap();
        assert_eq!(d.pattern, PatternMode::Bind);
        assert_eq!(d.placeholder, Placeholder::Format);
    }

    #[test]
    fn json_config() {
        let d = Dialect::from_json_str(r#"{"placeholder":"question"}"#).unwrap();
        assert_eq!(d.placeholder, Placeholder::Question);
    }

    #[test]
    fn malformed_config_is_config_error() {
        let err = Dialect::from_toml_str("placeholder = \"colon\"").unwrap_err();
        assert!(matches!(err, crate::QbError::Config(_)));
    }
}
