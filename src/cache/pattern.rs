//! Key Pattern Module
//!
//! Parses `%` wildcard search patterns used by `get_like_key`.
//!
//! Only the edges of a pattern are significant: at most one leading and one
//! trailing `%` are stripped, and any `%` left inside the literal is matched
//! as an ordinary character.

// == Match Mode ==
/// How the literal part of a pattern is positioned within a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// `text` - the whole key equals the literal
    Exact,
    /// `text%` - the key starts with the literal
    Prefix,
    /// `%text` - the key ends with the literal
    Suffix,
    /// `%text%` - the key contains the literal anywhere
    Contains,
}

// == Key Pattern ==
/// A parsed search pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    literal: String,
    mode: MatchMode,
}

impl KeyPattern {
    /// Parses a pattern string.
    ///
    /// `%` and `%%` both parse to an empty literal and match every key.
    pub fn parse(pattern: &str) -> Self {
        let (leading, rest) = match pattern.strip_prefix('%') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let (trailing, literal) = match rest.strip_suffix('%') {
            Some(literal) => (true, literal),
            None => (false, rest),
        };

        let mode = match (leading, trailing) {
            (true, true) => MatchMode::Contains,
            (true, false) => MatchMode::Suffix,
            (false, true) => MatchMode::Prefix,
            (false, false) => MatchMode::Exact,
        };

        Self {
            literal: literal.to_string(),
            mode,
        }
    }

    /// The literal text with edge wildcards removed.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Where the literal must sit within a matching key.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Tests a key against the pattern.
    pub fn matches(&self, key: &str) -> bool {
        let literal = self.literal.as_str();
        match self.mode {
            MatchMode::Exact => key == literal,
            MatchMode::Prefix => key.starts_with(literal),
            MatchMode::Suffix => key.ends_with(literal),
            MatchMode::Contains => key.contains(literal),
        }
    }
}
