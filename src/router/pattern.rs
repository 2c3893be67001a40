use super::error::{RouteError, RouteResult};
use regex::Regex;
use std::fmt;

/// A compiled path pattern.
///
/// The source is a regular expression matched against the *whole* request
/// path. Parenthesized groups are captures, handed out left to right as raw
/// strings.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `pattern`, anchoring it at both ends.
    pub fn new(pattern: impl Into<String>) -> RouteResult<Self> {
        let source = pattern.into();
        let invalid = |source_err: regex::Error| RouteError::InvalidPattern {
            pattern: source.clone(),
            source: source_err,
        };

        // the bare source must compile on its own, or a stray `)` closes the wrapper early
        Regex::new(&source).map_err(invalid)?;
        // the group keeps a top-level alternation like `a|b` anchored on both sides
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(invalid)?;

        Ok(Self { source, regex })
    }

    /// Returns the ordered captures when `path` satisfies the pattern.
    ///
    /// Groups that did not take part in the match yield an empty string so
    /// positions stay stable.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(path)?;

        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map_or_else(String::new, |m| m.as_str().to_owned()))
                .collect(),
        )
    }

    /// Whether `path` satisfies the pattern, without extracting captures.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Number of capture groups the pattern declares.
    pub fn capture_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl TryFrom<&str> for Pattern {
    type Error = RouteError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Pattern::new(value)
    }
}
