#![forbid(unsafe_code)]

//! Text interpolation templates.
//!
//! A template is the ORIGINAL text of a text node plus the location of its
//! single interpolation span. Rendering always substitutes into the stored
//! original, never into whatever the node currently displays, so repeated
//! renders cannot corrupt the template.
//!
//! # Invariants
//!
//! 1. Only the first `{{ ... }}` span is recognized; later spans are
//!    literal text.
//! 2. The span closes at the first closing delimiter after the opening one.
//! 3. The captured expression is trimmed and used verbatim as a data key.
//!    An empty key is not a template.
//! 4. `render` is a pure function of (template, value).

use std::ops::Range;

/// Default interpolation delimiters.
pub const DEFAULT_DELIMITERS: (&str, &str) = ("{{", "}}");

/// A parsed single-span interpolation template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    span: Range<usize>,
    key: String,
}

impl Template {
    /// Parse with the default `{{` / `}}` delimiters.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        Self::parse_with(text, DEFAULT_DELIMITERS.0, DEFAULT_DELIMITERS.1)
    }

    /// Parse with custom delimiters. Returns `None` when there is no
    /// complete span or the captured key is blank.
    #[must_use]
    pub fn parse_with(text: &str, open: &str, close: &str) -> Option<Self> {
        if open.is_empty() || close.is_empty() {
            return None;
        }
        let start = text.find(open)?;
        let inner_start = start + open.len();
        let inner_len = text[inner_start..].find(close)?;
        let inner_end = inner_start + inner_len;

        let key = text[inner_start..inner_end].trim();
        if key.is_empty() {
            return None;
        }

        Some(Self {
            source: text.to_owned(),
            span: start..inner_end + close.len(),
            key: key.to_owned(),
        })
    }

    /// The data key captured by the span.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The original, unsubstituted text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Byte range of the span (delimiters included) within `source`.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Substitute `value` for the span.
    #[must_use]
    pub fn render(&self, value: &str) -> String {
        let mut out = String::with_capacity(self.source.len() + value.len());
        out.push_str(&self.source[..self.span.start]);
        out.push_str(value);
        out.push_str(&self.source[self.span.end..]);
        out
    }
}
