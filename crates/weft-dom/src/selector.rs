#![forbid(unsafe_code)]

//! Compound selectors: `tag`, `#id`, `.class`, and combinations such as
//! `input.field` or `div#app`. Combinators and attribute selectors are not
//! supported; such input fails to parse and matches nothing.

/// A parsed compound selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parse a compound selector. Returns `None` for empty or unsupported input.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let mut selector = Self::default();
        let mut rest = input;

        let tag_len = rest.find(['#', '.']).unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if !is_ident(tag) {
                return None;
            }
            selector.tag = Some(tag.to_ascii_lowercase());
            rest = &rest[tag_len..];
        }

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let len = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..len];
            if !is_ident(name) {
                return None;
            }
            match marker {
                '#' if selector.id.is_none() => selector.id = Some(name.to_owned()),
                '.' => selector.classes.push(name.to_owned()),
                _ => return None,
            }
            rest = &body[len..];
        }

        Some(selector)
    }

    /// Whether an element with the given tag, id, and class list matches.
    #[must_use]
    pub fn matches(&self, tag: &str, id: Option<&str>, class_attr: Option<&str>) -> bool {
        if self
            .tag
            .as_deref()
            .is_some_and(|want| !want.eq_ignore_ascii_case(tag))
        {
            return false;
        }
        if self.id.is_some() && self.id.as_deref() != id {
            return false;
        }
        let classes: Vec<&str> = class_attr
            .map(|c| c.split_ascii_whitespace().collect())
            .unwrap_or_default();
        self.classes
            .iter()
            .all(|want| classes.contains(&want.as_str()))
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_forms() {
        assert!(Selector::parse("div").is_some());
        assert!(Selector::parse("#app").is_some());
        assert!(Selector::parse(".a.b").is_some());
        assert!(Selector::parse("input#name.field").is_some());
    }

    #[test]
    fn parse_rejects_unsupported() {
        assert_eq!(Selector::parse(""), None);
        assert_eq!(Selector::parse("   "), None);
        assert_eq!(Selector::parse("div p"), None);
        assert_eq!(Selector::parse("div > p"), None);
        assert_eq!(Selector::parse("[v-model]"), None);
        assert_eq!(Selector::parse("#"), None);
        assert_eq!(Selector::parse("#a#b"), None);
    }

    #[test]
    fn matching() {
        let sel = Selector::parse("input.field").unwrap();
        assert!(sel.matches("input", None, Some("big field")));
        assert!(sel.matches("INPUT", None, Some("field")));
        assert!(!sel.matches("input", None, Some("fields")));
        assert!(!sel.matches("div", None, Some("field")));

        let sel = Selector::parse("#app").unwrap();
        assert!(sel.matches("div", Some("app"), None));
        assert!(!sel.matches("div", Some("other"), None));
        assert!(!sel.matches("div", None, None));
    }
}
