#![forbid(unsafe_code)]

//! A small HTML-like markup reader and writer for building fixtures.
//!
//! Supported: elements with quoted, unquoted, or bare attributes; void
//! elements (`input`, `br`, `hr`, `img`, `meta`, `link`); self-closing
//! `<x/>`; comments; text with the five basic entities. Whitespace is kept
//! as written. Doctypes, CDATA, and raw-text elements are not supported.

use weft_core::{Host, NodeId, NodeKind};

use crate::document::Document;
use crate::error::ParseError;

const VOID_TAGS: &[&str] = &["input", "br", "hr", "img", "meta", "link"];

impl Document {
    /// Parse markup into a fresh document whose root holds the parsed nodes.
    pub fn parse(markup: &str) -> Result<Self, ParseError> {
        let doc = Self::new();
        parse_into(&doc, doc.root(), markup)?;
        Ok(doc)
    }
}

/// Parse `markup` and append the resulting nodes under `parent`.
pub fn parse_into(doc: &Document, parent: NodeId, markup: &str) -> Result<(), ParseError> {
    let mut reader = Reader { src: markup, pos: 0 };
    let mut open: Vec<(NodeId, String)> = Vec::new();

    while !reader.at_end() {
        let current = open.last().map_or(parent, |(id, _)| *id);

        if reader.eat("<!--") {
            let start = reader.pos;
            let end = reader.find("-->").ok_or(ParseError::UnexpectedEof { offset: start })?;
            let comment = doc.create_comment(&markup[start..end]);
            attach(doc, current, comment);
            reader.pos = end + 3;
        } else if reader.eat("</") {
            let offset = reader.pos;
            let name = reader.ident().ok_or(ParseError::InvalidTag { offset })?;
            reader.skip_ws();
            if !reader.eat(">") {
                return Err(ParseError::InvalidTag { offset });
            }
            match open.pop() {
                Some((_, tag)) if tag == name => {}
                Some((_, tag)) => {
                    return Err(ParseError::MismatchedClose {
                        expected: Some(tag),
                        found: name,
                        offset,
                    });
                }
                None => {
                    return Err(ParseError::MismatchedClose {
                        expected: None,
                        found: name,
                        offset,
                    });
                }
            }
        } else if reader.peek() == Some('<') {
            reader.pos += 1;
            let offset = reader.pos;
            let tag = reader.ident().ok_or(ParseError::InvalidTag { offset })?;
            let element = doc.create_element(&tag);
            let self_closing = read_attributes(&mut reader, doc, element)?;
            attach(doc, current, element);
            if !self_closing && !VOID_TAGS.contains(&tag.as_str()) {
                open.push((element, tag));
            }
        } else {
            let start = reader.pos;
            let end = reader.find("<").unwrap_or(markup.len());
            let text = doc.create_text_node(&decode_entities(&markup[start..end]));
            attach(doc, current, text);
            reader.pos = end;
        }
    }

    match open.pop() {
        Some((_, tag)) => Err(ParseError::Unclosed { tag }),
        None => Ok(()),
    }
}

/// Read attributes up to and including `>` or `/>`. Returns whether the
/// tag was self-closing.
fn read_attributes(
    reader: &mut Reader<'_>,
    doc: &Document,
    element: NodeId,
) -> Result<bool, ParseError> {
    loop {
        reader.skip_ws();
        if reader.eat("/>") {
            return Ok(true);
        }
        if reader.eat(">") {
            return Ok(false);
        }
        let offset = reader.pos;
        let name = reader
            .attr_name()
            .ok_or(if reader.at_end() {
                ParseError::UnexpectedEof { offset }
            } else {
                ParseError::InvalidTag { offset }
            })?;
        reader.skip_ws();
        let value = if reader.eat("=") {
            reader.skip_ws();
            reader.attr_value().ok_or(ParseError::UnexpectedEof { offset })?
        } else {
            String::new()
        };
        // A fresh element always accepts attributes.
        let _ = doc.set_attribute(element, &name, &decode_entities(&value));
    }
}

fn attach(doc: &Document, parent: NodeId, child: NodeId) {
    // Freshly created nodes under a container cannot violate the hierarchy.
    let _ = doc.append_child(parent, child);
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl Reader<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn find(&self, needle: &str) -> Option<usize> {
        self.rest().find(needle).map(|i| self.pos + i)
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &str {
        let start = self.pos;
        let len = self
            .rest()
            .find(|c: char| !pred(c))
            .unwrap_or(self.rest().len());
        self.pos += len;
        &self.src[start..self.pos]
    }

    fn ident(&mut self) -> Option<String> {
        let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        (!name.is_empty()).then(|| name.to_ascii_lowercase())
    }

    fn attr_name(&mut self) -> Option<String> {
        let name = self.take_while(|c| {
            !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<')
        });
        (!name.is_empty()).then(|| name.to_owned())
    }

    fn attr_value(&mut self) -> Option<String> {
        match self.peek()? {
            quote @ ('"' | '\'') => {
                self.pos += 1;
                let end = self.rest().find(quote)?;
                let value = self.rest()[..end].to_owned();
                self.pos += end + 1;
                Some(value)
            }
            _ => {
                let value = self.take_while(|c| !c.is_whitespace() && c != '>');
                Some(value.to_owned())
            }
        }
    }
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_owned();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

pub(crate) fn serialize(doc: &Document, node: NodeId, out: &mut String) {
    match doc.node_kind(node) {
        NodeKind::Text => escape_text(&doc.text_content(node).unwrap_or_default(), out),
        NodeKind::Comment => {
            out.push_str("<!--");
            out.push_str(&doc.text_content(node).unwrap_or_default());
            out.push_str("-->");
        }
        NodeKind::Document => {
            for child in doc.child_nodes(node) {
                serialize(doc, child, out);
            }
        }
        NodeKind::Element => {
            let tag = doc.tag_name(node).unwrap_or_default();
            out.push('<');
            out.push_str(&tag);
            for attr in doc.attributes(node) {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_attr(&attr.value, out);
                out.push('"');
            }
            out.push('>');
            if VOID_TAGS.contains(&tag.as_str()) {
                return;
            }
            for child in doc.child_nodes(node) {
                serialize(doc, child, out);
            }
            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        }
    }
}
