#![forbid(unsafe_code)]

use std::fmt;

use weft_core::NodeId;

/// Errors from tree mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The id was not issued by this document.
    UnknownNode(NodeId),
    /// The insertion would put a node under a leaf or under itself.
    HierarchyRequest { parent: NodeId, child: NodeId },
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "unknown node: {id}"),
            Self::HierarchyRequest { parent, child } => {
                write!(f, "cannot insert {child} under {parent}")
            }
        }
    }
}

impl std::error::Error for DomError {}

/// Errors from [`Document::parse`](crate::Document::parse).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input ended inside a tag or comment.
    UnexpectedEof { offset: usize },
    /// A tag name was missing or malformed.
    InvalidTag { offset: usize },
    /// A closing tag did not match the innermost open element.
    MismatchedClose {
        expected: Option<String>,
        found: String,
        offset: usize,
    },
    /// Elements were still open at end of input.
    Unclosed { tag: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof { offset } => write!(f, "unexpected end of input at {offset}"),
            Self::InvalidTag { offset } => write!(f, "invalid tag at {offset}"),
            Self::MismatchedClose {
                expected: Some(expected),
                found,
                offset,
            } => write!(f, "expected </{expected}>, found </{found}> at {offset}"),
            Self::MismatchedClose {
                expected: None,
                found,
                offset,
            } => write!(f, "unexpected </{found}> at {offset}"),
            Self::Unclosed { tag } => write!(f, "unclosed <{tag}>"),
        }
    }
}

impl std::error::Error for ParseError {}
