#![forbid(unsafe_code)]

//! The host tree capability consumed by the binding engine.
//!
//! The engine never creates or destroys nodes. It reads structure
//! (children, kinds, attributes, text) and writes exactly two things: text
//! content and input values. Everything it needs from the environment is
//! expressed by [`Host`].
//!
//! All methods take `&self`. Hosts mutate through interior mutability, the
//! way browser bindings expose the DOM, which lets change listeners call
//! back into the engine while the host is shared.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown `NodeId` | Id from another host | Reads return empty, writes are ignored |
//! | Selector matches nothing | Bad mount target | `query_selector` returns `None` |

use std::fmt;
use std::rc::Rc;

/// Opaque node handle issued by a [`Host`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap a raw host index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw host index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Node classification. Only `Text` and `Element` carry bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
    Document,
}

/// A name/value attribute pair on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Callback fired with the element's new value after a user-driven change.
pub type ChangeListener = Rc<dyn Fn(&str)>;

/// Tree and event capabilities of a UI host.
pub trait Host {
    /// Resolve a selector to the first matching node in document order.
    fn query_selector(&self, selector: &str) -> Option<NodeId>;

    /// Whether `node` was issued by this host.
    fn contains(&self, node: NodeId) -> bool;

    /// Direct children in order.
    fn child_nodes(&self, node: NodeId) -> Vec<NodeId>;

    /// Kind of `node`.
    fn node_kind(&self, node: NodeId) -> NodeKind;

    /// Attributes of an element in source order. Empty for non-elements.
    fn attributes(&self, node: NodeId) -> Vec<Attribute>;

    /// Text content: the node's own text for text/comment nodes, the
    /// concatenated descendant text for elements.
    fn text_content(&self, node: NodeId) -> Option<String>;

    /// Replace the text content of `node`.
    fn set_text_content(&self, node: NodeId, text: &str);

    /// Whether `node` has a settable value property (input-like).
    fn supports_value(&self, node: NodeId) -> bool;

    /// Current value of an input-like element.
    fn value(&self, node: NodeId) -> Option<String>;

    /// Set the value of an input-like element without firing listeners.
    fn set_value(&self, node: NodeId, value: &str);

    /// Subscribe to user-driven value changes on `node`.
    fn add_change_listener(&self, node: NodeId, listener: ChangeListener);
}
