#![forbid(unsafe_code)]

//! Arena-backed document implementing [`Host`].
//!
//! Nodes live in a `Vec` and are addressed by [`NodeId`]. Nodes are never
//! freed: detaching a node (for example when an element's text content is
//! replaced) only clears its parent link, matching how a browser keeps
//! detached nodes alive while something references them.
//!
//! # Invariants
//!
//! 1. Index 0 is the document node; it has no parent.
//! 2. `children` and `parent` links are always mutually consistent.
//! 3. Only input-like elements (`input`, `textarea`) carry a value.
//! 4. `set_value` never fires change listeners; only
//!    [`Document::dispatch_change`] does.

use std::cell::RefCell;
use std::collections::HashMap;

use weft_core::{Attribute, ChangeListener, Host, NodeId, NodeKind};

use crate::error::DomError;
use crate::selector::Selector;

const VALUE_TAGS: &[&str] = &["input", "textarea"];

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    tag: String,
    attributes: Vec<Attribute>,
    text: String,
    value: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            tag: String::new(),
            attributes: Vec::new(),
            text: String::new(),
            value: None,
            parent: None,
            children: Vec::new(),
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Element | NodeKind::Document)
    }
}

/// An in-memory document tree.
///
/// # Example
///
/// ```
/// use weft_core::Host;
/// use weft_dom::Document;
///
/// let doc = Document::parse(r#"<div id="app"><p>Hello</p></div>"#).unwrap();
/// let app = doc.query_selector("#app").unwrap();
/// assert_eq!(doc.text_content(app).as_deref(), Some("Hello"));
/// ```
pub struct Document {
    nodes: RefCell<Vec<NodeData>>,
    listeners: RefCell<HashMap<NodeId, Vec<ChangeListener>>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("node_count", &self.nodes.borrow().len())
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

impl Document {
    /// Create an empty document holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![NodeData::new(NodeKind::Document)]),
            listeners: RefCell::new(HashMap::new()),
        }
    }

    /// The document node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Total number of nodes ever created, attached or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    fn push(&self, data: NodeData) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId::new(u32::try_from(nodes.len()).unwrap_or(u32::MAX));
        nodes.push(data);
        id
    }

    /// Create a detached element. The tag is lowercased.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut data = NodeData::new(NodeKind::Element);
        data.tag = tag.to_ascii_lowercase();
        if VALUE_TAGS.contains(&data.tag.as_str()) {
            data.value = Some(String::new());
        }
        self.push(data)
    }

    /// Create a detached text node.
    pub fn create_text_node(&self, text: &str) -> NodeId {
        let mut data = NodeData::new(NodeKind::Text);
        data.text = text.to_owned();
        self.push(data)
    }

    /// Create a detached comment node.
    pub fn create_comment(&self, text: &str) -> NodeId {
        let mut data = NodeData::new(NodeKind::Comment);
        data.text = text.to_owned();
        self.push(data)
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut nodes = self.nodes.borrow_mut();
        let len = nodes.len();
        for id in [parent, child] {
            if id.index() >= len {
                return Err(DomError::UnknownNode(id));
            }
        }
        if !nodes[parent.index()].is_container()
            || child == self.root()
            || is_ancestor_or_self(&nodes, child, parent)
        {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if let Some(old) = nodes[child.index()].parent.take() {
            nodes[old.index()].children.retain(|&c| c != child);
        }
        nodes[child.index()].parent = Some(parent);
        nodes[parent.index()].children.push(child);
        Ok(())
    }

    /// Create an element with attributes and append it to `parent`.
    pub fn append_element(
        &self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> Result<NodeId, DomError> {
        let id = self.create_element(tag);
        for (name, value) in attributes {
            self.set_attribute(id, name, value)?;
        }
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(&self, parent: NodeId, text: &str) -> Result<NodeId, DomError> {
        let id = self.create_text_node(text);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Set or replace an attribute. Setting `value` on an input-like
    /// element also initializes its value, as parsing does.
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let mut nodes = self.nodes.borrow_mut();
        let data = nodes
            .get_mut(node.index())
            .filter(|d| d.kind == NodeKind::Element)
            .ok_or(DomError::UnknownNode(node))?;
        let name = name.to_ascii_lowercase();
        if name == "value" && data.value.is_some() {
            data.value = Some(value.to_owned());
        }
        match data.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value.to_owned(),
            None => data.attributes.push(Attribute::new(name, value)),
        }
        Ok(())
    }

    /// Read an attribute.
    #[must_use]
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let nodes = self.nodes.borrow();
        nodes
            .get(node.index())
            .and_then(|d| d.attribute(name))
            .map(str::to_owned)
    }

    /// Lowercase tag name of an element.
    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        let nodes = self.nodes.borrow();
        nodes
            .get(node.index())
            .filter(|d| d.kind == NodeKind::Element)
            .map(|d| d.tag.clone())
    }

    /// Parent of `node`, if attached.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow().get(node.index()).and_then(|d| d.parent)
    }

    /// Simulate a user edit: set the element's value, then fire its change
    /// listeners in registration order. Returns the number of listeners run.
    ///
    /// Listeners run after all internal borrows are released, so they may
    /// read and write this document freely.
    pub fn dispatch_change(&self, node: NodeId, value: &str) -> usize {
        if !self.supports_value(node) {
            return 0;
        }
        self.set_value(node, value);
        let listeners = self
            .listeners
            .borrow()
            .get(&node)
            .cloned()
            .unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::trace!(%node, listeners = listeners.len(), "dispatch change");

        for listener in &listeners {
            listener(value);
        }
        listeners.len()
    }

    /// Number of registered change listeners across all nodes.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().values().map(Vec::len).sum()
    }

    /// Serialize `node` and its subtree.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        crate::markup::serialize(self, node, &mut out);
        out
    }

    /// Serialize the children of `node`.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.child_nodes(node) {
            crate::markup::serialize(self, child, &mut out);
        }
        out
    }

    fn collect_text(nodes: &[NodeData], node: NodeId, out: &mut String) {
        let data = &nodes[node.index()];
        match data.kind {
            NodeKind::Text => out.push_str(&data.text),
            NodeKind::Element | NodeKind::Document => {
                for &child in &data.children {
                    Self::collect_text(nodes, child, out);
                }
            }
            NodeKind::Comment => {}
        }
    }
}

fn is_ancestor_or_self(nodes: &[NodeData], candidate: NodeId, node: NodeId) -> bool {
    let mut cursor = Some(node);
    while let Some(id) = cursor {
        if id == candidate {
            return true;
        }
        cursor = nodes[id.index()].parent;
    }
    false
}

impl Host for Document {
    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector)?;
        let nodes = self.nodes.borrow();
        let mut stack: Vec<NodeId> = nodes[0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let data = &nodes[id.index()];
            if data.kind == NodeKind::Element
                && selector.matches(&data.tag, data.attribute("id"), data.attribute("class"))
            {
                return Some(id);
            }
            stack.extend(data.children.iter().rev().copied());
        }
        None
    }

    fn contains(&self, node: NodeId) -> bool {
        node.index() < self.nodes.borrow().len()
    }

    fn child_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .get(node.index())
            .map(|d| d.children.clone())
            .unwrap_or_default()
    }

    fn node_kind(&self, node: NodeId) -> NodeKind {
        self.nodes
            .borrow()
            .get(node.index())
            .map_or(NodeKind::Comment, |d| d.kind)
    }

    fn attributes(&self, node: NodeId) -> Vec<Attribute> {
        self.nodes
            .borrow()
            .get(node.index())
            .map(|d| d.attributes.clone())
            .unwrap_or_default()
    }

    fn text_content(&self, node: NodeId) -> Option<String> {
        let nodes = self.nodes.borrow();
        let data = nodes.get(node.index())?;
        match data.kind {
            NodeKind::Text | NodeKind::Comment => Some(data.text.clone()),
            NodeKind::Element => {
                let mut out = String::new();
                Self::collect_text(&nodes, node, &mut out);
                Some(out)
            }
            NodeKind::Document => None,
        }
    }

    fn set_text_content(&self, node: NodeId, text: &str) {
        let kind = match self.nodes.borrow().get(node.index()) {
            Some(data) => data.kind,
            None => return,
        };
        match kind {
            NodeKind::Text | NodeKind::Comment => {
                self.nodes.borrow_mut()[node.index()].text = text.to_owned();
            }
            NodeKind::Element => {
                let replacement = (!text.is_empty()).then(|| self.create_text_node(text));
                let mut nodes = self.nodes.borrow_mut();
                let old = std::mem::take(&mut nodes[node.index()].children);
                for child in old {
                    nodes[child.index()].parent = None;
                }
                if let Some(child) = replacement {
                    nodes[child.index()].parent = Some(node);
                    nodes[node.index()].children.push(child);
                }
            }
            NodeKind::Document => {}
        }
    }

    fn supports_value(&self, node: NodeId) -> bool {
        self.nodes
            .borrow()
            .get(node.index())
            .is_some_and(|d| d.value.is_some())
    }

    fn value(&self, node: NodeId) -> Option<String> {
        self.nodes
            .borrow()
            .get(node.index())
            .and_then(|d| d.value.clone())
    }

    fn set_value(&self, node: NodeId, value: &str) {
        if let Some(slot) = self
            .nodes
            .borrow_mut()
            .get_mut(node.index())
            .and_then(|d| d.value.as_mut())
        {
            value.clone_into(slot);
        }
    }

    fn add_change_listener(&self, node: NodeId, listener: ChangeListener) {
        if !self.contains(node) {
            return;
        }
        self.listeners
            .borrow_mut()
            .entry(node)
            .or_default()
            .push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn build_and_read_tree() {
        let doc = Document::new();
        let div = doc.append_element(doc.root(), "DIV", &[("id", "app")]).unwrap();
        let text = doc.append_text(div, "hello").unwrap();

        assert_eq!(doc.tag_name(div).as_deref(), Some("div"));
        assert_eq!(doc.child_nodes(div), vec![text]);
        assert_eq!(doc.parent(text), Some(div));
        assert_eq!(doc.node_kind(text), NodeKind::Text);
        assert_eq!(doc.text_content(div).as_deref(), Some("hello"));
        assert_eq!(doc.text_content(doc.root()), None);
    }

    #[test]
    fn append_moves_node() {
        let doc = Document::new();
        let a = doc.append_element(doc.root(), "div", &[]).unwrap();
        let b = doc.append_element(doc.root(), "div", &[]).unwrap();
        let t = doc.append_text(a, "x").unwrap();
        doc.append_child(b, t).unwrap();
        assert!(doc.child_nodes(a).is_empty());
        assert_eq!(doc.child_nodes(b), vec![t]);
    }

    #[test]
    fn append_rejects_bad_hierarchy() {
        let doc = Document::new();
        let a = doc.append_element(doc.root(), "div", &[]).unwrap();
        let b = doc.append_element(a, "div", &[]).unwrap();
        let t = doc.append_text(b, "x").unwrap();

        assert!(matches!(
            doc.append_child(b, a),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert!(matches!(
            doc.append_child(t, a),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert_eq!(
            doc.append_child(a, NodeId::new(999)),
            Err(DomError::UnknownNode(NodeId::new(999)))
        );
    }

    #[test]
    fn set_text_content_on_element_replaces_children() {
        let doc = Document::new();
        let p = doc.append_element(doc.root(), "p", &[]).unwrap();
        let old = doc.append_text(p, "old").unwrap();
        doc.set_text_content(p, "new");

        let children = doc.child_nodes(p);
        assert_eq!(children.len(), 1);
        assert_ne!(children[0], old);
        assert_eq!(doc.parent(old), None);
        assert_eq!(doc.text_content(p).as_deref(), Some("new"));

        doc.set_text_content(p, "");
        assert!(doc.child_nodes(p).is_empty());
    }

    #[test]
    fn value_only_on_input_like() {
        let doc = Document::new();
        let input = doc.append_element(doc.root(), "input", &[("value", "a")]).unwrap();
        let div = doc.append_element(doc.root(), "div", &[]).unwrap();

        assert!(doc.supports_value(input));
        assert_eq!(doc.value(input).as_deref(), Some("a"));
        assert!(!doc.supports_value(div));
        doc.set_value(div, "ignored");
        assert_eq!(doc.value(div), None);
    }

    #[test]
    fn dispatch_change_fires_listeners_in_order() {
        let doc = Document::new();
        let input = doc.append_element(doc.root(), "input", &[]).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let log = Rc::clone(&log);
            doc.add_change_listener(input, Rc::new(move |v: &str| {
                log.borrow_mut().push(format!("{tag}:{v}"));
            }));
        }

        assert_eq!(doc.dispatch_change(input, "bye"), 2);
        assert_eq!(doc.value(input).as_deref(), Some("bye"));
        assert_eq!(*log.borrow(), vec!["first:bye", "second:bye"]);
        assert_eq!(doc.listener_count(), 2);
    }

    #[test]
    fn set_value_does_not_fire_listeners() {
        let doc = Document::new();
        let input = doc.append_element(doc.root(), "input", &[]).unwrap();
        let fired = Rc::new(Cell::new(false));
        let f = Rc::clone(&fired);
        doc.add_change_listener(input, Rc::new(move |_: &str| f.set(true)));
        doc.set_value(input, "x");
        assert!(!fired.get());
    }

    #[test]
    fn listener_may_reenter_document() {
        let doc = Rc::new(Document::new());
        let input = doc.append_element(doc.root(), "input", &[]).unwrap();
        let label = doc.append_element(doc.root(), "span", &[]).unwrap();
        let weak = Rc::downgrade(&doc);
        doc.add_change_listener(
            input,
            Rc::new(move |v: &str| {
                if let Some(doc) = weak.upgrade() {
                    doc.set_text_content(label, v);
                }
            }),
        );
        doc.dispatch_change(input, "mirrored");
        assert_eq!(doc.text_content(label).as_deref(), Some("mirrored"));
    }

    #[test]
    fn dispatch_on_non_input_is_noop() {
        let doc = Document::new();
        let div = doc.append_element(doc.root(), "div", &[]).unwrap();
        assert_eq!(doc.dispatch_change(div, "x"), 0);
    }

    #[test]
    fn query_selector_document_order() {
        let doc = Document::new();
        let outer = doc.append_element(doc.root(), "div", &[("class", "box")]).unwrap();
        let inner = doc.append_element(outer, "div", &[("class", "box inner")]).unwrap();
        let _later = doc.append_element(doc.root(), "div", &[("id", "later")]).unwrap();

        assert_eq!(doc.query_selector(".box"), Some(outer));
        assert_eq!(doc.query_selector(".inner"), Some(inner));
        assert_eq!(doc.query_selector("div.box.inner"), Some(inner));
        assert_eq!(doc.query_selector("#missing"), None);
        assert_eq!(doc.query_selector("div p"), None);
    }

    #[test]
    fn query_selector_skips_detached() {
        let doc = Document::new();
        let detached = doc.create_element("section");
        assert!(doc.contains(detached));
        assert_eq!(doc.query_selector("section"), None);
    }
}
