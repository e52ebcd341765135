#![forbid(unsafe_code)]

//! Compiled bindings: the unit the dependency registry stores.
//!
//! A [`Binding`] is an explicit record of (key, target, render kind). It
//! holds no reference to the data store; the current value is passed to
//! [`Binding::apply`] on every run, so applying is a pure function of the
//! record and that value.
//!
//! Bindings are cheap to clone (templates and callbacks are shared).

use std::fmt;
use std::rc::Rc;

use weft_core::{Host, NodeId, Value};

use crate::template::Template;

/// Observer callback registered through `ViewModel::watch`.
pub type WatchFn = Rc<dyn Fn(Option<&Value>)>;

/// How a binding writes to its target.
#[derive(Clone)]
pub enum BindingKind {
    /// Text node rendered from its original template.
    Interpolation(Rc<Template>),
    /// Element text content (`v-text`).
    Text,
    /// Input value (`v-model`).
    Model,
    /// Caller-supplied observer with no view target.
    Watch(WatchFn),
}

impl fmt::Debug for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interpolation(t) => f.debug_tuple("Interpolation").field(&t.source()).finish(),
            Self::Text => f.write_str("Text"),
            Self::Model => f.write_str("Model"),
            Self::Watch(_) => f.write_str("Watch(..)"),
        }
    }
}

/// A key → view-update association.
#[derive(Debug, Clone)]
pub struct Binding {
    key: Rc<str>,
    target: Option<NodeId>,
    kind: BindingKind,
}

impl Binding {
    /// Bind a text node to its interpolation template.
    #[must_use]
    pub fn interpolation(node: NodeId, template: Template) -> Self {
        Self {
            key: template.key().into(),
            target: Some(node),
            kind: BindingKind::Interpolation(Rc::new(template)),
        }
    }

    /// Bind an element's text content to `key`.
    #[must_use]
    pub fn text(key: &str, node: NodeId) -> Self {
        Self {
            key: key.into(),
            target: Some(node),
            kind: BindingKind::Text,
        }
    }

    /// Bind an input's value to `key`.
    #[must_use]
    pub fn model(key: &str, node: NodeId) -> Self {
        Self {
            key: key.into(),
            target: Some(node),
            kind: BindingKind::Model,
        }
    }

    /// Observe `key` with a callback.
    #[must_use]
    pub fn watch(key: &str, callback: WatchFn) -> Self {
        Self {
            key: key.into(),
            target: None,
            kind: BindingKind::Watch(callback),
        }
    }

    /// The bound data key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The node this binding writes to, if any.
    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// The render kind.
    #[must_use]
    pub fn kind(&self) -> &BindingKind {
        &self.kind
    }

    /// Whether this is the model binding of `node`.
    #[must_use]
    pub fn is_model_of(&self, node: NodeId) -> bool {
        matches!(self.kind, BindingKind::Model) && self.target == Some(node)
    }

    /// Re-apply the binding with the current value of its key.
    ///
    /// A missing value renders as the empty string.
    pub fn apply<H: Host + ?Sized>(&self, host: &H, value: Option<&Value>) {
        if let BindingKind::Watch(callback) = &self.kind {
            callback(value);
            return;
        }
        let Some(node) = self.target else {
            return;
        };
        let text = value.map(Value::render).unwrap_or_default();
        match &self.kind {
            BindingKind::Interpolation(template) => {
                host.set_text_content(node, &template.render(&text));
            }
            BindingKind::Text => host.set_text_content(node, &text),
            BindingKind::Model => host.set_value(node, &text),
            BindingKind::Watch(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use weft_dom::Document;

    #[test]
    fn interpolation_renders_from_template() {
        let doc = Document::new();
        let node = doc.append_text(doc.root(), "Hello {{ name }}").unwrap();
        let binding = Binding::interpolation(node, Template::parse("Hello {{ name }}").unwrap());
        assert_eq!(binding.key(), "name");
        assert_eq!(binding.target(), Some(node));

        binding.apply(&doc, Some(&Value::from("World")));
        assert_eq!(doc.text_content(node).as_deref(), Some("Hello World"));
        binding.apply(&doc, Some(&Value::from("Rust")));
        assert_eq!(doc.text_content(node).as_deref(), Some("Hello Rust"));
    }

    #[test]
    fn missing_value_renders_empty() {
        let doc = Document::new();
        let p = doc.append_element(doc.root(), "p", &[]).unwrap();
        Binding::text("gone", p).apply(&doc, None);
        assert_eq!(doc.text_content(p).as_deref(), Some(""));
    }

    #[test]
    fn model_sets_value() {
        let doc = Document::new();
        let input = doc.append_element(doc.root(), "input", &[]).unwrap();
        let binding = Binding::model("msg", input);
        binding.apply(&doc, Some(&Value::from(3)));
        assert_eq!(doc.value(input).as_deref(), Some("3"));
        assert!(binding.is_model_of(input));
        assert!(!Binding::text("msg", input).is_model_of(input));
    }

    #[test]
    fn watch_receives_value() {
        let doc = Document::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let binding = Binding::watch(
            "k",
            Rc::new(move |v: Option<&Value>| s.borrow_mut().push(v.cloned())),
        );
        assert_eq!(binding.target(), None);
        binding.apply(&doc, Some(&Value::from(1)));
        binding.apply(&doc, None);
        assert_eq!(*seen.borrow(), vec![Some(Value::from(1)), None]);
    }

    #[test]
    fn debug_format() {
        let binding = Binding::watch("k", Rc::new(|_: Option<&Value>| {}));
        let debug = format!("{binding:?}");
        assert!(debug.contains("Watch(..)"));
        assert!(debug.contains("\"k\""));
    }
}
