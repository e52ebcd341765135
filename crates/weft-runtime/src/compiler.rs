#![forbid(unsafe_code)]

//! Tree walk that discovers and eagerly renders bindings.
//!
//! The walk is depth-first with children processed before their parent.
//! Each node's child list is snapshotted before recursing, so a `v-text`
//! parent that later replaces its children does not affect the walk.
//!
//! Every binding found is applied once, immediately, with the current data
//! and returned in discovery (document) order. The caller registers them.
//!
//! # Invariants
//!
//! 1. Only text and element nodes carry bindings; other kinds are walked.
//! 2. A text node without a complete span is left untouched and yields no
//!    binding.
//! 3. Attributes without the directive prefix, or with a blank value, yield
//!    no binding.
//! 4. `Unknown` directives are ignored silently.

use weft_core::{DataStore, Host, NodeId, NodeKind};

use crate::binding::Binding;
use crate::config::BindConfig;
use crate::directive::Directive;
use crate::template::Template;

/// Result of compiling a subtree.
#[derive(Debug, Default)]
pub struct Compiled {
    /// Bindings in discovery order.
    pub bindings: Vec<Binding>,
    /// Inputs that need a change listener, as (node, key).
    pub model_inputs: Vec<(NodeId, String)>,
}

/// Single-use compiler over a host and a data snapshot.
pub struct Compiler<'a, H: Host + ?Sized> {
    host: &'a H,
    data: &'a DataStore,
    config: &'a BindConfig,
}

impl<'a, H: Host + ?Sized> Compiler<'a, H> {
    #[must_use]
    pub fn new(host: &'a H, data: &'a DataStore, config: &'a BindConfig) -> Self {
        Self { host, data, config }
    }

    /// Walk the subtree rooted at `root`.
    #[must_use]
    pub fn compile(&self, root: NodeId) -> Compiled {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("weft_compile", %root).entered();

        let mut out = Compiled::default();
        self.render(root, &mut out);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            bindings = out.bindings.len(),
            model_inputs = out.model_inputs.len(),
            "compiled"
        );
        out
    }

    fn render(&self, node: NodeId, out: &mut Compiled) {
        for child in self.host.child_nodes(node) {
            self.render(child, out);
        }
        match self.host.node_kind(node) {
            NodeKind::Text => self.render_text_node(node, out),
            NodeKind::Element => self.render_element_node(node, out),
            NodeKind::Comment | NodeKind::Document => {}
        }
    }

    fn render_text_node(&self, node: NodeId, out: &mut Compiled) {
        let Some(text) = self.host.text_content(node) else {
            return;
        };
        let (open, close) = &self.config.delimiters;
        let Some(template) = Template::parse_with(&text, open, close) else {
            return;
        };
        self.bind(Binding::interpolation(node, template), out);
    }

    fn render_element_node(&self, node: NodeId, out: &mut Compiled) {
        for attr in self.host.attributes(node) {
            let Some(directive) = Directive::from_attribute(&attr.name, &self.config.directive_prefix)
            else {
                continue;
            };
            let key = attr.value.trim();
            if key.is_empty() {
                continue;
            }
            self.process_directive(&directive, key, node, out);
        }
    }

    fn process_directive(&self, directive: &Directive, key: &str, node: NodeId, out: &mut Compiled) {
        match directive {
            Directive::Text => self.bind(Binding::text(key, node), out),
            Directive::Model => {
                if !self.host.supports_value(node) {
                    return;
                }
                self.bind(Binding::model(key, node), out);
                out.model_inputs.push((node, key.to_owned()));
            }
            Directive::Unknown(_name) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(directive = %_name, %node, "unknown directive ignored");
            }
        }
    }

    fn bind(&self, binding: Binding, out: &mut Compiled) {
        binding.apply(self.host, self.data.get(binding.key()));

        #[cfg(feature = "tracing")]
        tracing::debug!(key = binding.key(), kind = ?binding.kind(), "binding registered");

        out.bindings.push(binding);
    }
}
