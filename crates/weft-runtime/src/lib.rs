#![forbid(unsafe_code)]

//! Binding engine for Weft.
//!
//! A [`ViewModel`] is mounted on a subtree of a [`weft_core::Host`]. Mounting
//! walks the subtree once, renders every binding it finds, and records it in
//! a [`DependencyRegistry`] under its data key. Later changes to a key re-run
//! exactly the bindings recorded for it.
//!
//! Bindings come from two sources:
//!
//! - text nodes containing an interpolation such as `{{ name }}`;
//! - element attributes carrying a directive: `v-text="key"` for one-way
//!   text, `v-model="key"` for two-way input values.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use weft_core::Host;
//! use weft_dom::Document;
//! use weft_runtime::{MountOptions, ViewModel};
//!
//! let doc = Rc::new(
//!     Document::parse(r#"<div id="app"><input v-model="q"><p v-text="q"></p></div>"#).unwrap(),
//! );
//! let vm = ViewModel::new(Rc::clone(&doc), MountOptions::selector("#app").entry("q", "")).unwrap();
//!
//! let input = doc.query_selector("input").unwrap();
//! doc.dispatch_change(input, "weft");
//!
//! let p = doc.query_selector("p").unwrap();
//! assert_eq!(doc.text_content(p).as_deref(), Some("weft"));
//! assert_eq!(vm.get("q").unwrap().render(), "weft");
//! ```

pub mod binding;
pub mod compiler;
pub mod config;
pub mod directive;
pub mod error;
pub mod registry;
pub mod template;
pub mod view_model;

pub use binding::{Binding, BindingKind, WatchFn};
pub use compiler::{Compiled, Compiler};
pub use config::{BindConfig, Mount, MountOptions, ViewConfig};
pub use directive::Directive;
pub use error::{ConfigError, MountError};
pub use registry::DependencyRegistry;
pub use template::Template;
pub use view_model::{MAX_NOTIFY_PASSES, ViewModel, WeakViewModel, resolve_mount};
