#![forbid(unsafe_code)]

//! Weft: a minimal reactive view-binding engine.
//!
//! This crate re-exports the workspace crates behind one name:
//!
//! - [`core`]: values, the data store, and the [`Host`] capability;
//! - [`runtime`]: the compiler, dependency registry, and [`ViewModel`];
//! - [`dom`] (feature `dom`, on by default): an in-memory [`Document`] host.
//!
//! ```
//! use std::rc::Rc;
//! use weft::prelude::*;
//!
//! let doc = Rc::new(Document::parse("<p>{{ greeting }}</p>").unwrap());
//! let vm = ViewModel::new(Rc::clone(&doc), MountOptions::selector("p").entry("greeting", "hi")).unwrap();
//! vm.set("greeting", "hello");
//! assert_eq!(doc.text_content(vm.root()).as_deref(), Some("hello"));
//! ```

pub use weft_core as core;
#[cfg(feature = "dom")]
pub use weft_dom as dom;
pub use weft_runtime as runtime;

pub use weft_core::{DataStore, Host, NodeId, Value};
#[cfg(feature = "dom")]
pub use weft_dom::Document;
pub use weft_runtime::{BindConfig, MountError, MountOptions, ViewModel};

/// Common imports.
pub mod prelude {
    pub use weft_core::{DataStore, Host, NodeId, Value};
    #[cfg(feature = "dom")]
    pub use weft_dom::Document;
    pub use weft_runtime::{
        BindConfig, Mount, MountError, MountOptions, ViewModel, WeakViewModel,
    };
    #[cfg(feature = "config")]
    pub use weft_runtime::{ConfigError, ViewConfig};
}
