#![forbid(unsafe_code)]

//! In-memory document host for Weft.
//!
//! [`Document`] implements [`weft_core::Host`] over an arena of nodes, so
//! the binding engine can run (and be tested) without a browser. It keeps
//! the DOM behaviors the engine relies on:
//!
//! - setting an element's text content replaces its children with a single
//!   text node;
//! - only input-like elements carry a value;
//! - programmatic value writes never fire change listeners, while
//!   [`Document::dispatch_change`] simulates a user edit and does.
//!
//! Fixtures can be built node by node or parsed from markup with
//! [`Document::parse`].

pub mod document;
pub mod error;
pub mod markup;
pub mod selector;

pub use document::Document;
pub use error::{DomError, ParseError};
pub use selector::Selector;
