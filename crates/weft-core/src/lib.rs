#![forbid(unsafe_code)]

//! Core types for Weft: values, the data store, and the host capability.
//!
//! - [`Value`]: JSON-like data with a fixed string coercion.
//! - [`DataStore`]: exact-key mapping from names to values.
//! - [`Host`]: the tree/event interface the binding engine consumes.

pub mod host;
pub mod store;
pub mod value;

pub use host::{Attribute, ChangeListener, Host, NodeId, NodeKind};
pub use store::DataStore;
pub use value::Value;
