#![forbid(unsafe_code)]

//! Mount options and binding configuration.
//!
//! With the `config` feature, a [`ViewConfig`] can be loaded from JSON or
//! TOML:
//!
//! ```toml
//! el = "#app"
//!
//! [data]
//! name = "World"
//!
//! [bind]
//! directive_prefix = "v-"
//! echo_model_updates = false
//! ```

use weft_core::{DataStore, NodeId, Value};

#[cfg(feature = "config")]
use crate::error::ConfigError;
use crate::directive::DEFAULT_PREFIX;
use crate::template::DEFAULT_DELIMITERS;

/// Engine behavior switches.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize), serde(default))]
pub struct BindConfig {
    /// Attribute prefix marking a directive.
    pub directive_prefix: String,
    /// Opening and closing interpolation delimiters.
    pub delimiters: (String, String),
    /// Re-run the originating input's own model binding after a user
    /// change. Off by default: the input already shows the value.
    pub echo_model_updates: bool,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            directive_prefix: DEFAULT_PREFIX.to_owned(),
            delimiters: (
                DEFAULT_DELIMITERS.0.to_owned(),
                DEFAULT_DELIMITERS.1.to_owned(),
            ),
            echo_model_updates: false,
        }
    }
}

impl BindConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directive attribute prefix.
    #[must_use]
    pub fn with_directive_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.directive_prefix = prefix.into();
        self
    }

    /// Set the interpolation delimiters.
    #[must_use]
    pub fn with_delimiters(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.delimiters = (open.into(), close.into());
        self
    }

    /// Re-run the originating model binding on user changes.
    #[must_use]
    pub fn with_echo_model_updates(mut self, echo: bool) -> Self {
        self.echo_model_updates = echo;
        self
    }
}

/// Where to mount: a selector resolved through the host, or a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mount {
    Selector(String),
    Node(NodeId),
}

impl From<&str> for Mount {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_owned())
    }
}

impl From<NodeId> for Mount {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

/// Construction options: the mount target and optional initial data.
#[derive(Debug, Clone, PartialEq)]
pub struct MountOptions {
    pub el: Mount,
    pub data: Option<DataStore>,
}

impl MountOptions {
    /// Mount on whatever `el` resolves to, with no data.
    #[must_use]
    pub fn new(el: impl Into<Mount>) -> Self {
        Self {
            el: el.into(),
            data: None,
        }
    }

    /// Mount on the first element matching `selector`.
    #[must_use]
    pub fn selector(selector: &str) -> Self {
        Self::new(Mount::Selector(selector.to_owned()))
    }

    /// Mount on a node directly.
    #[must_use]
    pub fn node(node: NodeId) -> Self {
        Self::new(Mount::Node(node))
    }

    /// Use `data` as the initial store.
    #[must_use]
    pub fn with_data(mut self, data: DataStore) -> Self {
        self.data = Some(data);
        self
    }

    /// Add one initial entry.
    #[must_use]
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.get_or_insert_with(DataStore::new).set(key, value);
        self
    }
}

/// Mount options and bind configuration read from a config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub options: MountOptions,
    pub bind: BindConfig,
}

#[cfg(feature = "config")]
#[derive(serde::Deserialize)]
struct ConfigFile {
    el: String,
    #[serde(default)]
    data: Option<DataStore>,
    #[serde(default)]
    bind: BindConfig,
}

#[cfg(feature = "config")]
impl From<ConfigFile> for ViewConfig {
    fn from(file: ConfigFile) -> Self {
        Self {
            options: MountOptions {
                el: Mount::Selector(file.el),
                data: file.data,
            },
            bind: file.bind,
        }
    }
}

#[cfg(feature = "config")]
impl ViewConfig {
    /// Parse a JSON config document.
    pub fn from_json(src: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            serde_json::from_str(src).map_err(|e| ConfigError::Json(e.to_string()))?;
        Ok(file.into())
    }

    /// Parse a TOML config document.
    pub fn from_toml(src: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(src).map_err(|e| ConfigError::Toml(e.to_string()))?;
        Ok(file.into())
    }
}
