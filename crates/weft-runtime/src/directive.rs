#![forbid(unsafe_code)]

//! Directive attributes (`v-text`, `v-model`).

/// Default attribute prefix marking a directive.
pub const DEFAULT_PREFIX: &str = "v-";

/// The known directive set. Anything else is `Unknown` and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// One-way: element text content follows the key.
    Text,
    /// Two-way: input value follows the key; user changes write back.
    Model,
    /// Unrecognized directive name.
    Unknown(String),
}

impl Directive {
    /// Classify a directive name (the attribute name without prefix).
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "text" => Self::Text,
            "model" => Self::Model,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// Classify an attribute name. Returns `None` when the attribute does
    /// not carry `prefix`, i.e. it is a plain attribute. An empty prefix
    /// marks nothing.
    #[must_use]
    pub fn from_attribute(attr_name: &str, prefix: &str) -> Option<Self> {
        if prefix.is_empty() {
            return None;
        }
        attr_name.strip_prefix(prefix).map(Self::from_name)
    }

    /// The directive name without prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Model => "model",
            Self::Unknown(name) => name,
        }
    }
}
