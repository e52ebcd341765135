#![forbid(unsafe_code)]

use std::fmt;

use weft_core::NodeId;

/// Errors from resolving the mount target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    /// The selector matched no element.
    NotFound { selector: String },
    /// The node reference was not issued by the host.
    Detached(NodeId),
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { selector } => {
                write!(f, "no mountable element: selector '{selector}' matched nothing")
            }
            Self::Detached(node) => {
                write!(f, "no mountable element: {node} does not belong to the host")
            }
        }
    }
}

impl std::error::Error for MountError {}

/// Errors from loading a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Json(String),
    /// The TOML document could not be parsed.
    Toml(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "invalid JSON config: {msg}"),
            Self::Toml(msg) => write!(f, "invalid TOML config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
