//! Application configuration, loaded from TOML.
//!
//! ```toml
//! bind = "0.0.0.0:8080"
//!
//! [default_headers]
//! content-type = "text/html; charset=utf-8"
//! x-frame-options = "DENY"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// Settings shared by the [`Server`](crate::Server) and the built [`Service`](crate::Service).
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// `host:port` the server binds to.
    pub bind: String,

    /// Headers set on every response before any handler runs.
    pub default_headers: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_owned(),
            default_headers: BTreeMap::from([(
                "content-type".to_owned(),
                "text/html; charset=utf-8".to_owned(),
            )]),
        }
    }
}

impl Config {
    pub fn from_toml(input: &str) -> Result<Self, Error> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}
