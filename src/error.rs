//! Unified error type.

use std::net::AddrParseError;

/// The error type returned by sprig's fallible operations.
///
/// Application-level outcomes (404, redirects, validation failures) are
/// expressed as [`Response`](crate::Response) values, not as `Error`s. This
/// type surfaces infrastructure failures: loading configuration, parsing the
/// bind address, binding a port or accepting a connection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{addr}`: {source}")]
    Addr {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("config: {0}")]
    Config(#[from] toml::de::Error),
}
