//! Error types for the WAYMARK bootstrapping layer.

use thiserror::Error;

/// Errors returned by a bootstrap source
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The secure random source could not seed the hash accumulator
    #[error("entropy source unavailable: {0}")]
    Entropy(#[from] rand_core::Error),

    /// The channel graph collaborator failed
    #[error("channel graph error: {0}")]
    Graph(#[from] GraphError),

    /// A DNS seed query or record decode failed
    #[error("DNS seed error: {0}")]
    Dns(#[from] DnsSeedError),
}

/// Channel graph errors
#[derive(Debug, Error)]
pub enum GraphError {
    /// Underlying storage failed while iterating nodes
    #[error("graph storage error: {0}")]
    Storage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot is not valid JSON
    #[error("malformed graph snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Snapshot parsed but describes an invalid node
    #[error("invalid graph snapshot entry {index}: {reason}")]
    InvalidNode {
        /// Position of the offending node in the snapshot
        index: usize,
        /// What was wrong with it
        reason: String,
    },
}

/// DNS seed errors
///
/// Every variant is fatal to the sampling call that produced it.
#[derive(Debug, Error)]
pub enum DnsSeedError {
    /// SRV query against a seed failed
    #[error("SRV lookup for {name} failed: {reason}")]
    SrvLookup {
        /// Queried service name
        name: String,
        /// Resolver failure description
        reason: String,
    },

    /// Address lookup of a node hostname failed
    #[error("host lookup for {host} failed: {reason}")]
    HostLookup {
        /// Queried hostname
        host: String,
        /// Resolver failure description
        reason: String,
    },

    /// SRV target has no leftmost label to decode
    #[error("SRV target {host:?} has no node label")]
    MissingLabel {
        /// Offending SRV target
        host: String,
    },

    /// Node label is not valid bech32
    #[error("node label {label:?} is not valid bech32: {source}")]
    Bech32 {
        /// Offending label
        label: String,
        /// Decoder error
        #[source]
        source: bech32::Error,
    },

    /// 5-bit groups could not be repacked into bytes
    #[error("node label {label:?} has invalid 5-bit payload: {source}")]
    BitConversion {
        /// Offending label
        label: String,
        /// Conversion error
        #[source]
        source: bech32::Error,
    },

    /// Decoded bytes are not a valid public key
    #[error("node label {label:?} does not encode a public key: {source}")]
    InvalidPublicKey {
        /// Offending label
        label: String,
        /// Key parse error
        #[source]
        source: secp256k1::Error,
    },

    /// Resolver could not be set up
    #[error("resolver setup failed: {0}")]
    Resolver(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Config parsed but holds an invalid value
    #[error("invalid config: {0}")]
    Invalid(String),
}
