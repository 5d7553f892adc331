//! Node label codec
//!
//! A BOLT-0010 seed names each node with a hostname whose leftmost label is
//! the bech32 encoding of the node's 33-byte compressed public key, e.g.
//! `ln1qwkt...xyz.nodes.example.org`.

use crate::error::DnsSeedError;
use bech32::{ToBase32, Variant};
use secp256k1::PublicKey;

/// Human readable part used when encoding node labels
pub const NODE_LABEL_HRP: &str = "ln";

/// Encode a public key as a node label
///
/// # Errors
///
/// Returns an error only if the encoder rejects the label, which does not
/// happen for the fixed human readable part.
pub fn encode_node_label(public_key: &PublicKey) -> Result<String, DnsSeedError> {
    bech32::encode(
        NODE_LABEL_HRP,
        public_key.serialize().to_base32(),
        Variant::Bech32,
    )
    .map_err(|source| DnsSeedError::Bech32 {
        label: NODE_LABEL_HRP.to_string(),
        source,
    })
}

/// Decode a node label into the public key it carries
///
/// The label is bech32-decoded into 5-bit groups, repacked into bytes
/// without padding, and parsed as a compressed public key. The human
/// readable part is not checked.
///
/// # Errors
///
/// Returns an error if any of the three steps fails.
pub fn decode_node_label(label: &str) -> Result<PublicKey, DnsSeedError> {
    let (_hrp, groups, _variant) =
        bech32::decode(label).map_err(|source| DnsSeedError::Bech32 {
            label: label.to_string(),
            source,
        })?;

    let bytes = bech32::convert_bits(&groups, 5, 8, false).map_err(|source| {
        DnsSeedError::BitConversion {
            label: label.to_string(),
            source,
        }
    })?;

    PublicKey::from_slice(&bytes).map_err(|source| DnsSeedError::InvalidPublicKey {
        label: label.to_string(),
        source,
    })
}

/// Decode the public key carried by the leftmost label of a node hostname
///
/// # Errors
///
/// Returns an error if the hostname has no leftmost label or the label does
/// not decode.
pub fn decode_node_host(host: &str) -> Result<PublicKey, DnsSeedError> {
    let label = host
        .split('.')
        .next()
        .filter(|label| !label.is_empty())
        .ok_or_else(|| DnsSeedError::MissingLabel {
            host: host.to_string(),
        })?;

    decode_node_label(label)
}
