//! Error types for registry lookups, sign document construction and signing.

use thiserror::Error;

/// Errors raised by the type registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No codec is registered under the given type URL.
    #[error("unknown type URL: {0}")]
    UnknownType(String),

    /// A codec is already registered under this type URL. Registration
    /// conflicts are rejected rather than silently overwritten.
    #[error("type URL already registered: {0}")]
    AlreadyRegistered(String),

    /// The supplied fields could not be turned into a typed message.
    #[error("failed to construct message for {type_url}: {source}")]
    Construct {
        type_url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The wire bytes could not be decoded as the registered message type.
    #[error("failed to decode message for {type_url}: {source}")]
    Decode {
        type_url: String,
        #[source]
        source: prost::DecodeError,
    },

    /// A decoded message could not be rendered back into fields.
    #[error("failed to render fields for {type_url}: {source}")]
    Fields {
        type_url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while building a sign document, driving the external
/// signer, or assembling the signed transaction.
///
/// Broadcast check/deliver rejections are *not* errors; they are returned
/// as [`crate::broadcast::BroadcastOutcome`] variants the caller branches on.
#[derive(Debug, Error)]
pub enum SigningError {
    /// Chain state has no account for the signing address.
    #[error("account {0} not found on chain")]
    AccountNotFound(String),

    /// The signer holds no key material for the requested address.
    #[error("address {0} is not known to the signer")]
    MissingPublicKey(String),

    /// The requested sign mode is not supported by the signer.
    #[error("signer does not support {0} signing")]
    SignerCapabilityMismatch(&'static str),

    /// Amino signing was requested for a type URL with no legacy name.
    #[error("no legacy Amino representation for type URL: {0}")]
    UnsupportedLegacyType(String),

    /// The signer echoed a document that cannot be reassembled into a
    /// transaction.
    #[error("malformed signed document: {0}")]
    InvalidSignedDoc(String),

    /// A sign document could not be serialized to canonical JSON.
    #[error("failed to canonicalize sign document: {0}")]
    Canonicalize(#[from] serde_json::Error),

    /// A codec failure from the type registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The external signer failed to produce a signature.
    #[error("signer failure: {0}")]
    Signer(#[source] anyhow::Error),

    /// A chain-state or submission call failed.
    #[error("transport failure: {0}")]
    Transport(#[source] anyhow::Error),
}
