//! External signer capability consumed by the signing pipeline.

mod wallet;

pub use wallet::{AminoHdWallet, DirectHdWallet};

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::amino::StdSignDoc;
use crate::proto::SignDoc;

/// Account material exposed by a signer.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountData {
    pub address: String,
    /// Compressed secp256k1 public key (33 bytes).
    pub pubkey: Vec<u8>,
}

/// Signature plus the signer's echo of the direct document it signed.
#[derive(Debug, Clone)]
pub struct DirectSignResponse {
    pub signature: Vec<u8>,
    pub signed: SignDoc,
}

/// Signature plus the signer's (possibly normalized) echo of the Amino
/// document it signed. The echo is authoritative: the signer may have
/// re-ordered or re-formatted fields before signing.
#[derive(Debug, Clone)]
pub struct AminoSignResponse {
    pub signature: Vec<u8>,
    pub signed: StdSignDoc,
}

/// A signing capability, typically backed by an external key holder.
///
/// The dispatcher probes `supports_direct` once per submission and drives
/// exactly one of the two sign methods. Implementations override the
/// methods for the modes they support; the defaults report the capability
/// as missing.
#[async_trait]
pub trait TxSigner: Send + Sync {
    /// Accounts this signer can produce signatures for.
    fn accounts(&self) -> Vec<AccountData>;

    /// Whether the signer can sign over raw protobuf sign docs.
    fn supports_direct(&self) -> bool;

    /// Sign a direct (protobuf) sign document.
    async fn sign_direct(&self, _address: &str, _sign_doc: SignDoc) -> Result<DirectSignResponse> {
        bail!("signer does not support direct signing")
    }

    /// Sign a legacy Amino JSON document.
    async fn sign_amino(&self, _address: &str, _sign_doc: StdSignDoc) -> Result<AminoSignResponse> {
        bail!("signer does not support amino signing")
    }
}
