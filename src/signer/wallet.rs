//! In-process BIP-39/BIP-32 wallets implementing the signer capability.
//!
//! Key derivation follows the Cosmos convention: BIP44 path
//! m/44'/118'/0'/0/0, bech32 address from ripemd160(sha256(pubkey)).

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bech32::{self, Hrp};
use bip32::{ChildNumber, XPrv};
use bip39::Mnemonic;
use prost::Message;
use ripemd::Ripemd160;
use secp256k1::{Message as SigningMessage, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::amino::{serialize_std_sign_doc, StdSignDoc};
use crate::proto::SignDoc;
use crate::signer::{AccountData, AminoSignResponse, DirectSignResponse, TxSigner};

/// BIP44 coin type registered for Cosmos chains.
const COSMOS_COIN_TYPE: u32 = 118;

/// Default bech32 address prefix.
const DEFAULT_PREFIX: &str = "cosmos";

/// Key material shared by both wallet flavors.
/// Private key bytes are zeroized when the wallet is dropped.
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
struct WalletKey {
    #[zeroize(skip)] // Public data doesn't need zeroizing
    address: String,

    private_key_bytes: [u8; 32],
    public_key_bytes: [u8; 33],
}

impl WalletKey {
    fn from_mnemonic(mnemonic_str: &str, passphrase: &str, prefix: &str) -> Result<Self> {
        // Parse and validate mnemonic
        let mnemonic = Mnemonic::parse(mnemonic_str)?;
        let seed = mnemonic.to_seed(passphrase);

        let mut private_key = derive_private_key_bip32(&seed)?;

        let secp = Secp256k1::new();
        let secret_key = SecretKey::from_slice(&private_key)?;
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        let address = derive_address(&public_key, prefix)?;

        let mut private_key_bytes = [0u8; 32];
        private_key_bytes.copy_from_slice(&private_key);
        private_key.zeroize();

        Ok(Self {
            address,
            private_key_bytes,
            public_key_bytes: public_key.serialize(),
        })
    }

    fn account(&self) -> AccountData {
        AccountData {
            address: self.address.clone(),
            pubkey: self.public_key_bytes.to_vec(),
        }
    }

    fn check_address(&self, address: &str) -> Result<()> {
        if address != self.address {
            return Err(anyhow!("address {} is not held by this wallet", address));
        }
        Ok(())
    }

    /// Produce a 64-byte compact ECDSA signature over a 32-byte digest.
    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Vec<u8>> {
        let secp = Secp256k1::new();
        let secret_key = SecretKey::from_slice(&self.private_key_bytes)?;
        let message = SigningMessage::from_digest_slice(digest)?;
        let signature = secp.sign_ecdsa(&message, &secret_key);
        Ok(signature.serialize_compact().to_vec())
    }
}

/// Derive the account private key via BIP32 at m/44'/118'/0'/0/0.
fn derive_private_key_bip32(seed: &[u8]) -> Result<[u8; 32]> {
    let xprv = XPrv::new(seed).map_err(|e| anyhow!("failed to create XPrv from seed: {}", e))?;

    let derived = xprv
        .derive_child(ChildNumber::new(44, true)?)
        .and_then(|k| k.derive_child(ChildNumber::new(COSMOS_COIN_TYPE, true)?))
        .and_then(|k| k.derive_child(ChildNumber::new(0, true)?))
        .and_then(|k| k.derive_child(ChildNumber::new(0, false)?))
        .and_then(|k| k.derive_child(ChildNumber::new(0, false)?))
        .map_err(|e| anyhow!("failed to derive key: {}", e))?;

    Ok(derived.to_bytes())
}

/// Bech32 address from a public key: ripemd160(sha256(compressed)).
fn derive_address(public_key: &PublicKey, prefix: &str) -> Result<String> {
    let compressed = public_key.serialize();
    let sha = Sha256::digest(compressed);
    let ripe = Ripemd160::digest(sha);

    let hrp = Hrp::parse(prefix)?;
    let encoded = bech32::encode::<bech32::Bech32>(hrp, ripe.as_slice())?;

    Ok(encoded)
}

/// Wallet that signs raw protobuf sign docs (`SIGN_MODE_DIRECT`).
///
/// Also able to sign legacy Amino documents, so an explicit amino request
/// does not have to fail; the dispatcher still prefers direct for it.
#[derive(Debug)]
pub struct DirectHdWallet {
    key: WalletKey,
}

impl DirectHdWallet {
    /// Create a wallet from a BIP39 mnemonic phrase.
    pub fn from_mnemonic(mnemonic: &str, passphrase: &str, prefix: &str) -> Result<Self> {
        Ok(Self {
            key: WalletKey::from_mnemonic(mnemonic, passphrase, prefix)?,
        })
    }

    /// Create a wallet with no passphrase and the default address prefix.
    pub fn from_mnemonic_no_passphrase(mnemonic: &str) -> Result<Self> {
        Self::from_mnemonic(mnemonic, "", DEFAULT_PREFIX)
    }

    pub fn address(&self) -> &str {
        &self.key.address
    }

    /// Compressed public key bytes (33 bytes).
    pub fn public_key_compressed(&self) -> [u8; 33] {
        self.key.public_key_bytes
    }
}

#[async_trait]
impl TxSigner for DirectHdWallet {
    fn accounts(&self) -> Vec<AccountData> {
        vec![self.key.account()]
    }

    fn supports_direct(&self) -> bool {
        true
    }

    async fn sign_direct(&self, address: &str, sign_doc: SignDoc) -> Result<DirectSignResponse> {
        self.key.check_address(address)?;

        let sign_bytes = sign_doc.encode_to_vec();
        let digest: [u8; 32] = Sha256::digest(&sign_bytes).into();
        let signature = self.key.sign_digest(&digest)?;

        // The document is signed as-is; the echo is the unmodified input.
        Ok(DirectSignResponse {
            signature,
            signed: sign_doc,
        })
    }

    async fn sign_amino(&self, address: &str, sign_doc: StdSignDoc) -> Result<AminoSignResponse> {
        self.key.check_address(address)?;

        let sign_bytes = serialize_std_sign_doc(&sign_doc)?;
        let digest: [u8; 32] = Sha256::digest(&sign_bytes).into();
        let signature = self.key.sign_digest(&digest)?;

        Ok(AminoSignResponse {
            signature,
            signed: sign_doc,
        })
    }
}

/// Wallet restricted to legacy Amino JSON signing.
#[derive(Debug)]
pub struct AminoHdWallet {
    key: WalletKey,
}

impl AminoHdWallet {
    pub fn from_mnemonic(mnemonic: &str, passphrase: &str, prefix: &str) -> Result<Self> {
        Ok(Self {
            key: WalletKey::from_mnemonic(mnemonic, passphrase, prefix)?,
        })
    }

    pub fn from_mnemonic_no_passphrase(mnemonic: &str) -> Result<Self> {
        Self::from_mnemonic(mnemonic, "", DEFAULT_PREFIX)
    }

    pub fn address(&self) -> &str {
        &self.key.address
    }
}

#[async_trait]
impl TxSigner for AminoHdWallet {
    fn accounts(&self) -> Vec<AccountData> {
        vec![self.key.account()]
    }

    fn supports_direct(&self) -> bool {
        false
    }

    async fn sign_amino(&self, address: &str, sign_doc: StdSignDoc) -> Result<AminoSignResponse> {
        self.key.check_address(address)?;

        let sign_bytes = serialize_std_sign_doc(&sign_doc)?;
        let digest: [u8; 32] = Sha256::digest(&sign_bytes).into();
        let signature = self.key.sign_digest(&digest)?;

        Ok(AminoSignResponse {
            signature,
            signed: sign_doc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signdoc::make_sign_doc;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn wallet_derivation_is_deterministic() {
        let first = DirectHdWallet::from_mnemonic_no_passphrase(TEST_MNEMONIC).unwrap();
        let second = DirectHdWallet::from_mnemonic_no_passphrase(TEST_MNEMONIC).unwrap();

        assert_eq!(first.address(), second.address());
        assert!(first.address().starts_with("cosmos1"));
        assert_eq!(first.public_key_compressed().len(), 33);
    }

    #[test]
    fn passphrase_changes_the_address() {
        let plain = DirectHdWallet::from_mnemonic(TEST_MNEMONIC, "", "cosmos").unwrap();
        let protected = DirectHdWallet::from_mnemonic(TEST_MNEMONIC, "test123", "cosmos").unwrap();
        assert_ne!(plain.address(), protected.address());
    }

    #[test]
    fn prefix_selects_the_hrp() {
        let wallet = DirectHdWallet::from_mnemonic(TEST_MNEMONIC, "", "wasm").unwrap();
        assert!(wallet.address().starts_with("wasm1"));
    }

    #[tokio::test]
    async fn direct_signing_is_deterministic() {
        let wallet = DirectHdWallet::from_mnemonic_no_passphrase(TEST_MNEMONIC).unwrap();
        let doc = make_sign_doc(vec![1, 2, 3], vec![4, 5, 6], "testing-1", 7);

        let first = wallet
            .sign_direct(wallet.address(), doc.clone())
            .await
            .unwrap();
        let second = wallet.sign_direct(wallet.address(), doc).await.unwrap();

        assert_eq!(first.signature.len(), 64);
        assert_eq!(first.signature, second.signature);
    }

    #[tokio::test]
    async fn signing_for_a_foreign_address_fails() {
        let wallet = DirectHdWallet::from_mnemonic_no_passphrase(TEST_MNEMONIC).unwrap();
        let doc = make_sign_doc(vec![], vec![], "testing-1", 0);
        assert!(wallet.sign_direct("cosmos1somebodyelse", doc).await.is_err());
    }

    #[tokio::test]
    async fn amino_wallet_refuses_direct() {
        let wallet = AminoHdWallet::from_mnemonic_no_passphrase(TEST_MNEMONIC).unwrap();
        assert!(!wallet.supports_direct());

        let doc = make_sign_doc(vec![], vec![], "testing-1", 0);
        assert!(wallet.sign_direct(wallet.address(), doc).await.is_err());
    }
}
