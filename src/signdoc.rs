//! Sign document construction for `SIGN_MODE_DIRECT`.
//!
//! Direct signing signs the exact serialized body and auth info bytes.
//! Both are encoded once, before signing, and never re-derived afterwards;
//! the assembled transaction reuses the very bytes the signature covers.

use prost::Message;

use crate::fee::Fee;
use crate::proto::{
    self, mode_info, Any, AuthInfo, ModeInfo, PubKey, SignDoc, SignMode, SignerInfo,
};

/// Wrap a compressed secp256k1 public key in its protobuf `Any` form.
pub fn encode_pubkey(pubkey: &[u8]) -> Any {
    let key = PubKey {
        key: pubkey.to_vec(),
    };
    Any {
        type_url: "/cosmos.crypto.secp256k1.PubKey".to_string(),
        value: key.encode_to_vec(),
    }
}

/// Encode the auth info (signer, fee, sign mode) into its canonical byte
/// form for the single-signer case.
pub fn make_auth_info_bytes(pubkey: Any, fee: &Fee, sequence: u64, mode: SignMode) -> Vec<u8> {
    let signer_info = SignerInfo {
        public_key: Some(pubkey),
        mode_info: Some(ModeInfo {
            sum: Some(mode_info::Sum::Single(mode_info::Single {
                mode: mode as i32,
            })),
        }),
        sequence,
    };
    let auth_info = AuthInfo {
        signer_infos: vec![signer_info],
        fee: Some(proto::Fee {
            amount: fee
                .amount
                .iter()
                .map(|coin| proto::Coin {
                    denom: coin.denom.clone(),
                    amount: coin.amount.clone(),
                })
                .collect(),
            gas_limit: fee.gas_limit,
            payer: String::new(),
            granter: String::new(),
        }),
        tip: None,
    };
    auth_info.encode_to_vec()
}

/// Package the pieces a direct signature is computed over.
pub fn make_sign_doc(
    body_bytes: Vec<u8>,
    auth_info_bytes: Vec<u8>,
    chain_id: &str,
    account_number: u64,
) -> SignDoc {
    SignDoc {
        body_bytes,
        auth_info_bytes,
        chain_id: chain_id.to_string(),
        account_number,
    }
}

/// The serialized sign doc: the byte string handed to the signer.
pub fn sign_doc_bytes(doc: &SignDoc) -> Vec<u8> {
    doc.encode_to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::Coin;

    fn test_fee() -> Fee {
        Fee::new(vec![Coin::new("ustake", 5000u64)], 200_000)
    }

    fn test_pubkey() -> Any {
        encode_pubkey(&[0x02; 33])
    }

    #[test]
    fn pubkey_any_has_expected_type_url() {
        let any = test_pubkey();
        assert_eq!(any.type_url, "/cosmos.crypto.secp256k1.PubKey");
        let decoded = PubKey::decode(&any.value[..]).unwrap();
        assert_eq!(decoded.key, vec![0x02; 33]);
    }

    #[test]
    fn auth_info_bytes_are_deterministic() {
        let first = make_auth_info_bytes(test_pubkey(), &test_fee(), 9, SignMode::Direct);
        let second = make_auth_info_bytes(test_pubkey(), &test_fee(), 9, SignMode::Direct);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn auth_info_carries_mode_and_sequence() {
        let bytes = make_auth_info_bytes(test_pubkey(), &test_fee(), 9, SignMode::LegacyAminoJson);
        let auth_info = AuthInfo::decode(&bytes[..]).unwrap();
        let signer_info = &auth_info.signer_infos[0];
        assert_eq!(signer_info.sequence, 9);
        match signer_info.mode_info.as_ref().and_then(|m| m.sum.as_ref()) {
            Some(mode_info::Sum::Single(single)) => {
                assert_eq!(single.mode, SignMode::LegacyAminoJson as i32);
            }
            other => panic!("unexpected mode info: {:?}", other),
        }
        assert_eq!(auth_info.fee.as_ref().unwrap().gas_limit, 200_000);
    }

    #[test]
    fn sign_doc_bytes_are_deterministic() {
        let body_bytes = vec![1, 2, 3];
        let auth_bytes = make_auth_info_bytes(test_pubkey(), &test_fee(), 0, SignMode::Direct);
        let doc = make_sign_doc(body_bytes.clone(), auth_bytes.clone(), "testing-1", 4);
        let again = make_sign_doc(body_bytes, auth_bytes, "testing-1", 4);
        assert_eq!(sign_doc_bytes(&doc), sign_doc_bytes(&again));
    }
}
