//! Legacy Amino JSON sign documents.
//!
//! Amino signing covers signers that cannot sign raw protobuf bytes. The
//! document is a key-sorted JSON structure with every integer rendered as a
//! decimal string, and each message keyed by a human-readable legacy name
//! instead of a type URL. The name mapping is static; a type URL without an
//! entry cannot be signed in this mode.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SigningError;
use crate::fee::Fee;
use crate::msgs::{
    Coin, EncodeObject, MsgClearAdmin, MsgExecuteContract, MsgInstantiateContract,
    MsgMigrateContract, MsgSend, MsgStoreCode, MsgUpdateAdmin,
};

/// Static mapping between type URLs and legacy Amino names.
const LEGACY_NAMES: &[(&str, &str)] = &[
    (MsgSend::TYPE_URL, "cosmos-sdk/MsgSend"),
    (MsgExecuteContract::TYPE_URL, "wasm/MsgExecuteContract"),
    (MsgInstantiateContract::TYPE_URL, "wasm/MsgInstantiateContract"),
    (MsgStoreCode::TYPE_URL, "wasm/MsgStoreCode"),
    (MsgMigrateContract::TYPE_URL, "wasm/MsgMigrateContract"),
    (MsgUpdateAdmin::TYPE_URL, "wasm/MsgUpdateAdmin"),
    (MsgClearAdmin::TYPE_URL, "wasm/MsgClearAdmin"),
];

/// Legacy name for a type URL.
pub fn legacy_name(type_url: &str) -> Result<&'static str, SigningError> {
    LEGACY_NAMES
        .iter()
        .find(|(url, _)| *url == type_url)
        .map(|(_, name)| *name)
        .ok_or_else(|| SigningError::UnsupportedLegacyType(type_url.to_string()))
}

/// Type URL for a legacy name; the inverse of [`legacy_name`].
pub fn type_url(name: &str) -> Result<&'static str, SigningError> {
    LEGACY_NAMES
        .iter()
        .find(|(_, legacy)| *legacy == name)
        .map(|(url, _)| *url)
        .ok_or_else(|| SigningError::UnsupportedLegacyType(name.to_string()))
}

/// A message as it appears in a legacy sign document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AminoMsg {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub value: Value,
}

/// Fee as it appears in a legacy sign document: gas as a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

impl From<&Fee> for StdFee {
    fn from(fee: &Fee) -> Self {
        Self {
            amount: fee.amount.clone(),
            gas: fee.gas_limit.to_string(),
        }
    }
}

impl StdFee {
    /// Back to a typed fee; the gas string must be a decimal integer.
    pub fn to_fee(&self) -> Result<Fee, SigningError> {
        let gas_limit = self
            .gas
            .parse::<u64>()
            .map_err(|_| SigningError::InvalidSignedDoc(format!("bad gas value {:?}", self.gas)))?;
        Ok(Fee::new(self.amount.clone(), gas_limit))
    }
}

/// The document signed under `SIGN_MODE_LEGACY_AMINO_JSON`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdSignDoc {
    pub account_number: String,
    pub chain_id: String,
    pub fee: StdFee,
    pub memo: String,
    pub msgs: Vec<AminoMsg>,
    pub sequence: String,
}

/// Translate one message into its legacy representation.
pub fn to_amino_msg(msg: &EncodeObject) -> Result<AminoMsg, SigningError> {
    Ok(AminoMsg {
        msg_type: legacy_name(&msg.type_url)?.to_string(),
        value: msg.value.clone(),
    })
}

/// Translate a legacy message back into an [`EncodeObject`].
pub fn to_encode_object(msg: &AminoMsg) -> Result<EncodeObject, SigningError> {
    Ok(EncodeObject {
        type_url: type_url(&msg.msg_type)?.to_string(),
        value: msg.value.clone(),
    })
}

/// Assemble the legacy sign document for one submission.
pub fn make_std_sign_doc(
    messages: &[EncodeObject],
    fee: &Fee,
    chain_id: &str,
    memo: &str,
    account_number: u64,
    sequence: u64,
) -> Result<StdSignDoc, SigningError> {
    let msgs = messages
        .iter()
        .map(to_amino_msg)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(StdSignDoc {
        account_number: account_number.to_string(),
        chain_id: chain_id.to_string(),
        fee: StdFee::from(fee),
        memo: memo.to_string(),
        msgs,
        sequence: sequence.to_string(),
    })
}

/// Canonical sign bytes: JSON with object keys sorted lexicographically at
/// every nesting level and no insignificant whitespace.
pub fn serialize_std_sign_doc(doc: &StdSignDoc) -> Result<Vec<u8>, SigningError> {
    // Passing through Value re-keys every object into sorted map order.
    let value = serde_json::to_value(doc)?;
    Ok(serde_json::to_vec(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn send_msg() -> EncodeObject {
        EncodeObject::new(
            MsgSend::TYPE_URL,
            json!({
                "from_address": "cosmos1from",
                "to_address": "cosmos1to",
                "amount": [{"denom": "ustake", "amount": "100"}],
            }),
        )
    }

    #[test]
    fn legacy_name_mapping() {
        assert_eq!(legacy_name(MsgSend::TYPE_URL).unwrap(), "cosmos-sdk/MsgSend");
        assert_eq!(
            type_url("wasm/MsgExecuteContract").unwrap(),
            MsgExecuteContract::TYPE_URL
        );
    }

    #[test]
    fn unknown_type_url_has_no_legacy_name() {
        let err = legacy_name("/custom.v1.MsgUnknown").unwrap_err();
        assert!(matches!(err, SigningError::UnsupportedLegacyType(_)));
    }

    #[test]
    fn amino_msg_roundtrip() {
        let msg = send_msg();
        let amino = to_amino_msg(&msg).unwrap();
        assert_eq!(amino.msg_type, "cosmos-sdk/MsgSend");
        let back = to_encode_object(&amino).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn sign_doc_integers_are_strings() {
        let doc = make_std_sign_doc(
            &[send_msg()],
            &Fee::new(vec![Coin::new("ustake", 5000u64)], 200_000),
            "testing-1",
            "",
            7,
            42,
        )
        .unwrap();
        assert_eq!(doc.account_number, "7");
        assert_eq!(doc.sequence, "42");
        assert_eq!(doc.fee.gas, "200000");
    }

    #[test]
    fn sign_bytes_are_key_sorted_and_compact() {
        let doc = make_std_sign_doc(
            &[send_msg()],
            &Fee::new(vec![Coin::new("ustake", 5000u64)], 200_000),
            "testing-1",
            "hello",
            7,
            42,
        )
        .unwrap();
        let bytes = serialize_std_sign_doc(&doc).unwrap();
        let rendered = String::from_utf8(bytes).unwrap();
        // Top-level keys in lexicographic order, no whitespace.
        let account_number = rendered.find("\"account_number\"").unwrap();
        let chain_id = rendered.find("\"chain_id\"").unwrap();
        let fee = rendered.find("\"fee\"").unwrap();
        let memo = rendered.find("\"memo\"").unwrap();
        let msgs = rendered.find("\"msgs\"").unwrap();
        let sequence = rendered.find("\"sequence\"").unwrap();
        assert!(account_number < chain_id && chain_id < fee && fee < memo);
        assert!(memo < msgs && msgs < sequence);
        assert!(!rendered.contains(' '));
    }

    #[test]
    fn sign_bytes_are_deterministic() {
        let doc = make_std_sign_doc(&[send_msg()], &Fee::new(vec![], 1), "c", "", 0, 0).unwrap();
        assert_eq!(
            serialize_std_sign_doc(&doc).unwrap(),
            serialize_std_sign_doc(&doc).unwrap()
        );
    }
}
