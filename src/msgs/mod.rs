//! Message payload types that can be carried inside a transaction body.
//!
//! Each message here is a hand-written prost struct that additionally
//! supports serde, so the registry can construct it from loose JSON fields
//! and render decoded wire bytes back into fields.

mod bank;
mod wasm;

pub use bank::MsgSend;
pub use wasm::{
    MsgClearAdmin, MsgExecuteContract, MsgInstantiateContract, MsgMigrateContract, MsgStoreCode,
    MsgUpdateAdmin,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An unsigned message plus the type URL needed to resolve its codec.
///
/// Immutable once constructed; produced by the caller and consumed by the
/// sign document builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodeObject {
    pub type_url: String,
    pub value: Value,
}

impl EncodeObject {
    pub fn new(type_url: impl Into<String>, value: Value) -> Self {
        Self {
            type_url: type_url.into(),
            value,
        }
    }
}

/// A token amount expressed in a denomination's base unit.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Coin {
    #[prost(string, tag = "1")]
    pub denom: String,

    #[prost(string, tag = "2")]
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl ToString) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }
}

/// Serde adapter rendering binary message fields as base64 strings, the
/// convention legacy JSON documents use for embedded bytes.
pub(crate) mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(encoded.as_bytes()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn coin_roundtrip() {
        let coin = Coin::new("ustake", 2500u64);
        let bytes = coin.encode_to_vec();
        let decoded = Coin::decode(&bytes[..]).unwrap();
        assert_eq!(coin, decoded);
    }

    #[test]
    fn encode_object_is_plain_data() {
        let msg = EncodeObject::new(
            MsgSend::TYPE_URL,
            serde_json::json!({
                "from_address": "cosmos1from",
                "to_address": "cosmos1to",
                "amount": [{"denom": "ustake", "amount": "1"}],
            }),
        );
        assert_eq!(msg.type_url, "/cosmos.bank.v1beta1.MsgSend");
        assert_eq!(msg.value["to_address"], "cosmos1to");
    }
}
