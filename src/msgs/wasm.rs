//! CosmWasm contract lifecycle messages.

use serde::{Deserialize, Serialize};

use super::{base64_bytes, Coin};

/// Execute a message on a deployed contract.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgExecuteContract {
    /// Sender is the actor that signed the message.
    #[prost(string, tag = "1")]
    pub sender: String,

    /// Contract is the address of the smart contract.
    #[prost(string, tag = "2")]
    pub contract: String,

    /// JSON-encoded message passed to the contract.
    #[prost(bytes = "vec", tag = "3")]
    #[serde(with = "base64_bytes")]
    pub msg: Vec<u8>,

    #[prost(message, repeated, tag = "5")]
    pub funds: Vec<Coin>,
}

impl MsgExecuteContract {
    pub const TYPE_URL: &'static str = "/cosmwasm.wasm.v1.MsgExecuteContract";
}

/// Instantiate a contract from previously stored code.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgInstantiateContract {
    #[prost(string, tag = "1")]
    pub sender: String,

    /// Admin is an optional address that can migrate the contract.
    #[prost(string, tag = "2")]
    pub admin: String,

    #[prost(uint64, tag = "3")]
    pub code_id: u64,

    /// Human-readable label for the contract instance.
    #[prost(string, tag = "4")]
    pub label: String,

    /// JSON-encoded instantiation message.
    #[prost(bytes = "vec", tag = "5")]
    #[serde(with = "base64_bytes")]
    pub msg: Vec<u8>,

    #[prost(message, repeated, tag = "6")]
    pub funds: Vec<Coin>,
}

impl MsgInstantiateContract {
    pub const TYPE_URL: &'static str = "/cosmwasm.wasm.v1.MsgInstantiateContract";
}

/// Upload contract byte code.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgStoreCode {
    #[prost(string, tag = "1")]
    pub sender: String,

    /// Raw or gzip-compressed wasm byte code.
    #[prost(bytes = "vec", tag = "2")]
    #[serde(with = "base64_bytes")]
    pub wasm_byte_code: Vec<u8>,
}

impl MsgStoreCode {
    pub const TYPE_URL: &'static str = "/cosmwasm.wasm.v1.MsgStoreCode";
}

/// Migrate a contract to a new code id.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgMigrateContract {
    #[prost(string, tag = "1")]
    pub sender: String,

    #[prost(string, tag = "2")]
    pub contract: String,

    #[prost(uint64, tag = "3")]
    pub code_id: u64,

    /// JSON-encoded migration message.
    #[prost(bytes = "vec", tag = "4")]
    #[serde(with = "base64_bytes")]
    pub msg: Vec<u8>,
}

impl MsgMigrateContract {
    pub const TYPE_URL: &'static str = "/cosmwasm.wasm.v1.MsgMigrateContract";
}

/// Change the admin of a contract.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgUpdateAdmin {
    #[prost(string, tag = "1")]
    pub sender: String,

    #[prost(string, tag = "2")]
    pub new_admin: String,

    #[prost(string, tag = "3")]
    pub contract: String,
}

impl MsgUpdateAdmin {
    pub const TYPE_URL: &'static str = "/cosmwasm.wasm.v1.MsgUpdateAdmin";
}

/// Clear the admin of a contract, making it immutable.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgClearAdmin {
    #[prost(string, tag = "1")]
    pub sender: String,

    #[prost(string, tag = "3")]
    pub contract: String,
}

impl MsgClearAdmin {
    pub const TYPE_URL: &'static str = "/cosmwasm.wasm.v1.MsgClearAdmin";
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn execute_roundtrip() {
        let msg = MsgExecuteContract {
            sender: "cosmos1sender".to_string(),
            contract: "cosmos1contract".to_string(),
            msg: br#"{"increment":{}}"#.to_vec(),
            funds: vec![Coin::new("ustake", 25u64)],
        };
        let decoded = MsgExecuteContract::decode(&msg.encode_to_vec()[..]).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn execute_msg_field_uses_base64_in_json() {
        let msg = MsgExecuteContract {
            sender: "cosmos1sender".to_string(),
            contract: "cosmos1contract".to_string(),
            msg: br#"{"increment":{}}"#.to_vec(),
            funds: vec![],
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["msg"], "eyJpbmNyZW1lbnQiOnt9fQ==");

        let back: MsgExecuteContract = serde_json::from_value(value).unwrap();
        assert_eq!(back.msg, msg.msg);
    }

    #[test]
    fn instantiate_roundtrip() {
        let msg = MsgInstantiateContract {
            sender: "cosmos1sender".to_string(),
            admin: String::new(),
            code_id: 42,
            label: "counter".to_string(),
            msg: br#"{"count":0}"#.to_vec(),
            funds: vec![],
        };
        let decoded = MsgInstantiateContract::decode(&msg.encode_to_vec()[..]).unwrap();
        assert_eq!(msg, decoded);
    }
}
