use serde::{Deserialize, Serialize};

use super::Coin;

/// Transfer of coins from one account to another.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgSend {
    #[prost(string, tag = "1")]
    pub from_address: String,

    #[prost(string, tag = "2")]
    pub to_address: String,

    #[prost(message, repeated, tag = "3")]
    pub amount: Vec<Coin>,
}

impl MsgSend {
    pub const TYPE_URL: &'static str = "/cosmos.bank.v1beta1.MsgSend";
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn send_roundtrip() {
        let msg = MsgSend {
            from_address: "cosmos1from".to_string(),
            to_address: "cosmos1to".to_string(),
            amount: vec![Coin::new("ustake", 1234u64)],
        };
        let decoded = MsgSend::decode(&msg.encode_to_vec()[..]).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn send_from_json_fields() {
        let msg: MsgSend = serde_json::from_value(serde_json::json!({
            "from_address": "cosmos1from",
            "to_address": "cosmos1to",
            "amount": [{"denom": "ustake", "amount": "5"}],
        }))
        .unwrap();
        assert_eq!(msg.amount.len(), 1);
        assert_eq!(msg.amount[0].denom, "ustake");
    }
}
