//! Type registry mapping a type URL to its encode/decode/construct codec.
//!
//! The registry is populated once during process initialization and shared
//! read-only by every submission afterwards. Registering the same type URL
//! twice is rejected; a lookup miss is a hard error, never a null codec.

use std::collections::HashMap;

use prost::Message;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::RegistryError;
use crate::msgs::{
    EncodeObject, MsgClearAdmin, MsgExecuteContract, MsgInstantiateContract, MsgMigrateContract,
    MsgSend, MsgStoreCode, MsgUpdateAdmin,
};
use crate::proto::{Any, TxBody};

type ConstructEncodeFn = Box<dyn Fn(&Value) -> Result<Vec<u8>, RegistryError> + Send + Sync>;
type DecodeFn = Box<dyn Fn(&[u8]) -> Result<Value, RegistryError> + Send + Sync>;

/// Codec triple for one message schema: construct a typed message from
/// loose fields, encode it to protobuf bytes, decode bytes back to fields.
pub struct TypeCodec {
    encode: ConstructEncodeFn,
    decode: DecodeFn,
}

impl std::fmt::Debug for TypeCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeCodec").finish_non_exhaustive()
    }
}

impl TypeCodec {
    /// Build a codec from a prost message type that also supports serde.
    ///
    /// Construction is the serde step (fields into a typed message), the
    /// wire steps are prost. Encoding therefore always passes through the
    /// typed message, so unknown fields are rejected up front instead of
    /// leaking into the wire encoding.
    pub fn of<M>(type_url: &str) -> Self
    where
        M: Message + Default + Serialize + DeserializeOwned,
    {
        let encode_url = type_url.to_string();
        let decode_url = type_url.to_string();
        TypeCodec {
            encode: Box::new(move |fields| {
                let message: M =
                    serde_json::from_value(fields.clone()).map_err(|e| RegistryError::Construct {
                        type_url: encode_url.clone(),
                        source: e,
                    })?;
                Ok(message.encode_to_vec())
            }),
            decode: Box::new(move |bytes| {
                let message = M::decode(bytes).map_err(|e| RegistryError::Decode {
                    type_url: decode_url.clone(),
                    source: e,
                })?;
                serde_json::to_value(&message).map_err(|e| RegistryError::Fields {
                    type_url: decode_url.clone(),
                    source: e,
                })
            }),
        }
    }

    pub fn encode(&self, fields: &Value) -> Result<Vec<u8>, RegistryError> {
        (self.encode)(fields)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Value, RegistryError> {
        (self.decode)(bytes)
    }
}

/// Ordered message sequence plus memo.
///
/// Order is preserved verbatim into the wire encoding and determines the
/// execution order of the messages on the receiving chain.
#[derive(Debug, Clone, PartialEq)]
pub struct TxBodyValue {
    pub messages: Vec<EncodeObject>,
    pub memo: String,
}

/// Lookup table from type URL to codec.
pub struct Registry {
    types: HashMap<String, TypeCodec>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// A registry pre-loaded with the bank and wasm message types this
    /// crate ships.
    pub fn with_default_types() -> Self {
        let mut registry = Self::new();
        registry.insert::<MsgSend>(MsgSend::TYPE_URL);
        registry.insert::<MsgExecuteContract>(MsgExecuteContract::TYPE_URL);
        registry.insert::<MsgInstantiateContract>(MsgInstantiateContract::TYPE_URL);
        registry.insert::<MsgStoreCode>(MsgStoreCode::TYPE_URL);
        registry.insert::<MsgMigrateContract>(MsgMigrateContract::TYPE_URL);
        registry.insert::<MsgUpdateAdmin>(MsgUpdateAdmin::TYPE_URL);
        registry.insert::<MsgClearAdmin>(MsgClearAdmin::TYPE_URL);
        registry
    }

    fn insert<M>(&mut self, type_url: &str)
    where
        M: Message + Default + Serialize + DeserializeOwned,
    {
        self.types
            .insert(type_url.to_string(), TypeCodec::of::<M>(type_url));
    }

    /// Register a codec derived from a message type.
    ///
    /// Fails with [`RegistryError::AlreadyRegistered`] if the type URL is
    /// taken; conflicts are rejected rather than overwritten.
    pub fn register<M>(&mut self, type_url: &str) -> Result<(), RegistryError>
    where
        M: Message + Default + Serialize + DeserializeOwned,
    {
        if self.types.contains_key(type_url) {
            return Err(RegistryError::AlreadyRegistered(type_url.to_string()));
        }
        self.insert::<M>(type_url);
        Ok(())
    }

    /// Register a pre-built codec under a type URL.
    pub fn register_codec(&mut self, type_url: &str, codec: TypeCodec) -> Result<(), RegistryError> {
        if self.types.contains_key(type_url) {
            return Err(RegistryError::AlreadyRegistered(type_url.to_string()));
        }
        self.types.insert(type_url.to_string(), codec);
        Ok(())
    }

    /// Resolve the codec for a type URL.
    pub fn lookup(&self, type_url: &str) -> Result<&TypeCodec, RegistryError> {
        self.types
            .get(type_url)
            .ok_or_else(|| RegistryError::UnknownType(type_url.to_string()))
    }

    /// Construct and serialize a message to its wire bytes.
    pub fn encode(&self, msg: &EncodeObject) -> Result<Vec<u8>, RegistryError> {
        self.lookup(&msg.type_url)?.encode(&msg.value)
    }

    /// Decode wire bytes back into loose message fields.
    pub fn decode(&self, type_url: &str, bytes: &[u8]) -> Result<Value, RegistryError> {
        self.lookup(type_url)?.decode(bytes)
    }

    /// Wrap a message in its `Any` envelope.
    pub fn encode_any(&self, msg: &EncodeObject) -> Result<Any, RegistryError> {
        Ok(Any {
            type_url: msg.type_url.clone(),
            value: self.encode(msg)?,
        })
    }

    /// Encode a transaction body: each message wrapped in an `Any` envelope
    /// in sequence order, then the body wrapper itself.
    pub fn encode_tx_body(&self, body: &TxBodyValue) -> Result<Vec<u8>, RegistryError> {
        let messages = body
            .messages
            .iter()
            .map(|msg| self.encode_any(msg))
            .collect::<Result<Vec<_>, _>>()?;
        let tx_body = TxBody {
            messages,
            memo: body.memo.clone(),
            timeout_height: 0,
            extension_options: vec![],
            non_critical_extension_options: vec![],
        };
        Ok(tx_body.encode_to_vec())
    }

    /// Decode transaction body bytes back into messages and memo.
    pub fn decode_tx_body(&self, bytes: &[u8]) -> Result<TxBodyValue, RegistryError> {
        let tx_body = TxBody::decode(bytes).map_err(|e| RegistryError::Decode {
            type_url: "/cosmos.tx.v1beta1.TxBody".to_string(),
            source: e,
        })?;
        let messages = tx_body
            .messages
            .iter()
            .map(|any| {
                Ok(EncodeObject {
                    type_url: any.type_url.clone(),
                    value: self.decode(&any.type_url, &any.value)?,
                })
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;
        Ok(TxBodyValue {
            messages,
            memo: tx_body.memo,
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
