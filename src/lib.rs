// Library exports for stargate_client

pub mod account;
pub mod amino;
pub mod broadcast;
pub mod client;
pub mod config;
pub mod error;
pub mod fee;
pub mod msgs;
pub mod proto;
pub mod registry;
pub mod signdoc;
pub mod signer;

// Re-export main types for convenience
pub use account::{Account, AccountInfo};
pub use broadcast::{classify, BroadcastOutcome, SubmitResponse, TxStageResult};
pub use client::{ChainTransport, GrpcTransport, NodeInfo, SigningClient, TxSignMode};
pub use config::ChainConfig;
pub use error::{RegistryError, SigningError};
pub use fee::{Fee, GasPrice};
pub use msgs::{Coin, EncodeObject};
pub use registry::{Registry, TxBodyValue, TypeCodec};
pub use signer::{AminoHdWallet, DirectHdWallet, TxSigner};
