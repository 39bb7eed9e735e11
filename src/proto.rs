//! Proto definitions for Cosmos SDK chain integration.
//!
//! Generated types come from the `cosmos-sdk-proto` crate; this module
//! collects the ones the rest of the crate needs under a single path.

pub use cosmos_sdk_proto::Any;

pub use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;
pub use cosmos_sdk_proto::cosmos::tx::v1beta1::{
    mode_info, AuthInfo, BroadcastMode, BroadcastTxRequest, Fee, GetTxRequest, ModeInfo, SignDoc,
    SignerInfo, TxBody, TxRaw, service_client::ServiceClient as TxServiceClient,
};
pub use cosmos_sdk_proto::cosmos::tx::signing::v1beta1::SignMode;
pub use cosmos_sdk_proto::cosmos::base::abci::v1beta1::TxResponse;
pub use cosmos_sdk_proto::cosmos::auth::v1beta1::{
    BaseAccount, QueryAccountRequest, query_client::QueryClient as AuthQueryClient,
};
pub use cosmos_sdk_proto::cosmos::bank::v1beta1::{
    QueryBalanceRequest, query_client::QueryClient as BankQueryClient,
};
pub use cosmos_sdk_proto::cosmos::base::tendermint::v1beta1::{
    GetLatestBlockRequest, GetNodeInfoRequest,
    service_client::ServiceClient as TendermintServiceClient,
};
pub use cosmos_sdk_proto::cosmos::crypto::secp256k1::PubKey;
pub use cosmos_sdk_proto::cosmos::vesting::v1beta1::{
    BaseVestingAccount, ContinuousVestingAccount, DelayedVestingAccount, PeriodicVestingAccount,
    PermanentLockedAccount,
};
pub use cosmos_sdk_proto::cosmwasm::wasm::v1::{
    QuerySmartContractStateRequest, query_client::QueryClient as WasmQueryClient,
};
