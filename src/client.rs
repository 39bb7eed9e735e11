//! gRPC transport and the signing client.
//!
//! The signing client orchestrates one submission end to end: build the
//! body, dispatch signing, submit, classify. All intermediate values are
//! owned by the single submission; nothing is cached across submissions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use prost::Message;
use tokio::sync::Mutex;
use tonic::transport::{Channel, Endpoint};
use tonic::Code;

use crate::account::{Account, AccountInfo};
use crate::amino;
use crate::broadcast::{classify, BroadcastOutcome, SubmitResponse, TxStageResult};
use crate::config::ChainConfig;
use crate::error::SigningError;
use crate::fee::Fee;
use crate::msgs::EncodeObject;
use crate::proto::{
    AuthQueryClient, BankQueryClient, BroadcastMode, BroadcastTxRequest, GetLatestBlockRequest,
    GetNodeInfoRequest, GetTxRequest, QueryAccountRequest, QueryBalanceRequest,
    QuerySmartContractStateRequest, SignMode, TendermintServiceClient, TxRaw, TxResponse,
    TxServiceClient, WasmQueryClient,
};
use crate::registry::{Registry, TxBodyValue};
use crate::signdoc::{encode_pubkey, make_auth_info_bytes, make_sign_doc};
use crate::signer::TxSigner;

/// Which sign document variant a submission uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxSignMode {
    Direct,
    AminoJson,
}

/// Chain-state and submission operations the signing client needs from a
/// node. Implementations own all transport policy (timeouts, polling).
#[async_trait]
pub trait ChainTransport: Send + Sync {
    /// Account number and sequence for an address, or `None` if the chain
    /// has no such account.
    async fn query_account(&self, address: &str) -> Result<Option<AccountInfo>>;

    /// The chain ID the node reports.
    async fn chain_id(&self) -> Result<String>;

    /// Submit signed transaction bytes and collect both processing stages.
    async fn submit(&self, tx_bytes: Vec<u8>) -> Result<SubmitResponse>;
}

/// Node identity reported by the tendermint service.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub chain_id: String,
    pub node_version: String,
    pub moniker: String,
}

/// gRPC transport backed by a tonic channel.
#[derive(Clone)]
pub struct GrpcTransport {
    config: ChainConfig,
    channel: Channel,
}

impl GrpcTransport {
    /// Connect to the configured gRPC endpoint.
    pub async fn connect(config: ChainConfig) -> Result<Self> {
        log::info!("Connecting to {}", config.grpc_endpoint);

        // For HTTPS endpoints tonic handles TLS automatically
        let endpoint = Endpoint::from_shared(config.grpc_endpoint.clone())?
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connection_timeout));
        let channel = endpoint.connect().await?;

        log::info!("Connected to {}", config.grpc_endpoint);
        Ok(Self { config, channel })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Node info for health checks and chain ID discovery.
    pub async fn node_info(&self) -> Result<NodeInfo> {
        let mut client = TendermintServiceClient::new(self.channel.clone());
        let request = tonic::Request::new(GetNodeInfoRequest {});
        let response = client
            .get_node_info(request)
            .await
            .map_err(|e| anyhow!("failed to get node info: {}", e))?;

        let node_info_response = response.into_inner();
        let default_node_info = node_info_response
            .default_node_info
            .ok_or_else(|| anyhow!("no default node info in response"))?;
        let app_version = node_info_response
            .application_version
            .ok_or_else(|| anyhow!("no application version in response"))?;

        Ok(NodeInfo {
            chain_id: default_node_info.network,
            node_version: app_version.version,
            moniker: default_node_info.moniker,
        })
    }

    /// Latest block height reported by the node.
    pub async fn latest_height(&self) -> Result<u64> {
        let mut client = TendermintServiceClient::new(self.channel.clone());
        let request = tonic::Request::new(GetLatestBlockRequest {});
        let response = client
            .get_latest_block(request)
            .await
            .map_err(|e| anyhow!("failed to get latest block: {}", e))?;

        let header = response
            .into_inner()
            .block
            .and_then(|block| block.header)
            .ok_or_else(|| anyhow!("no block header in response"))?;

        Ok(header.height as u64)
    }

    /// Bank balance of one denomination for an address.
    pub async fn query_bank_balance(&self, address: &str, denom: &str) -> Result<u128> {
        let mut client = BankQueryClient::new(self.channel.clone());
        let request = tonic::Request::new(QueryBalanceRequest {
            address: address.to_string(),
            denom: denom.to_string(),
        });
        let response = client
            .balance(request)
            .await
            .map_err(|e| anyhow!("failed to query bank balance: {}", e))?;

        let balance = response
            .into_inner()
            .balance
            .ok_or_else(|| anyhow!("no balance returned"))?;

        balance
            .amount
            .parse::<u128>()
            .map_err(|e| anyhow!("failed to parse balance amount: {}", e))
    }

    /// Smart query against a contract (read-only, no gas required).
    pub async fn query_contract_smart(
        &self,
        contract_address: &str,
        query_msg: Vec<u8>,
    ) -> Result<serde_json::Value> {
        let mut client = WasmQueryClient::new(self.channel.clone());
        let request = tonic::Request::new(QuerySmartContractStateRequest {
            address: contract_address.to_string(),
            query_data: query_msg,
        });

        let response = client
            .smart_contract_state(request)
            .await
            .map_err(|e| anyhow!("failed to query contract: {}", e))?;

        // Contracts answer smart queries with a JSON document
        let response_bytes = response.into_inner().data;
        serde_json::from_slice::<serde_json::Value>(&response_bytes)
            .map_err(|e| anyhow!("failed to parse smart contract JSON response: {}", e))
    }

    /// Poll until the transaction is indexed in a block or the attempt
    /// budget runs out.
    async fn wait_for_delivery(&self, txhash: &str) -> Result<Option<TxResponse>> {
        for attempt in 0..self.config.broadcast_poll_attempts {
            tokio::time::sleep(Duration::from_millis(self.config.broadcast_poll_interval_ms)).await;

            let mut client = TxServiceClient::new(self.channel.clone());
            let request = tonic::Request::new(GetTxRequest {
                hash: txhash.to_string(),
            });
            match client.get_tx(request).await {
                Ok(response) => {
                    if let Some(tx_response) = response.into_inner().tx_response {
                        return Ok(Some(tx_response));
                    }
                }
                Err(status)
                    if status.code() == Code::NotFound
                        || status.message().contains("not found") =>
                {
                    log::debug!(
                        "tx {} not yet indexed (attempt {}/{})",
                        txhash,
                        attempt + 1,
                        self.config.broadcast_poll_attempts
                    );
                }
                Err(status) => return Err(anyhow!("failed to look up transaction: {}", status)),
            }
        }
        Ok(None)
    }
}

/// The SDK renders `TxResponse.data` as a hex string.
fn decode_stage_data(data: &str) -> Option<Vec<u8>> {
    if data.is_empty() {
        return None;
    }
    hex::decode(data).ok()
}

#[async_trait]
impl ChainTransport for GrpcTransport {
    async fn query_account(&self, address: &str) -> Result<Option<AccountInfo>> {
        let mut client = AuthQueryClient::new(self.channel.clone());
        let request = tonic::Request::new(QueryAccountRequest {
            address: address.to_string(),
        });

        match client.account(request).await {
            Ok(response) => {
                let account_any = response
                    .into_inner()
                    .account
                    .ok_or_else(|| anyhow!("empty account response for {}", address))?;

                log::debug!("decoding account with type_url: {}", account_any.type_url);
                let account = Account::decode_any(&account_any.type_url, &account_any.value)?;

                match account.account_info() {
                    Some(info) => Ok(Some(info)),
                    None => Err(anyhow!(
                        "account type {} has no extractable account info",
                        account.account_type()
                    )),
                }
            }
            Err(status) if status.code() == Code::NotFound => Ok(None),
            Err(status) => Err(anyhow!("failed to query account: {}", status)),
        }
    }

    async fn chain_id(&self) -> Result<String> {
        let info = self.node_info().await?;
        if info.chain_id.is_empty() {
            return Err(anyhow!("node reported an empty chain ID"));
        }
        Ok(info.chain_id)
    }

    async fn submit(&self, tx_bytes: Vec<u8>) -> Result<SubmitResponse> {
        log::info!("submitting transaction ({} bytes)", tx_bytes.len());

        let mut client = TxServiceClient::new(self.channel.clone());
        let request = tonic::Request::new(BroadcastTxRequest {
            tx_bytes,
            mode: BroadcastMode::Sync as i32,
        });
        let response = client
            .broadcast_tx(request)
            .await
            .map_err(|e| anyhow!("failed to broadcast transaction: {}", e))?;

        let tx_response = response
            .into_inner()
            .tx_response
            .ok_or_else(|| anyhow!("no tx response in broadcast response"))?;

        let hash = hex::decode(&tx_response.txhash)
            .map_err(|e| anyhow!("node returned a non-hex tx hash: {}", e))?;
        let check_tx = TxStageResult {
            code: tx_response.code,
            log: tx_response.raw_log.clone(),
            data: decode_stage_data(&tx_response.data),
        };

        // Admission failed; execution never happens
        if check_tx.code != 0 {
            return Ok(SubmitResponse {
                hash,
                height: 0,
                check_tx,
                deliver_tx: None,
            });
        }

        match self.wait_for_delivery(&tx_response.txhash).await? {
            Some(deliver) => Ok(SubmitResponse {
                hash,
                height: deliver.height as u64,
                check_tx,
                deliver_tx: Some(TxStageResult {
                    code: deliver.code,
                    log: deliver.raw_log.clone(),
                    data: decode_stage_data(&deliver.data),
                }),
            }),
            None => Err(anyhow!(
                "transaction {} was admitted but not observed in a block",
                tx_response.txhash
            )),
        }
    }
}

/// Client that signs and broadcasts transactions over a transport.
///
/// Submissions for the same account are serialized internally: two
/// concurrent submissions would both read the account's pre-increment
/// sequence and one of them would be rejected by the chain.
pub struct SigningClient<T, S> {
    transport: T,
    signer: S,
    registry: Arc<Registry>,
    account_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<T: ChainTransport, S: TxSigner> SigningClient<T, S> {
    pub fn new(transport: T, signer: S, registry: Arc<Registry>) -> Self {
        Self {
            transport,
            signer,
            registry,
            account_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sign a transaction, selecting the mode by probing the signer.
    pub async fn sign(
        &self,
        address: &str,
        messages: Vec<EncodeObject>,
        fee: Fee,
        memo: &str,
    ) -> Result<TxRaw, SigningError> {
        let lock = self.account_lock(address).await;
        let _guard = lock.lock().await;
        self.sign_unlocked(address, messages, fee, memo, None).await
    }

    /// Sign a transaction in an explicitly requested mode.
    pub async fn sign_in_mode(
        &self,
        address: &str,
        messages: Vec<EncodeObject>,
        fee: Fee,
        memo: &str,
        mode: TxSignMode,
    ) -> Result<TxRaw, SigningError> {
        let lock = self.account_lock(address).await;
        let _guard = lock.lock().await;
        self.sign_unlocked(address, messages, fee, memo, Some(mode))
            .await
    }

    /// Sign and submit in one go, then classify the node's response.
    ///
    /// The per-account lock spans the whole operation so the sequence read
    /// during signing cannot be reused by a second submission.
    pub async fn sign_and_broadcast(
        &self,
        address: &str,
        messages: Vec<EncodeObject>,
        fee: Fee,
        memo: &str,
    ) -> Result<BroadcastOutcome, SigningError> {
        let lock = self.account_lock(address).await;
        let _guard = lock.lock().await;

        let tx = self
            .sign_unlocked(address, messages, fee, memo, None)
            .await?;
        self.broadcast(&tx).await
    }

    /// Submit an already signed transaction and classify the response.
    pub async fn broadcast(&self, tx: &TxRaw) -> Result<BroadcastOutcome, SigningError> {
        let response = self
            .transport
            .submit(tx.encode_to_vec())
            .await
            .map_err(SigningError::Transport)?;
        Ok(classify(&response))
    }

    async fn sign_unlocked(
        &self,
        address: &str,
        messages: Vec<EncodeObject>,
        fee: Fee,
        memo: &str,
        mode: Option<TxSignMode>,
    ) -> Result<TxRaw, SigningError> {
        // Resolve the signing account from the signer
        let account = self
            .signer
            .accounts()
            .into_iter()
            .find(|a| a.address == address)
            .ok_or_else(|| SigningError::MissingPublicKey(address.to_string()))?;

        // Capability probe decides the mode unless the caller pinned it
        let mode = match mode {
            Some(TxSignMode::Direct) if !self.signer.supports_direct() => {
                return Err(SigningError::SignerCapabilityMismatch("direct"));
            }
            Some(mode) => mode,
            None if self.signer.supports_direct() => TxSignMode::Direct,
            None => TxSignMode::AminoJson,
        };

        // Every message must have a legacy name before any network call
        if mode == TxSignMode::AminoJson {
            for msg in &messages {
                amino::legacy_name(&msg.type_url)?;
            }
        }

        // Sequence is fetched fresh for every signing attempt
        let chain_account = self
            .transport
            .query_account(address)
            .await
            .map_err(SigningError::Transport)?
            .ok_or_else(|| SigningError::AccountNotFound(address.to_string()))?;
        let chain_id = self
            .transport
            .chain_id()
            .await
            .map_err(SigningError::Transport)?;

        log::debug!(
            "signing for {} (account_number={}, sequence={}, mode={:?})",
            address,
            chain_account.account_number,
            chain_account.sequence,
            mode
        );

        let pubkey = encode_pubkey(&account.pubkey);

        match mode {
            TxSignMode::Direct => {
                let body = TxBodyValue {
                    messages,
                    memo: memo.to_string(),
                };
                let body_bytes = self.registry.encode_tx_body(&body)?;
                let auth_info_bytes =
                    make_auth_info_bytes(pubkey, &fee, chain_account.sequence, SignMode::Direct);
                let sign_doc = make_sign_doc(
                    body_bytes,
                    auth_info_bytes,
                    &chain_id,
                    chain_account.account_number,
                );

                let response = self
                    .signer
                    .sign_direct(address, sign_doc)
                    .await
                    .map_err(SigningError::Signer)?;

                // The echoed document holds the bytes the signature covers
                Ok(TxRaw {
                    body_bytes: response.signed.body_bytes,
                    auth_info_bytes: response.signed.auth_info_bytes,
                    signatures: vec![response.signature],
                })
            }
            TxSignMode::AminoJson => {
                let sign_doc = amino::make_std_sign_doc(
                    &messages,
                    &fee,
                    &chain_id,
                    memo,
                    chain_account.account_number,
                    chain_account.sequence,
                )?;

                let response = self
                    .signer
                    .sign_amino(address, sign_doc)
                    .await
                    .map_err(SigningError::Signer)?;
                let signed = response.signed;

                // Re-derive the wire bytes from the echoed document, not
                // from the pre-signing draft: the signer may have
                // normalized it, and the broadcast bytes must be exactly
                // the bytes that were signed.
                let signed_messages = signed
                    .msgs
                    .iter()
                    .map(amino::to_encode_object)
                    .collect::<Result<Vec<_>, _>>()?;
                let body = TxBodyValue {
                    messages: signed_messages,
                    memo: signed.memo.clone(),
                };
                let body_bytes = self.registry.encode_tx_body(&body)?;

                let signed_fee = signed.fee.to_fee()?;
                let signed_sequence = signed.sequence.parse::<u64>().map_err(|_| {
                    SigningError::InvalidSignedDoc(format!(
                        "bad sequence value {:?}",
                        signed.sequence
                    ))
                })?;
                let auth_info_bytes = make_auth_info_bytes(
                    pubkey,
                    &signed_fee,
                    signed_sequence,
                    SignMode::LegacyAminoJson,
                );

                Ok(TxRaw {
                    body_bytes,
                    auth_info_bytes,
                    signatures: vec![response.signature],
                })
            }
        }
    }

    async fn account_lock(&self, address: &str) -> Arc<Mutex<()>> {
        let mut locks = self.account_locks.lock().await;
        locks
            .entry(address.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
