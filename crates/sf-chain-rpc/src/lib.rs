use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sf_api_types::{ChainId, TxHash, TxReceipt, WalletAddress};
use sf_chain_client::{ChainReader, erc20};
use sf_network::{Network, resolve_chain_id};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// RPC endpoint per supported network.
///
/// Reads `SUPERFAN_BASE_RPC_URL` and `SUPERFAN_BASE_SEPOLIA_RPC_URL` from the
/// environment, then from the build environment (wasm builds have no runtime
/// env), then falls back to the public Base endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcEndpoints {
    pub base: String,
    pub base_sepolia: String,
}

impl Default for RpcEndpoints {
    fn default() -> Self {
        Self {
            base: Network::Base.default_rpc_url().to_owned(),
            base_sepolia: Network::BaseSepolia.default_rpc_url().to_owned(),
        }
    }
}

impl RpcEndpoints {
    pub fn from_env() -> Self {
        let base = std::env::var("SUPERFAN_BASE_RPC_URL")
            .ok()
            .or_else(|| option_env!("SUPERFAN_BASE_RPC_URL").map(str::to_owned))
            .unwrap_or_else(|| Network::Base.default_rpc_url().to_owned());
        let base_sepolia = std::env::var("SUPERFAN_BASE_SEPOLIA_RPC_URL")
            .ok()
            .or_else(|| option_env!("SUPERFAN_BASE_SEPOLIA_RPC_URL").map(str::to_owned))
            .unwrap_or_else(|| Network::BaseSepolia.default_rpc_url().to_owned());
        Self {
            base: base.trim_end_matches('/').to_owned(),
            base_sepolia: base_sepolia.trim_end_matches('/').to_owned(),
        }
    }

    /// Unsupported chains use the mainnet endpoint, matching network resolution.
    pub fn url_for(&self, chain: ChainId) -> &str {
        match resolve_chain_id(chain).network {
            Network::Base => &self.base,
            Network::BaseSepolia => &self.base_sepolia,
        }
    }
}

/// JSON-RPC 2.0 client over HTTP for the Base networks.
pub struct JsonRpcChainClient {
    endpoints: RpcEndpoints,
    http: reqwest::Client,
    poll_interval: Duration,
    next_id: AtomicU64,
}

impl Default for JsonRpcChainClient {
    fn default() -> Self {
        Self::new(None)
    }
}

impl JsonRpcChainClient {
    pub fn new(endpoints: Option<RpcEndpoints>) -> Self {
        Self {
            endpoints: endpoints.unwrap_or_else(RpcEndpoints::from_env),
            http: reqwest::Client::new(),
            poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn endpoints(&self) -> &RpcEndpoints {
        &self.endpoints
    }

    /// Issue one call. A JSON `null` result is returned as `Value::Null`.
    async fn call(&self, chain: ChainId, method: &str, params: Value) -> Result<Value> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .http
            .post(self.endpoints.url_for(chain))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("{method} transport"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("{method} HTTP {status}: {text}");
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .with_context(|| format!("{method} parse"))?;

        if let Some(err) = envelope.error {
            bail!("{method} rpc error {}: {}", err.code, err.message);
        }

        Ok(envelope.result.unwrap_or(Value::Null))
    }
}

// ── JSON-RPC envelope types ─────────────────────────────────────────

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcReceipt {
    #[serde(rename = "transactionHash")]
    transaction_hash: String,
    #[serde(rename = "blockNumber")]
    block_number: Option<String>,
    status: Option<String>,
}

#[async_trait(?Send)]
impl ChainReader for JsonRpcChainClient {
    async fn native_balance(&self, address: &WalletAddress, chain: ChainId) -> Result<u128> {
        let value = self
            .call(chain, "eth_getBalance", json!([address.0, "latest"]))
            .await?;
        let raw = value
            .as_str()
            .ok_or_else(|| anyhow!("eth_getBalance returned non-string result"))?;
        parse_quantity(raw)
    }

    async fn token_balance(
        &self,
        token: &WalletAddress,
        owner: &WalletAddress,
        chain: ChainId,
    ) -> Result<u128> {
        let data = erc20::encode_balance_of(&owner.0)?;
        let value = self
            .call(
                chain,
                "eth_call",
                json!([{ "to": token.0, "data": data }, "latest"]),
            )
            .await?;
        let raw = value
            .as_str()
            .ok_or_else(|| anyhow!("eth_call returned non-string result"))?;
        erc20::decode_uint256(raw).context("balanceOf decode")
    }

    async fn wait_for_receipt(&self, tx_hash: &TxHash, chain: ChainId) -> Result<TxReceipt> {
        let mut polls: u64 = 0;
        loop {
            let value = self
                .call(chain, "eth_getTransactionReceipt", json!([tx_hash.0]))
                .await?;

            if !value.is_null() {
                let receipt: RpcReceipt =
                    serde_json::from_value(value).context("eth_getTransactionReceipt parse")?;
                let block_number = receipt
                    .block_number
                    .as_deref()
                    .map(parse_quantity)
                    .transpose()?
                    .unwrap_or_default();
                let block_number =
                    u64::try_from(block_number).context("block number out of range")?;
                let succeeded = receipt.status.as_deref().map_or(true, |s| s == "0x1");
                info!(tx_hash = %tx_hash, block_number, succeeded, polls, "transaction receipt received");
                return Ok(TxReceipt {
                    tx_hash: TxHash(receipt.transaction_hash),
                    block_number,
                    succeeded,
                });
            }

            polls += 1;
            debug!(tx_hash = %tx_hash, polls, "receipt pending");
            sleep(self.poll_interval).await;
        }
    }
}

/// Parse a JSON-RPC hex quantity (`"0x1bc16d674ec80000"`).
pub fn parse_quantity(raw: &str) -> Result<u128> {
    let digits = raw
        .trim()
        .strip_prefix("0x")
        .ok_or_else(|| anyhow!("quantity must start with 0x: {raw}"))?;
    if digits.is_empty() {
        bail!("empty quantity");
    }
    u128::from_str_radix(digits, 16).map_err(|err| anyhow!("invalid quantity {raw}: {err}"))
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(target_arch = "wasm32")]
async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}
