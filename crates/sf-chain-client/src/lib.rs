use anyhow::Result;
use async_trait::async_trait;
use sf_api_types::{ChainId, TxHash, TxReceipt, WalletAddress, WalletBalances};
use sf_network::NetworkContext;
use tracing::warn;

pub mod erc20;
pub mod units;

/// Read side of the chain: balances and receipts.
///
/// Futures are not `Send`; the onboarding flow runs on a single-threaded
/// executor (the browser event loop or a current-thread tokio runtime).
#[async_trait(?Send)]
pub trait ChainReader {
    async fn native_balance(&self, address: &WalletAddress, chain: ChainId) -> Result<u128>;

    async fn token_balance(
        &self,
        token: &WalletAddress,
        owner: &WalletAddress,
        chain: ChainId,
    ) -> Result<u128>;

    /// Resolves once the transaction is included in a block.
    async fn wait_for_receipt(&self, tx_hash: &TxHash, chain: ChainId) -> Result<TxReceipt>;
}

/// Read the native and USDC balances of `owner` on the given network.
///
/// The two reads are independent. A failed read leaves its field `None`,
/// which callers treat as "not ready" rather than as an error.
pub async fn read_wallet_balances<R>(
    reader: &R,
    network: &NetworkContext,
    owner: &WalletAddress,
) -> WalletBalances
where
    R: ChainReader + ?Sized,
{
    let native_wei = match reader.native_balance(owner, network.chain_id).await {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(wallet = %owner, chain = %network.chain_id, "native balance read failed: {err:#}");
            None
        }
    };

    let usdc = match reader
        .token_balance(&network.usdc_contract(), owner, network.chain_id)
        .await
    {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(wallet = %owner, chain = %network.chain_id, "USDC balance read failed: {err:#}");
            None
        }
    };

    WalletBalances { native_wei, usdc }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use sf_network::{BASE_SEPOLIA_USDC_ADDRESS, Network};
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeReader {
        native: Option<u128>,
        token: Option<u128>,
        token_calls: RefCell<Vec<(String, ChainId)>>,
    }

    #[async_trait(?Send)]
    impl ChainReader for FakeReader {
        async fn native_balance(&self, _address: &WalletAddress, _chain: ChainId) -> Result<u128> {
            self.native.ok_or_else(|| anyhow!("rpc unavailable"))
        }

        async fn token_balance(
            &self,
            token: &WalletAddress,
            _owner: &WalletAddress,
            chain: ChainId,
        ) -> Result<u128> {
            self.token_calls.borrow_mut().push((token.0.clone(), chain));
            self.token.ok_or_else(|| anyhow!("rpc unavailable"))
        }

        async fn wait_for_receipt(&self, _tx_hash: &TxHash, _chain: ChainId) -> Result<TxReceipt> {
            Err(anyhow!("not used"))
        }
    }

    #[tokio::test]
    async fn reads_usdc_from_the_active_network_contract() {
        let reader = FakeReader {
            native: Some(1_000),
            token: Some(5_000_000),
            ..Default::default()
        };
        let network = Network::BaseSepolia.context();
        let owner = WalletAddress("0x0000000000000000000000000000000000000001".to_owned());

        let balances = read_wallet_balances(&reader, &network, &owner).await;

        assert_eq!(balances.native_wei, Some(1_000));
        assert_eq!(balances.usdc, Some(5_000_000));
        let calls = reader.token_calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, BASE_SEPOLIA_USDC_ADDRESS);
        assert_eq!(calls[0].1, network.chain_id);
    }

    #[tokio::test]
    async fn failed_reads_leave_fields_unknown() {
        let reader = FakeReader {
            native: Some(7),
            token: None,
            ..Default::default()
        };
        let owner = WalletAddress("0x0000000000000000000000000000000000000001".to_owned());

        let balances = read_wallet_balances(&reader, &Network::Base.context(), &owner).await;

        assert_eq!(balances.native_wei, Some(7));
        assert_eq!(balances.usdc, None);
    }
}
