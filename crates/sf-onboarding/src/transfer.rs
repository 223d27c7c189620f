use sf_api_types::{SendTransactionRequest, TransferRequest, TxHash, TxReceipt, WalletHandle};
use sf_auth_adapter::AuthProvider;
use sf_chain_client::{ChainReader, erc20, units};
use sf_network::{NetworkContext, USDC_DECIMALS};
use tracing::{error, info};

pub const INSUFFICIENT_BALANCE_NOTICE: &str = "Insufficient USDC balance";
pub const TRANSFER_FAILED_MESSAGE: &str = "Transaction failed. Please try again.";

/// Why the send control is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferBlock {
    Busy,
    WalletNotReady,
    MissingAmount,
    MissingRecipient,
    BalanceUnknown,
    InvalidAmount,
    InsufficientBalance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferAvailability {
    pub blocked_by: Option<TransferBlock>,
    /// Inline message shown under the control.
    pub notice: Option<&'static str>,
}

impl TransferAvailability {
    pub fn enabled(&self) -> bool {
        self.blocked_by.is_none()
    }

    pub fn blocked(block: TransferBlock) -> Self {
        Self {
            blocked_by: Some(block),
            notice: None,
        }
    }
}

/// Client-side preconditions for a USDC transfer. Nothing here is enforced on chain.
pub fn evaluate_transfer(
    request: &TransferRequest,
    usdc_balance: Option<u128>,
    busy: bool,
) -> TransferAvailability {
    if busy {
        return TransferAvailability::blocked(TransferBlock::Busy);
    }
    if request.amount_decimal.trim().is_empty() {
        return TransferAvailability::blocked(TransferBlock::MissingAmount);
    }
    if request.recipient_address.trim().is_empty() {
        return TransferAvailability::blocked(TransferBlock::MissingRecipient);
    }
    let Some(balance) = usdc_balance else {
        return TransferAvailability::blocked(TransferBlock::BalanceUnknown);
    };
    let Ok(amount) = units::parse_units(&request.amount_decimal, USDC_DECIMALS) else {
        return TransferAvailability::blocked(TransferBlock::InvalidAmount);
    };

    if balance < amount {
        return TransferAvailability {
            blocked_by: Some(TransferBlock::InsufficientBalance),
            notice: (amount > 0).then_some(INSUFFICIENT_BALANCE_NOTICE),
        };
    }

    TransferAvailability {
        blocked_by: None,
        notice: None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("transfer unavailable: {0:?}")]
    Unavailable(TransferBlock),
    #[error("invalid amount: {0:#}")]
    InvalidAmount(anyhow::Error),
    #[error("invalid recipient: {0:#}")]
    InvalidRecipient(anyhow::Error),
    #[error("submission failed: {0:#}")]
    Submission(anyhow::Error),
    #[error("confirmation of {tx_hash} failed: {reason:#}")]
    Confirmation { tx_hash: TxHash, reason: anyhow::Error },
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
}

impl TransferError {
    /// Every failure is shown to the user the same way.
    pub fn user_message(&self) -> &'static str {
        TRANSFER_FAILED_MESSAGE
    }
}

/// Encode `transfer(recipient, amount)` against the network's USDC contract,
/// submit it through the provider and wait for the receipt. Fire-once: no retry.
pub async fn execute_transfer<P, C>(
    provider: &P,
    chain: &C,
    wallet: &WalletHandle,
    network: &NetworkContext,
    request: &TransferRequest,
) -> Result<TxReceipt, TransferError>
where
    P: AuthProvider + ?Sized,
    C: ChainReader + ?Sized,
{
    let result = submit_and_confirm(provider, chain, wallet, network, request).await;
    if let Err(err) = &result {
        error!(
            wallet = %wallet.address,
            chain = %network.chain_id,
            "Transaction failed: {err}"
        );
    }
    result
}

async fn submit_and_confirm<P, C>(
    provider: &P,
    chain: &C,
    wallet: &WalletHandle,
    network: &NetworkContext,
    request: &TransferRequest,
) -> Result<TxReceipt, TransferError>
where
    P: AuthProvider + ?Sized,
    C: ChainReader + ?Sized,
{
    let amount = units::parse_units(&request.amount_decimal, USDC_DECIMALS)
        .map_err(TransferError::InvalidAmount)?;
    let data = erc20::encode_transfer(&request.recipient_address, amount)
        .map_err(TransferError::InvalidRecipient)?;

    let tx = SendTransactionRequest {
        to: network.usdc_contract(),
        value: 0,
        data,
        chain_id: network.chain_id,
    };

    let tx_hash = provider
        .send_transaction(wallet, tx)
        .await
        .map_err(TransferError::Submission)?;
    info!(tx_hash = %tx_hash, wallet = %wallet.address, amount, "USDC transfer submitted");

    let receipt = chain
        .wait_for_receipt(&tx_hash, network.chain_id)
        .await
        .map_err(|reason| TransferError::Confirmation {
            tx_hash: tx_hash.clone(),
            reason,
        })?;

    if !receipt.succeeded {
        return Err(TransferError::Reverted(receipt.tx_hash));
    }

    info!(tx_hash = %receipt.tx_hash, block = receipt.block_number, "USDC transfer confirmed");
    Ok(receipt)
}
