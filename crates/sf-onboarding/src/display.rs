//! Text rendered next to a wallet: its balances and the deposit instructions.

use anyhow::{Context, Result};
use qrcode::QrCode;
use qrcode::render::svg;
use sf_api_types::{WalletAddress, WalletBalances, WalletHandle, WalletKind};
use sf_chain_client::units::{format_fixed, format_units};
use sf_network::{NATIVE_DECIMALS, NATIVE_SYMBOL, NetworkContext, USDC_DECIMALS, USDC_SYMBOL};

/// Embedded wallets show exact amounts; smart wallets round to two places.
pub fn balance_line(kind: WalletKind, balances: &WalletBalances) -> String {
    let render = |value: u128, decimals: u8| match kind {
        WalletKind::Embedded => format_units(value, decimals),
        WalletKind::SmartWallet => format_fixed(value, decimals, 2),
    };

    let mut parts = Vec::with_capacity(2);
    if let Some(wei) = balances.native_wei {
        parts.push(format!("{} {NATIVE_SYMBOL}", render(wei, NATIVE_DECIMALS)));
    }
    if let Some(usdc) = balances.usdc {
        parts.push(format!("{} {USDC_SYMBOL}", render(usdc, USDC_DECIMALS)));
    }

    if parts.is_empty() {
        "Balance:".to_owned()
    } else {
        format!("Balance: {}", parts.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositInstructions {
    pub address: WalletAddress,
    pub network_name: &'static str,
    pub step_title: String,
    pub step_detail: String,
    pub faucet_url: Option<&'static str>,
}

pub fn deposit_instructions(wallet: &WalletHandle, network: &NetworkContext) -> DepositInstructions {
    DepositInstructions {
        address: wallet.address.clone(),
        network_name: network.display_name,
        step_title: format!("Fund {USDC_SYMBOL} on {}", network.display_name),
        step_detail: format!("You need to bridge to {} to use Superfan One", network.display_name),
        faucet_url: network.faucet_url(),
    }
}

/// Edge length in pixels of the deposit address QR code.
pub const DEPOSIT_QR_SIZE: u32 = 200;

/// SVG markup of a QR code encoding the deposit address.
pub fn deposit_qr_svg(address: &WalletAddress) -> Result<String> {
    let code = QrCode::new(address.as_str().as_bytes())
        .with_context(|| format!("encode deposit address {address} as QR code"))?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(DEPOSIT_QR_SIZE, DEPOSIT_QR_SIZE)
        .build())
}
