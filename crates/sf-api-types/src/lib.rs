use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric EVM chain identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Parses either a bare decimal id (`"84532"`) or a CAIP-2 id (`"eip155:84532"`).
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix("eip155:").unwrap_or(trimmed);
        digits.parse::<u64>().ok().map(ChainId)
    }

    pub fn caip2(&self) -> String {
        format!("eip155:{}", self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssetSymbol(pub String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WalletKind {
    Embedded,
    SmartWallet,
}

impl WalletKind {
    /// Tag the auth provider uses for this kind in its account list.
    pub fn tag(&self) -> &'static str {
        match self {
            WalletKind::Embedded => "embedded",
            WalletKind::SmartWallet => "smart_wallet",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WalletKind::Embedded => "Embedded Wallet",
            WalletKind::SmartWallet => "Smart Wallet",
        }
    }
}

/// An account entry as reported by the auth provider.
///
/// `kind` is kept as the raw provider tag: the list also carries login
/// methods (`"email"`, `"google_oauth"`, ...) that have no [`WalletKind`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectedAccount {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, rename = "chainId")]
    pub chain_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletHandle {
    pub address: WalletAddress,
    pub kind: WalletKind,
    pub chain_id: Option<ChainId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    #[serde(default, rename = "linkedAccounts")]
    pub linked_accounts: Vec<ConnectedAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TransferRequest {
    pub amount_decimal: String,
    pub recipient_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendTransactionRequest {
    pub to: WalletAddress,
    /// Native value in wei, serialized as a decimal string.
    #[serde(with = "u128_string")]
    pub value: u128,
    /// ABI-encoded call data, `0x`-prefixed hex.
    pub data: String,
    #[serde(rename = "chainId")]
    pub chain_id: ChainId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub succeeded: bool,
}

/// Latest balance read for one wallet, in base units. `None` means unknown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WalletBalances {
    pub native_wei: Option<u128>,
    pub usdc: Option<u128>,
}

mod u128_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u128>().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_accepts_bare_and_caip2() {
        assert_eq!(ChainId::parse("84532"), Some(ChainId(84532)));
        assert_eq!(ChainId::parse("eip155:8453"), Some(ChainId(8453)));
        assert_eq!(ChainId::parse(" eip155:8453 "), Some(ChainId(8453)));
        assert_eq!(ChainId::parse("solana:mainnet"), None);
        assert_eq!(ChainId::parse(""), None);
        assert_eq!(ChainId(84532).caip2(), "eip155:84532");
    }

    #[test]
    fn connected_account_uses_provider_field_names() {
        let raw = r#"{"type":"smart_wallet","address":"0xabc","chainId":"eip155:8453"}"#;
        let account: ConnectedAccount = serde_json::from_str(raw).unwrap();
        assert_eq!(account.kind, "smart_wallet");
        assert_eq!(account.address, "0xabc");
        assert_eq!(account.chain_id.as_deref(), Some("eip155:8453"));

        let email: ConnectedAccount = serde_json::from_str(r#"{"type":"email"}"#).unwrap();
        assert!(email.address.is_empty());
    }

    #[test]
    fn send_request_value_is_a_decimal_string() {
        let req = SendTransactionRequest {
            to: WalletAddress("0x036CbD53842c5426634e7929541eC2318f3dCF7e".to_owned()),
            value: 0,
            data: "0x".to_owned(),
            chain_id: ChainId(84532),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["value"], "0");
        assert_eq!(json["chainId"], 84532);
    }
}
