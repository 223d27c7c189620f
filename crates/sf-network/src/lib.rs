//! Supported networks and their USDC deployments.
//!
//! The onboarding flow runs on exactly two chains, Base mainnet and Base
//! Sepolia. Anything else resolves to mainnet.

use serde::{Deserialize, Serialize};
use sf_api_types::{ChainId, WalletAddress};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const BASE_CHAIN_ID: u64 = 8453;
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84532;

pub const BASE_USDC_ADDRESS: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";
pub const BASE_SEPOLIA_USDC_ADDRESS: &str = "0x036CbD53842c5426634e7929541eC2318f3dCF7e";

pub const USDC_DECIMALS: u8 = 6;
pub const NATIVE_DECIMALS: u8 = 18;
pub const NATIVE_SYMBOL: &str = "ETH";
pub const USDC_SYMBOL: &str = "USDC";

pub const USDC_FAUCET_URL: &str = "https://faucet.circle.com/";

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    /// Base mainnet (chain ID 8453).
    #[serde(rename = "base")]
    Base,
    /// Base Sepolia testnet (chain ID 84532).
    #[serde(rename = "base-sepolia")]
    BaseSepolia,
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Base => write!(f, "base"),
            Network::BaseSepolia => write!(f, "base-sepolia"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported network: {0}")]
pub struct UnsupportedNetwork(pub String);

impl FromStr for Network {
    type Err = UnsupportedNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "base" => Ok(Network::Base),
            "base-sepolia" => Ok(Network::BaseSepolia),
            other => Err(UnsupportedNetwork(other.to_owned())),
        }
    }
}

impl Network {
    pub fn variants() -> &'static [Network] {
        &[Network::Base, Network::BaseSepolia]
    }

    pub fn from_chain_id(chain_id: ChainId) -> Option<Network> {
        match chain_id.0 {
            BASE_CHAIN_ID => Some(Network::Base),
            BASE_SEPOLIA_CHAIN_ID => Some(Network::BaseSepolia),
            _ => None,
        }
    }

    pub fn chain_id(&self) -> ChainId {
        match self {
            Network::Base => ChainId(BASE_CHAIN_ID),
            Network::BaseSepolia => ChainId(BASE_SEPOLIA_CHAIN_ID),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Base => "Base",
            Network::BaseSepolia => "Base Sepolia",
        }
    }

    pub fn usdc_address(&self) -> &'static str {
        match self {
            Network::Base => BASE_USDC_ADDRESS,
            Network::BaseSepolia => BASE_SEPOLIA_USDC_ADDRESS,
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Base => "https://mainnet.base.org",
            Network::BaseSepolia => "https://sepolia.base.org",
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Network::BaseSepolia)
    }

    /// The network the chain switcher moves to from this one.
    pub fn toggled(&self) -> Network {
        match self {
            Network::Base => Network::BaseSepolia,
            Network::BaseSepolia => Network::Base,
        }
    }

    pub fn context(&self) -> NetworkContext {
        NetworkContext {
            network: *self,
            chain_id: self.chain_id(),
            display_name: self.display_name(),
            usdc_contract_address: self.usdc_address(),
            default_rpc_url: self.default_rpc_url(),
        }
    }
}

/// Everything the UI and the action handlers need to know about the active chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkContext {
    pub network: Network,
    pub chain_id: ChainId,
    pub display_name: &'static str,
    pub usdc_contract_address: &'static str,
    pub default_rpc_url: &'static str,
}

impl NetworkContext {
    pub fn usdc_contract(&self) -> WalletAddress {
        WalletAddress(self.usdc_contract_address.to_owned())
    }

    pub fn faucet_url(&self) -> Option<&'static str> {
        self.network.is_testnet().then_some(USDC_FAUCET_URL)
    }
}

impl Default for NetworkContext {
    fn default() -> Self {
        Network::Base.context()
    }
}

/// Resolve a raw chain identifier (`"84532"`, `"eip155:84532"`, or absent).
///
/// Absent, malformed, and unsupported ids all resolve to Base mainnet.
pub fn resolve_network(chain_id: Option<&str>) -> NetworkContext {
    chain_id
        .and_then(ChainId::parse)
        .map(resolve_chain_id)
        .unwrap_or_default()
}

pub fn resolve_chain_id(chain_id: ChainId) -> NetworkContext {
    Network::from_chain_id(chain_id)
        .map(|network| network.context())
        .unwrap_or_default()
}
