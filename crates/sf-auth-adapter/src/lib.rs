use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use sf_api_types::{
    ChainId, ConnectedAccount, SendTransactionRequest, SessionUser, TxHash, WalletHandle, WalletKind,
    WalletAddress,
};
use sf_network::Network;
use tracing::{info, warn};

/// Capabilities consumed from the wallet-auth provider.
///
/// The provider owns key custody, signing and chain switching; this side
/// only reads its state and asks it to act on a [`WalletHandle`].
#[async_trait(?Send)]
pub trait AuthProvider {
    fn is_ready(&self) -> bool;
    fn is_authenticated(&self) -> bool;
    fn user(&self) -> Option<SessionUser>;

    /// Wallets connected for the current user. Populates asynchronously
    /// after login, so an empty list is a normal transient state.
    fn connected_wallets(&self) -> Vec<ConnectedAccount>;

    async fn login(&self) -> Result<()>;
    async fn logout(&self) -> Result<()>;

    async fn sign_message(&self, wallet: &WalletHandle, message: &str) -> Result<String>;
    async fn send_transaction(
        &self,
        wallet: &WalletHandle,
        request: SendTransactionRequest,
    ) -> Result<TxHash>;

    async fn chain_id(&self, wallet: &WalletHandle) -> Result<ChainId>;
    async fn switch_chain(&self, wallet: &WalletHandle, chain: ChainId) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub app_id: String,
    /// Chain new embedded wallets start on.
    pub default_network: Network,
}

impl AuthConfig {
    pub fn new(app_id: &str) -> Result<Self> {
        let app_id = app_id.trim();
        if app_id.is_empty() {
            bail!("auth app id cannot be empty");
        }
        Ok(Self {
            app_id: app_id.to_owned(),
            default_network: Network::BaseSepolia,
        })
    }

    /// Reads `SUPERFAN_AUTH_APP_ID` (required) and `SUPERFAN_DEFAULT_NETWORK`
    /// from the environment, falling back to the build environment.
    pub fn from_env() -> Result<Self> {
        let app_id = std::env::var("SUPERFAN_AUTH_APP_ID")
            .ok()
            .or_else(|| option_env!("SUPERFAN_AUTH_APP_ID").map(str::to_owned))
            .ok_or_else(|| anyhow!("SUPERFAN_AUTH_APP_ID is required"))?;
        let mut config = Self::new(&app_id)?;

        let network = std::env::var("SUPERFAN_DEFAULT_NETWORK")
            .ok()
            .or_else(|| option_env!("SUPERFAN_DEFAULT_NETWORK").map(str::to_owned));
        if let Some(raw) = network {
            match raw.parse::<Network>() {
                Ok(network) => config.default_network = network,
                Err(err) => warn!("{err}; keeping {}", config.default_network),
            }
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Provider still initialising; neither login nor logout is offered.
    Loading,
    SignedOut,
    SignedIn,
}

/// First account whose provider tag equals `kind`'s tag, in list order.
pub fn find_account(accounts: &[ConnectedAccount], kind: WalletKind) -> Option<&ConnectedAccount> {
    accounts.iter().find(|account| account.kind == kind.tag())
}

pub fn resolve_wallet(accounts: &[ConnectedAccount], kind: WalletKind) -> Option<WalletHandle> {
    find_account(accounts, kind).map(|account| WalletHandle {
        address: WalletAddress(account.address.clone()),
        kind,
        chain_id: account.chain_id.as_deref().and_then(ChainId::parse),
    })
}

/// Explicitly passed provider context: created on mount, torn down on logout.
pub struct SessionContext<P> {
    provider: P,
    config: AuthConfig,
}

impl<P> SessionContext<P>
where
    P: AuthProvider,
{
    pub fn new(provider: P, config: AuthConfig) -> Self {
        info!(app_id = %config.app_id, default_network = %config.default_network, "auth session created");
        Self { provider, config }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        if !self.provider.is_ready() {
            SessionStatus::Loading
        } else if self.provider.is_authenticated() {
            SessionStatus::SignedIn
        } else {
            SessionStatus::SignedOut
        }
    }

    pub async fn login(&self) -> Result<()> {
        match self.status() {
            SessionStatus::Loading => bail!("auth provider is not ready"),
            SessionStatus::SignedIn => Ok(()),
            SessionStatus::SignedOut => {
                self.provider.login().await?;
                info!("user logged in");
                Ok(())
            }
        }
    }

    pub async fn logout(&self) -> Result<()> {
        if self.status() != SessionStatus::SignedIn {
            return Ok(());
        }
        self.provider.logout().await?;
        info!("user logged out");
        Ok(())
    }

    /// Connected wallets followed by the user's linked accounts.
    pub fn accounts(&self) -> Vec<ConnectedAccount> {
        let mut accounts = self.provider.connected_wallets();
        if let Some(user) = self.provider.user() {
            accounts.extend(user.linked_accounts);
        }
        accounts
    }

    pub fn wallet(&self, kind: WalletKind) -> Option<WalletHandle> {
        if self.status() != SessionStatus::SignedIn {
            return None;
        }
        resolve_wallet(&self.accounts(), kind)
    }
}
