use anyhow::{Result, anyhow};
use sf_api_types::{ChainId, TransferRequest, TxReceipt, WalletBalances, WalletHandle, WalletKind};
use sf_auth_adapter::{AuthProvider, SessionContext, SessionStatus};
use sf_chain_client::{ChainReader, read_wallet_balances};
use sf_network::{NetworkContext, resolve_chain_id};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

use crate::config::OnboardingConfig;
use crate::gate::OnboardingState;
use crate::sign::{SignError, SignedMessage};
use crate::transfer::{
    TransferAvailability, TransferBlock, TransferError, evaluate_transfer, execute_transfer,
};

#[derive(Debug, Default)]
struct LocalState {
    has_signed_message: bool,
    signed: Option<SignedMessage>,
    balances: HashMap<WalletKind, WalletBalances>,
    chains: HashMap<WalletKind, ChainId>,
    switches: HashMap<WalletKind, u64>,
}

/// Point at which an async read started. Its result is stored only while
/// neither a logout nor a network switch for the wallet happened since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReadStamp {
    epoch: u64,
    switches: u64,
}

/// Clears its flag on drop so a failed or panicking call never leaves a control disabled.
struct BusyGuard<'a>(&'a Cell<bool>);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Local onboarding state layered over the auth session and the chain reader.
///
/// All methods take `&self`: the UI shares one session between event
/// handlers on a single thread. Results of calls that were in flight across
/// a logout are dropped via the `epoch` counter, and chain reads that
/// overlapped a network switch are dropped via the per-wallet switch count.
pub struct OnboardingSession<P, C> {
    auth: SessionContext<P>,
    chain: C,
    config: OnboardingConfig,
    state: RefCell<LocalState>,
    signing: Cell<bool>,
    sending: Cell<bool>,
    epoch: Cell<u64>,
}

impl<P, C> OnboardingSession<P, C>
where
    P: AuthProvider,
    C: ChainReader,
{
    pub fn new(auth: SessionContext<P>, chain: C, config: OnboardingConfig) -> Self {
        Self {
            auth,
            chain,
            config,
            state: RefCell::new(LocalState::default()),
            signing: Cell::new(false),
            sending: Cell::new(false),
            epoch: Cell::new(0),
        }
    }

    pub fn auth(&self) -> &SessionContext<P> {
        &self.auth
    }

    pub fn chain_reader(&self) -> &C {
        &self.chain
    }

    pub fn config(&self) -> &OnboardingConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.auth.status()
    }

    pub async fn login(&self) -> Result<()> {
        self.auth.login().await
    }

    pub async fn logout(&self) -> Result<()> {
        self.auth.logout().await?;
        self.reset();
        Ok(())
    }

    /// Drop all local state. In-flight results from before the reset are discarded.
    /// Busy flags stay owned by their in-flight calls.
    pub fn reset(&self) {
        self.epoch.set(self.epoch.get() + 1);
        *self.state.borrow_mut() = LocalState::default();
        debug!(epoch = self.epoch.get(), "onboarding state reset");
    }

    pub fn wallet(&self, kind: WalletKind) -> Option<WalletHandle> {
        self.auth.wallet(kind)
    }

    fn require_wallet(&self, kind: WalletKind) -> Result<WalletHandle> {
        self.wallet(kind)
            .ok_or_else(|| anyhow!("no {} found", kind.label().to_lowercase()))
    }

    /// Active network for a wallet: last known chain, else the chain the
    /// provider reported with the wallet, else mainnet.
    pub fn network(&self, kind: WalletKind) -> NetworkContext {
        let known = self.state.borrow().chains.get(&kind).copied();
        known
            .or_else(|| self.wallet(kind).and_then(|wallet| wallet.chain_id))
            .map(resolve_chain_id)
            .unwrap_or_default()
    }

    fn stamp(&self, kind: WalletKind) -> ReadStamp {
        ReadStamp {
            epoch: self.epoch.get(),
            switches: self.state.borrow().switches.get(&kind).copied().unwrap_or(0),
        }
    }

    fn is_current(&self, kind: WalletKind, stamp: ReadStamp) -> bool {
        self.stamp(kind) == stamp
    }

    pub async fn refresh_chain(&self, kind: WalletKind) -> Result<NetworkContext> {
        let wallet = self.require_wallet(kind)?;
        let stamp = self.stamp(kind);
        let chain = self.auth.provider().chain_id(&wallet).await?;
        if !self.is_current(kind, stamp) {
            debug!(wallet = %wallet.address, %chain, "discarding chain read that overlapped a switch");
            return Ok(self.network(kind));
        }
        self.state.borrow_mut().chains.insert(kind, chain);
        Ok(resolve_chain_id(chain))
    }

    /// Toggle between Base and Base Sepolia. Cached balances for the wallet
    /// are dropped since they belong to the previous chain.
    pub async fn switch_network(&self, kind: WalletKind) -> Result<NetworkContext> {
        let wallet = self.require_wallet(kind)?;
        let target = self.network(kind).network.toggled();
        info!(wallet = %wallet.address, target = %target, "switching chain");

        let epoch = self.epoch.get();
        self.auth
            .provider()
            .switch_chain(&wallet, target.chain_id())
            .await?;

        if self.epoch.get() == epoch {
            let mut state = self.state.borrow_mut();
            state.chains.insert(kind, target.chain_id());
            state.balances.remove(&kind);
            *state.switches.entry(kind).or_default() += 1;
        }
        info!(wallet = %wallet.address, chain = %target.chain_id(), "switched chain");
        Ok(target.context())
    }

    pub async fn refresh_balances(&self, kind: WalletKind) -> WalletBalances {
        let Some(wallet) = self.wallet(kind) else {
            return WalletBalances::default();
        };
        let network = self.network(kind);
        let stamp = self.stamp(kind);

        let balances = read_wallet_balances(&self.chain, &network, &wallet.address).await;

        if !self.is_current(kind, stamp) || self.network(kind).chain_id != network.chain_id {
            debug!(
                wallet = %wallet.address,
                chain = %network.chain_id,
                "discarding balance read for a stale session or network"
            );
            return self.balances(kind);
        }
        self.state.borrow_mut().balances.insert(kind, balances);
        balances
    }

    pub fn balances(&self, kind: WalletKind) -> WalletBalances {
        self.state
            .borrow()
            .balances
            .get(&kind)
            .copied()
            .unwrap_or_default()
    }

    pub fn onboarding_state(&self, kind: WalletKind) -> OnboardingState {
        let has_signed_message = self.state.borrow().has_signed_message;
        OnboardingState::from_reads(has_signed_message, self.balances(kind).usdc)
    }

    /// Navigation target, offered only once the gate is open.
    pub fn continue_url(&self, kind: WalletKind) -> Option<&str> {
        self.onboarding_state(kind)
            .can_continue()
            .then_some(self.config.continue_url.as_str())
    }

    pub fn is_signing(&self) -> bool {
        self.signing.get()
    }

    pub fn is_sending(&self) -> bool {
        self.sending.get()
    }

    pub fn signed_message(&self) -> Option<SignedMessage> {
        self.state.borrow().signed.clone()
    }

    pub fn toggle_signature_expanded(&self) {
        if let Some(signed) = self.state.borrow_mut().signed.as_mut() {
            signed.toggle_expanded();
        }
    }

    pub async fn sign_message(
        &self,
        kind: WalletKind,
        message: &str,
    ) -> Result<SignedMessage, SignError> {
        if message.trim().is_empty() {
            return Err(SignError::EmptyMessage);
        }
        let Some(_busy) = BusyGuard::acquire(&self.signing) else {
            return Err(SignError::Busy);
        };
        let wallet = self.wallet(kind).ok_or(SignError::WalletNotReady)?;
        let epoch = self.epoch.get();

        match self.auth.provider().sign_message(&wallet, message).await {
            Ok(signature) => {
                let signed = SignedMessage::new(message.to_owned(), signature);
                if self.epoch.get() == epoch {
                    let mut state = self.state.borrow_mut();
                    state.has_signed_message = true;
                    state.signed = Some(signed.clone());
                }
                info!(wallet = %wallet.address, "message signed");
                Ok(signed)
            }
            Err(err) => {
                error!(wallet = %wallet.address, "Signing failed: {err:#}");
                Err(SignError::Provider(err))
            }
        }
    }

    pub fn transfer_availability(
        &self,
        kind: WalletKind,
        request: &TransferRequest,
    ) -> TransferAvailability {
        if !self.sending.get() && self.wallet(kind).is_none() {
            return TransferAvailability::blocked(TransferBlock::WalletNotReady);
        }
        evaluate_transfer(request, self.balances(kind).usdc, self.sending.get())
    }

    /// Send USDC from the wallet of `kind`. Balances are re-read after a
    /// confirmed transfer.
    pub async fn send_usdc(
        &self,
        kind: WalletKind,
        request: &TransferRequest,
    ) -> Result<TxReceipt, TransferError> {
        let availability = self.transfer_availability(kind, request);
        if let Some(block) = availability.blocked_by {
            warn!(?block, "transfer attempted while unavailable");
            return Err(TransferError::Unavailable(block));
        }

        let receipt = {
            let Some(_busy) = BusyGuard::acquire(&self.sending) else {
                return Err(TransferError::Unavailable(TransferBlock::Busy));
            };
            let wallet = self
                .wallet(kind)
                .ok_or(TransferError::Unavailable(TransferBlock::WalletNotReady))?;
            let network = self.network(kind);
            execute_transfer(self.auth.provider(), &self.chain, &wallet, &network, request).await?
        };

        self.refresh_balances(kind).await;
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{GUIDANCE_FUND, GUIDANCE_SIGN};
    use crate::transfer::{INSUFFICIENT_BALANCE_NOTICE, TRANSFER_FAILED_MESSAGE};
    use async_trait::async_trait;
    use sf_api_types::{
        ConnectedAccount, SendTransactionRequest, SessionUser, TxHash, WalletAddress,
    };
    use sf_auth_adapter::AuthConfig;
    use sf_network::{BASE_SEPOLIA_USDC_ADDRESS, BASE_USDC_ADDRESS, Network};

    const EMBEDDED: &str = "0x00000000000000000000000000000000000000e1";
    const SMART: &str = "0x00000000000000000000000000000000000000b1";
    const RECIPIENT: &str = "0x1111111111111111111111111111111111111111";

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    struct FakeProvider {
        authenticated: Cell<bool>,
        chain: Cell<ChainId>,
        fail_sign: bool,
        fail_send: bool,
        chain_read_yields: u32,
        sent: RefCell<Vec<SendTransactionRequest>>,
        in_flight: Cell<u32>,
        max_in_flight: Cell<u32>,
    }

    impl Default for FakeProvider {
        fn default() -> Self {
            Self {
                authenticated: Cell::new(false),
                chain: Cell::new(Network::BaseSepolia.chain_id()),
                fail_sign: false,
                fail_send: false,
                chain_read_yields: 0,
                sent: RefCell::new(Vec::new()),
                in_flight: Cell::new(0),
                max_in_flight: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl AuthProvider for FakeProvider {
        fn is_ready(&self) -> bool {
            true
        }

        fn is_authenticated(&self) -> bool {
            self.authenticated.get()
        }

        fn user(&self) -> Option<SessionUser> {
            self.authenticated.get().then(|| SessionUser {
                id: "user-1".to_owned(),
                linked_accounts: vec![
                    ConnectedAccount {
                        kind: "email".to_owned(),
                        address: String::new(),
                        chain_id: None,
                    },
                    ConnectedAccount {
                        kind: "smart_wallet".to_owned(),
                        address: SMART.to_owned(),
                        chain_id: None,
                    },
                ],
            })
        }

        fn connected_wallets(&self) -> Vec<ConnectedAccount> {
            if !self.authenticated.get() {
                return Vec::new();
            }
            vec![ConnectedAccount {
                kind: "embedded".to_owned(),
                address: EMBEDDED.to_owned(),
                chain_id: Some(self.chain.get().caip2()),
            }]
        }

        async fn login(&self) -> Result<()> {
            self.authenticated.set(true);
            Ok(())
        }

        async fn logout(&self) -> Result<()> {
            self.authenticated.set(false);
            Ok(())
        }

        async fn sign_message(&self, _wallet: &WalletHandle, message: &str) -> Result<String> {
            if self.fail_sign {
                return Err(anyhow!("user rejected the request"));
            }
            Ok(format!("0xsigned:{message}"))
        }

        async fn send_transaction(
            &self,
            _wallet: &WalletHandle,
            request: SendTransactionRequest,
        ) -> Result<TxHash> {
            let in_flight = self.in_flight.get() + 1;
            self.in_flight.set(in_flight);
            self.max_in_flight.set(self.max_in_flight.get().max(in_flight));
            tokio::task::yield_now().await;
            self.in_flight.set(in_flight - 1);
            if self.fail_send {
                return Err(anyhow!("insufficient funds for gas"));
            }
            self.sent.borrow_mut().push(request);
            Ok(TxHash("0xfeed".to_owned()))
        }

        async fn chain_id(&self, _wallet: &WalletHandle) -> Result<ChainId> {
            let chain = self.chain.get();
            for _ in 0..self.chain_read_yields {
                tokio::task::yield_now().await;
            }
            Ok(chain)
        }

        async fn switch_chain(&self, _wallet: &WalletHandle, chain: ChainId) -> Result<()> {
            self.chain.set(chain);
            Ok(())
        }
    }

    struct FakeChain {
        usdc: Cell<Option<u128>>,
        receipt_ok: bool,
        usdc_by_chain: HashMap<ChainId, u128>,
        slow_chain: Option<(ChainId, u32)>,
        usdc_reads: RefCell<Vec<String>>,
    }

    impl FakeChain {
        fn with_usdc(usdc: Option<u128>) -> Self {
            Self {
                usdc: Cell::new(usdc),
                receipt_ok: true,
                usdc_by_chain: HashMap::new(),
                slow_chain: None,
                usdc_reads: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl ChainReader for FakeChain {
        async fn native_balance(&self, _address: &WalletAddress, _chain: ChainId) -> Result<u128> {
            Ok(1_000_000_000_000_000)
        }

        async fn token_balance(
            &self,
            token: &WalletAddress,
            _owner: &WalletAddress,
            chain: ChainId,
        ) -> Result<u128> {
            self.usdc_reads.borrow_mut().push(token.0.clone());
            if let Some((slow, yields)) = self.slow_chain
                && slow == chain
            {
                for _ in 0..yields {
                    tokio::task::yield_now().await;
                }
            }
            if let Some(usdc) = self.usdc_by_chain.get(&chain) {
                return Ok(*usdc);
            }
            self.usdc.get().ok_or_else(|| anyhow!("rpc unavailable"))
        }

        async fn wait_for_receipt(&self, tx_hash: &TxHash, _chain: ChainId) -> Result<TxReceipt> {
            Ok(TxReceipt {
                tx_hash: tx_hash.clone(),
                block_number: 42,
                succeeded: self.receipt_ok,
            })
        }
    }

    fn session(provider: FakeProvider, chain: FakeChain) -> OnboardingSession<FakeProvider, FakeChain> {
        init_tracing();
        let auth = SessionContext::new(provider, AuthConfig::new("test-app").unwrap());
        OnboardingSession::new(auth, chain, OnboardingConfig::default())
    }

    fn transfer(amount: &str) -> TransferRequest {
        TransferRequest {
            amount_decimal: amount.to_owned(),
            recipient_address: RECIPIENT.to_owned(),
        }
    }

    #[tokio::test]
    async fn onboarding_completes_after_signing_and_funding() {
        let session = session(FakeProvider::default(), FakeChain::with_usdc(Some(5_000_000)));
        assert!(session.wallet(WalletKind::Embedded).is_none());

        session.login().await.unwrap();
        assert_eq!(session.status(), SessionStatus::SignedIn);
        assert_eq!(
            session.wallet(WalletKind::Embedded).unwrap().address.0,
            EMBEDDED
        );
        assert_eq!(session.network(WalletKind::Embedded).network, Network::BaseSepolia);

        assert_eq!(session.onboarding_state(WalletKind::Embedded).guidance(), Some(crate::gate::GUIDANCE_SIGN_AND_FUND));

        let balances = session.refresh_balances(WalletKind::Embedded).await;
        assert_eq!(balances.usdc, Some(5_000_000));
        assert_eq!(
            session.chain_reader().usdc_reads.borrow().as_slice(),
            [BASE_SEPOLIA_USDC_ADDRESS.to_owned()]
        );
        assert_eq!(session.onboarding_state(WalletKind::Embedded).guidance(), Some(GUIDANCE_SIGN));
        assert_eq!(session.continue_url(WalletKind::Embedded), None);

        let signed = session
            .sign_message(WalletKind::Embedded, "hello superfan")
            .await
            .unwrap();
        assert_eq!(signed.signature, "0xsigned:hello superfan");
        assert!(session.onboarding_state(WalletKind::Embedded).can_continue());
        assert_eq!(session.continue_url(WalletKind::Embedded), Some("/app"));
    }

    #[tokio::test]
    async fn signed_but_unfunded_asks_for_usdc() {
        let session = session(FakeProvider::default(), FakeChain::with_usdc(Some(0)));
        session.login().await.unwrap();
        session.refresh_balances(WalletKind::Embedded).await;
        session.sign_message(WalletKind::Embedded, "hi").await.unwrap();

        let state = session.onboarding_state(WalletKind::Embedded);
        assert!(!state.can_continue());
        assert_eq!(state.guidance(), Some(GUIDANCE_FUND));
    }

    #[tokio::test]
    async fn failed_signature_leaves_gate_closed() {
        let provider = FakeProvider {
            fail_sign: true,
            ..Default::default()
        };
        let session = session(provider, FakeChain::with_usdc(Some(5_000_000)));
        session.login().await.unwrap();

        let err = session
            .sign_message(WalletKind::Embedded, "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, SignError::Provider(_)));
        assert!(!session.is_signing());
        assert!(session.signed_message().is_none());
        assert!(!session.onboarding_state(WalletKind::Embedded).has_signed_message);

        assert!(matches!(
            session.sign_message(WalletKind::Embedded, "  ").await,
            Err(SignError::EmptyMessage)
        ));
    }

    #[tokio::test]
    async fn transfer_is_gated_on_balance() {
        let session = session(FakeProvider::default(), FakeChain::with_usdc(Some(5_000_000)));
        assert_eq!(
            session.transfer_availability(WalletKind::Embedded, &transfer("3")).blocked_by,
            Some(TransferBlock::WalletNotReady)
        );

        session.login().await.unwrap();
        assert_eq!(
            session.transfer_availability(WalletKind::Embedded, &transfer("3")).blocked_by,
            Some(TransferBlock::BalanceUnknown)
        );

        session.refresh_balances(WalletKind::Embedded).await;
        let too_much = session.transfer_availability(WalletKind::Embedded, &transfer("10"));
        assert!(!too_much.enabled());
        assert_eq!(too_much.notice, Some(INSUFFICIENT_BALANCE_NOTICE));
        assert!(matches!(
            session.send_usdc(WalletKind::Embedded, &transfer("10")).await,
            Err(TransferError::Unavailable(TransferBlock::InsufficientBalance))
        ));
        assert!(session.auth().provider().sent.borrow().is_empty());

        assert!(session.transfer_availability(WalletKind::Embedded, &transfer("3")).enabled());
    }

    #[tokio::test]
    async fn transfer_submits_erc20_call_and_waits_for_receipt() {
        let session = session(FakeProvider::default(), FakeChain::with_usdc(Some(5_000_000)));
        session.login().await.unwrap();
        session.refresh_balances(WalletKind::Embedded).await;

        let receipt = session
            .send_usdc(WalletKind::Embedded, &transfer("3"))
            .await
            .unwrap();
        assert_eq!(receipt.tx_hash, TxHash("0xfeed".to_owned()));
        assert_eq!(receipt.block_number, 42);
        assert!(!session.is_sending());

        let sent = session.auth().provider().sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to.0, BASE_SEPOLIA_USDC_ADDRESS);
        assert_eq!(sent[0].value, 0);
        assert_eq!(sent[0].chain_id, Network::BaseSepolia.chain_id());
        assert!(sent[0].data.starts_with("0xa9059cbb"));
        assert!(sent[0].data.ends_with(&format!("{:064x}", 3_000_000_u128)));

        // one read before the transfer, one after
        assert_eq!(session.chain_reader().usdc_reads.borrow().len(), 2);
    }

    #[tokio::test]
    async fn submission_failure_is_reported_once_and_clears_busy() {
        let provider = FakeProvider {
            fail_send: true,
            ..Default::default()
        };
        let session = session(provider, FakeChain::with_usdc(Some(5_000_000)));
        session.login().await.unwrap();
        session.refresh_balances(WalletKind::Embedded).await;

        let err = session
            .send_usdc(WalletKind::Embedded, &transfer("3"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::Submission(_)));
        assert_eq!(err.user_message(), TRANSFER_FAILED_MESSAGE);
        assert!(!session.is_sending());
        assert!(session.transfer_availability(WalletKind::Embedded, &transfer("3")).enabled());
    }

    #[tokio::test]
    async fn reverted_transfer_is_a_failure() {
        let chain = FakeChain {
            receipt_ok: false,
            ..FakeChain::with_usdc(Some(5_000_000))
        };
        let session = session(FakeProvider::default(), chain);
        session.login().await.unwrap();
        session.refresh_balances(WalletKind::Embedded).await;

        let err = session
            .send_usdc(WalletKind::Embedded, &transfer("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::Reverted(_)));
    }

    #[tokio::test]
    async fn concurrent_send_is_rejected_while_busy() {
        let session = session(FakeProvider::default(), FakeChain::with_usdc(Some(5_000_000)));
        session.login().await.unwrap();
        session.refresh_balances(WalletKind::Embedded).await;

        let request = transfer("1");
        let (first, second) = tokio::join!(
            session.send_usdc(WalletKind::Embedded, &request),
            session.send_usdc(WalletKind::Embedded, &request),
        );

        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(TransferError::Unavailable(TransferBlock::Busy))
        ));
        assert_eq!(session.auth().provider().sent.borrow().len(), 1);
    }

    #[tokio::test]
    async fn switching_network_toggles_and_drops_stale_balances() {
        let session = session(FakeProvider::default(), FakeChain::with_usdc(Some(5_000_000)));
        session.login().await.unwrap();
        session.refresh_balances(WalletKind::Embedded).await;

        let network = session.switch_network(WalletKind::Embedded).await.unwrap();
        assert_eq!(network.network, Network::Base);
        assert_eq!(session.network(WalletKind::Embedded).network, Network::Base);
        assert_eq!(session.balances(WalletKind::Embedded).usdc, None);

        session.refresh_balances(WalletKind::Embedded).await;
        assert_eq!(
            session.chain_reader().usdc_reads.borrow().last().map(String::as_str),
            Some(BASE_USDC_ADDRESS)
        );

        let refreshed = session.refresh_chain(WalletKind::Embedded).await.unwrap();
        assert_eq!(refreshed.network, Network::Base);
    }

    #[tokio::test]
    async fn balance_read_overlapping_a_switch_is_discarded() {
        let sepolia = Network::BaseSepolia.chain_id();
        let chain = FakeChain {
            usdc_by_chain: HashMap::from([(sepolia, 5_000_000), (Network::Base.chain_id(), 0)]),
            slow_chain: Some((sepolia, 3)),
            ..FakeChain::with_usdc(None)
        };
        let session = session(FakeProvider::default(), chain);
        session.login().await.unwrap();

        let (stale, _) = tokio::join!(session.refresh_balances(WalletKind::Embedded), async {
            session.switch_network(WalletKind::Embedded).await.unwrap();
            session.refresh_balances(WalletKind::Embedded).await
        });

        assert_eq!(stale.usdc, Some(0));
        assert_eq!(session.network(WalletKind::Embedded).network, Network::Base);
        assert_eq!(session.balances(WalletKind::Embedded).usdc, Some(0));
        assert!(!session.transfer_availability(WalletKind::Embedded, &transfer("1")).enabled());
    }

    #[tokio::test]
    async fn chain_read_overlapping_a_switch_keeps_the_new_chain() {
        let provider = FakeProvider {
            chain_read_yields: 2,
            ..Default::default()
        };
        let session = session(provider, FakeChain::with_usdc(Some(0)));
        session.login().await.unwrap();

        let (read, switched) = tokio::join!(
            session.refresh_chain(WalletKind::Embedded),
            session.switch_network(WalletKind::Embedded),
        );

        assert_eq!(switched.unwrap().network, Network::Base);
        assert_eq!(read.unwrap().network, Network::Base);
        assert_eq!(session.network(WalletKind::Embedded).network, Network::Base);
    }

    #[tokio::test]
    async fn relogin_mid_transfer_does_not_allow_a_second_submission() {
        let session = session(FakeProvider::default(), FakeChain::with_usdc(Some(5_000_000)));
        session.login().await.unwrap();
        session.refresh_balances(WalletKind::Embedded).await;

        let request = transfer("1");
        let (first, second) = tokio::join!(session.send_usdc(WalletKind::Embedded, &request), async {
            session.logout().await.unwrap();
            session.login().await.unwrap();
            session.refresh_balances(WalletKind::Embedded).await;
            session.send_usdc(WalletKind::Embedded, &request).await
        });

        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(TransferError::Unavailable(TransferBlock::Busy))
        ));
        let provider = session.auth().provider();
        assert_eq!(provider.max_in_flight.get(), 1);
        assert_eq!(provider.sent.borrow().len(), 1);
        assert!(!session.is_sending());
    }

    #[tokio::test]
    async fn smart_wallet_without_chain_defaults_to_mainnet() {
        let session = session(FakeProvider::default(), FakeChain::with_usdc(Some(1)));
        session.login().await.unwrap();

        let smart = session.wallet(WalletKind::SmartWallet).unwrap();
        assert_eq!(smart.address.0, SMART);
        assert_eq!(session.network(WalletKind::SmartWallet).network, Network::Base);
    }

    #[tokio::test]
    async fn logout_resets_local_state() {
        let session = session(FakeProvider::default(), FakeChain::with_usdc(Some(5_000_000)));
        session.login().await.unwrap();
        session.refresh_balances(WalletKind::Embedded).await;
        session.sign_message(WalletKind::Embedded, "hello").await.unwrap();
        assert!(session.onboarding_state(WalletKind::Embedded).can_continue());

        session.logout().await.unwrap();

        assert_eq!(session.status(), SessionStatus::SignedOut);
        assert!(session.signed_message().is_none());
        assert_eq!(session.balances(WalletKind::Embedded), WalletBalances::default());
        assert_eq!(
            session.onboarding_state(WalletKind::Embedded),
            OnboardingState::default()
        );
        assert!(session.wallet(WalletKind::Embedded).is_none());
    }

    #[tokio::test]
    async fn unknown_balance_keeps_gate_closed() {
        let session = session(FakeProvider::default(), FakeChain::with_usdc(None));
        session.login().await.unwrap();
        session.sign_message(WalletKind::Embedded, "hello").await.unwrap();

        let balances = session.refresh_balances(WalletKind::Embedded).await;
        assert_eq!(balances.usdc, None);
        assert!(balances.native_wei.is_some());
        assert!(!session.onboarding_state(WalletKind::Embedded).can_continue());
    }
}
