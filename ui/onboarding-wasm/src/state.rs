//! Global application state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! The onboarding session itself owns the signed flag, balances and busy
//! flags; this only holds what the page adds on top.

use sf_api_types::WalletKind;
use sf_chain_rpc::JsonRpcChainClient;
use sf_onboarding::{CopyIndicator, OnboardingSession};
use std::cell::RefCell;
use std::rc::Rc;

use crate::bridge::JsAuthBridge;

pub type Session = OnboardingSession<JsAuthBridge, JsonRpcChainClient>;

/// Central application state.
pub struct AppState {
    pub session: Option<Rc<Session>>,
    pub copy: Rc<RefCell<CopyIndicator>>,
    pub active_kind: WalletKind,
    pub deposit_open: bool,
    pub sign_error: Option<&'static str>,
    pub transfer_result: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: None,
            copy: Rc::new(RefCell::new(CopyIndicator::default())),
            active_kind: WalletKind::Embedded,
            deposit_open: false,
            sign_error: None,
            transfer_result: None,
        }
    }
}

// ── Thread-local singleton ──

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
}

/// Run a closure with shared read access to the state.
pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&AppState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

/// Run a closure with mutable access to the state.
pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

// ── Convenience accessors ──

pub fn session() -> Option<Rc<Session>> {
    with(|s| s.session.clone())
}

pub fn set_session(session: Session) {
    with_mut(|s| s.session = Some(Rc::new(session)));
}

pub fn copy_indicator() -> Rc<RefCell<CopyIndicator>> {
    with(|s| s.copy.clone())
}

pub fn active_kind() -> WalletKind {
    with(|s| s.active_kind)
}

pub fn set_active_kind(kind: WalletKind) {
    with_mut(|s| s.active_kind = kind);
}

pub fn deposit_open() -> bool {
    with(|s| s.deposit_open)
}

pub fn set_deposit_open(open: bool) {
    with_mut(|s| s.deposit_open = open);
}

pub fn sign_error() -> Option<&'static str> {
    with(|s| s.sign_error)
}

pub fn set_sign_error(message: Option<&'static str>) {
    with_mut(|s| s.sign_error = message);
}

pub fn transfer_result() -> Option<String> {
    with(|s| s.transfer_result.clone())
}

pub fn set_transfer_result(message: Option<String>) {
    with_mut(|s| s.transfer_result = message);
}

/// Page state that does not survive a logout.
pub fn reset_page() {
    with_mut(|s| {
        s.copy.borrow_mut().reset();
        s.active_kind = WalletKind::Embedded;
        s.deposit_open = false;
        s.sign_error = None;
        s.transfer_result = None;
    });
}
