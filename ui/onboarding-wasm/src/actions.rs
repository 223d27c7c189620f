//! User actions.
//!
//! Each handler drives one session operation and re-renders. Wiring lives
//! in `events.rs`.

use sf_api_types::WalletKind;
use sf_onboarding::{CopyTarget, copy_text, flash_copied};

use crate::bridge::BrowserClipboard;
use crate::dom::{self, Elements};
use crate::render::{KINDS, render, transfer_request};
use crate::state;

/// Re-read chain ids and balances for every resolved wallet.
pub async fn refresh_wallets(els: &Elements) {
    let Some(session) = state::session() else {
        return;
    };
    for kind in KINDS {
        if session.wallet(kind).is_none() {
            continue;
        }
        if let Err(err) = session.refresh_chain(kind).await {
            gloo_console::warn!(format!("chain lookup failed: {err:#}"));
        }
        session.refresh_balances(kind).await;
        render(els);
    }
    render(els);
}

/// The provider script fires an event whenever its state changes.
pub async fn on_provider_change(els: &Elements) {
    render(els);
    refresh_wallets(els).await;
}

pub async fn on_login(els: &Elements) {
    let Some(session) = state::session() else {
        return;
    };
    dom::set_enabled(&els.login_btn, false);
    if let Err(err) = session.login().await {
        gloo_console::error!(format!("login failed: {err:#}"));
    }
    dom::set_enabled(&els.login_btn, true);
    refresh_wallets(els).await;
}

pub async fn on_logout(els: &Elements) {
    let Some(session) = state::session() else {
        return;
    };
    if let Err(err) = session.logout().await {
        gloo_console::error!(format!("logout failed: {err:#}"));
    }
    state::reset_page();
    els.sign_message.set_value("");
    els.transfer_amount.set_value("");
    els.transfer_recipient.set_value("");
    render(els);
}

pub fn on_select_kind(els: &Elements, kind: WalletKind) {
    state::set_active_kind(kind);
    state::set_transfer_result(None);
    render(els);
}

pub async fn on_switch_network(els: &Elements, kind: WalletKind) {
    let Some(session) = state::session() else {
        return;
    };
    dom::set_enabled(&els.card(kind).switch_btn, false);
    match session.switch_network(kind).await {
        Ok(network) => {
            gloo_console::log!(format!("{} now on {}", kind.label(), network.display_name));
            render(els);
            session.refresh_balances(kind).await;
        }
        Err(err) => gloo_console::error!(format!("chain switch failed: {err:#}")),
    }
    render(els);
}

pub async fn on_refresh_balances(els: &Elements, kind: WalletKind) {
    let Some(session) = state::session() else {
        return;
    };
    session.refresh_balances(kind).await;
    render(els);
}

pub async fn on_sign(els: &Elements) {
    let Some(session) = state::session() else {
        return;
    };
    let message = dom::get_textarea_value(&els.sign_message);
    state::set_sign_error(None);
    dom::set_enabled(&els.sign_btn, false);
    dom::set_text(els.sign_btn.as_ref(), "Signing...");

    if let Err(err) = session.sign_message(state::active_kind(), &message).await {
        gloo_console::error!(format!("{err:#}"));
        state::set_sign_error(Some(err.user_message()));
    }
    render(els);
}

pub fn on_toggle_signature(els: &Elements) {
    if let Some(session) = state::session() {
        session.toggle_signature_expanded();
    }
    render(els);
}

fn copy_source(target: CopyTarget) -> Option<String> {
    let session = state::session()?;
    match target {
        CopyTarget::EmbeddedAddress => session.wallet(WalletKind::Embedded).map(|w| w.address.0),
        CopyTarget::SmartWalletAddress => {
            session.wallet(WalletKind::SmartWallet).map(|w| w.address.0)
        }
        CopyTarget::DepositAddress => session.wallet(state::active_kind()).map(|w| w.address.0),
        CopyTarget::Signature => session.signed_message().map(|s| s.signature),
    }
}

pub async fn on_copy(els: &Elements, target: CopyTarget) {
    let Some(text) = copy_source(target) else {
        return;
    };
    copy_text(&BrowserClipboard, &text).await;

    let indicator = state::copy_indicator();
    flash_copied(&indicator, target, |delay| {
        render(els);
        gloo_timers::future::sleep(delay)
    })
    .await;
    render(els);
}

pub async fn on_send(els: &Elements) {
    let Some(session) = state::session() else {
        return;
    };
    let kind = state::active_kind();
    let request = transfer_request(els);
    state::set_transfer_result(None);
    dom::set_enabled(&els.transfer_btn, false);
    dom::set_text(els.transfer_btn.as_ref(), "Sending...");

    match session.send_usdc(kind, &request).await {
        Ok(receipt) => {
            els.transfer_amount.set_value("");
            state::set_transfer_result(Some(format!("Sent. Transaction {}", receipt.tx_hash)));
        }
        Err(err) => {
            gloo_console::error!(format!("{err:#}"));
            state::set_transfer_result(Some(err.user_message().to_owned()));
        }
    }
    render(els);
}

pub fn on_deposit(els: &Elements, open: bool) {
    state::set_deposit_open(open);
    render(els);
}

pub fn on_continue(els: &Elements) {
    let Some(session) = state::session() else {
        return;
    };
    if let Some(url) = session.continue_url(state::active_kind()) {
        if let Err(err) = dom::navigate(url) {
            gloo_console::error!(err);
        }
    }
    render(els);
}
