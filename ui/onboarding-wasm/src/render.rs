//! Projects session and page state onto the DOM.
//!
//! `render` is idempotent and cheap; handlers call it after every change.

use sf_api_types::{TransferRequest, WalletAddress, WalletKind};
use sf_auth_adapter::SessionStatus;
use sf_onboarding::{
    CopyIndicator, CopyTarget, balance_line, can_sign, deposit_instructions, deposit_qr_svg,
};

use crate::dom::{self, Elements, WalletCard};
use crate::state::{self, Session};

pub const KINDS: [WalletKind; 2] = [WalletKind::Embedded, WalletKind::SmartWallet];

const QR_ADDRESS_ATTR: &str = "data-address";

pub fn address_target(kind: WalletKind) -> CopyTarget {
    match kind {
        WalletKind::Embedded => CopyTarget::EmbeddedAddress,
        WalletKind::SmartWallet => CopyTarget::SmartWalletAddress,
    }
}

/// Current contents of the transfer form.
pub fn transfer_request(els: &Elements) -> TransferRequest {
    TransferRequest {
        amount_decimal: dom::get_input_value(&els.transfer_amount),
        recipient_address: dom::get_input_value(&els.transfer_recipient),
    }
}

pub fn render(els: &Elements) {
    let Some(session) = state::session() else {
        show_status(els, SessionStatus::Loading);
        return;
    };

    let status = session.status();
    show_status(els, status);
    if status != SessionStatus::SignedIn {
        return;
    }

    let active = state::active_kind();
    for tab in &els.kind_tabs {
        let selected = tab.get_attribute("data-kind").as_deref() == Some(active.tag());
        dom::toggle_class(tab, "active", selected);
    }

    let copy = state::copy_indicator();
    let copy = copy.borrow();
    for kind in KINDS {
        render_card(els.card(kind), &session, kind, &copy);
    }
    render_sign(els, &session, active, &copy);
    render_transfer(els, &session, active);
    render_deposit(els, &session, active, &copy);
    render_gate(els, &session, active);
}

fn show_status(els: &Elements, status: SessionStatus) {
    dom::set_visible(&els.loading_view, status == SessionStatus::Loading);
    dom::set_visible(&els.signed_out_view, status == SessionStatus::SignedOut);
    dom::set_visible(&els.signed_in_view, status == SessionStatus::SignedIn);
    dom::set_visible(els.logout_btn.as_ref(), status == SessionStatus::SignedIn);
    dom::set_text(
        &els.status_line,
        match status {
            SessionStatus::Loading => "Loading...",
            SessionStatus::SignedOut => "Log in to set up your wallet.",
            SessionStatus::SignedIn => "",
        },
    );
}

fn render_card(card: &WalletCard, session: &Session, kind: WalletKind, copy: &CopyIndicator) {
    let wallet = session.wallet(kind);
    let network = session.network(kind);

    match &wallet {
        Some(wallet) => dom::set_text(&card.address, wallet.address.as_str()),
        None => dom::set_text(&card.address, &format!("No {} yet", kind.label().to_lowercase())),
    }
    dom::set_text(&card.network, &format!("Network: {}", network.display_name));
    dom::set_text(
        card.switch_btn.as_ref(),
        &format!("Switch to {}", network.network.toggled().display_name()),
    );
    dom::set_text(&card.balance, &balance_line(kind, &session.balances(kind)));
    dom::set_text(card.copy_btn.as_ref(), copy.label(address_target(kind)));

    let ready = wallet.is_some();
    dom::set_enabled(&card.copy_btn, ready);
    dom::set_enabled(&card.switch_btn, ready);
    dom::set_enabled(&card.refresh_btn, ready);
}

fn render_sign(els: &Elements, session: &Session, kind: WalletKind, copy: &CopyIndicator) {
    let message = dom::get_textarea_value(&els.sign_message);
    let signing = session.is_signing();
    dom::set_enabled(
        &els.sign_btn,
        session.wallet(kind).is_some() && can_sign(&message, signing),
    );
    dom::set_text(
        els.sign_btn.as_ref(),
        if signing { "Signing..." } else { "Sign Message" },
    );
    dom::set_message(&els.sign_error, state::sign_error());

    let signed = session.signed_message();
    dom::set_visible(&els.signature_box, signed.is_some());
    if let Some(signed) = signed {
        dom::set_text(&els.signature_text, &signed.display());
        dom::set_text(els.signature_toggle_btn.as_ref(), signed.toggle_label());
        dom::set_text(els.signature_copy_btn.as_ref(), copy.label(CopyTarget::Signature));
    }
}

fn render_transfer(els: &Elements, session: &Session, kind: WalletKind) {
    let availability = session.transfer_availability(kind, &transfer_request(els));
    dom::set_enabled(&els.transfer_btn, availability.enabled());
    dom::set_text(
        els.transfer_btn.as_ref(),
        if session.is_sending() { "Sending..." } else { "Send USDC" },
    );
    dom::set_message(&els.transfer_notice, availability.notice);
    dom::set_message(&els.transfer_result, state::transfer_result().as_deref());
}

fn render_deposit(els: &Elements, session: &Session, kind: WalletKind, copy: &CopyIndicator) {
    let wallet = session.wallet(kind);
    dom::set_enabled(&els.deposit_open_btn, wallet.is_some());

    let Some(wallet) = wallet.filter(|_| state::deposit_open()) else {
        dom::set_visible(&els.deposit_panel, false);
        return;
    };

    let deposit = deposit_instructions(&wallet, &session.network(kind));
    dom::set_visible(&els.deposit_panel, true);
    dom::set_text(&els.deposit_address, deposit.address.as_str());
    render_deposit_qr(&els.deposit_qr, &deposit.address);
    dom::set_text(&els.deposit_network, deposit.network_name);
    dom::set_text(&els.deposit_step_title, &deposit.step_title);
    dom::set_text(&els.deposit_step_detail, &deposit.step_detail);
    dom::set_text(els.deposit_copy_btn.as_ref(), copy.label(CopyTarget::DepositAddress));

    dom::set_visible(els.faucet_link.as_ref(), deposit.faucet_url.is_some());
    if let Some(url) = deposit.faucet_url {
        els.faucet_link.set_href(url);
    }
}

/// Re-encodes only when the address changed since the last render.
fn render_deposit_qr(el: &web_sys::Element, address: &WalletAddress) {
    if el.get_attribute(QR_ADDRESS_ATTR).as_deref() == Some(address.as_str()) {
        return;
    }
    match deposit_qr_svg(address) {
        Ok(svg) => {
            el.set_inner_html(&svg);
            let _ = el.set_attribute(QR_ADDRESS_ATTR, address.as_str());
        }
        Err(err) => {
            gloo_console::error!(format!("deposit QR code: {err:#}"));
            el.set_inner_html("");
            let _ = el.remove_attribute(QR_ADDRESS_ATTR);
        }
    }
}

fn render_gate(els: &Elements, session: &Session, kind: WalletKind) {
    let gate = session.onboarding_state(kind);
    dom::set_message(&els.gate_guidance, gate.guidance());
    dom::set_visible(els.continue_btn.as_ref(), gate.can_continue());
    dom::set_enabled(&els.continue_btn, gate.can_continue());
}
