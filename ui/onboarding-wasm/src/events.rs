//! Event binding.
//!
//! Wires all UI event listeners. Async handlers are spawned via
//! `wasm_bindgen_futures::spawn_local`.

use sf_api_types::WalletKind;
use sf_onboarding::CopyTarget;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::EventTarget;

use crate::actions;
use crate::dom::Elements;
use crate::render::{self, KINDS, address_target};

/// Fired on `window` by the provider script whenever its state changes.
pub const AUTH_CHANGED_EVENT: &str = "superfanauthchange";

fn listen(target: &EventTarget, event: &str, cb: Closure<dyn FnMut(web_sys::Event)>) {
    if let Err(err) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        gloo_console::error!(err);
    }
    cb.forget();
}

/// Helper: attach async handler; extra arguments are passed after `&Elements`.
macro_rules! on_async {
    ($target:expr, $event:expr, $els:expr, $handler:path $(, $arg:expr)*) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2 $(, $arg)*).await;
            });
        }) as Box<dyn FnMut(_)>);
        listen($target.as_ref(), $event, cb);
    }};
}

/// Helper: attach sync handler.
macro_rules! on_sync {
    ($target:expr, $event:expr, $els:expr, $handler:path $(, $arg:expr)*) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            $handler(&els $(, $arg)*);
        }) as Box<dyn FnMut(_)>);
        listen($target.as_ref(), $event, cb);
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // ── Session ──
    on_async!(els.login_btn, "click", els, actions::on_login);
    on_async!(els.logout_btn, "click", els, actions::on_logout);
    on_async!(crate::dom::window(), AUTH_CHANGED_EVENT, els, actions::on_provider_change);

    // ── Wallet kind tabs ──
    for tab in &els.kind_tabs {
        let kind = match tab.get_attribute("data-kind").as_deref() {
            Some("smart_wallet") => WalletKind::SmartWallet,
            _ => WalletKind::Embedded,
        };
        on_sync!(tab, "click", els, actions::on_select_kind, kind);
    }

    // ── Wallet cards ──
    for kind in KINDS {
        let card = els.card(kind);
        on_async!(card.copy_btn, "click", els, actions::on_copy, address_target(kind));
        on_async!(card.switch_btn, "click", els, actions::on_switch_network, kind);
        on_async!(card.refresh_btn, "click", els, actions::on_refresh_balances, kind);
    }

    // ── Sign ──
    on_sync!(els.sign_message, "input", els, render::render);
    on_async!(els.sign_btn, "click", els, actions::on_sign);
    on_sync!(els.signature_toggle_btn, "click", els, actions::on_toggle_signature);
    on_async!(els.signature_copy_btn, "click", els, actions::on_copy, CopyTarget::Signature);

    // ── Transfer ──
    on_sync!(els.transfer_amount, "input", els, render::render);
    on_sync!(els.transfer_recipient, "input", els, render::render);
    on_async!(els.transfer_btn, "click", els, actions::on_send);

    // ── Deposit ──
    on_sync!(els.deposit_open_btn, "click", els, actions::on_deposit, true);
    on_sync!(els.deposit_close_btn, "click", els, actions::on_deposit, false);
    on_async!(els.deposit_copy_btn, "click", els, actions::on_copy, CopyTarget::DepositAddress);

    // ── Gate ──
    on_sync!(els.continue_btn, "click", els, actions::on_continue);
}
