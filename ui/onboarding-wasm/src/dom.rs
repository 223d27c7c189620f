//! DOM element bindings.
//!
//! All fields are resolved once at startup. New controls get a field here
//! and a line in `Elements::bind()`.

use sf_api_types::WalletKind;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlAnchorElement, HtmlButtonElement, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement,
};

// ── Helpers ──

fn doc() -> Document {
    gloo_utils::document()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let Ok(nl) = doc().query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nl.length())
        .filter_map(|i| nl.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn get_textarea_value(el: &HtmlTextAreaElement) -> String {
    el.value()
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

/// Hidden elements carry the `hidden` class; the page stylesheet does the rest.
pub fn set_visible(el: &Element, visible: bool) {
    toggle_class(el, "hidden", !visible);
}

pub fn set_enabled(btn: &HtmlButtonElement, enabled: bool) {
    btn.set_disabled(!enabled);
}

/// Show `text` in `el`, or hide it when there is nothing to say.
pub fn set_message(el: &Element, text: Option<&str>) {
    set_text(el, text.unwrap_or_default());
    set_visible(el, text.is_some());
}

pub fn navigate(url: &str) -> Result<(), JsValue> {
    window().location().set_href(url)
}

// ── Elements struct ──

/// Controls of one wallet card (embedded or smart wallet).
#[derive(Clone)]
pub struct WalletCard {
    pub card: Element,
    pub address: Element,
    pub copy_btn: HtmlButtonElement,
    pub network: Element,
    pub switch_btn: HtmlButtonElement,
    pub balance: Element,
    pub refresh_btn: HtmlButtonElement,
}

/// All DOM element references used by the onboarding page.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Session
    pub loading_view: Element,
    pub signed_out_view: Element,
    pub signed_in_view: Element,
    pub login_btn: HtmlButtonElement,
    pub logout_btn: HtmlButtonElement,
    pub status_line: Element,

    // Wallets
    pub kind_tabs: Vec<Element>,
    pub embedded: WalletCard,
    pub smart: WalletCard,

    // Sign
    pub sign_message: HtmlTextAreaElement,
    pub sign_btn: HtmlButtonElement,
    pub sign_error: Element,
    pub signature_box: Element,
    pub signature_text: Element,
    pub signature_toggle_btn: HtmlButtonElement,
    pub signature_copy_btn: HtmlButtonElement,

    // Transfer
    pub transfer_amount: HtmlInputElement,
    pub transfer_recipient: HtmlInputElement,
    pub transfer_btn: HtmlButtonElement,
    pub transfer_notice: Element,
    pub transfer_result: Element,

    // Deposit
    pub deposit_open_btn: HtmlButtonElement,
    pub deposit_panel: Element,
    pub deposit_close_btn: HtmlButtonElement,
    pub deposit_address: Element,
    pub deposit_qr: Element,
    pub deposit_copy_btn: HtmlButtonElement,
    pub deposit_network: Element,
    pub deposit_step_title: Element,
    pub deposit_step_detail: Element,
    pub faucet_link: HtmlAnchorElement,

    // Gate
    pub gate_guidance: Element,
    pub continue_btn: HtmlButtonElement,
}

impl Elements {
    pub fn card(&self, kind: WalletKind) -> &WalletCard {
        match kind {
            WalletKind::Embedded => &self.embedded,
            WalletKind::SmartWallet => &self.smart,
        }
    }
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_typed {
    ($ty:ty, $id:expr) => {
        by_id_typed::<$ty>($id).ok_or_else(|| {
            JsValue::from_str(&format!("missing {} #{}", stringify!($ty), $id))
        })?
    };
}

impl WalletCard {
    /// Card ids share a prefix: `embeddedAddress`, `smartAddress`, ...
    fn bind(prefix: &str) -> Result<WalletCard, JsValue> {
        let id = |suffix: &str| format!("{prefix}{suffix}");
        Ok(WalletCard {
            card: get_el!(&id("Card")),
            address: get_el!(&id("Address")),
            copy_btn: get_typed!(HtmlButtonElement, &id("CopyBtn")),
            network: get_el!(&id("Network")),
            switch_btn: get_typed!(HtmlButtonElement, &id("SwitchBtn")),
            balance: get_el!(&id("Balance")),
            refresh_btn: get_typed!(HtmlButtonElement, &id("RefreshBtn")),
        })
    }
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            loading_view: get_el!("loadingView"),
            signed_out_view: get_el!("signedOutView"),
            signed_in_view: get_el!("signedInView"),
            login_btn: get_typed!(HtmlButtonElement, "loginBtn"),
            logout_btn: get_typed!(HtmlButtonElement, "logoutBtn"),
            status_line: get_el!("statusLine"),

            kind_tabs: query_all(".wallet-kind-tab"),
            embedded: WalletCard::bind("embedded")?,
            smart: WalletCard::bind("smart")?,

            sign_message: get_typed!(HtmlTextAreaElement, "signMessage"),
            sign_btn: get_typed!(HtmlButtonElement, "signBtn"),
            sign_error: get_el!("signError"),
            signature_box: get_el!("signatureBox"),
            signature_text: get_el!("signatureText"),
            signature_toggle_btn: get_typed!(HtmlButtonElement, "signatureToggleBtn"),
            signature_copy_btn: get_typed!(HtmlButtonElement, "signatureCopyBtn"),

            transfer_amount: get_typed!(HtmlInputElement, "transferAmount"),
            transfer_recipient: get_typed!(HtmlInputElement, "transferRecipient"),
            transfer_btn: get_typed!(HtmlButtonElement, "transferBtn"),
            transfer_notice: get_el!("transferNotice"),
            transfer_result: get_el!("transferResult"),

            deposit_open_btn: get_typed!(HtmlButtonElement, "depositOpenBtn"),
            deposit_panel: get_el!("depositPanel"),
            deposit_close_btn: get_typed!(HtmlButtonElement, "depositCloseBtn"),
            deposit_address: get_el!("depositAddress"),
            deposit_qr: get_el!("depositQr"),
            deposit_copy_btn: get_typed!(HtmlButtonElement, "depositCopyBtn"),
            deposit_network: get_el!("depositNetwork"),
            deposit_step_title: get_el!("depositStepTitle"),
            deposit_step_detail: get_el!("depositStepDetail"),
            faucet_link: get_typed!(HtmlAnchorElement, "faucetLink"),

            gate_guidance: get_el!("gateGuidance"),
            continue_btn: get_typed!(HtmlButtonElement, "continueBtn"),
        })
    }
}
