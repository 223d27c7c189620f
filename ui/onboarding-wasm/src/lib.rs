//! Superfan onboarding WASM frontend.
//!
//! Drives the onboarding page: login, wallet cards, message signing, USDC
//! transfer, deposit instructions and the continue gate. The auth provider
//! is reached through the `window.superfanAuth` bridge.

pub mod actions;
pub mod bridge;
pub mod dom;
pub mod events;
pub mod render;
pub mod state;

use sf_auth_adapter::{AuthConfig, SessionContext};
use sf_chain_rpc::JsonRpcChainClient;
use sf_onboarding::{OnboardingConfig, OnboardingSession};
use wasm_bindgen::prelude::*;

use crate::bridge::JsAuthBridge;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    let config = AuthConfig::from_env().map_err(|err| JsValue::from_str(&format!("{err:#}")))?;
    gloo_console::log!(format!(
        "superfan onboarding: app {} (default network {})",
        config.app_id, config.default_network
    ));

    let bridge = JsAuthBridge::default();
    if !bridge.is_installed() {
        gloo_console::warn!(format!(
            "window.{} not found yet; waiting for {}",
            bridge::BRIDGE_KEY,
            events::AUTH_CHANGED_EVENT
        ));
    }

    let session = OnboardingSession::new(
        SessionContext::new(bridge, config),
        JsonRpcChainClient::new(None),
        OnboardingConfig::from_env(),
    );
    state::set_session(session);

    events::bind_events(&els);
    render::render(&els);
    actions::refresh_wallets(&els).await;

    Ok(())
}
