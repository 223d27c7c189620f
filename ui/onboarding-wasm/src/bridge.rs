//! Browser bindings for the auth provider and the clipboard.
//!
//! The page's provider SDK is wrapped by a small script exposing
//! `window.superfanAuth`:
//!
//! - properties: `ready`, `authenticated`, `user`, `wallets`
//! - methods (may return promises): `login()`, `logout()`,
//!   `signMessage(wallet, message)`, `sendTransaction(wallet, tx)`,
//!   `getChainId(wallet)`, `switchChain(wallet, chainId)`
//!
//! `wallet` is a serialized [`WalletHandle`]; the script routes to the
//! embedded signer or the smart wallet client by its `kind`.

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use js_sys::{Array, Function, Promise, Reflect};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sf_api_types::{ChainId, ConnectedAccount, SendTransactionRequest, SessionUser, TxHash, WalletHandle};
use sf_auth_adapter::AuthProvider;
use sf_chain_rpc::parse_quantity;
use sf_onboarding::Clipboard;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::dom;

pub const BRIDGE_KEY: &str = "superfanAuth";

fn js_error(value: JsValue) -> anyhow::Error {
    let message = value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{value:?}"));
    anyhow!(message)
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| anyhow!("failed to encode bridge argument: {e}"))
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T> {
    serde_wasm_bindgen::from_value(value).map_err(|e| anyhow!("unexpected bridge value: {e}"))
}

/// Chain ids come back as numbers, decimal strings, hex quantities or CAIP-2.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawChainId {
    Number(u64),
    Text(String),
}

impl RawChainId {
    fn resolve(self) -> Result<ChainId> {
        match self {
            RawChainId::Number(id) => Ok(ChainId(id)),
            RawChainId::Text(text) if text.starts_with("0x") => {
                let id = parse_quantity(&text)?;
                Ok(ChainId(u64::try_from(id).context("chain id out of range")?))
            }
            RawChainId::Text(text) => {
                ChainId::parse(&text).ok_or_else(|| anyhow!("invalid chain id {text:?}"))
            }
        }
    }
}

/// [`AuthProvider`] backed by `window.superfanAuth`.
#[derive(Debug, Clone)]
pub struct JsAuthBridge {
    key: String,
}

impl Default for JsAuthBridge {
    fn default() -> Self {
        Self {
            key: BRIDGE_KEY.to_owned(),
        }
    }
}

impl JsAuthBridge {
    pub fn is_installed(&self) -> bool {
        self.object().is_ok()
    }

    fn object(&self) -> Result<JsValue> {
        let obj = Reflect::get(&dom::window(), &JsValue::from_str(&self.key)).map_err(js_error)?;
        if obj.is_undefined() || obj.is_null() {
            bail!("window.{} is not available", self.key);
        }
        Ok(obj)
    }

    fn property(&self, name: &str) -> Option<JsValue> {
        let obj = self.object().ok()?;
        Reflect::get(&obj, &JsValue::from_str(name))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
    }

    async fn call(&self, method: &str, args: &[JsValue]) -> Result<JsValue> {
        let obj = self.object()?;
        let func = Reflect::get(&obj, &JsValue::from_str(method)).map_err(js_error)?;
        let func = func
            .dyn_into::<Function>()
            .map_err(|_| anyhow!("window.{}.{method} is not a function", self.key))?;

        let result = func
            .apply(&obj, &args.iter().collect::<Array>())
            .map_err(js_error)
            .with_context(|| format!("{method} threw"))?;

        if result.has_type::<Promise>() {
            let promise = result.unchecked_into::<Promise>();
            JsFuture::from(promise)
                .await
                .map_err(js_error)
                .with_context(|| format!("{method} rejected"))
        } else {
            Ok(result)
        }
    }
}

#[async_trait(?Send)]
impl AuthProvider for JsAuthBridge {
    fn is_ready(&self) -> bool {
        self.property("ready")
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    fn is_authenticated(&self) -> bool {
        self.property("authenticated")
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    fn user(&self) -> Option<SessionUser> {
        let value = self.property("user")?;
        match from_js(value) {
            Ok(user) => Some(user),
            Err(err) => {
                gloo_console::warn!(format!("ignoring user: {err:#}"));
                None
            }
        }
    }

    fn connected_wallets(&self) -> Vec<ConnectedAccount> {
        let Some(value) = self.property("wallets") else {
            return Vec::new();
        };
        from_js(value).unwrap_or_else(|err| {
            gloo_console::warn!(format!("ignoring wallets: {err:#}"));
            Vec::new()
        })
    }

    async fn login(&self) -> Result<()> {
        self.call("login", &[]).await?;
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        self.call("logout", &[]).await?;
        Ok(())
    }

    async fn sign_message(&self, wallet: &WalletHandle, message: &str) -> Result<String> {
        let signature = self
            .call("signMessage", &[to_js(wallet)?, JsValue::from_str(message)])
            .await?;
        signature
            .as_string()
            .ok_or_else(|| anyhow!("signMessage did not return a string"))
    }

    async fn send_transaction(
        &self,
        wallet: &WalletHandle,
        request: SendTransactionRequest,
    ) -> Result<TxHash> {
        let hash = self
            .call("sendTransaction", &[to_js(wallet)?, to_js(&request)?])
            .await?;
        hash.as_string()
            .map(TxHash)
            .ok_or_else(|| anyhow!("sendTransaction did not return a hash"))
    }

    async fn chain_id(&self, wallet: &WalletHandle) -> Result<ChainId> {
        let raw = self.call("getChainId", &[to_js(wallet)?]).await?;
        from_js::<RawChainId>(raw)?.resolve()
    }

    async fn switch_chain(&self, wallet: &WalletHandle, chain: ChainId) -> Result<()> {
        self.call("switchChain", &[to_js(wallet)?, JsValue::from_f64(chain.0 as f64)])
            .await?;
        Ok(())
    }
}

/// `navigator.clipboard`; unavailable outside secure contexts.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClipboard;

#[async_trait(?Send)]
impl Clipboard for BrowserClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let clipboard = dom::window().navigator().clipboard();
        JsFuture::from(clipboard.write_text(text))
            .await
            .map_err(js_error)?;
        Ok(())
    }
}
