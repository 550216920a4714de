use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex};

use alloy::primitives::{address, keccak256, Address, B256};
use serde_json::Value;

use treasury_core::network::parse_chain_id;
use treasury_core::ports::CHAIN_NOT_ADDED;
use treasury_core::{PortError, ProviderEvent, ProviderEventKind, ProviderPort};

use crate::config::{DashboardConfig, ProviderPreference};

#[derive(Debug, Clone)]
pub struct Eip1193Adapter {
    mode: ProviderMode,
    state: Arc<Mutex<ProviderState>>,
    #[cfg(target_arch = "wasm32")]
    hooks: Arc<Mutex<BrowserHooks>>,
}

#[derive(Debug, Clone)]
enum ProviderMode {
    Disabled(String),
    Deterministic,
    #[cfg(not(target_arch = "wasm32"))]
    Proxy(ProxyRuntime),
    #[cfg(target_arch = "wasm32")]
    Browser,
}

#[derive(Debug, Clone)]
#[cfg(not(target_arch = "wasm32"))]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Clone)]
struct ProviderState {
    accounts: Vec<Address>,
    authorized: bool,
    chain_id: u64,
    known_chains: BTreeSet<u64>,
    sent: HashSet<B256>,
    event_seq: u64,
    events: Vec<ProviderEvent>,
    request_log: Vec<(String, Value)>,
}

impl Default for ProviderState {
    fn default() -> Self {
        Self {
            accounts: vec![address!("1000000000000000000000000000000000000001")],
            authorized: false,
            chain_id: 1,
            known_chains: BTreeSet::from([1]),
            sent: HashSet::new(),
            event_seq: 0,
            events: Vec::new(),
            request_log: Vec::new(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
struct BrowserHooks {
    accounts_changed: Option<wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>>,
    chain_changed: Option<wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>>,
}

impl Default for Eip1193Adapter {
    fn default() -> Self {
        Self::with_config(&DashboardConfig::from_env())
    }
}

impl Eip1193Adapter {
    pub fn with_config(config: &DashboardConfig) -> Self {
        let mode = if config.provider == ProviderPreference::Deterministic {
            ProviderMode::Deterministic
        } else {
            Self::runtime_mode(config)
        };
        Self::from_mode(mode)
    }

    /// In-memory wallet with one account on chain 1 that only knows chain 1
    /// until another chain is added.
    pub fn deterministic() -> Self {
        Self::from_mode(ProviderMode::Deterministic)
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Self::from_mode(ProviderMode::Disabled(reason.into()))
    }

    fn from_mode(mode: ProviderMode) -> Self {
        tracing::debug!(mode = mode.label(), "eip1193 provider mode selected");
        Self {
            mode,
            state: Arc::new(Mutex::new(ProviderState::default())),
            #[cfg(target_arch = "wasm32")]
            hooks: Arc::new(Mutex::new(BrowserHooks::default())),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn runtime_mode(_config: &DashboardConfig) -> ProviderMode {
        if browser_provider().is_ok() {
            ProviderMode::Browser
        } else {
            ProviderMode::Disabled("no injected wallet found (window.ethereum)".to_owned())
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn runtime_mode(config: &DashboardConfig) -> ProviderMode {
        let Some(base_url) = config.eip1193_proxy_url.clone() else {
            return ProviderMode::Disabled("TREASURY_EIP1193_PROXY_URL is not set".to_owned());
        };
        let timeout = std::time::Duration::from_millis(config.provider_timeout_ms);
        match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => ProviderMode::Proxy(ProxyRuntime { base_url, client }),
            Err(e) => ProviderMode::Disabled(format!("failed to initialize EIP-1193 proxy client: {e}")),
        }
    }

    pub fn mode_label(&self) -> &'static str {
        self.mode.label()
    }

    /// Subscribes to `accountsChanged` / `chainChanged` on the injected
    /// wallet. Other modes record their events directly.
    pub fn watch_wallet_events(&self) -> Result<(), PortError> {
        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return self.register_browser_hooks();
        }
        Ok(())
    }

    /// Every request seen so far in deterministic mode, oldest first.
    pub fn request_log(&self) -> Result<Vec<(String, Value)>, PortError> {
        Ok(self.lock_state()?.request_log.clone())
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, ProviderState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("provider lock poisoned: {e}")))
    }

    pub fn debug_inject_accounts_changed(&self, accounts: Vec<Address>) -> Result<(), PortError> {
        let payload = serde_json::json!(accounts.iter().map(|a| a.to_string()).collect::<Vec<_>>())
            .to_string();
        let mut g = self.lock_state()?;
        g.accounts = accounts;
        push_event(&mut g, ProviderEventKind::AccountsChanged, payload);
        Ok(())
    }

    pub fn debug_inject_chain_changed(&self, chain_id: u64) -> Result<(), PortError> {
        let mut g = self.lock_state()?;
        g.chain_id = chain_id;
        g.known_chains.insert(chain_id);
        push_event(&mut g, ProviderEventKind::ChainChanged, chain_id.to_string());
        Ok(())
    }

    fn deterministic_request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let mut g = self.lock_state()?;
        g.request_log.push((method.to_owned(), params.clone()));

        match method {
            "eth_accounts" => {
                let visible: &[Address] = if g.authorized { &g.accounts } else { &[] };
                Ok(accounts_json(visible))
            }
            "eth_requestAccounts" => {
                if !g.authorized {
                    g.authorized = true;
                    let payload = accounts_json(&g.accounts).to_string();
                    push_event(&mut g, ProviderEventKind::AccountsChanged, payload);
                }
                Ok(accounts_json(&g.accounts))
            }
            "eth_chainId" => Ok(Value::String(format!("{:#x}", g.chain_id))),
            "wallet_switchEthereumChain" => {
                let chain_id = parse_chain_id(first_param_field(&params, "chainId")?)?;
                if !g.known_chains.contains(&chain_id) {
                    return Err(PortError::Rpc {
                        code: CHAIN_NOT_ADDED,
                        message: format!("Unrecognized chain ID {chain_id:#x}"),
                    });
                }
                if g.chain_id != chain_id {
                    g.chain_id = chain_id;
                    push_event(&mut g, ProviderEventKind::ChainChanged, chain_id.to_string());
                }
                Ok(Value::Null)
            }
            "wallet_addEthereumChain" => {
                let chain_id = parse_chain_id(first_param_field(&params, "chainId")?)?;
                g.known_chains.insert(chain_id);
                Ok(Value::Null)
            }
            "eth_sendTransaction" => {
                let canonical = serde_json::to_vec(&params).map_err(|e| {
                    PortError::Validation(format!("tx payload serialization failed: {e}"))
                })?;
                let mut seed = g.sent.len().to_be_bytes().to_vec();
                seed.extend_from_slice(&canonical);
                let hash = keccak256(seed);
                g.sent.insert(hash);
                Ok(Value::String(hash.to_string()))
            }
            "eth_getTransactionReceipt" => {
                let raw = params
                    .get(0)
                    .and_then(Value::as_str)
                    .ok_or_else(|| PortError::Validation("receipt lookup needs a hash".to_owned()))?;
                let hash: B256 = raw
                    .parse()
                    .map_err(|e| PortError::Validation(format!("invalid tx hash: {e}")))?;
                if !g.sent.contains(&hash) {
                    return Ok(Value::Null);
                }
                Ok(serde_json::json!({
                    "transactionHash": raw,
                    "blockNumber": format!("{:#x}", g.sent.len()),
                    "status": "0x1",
                }))
            }
            "eth_getBalance" => Ok(Value::String("0x0".to_owned())),
            _ => Err(PortError::NotImplemented(
                "deterministic provider has no contract state",
            )),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn proxy_call(&self, proxy: &ProxyRuntime, method: &str, params: Value) -> Result<Value, PortError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = proxy
            .client
            .post(&proxy.base_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("eip1193 proxy request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::Transport(format!("eip1193 proxy json decode failed: {e}")))?;
        if let Some(err) = body.get("error") {
            return Err(rpc_error_from_json(err));
        }
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "eip1193 proxy status {}: {}",
                status, body
            )));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("eip1193 proxy missing result".to_owned()))
    }

    #[cfg(target_arch = "wasm32")]
    async fn wasm_request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        use wasm_bindgen::JsCast;

        let provider = browser_provider()?;
        let request_fn = get_prop(&provider, "request")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .ok_or(PortError::NotImplemented(
                "window.ethereum.request is unavailable",
            ))?;

        let request = serde_json::json!({
            "method": method,
            "params": params,
        });
        // Plain JS objects, not Maps, for nested params such as nativeCurrency.
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let request_js = serde::Serialize::serialize(&request, &serializer)
            .map_err(|e| PortError::Transport(format!("failed to encode wasm request: {e}")))?;
        let promise_js = request_fn.call1(&provider, &request_js).map_err(|e| {
            PortError::Transport(format!("provider request dispatch failed: {e:?}"))
        })?;
        let promise = promise_js.dyn_into::<js_sys::Promise>().map_err(|_| {
            PortError::Transport("provider request did not return Promise".to_owned())
        })?;
        let result_js = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(rpc_error_from_js)?;
        if result_js.is_null() || result_js.is_undefined() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result_js)
            .map_err(|e| PortError::Transport(format!("failed to decode wasm response: {e}")))
    }

    #[cfg(target_arch = "wasm32")]
    fn register_browser_hooks(&self) -> Result<(), PortError> {
        use wasm_bindgen::{closure::Closure, JsCast, JsValue};

        let provider = browser_provider()?;
        let on_fn = get_prop(&provider, "on")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .or_else(|| {
                get_prop(&provider, "addListener")
                    .ok()
                    .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            })
            .ok_or(PortError::NotImplemented(
                "provider does not expose on/addListener",
            ))?;

        let mut hooks = self
            .hooks
            .lock()
            .map_err(|e| PortError::Transport(format!("provider hooks lock poisoned: {e}")))?;
        if hooks.accounts_changed.is_some() && hooks.chain_changed.is_some() {
            return Ok(());
        }

        let state_for_accounts = Arc::clone(&self.state);
        let accounts_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let mut accounts = Vec::new();
            if js_sys::Array::is_array(&value) {
                for item in js_sys::Array::from(&value).iter() {
                    if let Some(addr) = item.as_string().and_then(|raw| raw.parse::<Address>().ok()) {
                        accounts.push(addr);
                    }
                }
            }
            if let Ok(mut g) = state_for_accounts.lock() {
                let payload = accounts_json(&accounts).to_string();
                g.accounts = accounts;
                push_event(&mut g, ProviderEventKind::AccountsChanged, payload);
            }
        });

        let state_for_chain = Arc::clone(&self.state);
        let chain_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            if let Ok(chain_id) = js_chain_id_to_u64(value) {
                if let Ok(mut g) = state_for_chain.lock() {
                    g.chain_id = chain_id;
                    push_event(&mut g, ProviderEventKind::ChainChanged, chain_id.to_string());
                }
            }
        });

        on_fn
            .call2(
                &provider,
                &JsValue::from_str("accountsChanged"),
                accounts_cb.as_ref().unchecked_ref(),
            )
            .map_err(|e| PortError::Transport(format!("register accountsChanged failed: {e:?}")))?;
        on_fn
            .call2(
                &provider,
                &JsValue::from_str("chainChanged"),
                chain_cb.as_ref().unchecked_ref(),
            )
            .map_err(|e| PortError::Transport(format!("register chainChanged failed: {e:?}")))?;

        hooks.accounts_changed = Some(accounts_cb);
        hooks.chain_changed = Some(chain_cb);
        tracing::info!("subscribed to wallet account and chain events");
        Ok(())
    }
}

impl ProviderMode {
    fn label(&self) -> &'static str {
        match self {
            ProviderMode::Disabled(_) => "disabled",
            ProviderMode::Deterministic => "deterministic",
            #[cfg(not(target_arch = "wasm32"))]
            ProviderMode::Proxy(_) => "proxy",
            #[cfg(target_arch = "wasm32")]
            ProviderMode::Browser => "browser",
        }
    }
}

impl ProviderPort for Eip1193Adapter {
    fn is_available(&self) -> bool {
        !matches!(self.mode, ProviderMode::Disabled(_))
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        tracing::debug!(method, "eip1193 request");
        match &self.mode {
            ProviderMode::Disabled(reason) => Err(PortError::Policy(reason.clone())),
            ProviderMode::Deterministic => self.deterministic_request(method, params),
            #[cfg(not(target_arch = "wasm32"))]
            ProviderMode::Proxy(proxy) => self.proxy_call(proxy, method, params).await,
            #[cfg(target_arch = "wasm32")]
            ProviderMode::Browser => self.wasm_request(method, params).await,
        }
    }

    fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError> {
        let mut g = self.lock_state()?;
        Ok(std::mem::take(&mut g.events))
    }
}

fn push_event(state: &mut ProviderState, kind: ProviderEventKind, value: String) {
    state.event_seq = state.event_seq.saturating_add(1);
    let sequence = state.event_seq;
    state.events.push(ProviderEvent {
        sequence,
        kind,
        value,
    });
}

fn accounts_json(accounts: &[Address]) -> Value {
    Value::Array(
        accounts
            .iter()
            .map(|a| Value::String(a.to_string()))
            .collect(),
    )
}

fn first_param_field<'a>(params: &'a Value, field: &str) -> Result<&'a Value, PortError> {
    params
        .get(0)
        .and_then(|p| p.get(field))
        .ok_or_else(|| PortError::Validation(format!("missing {field} parameter")))
}

/// JSON-RPC / EIP-1193 error object into a [`PortError`], keeping the code.
pub fn rpc_error_from_json(err: &Value) -> PortError {
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| err.to_string());
    match err.get("code").and_then(Value::as_i64) {
        Some(code) => PortError::Rpc { code, message },
        None => PortError::Transport(message),
    }
}

#[cfg(target_arch = "wasm32")]
fn rpc_error_from_js(err: wasm_bindgen::JsValue) -> PortError {
    let code = get_prop(&err, "code").ok().and_then(|c| c.as_f64());
    let message = get_prop(&err, "message")
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    match code {
        Some(code) => PortError::Rpc {
            code: code as i64,
            message,
        },
        None => PortError::Transport(message),
    }
}

#[cfg(target_arch = "wasm32")]
fn browser_provider() -> Result<wasm_bindgen::JsValue, PortError> {
    let window =
        web_sys::window().ok_or_else(|| PortError::Transport("missing window".to_owned()))?;
    let provider = get_prop(&window.into(), "ethereum")?;
    if provider.is_null() || provider.is_undefined() {
        return Err(PortError::NotFound("window.ethereum missing".to_owned()));
    }
    Ok(provider)
}

#[cfg(target_arch = "wasm32")]
fn get_prop(target: &wasm_bindgen::JsValue, key: &str) -> Result<wasm_bindgen::JsValue, PortError> {
    js_sys::Reflect::get(target, &wasm_bindgen::JsValue::from_str(key))
        .map_err(|e| PortError::Transport(format!("read provider property {key} failed: {e:?}")))
}

#[cfg(target_arch = "wasm32")]
fn js_chain_id_to_u64(value: wasm_bindgen::JsValue) -> Result<u64, PortError> {
    if let Some(s) = value.as_string() {
        return treasury_core::network::parse_chain_id_str(&s);
    }
    if let Some(num) = value.as_f64() {
        return Ok(num as u64);
    }
    Err(PortError::Validation("invalid JS chain id".to_owned()))
}
