#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use alloy::hex;
use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use serde_json::{json, Value};

use treasury_core::{ClockPort, PortError, ProviderEvent, ProviderPort};

pub const ACCOUNT: &str = "0x00000000000000000000000000000000000000a1";

/// Answers `eth_call` by exact calldata and scripts the rest of the
/// write path.
#[derive(Debug, Default)]
pub struct ScriptedRpc {
    calls: Mutex<HashMap<Vec<u8>, Result<Vec<u8>, PortError>>>,
    receipts: Mutex<VecDeque<Value>>,
    balances: Mutex<HashMap<String, String>>,
    pub log: Mutex<Vec<(String, Value)>>,
}

impl ScriptedRpc {
    pub fn on_call<C: SolCall>(&self, call: C, returns: Vec<u8>) {
        self.calls
            .lock()
            .expect("calls lock")
            .insert(call.abi_encode(), Ok(returns));
    }

    pub fn fail_call<C: SolCall>(&self, call: C, err: PortError) {
        self.calls
            .lock()
            .expect("calls lock")
            .insert(call.abi_encode(), Err(err));
    }

    /// Receipts handed out in order; `null` entries mean "not mined yet".
    pub fn push_receipt(&self, receipt: Value) {
        self.receipts.lock().expect("receipts lock").push_back(receipt);
    }

    pub fn set_native_balance(&self, address: Address, hex_wei: &str) {
        self.balances
            .lock()
            .expect("balances lock")
            .insert(address.to_string().to_lowercase(), hex_wei.to_owned());
    }

    pub fn methods(&self) -> Vec<String> {
        self.log
            .lock()
            .expect("log lock")
            .iter()
            .map(|(m, _)| m.clone())
            .collect()
    }
}

impl ProviderPort for ScriptedRpc {
    fn is_available(&self) -> bool {
        true
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        self.log
            .lock()
            .expect("log lock")
            .push((method.to_owned(), params.clone()));
        match method {
            "eth_accounts" => Ok(json!([ACCOUNT])),
            "eth_call" => {
                let data = params[0]["data"].as_str().expect("calldata");
                let bytes = hex::decode(data).expect("calldata hex");
                match self.calls.lock().expect("calls lock").get(&bytes) {
                    Some(Ok(ret)) => Ok(Value::String(hex::encode_prefixed(ret))),
                    Some(Err(err)) => Err(err.clone()),
                    None => Err(PortError::Rpc {
                        code: -32000,
                        message: "execution reverted".to_owned(),
                    }),
                }
            }
            "eth_getBalance" => {
                let who = params[0].as_str().expect("address").to_lowercase();
                Ok(json!(self
                    .balances
                    .lock()
                    .expect("balances lock")
                    .get(&who)
                    .cloned()
                    .unwrap_or_else(|| "0x0".to_owned())))
            }
            "eth_sendTransaction" => Ok(json!(
                "0x1111111111111111111111111111111111111111111111111111111111111111"
            )),
            "eth_getTransactionReceipt" => Ok(self
                .receipts
                .lock()
                .expect("receipts lock")
                .pop_front()
                .unwrap_or(Value::Null)),
            _ => Err(PortError::NotImplemented("unscripted method")),
        }
    }

    fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError> {
        Ok(Vec::new())
    }
}

/// Returns immediately and counts how often it was asked to sleep.
#[derive(Debug, Default)]
pub struct CountingClock {
    pub sleeps: AtomicU64,
}

impl ClockPort for CountingClock {
    fn now_secs(&self) -> Result<u64, PortError> {
        Ok(1_739_750_400)
    }

    async fn sleep_ms(&self, _ms: u64) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
    }
}
