#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use alloy::primitives::{Address, Bytes, B256, U256};
use serde_json::Value;

use treasury_core::domain::{DeploymentCount, FactoryEntry};
use treasury_core::{
    GovernanceConfig, Owner, PortError, ProviderEvent, ProviderPort, TreasuryPort, TreasuryTx,
    TxReceipt, VoteAction, WriteRequest,
};

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn owner(byte: u8, percentage: u64) -> Owner {
    Owner {
        address: addr(byte),
        name: String::new(),
        percentage,
        removable: true,
    }
}

pub fn pending_tx(id: u64, confirmations: u64) -> TreasuryTx {
    TreasuryTx {
        id,
        initiator: addr(0xA1),
        to: addr(0xB2),
        value: U256::from(1_000u64),
        data: Bytes::new(),
        is_token_transfer: false,
        token_address: Address::ZERO,
        executed: false,
        confirmation_count: confirmations,
        timestamp: 1_700_000_000,
        timelock_end: 0,
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub controllers: Vec<Address>,
    pub wallets: HashMap<Address, Address>,
    pub names: HashMap<Address, String>,
    pub owners: Vec<Owner>,
    pub config: GovernanceConfig,
    pub balance: U256,
    pub transactions: Vec<TreasuryTx>,
    pub confirmations: HashSet<(u64, Address)>,
    pub sender: Address,
    pub submitted: Vec<WriteRequest>,
    pub transaction_reads: Vec<u64>,
    pub fail_owners: bool,
    pub fail_company_wallet: bool,
    pub fail_confirmation_reads: bool,
    pub fail_transaction_read_at: Option<u64>,
    pub fail_vote_on: Option<u64>,
    pub unreadable_controllers: HashSet<Address>,
}

/// In-memory Controller set that applies writes the way the contracts would.
#[derive(Debug, Default)]
pub struct FakeTreasury {
    pub state: Mutex<FakeState>,
}

impl FakeTreasury {
    pub fn with_owners(owners: Vec<Owner>, required_percentage: u64) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().expect("state lock");
            state.sender = owners.first().map(|o| o.address).unwrap_or(addr(0x01));
            state.owners = owners;
            state.config = GovernanceConfig {
                required_percentage,
                name: "Ops Treasury".to_owned(),
                timelock_period: 3_600,
                expiry_period: 604_800,
                min_owners: 1,
                ..GovernanceConfig::default()
            };
            state.balance = U256::from(5_000u64);
        }
        fake
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().expect("state lock");
        f(&mut state)
    }
}

impl TreasuryPort for FakeTreasury {
    async fn all_controllers(&self, _factory: Address) -> Result<Vec<Address>, PortError> {
        Ok(self.with_state(|s| s.controllers.clone()))
    }

    async fn deployment_count(&self, _factory: Address) -> Result<DeploymentCount, PortError> {
        let n = self.with_state(|s| s.controllers.len() as u64);
        Ok(DeploymentCount {
            controllers: n,
            wallets: n,
        })
    }

    async fn multisig_info(
        &self,
        _factory: Address,
        controller: Address,
    ) -> Result<FactoryEntry, PortError> {
        self.with_state(|s| {
            if s.unreadable_controllers.contains(&controller) {
                return Err(PortError::Transport("execution reverted".to_owned()));
            }
            Ok(FactoryEntry {
                name: s.names.get(&controller).cloned().unwrap_or_default(),
                wallet: s.wallets.get(&controller).copied().unwrap_or(controller),
                exists: true,
            })
        })
    }

    async fn company_wallet(&self, controller: Address) -> Result<Address, PortError> {
        self.with_state(|s| {
            if s.fail_company_wallet {
                return Err(PortError::Transport("companyWallet reverted".to_owned()));
            }
            Ok(s.wallets.get(&controller).copied().unwrap_or(addr(0xCC)))
        })
    }

    async fn owners(&self, _controller: Address) -> Result<Vec<Owner>, PortError> {
        self.with_state(|s| {
            if s.fail_owners {
                Err(PortError::Transport("getOwners failed".to_owned()))
            } else {
                Ok(s.owners.clone())
            }
        })
    }

    async fn config(&self, _controller: Address) -> Result<GovernanceConfig, PortError> {
        Ok(self.with_state(|s| s.config.clone()))
    }

    async fn transaction(
        &self,
        _controller: Address,
        tx_id: u64,
    ) -> Result<TreasuryTx, PortError> {
        self.with_state(|s| {
            s.transaction_reads.push(tx_id);
            if s.fail_transaction_read_at == Some(tx_id) {
                return Err(PortError::Transport("rpc timeout".to_owned()));
            }
            Ok(s
                .transactions
                .iter()
                .find(|tx| tx.id == tx_id)
                .cloned()
                .unwrap_or(TreasuryTx {
                    initiator: Address::ZERO,
                    ..pending_tx(tx_id, 0)
                }))
        })
    }

    async fn is_confirmed(
        &self,
        _controller: Address,
        tx_id: u64,
        owner: Address,
    ) -> Result<bool, PortError> {
        self.with_state(|s| {
            if s.fail_confirmation_reads {
                Err(PortError::NotImplemented("confirmations"))
            } else {
                Ok(s.confirmations.contains(&(tx_id, owner)))
            }
        })
    }

    async fn wallet_balance(&self, _wallet: Address) -> Result<U256, PortError> {
        Ok(self.with_state(|s| s.balance))
    }

    async fn token_balance(&self, _wallet: Address, _token: Address) -> Result<U256, PortError> {
        Ok(U256::from(42u64))
    }

    async fn submit(&self, request: &WriteRequest) -> Result<TxReceipt, PortError> {
        self.with_state(|s| {
            s.submitted.push(request.clone());
            let sender = s.sender;
            match request {
                WriteRequest::Vote { action, tx_id, .. } => {
                    if s.fail_vote_on == Some(*tx_id) {
                        return Err(PortError::Rpc {
                            code: 4001,
                            message: "User denied transaction signature".to_owned(),
                        });
                    }
                    let tx = s
                        .transactions
                        .iter_mut()
                        .find(|tx| tx.id == *tx_id)
                        .ok_or_else(|| PortError::Reverted("unknown tx".to_owned()))?;
                    match action {
                        VoteAction::Confirm => {
                            tx.confirmation_count += 1;
                            s.confirmations.insert((*tx_id, sender));
                        }
                        VoteAction::Revoke => {
                            tx.confirmation_count = tx.confirmation_count.saturating_sub(1);
                            s.confirmations.remove(&(*tx_id, sender));
                        }
                        VoteAction::Execute => tx.executed = true,
                    }
                }
                WriteRequest::SetPaused { paused, .. } => s.config.paused = *paused,
                WriteRequest::Transfer { .. } | WriteRequest::Propose { .. } => {
                    let id = s.transactions.len() as u64;
                    s.transactions.push(TreasuryTx {
                        initiator: sender,
                        ..pending_tx(id, 0)
                    });
                }
                WriteRequest::CreateMultiSig { .. } => {
                    let next = addr(0x70 + s.controllers.len() as u8);
                    s.controllers.push(next);
                }
                WriteRequest::WalletExecute { .. } => {
                    return Err(PortError::Reverted("only controller".to_owned()));
                }
            }
            Ok(TxReceipt {
                tx_hash: B256::repeat_byte(s.submitted.len() as u8),
                block_number: Some(s.submitted.len() as u64),
            })
        })
    }
}

/// Wallet stand-in answering from per-method queues and logging every call.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    pub available: bool,
    pub responses: Mutex<HashMap<String, VecDeque<Result<Value, PortError>>>>,
    pub log: Mutex<Vec<(String, Value)>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    pub fn respond(&self, method: &str, result: Result<Value, PortError>) {
        self.responses
            .lock()
            .expect("responses lock")
            .entry(method.to_owned())
            .or_default()
            .push_back(result);
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

impl ProviderPort for ScriptedProvider {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        self.log
            .lock()
            .expect("log lock")
            .push((method.to_owned(), params));
        self.responses
            .lock()
            .expect("responses lock")
            .get_mut(method)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(PortError::NotImplemented("unscripted method")))
    }

    fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError> {
        Ok(Vec::new())
    }
}
