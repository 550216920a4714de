//! Bridge between the egui shell and the treasury workspace crates.
//! Every network call leaves the UI thread here and comes back through the inbox.

use std::future::Future;
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, U256};
use eframe::egui;

use treasury_adapters::{
    ContractClient, DashboardClient, DashboardConfig, Eip1193Adapter, SystemClockAdapter,
};
use treasury_core::network::{self, NetworkStatus, SwitchOutcome};
use treasury_core::{
    ActionOutcome, BatchOutcome, ClockPort, CreateMultiSigParams, DashboardData,
    GovernanceConfig, GovernanceProposal, MultiSig, Owner, ProviderEvent, ProviderPort,
    TransferRequest, TreasuryService, TxListing, TxReceipt, VoteAction,
};

pub type Service = TreasuryService<DashboardClient>;

/// Results posted back by background tasks.
#[derive(Debug)]
pub enum TaskOutcome {
    Network(Result<NetworkStatus, String>),
    Switched(Result<SwitchOutcome, String>),
    Dashboard(DashboardData),
    Multisig {
        controller: Address,
        result: Result<MultiSig, String>,
    },
    Listing {
        controller: Address,
        listing: TxListing,
    },
    Action {
        controller: Address,
        label: String,
        result: Result<ActionOutcome, String>,
    },
    Batch {
        controller: Address,
        outcome: BatchOutcome,
    },
    Paused {
        controller: Address,
        result: Result<(TxReceipt, GovernanceConfig), String>,
    },
    Created(Result<(TxReceipt, Vec<Address>), String>),
    TokenBalance {
        wallet: Address,
        token: Address,
        result: Result<U256, String>,
    },
    RuntimeUnavailable(String),
}

/// Acquire mutex lock, recovering from poisoned state if necessary.
macro_rules! lock_or_recover {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("inbox mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    };
}

#[derive(Clone, Default)]
pub struct Inbox(Arc<Mutex<Vec<TaskOutcome>>>);

impl Inbox {
    pub fn push(&self, outcome: TaskOutcome) {
        lock_or_recover!(self.0).push(outcome);
    }

    pub fn drain(&self) -> Vec<TaskOutcome> {
        std::mem::take(&mut *lock_or_recover!(self.0))
    }
}

#[derive(Clone)]
pub struct TreasuryBridge {
    service: Arc<Service>,
    config: Arc<DashboardConfig>,
    inbox: Inbox,
}

impl TreasuryBridge {
    pub fn new(config: DashboardConfig) -> Self {
        let provider = Eip1193Adapter::with_config(&config);
        if let Err(e) = provider.watch_wallet_events() {
            tracing::warn!(error = %e, "could not subscribe to wallet events");
        }
        tracing::info!(mode = provider.mode_label(), "wallet provider ready");

        let client = ContractClient::new(
            provider,
            SystemClockAdapter,
            config.receipt_poll_interval_ms,
        );
        Self {
            service: Arc::new(TreasuryService::new(client, config.tx_probe_limit)),
            config: Arc::new(config),
            inbox: Inbox::default(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn provider(&self) -> &Eip1193Adapter {
        self.service.port.provider()
    }

    pub fn now_secs(&self) -> u64 {
        self.service.port.clock().now_secs().unwrap_or_default()
    }

    pub fn drain_outcomes(&self) -> Vec<TaskOutcome> {
        self.inbox.drain()
    }

    pub fn drain_provider_events(&self) -> Vec<ProviderEvent> {
        match self.provider().drain_events() {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(error = %e, "failed to drain wallet events");
                Vec::new()
            }
        }
    }

    // =========================================================================
    // WALLET
    // =========================================================================

    pub fn check_network(&self, ctx: &egui::Context) {
        let required = self.config.chain.chain_id;
        self.spawn(ctx, move |service| async move {
            let status = network::check_network_status(service.port.provider(), required).await;
            TaskOutcome::Network(status.map_err(|e| e.to_string()))
        });
    }

    pub fn connect(&self, ctx: &egui::Context) {
        let required = self.config.chain.chain_id;
        self.spawn(ctx, move |service| async move {
            let status = network::connect(service.port.provider(), required).await;
            TaskOutcome::Network(status.map_err(|e| e.to_string()))
        });
    }

    pub fn switch_network(&self, ctx: &egui::Context) {
        let chain = self.config.chain.clone();
        self.spawn(ctx, move |service| async move {
            let outcome = network::switch_network(service.port.provider(), &chain).await;
            TaskOutcome::Switched(outcome.map_err(|e| e.to_string()))
        });
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub fn load_dashboard(&self, ctx: &egui::Context) {
        let factory = self.config.factory_address;
        self.spawn(ctx, move |service| async move {
            TaskOutcome::Dashboard(service.load_dashboard(factory).await)
        });
    }

    pub fn load_multisig(&self, ctx: &egui::Context, controller: Address) {
        self.spawn(ctx, move |service| async move {
            let result = service.load_multisig(controller).await;
            TaskOutcome::Multisig {
                controller,
                result: result.map_err(|e| e.to_string()),
            }
        });
    }

    pub fn load_listing(&self, ctx: &egui::Context, controller: Address, owners: Vec<Owner>) {
        self.spawn(ctx, move |service| async move {
            let listing = service.load_listing(controller, &owners).await;
            TaskOutcome::Listing {
                controller,
                listing,
            }
        });
    }

    pub fn token_balance(&self, ctx: &egui::Context, wallet: Address, token: Address) {
        self.spawn(ctx, move |service| async move {
            let result = service.token_balance(wallet, token).await;
            TaskOutcome::TokenBalance {
                wallet,
                token,
                result: result.map_err(|e| e.to_string()),
            }
        });
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    pub fn vote(
        &self,
        ctx: &egui::Context,
        controller: Address,
        owners: Vec<Owner>,
        action: VoteAction,
        tx_id: u64,
    ) {
        self.spawn(ctx, move |service| async move {
            let result = service.vote(controller, &owners, action, tx_id).await;
            TaskOutcome::Action {
                controller,
                label: format!("{} #{tx_id}", action.label()),
                result: result.map_err(|e| e.to_string()),
            }
        });
    }

    pub fn confirm_batch(
        &self,
        ctx: &egui::Context,
        controller: Address,
        owners: Vec<Owner>,
        tx_ids: Vec<u64>,
    ) {
        self.spawn(ctx, move |service| async move {
            let outcome = service.confirm_batch(controller, &owners, &tx_ids).await;
            TaskOutcome::Batch {
                controller,
                outcome,
            }
        });
    }

    pub fn submit_transfer(
        &self,
        ctx: &egui::Context,
        controller: Address,
        owners: Vec<Owner>,
        request: TransferRequest,
    ) {
        self.spawn(ctx, move |service| async move {
            let result = service.submit_transfer(controller, &owners, request).await;
            TaskOutcome::Action {
                controller,
                label: "submit transaction".to_owned(),
                result: result.map_err(|e| e.to_string()),
            }
        });
    }

    pub fn propose(
        &self,
        ctx: &egui::Context,
        controller: Address,
        owners: Vec<Owner>,
        proposal: GovernanceProposal,
    ) {
        self.spawn(ctx, move |service| async move {
            let label = proposal.label().to_owned();
            let result = service.propose(controller, &owners, proposal).await;
            TaskOutcome::Action {
                controller,
                label,
                result: result.map_err(|e| e.to_string()),
            }
        });
    }

    pub fn set_paused(&self, ctx: &egui::Context, controller: Address, paused: bool) {
        self.spawn(ctx, move |service| async move {
            let result = service.set_paused(controller, paused).await;
            TaskOutcome::Paused {
                controller,
                result: result.map_err(|e| e.to_string()),
            }
        });
    }

    pub fn create_multisig(&self, ctx: &egui::Context, params: CreateMultiSigParams) {
        let Some(factory) = self.config.factory_address else {
            self.inbox.push(TaskOutcome::Created(Err(
                "factory address is not configured".to_owned(),
            )));
            return;
        };
        self.spawn(ctx, move |service| async move {
            let result = service.create_multisig(factory, params).await;
            TaskOutcome::Created(result.map_err(|e| e.to_string()))
        });
    }

    // =========================================================================
    // TASKS
    // =========================================================================

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn<F, Fut>(&self, ctx: &egui::Context, task: F)
    where
        F: FnOnce(Arc<Service>) -> Fut + Send + 'static,
        Fut: Future<Output = TaskOutcome>,
    {
        let service = Arc::clone(&self.service);
        let inbox = self.inbox.clone();
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let outcome = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt.block_on(task(service)),
                Err(e) => TaskOutcome::RuntimeUnavailable(e.to_string()),
            };
            inbox.push(outcome);
            ctx.request_repaint();
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn<F, Fut>(&self, ctx: &egui::Context, task: F)
    where
        F: FnOnce(Arc<Service>) -> Fut + 'static,
        Fut: Future<Output = TaskOutcome> + 'static,
    {
        let service = Arc::clone(&self.service);
        let inbox = self.inbox.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = task(service).await;
            inbox.push(outcome);
            ctx.request_repaint();
        });
    }
}
