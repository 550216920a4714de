//! Main application state and update loop

use std::time::Duration;

use alloy::primitives::Address;
use eframe::egui;

use treasury_adapters::DashboardConfig;
use treasury_core::format::short_address;
use treasury_core::governance::next_unlock;
use treasury_core::NetworkStatus;

use crate::bridge::{TaskOutcome, TreasuryBridge};
use crate::modals::{self, NetworkPromptAction};
use crate::sidebar;
use crate::state::{
    reopen_detail, CreateForm, DashboardState, DetailState, Modal, Notice, Page, Preferences,
    PREFERENCES_KEY,
};
use crate::ui;
use crate::views::detail::DetailContext;
use crate::views::{self, DetailAction, ViewAction};

/// Repaint cadence while a timelock countdown is on screen.
const TIMELOCK_REPAINT: Duration = Duration::from_secs(30);

/// The main application state
pub struct App {
    bridge: TreasuryBridge,
    prefs: Preferences,
    page: Page,
    status: NetworkStatus,
    /// Wrong-network prompt closed by the user for the current status.
    network_prompt_dismissed: bool,
    switching: bool,
    connecting: bool,
    dashboard: DashboardState,
    create: CreateForm,
    detail: Option<DetailState>,
    /// Detail pages left while one of their writes was still in flight.
    parked: Vec<DetailState>,
    notice: Notice,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let prefs: Preferences = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, PREFERENCES_KEY))
            .unwrap_or_default();

        let mut app = Self {
            bridge: TreasuryBridge::new(config),
            prefs,
            page: Page::Dashboard,
            status: NetworkStatus::Unknown,
            network_prompt_dismissed: false,
            switching: false,
            connecting: false,
            dashboard: DashboardState::default(),
            create: CreateForm::default(),
            detail: None,
            parked: Vec::new(),
            notice: Notice::default(),
        };
        app.bridge.check_network(&cc.egui_ctx);
        app.refresh_dashboard(&cc.egui_ctx);
        app
    }

    fn factory_configured(&self) -> bool {
        self.bridge.config().factory_configured()
    }

    /// Writes need an account on the required chain.
    fn can_write(&self) -> bool {
        matches!(self.status, NetworkStatus::Connected { .. })
    }

    fn refresh_dashboard(&mut self, ctx: &egui::Context) {
        if !self.factory_configured() || self.dashboard.loading {
            return;
        }
        self.dashboard.loading = true;
        self.bridge.load_dashboard(ctx);
    }

    fn navigate(&mut self, ctx: &egui::Context, page: Page) {
        tracing::debug!(?page, "navigate");
        self.page = page;
        match page {
            Page::Multisig(controller) => {
                let reuse = self
                    .detail
                    .as_ref()
                    .is_some_and(|detail| detail.controller == controller);
                if !reuse {
                    if let Some(previous) = self.detail.take().filter(DetailState::busy) {
                        self.parked.push(previous);
                    }
                    self.detail = Some(reopen_detail(&mut self.parked, controller));
                    self.bridge.load_multisig(ctx, controller);
                }
            }
            Page::Dashboard | Page::MyMultisigs => {
                if self.dashboard.data.is_none() {
                    self.refresh_dashboard(ctx);
                }
            }
            Page::CreateMultisig | Page::Settings => {}
        }
    }

    /// Wallet account or chain changed: drop everything derived from the old
    /// session and read it again.
    fn resync(&mut self, ctx: &egui::Context) {
        tracing::info!("wallet changed, resynchronising");
        self.status = NetworkStatus::Unknown;
        self.network_prompt_dismissed = false;
        self.switching = false;
        self.connecting = false;
        self.dashboard.invalidate();
        self.bridge.check_network(ctx);
        self.refresh_dashboard(ctx);
        if let Page::Multisig(controller) = self.page {
            if let Some(detail) = detail_for(&mut self.detail, controller) {
                detail.reset_data();
            } else {
                self.detail = Some(reopen_detail(&mut self.parked, controller));
            }
            self.bridge.load_multisig(ctx, controller);
        }
    }

    /// Clears every in-flight flag after the task runner itself failed.
    fn clear_pending(&mut self) {
        self.switching = false;
        self.connecting = false;
        self.dashboard.loading = false;
        self.create.submitting = false;
        self.parked.clear();
        if let Some(detail) = &mut self.detail {
            detail.loading = false;
            detail.listing_loading = false;
            detail.processing_tx = None;
            detail.pause_pending = false;
            detail.proposal_pending = false;
            detail.submit_form.submitting = false;
            detail.batch.submitting = false;
            detail.token_lookup.loading = false;
        }
    }

    // =========================================================================
    // TASK RESULTS
    // =========================================================================

    fn process_outcomes(&mut self, ctx: &egui::Context) {
        if !self.bridge.drain_provider_events().is_empty() {
            self.resync(ctx);
        }
        for outcome in self.bridge.drain_outcomes() {
            self.apply_outcome(ctx, outcome);
        }
        self.parked.retain(DetailState::busy);
    }

    fn apply_outcome(&mut self, ctx: &egui::Context, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Network(result) => {
                self.connecting = false;
                match result {
                    Ok(status) => {
                        if !matches!(status, NetworkStatus::WrongChain { .. }) {
                            self.network_prompt_dismissed = false;
                        }
                        self.status = status;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "wallet status check failed");
                        if self.status == NetworkStatus::Unknown {
                            self.status = NetworkStatus::Disconnected;
                        }
                        self.notice.set_error(e);
                    }
                }
            }
            TaskOutcome::Switched(result) => {
                self.switching = false;
                match result {
                    Ok(outcome) => {
                        tracing::info!(?outcome, "network switched");
                        self.notice.set_info(format!(
                            "Switched to {}",
                            self.bridge.config().chain.chain_name
                        ));
                        self.bridge.check_network(ctx);
                    }
                    Err(e) => self.notice.set_error(e),
                }
            }
            TaskOutcome::Dashboard(data) => {
                self.dashboard.loading = false;
                self.dashboard.data = Some(data);
            }
            TaskOutcome::Multisig { controller, result } => {
                let Some(detail) = detail_for(&mut self.detail, controller) else {
                    return;
                };
                detail.loading = false;
                match result {
                    Ok(multisig) => {
                        let owners = multisig.owners.clone();
                        detail.error = None;
                        detail.multisig = Some(multisig);
                        detail.listing_loading = true;
                        self.bridge.load_listing(ctx, controller, owners);
                    }
                    Err(e) => {
                        tracing::warn!(%controller, error = %e, "failed to load multisig");
                        detail.error = Some(e);
                    }
                }
            }
            TaskOutcome::Listing {
                controller,
                listing,
            } => {
                if let Some(detail) = detail_for(&mut self.detail, controller) {
                    detail.listing = listing;
                    detail.listing_loaded = true;
                    detail.listing_loading = false;
                }
            }
            TaskOutcome::Action {
                controller,
                label,
                result,
            } => {
                let open = detail_for(&mut self.detail, controller).is_some();
                let Some(detail) = write_target(&mut self.detail, &mut self.parked, controller)
                else {
                    return;
                };
                let submitted = detail.submit_form.submitting;
                let proposed = detail.proposal_pending;
                detail.processing_tx = None;
                detail.proposal_pending = false;
                detail.submit_form.submitting = false;
                match result {
                    Ok(outcome) => {
                        detail
                            .notice
                            .set_info(format!("{label} confirmed in {}", outcome.receipt.tx_hash));
                        detail.listing = outcome.listing;
                        detail.listing_loaded = true;
                        if submitted {
                            detail.submit_form.reset();
                            if matches!(detail.modal, Some(Modal::SubmitTransaction)) {
                                detail.modal = None;
                            }
                        }
                        if proposed {
                            detail.proposal.value.clear();
                            detail.proposal.owner.clear();
                            detail.proposal.owner_name.clear();
                            detail.proposal.percentage.clear();
                        }
                        // Balance, owners or config may have moved
                        if open {
                            detail.loading = true;
                            self.bridge.load_multisig(ctx, controller);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(%controller, %label, error = %e, "write failed");
                        if submitted {
                            detail.submit_form.error = Some(e.clone());
                        }
                        detail.notice.set_error(format!("{label} failed: {e}"));
                    }
                }
            }
            TaskOutcome::Batch {
                controller,
                outcome,
            } => {
                let Some(detail) = write_target(&mut self.detail, &mut self.parked, controller)
                else {
                    return;
                };
                detail.batch.submitting = false;
                for id in &outcome.confirmed {
                    detail.batch.selected.remove(id);
                }
                detail.listing = outcome.listing;
                detail.listing_loaded = true;
                match outcome.failed {
                    Some((tx_id, e)) => detail.notice.set_error(format!(
                        "Confirmed {} transaction(s); #{tx_id} failed: {e}",
                        outcome.confirmed.len()
                    )),
                    None => {
                        detail.notice.set_info(format!(
                            "Confirmed {} transaction(s)",
                            outcome.confirmed.len()
                        ));
                        if matches!(detail.modal, Some(Modal::BatchConfirm)) {
                            detail.modal = None;
                        }
                    }
                }
            }
            TaskOutcome::Paused { controller, result } => {
                let Some(detail) = write_target(&mut self.detail, &mut self.parked, controller)
                else {
                    return;
                };
                detail.pause_pending = false;
                match result {
                    Ok((receipt, config)) => {
                        let state = if config.paused { "paused" } else { "unpaused" };
                        detail
                            .notice
                            .set_info(format!("Treasury {state} in {}", receipt.tx_hash));
                        if let Some(multisig) = &mut detail.multisig {
                            multisig.config = config;
                        }
                    }
                    Err(e) => detail.notice.set_error(e),
                }
            }
            TaskOutcome::Created(result) => {
                self.create.submitting = false;
                match result {
                    Ok((receipt, controllers)) => {
                        self.create = CreateForm {
                            deployed: controllers.last().copied(),
                            ..CreateForm::default()
                        };
                        self.create
                            .notice
                            .set_info(format!("Treasury deployed in {}", receipt.tx_hash));
                        self.dashboard.invalidate();
                        self.refresh_dashboard(ctx);
                    }
                    Err(e) => self.create.notice.set_error(e),
                }
            }
            TaskOutcome::TokenBalance {
                wallet,
                token,
                result,
            } => {
                let Some(detail) = &mut self.detail else {
                    return;
                };
                let current = detail.multisig.as_ref().map(|m| m.wallet) == Some(wallet)
                    && detail.token_lookup.token.trim().eq_ignore_ascii_case(&token.to_string());
                if current {
                    detail.token_lookup.loading = false;
                    detail.token_lookup.result = Some(result);
                }
            }
            TaskOutcome::RuntimeUnavailable(e) => {
                tracing::error!(error = %e, "failed to start a background task");
                self.clear_pending();
                self.notice
                    .set_error(format!("Background task could not start: {e}"));
            }
        }
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    fn dispatch(&mut self, ctx: &egui::Context, action: ViewAction) {
        match action {
            ViewAction::Navigate(page) => self.navigate(ctx, page),
            ViewAction::OpenMultisig(controller) => {
                self.navigate(ctx, Page::Multisig(controller))
            }
            ViewAction::Connect => {
                if !self.connecting {
                    self.connecting = true;
                    self.bridge.connect(ctx);
                }
            }
            ViewAction::SwitchNetwork => {
                if !self.switching {
                    self.switching = true;
                    self.bridge.switch_network(ctx);
                }
            }
            ViewAction::RefreshDashboard => self.refresh_dashboard(ctx),
            ViewAction::Create(params) => {
                self.create.submitting = true;
                self.create.deployed = None;
                self.create.notice.clear();
                self.bridge.create_multisig(ctx, params);
            }
            ViewAction::Detail(action) => self.dispatch_detail(ctx, action),
        }
    }

    fn dispatch_detail(&mut self, ctx: &egui::Context, action: DetailAction) {
        let Some(detail) = &mut self.detail else {
            return;
        };
        let controller = detail.controller;
        let owners = detail
            .multisig
            .as_ref()
            .map(|m| m.owners.clone())
            .unwrap_or_default();

        match action {
            DetailAction::Reload => {
                detail.loading = true;
                detail.error = None;
                self.bridge.load_multisig(ctx, controller);
            }
            DetailAction::RefreshTransactions => {
                if !detail.listing_loading {
                    detail.listing_loading = true;
                    self.bridge.load_listing(ctx, controller, owners);
                }
            }
            DetailAction::Vote { action, tx_id } => {
                if detail.busy() {
                    return;
                }
                detail.processing_tx = Some(tx_id);
                detail.notice.clear();
                self.bridge.vote(ctx, controller, owners, action, tx_id);
            }
            DetailAction::SetPaused(paused) => {
                if detail.busy() {
                    return;
                }
                detail.pause_pending = true;
                detail.notice.clear();
                self.bridge.set_paused(ctx, controller, paused);
            }
            DetailAction::Propose(proposal) => {
                if detail.busy() {
                    return;
                }
                detail.proposal_pending = true;
                detail.notice.clear();
                self.bridge.propose(ctx, controller, owners, proposal);
            }
            DetailAction::Submit(request) => {
                if detail.busy() {
                    return;
                }
                detail.submit_form.submitting = true;
                detail.submit_form.error = None;
                detail.notice.clear();
                self.bridge.submit_transfer(ctx, controller, owners, request);
            }
            DetailAction::ConfirmBatch(tx_ids) => {
                if detail.busy() || tx_ids.is_empty() {
                    return;
                }
                detail.batch.submitting = true;
                detail.notice.clear();
                self.bridge.confirm_batch(ctx, controller, owners, tx_ids);
            }
            DetailAction::TokenBalance(token) => {
                let Some(wallet) = detail.multisig.as_ref().map(|m| m.wallet) else {
                    return;
                };
                detail.token_lookup.loading = true;
                detail.token_lookup.result = None;
                self.bridge.token_balance(ctx, wallet, token);
            }
        }
    }

    // =========================================================================
    // LAYOUT
    // =========================================================================

    fn render_header(&mut self, ctx: &egui::Context) -> Option<ViewAction> {
        let mut action = None;
        let chain_name = self.bridge.config().chain.chain_name.clone();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if self.prefs.sidebar_collapsed
                    && ui.button("☰").on_hover_text("Show navigation").clicked()
                {
                    self.prefs.sidebar_collapsed = false;
                }
                ui.heading(
                    egui::RichText::new("🏦 Treasury Dashboard")
                        .size(22.0)
                        .color(ui::ACCENT),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.status.account() {
                        Some(account) => {
                            let response = ui
                                .button(egui::RichText::new(short_address(&account, 4)).monospace())
                                .on_hover_text("Click to disconnect");
                            if response.clicked() {
                                // Injected wallets cannot be disconnected remotely
                                self.status = NetworkStatus::Disconnected;
                            }
                        }
                        None => {
                            let label = if self.connecting { "Connecting..." } else { "Connect Wallet" };
                            let enabled = !self.connecting
                                && !matches!(self.status, NetworkStatus::ProviderMissing);
                            if ui::primary_button_enabled(ui, label, enabled).clicked() {
                                action = Some(ViewAction::Connect);
                            }
                        }
                    }

                    let theme = if self.prefs.dark_mode { "☀" } else { "🌙" };
                    if ui.button(theme).on_hover_text("Toggle theme").clicked() {
                        self.prefs.dark_mode = !self.prefs.dark_mode;
                    }

                    match &self.status {
                        NetworkStatus::Connected { .. } => {
                            ui.label(egui::RichText::new(format!("● {chain_name}")).color(ui::SUCCESS_GREEN));
                        }
                        NetworkStatus::WrongChain { .. } => {
                            let response = ui.add(
                                egui::Label::new(
                                    egui::RichText::new("● Wrong Network").color(ui::ERROR_RED),
                                )
                                .sense(egui::Sense::click()),
                            );
                            if response.on_hover_text("Show network details").clicked() {
                                self.network_prompt_dismissed = false;
                            }
                        }
                        NetworkStatus::ProviderMissing => {
                            ui.label(egui::RichText::new("No wallet").color(ui::WARNING_ORANGE));
                        }
                        NetworkStatus::Disconnected => {
                            ui.label(egui::RichText::new("○ Not connected").weak());
                        }
                        NetworkStatus::Unknown => {
                            ui.spinner();
                        }
                    }
                });
            });
            ui.add_space(4.0);
        });

        action
    }

    fn render_page(&mut self, ui: &mut egui::Ui) -> Option<ViewAction> {
        let factory_configured = self.factory_configured();
        let connected = self.can_write();
        let config = self.bridge.config();

        match self.page {
            Page::Dashboard => views::dashboard::render(
                ui,
                &self.dashboard,
                &self.status,
                &config.chain,
                factory_configured,
            ),
            Page::CreateMultisig => {
                views::create::render(ui, &mut self.create, factory_configured, connected)
            }
            Page::MyMultisigs => views::multisigs::render(
                ui,
                &mut self.dashboard,
                &config.chain,
                self.status.account(),
                factory_configured,
            ),
            Page::Settings => views::settings::render(
                ui,
                &mut self.prefs,
                config,
                &self.status,
                self.bridge.provider().mode_label(),
            ),
            Page::Multisig(_) => {
                let now_secs = self.bridge.now_secs();
                let detail = self.detail.as_mut()?;
                let cx = DetailContext {
                    chain: &config.chain,
                    now_secs,
                    connected,
                };
                views::detail::render(ui, detail, &cx)
            }
        }
    }

    fn render_modals(&mut self, ctx: &egui::Context) -> Option<ViewAction> {
        let mut action = None;

        if !self.network_prompt_dismissed {
            match modals::network_prompt(
                ctx,
                &self.status,
                &self.bridge.config().chain,
                self.switching,
            ) {
                Some(NetworkPromptAction::Switch) => action = Some(ViewAction::SwitchNetwork),
                Some(NetworkPromptAction::Dismiss) => self.network_prompt_dismissed = true,
                None => {}
            }
        }

        let connected = self.can_write();
        if let (Page::Multisig(_), Some(detail)) = (self.page, &mut self.detail) {
            let cx = DetailContext {
                chain: &self.bridge.config().chain,
                now_secs: self.bridge.now_secs(),
                connected,
            };
            if let Some(detail_action) = modals::detail_modal(ctx, detail, &cx) {
                action = Some(detail_action.into());
            }
        }

        action
    }

    /// Keeps "Locked: Xh" badges and the next-unlock countdown moving.
    fn schedule_timelock_repaint(&self, ctx: &egui::Context) {
        let Some(detail) = &self.detail else {
            return;
        };
        if !matches!(self.page, Page::Multisig(_)) {
            return;
        }
        if next_unlock(&detail.listing.transactions, self.bridge.now_secs()).is_some() {
            ctx.request_repaint_after(TIMELOCK_REPAINT);
        }
    }
}

/// The open detail page, if it still shows `controller`. Results for a page the
/// user already left are dropped.
fn detail_for(detail: &mut Option<DetailState>, controller: Address) -> Option<&mut DetailState> {
    detail.as_mut().filter(|detail| detail.controller == controller)
}

/// Where a write result lands: the open detail page or a parked one.
fn write_target<'a>(
    detail: &'a mut Option<DetailState>,
    parked: &'a mut [DetailState],
    controller: Address,
) -> Option<&'a mut DetailState> {
    match detail {
        Some(open) if open.controller == controller => Some(open),
        _ => parked.iter_mut().find(|detail| detail.controller == controller),
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(if self.prefs.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        self.process_outcomes(ctx);

        let mut actions = Vec::new();
        actions.extend(self.render_header(ctx));

        if let Some(page) = sidebar::render(ctx, &mut self.prefs, self.page) {
            actions.push(ViewAction::Navigate(page));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(10.0);
                if matches!(self.status, NetworkStatus::ProviderMissing) {
                    ui::warning_message(
                        ui,
                        "No wallet provider detected. Install a browser wallet or set TREASURY_PROVIDER.",
                        ui::WARNING_ORANGE,
                    );
                }
                ui::notice(ui, &self.notice);
                actions.extend(self.render_page(ui));
                ui.add_space(20.0);
            });
        });

        actions.extend(self.render_modals(ctx));

        for action in actions {
            self.dispatch(ctx, action);
        }

        self.schedule_timelock_repaint(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, PREFERENCES_KEY, &self.prefs);
    }
}
