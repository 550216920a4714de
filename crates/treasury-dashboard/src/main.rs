//! Treasury Dashboard: a Rust-native client for percentage-weighted multisig treasuries

use eframe::egui;
use treasury_adapters::DashboardConfig;

mod app;
mod bridge;
mod modals;
mod sidebar;
mod state;
mod ui;
mod views;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = DashboardConfig::from_env();
    tracing::info!(
        chain_id = config.chain.chain_id,
        factory = ?config.factory_address,
        "Starting Treasury Dashboard"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Treasury Dashboard")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Treasury Dashboard",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::App::new(cc, config)))),
    )
    .map_err(|e| eyre::eyre!("failed to start the dashboard: {e}"))
}

#[cfg(target_arch = "wasm32")]
fn main() {
    tracing_wasm::set_as_global_default();

    let config = DashboardConfig::from_env();
    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async move {
        let canvas = match find_canvas("the_canvas_id") {
            Ok(canvas) => canvas,
            Err(e) => {
                tracing::error!("{e}");
                return;
            }
        };
        let started = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(move |cc| Ok(Box::new(app::App::new(cc, config)))),
            )
            .await;
        if let Err(e) = started {
            tracing::error!("failed to start the dashboard: {e:?}");
        }
    });
}

#[cfg(target_arch = "wasm32")]
fn find_canvas(id: &str) -> eyre::Result<web_sys::HtmlCanvasElement> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| eyre::eyre!("no document available"))?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| eyre::eyre!("canvas #{id} not found"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| eyre::eyre!("#{id} is not a canvas"))
}
