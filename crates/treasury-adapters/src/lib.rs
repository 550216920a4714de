pub mod calldata;
pub mod client;
pub mod clock;
pub mod config;
pub mod contracts;
pub mod eip1193;

pub use client::ContractClient;
pub use clock::SystemClockAdapter;
pub use config::{DashboardConfig, ProviderPreference};
pub use eip1193::Eip1193Adapter;

/// The client the dashboard runs against.
pub type DashboardClient = ContractClient<Eip1193Adapter, SystemClockAdapter>;
