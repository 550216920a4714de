mod common;

use alloy::primitives::Address;
use common::ScriptedProvider;
use serde_json::json;
use treasury_core::network::{check_network_status, connect, switch_network};
use treasury_core::{ChainParams, NetworkStatus, PortError, SwitchOutcome};

const ACCOUNT: &str = "0x00000000000000000000000000000000000000a1";
const BASE_SEPOLIA: u64 = 84_532;

fn account() -> Address {
    ACCOUNT.parse().expect("account")
}

#[tokio::test]
async fn missing_provider_is_reported() {
    let provider = ScriptedProvider::default();
    let status = check_network_status(&provider, BASE_SEPOLIA)
        .await
        .expect("status");
    assert_eq!(status, NetworkStatus::ProviderMissing);
    assert!(connect(&provider, BASE_SEPOLIA).await.is_err());
}

#[tokio::test]
async fn no_accounts_means_disconnected() {
    let provider = ScriptedProvider::new();
    provider.respond("eth_accounts", Ok(json!([])));
    let status = check_network_status(&provider, BASE_SEPOLIA)
        .await
        .expect("status");
    assert_eq!(status, NetworkStatus::Disconnected);
    assert!(!status.requires_switch_prompt());
}

#[tokio::test]
async fn every_other_chain_prompts_for_a_switch() {
    for chain in ["0x1", "0x2105", "0xaa36a7", "0x89"] {
        let provider = ScriptedProvider::new();
        provider.respond("eth_accounts", Ok(json!([ACCOUNT])));
        provider.respond("eth_chainId", Ok(json!(chain)));
        let status = check_network_status(&provider, BASE_SEPOLIA)
            .await
            .expect("status");
        assert!(status.requires_switch_prompt(), "chain {chain}");
        assert_eq!(status.account(), Some(account()));
    }

    let provider = ScriptedProvider::new();
    provider.respond("eth_accounts", Ok(json!([ACCOUNT])));
    provider.respond("eth_chainId", Ok(json!("0x14a34")));
    let status = check_network_status(&provider, BASE_SEPOLIA)
        .await
        .expect("status");
    assert_eq!(
        status,
        NetworkStatus::Connected {
            account: account(),
            chain_id: BASE_SEPOLIA
        }
    );
}

#[tokio::test]
async fn connect_requests_accounts_first() {
    let provider = ScriptedProvider::new();
    provider.respond("eth_requestAccounts", Ok(json!([ACCOUNT])));
    provider.respond("eth_accounts", Ok(json!([ACCOUNT])));
    provider.respond("eth_chainId", Ok(json!("0x14a34")));

    let status = connect(&provider, BASE_SEPOLIA).await.expect("connect");
    assert!(status.is_connected());
    assert_eq!(
        provider.methods(),
        vec!["eth_requestAccounts", "eth_accounts", "eth_chainId"]
    );
}

#[tokio::test]
async fn unknown_chain_is_added_then_switched() {
    let provider = ScriptedProvider::new();
    provider.respond(
        "wallet_switchEthereumChain",
        Err(PortError::Rpc {
            code: 4902,
            message: "Unrecognized chain ID".to_owned(),
        }),
    );
    provider.respond("wallet_addEthereumChain", Ok(json!(null)));
    provider.respond("wallet_switchEthereumChain", Ok(json!(null)));

    let outcome = switch_network(&provider, &ChainParams::base_sepolia())
        .await
        .expect("switch");
    assert_eq!(outcome, SwitchOutcome::AddedAndSwitched);
    assert_eq!(
        provider.methods(),
        vec![
            "wallet_switchEthereumChain",
            "wallet_addEthereumChain",
            "wallet_switchEthereumChain"
        ]
    );

    let log = provider.log.lock().expect("log");
    let add = &log[1].1[0];
    assert_eq!(add["chainId"], "0x14a34");
    assert_eq!(add["rpcUrls"][0], "https://sepolia.base.org");
    assert_eq!(add["blockExplorerUrls"][0], "https://sepolia.basescan.org");
    assert_eq!(add["nativeCurrency"]["decimals"], 18);
}

#[tokio::test]
async fn rejected_switch_is_not_retried() {
    let provider = ScriptedProvider::new();
    provider.respond(
        "wallet_switchEthereumChain",
        Err(PortError::Rpc {
            code: 4001,
            message: "User rejected the request.".to_owned(),
        }),
    );
    let err = switch_network(&provider, &ChainParams::base_sepolia())
        .await
        .expect_err("rejected");
    assert_eq!(err.rpc_code(), Some(4001));
    assert_eq!(provider.methods().len(), 1);
}
