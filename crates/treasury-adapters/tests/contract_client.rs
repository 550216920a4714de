mod common;

use std::sync::atomic::Ordering;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use serde_json::json;

use common::{CountingClock, ScriptedRpc};
use treasury_adapters::contracts::{ICompanyWallet, IController, IFactory};
use treasury_adapters::ContractClient;
use treasury_core::{PortError, TreasuryPort, TreasuryService, VoteAction, WriteRequest};

const CONTROLLER: Address = Address::repeat_byte(0x0C);
const WALLET: Address = Address::repeat_byte(0x0D);
const FACTORY: Address = Address::repeat_byte(0x0F);

fn client() -> ContractClient<ScriptedRpc, CountingClock> {
    ContractClient::new(ScriptedRpc::default(), CountingClock::default(), 10)
}

fn script_config(rpc: &ScriptedRpc, paused: bool) {
    rpc.on_call(
        IController::requiredPercentageCall {},
        IController::requiredPercentageCall::abi_encode_returns(&(U256::from(51u64),)),
    );
    rpc.on_call(
        IController::pausedCall {},
        IController::pausedCall::abi_encode_returns(&(paused,)),
    );
    rpc.on_call(
        IController::nameCall {},
        IController::nameCall::abi_encode_returns(&("Ops".to_owned(),)),
    );
    rpc.on_call(
        IController::timelockPeriodCall {},
        IController::timelockPeriodCall::abi_encode_returns(&(U256::from(86_400u64),)),
    );
    rpc.on_call(
        IController::expiryPeriodCall {},
        IController::expiryPeriodCall::abi_encode_returns(&(U256::from(604_800u64),)),
    );
    rpc.on_call(
        IController::minOwnersCall {},
        IController::minOwnersCall::abi_encode_returns(&(U256::from(2u64),)),
    );
}

#[tokio::test]
async fn owners_decode_into_weighted_list() {
    let client = client();
    client.provider().on_call(
        IController::getOwnersCall {},
        IController::getOwnersCall::abi_encode_returns(&(
            vec![Address::repeat_byte(1), Address::repeat_byte(2)],
            vec!["Alice".to_owned(), String::new()],
            vec![U256::from(60u64), U256::from(40u64)],
            vec![false, true],
        )),
    );

    let owners = client.owners(CONTROLLER).await.expect("owners");
    assert_eq!(owners.len(), 2);
    assert_eq!(owners[0].name, "Alice");
    assert_eq!(owners[0].percentage, 60);
    assert!(!owners[0].removable);
    assert_eq!(owners[1].percentage, 40);
}

#[tokio::test]
async fn config_joins_six_getters() {
    let client = client();
    script_config(client.provider(), true);

    let config = client.config(CONTROLLER).await.expect("config");
    assert_eq!(config.required_percentage, 51);
    assert!(config.paused);
    assert_eq!(config.name, "Ops");
    assert_eq!(config.timelock_period, 86_400);
    assert_eq!(config.expiry_period, 604_800);
    assert_eq!(config.min_owners, 2);
}

#[tokio::test]
async fn one_failing_getter_fails_the_config() {
    let client = client();
    script_config(client.provider(), false);
    client.provider().fail_call(
        IController::minOwnersCall {},
        PortError::Transport("timeout".to_owned()),
    );

    assert!(client.config(CONTROLLER).await.is_err());
}

#[tokio::test]
async fn transaction_slot_decodes_all_fields() {
    let client = client();
    client.provider().on_call(
        IController::transactionsCall { txId: U256::from(3u64) },
        IController::transactionsCall::abi_encode_returns(&(
            Address::repeat_byte(0xA1),
            Address::repeat_byte(0xB2),
            U256::from(1_000u64),
            Bytes::from(vec![0xde, 0xad]),
            true,
            Address::repeat_byte(0xEE),
            false,
            U256::from(2u64),
            U256::from(1_700_000_000u64),
            U256::from(1_700_086_400u64),
        )),
    );

    let tx = client.transaction(CONTROLLER, 3).await.expect("tx");
    assert_eq!(tx.id, 3);
    assert_eq!(tx.initiator, Address::repeat_byte(0xA1));
    assert_eq!(tx.value, U256::from(1_000u64));
    assert_eq!(tx.data, Bytes::from(vec![0xde, 0xad]));
    assert!(tx.is_token_transfer);
    assert_eq!(tx.confirmation_count, 2);
    assert_eq!(tx.timelock_end, 1_700_086_400);
}

#[tokio::test]
async fn balance_falls_back_to_native_balance() {
    let client = client();
    client.provider().set_native_balance(WALLET, "0xde0b6b3a7640000");

    let balance = client.wallet_balance(WALLET).await.expect("balance");
    assert_eq!(balance, U256::from(1_000_000_000_000_000_000u128));
    assert_eq!(client.provider().methods(), vec!["eth_call", "eth_getBalance"]);

    client.provider().on_call(
        ICompanyWallet::getBalanceCall {},
        ICompanyWallet::getBalanceCall::abi_encode_returns(&(U256::from(7u64),)),
    );
    assert_eq!(client.wallet_balance(WALLET).await.expect("balance"), U256::from(7u64));
}

#[tokio::test]
async fn submit_waits_for_the_receipt() {
    let client = client();
    client.provider().push_receipt(json!(null));
    client.provider().push_receipt(json!(null));
    client
        .provider()
        .push_receipt(json!({ "status": "0x1", "blockNumber": "0x10" }));

    let receipt = client
        .submit(&WriteRequest::Vote {
            controller: CONTROLLER,
            action: VoteAction::Confirm,
            tx_id: 4,
        })
        .await
        .expect("submit");
    assert_eq!(receipt.block_number, Some(16));
    assert_eq!(client.clock().sleeps.load(Ordering::SeqCst), 2);

    let log = client.provider().log.lock().expect("log");
    let (_, send) = log
        .iter()
        .find(|(m, _)| m == "eth_sendTransaction")
        .expect("send");
    let from = send[0]["from"].as_str().expect("from").to_lowercase();
    assert_eq!(from, common::ACCOUNT);
    let data = send[0]["data"].as_str().expect("data");
    let selector = alloy::hex::encode(IController::confirmTransactionCall::SELECTOR);
    assert!(data.starts_with(&format!("0x{selector}")));
}

#[tokio::test]
async fn reverted_receipt_is_an_error() {
    let client = client();
    client.provider().push_receipt(json!({ "status": "0x0", "blockNumber": "0x10" }));

    let err = client
        .submit(&WriteRequest::SetPaused {
            controller: CONTROLLER,
            paused: true,
        })
        .await
        .expect_err("reverted");
    assert!(matches!(err, PortError::Reverted(_)));
}

#[tokio::test]
async fn service_probe_runs_over_contract_reads() {
    let client = client();
    for id in 0..2u64 {
        client.provider().on_call(
            IController::transactionsCall { txId: U256::from(id) },
            IController::transactionsCall::abi_encode_returns(&(
                Address::repeat_byte(0xA1),
                Address::repeat_byte(0xB2),
                U256::ZERO,
                Bytes::new(),
                false,
                Address::ZERO,
                id == 0,
                U256::from(1u64),
                U256::ZERO,
                U256::ZERO,
            )),
        );
    }
    client.provider().on_call(
        IController::transactionsCall { txId: U256::from(2u64) },
        IController::transactionsCall::abi_encode_returns(&(
            Address::ZERO,
            Address::ZERO,
            U256::ZERO,
            Bytes::new(),
            false,
            Address::ZERO,
            false,
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
        )),
    );

    let service = TreasuryService::new(client, 20);
    let txs = service.load_transactions(CONTROLLER).await;
    assert_eq!(txs.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 0]);
    assert!(txs[1].executed);
}

#[tokio::test]
async fn factory_listing_decodes() {
    let client = client();
    let controllers = vec![Address::repeat_byte(0x71), Address::repeat_byte(0x72)];
    client.provider().on_call(
        IFactory::getAllControllersCall {},
        IFactory::getAllControllersCall::abi_encode_returns(&(controllers.clone(),)),
    );
    client.provider().on_call(
        IFactory::getDeploymentCountCall {},
        IFactory::getDeploymentCountCall::abi_encode_returns(&(U256::from(2u64), U256::from(2u64))),
    );

    assert_eq!(client.all_controllers(FACTORY).await.expect("list"), controllers);
    let count = client.deployment_count(FACTORY).await.expect("count");
    assert_eq!(count.controllers, 2);
    assert_eq!(count.wallets, 2);
}
