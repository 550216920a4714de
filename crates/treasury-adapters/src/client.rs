use alloy::hex;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;
use serde_json::{json, Value};

use treasury_core::domain::{DeploymentCount, FactoryEntry};
use treasury_core::{
    ClockPort, GovernanceConfig, Owner, PortError, ProviderPort, TreasuryPort, TreasuryTx,
    TxReceipt, WriteRequest,
};

use crate::contracts::{decode_returns, encode_write, to_u64, ICompanyWallet, IController, IFactory};

/// Contract reads via `eth_call` and writes via `eth_sendTransaction`, both
/// through the connected wallet.
#[derive(Debug, Clone)]
pub struct ContractClient<P, C> {
    provider: P,
    clock: C,
    receipt_poll_interval_ms: u64,
}

impl<P: ProviderPort, C: ClockPort> ContractClient<P, C> {
    pub fn new(provider: P, clock: C, receipt_poll_interval_ms: u64) -> Self {
        Self {
            provider,
            clock,
            receipt_poll_interval_ms,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    async fn eth_call(&self, to: Address, data: Vec<u8>) -> Result<Bytes, PortError> {
        let params = json!([
            { "to": to.to_string(), "data": hex::encode_prefixed(&data) },
            "latest"
        ]);
        let result = self.provider.request("eth_call", params).await?;
        decode_hex_result(&result, "eth_call")
    }

    async fn call<T: SolCall>(&self, to: Address, call: T) -> Result<T::Return, PortError> {
        let raw = self.eth_call(to, call.abi_encode()).await?;
        decode_returns::<T>(&raw)
    }

    async fn sender(&self) -> Result<Address, PortError> {
        let accounts = self.provider.request("eth_accounts", json!([])).await?;
        treasury_core::network::parse_accounts(&accounts)?
            .first()
            .copied()
            .ok_or_else(|| PortError::NotFound("no connected account".to_owned()))
    }

    async fn native_balance(&self, address: Address) -> Result<U256, PortError> {
        let result = self
            .provider
            .request("eth_getBalance", json!([address.to_string(), "latest"]))
            .await?;
        parse_quantity(&result, "eth_getBalance")
    }

    /// Polls until the node returns a receipt. There is no upper bound on
    /// how long this waits.
    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TxReceipt, PortError> {
        let hash_hex = hex::encode_prefixed(tx_hash);
        loop {
            let receipt = self
                .provider
                .request("eth_getTransactionReceipt", json!([hash_hex]))
                .await?;
            if receipt.is_null() {
                self.clock.sleep_ms(self.receipt_poll_interval_ms).await;
                continue;
            }

            if receipt.get("status").and_then(Value::as_str) == Some("0x0") {
                return Err(PortError::Reverted(format!("transaction {hash_hex} reverted")));
            }
            let block_number = match receipt.get("blockNumber") {
                Some(v) if !v.is_null() => Some(to_u64(parse_quantity(v, "blockNumber")?, "blockNumber")?),
                _ => None,
            };
            return Ok(TxReceipt {
                tx_hash,
                block_number,
            });
        }
    }
}

impl<P: ProviderPort, C: ClockPort> TreasuryPort for ContractClient<P, C> {
    async fn all_controllers(&self, factory: Address) -> Result<Vec<Address>, PortError> {
        Ok(self
            .call(factory, IFactory::getAllControllersCall {})
            .await?
            .controllers)
    }

    async fn deployment_count(&self, factory: Address) -> Result<DeploymentCount, PortError> {
        let ret = self.call(factory, IFactory::getDeploymentCountCall {}).await?;
        Ok(DeploymentCount {
            controllers: to_u64(ret.controllers, "controllers")?,
            wallets: to_u64(ret.wallets, "wallets")?,
        })
    }

    async fn multisig_info(
        &self,
        factory: Address,
        controller: Address,
    ) -> Result<FactoryEntry, PortError> {
        let ret = self
            .call(factory, IFactory::getMultiSigInfoCall { controller })
            .await?;
        Ok(FactoryEntry {
            name: ret.name,
            wallet: ret.wallet,
            exists: ret.exists,
        })
    }

    async fn company_wallet(&self, controller: Address) -> Result<Address, PortError> {
        Ok(self
            .call(controller, IController::companyWalletCall {})
            .await?
            .wallet)
    }

    async fn owners(&self, controller: Address) -> Result<Vec<Owner>, PortError> {
        let ret = self.call(controller, IController::getOwnersCall {}).await?;
        let n = ret.addrs.len();
        if ret.ownerNames.len() != n || ret.percentages.len() != n || ret.removable.len() != n {
            return Err(PortError::Validation(
                "getOwners returned arrays of different lengths".to_owned(),
            ));
        }
        ret.addrs
            .into_iter()
            .zip(ret.ownerNames)
            .zip(ret.percentages)
            .zip(ret.removable)
            .map(|(((address, name), percentage), removable)| {
                Ok(Owner {
                    address,
                    name,
                    percentage: to_u64(percentage, "percentage")?,
                    removable,
                })
            })
            .collect()
    }

    async fn config(&self, controller: Address) -> Result<GovernanceConfig, PortError> {
        let (required, paused, name, timelock, expiry, min_owners) = tokio::try_join!(
            self.call(controller, IController::requiredPercentageCall {}),
            self.call(controller, IController::pausedCall {}),
            self.call(controller, IController::nameCall {}),
            self.call(controller, IController::timelockPeriodCall {}),
            self.call(controller, IController::expiryPeriodCall {}),
            self.call(controller, IController::minOwnersCall {}),
        )?;
        Ok(GovernanceConfig {
            required_percentage: to_u64(required.value, "requiredPercentage")?,
            paused: paused.value,
            name: name.value,
            timelock_period: to_u64(timelock.value, "timelockPeriod")?,
            expiry_period: to_u64(expiry.value, "expiryPeriod")?,
            min_owners: to_u64(min_owners.value, "minOwners")?,
        })
    }

    async fn transaction(
        &self,
        controller: Address,
        tx_id: u64,
    ) -> Result<TreasuryTx, PortError> {
        let ret = self
            .call(
                controller,
                IController::transactionsCall {
                    txId: U256::from(tx_id),
                },
            )
            .await?;
        Ok(TreasuryTx {
            id: tx_id,
            initiator: ret.initiator,
            to: ret.to,
            value: ret.value,
            data: ret.data,
            is_token_transfer: ret.isTokenTransfer,
            token_address: ret.tokenAddress,
            executed: ret.executed,
            confirmation_count: to_u64(ret.confirmationCount, "confirmationCount")?,
            timestamp: to_u64(ret.timestamp, "timestamp")?,
            timelock_end: to_u64(ret.timelockEnd, "timelockEnd")?,
        })
    }

    async fn is_confirmed(
        &self,
        controller: Address,
        tx_id: u64,
        owner: Address,
    ) -> Result<bool, PortError> {
        Ok(self
            .call(
                controller,
                IController::confirmationsCall {
                    txId: U256::from(tx_id),
                    owner,
                },
            )
            .await?
            .confirmed)
    }

    async fn wallet_balance(&self, wallet: Address) -> Result<U256, PortError> {
        match self.call(wallet, ICompanyWallet::getBalanceCall {}).await {
            Ok(ret) => Ok(ret.balance),
            Err(err) => {
                tracing::warn!(%wallet, error = %err, "getBalance failed, falling back to eth_getBalance");
                self.native_balance(wallet).await
            }
        }
    }

    async fn token_balance(&self, wallet: Address, token: Address) -> Result<U256, PortError> {
        Ok(self
            .call(wallet, ICompanyWallet::getTokenBalanceCall { token })
            .await?
            .balance)
    }

    async fn submit(&self, request: &WriteRequest) -> Result<TxReceipt, PortError> {
        let (to, data) = encode_write(request);
        let from = self.sender().await?;
        let params = json!([{
            "from": from.to_string(),
            "to": to.to_string(),
            "data": hex::encode_prefixed(&data),
        }]);
        let result = self.provider.request("eth_sendTransaction", params).await?;
        let tx_hash: B256 = result
            .as_str()
            .ok_or_else(|| PortError::Transport("eth_sendTransaction must return tx hash".to_owned()))?
            .parse()
            .map_err(|e| PortError::Validation(format!("invalid tx hash: {e}")))?;
        tracing::info!(%from, %to, %tx_hash, "transaction sent, awaiting receipt");

        let receipt = self.wait_for_receipt(tx_hash).await?;
        tracing::info!(%tx_hash, block = ?receipt.block_number, "transaction included");
        Ok(receipt)
    }
}

fn decode_hex_result(value: &Value, method: &str) -> Result<Bytes, PortError> {
    let raw = value
        .as_str()
        .ok_or_else(|| PortError::Transport(format!("{method} result must be hex string")))?;
    hex::decode(raw)
        .map(Bytes::from)
        .map_err(|e| PortError::Transport(format!("{method} returned invalid hex: {e}")))
}

fn parse_quantity(value: &Value, field: &str) -> Result<U256, PortError> {
    let raw = value
        .as_str()
        .ok_or_else(|| PortError::Transport(format!("{field} must be a hex quantity")))?;
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| PortError::Transport(format!("invalid {field} quantity '{raw}': {e}")))
}
