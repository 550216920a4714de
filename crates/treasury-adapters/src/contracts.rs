//! ABI bindings for the Factory, Controller and CompanyWallet contracts.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use treasury_core::{GovernanceProposal, PortError, TransferRequest, VoteAction, WriteRequest};

sol! {
    interface IFactory {
        function createMultiSig(
            string name,
            address[] owners,
            string[] ownerNames,
            uint256[] percentages,
            bool[] removable,
            uint256 requiredPercentage,
            uint256 timelockPeriod,
            uint256 expiryPeriod,
            uint256 minOwners
        ) external returns (address controller, address wallet);

        function getAllControllers() external view returns (address[] controllers);
        function getDeploymentCount() external view returns (uint256 controllers, uint256 wallets);
        function getMultiSigInfo(address controller)
            external
            view
            returns (string name, address wallet, bool exists);
    }

    interface IController {
        function companyWallet() external view returns (address wallet);

        function submitTransaction(
            address to,
            uint256 value,
            bool isTokenTransfer,
            address tokenAddress,
            bytes data
        ) external;
        function submitBatchTransferDifferent(address token, address[] recipients, uint256[] amounts) external;
        function submitBatchTransferEqual(address token, address[] recipients, uint256 amountPer) external;

        function confirmTransaction(uint256 txId) external;
        function revokeConfirmation(uint256 txId) external;
        function executeTransactionManual(uint256 txId) external;

        function submitAddOwner(address owner, string ownerName, uint256 percentage, bool removable) external;
        function submitChangeName(string newName) external;
        function submitChangeRequiredPct(uint256 newPercentage) external;
        function submitChangeTimelock(uint256 newTimelock) external;
        function submitChangeExpiry(uint256 newExpiry) external;
        function submitChangeMinOwners(uint256 newMinOwners) external;

        function pause() external;
        function unpause() external;

        function transactions(uint256 txId)
            external
            view
            returns (
                address initiator,
                address to,
                uint256 value,
                bytes data,
                bool isTokenTransfer,
                address tokenAddress,
                bool executed,
                uint256 confirmationCount,
                uint256 timestamp,
                uint256 timelockEnd
            );
        function getOwners()
            external
            view
            returns (address[] addrs, string[] ownerNames, uint256[] percentages, bool[] removable);
        function confirmations(uint256 txId, address owner) external view returns (bool confirmed);

        function requiredPercentage() external view returns (uint256 value);
        function paused() external view returns (bool value);
        function name() external view returns (string value);
        function timelockPeriod() external view returns (uint256 value);
        function expiryPeriod() external view returns (uint256 value);
        function minOwners() external view returns (uint256 value);
    }

    interface ICompanyWallet {
        function getBalance() external view returns (uint256 balance);
        function getTokenBalance(address token) external view returns (uint256 balance);
        function executeTransaction(
            address to,
            uint256 value,
            bool isTokenTransfer,
            address tokenAddress,
            bytes data
        ) external;
    }
}

/// Target contract and calldata for a write.
pub fn encode_write(request: &WriteRequest) -> (Address, Bytes) {
    let data = match request {
        WriteRequest::CreateMultiSig { params, .. } => IFactory::createMultiSigCall {
            name: params.name.clone(),
            owners: params.owners.clone(),
            ownerNames: params.owner_names.clone(),
            percentages: params.percentages.iter().map(|p| U256::from(*p)).collect(),
            removable: params.removable.clone(),
            requiredPercentage: U256::from(params.required_percentage),
            timelockPeriod: U256::from(params.timelock_period),
            expiryPeriod: U256::from(params.expiry_period),
            minOwners: U256::from(params.min_owners),
        }
        .abi_encode(),
        WriteRequest::Transfer { request, .. } => encode_transfer(request),
        WriteRequest::Vote { action, tx_id, .. } => {
            let tx_id = U256::from(*tx_id);
            match action {
                VoteAction::Confirm => IController::confirmTransactionCall { txId: tx_id }.abi_encode(),
                VoteAction::Revoke => IController::revokeConfirmationCall { txId: tx_id }.abi_encode(),
                VoteAction::Execute => {
                    IController::executeTransactionManualCall { txId: tx_id }.abi_encode()
                }
            }
        }
        WriteRequest::Propose { proposal, .. } => encode_proposal(proposal),
        WriteRequest::SetPaused { paused: true, .. } => IController::pauseCall {}.abi_encode(),
        WriteRequest::SetPaused { paused: false, .. } => IController::unpauseCall {}.abi_encode(),
        WriteRequest::WalletExecute {
            to,
            value,
            is_token_transfer,
            token_address,
            data,
            ..
        } => ICompanyWallet::executeTransactionCall {
            to: *to,
            value: *value,
            isTokenTransfer: *is_token_transfer,
            tokenAddress: *token_address,
            data: data.clone(),
        }
        .abi_encode(),
    };
    (request.target(), Bytes::from(data))
}

fn encode_transfer(request: &TransferRequest) -> Vec<u8> {
    match request {
        TransferRequest::Single {
            to,
            value,
            is_token_transfer,
            token_address,
            data,
        } => IController::submitTransactionCall {
            to: *to,
            value: *value,
            isTokenTransfer: *is_token_transfer,
            tokenAddress: *token_address,
            data: data.clone(),
        }
        .abi_encode(),
        TransferRequest::BatchDifferent {
            token_address,
            recipients,
            amounts,
        } => IController::submitBatchTransferDifferentCall {
            token: *token_address,
            recipients: recipients.clone(),
            amounts: amounts.clone(),
        }
        .abi_encode(),
        TransferRequest::BatchEqual {
            token_address,
            recipients,
            amount_per,
        } => IController::submitBatchTransferEqualCall {
            token: *token_address,
            recipients: recipients.clone(),
            amountPer: *amount_per,
        }
        .abi_encode(),
    }
}

fn encode_proposal(proposal: &GovernanceProposal) -> Vec<u8> {
    match proposal {
        GovernanceProposal::AddOwner {
            owner,
            name,
            percentage,
            removable,
        } => IController::submitAddOwnerCall {
            owner: *owner,
            ownerName: name.clone(),
            percentage: U256::from(*percentage),
            removable: *removable,
        }
        .abi_encode(),
        GovernanceProposal::ChangeName(name) => IController::submitChangeNameCall {
            newName: name.clone(),
        }
        .abi_encode(),
        GovernanceProposal::ChangeRequiredPercentage(pct) => {
            IController::submitChangeRequiredPctCall {
                newPercentage: U256::from(*pct),
            }
            .abi_encode()
        }
        GovernanceProposal::ChangeTimelock(secs) => IController::submitChangeTimelockCall {
            newTimelock: U256::from(*secs),
        }
        .abi_encode(),
        GovernanceProposal::ChangeExpiry(secs) => IController::submitChangeExpiryCall {
            newExpiry: U256::from(*secs),
        }
        .abi_encode(),
        GovernanceProposal::ChangeMinOwners(n) => IController::submitChangeMinOwnersCall {
            newMinOwners: U256::from(*n),
        }
        .abi_encode(),
    }
}

pub fn decode_returns<C: SolCall>(data: &[u8]) -> Result<C::Return, PortError> {
    C::abi_decode_returns(data, true)
        .map_err(|e| PortError::Transport(format!("{} returned undecodable data: {e}", C::SIGNATURE)))
}

/// Contract integers that the dashboard treats as counts, ids or seconds.
pub fn to_u64(value: U256, field: &str) -> Result<u64, PortError> {
    u64::try_from(value)
        .map_err(|_| PortError::Validation(format!("{field} does not fit in 64 bits: {value}")))
}
