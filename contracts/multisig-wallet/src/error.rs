use cosmwasm_std::StdError;
use cw_roles::RoleError;
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("Invalid operation: {0}")]
    InvalidOperation(#[from] InvalidConfig),

    /// Returned for non-owners, for confirming twice and for revoking a
    /// confirmation that was never given.
    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Cannot send a zero amount of {denom}")]
    ZeroAmount { denom: String },

    #[error("Each denom may appear only once in a value")]
    DuplicateDenom {},

    #[error("Transaction {id} does not exist")]
    TransactionDoesNotExist { id: u64 },

    #[error("Transaction {id} was already executed")]
    TransactionAlreadyExecuted { id: u64 },

    #[error("Transaction {id} has {confirmations} confirmations, {threshold} required")]
    NotEnoughConfirmations {
        id: u64,
        confirmations: u32,
        threshold: u32,
    },

    #[error("Transaction {id} failed: {reason}")]
    TransactionFailed { id: u64, reason: String },

    #[error("Unexpected reply for transaction {id}")]
    UnexpectedReply { id: u64 },

    #[error("Cannot migrate from different contract type: {previous_contract}")]
    CannotMigrate { previous_contract: String },

    #[error("Semver parsing error: {0}")]
    SemVer(String),
}

/// Reasons an owner set and threshold are rejected at instantiation.
#[derive(Error, Debug, PartialEq)]
pub enum InvalidConfig {
    #[error("No owners")]
    NoOwners {},

    #[error("Owner address cannot be empty")]
    EmptyOwner {},

    #[error("Owner {owner} is listed more than once")]
    DuplicateOwner { owner: String },

    #[error("Threshold cannot be zero")]
    ZeroThreshold {},

    #[error("Threshold {threshold} cannot be reached by {owners} owners")]
    UnreachableThreshold { threshold: u32, owners: u32 },
}

impl From<RoleError> for ContractError {
    fn from(err: RoleError) -> Self {
        match err {
            RoleError::Std(error) => ContractError::Std(error),
            RoleError::Unauthorized { .. } => ContractError::Unauthorized {},
        }
    }
}

impl From<semver::Error> for ContractError {
    fn from(err: semver::Error) -> Self {
        Self::SemVer(err.to_string())
    }
}
