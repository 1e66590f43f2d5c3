use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, Coin};

#[cw_serde]
pub struct InstantiateMsg {
    pub owners: Vec<String>,
    /// Confirmations needed before a transaction can be executed
    pub threshold: u32,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Appends a transaction to the registry. The new id is returned as response data.
    SubmitTransaction {
        destination: String,
        /// Native funds sent along when the transaction is executed
        value: Vec<Coin>,
        /// Executed on `destination` as a contract message. Leave empty for a
        /// plain transfer of `value`.
        payload: Binary,
    },
    ConfirmTransaction {
        transaction_id: u64,
    },
    RevokeConfirmation {
        transaction_id: u64,
    },
    ExecuteTransaction {
        transaction_id: u64,
    },
    /// Funds the wallet. Anyone may deposit.
    Deposit {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Owners sorted by address, not in the order given at instantiation.
    #[returns(OwnerListResponse)]
    Owners {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(ThresholdResponse)]
    Threshold {},
    #[returns(TransactionCountResponse)]
    TransactionCount {},
    #[returns(TransactionResponse)]
    Transaction { transaction_id: u64 },
    #[returns(TransactionListResponse)]
    ListTransactions {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(TransactionListResponse)]
    ReverseTransactions {
        start_before: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(ConfirmationsResponse)]
    Confirmations { transaction_id: u64 },
    #[returns(IsConfirmedResponse)]
    IsConfirmed { transaction_id: u64, owner: String },
    #[returns(ConfirmationListResponse)]
    ListConfirmations {
        transaction_id: u64,
        start_after: Option<String>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct OwnerListResponse {
    pub owners: Vec<String>,
}

#[cw_serde]
pub struct ThresholdResponse {
    pub threshold: u32,
    pub total_owners: u32,
}

#[cw_serde]
pub struct TransactionCountResponse {
    pub count: u64,
}

#[cw_serde]
pub struct TransactionResponse {
    pub id: u64,
    pub destination: String,
    pub value: Vec<Coin>,
    pub payload: Binary,
    pub executed: bool,
    pub confirmations: u32,
}

#[cw_serde]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionResponse>,
}

#[cw_serde]
pub struct ConfirmationsResponse {
    pub transaction_id: u64,
    pub confirmations: u32,
}

#[cw_serde]
pub struct IsConfirmedResponse {
    pub confirmed: bool,
}

#[cw_serde]
pub struct ConfirmationListResponse {
    pub owners: Vec<String>,
}
