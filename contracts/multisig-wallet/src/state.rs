use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Addr, BankMsg, Binary, Coin, CosmosMsg, Empty, StdResult, Storage, WasmMsg};

use cw_roles::Roles;
use cw_storage_plus::{Item, Map};

/// Role every submitter, confirmer and executor must hold
pub const OWNER_ROLE: &str = "owner";

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct Config {
    pub threshold: u32,
    pub total_owners: u32,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema, Debug)]
pub struct Transaction {
    pub destination: Addr,
    pub value: Vec<Coin>,
    pub payload: Binary,
    pub executed: bool,
    // always equal to the number of CONFIRMATIONS entries under this id
    pub confirmations: u32,
}

impl Transaction {
    pub fn new(destination: Addr, value: Vec<Coin>, payload: Binary) -> Self {
        Transaction {
            destination,
            value,
            payload,
            executed: false,
            confirmations: 0,
        }
    }

    pub fn is_confirmed(&self, threshold: u32) -> bool {
        self.confirmations >= threshold
    }

    /// The message delivering this transaction. A payload is executed on the
    /// destination contract, a bare value is a bank transfer, and with neither
    /// there is nothing to deliver.
    pub fn forwarded_call(&self) -> Option<CosmosMsg> {
        if !self.payload.is_empty() {
            Some(
                WasmMsg::Execute {
                    contract_addr: self.destination.to_string(),
                    msg: self.payload.clone(),
                    funds: self.value.clone(),
                }
                .into(),
            )
        } else if !self.value.is_empty() {
            Some(
                BankMsg::Send {
                    to_address: self.destination.to_string(),
                    amount: self.value.clone(),
                }
                .into(),
            )
        } else {
            None
        }
    }
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const ROLES: Roles = Roles::new("roles");

// the next transaction id, which is also the number of transactions
pub const TRANSACTION_COUNT: Item<u64> = Item::new("transaction_count");
pub const TRANSACTIONS: Map<u64, Transaction> = Map::new("transactions");
// presence of (id, owner) means the owner confirmed that transaction
pub const CONFIRMATIONS: Map<(u64, &Addr), Empty> = Map::new("confirmations");

pub fn next_id(store: &mut dyn Storage) -> StdResult<u64> {
    let id = TRANSACTION_COUNT.may_load(store)?.unwrap_or_default();
    TRANSACTION_COUNT.save(store, &(id + 1))?;
    Ok(id)
}
