#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Api, Binary, Coin, Coins, Deps, DepsMut, Empty, Env, MessageInfo,
    Order, Reply, Response, StdResult, Storage, SubMsg, SubMsgResult,
};

use cw2::{get_contract_version, set_contract_version};
use cw_storage_plus::Bound;
use cw_utils::{maybe_addr, nonpayable, PaymentError};
use semver::Version;

use crate::error::{ContractError, InvalidConfig};
use crate::msg::{
    ConfirmationListResponse, ConfirmationsResponse, ExecuteMsg, InstantiateMsg,
    IsConfirmedResponse, MigrateMsg, OwnerListResponse, QueryMsg, ThresholdResponse,
    TransactionCountResponse, TransactionListResponse, TransactionResponse,
};
use crate::state::{
    next_id, Config, Transaction, CONFIG, CONFIRMATIONS, OWNER_ROLE, ROLES, TRANSACTIONS,
    TRANSACTION_COUNT,
};

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:multisig-wallet";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let owners = validate_owners(deps.api, &msg.owners)?;
    let total_owners = owners.len() as u32;
    if msg.threshold == 0 {
        return Err(InvalidConfig::ZeroThreshold {}.into());
    }
    if msg.threshold > total_owners {
        return Err(InvalidConfig::UnreachableThreshold {
            threshold: msg.threshold,
            owners: total_owners,
        }
        .into());
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let cfg = Config {
        threshold: msg.threshold,
        total_owners,
    };
    CONFIG.save(deps.storage, &cfg)?;
    TRANSACTION_COUNT.save(deps.storage, &0)?;

    for owner in owners.iter() {
        ROLES.grant(deps.storage, OWNER_ROLE, owner)?;
    }

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("threshold", cfg.threshold.to_string())
        .add_attribute("total_owners", cfg.total_owners.to_string()))
}

fn validate_owners(api: &dyn Api, owners: &[String]) -> Result<Vec<Addr>, ContractError> {
    if owners.is_empty() {
        return Err(InvalidConfig::NoOwners {}.into());
    }
    let mut validated: Vec<Addr> = Vec::with_capacity(owners.len());
    for owner in owners {
        if owner.trim().is_empty() {
            return Err(InvalidConfig::EmptyOwner {}.into());
        }
        let addr = api.addr_validate(owner)?;
        if validated.contains(&addr) {
            return Err(InvalidConfig::DuplicateOwner {
                owner: addr.into_string(),
            }
            .into());
        }
        validated.push(addr);
    }
    Ok(validated)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SubmitTransaction {
            destination,
            value,
            payload,
        } => execute_submit(deps, env, info, destination, value, payload),
        ExecuteMsg::ConfirmTransaction { transaction_id } => {
            execute_confirm(deps, env, info, transaction_id)
        }
        ExecuteMsg::RevokeConfirmation { transaction_id } => {
            execute_revoke(deps, env, info, transaction_id)
        }
        ExecuteMsg::ExecuteTransaction { transaction_id } => {
            execute_execute(deps, env, info, transaction_id)
        }
        ExecuteMsg::Deposit {} => execute_deposit(deps, env, info),
    }
}

/// Owners only, and no funds may ride along with registry operations.
fn assert_owner(deps: Deps, info: &MessageInfo) -> Result<(), ContractError> {
    ROLES.assert_authorized(deps.storage, &info.sender, OWNER_ROLE)?;
    nonpayable(info)?;
    Ok(())
}

/// Loads a transaction that can still be confirmed, revoked or executed.
fn load_pending(storage: &dyn Storage, id: u64) -> Result<Transaction, ContractError> {
    let tx = TRANSACTIONS
        .may_load(storage, id)?
        .ok_or(ContractError::TransactionDoesNotExist { id })?;
    if tx.executed {
        return Err(ContractError::TransactionAlreadyExecuted { id });
    }
    Ok(tx)
}

/// Funds in the shape the bank module accepts: no zero amounts, one entry per
/// denom, sorted by denom.
fn normalize_value(value: Vec<Coin>) -> Result<Coins, ContractError> {
    if let Some(coin) = value.iter().find(|coin| coin.amount.is_zero()) {
        return Err(ContractError::ZeroAmount {
            denom: coin.denom.clone(),
        });
    }
    Coins::try_from(value).map_err(|_| ContractError::DuplicateDenom {})
}

pub fn execute_submit(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    destination: String,
    value: Vec<Coin>,
    payload: Binary,
) -> Result<Response, ContractError> {
    assert_owner(deps.as_ref(), &info)?;
    let destination = deps.api.addr_validate(&destination)?;
    // not checked against the balance, that happens on execution
    let value = normalize_value(value)?;

    let tx = Transaction::new(destination, value.to_vec(), payload);
    let id = next_id(deps.storage)?;
    TRANSACTIONS.save(deps.storage, id, &tx)?;

    let mut res = Response::new()
        .set_data(to_json_binary(&id)?)
        .add_attribute("action", "submit_transaction")
        .add_attribute("owner", info.sender)
        .add_attribute("transaction_id", id.to_string())
        .add_attribute("destination", tx.destination.as_str());
    // empty attribute values are rejected by the chain
    if !value.is_empty() {
        res = res.add_attribute("value", value.to_string());
    }
    if !tx.payload.is_empty() {
        res = res.add_attribute("payload", tx.payload.to_base64());
    }
    Ok(res)
}

pub fn execute_confirm(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    transaction_id: u64,
) -> Result<Response, ContractError> {
    assert_owner(deps.as_ref(), &info)?;
    let mut tx = load_pending(deps.storage, transaction_id)?;

    let key = (transaction_id, &info.sender);
    if CONFIRMATIONS.has(deps.storage, key) {
        return Err(ContractError::Unauthorized {});
    }
    CONFIRMATIONS.save(deps.storage, key, &Empty {})?;
    tx.confirmations += 1;
    TRANSACTIONS.save(deps.storage, transaction_id, &tx)?;

    Ok(Response::new()
        .add_attribute("action", "confirm_transaction")
        .add_attribute("owner", info.sender.as_str())
        .add_attribute("transaction_id", transaction_id.to_string())
        .add_attribute("confirmations", tx.confirmations.to_string()))
}

pub fn execute_revoke(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    transaction_id: u64,
) -> Result<Response, ContractError> {
    assert_owner(deps.as_ref(), &info)?;
    let mut tx = load_pending(deps.storage, transaction_id)?;

    let key = (transaction_id, &info.sender);
    if !CONFIRMATIONS.has(deps.storage, key) {
        return Err(ContractError::Unauthorized {});
    }
    CONFIRMATIONS.remove(deps.storage, key);
    tx.confirmations -= 1;
    TRANSACTIONS.save(deps.storage, transaction_id, &tx)?;

    Ok(Response::new()
        .add_attribute("action", "revoke_confirmation")
        .add_attribute("owner", info.sender.as_str())
        .add_attribute("transaction_id", transaction_id.to_string())
        .add_attribute("confirmations", tx.confirmations.to_string()))
}

pub fn execute_execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    transaction_id: u64,
) -> Result<Response, ContractError> {
    assert_owner(deps.as_ref(), &info)?;
    let mut tx = load_pending(deps.storage, transaction_id)?;

    let cfg = CONFIG.load(deps.storage)?;
    if !tx.is_confirmed(cfg.threshold) {
        return Err(ContractError::NotEnoughConfirmations {
            id: transaction_id,
            confirmations: tx.confirmations,
            threshold: cfg.threshold,
        });
    }

    // must be persisted before the call goes out: anything the destination
    // calls back into the wallet has to see this transaction as executed
    tx.executed = true;
    TRANSACTIONS.save(deps.storage, transaction_id, &tx)?;

    let mut res = Response::new()
        .add_attribute("action", "execute_transaction")
        .add_attribute("owner", info.sender)
        .add_attribute("transaction_id", transaction_id.to_string());
    if let Some(msg) = tx.forwarded_call() {
        // a failure comes back through `reply`, which reverts all of the above
        res = res.add_submessage(SubMsg::reply_on_error(msg, transaction_id));
    }
    Ok(res)
}

pub fn execute_deposit(
    _deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    if info.funds.is_empty() {
        return Err(PaymentError::NoFunds {}.into());
    }
    let amount = normalize_value(info.funds)?;
    Ok(Response::new()
        .add_attribute("action", "deposit")
        .add_attribute("sender", info.sender)
        .add_attribute("amount", amount.to_string()))
}

/// Only failed forwarded calls are replied to. The reply id is the transaction id.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.result {
        SubMsgResult::Err(reason) => Err(ContractError::TransactionFailed { id: msg.id, reason }),
        SubMsgResult::Ok(_) => Err(ContractError::UnexpectedReply { id: msg.id }),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::CannotMigrate {
            previous_contract: stored.contract,
        });
    }

    let version: Version = CONTRACT_VERSION.parse()?;
    let storage_version: Version = stored.version.parse()?;
    if storage_version < version {
        set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    }

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let bin = match msg {
        QueryMsg::Owners { start_after, limit } => {
            to_json_binary(&list_owners(deps, start_after, limit)?)
        }
        QueryMsg::Threshold {} => to_json_binary(&query_threshold(deps)?),
        QueryMsg::TransactionCount {} => to_json_binary(&query_transaction_count(deps)?),
        QueryMsg::Transaction { transaction_id } => {
            to_json_binary(&query_transaction(deps, transaction_id)?)
        }
        QueryMsg::ListTransactions { start_after, limit } => {
            to_json_binary(&list_transactions(deps, start_after, limit)?)
        }
        QueryMsg::ReverseTransactions {
            start_before,
            limit,
        } => to_json_binary(&reverse_transactions(deps, start_before, limit)?),
        QueryMsg::Confirmations { transaction_id } => {
            to_json_binary(&query_confirmations(deps, transaction_id)?)
        }
        QueryMsg::IsConfirmed {
            transaction_id,
            owner,
        } => to_json_binary(&query_is_confirmed(deps, transaction_id, owner)?),
        QueryMsg::ListConfirmations {
            transaction_id,
            start_after,
            limit,
        } => to_json_binary(&list_confirmations(
            deps,
            transaction_id,
            start_after,
            limit,
        )?),
    };
    Ok(bin?)
}

fn list_owners(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<OwnerListResponse> {
    let start = maybe_addr(deps.api, start_after)?;
    let owners = ROLES
        .members(deps.storage, OWNER_ROLE, start.as_ref(), limit)?
        .into_iter()
        .map(Addr::into_string)
        .collect();
    Ok(OwnerListResponse { owners })
}

fn query_threshold(deps: Deps) -> StdResult<ThresholdResponse> {
    let cfg = CONFIG.load(deps.storage)?;
    Ok(ThresholdResponse {
        threshold: cfg.threshold,
        total_owners: cfg.total_owners,
    })
}

fn query_transaction_count(deps: Deps) -> StdResult<TransactionCountResponse> {
    let count = TRANSACTION_COUNT.load(deps.storage)?;
    Ok(TransactionCountResponse { count })
}

fn load_transaction(storage: &dyn Storage, id: u64) -> Result<Transaction, ContractError> {
    TRANSACTIONS
        .may_load(storage, id)?
        .ok_or(ContractError::TransactionDoesNotExist { id })
}

fn query_transaction(deps: Deps, id: u64) -> Result<TransactionResponse, ContractError> {
    let tx = load_transaction(deps.storage, id)?;
    Ok(map_transaction((id, tx)))
}

// settings for pagination
const MAX_LIMIT: u32 = 30;
const DEFAULT_LIMIT: u32 = 10;

fn list_transactions(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<TransactionListResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);
    let transactions = TRANSACTIONS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(map_transaction))
        .collect::<StdResult<_>>()?;

    Ok(TransactionListResponse { transactions })
}

fn reverse_transactions(
    deps: Deps,
    start_before: Option<u64>,
    limit: Option<u32>,
) -> StdResult<TransactionListResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let end = start_before.map(Bound::exclusive);
    let transactions = TRANSACTIONS
        .range(deps.storage, None, end, Order::Descending)
        .take(limit)
        .map(|item| item.map(map_transaction))
        .collect::<StdResult<_>>()?;

    Ok(TransactionListResponse { transactions })
}

fn map_transaction((id, tx): (u64, Transaction)) -> TransactionResponse {
    TransactionResponse {
        id,
        destination: tx.destination.into_string(),
        value: tx.value,
        payload: tx.payload,
        executed: tx.executed,
        confirmations: tx.confirmations,
    }
}

fn query_confirmations(deps: Deps, id: u64) -> Result<ConfirmationsResponse, ContractError> {
    let tx = load_transaction(deps.storage, id)?;
    Ok(ConfirmationsResponse {
        transaction_id: id,
        confirmations: tx.confirmations,
    })
}

fn query_is_confirmed(
    deps: Deps,
    id: u64,
    owner: String,
) -> Result<IsConfirmedResponse, ContractError> {
    load_transaction(deps.storage, id)?;
    let owner = deps.api.addr_validate(&owner)?;
    let confirmed = CONFIRMATIONS.has(deps.storage, (id, &owner));
    Ok(IsConfirmedResponse { confirmed })
}

fn list_confirmations(
    deps: Deps,
    id: u64,
    start_after: Option<String>,
    limit: Option<u32>,
) -> Result<ConfirmationListResponse, ContractError> {
    load_transaction(deps.storage, id)?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let addr = maybe_addr(deps.api, start_after)?;
    let start = addr.as_ref().map(Bound::exclusive);

    let owners = CONFIRMATIONS
        .prefix(id)
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|key| key.map(Addr::into_string))
        .collect::<StdResult<_>>()?;

    Ok(ConfirmationListResponse { owners })
}
