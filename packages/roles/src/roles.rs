use cosmwasm_std::{Addr, Empty, Order, StdError, StdResult, Storage};
use cw_storage_plus::{Bound, Map};
use thiserror::Error;

// settings for pagination
const MAX_LIMIT: u32 = 30;
const DEFAULT_LIMIT: u32 = 10;

/// Role membership keyed by `(role, address)`. An entry means the address holds the role.
pub struct Roles<'a>(Map<'a, (&'a str, &'a Addr), Empty>);

impl<'a> Roles<'a> {
    pub const fn new(namespace: &'a str) -> Self {
        Roles(Map::new(namespace))
    }

    /// Adds `addr` to `role`. Granting a role twice is a no-op.
    pub fn grant(&self, storage: &mut dyn Storage, role: &'a str, addr: &'a Addr) -> StdResult<()> {
        self.0.save(storage, (role, addr), &Empty {})
    }

    /// Whether `caller` was granted `role`.
    pub fn is_authorized(
        &self,
        storage: &dyn Storage,
        caller: &'a Addr,
        role: &'a str,
    ) -> StdResult<bool> {
        Ok(self.0.has(storage, (role, caller)))
    }

    /// Fails with `RoleError::Unauthorized` unless `caller` holds `role`.
    pub fn assert_authorized(
        &self,
        storage: &dyn Storage,
        caller: &'a Addr,
        role: &'a str,
    ) -> Result<(), RoleError> {
        if !self.is_authorized(storage, caller, role)? {
            Err(RoleError::Unauthorized {
                role: role.to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Lists holders of `role` in address order.
    pub fn members(
        &self,
        storage: &dyn Storage,
        role: &'a str,
        start_after: Option<&'a Addr>,
        limit: Option<u32>,
    ) -> StdResult<Vec<Addr>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
        let start = start_after.map(Bound::exclusive);
        self.0
            .prefix(role)
            .keys(storage, start, None, Order::Ascending)
            .take(limit)
            .collect()
    }
}

// errors

#[derive(Error, Debug, PartialEq)]
pub enum RoleError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Caller does not hold the {role} role")]
    Unauthorized { role: String },
}
