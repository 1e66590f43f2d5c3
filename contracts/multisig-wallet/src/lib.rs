/*!
A multisig wallet with a fixed set of owners created upon instantiation.

Any owner may submit a transaction: a destination, the native funds to
forward and an optional payload. Owners then confirm (or revoke their
confirmation of) pending transactions, and once the number of confirmations
reaches the threshold any owner may execute it. Execution happens exactly
once: the transaction is marked as executed before the forwarded call is
dispatched, so a destination calling back into the wallet sees it as final.
If the forwarded call fails, the whole execution is reverted.

Transactions are never removed and their ids are assigned in submission
order starting from 0, so the registry doubles as an audit log.
*/

pub mod contract;
pub mod error;
pub mod msg;
#[cfg(test)]
mod multitest;
pub mod state;

pub use crate::error::ContractError;
