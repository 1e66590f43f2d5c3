
use anyhow::{anyhow, Result as AnyResult};
use assert_matches::assert_matches;
use cosmwasm_std::{coins, from_json, to_json_binary, Addr, Binary, Coin, Empty};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};

use crate::contract::{execute, instantiate, query, reply};
use crate::msg::{ExecuteMsg, InstantiateMsg, IsConfirmedResponse, QueryMsg, TransactionResponse};
use crate::ContractError;

use receiver::CallbackOutcome;

const ALICE: &str = "alice";
const BOB: &str = "bob";
const CARL: &str = "carl";
const DEST: &str = "dest";
const DENOM: &str = "ujuno";

fn contract_wallet() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(execute, instantiate, query).with_reply(reply);
    Box::new(contract)
}

/// Wallet owned by alice, bob, carl and the receiver contract.
struct Suite {
    app: App,
    wallet: Addr,
    receiver: Addr,
}

impl Suite {
    fn new(threshold: u32) -> Self {
        let mut app = App::new(|router, _, storage| {
            router
                .bank
                .init_balance(storage, &Addr::unchecked(ALICE), coins(1_000, DENOM))
                .unwrap();
        });

        let receiver_id = app.store_code(receiver::contract_receiver());
        let receiver = app
            .instantiate_contract(
                receiver_id,
                Addr::unchecked(ALICE),
                &Empty {},
                &[],
                "Receiver",
                None,
            )
            .unwrap();

        let wallet_id = app.store_code(contract_wallet());
        let msg = InstantiateMsg {
            owners: vec![
                ALICE.to_string(),
                BOB.to_string(),
                CARL.to_string(),
                receiver.to_string(),
            ],
            threshold,
        };
        let wallet = app
            .instantiate_contract(wallet_id, Addr::unchecked(ALICE), &msg, &[], "Wallet", None)
            .unwrap();

        Suite {
            app,
            wallet,
            receiver,
        }
    }

    fn run(&mut self, sender: &str, msg: &ExecuteMsg, funds: &[Coin]) -> AnyResult<AppResponse> {
        self.app
            .execute_contract(Addr::unchecked(sender), self.wallet.clone(), msg, funds)
    }

    fn deposit(&mut self, amount: u128) -> AnyResult<AppResponse> {
        self.run(ALICE, &ExecuteMsg::Deposit {}, &coins(amount, DENOM))
    }

    fn submit(
        &mut self,
        destination: &str,
        value: Vec<Coin>,
        payload: Binary,
    ) -> AnyResult<u64> {
        let msg = ExecuteMsg::SubmitTransaction {
            destination: destination.to_string(),
            value,
            payload,
        };
        let res = self.run(ALICE, &msg, &[])?;
        let data = res.data.ok_or_else(|| anyhow!("no transaction id returned"))?;
        Ok(from_json(data)?)
    }

    fn confirm(&mut self, sender: &str, transaction_id: u64) -> AnyResult<AppResponse> {
        self.run(sender, &ExecuteMsg::ConfirmTransaction { transaction_id }, &[])
    }

    fn execute(&mut self, sender: &str, transaction_id: u64) -> AnyResult<AppResponse> {
        self.run(sender, &ExecuteMsg::ExecuteTransaction { transaction_id }, &[])
    }

    fn transaction(&self, transaction_id: u64) -> TransactionResponse {
        self.app
            .wrap()
            .query_wasm_smart(&self.wallet, &QueryMsg::Transaction { transaction_id })
            .unwrap()
    }

    fn is_confirmed(&self, transaction_id: u64, owner: &str) -> bool {
        let res: IsConfirmedResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.wallet,
                &QueryMsg::IsConfirmed {
                    transaction_id,
                    owner: owner.to_string(),
                },
            )
            .unwrap();
        res.confirmed
    }

    fn balance(&self, addr: impl Into<String>) -> u128 {
        self.app
            .wrap()
            .query_balance(addr, DENOM)
            .unwrap()
            .amount
            .u128()
    }

    fn receiver_calls(&self) -> u32 {
        self.app
            .wrap()
            .query_wasm_smart(&self.receiver, &receiver::QueryMsg::Calls {})
            .unwrap()
    }

    fn callback_outcome(&self) -> Option<CallbackOutcome> {
        self.app
            .wrap()
            .query_wasm_smart(&self.receiver, &receiver::QueryMsg::CallbackOutcome {})
            .unwrap()
    }

    fn call_receiver(&self, msg: &receiver::ExecuteMsg) -> Binary {
        to_json_binary(msg).unwrap()
    }

    fn call_back(&self, msg: &ExecuteMsg) -> Binary {
        self.call_receiver(&receiver::ExecuteMsg::CallBack {
            wallet: self.wallet.to_string(),
            msg: to_json_binary(msg).unwrap(),
        })
    }
}

#[test]
fn transfer_after_threshold() {
    let mut suite = Suite::new(2);
    suite.deposit(500).unwrap();

    let id = suite
        .submit(DEST, coins(100, DENOM), Binary::default())
        .unwrap();
    assert_eq!(id, 0);

    suite.confirm(BOB, id).unwrap();
    assert_eq!(suite.transaction(id).confirmations, 1);
    suite.confirm(CARL, id).unwrap();
    assert_eq!(suite.transaction(id).confirmations, 2);

    suite.execute(ALICE, id).unwrap();
    assert!(suite.transaction(id).executed);
    assert_eq!(suite.balance(DEST), 100);
    assert_eq!(suite.balance(&suite.wallet), 400);

    let err = suite.execute(ALICE, id).unwrap_err();
    assert_eq!(
        ContractError::TransactionAlreadyExecuted { id },
        err.downcast().unwrap()
    );
    assert_eq!(suite.balance(DEST), 100);
}

#[test]
fn execute_needs_threshold() {
    let mut suite = Suite::new(2);
    suite.deposit(500).unwrap();
    let id = suite
        .submit(DEST, coins(100, DENOM), Binary::default())
        .unwrap();

    suite.confirm(BOB, id).unwrap();
    let err = suite.execute(ALICE, id).unwrap_err();
    assert_eq!(
        ContractError::NotEnoughConfirmations {
            id,
            confirmations: 1,
            threshold: 2
        },
        err.downcast().unwrap()
    );
    assert_eq!(suite.balance(DEST), 0);
}

#[test]
fn failed_transfer_is_reverted() {
    let mut suite = Suite::new(2);
    // value is only checked against the balance on execution
    let id = suite
        .submit(DEST, coins(100, DENOM), Binary::default())
        .unwrap();
    suite.confirm(BOB, id).unwrap();
    suite.confirm(CARL, id).unwrap();

    let err = suite.execute(ALICE, id).unwrap_err();
    assert_matches!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::TransactionFailed { id: 0, .. }
    );
    let tx = suite.transaction(id);
    assert!(!tx.executed);
    assert_eq!(tx.confirmations, 2);

    // once funded the same transaction goes through
    suite.deposit(100).unwrap();
    suite.execute(BOB, id).unwrap();
    assert!(suite.transaction(id).executed);
    assert_eq!(suite.balance(DEST), 100);
}

#[test]
fn failing_destination_is_reverted() {
    let mut suite = Suite::new(1);
    suite.deposit(50).unwrap();
    let payload = suite.call_receiver(&receiver::ExecuteMsg::Fail {});
    let receiver = suite.receiver.to_string();
    let id = suite.submit(&receiver, coins(50, DENOM), payload).unwrap();
    suite.confirm(ALICE, id).unwrap();

    let err = suite.execute(ALICE, id).unwrap_err();
    assert_matches!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::TransactionFailed { id: 0, .. }
    );
    assert!(!suite.transaction(id).executed);
    assert_eq!(suite.balance(&suite.wallet), 50);
    assert_eq!(suite.balance(&suite.receiver), 0);
}

#[test]
fn forwards_payload_and_funds() {
    let mut suite = Suite::new(1);
    suite.deposit(50).unwrap();
    let payload = suite.call_receiver(&receiver::ExecuteMsg::Record {});
    let receiver = suite.receiver.to_string();
    let id = suite.submit(&receiver, coins(20, DENOM), payload).unwrap();
    suite.confirm(CARL, id).unwrap();

    suite.execute(CARL, id).unwrap();
    assert_eq!(suite.receiver_calls(), 1);
    assert_eq!(suite.balance(&suite.receiver), 20);
    assert_eq!(suite.balance(&suite.wallet), 30);
}

#[test]
fn callback_cannot_execute_again() {
    let mut suite = Suite::new(2);
    suite.deposit(100).unwrap();

    // the destination tries to execute the very transaction delivering to it
    let payload = suite.call_back(&ExecuteMsg::ExecuteTransaction { transaction_id: 0 });
    let receiver = suite.receiver.to_string();
    let id = suite.submit(&receiver, coins(10, DENOM), payload).unwrap();
    assert_eq!(id, 0);
    suite.confirm(ALICE, id).unwrap();
    suite.confirm(BOB, id).unwrap();

    suite.execute(ALICE, id).unwrap();
    assert_matches!(
        suite.callback_outcome(),
        Some(CallbackOutcome::Failed { .. })
    );
    assert!(suite.transaction(id).executed);
    assert_eq!(suite.receiver_calls(), 1);
    assert_eq!(suite.balance(&suite.receiver), 10);
    assert_eq!(suite.balance(&suite.wallet), 90);
}

#[test]
fn callback_cannot_confirm_executed_transaction() {
    let mut suite = Suite::new(2);

    let payload = suite.call_back(&ExecuteMsg::ConfirmTransaction { transaction_id: 0 });
    let receiver = suite.receiver.to_string();
    let id = suite.submit(&receiver, vec![], payload).unwrap();
    suite.confirm(ALICE, id).unwrap();
    suite.confirm(BOB, id).unwrap();

    suite.execute(CARL, id).unwrap();
    assert_matches!(
        suite.callback_outcome(),
        Some(CallbackOutcome::Failed { .. })
    );
    let tx = suite.transaction(id);
    assert!(tx.executed);
    assert_eq!(tx.confirmations, 2);
    assert!(!suite.is_confirmed(id, &receiver));
}

#[test]
fn callback_can_confirm_other_transaction() {
    let mut suite = Suite::new(2);

    let pending = suite
        .submit(DEST, coins(10, DENOM), Binary::default())
        .unwrap();
    let payload = suite.call_back(&ExecuteMsg::ConfirmTransaction {
        transaction_id: pending,
    });
    let receiver = suite.receiver.to_string();
    let id = suite.submit(&receiver, vec![], payload).unwrap();
    assert_eq!(id, 1);
    suite.confirm(ALICE, id).unwrap();
    suite.confirm(BOB, id).unwrap();

    suite.execute(ALICE, id).unwrap();
    assert_eq!(suite.callback_outcome(), Some(CallbackOutcome::Succeeded));
    assert!(suite.is_confirmed(pending, &receiver));
    assert_eq!(suite.transaction(pending).confirmations, 1);
    assert!(!suite.transaction(pending).executed);
}
