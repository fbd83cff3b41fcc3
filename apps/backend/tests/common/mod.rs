#![allow(dead_code)]

use polla_backend::db::txn_policy::{set_txn_policy, TxnPolicy};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

// HTTP flows span several requests, so successful transactions commit by
// default; `POLLA_TXN_POLICY=rollback` flips it per binary.
#[ctor::ctor]
fn init_txn_policy() {
    let policy = std::env::var("POLLA_TXN_POLICY")
        .ok()
        .and_then(|raw| raw.parse::<TxnPolicy>().ok())
        .unwrap_or(TxnPolicy::CommitOnOk);
    set_txn_policy(policy);
}
