//! Integration test for the full balance rebuild (§4.6, §9).

mod support;

use rust_decimal_macros::dec;

use ledgerkeep_core::ledger::{CreateTransactionInput, EvidenceRef, NewLedgerEntry};
use ledgerkeep_db::{BalanceRepository, LedgerRepository, TransactionRepository};

fn rand_number() -> i64 {
    i64::try_from(std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap().as_nanos() % 1_000_000_000).unwrap()
}

#[tokio::test]
async fn rebuild_recomputes_balances_and_discards_evidence_less_entries() {
    let Some(db) = support::connect().await else { return };
    let ledgers = LedgerRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());
    let balances = BalanceRepository::new(db.clone());

    let cash = ledgers.create("Cash-rebuild", rand_number(), "", true).await.unwrap();
    let revenue = ledgers.create("Revenue-rebuild", rand_number(), "", false).await.unwrap();
    let order = EvidenceRef::new("order", rand_number());

    // With evidence: should survive the rebuild.
    let with_evidence = CreateTransactionInput::new(
        "user-1",
        vec![NewLedgerEntry::new(cash.id, dec!(12.00)), NewLedgerEntry::new(revenue.id, dec!(-12.00))],
    )
    .with_evidence(vec![order.clone()]);
    transactions.create_transaction(with_evidence).await.unwrap();

    // Without evidence: entries exist, but no (ledger, evidence) balance row
    // should exist for them even after a rebuild.
    let without_evidence = CreateTransactionInput::new(
        "user-1",
        vec![NewLedgerEntry::new(cash.id, dec!(3.00)), NewLedgerEntry::new(revenue.id, dec!(-3.00))],
    );
    transactions.create_transaction(without_evidence).await.unwrap();

    balances.rebuild_ledger_balances().await.unwrap();

    let rebuilt = balances.get_balance(cash.id, "order", order.id).await.unwrap();
    assert_eq!(rebuilt, dec!(12.00));

    // The denormalized total still only reflects evidence-bearing entries;
    // the on-demand ledger total (§4.8) reflects everything.
    let ledger_total = ledgers.get_balance(cash.id).await.unwrap();
    assert_eq!(ledger_total, dec!(15.00));
}
