//! Concurrent posting stress test (§4.2, §8's concurrent-writer scenario).
//!
//! Verifies that many simultaneous `create_transaction` calls against the
//! same pair of ledgers and the same evidence produce a denormalized
//! balance with no drift, regardless of interleaving.

mod support;

use std::sync::Arc;

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Barrier;

use ledgerkeep_core::ledger::{CreateTransactionInput, EvidenceRef, NewLedgerEntry};
use ledgerkeep_db::{BalanceRepository, LedgerRepository, TransactionRepository};

fn rand_number() -> i64 {
    i64::try_from(std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap().as_nanos() % 1_000_000_000).unwrap()
}

#[tokio::test]
async fn concurrent_postings_against_the_same_evidence_do_not_drift() {
    let Some(db) = support::connect().await else { return };
    let ledgers = LedgerRepository::new(db.clone());
    let transactions = Arc::new(TransactionRepository::new(db.clone()));
    let balances = BalanceRepository::new(db.clone());

    let cash = ledgers.create("Cash-concurrent", rand_number(), "", true).await.unwrap();
    let revenue = ledgers.create("Revenue-concurrent", rand_number(), "", false).await.unwrap();
    let order = EvidenceRef::new("order", rand_number());

    const NUM_TRANSACTIONS: usize = 50;
    let amount_per_tx = dec!(1.00);

    let barrier = Arc::new(Barrier::new(NUM_TRANSACTIONS));
    let mut handles = Vec::with_capacity(NUM_TRANSACTIONS);

    for _ in 0..NUM_TRANSACTIONS {
        let transactions = Arc::clone(&transactions);
        let barrier = Arc::clone(&barrier);
        let (cash_id, revenue_id) = (cash.id, revenue.id);
        let order = order.clone();

        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            let input = CreateTransactionInput::new(
                "user-1",
                vec![
                    NewLedgerEntry::new(cash_id, amount_per_tx),
                    NewLedgerEntry::new(revenue_id, -amount_per_tx),
                ],
            )
            .with_evidence(vec![order]);
            transactions.create_transaction(input).await
        }));
    }

    let results = join_all(handles).await;
    let success_count = results.iter().filter(|r| matches!(r, Ok(Ok(_)))).count();
    assert_eq!(success_count, NUM_TRANSACTIONS, "every balanced posting should succeed");

    let expected = amount_per_tx * Decimal::from(NUM_TRANSACTIONS as i64);

    let cash_balance = balances.get_balance(cash.id, "order", order.id).await.unwrap();
    assert_eq!(cash_balance, expected, "balance drift detected under concurrent writers");

    let ledger_total = ledgers.get_balance(cash.id).await.unwrap();
    assert_eq!(ledger_total, expected);
}
