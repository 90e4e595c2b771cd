//! Integration tests for posting balanced transactions (§4.1, §4.2, §4.8).

mod support;

use rust_decimal_macros::dec;

use ledgerkeep_core::ledger::{CreateTransactionInput, EvidenceRef, NewLedgerEntry};
use ledgerkeep_db::{LedgerRepository, TransactionRepository};

async fn make_ledgers(
    repo: &LedgerRepository,
    suffix: &str,
) -> (i64, i64) {
    let cash = repo
        .create(&format!("Cash-{suffix}"), rand_number(), "Cash account", true)
        .await
        .unwrap();
    let revenue = repo
        .create(&format!("Revenue-{suffix}"), rand_number(), "Revenue account", false)
        .await
        .unwrap();
    (cash.id, revenue.id)
}

fn rand_number() -> i64 {
    // Not cryptographic; only needs to avoid colliding with fixtures from
    // other concurrently-running tests against the same database.
    i64::try_from(std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap().as_nanos() % 1_000_000_000).unwrap()
}

#[tokio::test]
async fn posts_a_balanced_transaction_and_updates_balances() {
    let Some(db) = support::connect().await else { return };
    let ledgers = LedgerRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());

    let (cash_id, revenue_id) = make_ledgers(&ledgers, "posting").await;
    let evidence = EvidenceRef::new("invoice", 42);

    let input = CreateTransactionInput::new(
        "user-1",
        vec![
            NewLedgerEntry::new(cash_id, dec!(100.00)),
            NewLedgerEntry::new(revenue_id, dec!(-100.00)),
        ],
    )
    .with_evidence(vec![evidence])
    .with_notes("invoice #42 paid");

    let posted = transactions.create_transaction(input).await.unwrap();
    assert!(!posted.is_void());

    let cash_balance = ledgers.get_balance(cash_id).await.unwrap();
    assert_eq!(cash_balance, dec!(100.00));

    let revenue_balance = ledgers.get_balance(revenue_id).await.unwrap();
    assert_eq!(revenue_balance, dec!(-100.00));
}

#[tokio::test]
async fn rejects_unbalanced_entries_before_touching_storage() {
    let Some(db) = support::connect().await else { return };
    let ledgers = LedgerRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());

    let (cash_id, revenue_id) = make_ledgers(&ledgers, "unbalanced").await;

    let input = CreateTransactionInput::new(
        "user-1",
        vec![NewLedgerEntry::new(cash_id, dec!(100.00)), NewLedgerEntry::new(revenue_id, dec!(-99.00))],
    );

    let err = transactions.create_transaction(input).await.unwrap_err();
    assert_eq!(err.error_code(), "TRANSACTION_BALANCE");

    assert_eq!(ledgers.get_balance(cash_id).await.unwrap(), dec!(0));
}

#[tokio::test]
async fn two_transactions_against_the_same_evidence_accumulate() {
    let Some(db) = support::connect().await else { return };
    let ledgers = LedgerRepository::new(db.clone());
    let transactions = TransactionRepository::new(db.clone());
    let balances = ledgerkeep_db::BalanceRepository::new(db.clone());

    let (cash_id, revenue_id) = make_ledgers(&ledgers, "accumulate").await;
    let evidence = EvidenceRef::new("order", 7);

    for amount in [dec!(30.00), dec!(20.00)] {
        let input = CreateTransactionInput::new(
            "user-1",
            vec![NewLedgerEntry::new(cash_id, amount), NewLedgerEntry::new(revenue_id, -amount)],
        )
        .with_evidence(vec![evidence.clone()]);
        transactions.create_transaction(input).await.unwrap();
    }

    let balance = balances.get_balance(cash_id, "order", 7).await.unwrap();
    assert_eq!(balance, dec!(50.00));
}
