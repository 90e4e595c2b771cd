//! Initial database migration.
//!
//! Creates the six tables the bookkeeping engine needs: ledgers,
//! transaction types, transactions, ledger entries, evidence links, and
//! the denormalized ledger balances, plus the indexes and constraints
//! their invariants depend on.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ACCOUNTS
        // ============================================================
        db.execute_unprepared(LEDGERS_SQL).await?;

        // ============================================================
        // PART 2: TRANSACTION TYPES
        // ============================================================
        db.execute_unprepared(TRANSACTION_TYPES_SQL).await?;

        // ============================================================
        // PART 3: TRANSACTIONS
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: LEDGER ENTRIES
        // ============================================================
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;

        // ============================================================
        // PART 5: EVIDENCE LINKS
        // ============================================================
        db.execute_unprepared(EVIDENCE_LINKS_SQL).await?;

        // ============================================================
        // PART 6: DENORMALIZED LEDGER BALANCES
        // ============================================================
        db.execute_unprepared(LEDGER_BALANCES_SQL).await?;

        // ============================================================
        // PART 7: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_MANUAL_TRANSACTION_TYPE_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const LEDGERS_SQL: &str = r"
CREATE TABLE ledgers (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL UNIQUE,
    number BIGINT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    increased_by_debits BOOLEAN NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    modified_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const TRANSACTION_TYPES_SQL: &str = r"
CREATE TABLE transaction_types (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id BIGSERIAL PRIMARY KEY,
    transaction_id UUID NOT NULL DEFAULT gen_random_uuid() UNIQUE,
    created_by VARCHAR(255) NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    posted_at TIMESTAMPTZ NOT NULL,
    transaction_type_id BIGINT NOT NULL REFERENCES transaction_types(id),
    voids BIGINT UNIQUE REFERENCES transactions(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    modified_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_transactions_posted_at ON transactions(posted_at);
CREATE INDEX idx_transactions_type ON transactions(transaction_type_id);
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    entry_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    transaction_id BIGINT NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    ledger_id BIGINT NOT NULL REFERENCES ledgers(id),
    amount NUMERIC(24, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    modified_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_ledger_entries_transaction ON ledger_entries(transaction_id);
CREATE INDEX idx_ledger_entries_ledger ON ledger_entries(ledger_id);
";

const EVIDENCE_LINKS_SQL: &str = r"
CREATE TABLE evidence_links (
    id BIGSERIAL PRIMARY KEY,
    transaction_id BIGINT NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    evidence_type_tag VARCHAR(255) NOT NULL,
    evidence_id BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (transaction_id, evidence_type_tag, evidence_id)
);

CREATE INDEX idx_evidence_links_transaction ON evidence_links(transaction_id);
CREATE INDEX idx_evidence_links_evidence ON evidence_links(evidence_type_tag, evidence_id);
";

const LEDGER_BALANCES_SQL: &str = r"
CREATE TABLE ledger_balances (
    id BIGSERIAL PRIMARY KEY,
    ledger_id BIGINT NOT NULL REFERENCES ledgers(id),
    evidence_type_tag VARCHAR(255) NOT NULL,
    evidence_id BIGINT NOT NULL,
    balance NUMERIC(24, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    modified_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (ledger_id, evidence_type_tag, evidence_id)
);

CREATE INDEX idx_ledger_balances_evidence ON ledger_balances(evidence_type_tag, evidence_id);
";

const SEED_MANUAL_TRANSACTION_TYPE_SQL: &str = r"
INSERT INTO transaction_types (name, description)
VALUES ('Manual', 'Default transaction type for manually posted transactions.')
ON CONFLICT (name) DO NOTHING;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS ledger_balances CASCADE;
DROP TABLE IF EXISTS evidence_links CASCADE;
DROP TABLE IF EXISTS ledger_entries CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS transaction_types CASCADE;
DROP TABLE IF EXISTS ledgers CASCADE;
";
