//! In-memory domain shapes shared by the posting, void, and query engines.
//!
//! These are storage-agnostic; `ledgerkeep-db`'s `SeaORM` entities are the
//! persisted counterparts and convert to/from these where useful.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The name of the default `TransactionType`, lazily provisioned on first use.
pub const MANUAL_TRANSACTION_TYPE: &str = "Manual";

/// An account. Polarity is fixed at creation time by the embedder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Primary key.
    pub id: i64,
    /// Unique display name.
    pub name: String,
    /// Unique account number.
    pub number: i64,
    /// Free-text description.
    pub description: String,
    /// `true` for asset/expense accounts (debit increases balance); `false`
    /// for liability/equity/revenue accounts (credit increases balance).
    pub increased_by_debits: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub modified_at: DateTime<Utc>,
}

/// A user-defined grouping tag for transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionType {
    /// Primary key.
    pub id: i64,
    /// Unique name, e.g. `"Manual"`, `"Recon"`, `"Invoice"`.
    pub name: String,
    /// Free-text description.
    pub description: String,
}

/// An opaque reference to an external domain object: `(type_tag, id)`.
///
/// The engine never interprets `type_tag`; it is whatever string the
/// embedder uses to name its own domain type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvidenceRef {
    /// The embedder's name for the evidence's domain type, e.g. `"order"`.
    pub type_tag: String,
    /// The evidence object's id within its own domain.
    pub id: i64,
}

impl EvidenceRef {
    /// Builds a new evidence reference.
    #[must_use]
    pub fn new(type_tag: impl Into<String>, id: i64) -> Self {
        Self { type_tag: type_tag.into(), id }
    }
}

/// One signed amount against one ledger, not yet attached to a transaction.
///
/// This is the shape callers build when posting; the posting engine
/// rejects any entry that is already persisted (see
/// [`crate::ledger::error::LedgerError::ExistingLedgerEntries`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    /// The ledger this entry posts against.
    pub ledger_id: i64,
    /// The signed, already-rounded amount.
    pub amount: Decimal,
    /// Set only if this value was round-tripped from a persisted
    /// [`LedgerEntry`] by mistake; the posting engine rejects any entry
    /// that carries one with [`crate::ledger::error::LedgerError::ExistingLedgerEntries`].
    pub existing_entry_id: Option<Uuid>,
}

impl NewLedgerEntry {
    /// Builds a new (unsaved) ledger entry.
    #[must_use]
    pub fn new(ledger_id: i64, amount: Decimal) -> Self {
        Self { ledger_id, amount, existing_entry_id: None }
    }
}

impl From<&LedgerEntry> for NewLedgerEntry {
    /// Round-tripping a persisted entry keeps its id so the posting engine
    /// can detect and reject the re-post.
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            ledger_id: entry.ledger_id,
            amount: entry.amount,
            existing_entry_id: Some(entry.entry_id),
        }
    }
}

/// A persisted ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Opaque stable id.
    pub entry_id: Uuid,
    /// Parent transaction's primary key.
    pub transaction_id: i64,
    /// Target ledger's primary key.
    pub ledger_id: i64,
    /// The signed, rounded amount.
    pub amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub modified_at: DateTime<Utc>,
}

/// A balanced financial event: a set of ledger entries summing to zero,
/// plus the evidence that justifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Primary key.
    pub id: i64,
    /// Opaque stable id, distinct from `id`.
    pub transaction_id: Uuid,
    /// Opaque reference to the user who recorded the transaction.
    pub created_by: String,
    /// Free-text notes.
    pub notes: String,
    /// Semantic time of the event; may be backdated.
    pub posted_at: DateTime<Utc>,
    /// The transaction's type.
    pub transaction_type_id: i64,
    /// If this transaction voids another, its primary key.
    pub voids: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub modified_at: DateTime<Utc>,
}

impl Transaction {
    /// `true` if this transaction is itself a void of another.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.voids.is_some()
    }
}

/// Inputs to [`crate::ledger::posting::validate_posting`] / `create_transaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTransactionInput {
    /// Opaque reference to the user recording the transaction.
    pub user: String,
    /// Evidence to link to the new transaction.
    pub evidence: Vec<EvidenceRef>,
    /// The entries to post. Must be non-empty and sum to zero.
    pub entries: Vec<NewLedgerEntry>,
    /// Free-text notes. Defaults to empty.
    pub notes: String,
    /// The transaction type id. `None` defaults to `"Manual"`.
    pub transaction_type_id: Option<i64>,
    /// Semantic posting time. `None` defaults to current wall-clock time.
    pub posted_at: Option<DateTime<Utc>>,
}

impl CreateTransactionInput {
    /// Builds a minimal input with empty notes, no evidence, and a
    /// default-provisioned type and posting time.
    #[must_use]
    pub fn new(user: impl Into<String>, entries: Vec<NewLedgerEntry>) -> Self {
        Self {
            user: user.into(),
            evidence: Vec::new(),
            entries,
            notes: String::new(),
            transaction_type_id: None,
            posted_at: None,
        }
    }

    /// Attaches evidence to the input, builder-style.
    #[must_use]
    pub fn with_evidence(mut self, evidence: Vec<EvidenceRef>) -> Self {
        self.evidence = evidence;
        self
    }

    /// Sets free-text notes, builder-style.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Inputs to [`crate::ledger::void::resolve_void`] / `void_transaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoidTransactionInput {
    /// Opaque reference to the user recording the void.
    pub user: String,
    /// Overrides the default `"Voiding transaction <id>"` notes.
    pub notes: Option<String>,
    /// Overrides the voided transaction's type.
    pub transaction_type_id: Option<i64>,
    /// Overrides the voided transaction's `posted_at`.
    pub posted_at: Option<DateTime<Utc>>,
}

impl VoidTransactionInput {
    /// Builds a void input that takes every default from the voided
    /// transaction.
    #[must_use]
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into(), notes: None, transaction_type_id: None, posted_at: None }
    }
}

/// The predicate mode for [`crate::ledger::evidence::matches`] /
/// `filter_by_related_objects`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    /// `Tev ∩ E ≠ ∅`
    Any,
    /// `E ⊆ Tev`
    All,
    /// `Tev ∩ E = ∅`
    None,
    /// `Tev = E`
    Exact,
}

impl std::str::FromStr for MatchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ANY" => Ok(Self::Any),
            "ALL" => Ok(Self::All),
            "NONE" => Ok(Self::None),
            "EXACT" => Ok(Self::Exact),
            other => Err(other.to_string()),
        }
    }
}

/// A denormalized running total for a `(ledger, evidence)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBalance {
    /// Primary key.
    pub id: i64,
    /// The ledger this balance is for.
    pub ledger_id: i64,
    /// The evidence this balance is for.
    pub evidence: EvidenceRef,
    /// The running total.
    pub balance: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub modified_at: DateTime<Utc>,
}
