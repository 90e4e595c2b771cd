//! Pure evidence-set predicate logic for the four `MatchType` match modes.
//!
//! This module defines the predicates in terms of plain sets so they are
//! unit-testable independent of storage, and gives `ledgerkeep-db` a single
//! place both the SQL composition (ANY/ALL/NONE) and the in-memory
//! second-phase comparison (EXACT) can agree on.

use std::collections::HashSet;

use super::types::EvidenceRef;

/// Evaluates whether `transaction_evidence` (`Tev`) satisfies `match_type`
/// against the query evidence set `e`.
///
/// This is the reference semantics every storage-layer implementation of
/// `filter_by_related_objects` must agree with; see §4.4.
#[must_use]
pub fn matches(
    transaction_evidence: &HashSet<EvidenceRef>,
    e: &HashSet<EvidenceRef>,
    match_type: super::types::MatchType,
) -> bool {
    use super::types::MatchType::{All, Any, Exact, None};
    match match_type {
        Any => e.is_empty() || !transaction_evidence.is_disjoint(e),
        All => e.is_subset(transaction_evidence),
        None => e.is_empty() || transaction_evidence.is_disjoint(e),
        Exact => transaction_evidence == e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::MatchType;

    fn set(items: &[(&str, i64)]) -> HashSet<EvidenceRef> {
        items.iter().map(|(tag, id)| EvidenceRef::new(*tag, *id)).collect()
    }

    #[test]
    fn empty_query_set_reduces_to_no_constraint_except_exact() {
        let tev = set(&[("order", 1)]);
        let empty = HashSet::new();
        assert!(matches(&tev, &empty, MatchType::Any));
        assert!(matches(&tev, &empty, MatchType::All));
        assert!(matches(&tev, &empty, MatchType::None));
        assert!(!matches(&tev, &empty, MatchType::Exact));

        let no_evidence = HashSet::new();
        assert!(matches(&no_evidence, &empty, MatchType::Exact));
    }

    #[test]
    fn any_requires_nonempty_intersection() {
        let e = set(&[("order", 1), ("order", 2)]);
        assert!(matches(&set(&[("order", 1)]), &e, MatchType::Any));
        assert!(!matches(&set(&[("order", 3)]), &e, MatchType::Any));
    }

    #[test]
    fn all_requires_subset_and_permits_extra_evidence() {
        let e = set(&[("order", 1), ("order", 2)]);
        assert!(matches(&set(&[("order", 1), ("order", 2), ("order", 4)]), &e, MatchType::All));
        assert!(!matches(&set(&[("order", 1)]), &e, MatchType::All));
    }

    #[test]
    fn none_requires_disjointness() {
        let e = set(&[("order", 1), ("order", 2)]);
        assert!(matches(&set(&[("order", 3)]), &e, MatchType::None));
        assert!(!matches(&set(&[("order", 1)]), &e, MatchType::None));
    }

    #[test]
    fn exact_requires_equality() {
        let e = set(&[("order", 1), ("order", 2)]);
        assert!(matches(&set(&[("order", 1), ("order", 2)]), &e, MatchType::Exact));
        assert!(!matches(&set(&[("order", 1), ("order", 2), ("order", 4)]), &e, MatchType::Exact));
        assert!(!matches(&set(&[("order", 1)]), &e, MatchType::Exact));
    }

    #[test]
    fn filter_laws_any_none_partition_and_all_exact_subsets() {
        // ANY(E) ∪ NONE(E) == all, ANY(E) ∩ NONE(E) == ∅, for a sample of Tev sets.
        let e = set(&[("order", 1), ("order", 2)]);
        let samples = [
            set(&[]),
            set(&[("order", 1)]),
            set(&[("order", 3)]),
            set(&[("order", 1), ("order", 2)]),
            set(&[("order", 1), ("order", 2), ("order", 4)]),
        ];
        for tev in &samples {
            let any = matches(tev, &e, MatchType::Any);
            let none = matches(tev, &e, MatchType::None);
            assert_ne!(any, none, "ANY and NONE must partition, tev={tev:?}");

            let all = matches(tev, &e, MatchType::All);
            let exact = matches(tev, &e, MatchType::Exact);
            if exact {
                assert!(all, "EXACT(E) must be a subset of ALL(E)");
            }
            if all {
                assert!(any, "ALL(E) must be a subset of ANY(E)");
            }
        }
    }

    use proptest::prelude::*;

    fn evidence_set_strategy() -> impl Strategy<Value = HashSet<EvidenceRef>> {
        proptest::collection::hash_set((0u8..4).prop_map(|id| EvidenceRef::new("order", i64::from(id))), 0..5)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// For any evidence sets, `ANY` and `NONE` partition the space:
        /// exactly one of them holds, never both, never neither.
        #[test]
        fn prop_any_and_none_partition(tev in evidence_set_strategy(), e in evidence_set_strategy()) {
            let any = matches(&tev, &e, MatchType::Any);
            let none = matches(&tev, &e, MatchType::None);
            prop_assert_ne!(any, none);
        }

        /// `EXACT(E) => ALL(E) => ANY(E)` whenever `E` is non-empty.
        #[test]
        fn prop_exact_implies_all_implies_any(tev in evidence_set_strategy(), e in evidence_set_strategy()) {
            prop_assume!(!e.is_empty());
            let exact = matches(&tev, &e, MatchType::Exact);
            let all = matches(&tev, &e, MatchType::All);
            let any = matches(&tev, &e, MatchType::Any);
            if exact {
                prop_assert!(all);
            }
            if all {
                prop_assert!(any);
            }
        }
    }
}
