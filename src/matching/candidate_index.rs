//! C7: the candidate index — Annex F candidates grouped by generic name,
//! deduplicated by `drug_code` with first-seen order preserved (spec.md
//! invariant I4).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::matching::name_normalizer::strip_parenthetical;
use crate::models::candidate::AnnexCandidate;

/// Read-only once built, shared across rayon workers without locking
/// (spec.md §5) — the same pattern as [`crate::matching::synonym_graph::SynonymGraph`].
/// Each candidate is indexed under up to two names — its exact generic and,
/// when different, the generic with any trailing parenthetical qualifier
/// stripped (spec.md §4.7) — so a query that resolves to either form finds
/// it. A secondary `drugbank_id` index is kept for downstream consumers
/// (not consulted by the matching driver itself).
#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    by_generic: HashMap<String, Vec<Arc<AnnexCandidate>>>,
    by_drugbank_id: HashMap<String, Vec<Arc<AnnexCandidate>>>,
    total: usize,
}

impl CandidateIndex {
    /// Build the index from an Annex F candidate stream. A `drug_code` seen
    /// more than once keeps only its first occurrence, in input order.
    pub fn build(candidates: impl IntoIterator<Item = AnnexCandidate>) -> Self {
        let mut by_generic: HashMap<String, Vec<Arc<AnnexCandidate>>> = HashMap::new();
        let mut by_drugbank_id: HashMap<String, Vec<Arc<AnnexCandidate>>> = HashMap::new();
        let mut seen_codes: HashSet<String> = HashSet::new();
        let mut total = 0;

        for candidate in candidates {
            if !seen_codes.insert(candidate.drug_code.clone()) {
                continue;
            }
            total += 1;
            let base = strip_parenthetical(&candidate.primary_generic);
            let drugbank_id = candidate.drugbank_id.clone();
            let candidate = Arc::new(candidate);

            by_generic
                .entry(candidate.primary_generic.clone())
                .or_default()
                .push(candidate.clone());
            if let Some(base) = base {
                by_generic.entry(base).or_default().push(candidate.clone());
            }
            if let Some(drugbank_id) = drugbank_id {
                by_drugbank_id.entry(drugbank_id).or_default().push(candidate);
            }
        }

        Self {
            by_generic,
            by_drugbank_id,
            total,
        }
    }

    /// All candidates indexed under `generic`, in first-seen order. Empty
    /// slice if the generic has no Annex F candidates.
    pub fn candidates_for(&self, generic: &str) -> &[Arc<AnnexCandidate>] {
        self.by_generic.get(generic).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All candidates sharing `drugbank_id`, in first-seen order.
    pub fn candidates_for_drugbank_id(&self, drugbank_id: &str) -> &[Arc<AnnexCandidate>] {
        self.by_drugbank_id.get(drugbank_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `true` iff at least one candidate is indexed under `generic`.
    pub fn has_generic(&self, generic: &str) -> bool {
        self.by_generic.contains_key(generic)
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
