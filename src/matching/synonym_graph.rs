//! C3: the bidirectional drug-name synonym graph (spec.md §4.3).

use std::collections::{HashMap, HashSet};

use crate::data::synonyms::all_drug_synonyms;

/// A closed, in-memory graph of drug-name synonym edges, built once from the
/// static seed table plus any generics-master augmentation supplied at
/// construction time. Read-only after [`SynonymGraph::build`] returns, which
/// is what lets the matching driver share one instance across rayon workers
/// without locking (spec.md §5).
#[derive(Debug, Clone)]
pub struct SynonymGraph {
    edges: HashMap<String, HashSet<String>>,
}

impl SynonymGraph {
    /// Build the graph from the static seed pairs plus `extra_pairs` (e.g.
    /// generic/synonym pairs sourced from a generics-master CSV, already
    /// pipe-split into one pair per synonym). Every pair is inserted in both
    /// directions regardless of the direction it was given in, since the
    /// source tables are not guaranteed closed under inversion. A pair whose
    /// two endpoints are equal is skipped — it would only add a useless
    /// self-loop (spec.md §4.3).
    pub fn build(extra_pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut edges: HashMap<String, HashSet<String>> = HashMap::new();

        let mut insert_pair = |a: String, b: String| {
            if a == b {
                return;
            }
            edges.entry(a.clone()).or_default().insert(b.clone());
            edges.entry(b).or_default().insert(a);
        };

        for (a, b) in all_drug_synonyms() {
            insert_pair(a.to_string(), b.to_string());
        }
        for (a, b) in extra_pairs {
            insert_pair(a, b);
        }

        Self { edges }
    }

    /// All known synonym variants of `name`, not including `name` itself.
    /// Empty if the name has no recorded synonyms.
    pub fn variants(&self, name: &str) -> HashSet<String> {
        self.edges.get(name).cloned().unwrap_or_default()
    }

    /// `name` plus every known variant — the candidate set a matcher should
    /// try when resolving a generic name against Annex F.
    pub fn expand(&self, name: &str) -> HashSet<String> {
        let mut set = self.variants(name);
        set.insert(name.to_string());
        set
    }

    /// `true` iff `a` and `b` are the same name or known synonyms of one
    /// another.
    pub fn are_synonyms(&self, a: &str, b: &str) -> bool {
        a == b || self.variants(a).contains(b) || self.variants(b).contains(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_pairs_are_reachable_in_both_directions() {
        let graph = SynonymGraph::build(std::iter::empty());
        assert!(graph.variants("PARACETAMOL").contains("ACETAMINOPHEN"));
        assert!(graph.variants("ACETAMINOPHEN").contains("PARACETAMOL"));
    }

    #[test]
    fn are_synonyms_is_reflexive_and_symmetric() {
        let graph = SynonymGraph::build(std::iter::empty());
        assert!(graph.are_synonyms("SALBUTAMOL", "SALBUTAMOL"));
        assert!(graph.are_synonyms("SALBUTAMOL", "ALBUTEROL"));
        assert!(graph.are_synonyms("ALBUTEROL", "SALBUTAMOL"));
    }

    #[test]
    fn unknown_name_has_no_variants() {
        let graph = SynonymGraph::build(std::iter::empty());
        assert!(graph.variants("NOT-A-DRUG").is_empty());
    }

    #[test]
    fn extra_pairs_augment_the_static_seed() {
        let graph = SynonymGraph::build([(
            "SOME GENERIC".to_string(),
            "SOME BRAND".to_string(),
        )]);
        assert!(graph.are_synonyms("SOME GENERIC", "SOME BRAND"));
        // Static seed pairs still work alongside the augmentation.
        assert!(graph.are_synonyms("FRUSEMIDE", "FUROSEMIDE"));
    }

    #[test]
    fn expand_includes_the_name_itself() {
        let graph = SynonymGraph::build(std::iter::empty());
        let expanded = graph.expand("ASPIRIN");
        assert!(expanded.contains("ASPIRIN"));
        assert!(expanded.contains("ACETYLSALICYLIC ACID"));
    }
}
