//! The Annex F candidate: an authoritative drug-code entry, immutable once
//! indexed by [`crate::matching::candidate_index::CandidateIndex`].

use serde::{Deserialize, Serialize};

use super::dose::DoseKey;

/// One Annex F row, reduced to the fields the matcher reasons over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnexCandidate {
    pub drug_code: String,
    pub atc_code: Option<String>,
    pub drugbank_id: Option<String>,
    /// The first clean generic extracted from the row's generic-name column.
    pub primary_generic: String,
    pub dose_key: DoseKey,
    pub form: Option<String>,
    pub route: Option<String>,
    pub description: String,
}
