//! The match reason: the classification outcome every ESOA row receives.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-null for every processed row (spec.md §7: "The output schema
/// guarantees a non-null `drug_code_match_reason` for every input row").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchReason {
    NoGeneric,
    GenericNotInAnnex,
    NoPerfectMatchNoDoseInEsoa,
    NoPerfectMatchDoseMismatch,
    NoPerfectMatchFormMismatch,
    NoPerfectMatchRouteMismatch,
    NoPerfectMatchCombinedMismatch,
    MatchedPerfect,
}

impl MatchReason {
    /// The exact string written into the `drug_code_match_reason` column.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchReason::NoGeneric => "no_generic",
            MatchReason::GenericNotInAnnex => "generic_not_in_annex",
            MatchReason::NoPerfectMatchNoDoseInEsoa => "no_perfect_match:no_dose_in_esoa",
            MatchReason::NoPerfectMatchDoseMismatch => "no_perfect_match:dose_mismatch",
            MatchReason::NoPerfectMatchFormMismatch => "no_perfect_match:form_mismatch",
            MatchReason::NoPerfectMatchRouteMismatch => "no_perfect_match:route_mismatch",
            MatchReason::NoPerfectMatchCombinedMismatch => "no_perfect_match:combined_mismatch",
            MatchReason::MatchedPerfect => "matched_perfect",
        }
    }
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The `(drug_code, reason)` pair emitted per ESOA row by the matching
/// driver (C8). `drug_code` is `Some` iff `reason == MatchedPerfect`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub drug_code: Option<String>,
    pub reason: MatchReason,
}

impl MatchOutcome {
    pub fn new(drug_code: Option<String>, reason: MatchReason) -> Self {
        debug_assert_eq!(
            drug_code.is_some(),
            reason == MatchReason::MatchedPerfect,
            "drug_code must be Some iff reason is MatchedPerfect"
        );
        Self { drug_code, reason }
    }

    pub fn none(reason: MatchReason) -> Self {
        Self::new(None, reason)
    }
}
