//! C8: the matching driver — the per-row decision procedure (spec.md §4.8)
//! that turns one [`EsoaRow`] plus the built [`CandidateIndex`] and
//! [`SynonymGraph`] into a single [`MatchOutcome`].

use std::sync::Arc;

use crate::matching::candidate_index::CandidateIndex;
use crate::matching::dose_matcher::doses_match;
use crate::matching::dose_parser::dose_key_from_row;
use crate::matching::form_route_oracle::{forms_compatible, route_matches};
use crate::matching::name_normalizer::{
    apply_component_fixes, extract_clean_generics, extract_generics_from_description,
};
use crate::matching::synonym_graph::SynonymGraph;
use crate::models::candidate::AnnexCandidate;
use crate::models::dose::DoseKey;
use crate::models::esoa::{EsoaRow, QualifierDetails};
use crate::models::reason::{MatchOutcome, MatchReason};

/// Score a candidate against an ESOA row's qualifier columns — used only to
/// break ties among candidates that already pass dose, form, and route.
/// Lower is a better match (spec.md §4.8 step 6): each qualifier detail the
/// ESOA row carries that is corroborated by (substring-contained in) the
/// candidate's description subtracts points, release details the most since
/// a release-form distinction ("EXTENDED RELEASE" vs plain) is the most
/// specific signal available. Never used to accept a candidate that fails
/// dose/form/route, only to choose among ones that already passed.
fn rank_candidate(qualifiers: &QualifierDetails, iv_diluent_type: Option<&str>, candidate: &AnnexCandidate) -> i32 {
    let description = candidate.description.to_uppercase();
    let mut score = 0;

    let mut credit = |detail: Option<&str>, weight: i32| {
        if let Some(detail) = detail {
            let detail = detail.trim().to_uppercase();
            if !detail.is_empty() && description.contains(&detail) {
                score -= weight;
            }
        }
    };

    credit(qualifiers.release_details.as_deref(), 10);
    credit(qualifiers.type_details.as_deref(), 5);
    credit(qualifiers.form_details.as_deref(), 5);
    credit(qualifiers.indication_details.as_deref(), 5);
    credit(iv_diluent_type, 5);
    credit(qualifiers.salt_details.as_deref(), 3);
    credit(qualifiers.iv_diluent_amount.as_deref(), 3);
    credit(qualifiers.alias_details.as_deref(), 2);

    score
}

/// Pick the best-ranked candidate among `candidates`, breaking ties by
/// first-seen order (spec.md invariant I4 — `CandidateIndex` already
/// preserves that order, so the first strictly-minimal score wins). Lower
/// `rank_candidate` score wins.
fn pick_best<'a>(
    candidates: &[&'a Arc<AnnexCandidate>],
    qualifiers: &QualifierDetails,
    iv_diluent_type: Option<&str>,
) -> &'a Arc<AnnexCandidate> {
    let mut best = candidates[0];
    let mut best_score = rank_candidate(qualifiers, iv_diluent_type, best);
    for candidate in &candidates[1..] {
        let score = rank_candidate(qualifiers, iv_diluent_type, candidate);
        if score < best_score {
            best = candidate;
            best_score = score;
        }
    }
    best
}

/// Resolve the set of generic-name variants to look up: the row's own clean
/// generics (or the description fallback when those are empty), each
/// expanded through the synonym graph.
fn resolve_generic_variants(row: &EsoaRow, synonyms: &SynonymGraph) -> Vec<String> {
    let fixed = apply_component_fixes(&row.generic_name);
    let mut clean = extract_clean_generics(&fixed);
    if clean.is_empty() {
        clean = extract_generics_from_description(&row.description);
    }

    let mut variants = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for generic in &clean {
        for variant in synonyms.expand(generic) {
            if seen.insert(variant.clone()) {
                variants.push(variant);
            }
        }
    }
    variants
}

/// Match one ESOA row against the candidate index, per spec.md §4.8:
/// 1. Extract the clean generic name(s), falling back to the description.
/// 2. Build the row's dose key; an ESOA row with no parseable dose at all
///    is classified immediately, before candidates are even collected —
///    there is nothing a dose-less row could ever perfectly match.
/// 3. Expand through the synonym graph and collect every Annex F candidate
///    under any resulting name, deduplicated by `drug_code`.
/// 4. Filter independently by dose, form, and route compatibility.
/// 5. A candidate passing all three is a perfect match; ties are broken by
///    qualifier-detail overlap, then by first-seen order.
/// 6. Otherwise classify why no candidate qualified: the first dimension
///    (dose, then form, then route) with no passing candidate; if each
///    dimension has at least one passer but no single candidate passes all
///    three, the reason is a combined mismatch.
pub fn match_row(row: &EsoaRow, index: &CandidateIndex, synonyms: &SynonymGraph) -> MatchOutcome {
    let generic_variants = resolve_generic_variants(row, synonyms);
    if generic_variants.is_empty() {
        return MatchOutcome::none(MatchReason::NoGeneric);
    }

    let esoa_dose = dose_key_from_row(
        &row.structured_dose,
        row.raw_dose.as_deref(),
        &row.description,
        &row.generic_name,
    );
    if matches!(esoa_dose, DoseKey::None) {
        return MatchOutcome::none(MatchReason::NoPerfectMatchNoDoseInEsoa);
    }

    let mut candidates: Vec<&Arc<AnnexCandidate>> = Vec::new();
    let mut seen_codes = std::collections::HashSet::new();
    for generic in &generic_variants {
        for candidate in index.candidates_for(generic) {
            if seen_codes.insert(candidate.drug_code.clone()) {
                candidates.push(candidate);
            }
        }
    }
    if candidates.is_empty() {
        return MatchOutcome::none(MatchReason::GenericNotInAnnex);
    }

    let dose_pass: Vec<&Arc<AnnexCandidate>> = candidates
        .iter()
        .filter(|c| doses_match(&esoa_dose, &c.dose_key))
        .copied()
        .collect();
    let form_pass: Vec<&Arc<AnnexCandidate>> = candidates
        .iter()
        .filter(|c| {
            forms_compatible(
                c.form.as_deref(),
                row.form.as_deref(),
                c.route.as_deref(),
                row.route.as_deref(),
            )
        })
        .copied()
        .collect();
    let route_pass: Vec<&Arc<AnnexCandidate>> = candidates
        .iter()
        .filter(|c| route_matches(row.route.as_deref(), c.route.as_deref()))
        .copied()
        .collect();

    let all_three: Vec<&Arc<AnnexCandidate>> = dose_pass
        .iter()
        .filter(|c| {
            let code = &c.drug_code;
            form_pass.iter().any(|f| &f.drug_code == code)
                && route_pass.iter().any(|r| &r.drug_code == code)
        })
        .copied()
        .collect();

    if !all_three.is_empty() {
        let best = pick_best(
            &all_three,
            &row.qualifiers,
            row.structured_dose.iv_diluent_type.as_deref(),
        );
        return MatchOutcome::new(Some(best.drug_code.clone()), MatchReason::MatchedPerfect);
    }

    if dose_pass.is_empty() {
        return MatchOutcome::none(MatchReason::NoPerfectMatchDoseMismatch);
    }
    if form_pass.is_empty() {
        return MatchOutcome::none(MatchReason::NoPerfectMatchFormMismatch);
    }
    if route_pass.is_empty() {
        return MatchOutcome::none(MatchReason::NoPerfectMatchRouteMismatch);
    }

    // Each dimension individually has at least one passing candidate, but no
    // single candidate passes all three at once.
    MatchOutcome::none(MatchReason::NoPerfectMatchCombinedMismatch)
}
