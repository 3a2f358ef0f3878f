//! End-to-end matching scenarios exercised through the public API: build an
//! index and synonym graph, match a row, check the outcome.

use esoa_matcher::matching::candidate_index::CandidateIndex;
use esoa_matcher::matching::synonym_graph::SynonymGraph;
use esoa_matcher::matching::{dose_parser, match_row};
use esoa_matcher::models::candidate::AnnexCandidate;
use esoa_matcher::models::dose::{ConcUnit, DiluentClass, DoseKey};
use esoa_matcher::models::esoa::{EsoaRow, QualifierDetails, StructuredDose};
use esoa_matcher::models::reason::MatchReason;

fn candidate(drug_code: &str, generic: &str, dose_raw: &str, form: &str, route: &str) -> AnnexCandidate {
    AnnexCandidate {
        drug_code: drug_code.to_string(),
        atc_code: None,
        drugbank_id: None,
        primary_generic: generic.to_string(),
        dose_key: dose_parser::parse(Some(dose_raw)),
        form: Some(form.to_string()),
        route: Some(route.to_string()),
        description: format!("{generic} {dose_raw} {form}"),
    }
}

fn esoa_row(generic: &str, dose_raw: &str, form: &str, route: &str) -> EsoaRow {
    EsoaRow {
        description: format!("{generic} {dose_raw} {form}"),
        generic_name: generic.to_string(),
        form: Some(form.to_string()),
        route: Some(route.to_string()),
        raw_dose: Some(dose_raw.to_string()),
        structured_dose: StructuredDose::default(),
        qualifiers: QualifierDetails::default(),
    }
}

#[test]
fn tablet_exact_match() {
    let index = CandidateIndex::build([candidate("D1", "PARACETAMOL", "500MG", "TABLET", "ORAL")]);
    let synonyms = SynonymGraph::build(std::iter::empty());
    let row = esoa_row("PARACETAMOL", "500MG", "TABLET", "ORAL");

    let outcome = match_row(&row, &index, &synonyms);

    assert_eq!(outcome.reason, MatchReason::MatchedPerfect);
    assert_eq!(outcome.drug_code.as_deref(), Some("D1"));
}

#[test]
fn dose_mismatch_prevents_a_perfect_match() {
    let index = CandidateIndex::build([candidate("D1", "PARACETAMOL", "500MG", "TABLET", "ORAL")]);
    let synonyms = SynonymGraph::build(std::iter::empty());
    let row = esoa_row("PARACETAMOL", "250MG", "TABLET", "ORAL");

    let outcome = match_row(&row, &index, &synonyms);

    assert_eq!(outcome.reason, MatchReason::NoPerfectMatchDoseMismatch);
    assert_eq!(outcome.drug_code, None);
}

#[test]
fn concentration_matches_despite_different_vial_size() {
    // Same concentration, different packaged volume — volume is ignored
    // when comparing two Conc keys.
    let index = CandidateIndex::build([candidate(
        "D1",
        "GENTAMICIN",
        "100MG/ML|10ML",
        "VIAL",
        "INTRAVENOUS",
    )]);
    let synonyms = SynonymGraph::build(std::iter::empty());
    let row = esoa_row("GENTAMICIN", "100MG/ML|5ML", "VIAL", "IV");

    let outcome = match_row(&row, &index, &synonyms);

    assert_eq!(outcome.reason, MatchReason::MatchedPerfect);
    assert_eq!(outcome.drug_code.as_deref(), Some("D1"));
}

#[test]
fn iv_diluent_class_distinguishes_otherwise_identical_doses() {
    let mut water = candidate("D1", "DEXTROSE", "500ML WATER FOR INJECTION", "BOTTLE", "IV");
    water.dose_key = DoseKey::Iv {
        concentration_mg_per_ml: Some(50.0),
        diluent_class: Some(DiluentClass::Water),
        total_volume_ml: Some(500.0),
    };
    let index = CandidateIndex::build([water]);
    let synonyms = SynonymGraph::build(std::iter::empty());

    let mut row = esoa_row("DEXTROSE", "", "BOTTLE", "IV");
    row.raw_dose = None;
    row.structured_dose = StructuredDose {
        drug_amount_mg: None,
        concentration_mg_per_ml: Some(50.0),
        iv_diluent_type: Some("NORMAL SALINE".to_string()),
        total_volume_ml: Some(500.0),
    };

    let outcome = match_row(&row, &index, &synonyms);

    assert_eq!(outcome.reason, MatchReason::NoPerfectMatchDoseMismatch);
}

#[test]
fn combination_drug_matches_regardless_of_component_order() {
    let index = CandidateIndex::build([candidate(
        "D1",
        "AMLODIPINE/ATORVASTATIN",
        "10MG/5MG",
        "TABLET",
        "ORAL",
    )]);
    let synonyms = SynonymGraph::build(std::iter::empty());
    let row = esoa_row("AMLODIPINE/ATORVASTATIN", "5MG/10MG", "TABLET", "ORAL");

    let outcome = match_row(&row, &index, &synonyms);

    assert_eq!(outcome.reason, MatchReason::MatchedPerfect);
    assert_eq!(outcome.drug_code.as_deref(), Some("D1"));
}

#[test]
fn combo_total_matches_a_plain_total_dose_candidate() {
    // A combination written out with its own components on the ESOA side
    // matches an Annex candidate recorded as a single combined dose, as
    // long as the totals agree.
    let index = CandidateIndex::build([candidate(
        "D1",
        "CO-AMOXICLAV",
        "625|MG",
        "TABLET",
        "ORAL",
    )]);
    let synonyms = SynonymGraph::build(std::iter::empty());
    let row = esoa_row("CO-AMOXICLAV", "500MG+125MG", "TABLET", "ORAL");

    let outcome = match_row(&row, &index, &synonyms);

    assert_eq!(outcome.reason, MatchReason::MatchedPerfect);
    assert_eq!(outcome.drug_code.as_deref(), Some("D1"));
}

#[test]
fn synonym_resolution_and_tie_break_on_release_qualifier() {
    // Two candidates for the same canonical generic differ only in their
    // description text; the ESOA row's release-details qualifier ("MR" —
    // modified release) is corroborated by only one of them.
    let index = CandidateIndex::build([
        {
            let mut c = candidate("D1", "ACETAMINOPHEN", "500MG", "TABLET", "ORAL");
            c.description = "ACETAMINOPHEN 500MG TABLET".to_string();
            c
        },
        {
            let mut c = candidate("D2", "ACETAMINOPHEN", "500MG", "TABLET", "ORAL");
            c.description = "ACETAMINOPHEN 500MG TABLET MR".to_string();
            c
        },
    ]);
    let synonyms = SynonymGraph::build(std::iter::empty());

    let mut row = esoa_row("PARACETAMOL", "500MG", "TABLET", "ORAL");
    row.qualifiers.release_details = Some("MR".to_string());

    let outcome = match_row(&row, &index, &synonyms);

    assert_eq!(outcome.reason, MatchReason::MatchedPerfect);
    assert_eq!(outcome.drug_code.as_deref(), Some("D2"));
}
