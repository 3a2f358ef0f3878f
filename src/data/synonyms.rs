//! C1: garbage-token denylist, the static drug-name synonym seed map, and
//! known wrong-component fixes (spec.md §4.1, §4.2, §4.3).

use std::collections::HashSet;
use std::sync::OnceLock;

/// Tokens that are never a real generic-name component: packaging noise,
/// placeholders, and the like.
pub fn garbage_tokens() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        [
            "N/A", "NA", "NONE", "UNKNOWN", "UNSPECIFIED", "GENERIC", "BRANDED", "MISC",
            "OTHERS", "OTHER", "TBD", "PLACEBO", "VARIOUS", "ASSORTED", "MIXED", "COMBINATION",
            "SUPPLEMENT", "VITAMIN", "MINERAL", "HERBAL", "NUTRITIONAL",
        ]
        .into_iter()
        .collect()
    })
}

/// Seed edges for the bidirectional synonym graph (spec.md §4.3). Each pair
/// is inserted in both directions by [`crate::matching::synonym_graph::SynonymGraph`];
/// this table itself need not be symmetric.
pub fn all_drug_synonyms() -> &'static [(&'static str, &'static str)] {
    &[
        ("PARACETAMOL", "ACETAMINOPHEN"),
        ("SALBUTAMOL", "ALBUTEROL"),
        ("ADRENALINE", "EPINEPHRINE"),
        ("FRUSEMIDE", "FUROSEMIDE"),
        ("GLYCERYL TRINITRATE", "NITROGLYCERIN"),
        ("PETHIDINE", "MEPERIDINE"),
        ("AMOXYCILLIN", "AMOXICILLIN"),
        ("CO-AMOXICLAV", "AMOXICILLIN/CLAVULANATE"),
        ("VIT. D3", "CHOLECALCIFEROL"),
        ("VITAMIN D3", "CHOLECALCIFEROL"),
        ("VIT. C", "ASCORBIC ACID"),
        ("VITAMIN C", "ASCORBIC ACID"),
        ("VIT. B1", "THIAMINE"),
        ("VIT. B6", "PYRIDOXINE"),
        ("VIT. B12", "CYANOCOBALAMIN"),
        ("ASA", "ACETYLSALICYLIC ACID"),
        ("ASPIRIN", "ACETYLSALICYLIC ACID"),
    ]
}

/// Known tagger mistakes: an uppercased substring known to be wrong is
/// replaced with the correct component name before generic extraction
/// (spec.md §4.2, "Wrong-component fix"). Applied in order, first match
/// per substring.
pub fn drugbank_component_synonyms() -> &'static [(&'static str, &'static str)] {
    &[
        ("HYDROCHLORTHIAZIDE", "HYDROCHLOROTHIAZIDE"),
        ("ACETYL SALICYLIC ACID", "ACETYLSALICYLIC ACID"),
        ("PARACETEMOL", "PARACETAMOL"),
        ("CO AMOXICLAV", "CO-AMOXICLAV"),
    ]
}
