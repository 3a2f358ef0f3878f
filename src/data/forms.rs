//! C1: form equivalence, form-to-route, and route-synonym tables consulted
//! by the form/route oracle (C6, spec.md §4.6). Closed data, built once and
//! read thereafter — mirrors the teacher's `OnceLock`-compiled-once pattern
//! used for regexes in `utils/validators.rs`.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

type FormSet = HashSet<&'static str>;

/// Dosage forms considered direct spelling/naming variants of one another.
/// Symmetric: if `a` maps to a set containing `b`, `b`'s set contains `a`.
pub fn form_equivalents() -> &'static HashMap<&'static str, FormSet> {
    static TABLE: OnceLock<HashMap<&'static str, FormSet>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let pairs: &[(&str, &[&str])] = &[
            ("AMPULE", &["AMPOULE"]),
            ("AMPOULE", &["AMPULE"]),
            ("CAPSULE", &["CAPLET"]),
            ("CAPLET", &["CAPSULE"]),
            ("OINTMENT", &["UNGUENT"]),
            ("UNGUENT", &["OINTMENT"]),
            ("NEBULE", &["NEBULIZER VIAL", "NEBULIZER SOLUTION"]),
            ("NEBULIZER VIAL", &["NEBULE"]),
            ("NEBULIZER SOLUTION", &["NEBULE"]),
            ("SUPPOSITORY", &["PESSARY"]),
            ("PESSARY", &["SUPPOSITORY"]),
        ];
        pairs
            .iter()
            .map(|(form, syns)| (*form, syns.iter().copied().collect()))
            .collect()
    })
}

/// `true` iff `a` and `b` are listed as equivalents of each other (checked
/// both directions, since the static map is not guaranteed closed under
/// inversion — same caveat as the synonym graph, spec.md §4.3).
pub fn forms_are_equivalent(a: &str, b: &str) -> bool {
    let table = form_equivalents();
    table.get(a).is_some_and(|set| set.contains(b)) || table.get(b).is_some_and(|set| set.contains(a))
}

/// Valid administration routes for a dosage form.
pub fn form_to_routes() -> &'static HashMap<&'static str, FormSet> {
    static TABLE: OnceLock<HashMap<&'static str, FormSet>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let pairs: &[(&str, &[&str])] = &[
            ("TABLET", &["ORAL"]),
            ("CAPSULE", &["ORAL"]),
            ("CAPLET", &["ORAL"]),
            ("SYRUP", &["ORAL"]),
            ("SUSPENSION", &["ORAL"]),
            ("SOLUTION", &["ORAL", "INTRAVENOUS"]),
            ("ELIXIR", &["ORAL"]),
            ("LIQUID", &["ORAL"]),
            ("DROPS", &["ORAL", "OPHTHALMIC", "OTIC", "NASAL"]),
            ("AMPULE", &["INTRAVENOUS", "INTRAMUSCULAR", "SUBCUTANEOUS"]),
            ("AMPOULE", &["INTRAVENOUS", "INTRAMUSCULAR", "SUBCUTANEOUS"]),
            ("VIAL", &["INTRAVENOUS", "INTRAMUSCULAR", "SUBCUTANEOUS"]),
            ("INJECTION", &["INTRAVENOUS", "INTRAMUSCULAR", "SUBCUTANEOUS"]),
            ("BOTTLE", &["INTRAVENOUS", "ORAL"]),
            ("NEBULE", &["INHALATION"]),
            ("NEBULIZER", &["INHALATION"]),
            ("INHALER", &["INHALATION"]),
            ("AEROSOL", &["INHALATION"]),
            ("MDI", &["INHALATION"]),
            ("DPI", &["INHALATION"]),
            ("CREAM", &["TOPICAL"]),
            ("OINTMENT", &["TOPICAL"]),
            ("GEL", &["TOPICAL"]),
            ("LOTION", &["TOPICAL"]),
            ("GRANULE", &["ORAL"]),
            ("POWDER", &["ORAL", "INTRAVENOUS"]),
            ("SACHET", &["ORAL"]),
            ("SUPPOSITORY", &["RECTAL", "VAGINAL"]),
            ("PESSARY", &["VAGINAL"]),
            ("PATCH", &["TOPICAL"]),
        ];
        pairs
            .iter()
            .map(|(form, routes)| (*form, routes.iter().copied().collect()))
            .collect()
    })
}

/// Route equivalence groups: two routes are interchangeable if they share a
/// group. Lookup expands a route to the union of every group containing it.
pub fn route_synonym_groups() -> &'static Vec<FormSet> {
    static GROUPS: OnceLock<Vec<FormSet>> = OnceLock::new();
    GROUPS.get_or_init(|| {
        let raw: &[&[&str]] = &[
            &["ORAL", "PO", "BY MOUTH"],
            &[
                "PARENTERAL",
                "INTRAVENOUS",
                "IV",
                "INTRAMUSCULAR",
                "IM",
                "SUBCUTANEOUS",
                "SC",
                "SQ",
            ],
            &["INTRAVENOUS", "IV", "PARENTERAL"],
            &["INTRAMUSCULAR", "IM", "PARENTERAL"],
            &["SUBCUTANEOUS", "SC", "SQ", "PARENTERAL"],
            &["INHALATION", "RESPIRATORY", "INHALED", "NEBULIZATION"],
            &["TOPICAL", "EXTERNAL", "CUTANEOUS"],
            &["OPHTHALMIC", "EYE", "OCULAR"],
            &["OTIC", "EAR", "AURAL"],
            &["NASAL", "INTRANASAL"],
            &["RECTAL", "PR"],
            &["VAGINAL", "PV"],
        ];
        raw.iter().map(|group| group.iter().copied().collect()).collect()
    })
}

/// Expand a single route to the union of every synonym group it belongs to
/// (always includes the route itself, even if it appears in no group).
pub fn expand_route(route: &str) -> HashSet<String> {
    let mut expanded: HashSet<String> = HashSet::new();
    expanded.insert(route.to_string());
    for group in route_synonym_groups() {
        if group.contains(route) {
            expanded.extend(group.iter().map(|s| s.to_string()));
        }
    }
    expanded
}

/// Forms that are "clearly compatible" regardless of route — the fallback
/// used by C6 step 7 when neither side carries route information.
pub fn compatible_form_groups() -> &'static Vec<FormSet> {
    static GROUPS: OnceLock<Vec<FormSet>> = OnceLock::new();
    GROUPS.get_or_init(|| {
        let raw: &[&[&str]] = &[
            &["AMPULE", "AMPOULE", "VIAL", "INJECTION", "BOTTLE"],
            &["SYRUP", "SUSPENSION", "SOLUTION", "ELIXIR", "LIQUID", "DROPS"],
            &["TABLET", "CAPSULE", "CAPLET"],
            &["NEBULE", "NEBULIZER", "INHALER", "AEROSOL", "MDI", "DPI"],
            &["CREAM", "OINTMENT", "GEL", "LOTION"],
            &["GRANULE", "POWDER", "SACHET"],
        ];
        raw.iter().map(|group| group.iter().copied().collect()).collect()
    })
}
