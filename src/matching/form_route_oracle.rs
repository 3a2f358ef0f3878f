//! C6: the form/route compatibility oracle (spec.md §4.6). Missing
//! information is never treated as a mismatch — only a concrete
//! disagreement between two known values blocks a match.

use std::collections::HashSet;

use crate::data::forms::{compatible_form_groups, expand_route, form_to_routes, forms_are_equivalent};

/// `true` iff the two dosage forms are compatible, optionally narrowed by
/// each side's administration route (spec.md §4.6):
/// 1. Either form unknown → compatible.
/// 2. Forms equal → compatible.
/// 3. Forms listed as equivalents → compatible.
/// 4. Otherwise, look up each form's plausible route set (substring
///    containment as a fallback when the form isn't an exact table key).
/// 5. If a route is supplied for a side, narrow that side's route set to
///    just that route (as a constraint, not an expansion).
/// 6. Expand both route sets through the route-synonym groups and
///    intersect — a shared route makes the forms compatible.
/// 7. With no route information at all on either side, fall back to the
///    "clearly compatible" form groups.
pub fn forms_compatible(
    cand_form: Option<&str>,
    esoa_form: Option<&str>,
    cand_route: Option<&str>,
    esoa_route: Option<&str>,
) -> bool {
    let (cand_form, esoa_form) = match (cand_form, esoa_form) {
        (Some(a), Some(b)) => (a, b),
        _ => return true,
    };
    if cand_form == esoa_form || forms_are_equivalent(cand_form, esoa_form) {
        return true;
    }

    let cand_routes = routes_for_form(cand_form);
    let esoa_routes = routes_for_form(esoa_form);

    if cand_routes.is_none() && esoa_routes.is_none() {
        return compatible_form_groups()
            .iter()
            .any(|group| group.contains(cand_form) && group.contains(esoa_form));
    }

    let cand_routes = narrow(cand_routes, cand_route);
    let esoa_routes = narrow(esoa_routes, esoa_route);

    let cand_expanded = expand_all(&cand_routes);
    let esoa_expanded = expand_all(&esoa_routes);
    !cand_expanded.is_disjoint(&esoa_expanded)
}

fn routes_for_form(form: &str) -> Option<HashSet<String>> {
    if let Some(routes) = form_to_routes().get(form) {
        return Some(routes.iter().map(|r| r.to_string()).collect());
    }
    // Substring-containment fallback for forms not present verbatim in the
    // table (e.g. a tagger variant like "VIAL (MULTI-DOSE)").
    form_to_routes()
        .iter()
        .find(|(key, _)| form.contains(**key) || key.contains(form))
        .map(|(_, routes)| routes.iter().map(|r| r.to_string()).collect())
}

/// Narrow a form's route set to the single externally-supplied route, when
/// one was given — a constraint, never an expansion.
fn narrow(routes: Option<HashSet<String>>, external_route: Option<&str>) -> HashSet<String> {
    let routes = routes.unwrap_or_default();
    match external_route {
        Some(route) => {
            let mut narrowed = HashSet::new();
            narrowed.insert(route.to_string());
            narrowed
        }
        None => routes,
    }
}

fn expand_all(routes: &HashSet<String>) -> HashSet<String> {
    let mut expanded = HashSet::new();
    for route in routes {
        expanded.extend(expand_route(route));
    }
    expanded
}

/// `true` iff the two administration routes are the same or known synonyms
/// of one another, expanded transitively through the route-synonym groups.
/// Either side being unknown is non-blocking.
pub fn route_matches(a: Option<&str>, b: Option<&str>) -> bool {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return true,
    };
    if a == b {
        return true;
    }
    let expanded_a = expand_route(a);
    expanded_a.contains(b) || expand_route(b).contains(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_forms_are_compatible() {
        assert!(forms_compatible(Some("TABLET"), Some("TABLET"), None, None));
    }

    #[test]
    fn equivalent_forms_are_compatible() {
        assert!(forms_compatible(Some("AMPULE"), Some("AMPOULE"), None, None));
    }

    #[test]
    fn grouped_forms_are_compatible_with_no_route_information() {
        assert!(forms_compatible(Some("VIAL"), Some("AMPULE"), None, None));
    }

    #[test]
    fn unrelated_forms_with_disjoint_routes_are_incompatible() {
        assert!(!forms_compatible(Some("TABLET"), Some("VIAL"), None, None));
    }

    #[test]
    fn missing_form_information_is_non_blocking() {
        assert!(forms_compatible(None, Some("TABLET"), None, None));
        assert!(forms_compatible(None, None, None, None));
    }

    #[test]
    fn shared_route_makes_different_forms_compatible() {
        // SOLUTION allows ORAL or INTRAVENOUS; BOTTLE allows INTRAVENOUS or
        // ORAL — they share a route even though they are not equivalents.
        assert!(forms_compatible(Some("SOLUTION"), Some("BOTTLE"), None, None));
    }

    #[test]
    fn external_route_narrows_the_route_set() {
        // TABLET only implies ORAL; supplying an IV route for it should
        // eliminate any overlap with a VIAL's parenteral routes.
        assert!(!forms_compatible(
            Some("TABLET"),
            Some("VIAL"),
            Some("ORAL"),
            Some("INTRAVENOUS")
        ));
    }

    #[test]
    fn synonym_routes_match() {
        assert!(route_matches(Some("IV"), Some("INTRAVENOUS")));
    }

    #[test]
    fn unrelated_routes_do_not_match() {
        assert!(!route_matches(Some("ORAL"), Some("INTRAVENOUS")));
    }
}
