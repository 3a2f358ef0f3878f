//! C2: name normalization — uppercasing, garbage filtering, and the two
//! generic-name extraction strategies (spec.md §4.2).

use std::sync::OnceLock;

use regex::Regex;

use crate::data::synonyms::{drugbank_component_synonyms, garbage_tokens};

fn pure_dose_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\d+(\.\d+)?\s*(MG|ML|MCG|G|IU|%|CC|L)$").expect("valid regex")
    })
}

fn description_leading_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Z][A-Z\s\-]+)").expect("valid regex"))
}

/// Trivial uppercase+trim; absent values are treated as empty string.
pub fn normalize_for_match(s: Option<&str>) -> String {
    s.unwrap_or("").trim().to_uppercase()
}

/// Strip a trailing parenthetical qualifier from a generic name, e.g.
/// `"IBUPROFEN (AS SODIUM)"` → `"IBUPROFEN"`. Returns `None` when the name
/// carries no parenthetical or stripping it would yield the same string
/// (spec.md §4.7 candidate-indexing base-name key).
pub fn strip_parenthetical(name: &str) -> Option<String> {
    let base = name.split('(').next().unwrap_or(name).trim();
    if base.is_empty() || base == name {
        None
    } else {
        Some(base.to_string())
    }
}

/// Apply `DRUGBANK_COMPONENT_SYNONYMS` as a substring replace on the
/// uppercased generic string, correcting known tagger errors, before any
/// extraction happens.
pub fn apply_component_fixes(generic_raw: &str) -> String {
    let mut fixed = generic_raw.to_uppercase();
    for (wrong, correct) in drugbank_component_synonyms() {
        if fixed.contains(wrong) {
            fixed = fixed.replace(wrong, correct);
        }
    }
    fixed
}

fn is_garbage_or_dose_token(token: &str) -> bool {
    if token.is_empty() || token.len() <= 2 {
        return true;
    }
    if garbage_tokens().contains(token) {
        return true;
    }
    if pure_dose_token_regex().is_match(token) {
        return true;
    }
    // Pure numeric after removing dots, e.g. "500", "12.5".
    if token.replace('.', "").chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    false
}

/// Extract clean generic names from a pipe-separated generic-name string,
/// deduplicating while preserving first-seen order.
pub fn extract_clean_generics(pipe_separated: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut clean = Vec::new();
    for part in pipe_separated.split('|') {
        let token = part.trim().to_uppercase();
        if is_garbage_or_dose_token(&token) {
            continue;
        }
        if seen.insert(token.clone()) {
            clean.push(token);
        }
    }
    clean
}

/// Fallback extraction from a free-text description when the generic-name
/// column yields nothing usable. Splits on `+`, `/`, ` AND `, ` + `, then
/// takes the leading letter run (up to the first digit or `(`) from each
/// part.
pub fn extract_generics_from_description(desc: &str) -> Vec<String> {
    let upper = desc.to_uppercase();
    let mut generics = Vec::new();

    let mut parts = Vec::new();
    for slash_plus in upper.split(['+', '/']) {
        for and_part in slash_plus.split(" AND ") {
            parts.push(and_part);
        }
    }

    for part in parts {
        let trimmed = part.trim();
        // Stop at the first digit or '(' before applying the leading-name regex.
        let cut = trimmed
            .find(|c: char| c.is_ascii_digit() || c == '(')
            .unwrap_or(trimmed.len());
        let head = &trimmed[..cut];
        if let Some(captures) = description_leading_name_regex().captures(head.trim_start()) {
            let raw = captures.get(1).map(|m| m.as_str()).unwrap_or("");
            let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
            let generic = collapsed.trim().to_string();
            if generic.len() > 2 && !garbage_tokens().contains(generic.as_str()) {
                generics.push(generic);
            }
        }
    }

    generics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_clean_generics_and_drops_dose_tokens() {
        let generics = extract_clean_generics("PARACETAMOL|500MG|IBUPROFEN");
        assert_eq!(generics, vec!["PARACETAMOL", "IBUPROFEN"]);
    }

    #[test]
    fn drops_garbage_and_short_and_numeric_tokens() {
        let generics = extract_clean_generics("UNKNOWN|AB|123|PARACETAMOL");
        assert_eq!(generics, vec!["PARACETAMOL"]);
    }

    #[test]
    fn deduplicates_while_preserving_first_seen_order() {
        let generics = extract_clean_generics("IBUPROFEN|PARACETAMOL|IBUPROFEN");
        assert_eq!(generics, vec!["IBUPROFEN", "PARACETAMOL"]);
    }

    #[test]
    fn extracts_generics_from_description_fallback() {
        let generics = extract_generics_from_description("ALUMINUM 200MG + MAGNESIUM 400MG");
        assert_eq!(generics, vec!["ALUMINUM", "MAGNESIUM"]);
    }

    #[test]
    fn extract_generics_from_description_handles_and_separator() {
        let generics = extract_generics_from_description("IBUPROFEN 200MG AND PARACETAMOL 500MG");
        assert_eq!(generics, vec!["IBUPROFEN", "PARACETAMOL"]);
    }

    #[test]
    fn normalize_for_match_treats_none_as_empty() {
        assert_eq!(normalize_for_match(None), "");
        assert_eq!(normalize_for_match(Some("  oral  ")), "ORAL");
    }

    #[test]
    fn normalize_for_match_is_idempotent() {
        let once = normalize_for_match(Some("  Oral  "));
        let twice = normalize_for_match(Some(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn component_fix_corrects_known_tagger_error() {
        assert_eq!(apply_component_fixes("paracetemol 500mg"), "PARACETAMOL 500MG");
    }

    #[test]
    fn strip_parenthetical_extracts_base_name() {
        assert_eq!(
            strip_parenthetical("IBUPROFEN (AS SODIUM)"),
            Some("IBUPROFEN".to_string())
        );
        assert_eq!(strip_parenthetical("IBUPROFEN"), None);
    }
}
