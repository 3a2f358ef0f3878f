//! C4: the dose parser — turns a raw dose string into a [`DoseKey`]
//! (spec.md §4.4). Parsing is total and ordered: the combination-dose
//! pre-pass runs first, then a fixed sequence of single-dose parsers
//! (P0 IU-concentration, P0b IU dose/volume, P0c simple IU, P1 weight
//! concentration, P2 weight dose/volume, P3 simple weight, P3b pipe-form
//! weight, P3c bare-number fallback) is tried, followed by the P4
//! standalone-volume backfill and the P5 percentage fallback. Nothing here
//! ever panics or errors — an input that matches nothing produces
//! [`DoseKey::None`].

use std::sync::OnceLock;

use regex::Regex;

use crate::data::units::weight_factor_to_mg;
use crate::models::dose::{ConcUnit, DoseKey};
use crate::models::esoa::StructuredDose;

macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("valid regex"))
        }
    };
}

lazy_regex!(p0_iu_conc, r"(\d+\.?\d*)\s*I\.?U\.?\s*/\s*(ML|L)\b");
lazy_regex!(p0b_iu_dose_over_vol, r"(\d+)\s*I\.?U\.?\s*/\s*(\d+)\s*(ML|L)\b");
lazy_regex!(p0c_simple_iu, r"(\d+)\s*I\.?U\.?\b");
lazy_regex!(p1_weight_conc, r"(\d+)\s*(MG|G|MCG|UG)\s*/\s*(ML|L)\b");
lazy_regex!(p2_dose_over_vol, r"(\d+)\s*(MG|G|MCG|UG)\s*/\s*(\d+)\s*(ML|L)\b");
lazy_regex!(p3_simple_weight, r"(\d+)\s*(MG|G|GM|GRAM|MCG|UG|MICROGRAM)\b");
lazy_regex!(p3b_pipe_simple, r"^(\d+)\s+(MG|G|MCG|UG)\s*$");
lazy_regex!(
    p3c_bare_number,
    r"^(\d+(\.\d+)?)(\s*(TAB|CAP|TABLET|CAPSULE)|\b|$)"
);
lazy_regex!(p4_standalone_volume, r"(\d+)\s*(ML|L|CC)\b");
lazy_regex!(p5_percentage, r"(\d*\.?\d+)\s*%");

lazy_regex!(concentration_like, r"\d+\s*(MG|G|MCG)?\s*/\s*\d*\s*M?L\b");
lazy_regex!(plus_leading_number_unit, r"^(\d+\.?\d*)\s*(MG|G|MCG)?");
lazy_regex!(
    slash_both_weights,
    r"^(\d+\.?\d*)\s*(MG|G|MCG)\s*/\s*(\d+\.?\d*)\s*(MG|G|MCG)$"
);

const BARE_NUMBER_MIN_MG: f64 = 0.1;
const BARE_NUMBER_MAX_MG: f64 = 10000.0;

fn parse_f64(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(0.0)
}

fn weight_factor(unit: &str) -> f64 {
    weight_factor_to_mg(&unit.to_uppercase()).unwrap_or(1.0)
}

fn volume_factor_ml(unit: &str) -> f64 {
    if unit.eq_ignore_ascii_case("L") {
        1000.0
    } else {
        1.0
    }
}

/// Concatenate digit runs separated by a single run of whitespace, e.g.
/// `"200 000"` → `"200000"` — a tagger artifact from thousand-separated
/// numbers.
fn normalize_digit_runs(s: &str) -> String {
    let re = {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"(\d+)(\s+)(\d+)").expect("valid regex"))
    };
    let mut current = s.to_string();
    loop {
        let next = re.replace_all(&current, "$1$3").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

fn is_weight_unit(token: &str) -> bool {
    matches!(
        token.to_uppercase().as_str(),
        "MG" | "G" | "GM" | "GRAM" | "MCG" | "UG" | "MICROGRAM"
    )
}

fn is_volume_unit(token: &str) -> bool {
    matches!(token.to_uppercase().as_str(), "ML" | "L" | "CC")
}

/// Pipe-delimited combination parsing (spec.md §4.4 "Pipe format"). Walks
/// tokens left to right; a small `G` immediately after an `MG` dose is a
/// vial-size marker, not a second component; a small number before `ML`
/// following a dose is a second dose component in the prior unit, and the
/// bare number that follows becomes the bottle volume.
fn parse_pipe_combo(s: &str) -> Option<(Vec<f64>, Option<f64>)> {
    let tokens: Vec<&str> = s.split('|').map(str::trim).filter(|t| !t.is_empty()).collect();
    if tokens.len() < 3 {
        return None;
    }

    let mut components: Vec<f64> = Vec::new();
    let mut last_unit: Option<String> = None;
    let mut pending_volume: bool = false;
    let mut per_volume_ml: Option<f64> = None;
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        let Ok(num) = token.parse::<f64>() else {
            i += 1;
            continue;
        };

        let next = tokens.get(i + 1).copied();

        if pending_volume {
            per_volume_ml = Some(num);
            pending_volume = false;
            i += 1;
            continue;
        }

        if let Some(next_tok) = next {
            if is_weight_unit(next_tok) {
                if next_tok.eq_ignore_ascii_case("G") && num <= 10.0 {
                    // Vial-size marker, not a dose component.
                    i += 2;
                    continue;
                }
                let mg = num * weight_factor(next_tok);
                components.push(mg);
                last_unit = Some(next_tok.to_uppercase());
                i += 2;
                continue;
            }
            if is_volume_unit(next_tok) {
                if num < 1000.0 && !components.is_empty() {
                    if let Some(unit) = &last_unit {
                        components.push(num * weight_factor(unit));
                    }
                    pending_volume = true;
                } else {
                    per_volume_ml = Some(num * volume_factor_ml(next_tok));
                }
                i += 2;
                continue;
            }
            if next_tok.eq_ignore_ascii_case("G") {
                i += 2;
                continue;
            }
        }

        if let Some(unit) = &last_unit {
            components.push(num * weight_factor(unit));
        }
        i += 1;
    }

    Some((components, per_volume_ml))
}

fn parse_plus_components(s: &str) -> Vec<f64> {
    if !s.contains('+') {
        return Vec::new();
    }
    let mut components = Vec::new();
    let mut last_unit: Option<String> = None;
    for part in s.split('+') {
        let trimmed = part.trim();
        if let Some(caps) = plus_leading_number_unit().captures(trimmed) {
            let num = parse_f64(&caps[1]);
            let unit = caps.get(2).map(|m| m.as_str().to_string()).or_else(|| last_unit.clone());
            if let Some(unit) = unit {
                components.push(num * weight_factor(&unit));
                last_unit = Some(unit);
            }
        }
    }
    components
}

fn parse_slash_both_weights(s: &str) -> Vec<f64> {
    match slash_both_weights().captures(s) {
        Some(caps) => {
            let a = parse_f64(&caps[1]) * weight_factor(&caps[2]);
            let b = parse_f64(&caps[3]) * weight_factor(&caps[4]);
            vec![a, b]
        }
        None => Vec::new(),
    }
}

/// The combination-dose pre-pass. Returns `Some` only when at least two
/// weight components were recognized.
fn try_parse_combo(s: &str) -> Option<DoseKey> {
    let looks_like_concentration = concentration_like().is_match(s);

    if !looks_like_concentration {
        let plus = parse_plus_components(s);
        if plus.len() >= 2 {
            let total_mg = plus.iter().sum();
            return Some(DoseKey::Combo {
                components_mg: plus,
                total_mg,
                per_volume_ml: None,
            });
        }

        let slash = parse_slash_both_weights(s);
        if slash.len() >= 2 {
            let total_mg = slash.iter().sum();
            return Some(DoseKey::Combo {
                components_mg: slash,
                total_mg,
                per_volume_ml: None,
            });
        }
    }

    if s.contains('|') {
        if let Some((components, per_volume_ml)) = parse_pipe_combo(s) {
            if components.len() >= 2 {
                let total_mg = components.iter().sum();
                return Some(DoseKey::Combo {
                    components_mg: components,
                    total_mg,
                    per_volume_ml,
                });
            }
        }
    }

    None
}

fn try_p0(s: &str) -> Option<DoseKey> {
    let caps = p0_iu_conc().captures(s)?;
    let n = parse_f64(&caps[1]);
    let concentration = if caps[2].eq_ignore_ascii_case("L") { n / 1000.0 } else { n };
    Some(DoseKey::Conc {
        concentration_per_ml: concentration,
        volume_ml: None,
        unit: ConcUnit::Iu,
    })
}

fn try_p0b(s: &str) -> Option<DoseKey> {
    let caps = p0b_iu_dose_over_vol().captures(s)?;
    let dose = parse_f64(&caps[1]);
    let vol = parse_f64(&caps[2]);
    let vol_ml = vol * volume_factor_ml(&caps[3]);
    if vol_ml == 0.0 {
        return None;
    }
    Some(DoseKey::Conc {
        concentration_per_ml: dose / vol_ml,
        volume_ml: Some(vol_ml),
        unit: ConcUnit::Iu,
    })
}

fn try_p0c(s: &str) -> Option<DoseKey> {
    let caps = p0c_simple_iu().captures(s)?;
    Some(DoseKey::Iu {
        total_iu: parse_f64(&caps[1]),
    })
}

fn try_p1(s: &str) -> Option<DoseKey> {
    let caps = p1_weight_conc().captures(s)?;
    let mg = parse_f64(&caps[1]) * weight_factor(&caps[2]);
    let concentration = if caps[3].eq_ignore_ascii_case("L") { mg / 1000.0 } else { mg };
    Some(DoseKey::Conc {
        concentration_per_ml: concentration,
        volume_ml: None,
        unit: ConcUnit::Mg,
    })
}

fn try_p2(s: &str) -> Option<DoseKey> {
    let caps = p2_dose_over_vol().captures(s)?;
    let total_mg = parse_f64(&caps[1]) * weight_factor(&caps[2]);
    let denom_ml = parse_f64(&caps[3]) * volume_factor_ml(&caps[4]);
    if denom_ml == 0.0 {
        return None;
    }
    let concentration = total_mg / denom_ml;

    let remainder = &s[caps.get(0).unwrap().end()..];
    let bottle_volume = p4_standalone_volume()
        .captures(remainder)
        .map(|c| parse_f64(&c[1]) * volume_factor_ml(&c[2]));

    Some(DoseKey::Conc {
        concentration_per_ml: concentration,
        volume_ml: Some(bottle_volume.unwrap_or(denom_ml)),
        unit: ConcUnit::Mg,
    })
}

fn try_p3(s: &str) -> Option<DoseKey> {
    let caps = p3_simple_weight().captures(s)?;
    Some(DoseKey::Mg {
        total_mg: parse_f64(&caps[1]) * weight_factor(&caps[2]),
    })
}

fn try_p3b(s: &str) -> Option<DoseKey> {
    let caps = p3b_pipe_simple().captures(s)?;
    Some(DoseKey::Mg {
        total_mg: parse_f64(&caps[1]) * weight_factor(&caps[2]),
    })
}

fn try_p3c(s: &str) -> Option<DoseKey> {
    let caps = p3c_bare_number().captures(s)?;
    let val = parse_f64(&caps[1]);
    if (BARE_NUMBER_MIN_MG..=BARE_NUMBER_MAX_MG).contains(&val) {
        Some(DoseKey::Mg { total_mg: val })
    } else {
        None
    }
}

fn find_standalone_volume(s: &str) -> Option<f64> {
    p4_standalone_volume()
        .captures_iter(s)
        .last()
        .map(|c| parse_f64(&c[1]) * volume_factor_ml(&c[2]))
}

fn try_p5(s: &str) -> Option<DoseKey> {
    let caps = p5_percentage().captures(s)?;
    let mut pct = parse_f64(&caps[1]);
    if pct == 9.0 {
        // Tagger bug-compat: ".9%" is mis-parsed upstream as "9%".
        pct = 0.9;
    }
    Some(DoseKey::Conc {
        concentration_per_ml: pct * 10.0,
        volume_ml: None,
        unit: ConcUnit::Pct,
    })
}

/// Parse a raw dose string into a [`DoseKey`]. Total: every input yields
/// exactly one variant, `None` for unparseable or absent dose text.
pub fn parse(raw: Option<&str>) -> DoseKey {
    let Some(raw) = raw else {
        return DoseKey::None;
    };
    let s0 = raw.trim().to_uppercase();
    if s0.is_empty() {
        return DoseKey::None;
    }

    if let Some(combo) = try_parse_combo(&s0) {
        return combo;
    }

    let s1 = normalize_digit_runs(&s0.replace('|', " "));

    let primary = try_p0(&s1)
        .or_else(|| try_p0b(&s1))
        .or_else(|| try_p0c(&s1))
        .or_else(|| try_p1(&s1))
        .or_else(|| try_p2(&s1))
        .or_else(|| try_p3(&s1))
        .or_else(|| try_p3b(&s1))
        .or_else(|| try_p3c(&s1));

    match primary {
        Some(DoseKey::Conc { concentration_per_ml, volume_ml: None, unit }) => {
            let backfilled = find_standalone_volume(&s1);
            DoseKey::Conc {
                concentration_per_ml,
                volume_ml: backfilled,
                unit,
            }
        }
        Some(key) => key,
        None => try_p5(&s1).unwrap_or(DoseKey::None),
    }
}

/// Late heuristics applied once the combination/P0-P5 pipeline yields
/// `None` but a standalone volume was found: a normal-saline or dextrose
/// IV bag described only by volume and diluent name, with no explicit
/// concentration in the dose string (spec.md §4.4, "Additional late
/// heuristics").
fn apply_late_heuristics(key: DoseKey, raw_dose: &str, description: &str, generic: &str) -> DoseKey {
    if key.is_present() {
        return key;
    }
    let Some(volume) = find_standalone_volume(&raw_dose.to_uppercase()) else {
        return key;
    };
    let context = format!("{} {}", description.to_uppercase(), generic.to_uppercase());
    let dose_has_percent = raw_dose.contains('%');

    let is_saline = context.contains("PNSS")
        || context.contains("NSS")
        || context.contains("NORMAL SALINE")
        || context.contains("N/S")
        || (context.contains("SODIUM CHLORIDE") && !context.contains("DEXTROSE"));

    if is_saline && !dose_has_percent {
        return DoseKey::Conc {
            concentration_per_ml: 9.0,
            volume_ml: Some(volume),
            unit: ConcUnit::Pct,
        };
    }
    if context.contains("DEXTROSE") {
        if context.contains("D10") {
            return DoseKey::Conc {
                concentration_per_ml: 100.0,
                volume_ml: Some(volume),
                unit: ConcUnit::Pct,
            };
        }
        if context.contains("D5") || context.contains("5% DEXTROSE") {
            return DoseKey::Conc {
                concentration_per_ml: 50.0,
                volume_ml: Some(volume),
                unit: ConcUnit::Pct,
            };
        }
    }
    key
}

/// Build a [`DoseKey`] from the tagger's already-structured dose columns
/// when present, in preference to re-parsing `raw_dose`. Falls back to
/// [`parse`] (plus the late heuristics) on `raw_dose` when the structured
/// columns are empty.
pub fn dose_key_from_row(
    structured: &StructuredDose,
    raw_dose: Option<&str>,
    description: &str,
    generic: &str,
) -> DoseKey {
    if structured.iv_diluent_type.is_some() {
        return DoseKey::Iv {
            concentration_mg_per_ml: structured.concentration_mg_per_ml,
            diluent_class: structured
                .iv_diluent_type
                .as_deref()
                .map(|s| crate::data::diluents::classify_diluent(s.trim().to_uppercase().as_str())),
            total_volume_ml: structured.total_volume_ml,
        };
    }
    if let Some(conc) = structured.concentration_mg_per_ml {
        return DoseKey::Conc {
            concentration_per_ml: conc,
            volume_ml: None,
            unit: ConcUnit::Mg,
        };
    }
    if let Some(mg) = structured.drug_amount_mg {
        return DoseKey::Mg { total_mg: mg };
    }

    let Some(raw) = raw_dose else {
        return DoseKey::None;
    };
    let parsed = parse(Some(raw));
    apply_late_heuristics(parsed, raw, description, generic)
}
