//! C5: dose comparison (spec.md §4.5). The clinical matching rules for two
//! [`DoseKey`] values live here, deliberately separate from key construction
//! — see the Design Note on `DoseKey`.

use crate::models::dose::{ConcUnit, DoseKey};

const MG_ABS_TOLERANCE: f64 = 0.5;
const CONC_ABS_TOLERANCE: f64 = 0.1;
const RELATIVE_TOLERANCE: f64 = 0.01;
const CROSS_TOLERANCE: f64 = 0.01;

fn tolerant_eq(a: f64, b: f64, abs_tolerance: f64) -> bool {
    let diff = (a - b).abs();
    if diff <= abs_tolerance {
        return true;
    }
    let scale = a.abs().max(b.abs());
    scale > 0.0 && diff / scale <= RELATIVE_TOLERANCE
}

fn mg_eq(a: f64, b: f64) -> bool {
    tolerant_eq(a, b, MG_ABS_TOLERANCE)
}

fn conc_eq(a: f64, b: f64) -> bool {
    tolerant_eq(a, b, CONC_ABS_TOLERANCE)
}

fn iv_exact_eq_opt(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
        (None, None) => true,
        _ => false,
    }
}

fn iv_volume_eq_opt(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
        // Volume is packaging detail: ignored (never blocking) unless both
        // sides actually state one.
        _ => true,
    }
}

fn sorted(mut v: Vec<f64>) -> Vec<f64> {
    v.sort_by(|a, b| a.partial_cmp(b).expect("dose components are finite"));
    v
}

/// Total dose in mg/IU implied by a weight-or-combo key, used for the
/// weight-vs-concentration cross rule.
fn total_weight(key: &DoseKey) -> Option<f64> {
    match key {
        DoseKey::Mg { total_mg } => Some(*total_mg),
        DoseKey::Combo { total_mg, .. } => Some(*total_mg),
        _ => None,
    }
}

/// A total weight/IU dose matches a concentration when either (a) a volume
/// is present and `concentration * volume` equals the total, or (b) no
/// volume is present and the concentration equals the total directly — a
/// single dose with no stated volume implies 1 mL.
fn weight_matches_concentration(total: f64, concentration_per_ml: f64, volume_ml: Option<f64>) -> bool {
    match volume_ml {
        Some(vol) => tolerant_eq(concentration_per_ml * vol, total, CROSS_TOLERANCE),
        None => tolerant_eq(concentration_per_ml, total, CROSS_TOLERANCE),
    }
}

/// `true` iff `a` and `b` describe the same dose under the clinical
/// equivalence rules. [`DoseKey::None`] never matches anything, including
/// another `None` — a row with no parseable dose has nothing to compare.
pub fn doses_match(a: &DoseKey, b: &DoseKey) -> bool {
    match (a, b) {
        (DoseKey::None, _) | (_, DoseKey::None) => false,

        (DoseKey::Mg { total_mg: x }, DoseKey::Mg { total_mg: y }) => mg_eq(*x, *y),

        (DoseKey::Iu { total_iu: x }, DoseKey::Iu { total_iu: y }) => mg_eq(*x, *y),

        (
            DoseKey::Conc {
                concentration_per_ml: x,
                unit: ux,
                ..
            },
            DoseKey::Conc {
                concentration_per_ml: y,
                unit: uy,
                ..
            },
        ) => {
            let commensurate = matches!(
                (ux, uy),
                (ConcUnit::Iu, ConcUnit::Iu)
                    | (ConcUnit::Mg, ConcUnit::Mg)
                    | (ConcUnit::Mg, ConcUnit::Pct)
                    | (ConcUnit::Pct, ConcUnit::Mg)
                    | (ConcUnit::Pct, ConcUnit::Pct)
            );
            commensurate && conc_eq(*x, *y)
        }

        // A total weight/IU dose (plain or combination) can equal a
        // concentration once multiplied out by its packaged volume, or
        // directly when no volume is stated (1 mL implied).
        (key @ (DoseKey::Mg { .. } | DoseKey::Combo { .. }), DoseKey::Conc { concentration_per_ml, volume_ml, unit })
        | (DoseKey::Conc { concentration_per_ml, volume_ml, unit }, key @ (DoseKey::Mg { .. } | DoseKey::Combo { .. })) => {
            match (unit, total_weight(key)) {
                (ConcUnit::Iu, _) => false,
                (_, Some(total)) => weight_matches_concentration(total, *concentration_per_ml, *volume_ml),
                (_, None) => false,
            }
        }

        (
            DoseKey::Combo {
                components_mg: xs,
                total_mg: xt,
                ..
            },
            DoseKey::Combo {
                components_mg: ys,
                total_mg: yt,
                ..
            },
        ) => {
            if xs.len() != ys.len() || !mg_eq(*xt, *yt) {
                return false;
            }
            let xs = sorted(xs.clone());
            let ys = sorted(ys.clone());
            xs.iter().zip(ys.iter()).all(|(x, y)| mg_eq(*x, *y))
        }

        // A combination dose also matches a plain total-weight candidate
        // recorded as a single summed dose, by total alone.
        (DoseKey::Combo { total_mg: x, .. }, DoseKey::Mg { total_mg: y })
        | (DoseKey::Mg { total_mg: y }, DoseKey::Combo { total_mg: x, .. }) => mg_eq(*x, *y),

        // A total IU dose matches an IU concentration once multiplied out by
        // its packaged volume, or directly when no volume is stated — the
        // same cross rule as the weight-vs-concentration one above.
        (DoseKey::Iu { total_iu }, DoseKey::Conc { concentration_per_ml, volume_ml, unit })
        | (DoseKey::Conc { concentration_per_ml, volume_ml, unit }, DoseKey::Iu { total_iu }) => {
            *unit == ConcUnit::Iu && weight_matches_concentration(*total_iu, *concentration_per_ml, *volume_ml)
        }

        (
            DoseKey::Iv {
                concentration_mg_per_ml: cx,
                diluent_class: dx,
                total_volume_ml: vx,
            },
            DoseKey::Iv {
                concentration_mg_per_ml: cy,
                diluent_class: dy,
                total_volume_ml: vy,
            },
        ) => dx == dy && iv_exact_eq_opt(*cx, *cy) && iv_volume_eq_opt(*vx, *vy),

        // Any other pairing crosses a categorical boundary (e.g. Iv vs Mg,
        // Combo vs Iu) and is never a match.
        _ => false,
    }
}
