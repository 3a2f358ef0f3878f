//! C1: weight and volume unit conversion factors (spec.md §4.1).

/// Factor to multiply a value in `unit` by to get milligrams. `unit` is
/// expected upper-cased already (callers always upper-case before lookup).
pub fn weight_factor_to_mg(unit: &str) -> Option<f64> {
    match unit {
        "MG" => Some(1.0),
        "G" | "GM" | "GRAM" => Some(1000.0),
        "MCG" | "UG" | "MICROGRAM" => Some(0.001),
        "KG" => Some(1_000_000.0),
        _ => None,
    }
}

/// Factor to multiply a value in `unit` by to get milliliters.
pub fn volume_factor_to_ml(unit: &str) -> Option<f64> {
    match unit {
        "ML" | "CC" => Some(1.0),
        "L" => Some(1000.0),
        _ => None,
    }
}
