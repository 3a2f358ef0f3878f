//! C1: IV diluent alias table (spec.md §4.1). Unknown strings fall through
//! as [`DiluentClass::Other`] rather than erroring — the clinical rule is
//! that distinct classes never compare equal, not that every diluent must
//! be recognized.

use crate::models::DiluentClass;

/// Classify an already upper-trimmed diluent alias into its equivalence
/// class. Exhaustive over the aliases spec.md §4.1 lists; anything else is
/// `Other(alias)`.
pub fn classify_diluent(alias: &str) -> DiluentClass {
    match alias {
        "WATER" | "WATER FOR INJECTION" | "STERILE WATER" | "WFI" => DiluentClass::Water,
        "SODIUM CHLORIDE" | "NORMAL SALINE" | "NS" | "0.9% SODIUM CHLORIDE" | "0.9% NACL" => {
            DiluentClass::NormalSaline
        }
        "0.45% SODIUM CHLORIDE" | "0.45% NACL" | "HALF NORMAL SALINE" => DiluentClass::HalfSaline,
        "LACTATED RINGER'S" | "LACTATED RINGERS" | "LR" | "RL" => DiluentClass::LactatedRingers,
        "ACETATED RINGER'S" | "ACETATED RINGERS" | "AR" => DiluentClass::AcetatedRingers,
        other => DiluentClass::Other(other.to_string()),
    }
}
