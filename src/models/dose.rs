//! The dose key: a tagged, normalized representation of a dosage expression.
//!
//! `DoseKey` is the sole unit of dose comparison in this crate. Its `PartialEq`
//! derive is structural only (used by tests and `Debug` assertions) — the
//! clinical matching semantics of two keys live in
//! [`crate::matching::dose_matcher::doses_match`], never here. See spec.md
//! Design Note: "the unit-compat rules belong in the comparison function, not
//! at key-construction time."

use serde::{Deserialize, Serialize};

/// Closed set of IV diluent equivalence classes. Distinct classes never
/// compare equal — a Water IV never matches a NormalSaline IV even at the
/// same concentration and volume.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiluentClass {
    Water,
    NormalSaline,
    HalfSaline,
    LactatedRingers,
    AcetatedRingers,
    /// An alias we don't recognize, kept verbatim (upper-trimmed) so two
    /// identical unknown diluents still compare equal to each other.
    Other(String),
}

/// The unit flag carried on a [`DoseKey::Conc`] value. The stored numeric is
/// always already normalized to mg/mL (or IU/mL for `Iu`); `Pct` exists only
/// to remember that the source was a percentage, for downstream reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcUnit {
    Mg,
    Iu,
    Pct,
}

/// Tagged, exhaustive normalization of a dose string. Construction
/// ([`crate::matching::dose_parser::parse`]) is total: every input yields
/// exactly one variant, `None` for unparseable or absent dose text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DoseKey {
    /// An IV solution described by concentration, diluent, and volume.
    Iv {
        concentration_mg_per_ml: Option<f64>,
        diluent_class: Option<DiluentClass>,
        total_volume_ml: Option<f64>,
    },
    /// A concentration (mg/mL or IU/mL), with volume treated as packaging,
    /// not part of the identity of the drug.
    Conc {
        concentration_per_ml: f64,
        volume_ml: Option<f64>,
        unit: ConcUnit,
    },
    /// A simple weight-based dose in milligrams.
    Mg { total_mg: f64 },
    /// A simple dose in international units.
    Iu { total_iu: f64 },
    /// A combination product: several weight components summing to a total.
    Combo {
        components_mg: Vec<f64>,
        total_mg: f64,
        per_volume_ml: Option<f64>,
    },
    /// Absent or unparseable dose text.
    None,
}

impl DoseKey {
    /// `true` for every variant except [`DoseKey::None`].
    pub fn is_present(&self) -> bool {
        !matches!(self, DoseKey::None)
    }
}
