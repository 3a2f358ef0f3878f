//! The ESOA row: one claim line item to be linked to an Annex F drug code.

use serde::{Deserialize, Serialize};

/// Qualifier "details" columns produced by the upstream tagger. Each is an
/// optional free-text fragment used only for tie-breaking (spec.md §4.8
/// step 6) — never for the perfect-match decision itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualifierDetails {
    pub release_details: Option<String>,
    pub type_details: Option<String>,
    pub form_details: Option<String>,
    pub indication_details: Option<String>,
    pub salt_details: Option<String>,
    pub brand_details: Option<String>,
    pub alias_details: Option<String>,
    pub iv_diluent_amount: Option<String>,
}

/// Structured dose columns the upstream tagger may have already populated;
/// when present these take priority over re-parsing the raw dose string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredDose {
    pub drug_amount_mg: Option<f64>,
    pub concentration_mg_per_ml: Option<f64>,
    pub iv_diluent_type: Option<String>,
    pub total_volume_ml: Option<f64>,
}

/// One ESOA input row, as consumed by the matcher. `description` is whichever
/// of `raw_text`, `ITEM_DESCRIPTION`, `DESCRIPTION`, `Drug Description`,
/// `description` was present in the source table (spec.md §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EsoaRow {
    pub description: String,
    /// Pipe-separated extracted generic name string, as produced upstream.
    pub generic_name: String,
    pub form: Option<String>,
    pub route: Option<String>,
    pub raw_dose: Option<String>,
    pub structured_dose: StructuredDose,
    pub qualifiers: QualifierDetails,
}
