//! Loads the ESOA claim line-item table into [`EsoaRow`] values. The
//! description column name varies across upstream exports (spec.md §6),
//! so the first of several accepted aliases present in the header wins.

use std::path::Path;

use crate::io::{field_at, find_column};
use crate::models::esoa::{EsoaRow, QualifierDetails, StructuredDose};
use crate::utils::errors::{MatchError, MatchResult};

const DESCRIPTION_ALIASES: &[&str] = &[
    "raw_text",
    "ITEM_DESCRIPTION",
    "DESCRIPTION",
    "Drug Description",
    "description",
];

fn parse_f64(record: &csv::StringRecord, index: Option<usize>) -> Option<f64> {
    field_at(record, index).and_then(|s| s.trim().parse().ok())
}

pub fn load_esoa(path: &str) -> MatchResult<Vec<EsoaRow>> {
    if !Path::new(path).exists() {
        return Err(MatchError::MissingFile { path: path.into() });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| MatchError::Csv {
            file: path.to_string(),
            source,
        })?;

    let headers = reader.headers().map_err(|source| MatchError::Csv {
        file: path.to_string(),
        source,
    })?.clone();

    let description_col = find_column(&headers, DESCRIPTION_ALIASES);
    if description_col.is_none() {
        return Err(MatchError::MissingColumn {
            file: path.to_string(),
            column: "description".to_string(),
        });
    }

    let generic_col = find_column(&headers, &["generic_name", "GenericName", "generic"]);
    let form_col = find_column(&headers, &["form", "Form"]);
    let route_col = find_column(&headers, &["route", "Route"]);
    let dose_col = find_column(&headers, &["dose", "Dose", "raw_dose"]);

    let drug_amount_mg_col = find_column(&headers, &["drug_amount_mg"]);
    let concentration_col = find_column(&headers, &["concentration_mg_per_ml"]);
    let diluent_col = find_column(&headers, &["iv_diluent_type"]);
    let volume_col = find_column(&headers, &["total_volume_ml"]);

    let release_col = find_column(&headers, &["release_details"]);
    let type_col = find_column(&headers, &["type_details"]);
    let form_details_col = find_column(&headers, &["form_details"]);
    let indication_col = find_column(&headers, &["indication_details"]);
    let salt_col = find_column(&headers, &["salt_details"]);
    let brand_col = find_column(&headers, &["brand_details"]);
    let alias_col = find_column(&headers, &["alias_details"]);
    let iv_diluent_amount_col = find_column(&headers, &["iv_diluent_amount"]);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| MatchError::Csv {
            file: path.to_string(),
            source,
        })?;

        let description = field_at(&record, description_col).unwrap_or("").to_string();

        rows.push(EsoaRow {
            description,
            generic_name: field_at(&record, generic_col).unwrap_or("").to_string(),
            form: field_at(&record, form_col).map(|s| s.trim().to_uppercase()),
            route: field_at(&record, route_col).map(|s| s.trim().to_uppercase()),
            raw_dose: field_at(&record, dose_col).map(str::to_string),
            structured_dose: StructuredDose {
                drug_amount_mg: parse_f64(&record, drug_amount_mg_col),
                concentration_mg_per_ml: parse_f64(&record, concentration_col),
                iv_diluent_type: field_at(&record, diluent_col).map(str::to_string),
                total_volume_ml: parse_f64(&record, volume_col),
            },
            qualifiers: QualifierDetails {
                release_details: field_at(&record, release_col).map(str::to_string),
                type_details: field_at(&record, type_col).map(str::to_string),
                form_details: field_at(&record, form_details_col).map(str::to_string),
                indication_details: field_at(&record, indication_col).map(str::to_string),
                salt_details: field_at(&record, salt_col).map(str::to_string),
                brand_details: field_at(&record, brand_col).map(str::to_string),
                alias_details: field_at(&record, alias_col).map(str::to_string),
                iv_diluent_amount: field_at(&record, iv_diluent_amount_col).map(str::to_string),
            },
        });
    }

    Ok(rows)
}
