//! Loads the Annex F drug-code reference table into [`AnnexCandidate`]
//! rows. A row missing a usable drug code or generic name is skipped with a
//! warning rather than aborting the whole load — the table is large and a
//! handful of malformed rows should not block matching.

use std::path::Path;

use tracing::warn;

use crate::data::synonyms::garbage_tokens;
use crate::io::{field_at, find_column};
use crate::matching::dose_parser::dose_key_from_row;
use crate::matching::name_normalizer::{apply_component_fixes, extract_clean_generics};
use crate::models::candidate::AnnexCandidate;
use crate::models::esoa::StructuredDose;
use crate::utils::errors::{MatchError, MatchResult};

fn parse_f64(record: &csv::StringRecord, index: Option<usize>) -> Option<f64> {
    field_at(record, index).and_then(|s| s.trim().parse().ok())
}

pub fn load_annex_f(path: &str) -> MatchResult<Vec<AnnexCandidate>> {
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

    let drug_code_col = find_column(&headers, &["Drug Code", "drug_code", "DrugCode", "code"]);
    let generic_col = find_column(
        &headers,
        &["matched_generic_name", "generic_name", "GenericName", "generic"],
    );
    if drug_code_col.is_none() {
        return Err(MatchError::MissingColumn {
            file: path.to_string(),
            column: "drug_code".to_string(),
        });
    }
    if generic_col.is_none() {
        return Err(MatchError::MissingColumn {
            file: path.to_string(),
            column: "generic_name".to_string(),
        });
    }

    let atc_col = find_column(&headers, &["atc_code", "ATC", "atc"]);
    let drugbank_col = find_column(&headers, &["drugbank_id", "DrugBankID", "drugbank"]);
    let dose_col = find_column(&headers, &["dose", "Dose", "strength"]);
    let form_col = find_column(&headers, &["form", "Form", "dosage_form"]);
    let route_col = find_column(&headers, &["route", "Route", "administration_route"]);
    let description_col = find_column(
        &headers,
        &["description", "Description", "drug_description"],
    );

    let drug_amount_mg_col = find_column(&headers, &["drug_amount_mg"]);
    let concentration_col = find_column(&headers, &["concentration_mg_per_ml"]);
    let diluent_col = find_column(&headers, &["iv_diluent_type"]);
    let volume_col = find_column(&headers, &["total_volume_ml"]);

    let mut candidates = Vec::new();
    for (row_number, record) in reader.records().enumerate() {
        let record = record.map_err(|source| MatchError::Csv {
            file: path.to_string(),
            source,
        })?;

        let Some(drug_code) = field_at(&record, drug_code_col) else {
            warn!(row = row_number, "annex f row missing drug_code, skipping");
            continue;
        };
        let Some(generic_raw) = field_at(&record, generic_col) else {
            warn!(row = row_number, drug_code, "annex f row missing generic_name, skipping");
            continue;
        };

        let fixed = apply_component_fixes(generic_raw);
        let clean = extract_clean_generics(&fixed);
        let Some(primary_generic) = clean.into_iter().find(|g| !garbage_tokens().contains(g.as_str())) else {
            warn!(row = row_number, drug_code, "annex f row has no usable generic name, skipping");
            continue;
        };

        let description = field_at(&record, description_col)
            .unwrap_or(generic_raw)
            .to_string();
        let structured_dose = StructuredDose {
            drug_amount_mg: parse_f64(&record, drug_amount_mg_col),
            concentration_mg_per_ml: parse_f64(&record, concentration_col),
            iv_diluent_type: field_at(&record, diluent_col).map(str::to_string),
            total_volume_ml: parse_f64(&record, volume_col),
        };
        let dose_key = dose_key_from_row(
            &structured_dose,
            field_at(&record, dose_col),
            &description,
            &primary_generic,
        );

        candidates.push(AnnexCandidate {
            drug_code: drug_code.to_string(),
            atc_code: field_at(&record, atc_col).map(str::to_string),
            drugbank_id: field_at(&record, drugbank_col).map(str::to_string),
            primary_generic,
            dose_key,
            form: field_at(&record, form_col).map(|s| s.trim().to_uppercase()),
            route: field_at(&record, route_col).map(|s| s.trim().to_uppercase()),
            description,
        });
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct TempCsv {
        path: std::path::PathBuf,
    }

    impl TempCsv {
        fn new(name: &str, contents: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "esoa_matcher_test_{name}_{}.csv",
                std::process::id()
            ));
            let mut file = std::fs::File::create(&path).expect("create temp csv");
            file.write_all(contents.as_bytes()).expect("write temp csv");
            Self { path }
        }
    }

    impl Drop for TempCsv {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    fn write_temp_csv(contents: &str) -> TempCsv {
        TempCsv::new("annex_loader", contents)
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = load_annex_f("/nonexistent/path/annex_f.csv");
        assert!(matches!(result, Err(MatchError::MissingFile { .. })));
    }

    #[test]
    fn loads_valid_rows_and_skips_malformed_ones() {
        let temp = write_temp_csv(
            "drug_code,generic_name,dose,form,route,description\n\
             D1,PARACETAMOL,500MG,TABLET,ORAL,PARACETAMOL 500MG TABLET\n\
             ,IBUPROFEN,200MG,TABLET,ORAL,missing drug code\n\
             D3,UNKNOWN,200MG,TABLET,ORAL,garbage generic\n",
        );
        let candidates = load_annex_f(temp.path.to_str().unwrap()).expect("loads");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].drug_code, "D1");
        assert_eq!(candidates[0].primary_generic, "PARACETAMOL");
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let temp = write_temp_csv("not_drug_code,not_generic\nx,y\n");
        let result = load_annex_f(temp.path.to_str().unwrap());
        assert!(matches!(result, Err(MatchError::MissingColumn { .. })));
    }

    #[test]
    fn structured_diluent_column_produces_an_iv_dose_key() {
        let temp = write_temp_csv(
            "drug_code,generic_name,dose,form,route,description,concentration_mg_per_ml,iv_diluent_type,total_volume_ml\n\
             D1,DEXTROSE,,BOTTLE,IV,DEXTROSE 5% IN WATER,50,WATER FOR INJECTION,500\n",
        );
        let candidates = load_annex_f(temp.path.to_str().unwrap()).expect("loads");
        assert_eq!(candidates.len(), 1);
        match &candidates[0].dose_key {
            crate::models::dose::DoseKey::Iv {
                concentration_mg_per_ml,
                diluent_class,
                total_volume_ml,
            } => {
                assert_eq!(*concentration_mg_per_ml, Some(50.0));
                assert_eq!(*diluent_class, Some(crate::models::dose::DiluentClass::Water));
                assert_eq!(*total_volume_ml, Some(500.0));
            }
            other => panic!("expected Iv, got {other:?}"),
        }
    }

    #[test]
    fn structured_volume_alone_does_not_produce_an_iv_dose_key() {
        let temp = write_temp_csv(
            "drug_code,generic_name,dose,form,route,description,concentration_mg_per_ml,total_volume_ml\n\
             D1,AMOXICILLIN,,SUSPENSION,ORAL,AMOXICILLIN SUSPENSION,25,100\n",
        );
        let candidates = load_annex_f(temp.path.to_str().unwrap()).expect("loads");
        assert_eq!(candidates.len(), 1);
        match &candidates[0].dose_key {
            crate::models::dose::DoseKey::Conc { concentration_per_ml, unit, .. } => {
                assert_eq!(*concentration_per_ml, 25.0);
                assert_eq!(*unit, crate::models::dose::ConcUnit::Mg);
            }
            other => panic!("expected Conc, not Iv, got {other:?}"),
        }
    }
}
