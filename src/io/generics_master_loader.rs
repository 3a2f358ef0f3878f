//! Loads the optional generics-master table: a `generic_name` column plus a
//! pipe-separated `synonyms` column, used to augment the static synonym
//! graph (spec.md §4.3 / §6) with deployment-specific brand/generic pairs.
//! One row can therefore yield several synonym edges.

use std::path::Path;

use tracing::warn;

use crate::io::{field_at, find_column};
use crate::utils::errors::{MatchError, MatchResult};

pub fn load_generics_master(path: &str) -> MatchResult<Vec<(String, String)>> {
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

    let generic_col = find_column(&headers, &["generic_name", "generic", "GenericName"]);
    let synonyms_col = find_column(&headers, &["synonyms", "synonym", "brand_name", "alias"]);
    if generic_col.is_none() || synonyms_col.is_none() {
        return Err(MatchError::MissingColumn {
            file: path.to_string(),
            column: "generic_name/synonyms".to_string(),
        });
    }

    let mut pairs = Vec::new();
    for (row_number, record) in reader.records().enumerate() {
        let record = record.map_err(|source| MatchError::Csv {
            file: path.to_string(),
            source,
        })?;
        let (Some(generic), Some(synonyms)) = (
            field_at(&record, generic_col),
            field_at(&record, synonyms_col),
        ) else {
            warn!(row = row_number, "generics master row missing generic or synonyms, skipping");
            continue;
        };
        let generic = generic.trim().to_uppercase();
        for synonym in synonyms.split('|') {
            let synonym = synonym.trim().to_uppercase();
            if !synonym.is_empty() {
                pairs.push((generic.clone(), synonym));
            }
        }
    }

    Ok(pairs)
}
