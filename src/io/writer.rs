//! Writes the matched ESOA output table (spec.md §6, §7). The output schema
//! guarantees a non-null `drug_code_match_reason` for every input row.

use serde::Serialize;

use crate::models::esoa::EsoaRow;
use crate::models::reason::MatchOutcome;
use crate::utils::errors::{MatchError, MatchResult};

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    description: &'a str,
    generic_name: &'a str,
    form: Option<&'a str>,
    route: Option<&'a str>,
    raw_dose: Option<&'a str>,
    drug_code_match: Option<&'a str>,
    drug_code_match_reason: &'static str,
}

/// Write `rows` paired with their `outcomes` (same length, same order) to
/// `path` as CSV.
pub fn write_output(path: &str, rows: &[EsoaRow], outcomes: &[MatchOutcome]) -> MatchResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| MatchError::Csv {
            file: path.to_string(),
            source,
        })?;

    for (row, outcome) in rows.iter().zip(outcomes.iter()) {
        let output = OutputRow {
            description: &row.description,
            generic_name: &row.generic_name,
            form: row.form.as_deref(),
            route: row.route.as_deref(),
            raw_dose: row.raw_dose.as_deref(),
            drug_code_match: outcome.drug_code.as_deref(),
            drug_code_match_reason: outcome.reason.as_str(),
        };
        writer.serialize(&output).map_err(|source| MatchError::Csv {
            file: path.to_string(),
            source,
        })?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::esoa::{QualifierDetails, StructuredDose};
    use crate::models::reason::MatchReason;

    #[test]
    fn writes_one_line_per_row_with_non_null_reason() {
        let path = std::env::temp_dir().join(format!(
            "esoa_matcher_test_writer_{}.csv",
            std::process::id()
        ));
        let rows = vec![EsoaRow {
            description: "PARACETAMOL 500MG TABLET".to_string(),
            generic_name: "PARACETAMOL".to_string(),
            form: Some("TABLET".to_string()),
            route: Some("ORAL".to_string()),
            raw_dose: Some("500MG".to_string()),
            structured_dose: StructuredDose::default(),
            qualifiers: QualifierDetails::default(),
        }];
        let outcomes = vec![MatchOutcome::new(
            Some("D1".to_string()),
            MatchReason::MatchedPerfect,
        )];

        write_output(path.to_str().unwrap(), &rows, &outcomes).expect("writes");
        let contents = std::fs::read_to_string(&path).expect("read back");
        assert!(contents.contains("D1"));
        assert!(contents.contains("matched_perfect"));
        let _ = std::fs::remove_file(&path);
    }
}
