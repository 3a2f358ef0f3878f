/*!
 * Tabular I/O
 *
 * CSV loaders for the Annex F reference table, the ESOA claim line-item
 * table, and the optional generics-master augmentation table, plus the
 * output writer. Column names are matched case-insensitively against a
 * small set of accepted aliases per spec.md §6, since upstream exports
 * disagree on exact headers.
 */

pub mod annex_loader;
pub mod esoa_loader;
pub mod generics_master_loader;
pub mod writer;

use csv::StringRecord;

/// Find the index of the first header in `candidates` present in `headers`,
/// matched case-insensitively.
pub(crate) fn find_column(headers: &StringRecord, candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|candidate| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(candidate))
    })
}

pub(crate) fn field_at<'a>(record: &'a StringRecord, index: Option<usize>) -> Option<&'a str> {
    index.and_then(|i| record.get(i)).filter(|s| !s.trim().is_empty())
}
