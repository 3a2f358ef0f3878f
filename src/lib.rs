/*!
 * ESOA Matcher
 *
 * Links ESOA claim line-item descriptions to Annex F drug codes through a
 * deterministic, exact-match pipeline: generic-name normalization, a
 * bidirectional synonym graph, dose parsing and comparison, and a
 * form/route compatibility oracle.
 */

pub mod config;
pub mod data;
pub mod io;
pub mod matching;
pub mod models;
pub mod utils;

pub use matching::{match_row, CandidateIndex, SynonymGraph};
pub use models::reason::{MatchOutcome, MatchReason};
