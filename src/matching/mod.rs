/*!
 * Matching Pipeline (C2-C8)
 *
 * Name normalization, the synonym graph, dose parsing and comparison, the
 * form/route oracle, the candidate index, and the per-row matching driver
 * that ties them together.
 */

pub mod candidate_index;
pub mod dose_matcher;
pub mod dose_parser;
pub mod driver;
pub mod form_route_oracle;
pub mod name_normalizer;
pub mod synonym_graph;

pub use candidate_index::CandidateIndex;
pub use driver::match_row;
pub use synonym_graph::SynonymGraph;
