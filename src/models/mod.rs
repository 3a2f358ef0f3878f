/*!
 * Models Module
 *
 * Contains the core data types the matcher operates over: the dose key, the
 * Annex F candidate, the ESOA input row, and the match outcome/reason.
 */

pub mod candidate;
pub mod dose;
pub mod esoa;
pub mod reason;

pub use candidate::AnnexCandidate;
pub use dose::{ConcUnit, DiluentClass, DoseKey};
pub use esoa::{EsoaRow, QualifierDetails, StructuredDose};
pub use reason::{MatchOutcome, MatchReason};
