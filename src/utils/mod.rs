/*!
 * Shared Utilities
 *
 * Error types used across the config, io, and matching layers.
 */

pub mod errors;

pub use errors::{MatchError, MatchResult};
