/*!
 * Static Configuration Data (C1)
 *
 * Unit conversion factors, diluent aliases, form/route compatibility
 * tables, and the synonym/garbage-token seed data. Everything here is
 * closed, versioned pharmaceutical vocabulary (spec.md §6) — compiled in,
 * built once via `OnceLock`, and never mutated at runtime.
 */

pub mod diluents;
pub mod forms;
pub mod synonyms;
pub mod units;
