//! ESOA-to-Annex-F Matching Tool
//!
//! Links each row of an ESOA claim line-item export to its Annex F drug
//! code, writing a matched output CSV with a non-null match reason on every
//! row.
//!
//! Usage:
//!   ANNEX_F_PATH=annex_f.csv ESOA_PATH=esoa.csv OUTPUT_PATH=out.csv cargo run --bin match-esoa

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use esoa_matcher::config::Config;
use esoa_matcher::io::{annex_loader, esoa_loader, generics_master_loader, writer};
use esoa_matcher::matching::{candidate_index::CandidateIndex, driver, synonym_graph::SynonymGraph};
use esoa_matcher::models::reason::MatchReason;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("match_esoa=info".parse().unwrap()),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    info!(path = %config.annex_f_path, "loading annex f");
    let candidates = annex_loader::load_annex_f(&config.annex_f_path)?;
    info!(count = candidates.len(), "loaded annex f candidates");

    let mut synonym_pairs = Vec::new();
    if let Some(generics_master_path) = &config.generics_master_path {
        info!(path = %generics_master_path, "loading generics master");
        match generics_master_loader::load_generics_master(generics_master_path) {
            Ok(pairs) => synonym_pairs = pairs,
            Err(err) => warn!(%err, "failed to load generics master, continuing without it"),
        }
    }

    let index = CandidateIndex::build(candidates);
    let synonyms = SynonymGraph::build(synonym_pairs);
    info!(candidates = index.len(), "candidate index built");

    info!(path = %config.esoa_path, "loading esoa rows");
    let rows = esoa_loader::load_esoa(&config.esoa_path)?;
    info!(count = rows.len(), "loaded esoa rows");

    let outcomes: Vec<_> = rows
        .par_iter()
        .map(|row| driver::match_row(row, &index, &synonyms))
        .collect();

    let matched = outcomes
        .iter()
        .filter(|o| o.reason == MatchReason::MatchedPerfect)
        .count();
    info!(
        matched,
        total = outcomes.len(),
        "matching complete"
    );

    writer::write_output(&config.output_path, &rows, &outcomes)
        .context("failed to write output")?;
    info!(path = %config.output_path, "wrote matched output");

    Ok(())
}
