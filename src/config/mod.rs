/*!
 * Configuration Module
 *
 * Handles application configuration loading from environment variables.
 */

use anyhow::Context;

/// Paths to the four tabular inputs/outputs the matcher reads and writes,
/// loaded from environment variables (optionally via a `.env` file).
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the Annex F drug-code reference table.
    pub annex_f_path: String,
    /// Path to the ESOA claim line-item table to be matched.
    pub esoa_path: String,
    /// Optional generics-master table used to augment the synonym graph.
    pub generics_master_path: Option<String>,
    /// Path the matched output CSV is written to.
    pub output_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required environment variable is missing.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            annex_f_path: std::env::var("ANNEX_F_PATH").context("ANNEX_F_PATH must be set")?,
            esoa_path: std::env::var("ESOA_PATH").context("ESOA_PATH must be set")?,
            generics_master_path: std::env::var("GENERICS_MASTER_PATH").ok(),
            output_path: std::env::var("OUTPUT_PATH")
                .unwrap_or_else(|_| "matched_esoa.csv".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_defaults_when_unset() {
        std::env::remove_var("OUTPUT_PATH");
        std::env::set_var("ANNEX_F_PATH", "annex_f.csv");
        std::env::set_var("ESOA_PATH", "esoa.csv");
        let config = Config::from_env().expect("required vars are set");
        assert_eq!(config.output_path, "matched_esoa.csv");
        std::env::remove_var("ANNEX_F_PATH");
        std::env::remove_var("ESOA_PATH");
    }

    #[test]
    fn missing_required_var_is_an_error() {
        std::env::remove_var("ANNEX_F_PATH");
        std::env::remove_var("ESOA_PATH");
        assert!(Config::from_env().is_err());
    }
}
