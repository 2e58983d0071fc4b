//! Configuration loading for the CLI

use crate::cli::Cli;
use anyhow::{Context, Result};
use firemerge_core::config::{CliConfigOverrides, FireConfig};
use firemerge_core::models::Fuzziness;
use std::path::Path;

/// Collect the configuration overrides given on the command line
pub fn overrides_from_cli(cli: &Cli) -> Result<CliConfigOverrides> {
    let merge_sensitivity = cli
        .merge_sensitivity
        .map(Fuzziness::new)
        .transpose()
        .context("Invalid --merge-sensitivity")?;

    Ok(CliConfigOverrides {
        csv_output_directory: cli.csv_dir.clone(),
        merge_sensitivity,
        merge_radius_km: cli.merge_radius_km,
        ignore_bounding_box: cli.no_bounding_box,
    })
}

/// Load layered configuration with CLI overrides
pub fn load_config_with_overrides(path: &Path, overrides: CliConfigOverrides) -> Result<FireConfig> {
    let mut config = FireConfig::with_defaults().load_from_file(path)?.load_from_env();
    config.update_from_cli(overrides);

    tracing::debug!(
        strategy = %config.strategy(),
        csv_dir = %config.csv_output_directory.value.display(),
        "Configuration loaded"
    );
    Ok(config)
}
