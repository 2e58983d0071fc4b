//! The merge run: configure, optionally download, load, cluster, write

use crate::cli::Cli;
use crate::config_loader::{load_config_with_overrides, overrides_from_cli};
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{DownloadOutput, FireTableRow, RunOutput, SkippedFeed};
use crate::progress::{create_spinner, finish_error, finish_success};
use anyhow::{Context, Result};
use firemerge_core::clustering::ClusteringEngine;
use firemerge_core::config::FireConfig;
use firemerge_core::fetch::FeedDownloader;
use firemerge_core::loader::ObservationLoader;
use firemerge_core::report::{self, MergeSummary, ReportFormat};

pub fn execute(cli: Cli, output: &OutputWriter) -> Result<()> {
    let overrides = overrides_from_cli(&cli)?;
    let config = load_config_with_overrides(&cli.config_file, overrides)?;

    let downloads = if cli.download_csvs {
        Some(download_feeds(&config, output)?)
    } else {
        None
    };

    let csv_dir = &config.csv_output_directory.value;
    if !csv_dir.is_dir() {
        return Err(errors::csv_directory_missing(csv_dir).into());
    }

    let strategy = config.strategy();
    let engine = ClusteringEngine::new(strategy).context("Invalid merge settings")?;

    let mut loader = ObservationLoader::new(config.merge_sensitivity.value);
    if let Some(bbox) = config.country_bounding_box.value {
        loader = loader.with_bounding_box(bbox);
    }

    let spinner = create_spinner("Loading detections...", output.is_json());
    let loaded = match loader.load_directory(csv_dir) {
        Ok(loaded) => loaded,
        Err(e) => {
            finish_error(&spinner, "Failed to load detections");
            return Err(e).with_context(|| format!("Failed to read feeds from {}", csv_dir.display()));
        }
    };
    finish_success(
        &spinner,
        &format!(
            "Loaded {} detections from {} files",
            loaded.report.rows_accepted(),
            loaded.report.files_read
        ),
    );

    if loaded.report.rows_skipped > 0 {
        tracing::info!(rows = loaded.report.rows_skipped, "Skipped unparsable rows");
    }

    let outcome = engine.cluster(loaded.observations);

    let format = ReportFormat::from(cli.format);
    format
        .write(&outcome.clusters, &cli.output_file)
        .with_context(|| format!("Failed to write {}", cli.output_file.display()))?;

    let rows = report::to_rows(&outcome.clusters);
    let summary = MergeSummary::from_outcome(&outcome);

    output.table(rows.iter().cloned().map(FireTableRow::from).collect());
    output.line("");
    output.line(summary.threshold_line());
    output.line(summary.ratio_line());
    output.line("");
    output.rule();
    output.kv("Config File", cli.config_file.display());
    output.kv("Output File", cli.output_file.display());
    output.rule();

    output.result(RunOutput {
        config_file: cli.config_file.display().to_string(),
        config: config.to_inspection_map(),
        output_file: cli.output_file.display().to_string(),
        format,
        strategy: strategy.to_string(),
        load: loaded.report,
        summary,
        downloads,
        fires: rows,
    })?;

    Ok(())
}

fn download_feeds(config: &FireConfig, output: &OutputWriter) -> Result<DownloadOutput> {
    let urls = &config.csv_urls.value;
    if urls.is_empty() {
        output.warning("No csv_urls configured; nothing to download");
        return Ok(DownloadOutput { saved: Vec::new(), skipped: Vec::new() });
    }

    let downloader = FeedDownloader::new(config.csv_output_directory.value.clone());
    let spinner = create_spinner(&format!("Downloading {} feeds...", urls.len()), output.is_json());

    // Create async runtime
    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    let summary = runtime.block_on(downloader.download_all(urls));

    if summary.saved.is_empty() {
        finish_error(&spinner, "No feeds downloaded");
    } else {
        finish_success(&spinner, &format!("Downloaded {} of {} feeds", summary.saved.len(), urls.len()));
    }

    for (url, reason) in &summary.skipped {
        output.warning(format!("Skipped {}: {}", url, reason));
    }

    Ok(DownloadOutput {
        saved: summary.saved.iter().map(|p| p.display().to_string()).collect(),
        skipped: summary
            .skipped
            .into_iter()
            .map(|(url, reason)| SkippedFeed { url, reason })
            .collect(),
    })
}
