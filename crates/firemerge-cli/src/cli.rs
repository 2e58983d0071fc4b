use clap::{Parser, ValueEnum};
use firemerge_core::report::ReportFormat;
use std::path::PathBuf;

/// firemerge - merge satellite fire detections into distinct wildfires
#[derive(Parser, Debug)]
#[command(name = "firemerge")]
#[command(about = "Merge duplicate satellite thermal-anomaly detections into distinct wildfires", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path the merged fires are written to
    pub output_file: PathBuf,

    /// Download the configured CSV feeds before merging
    #[arg(long)]
    pub download_csvs: bool,

    /// Path to the configuration file (JSON, or TOML with a .toml extension)
    #[arg(long, default_value = "config.json")]
    pub config_file: PathBuf,

    /// Coordinate precision used for merging, 0-8:
    /// 0=111 km; 1=11.1 km; 2=1.11 km; 3=111 m; 4=11.1 m; 5=1.11 m; 6=0.111 m; 7=1.11 cm; 8=1.11 mm
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=8))]
    pub merge_sensitivity: Option<u8>,

    /// Merge detections within this great-circle distance instead of by coordinate precision
    #[arg(long, conflicts_with = "merge_sensitivity", value_parser = parse_radius)]
    pub merge_radius_km: Option<f64>,

    /// Output file format
    #[arg(long, value_enum, default_value = "geojson")]
    pub format: OutputFileFormat,

    /// Ignore the configured country bounding box
    #[arg(long)]
    pub no_bounding_box: bool,

    /// Directory feeds are read from and downloaded to
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,

    /// Output the run summary in JSON format
    #[arg(long, global = true)]
    pub json: bool,
}

/// Output file format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFileFormat {
    /// GeoJSON feature collection
    Geojson,
    /// One JSON object per fire, one per line
    Lines,
}

impl From<OutputFileFormat> for ReportFormat {
    fn from(format: OutputFileFormat) -> Self {
        match format {
            OutputFileFormat::Geojson => ReportFormat::GeoJson,
            OutputFileFormat::Lines => ReportFormat::Lines,
        }
    }
}

fn parse_radius(s: &str) -> Result<f64, String> {
    firemerge_core::config::parse_radius_km(s).map_err(|e| e.to_string())
}
