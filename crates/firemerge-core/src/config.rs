use crate::clustering::GroupingStrategy;
use crate::error::{FireError, Result};
use crate::geo::BoundingBox;
use crate::models::Fuzziness;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory downloaded feeds are written to and read from.
pub const DEFAULT_CSV_DIRECTORY: &str = "csvs/";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for a firemerge run
///
/// Built once by the caller and handed to the downloader, the loader and the
/// clustering engine; nothing reads configuration from global state.
#[derive(Debug, Clone)]
pub struct FireConfig {
    pub csv_urls: ConfigValue<Vec<String>>,
    pub csv_output_directory: ConfigValue<PathBuf>,
    pub country_bounding_box: ConfigValue<Option<BoundingBox>>,
    pub merge_sensitivity: ConfigValue<Fuzziness>,
    pub merge_radius_km: ConfigValue<Option<f64>>,
}

impl FireConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            csv_urls: ConfigValue::new(Vec::new(), ConfigSource::Default),
            csv_output_directory: ConfigValue::new(
                PathBuf::from(DEFAULT_CSV_DIRECTORY),
                ConfigSource::Default,
            ),
            country_bounding_box: ConfigValue::new(None, ConfigSource::Default),
            merge_sensitivity: ConfigValue::new(Fuzziness::default(), ConfigSource::Default),
            merge_radius_km: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a JSON file, or TOML when the extension is `.toml`
    ///
    /// A missing file is [`FireError::ConfigMissing`]; unreadable or
    /// malformed content is [`FireError::ConfigInvalid`].
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FireError::ConfigMissing { path: path.to_path_buf() });
        }

        let content = fs::read_to_string(path).map_err(|e| FireError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let file_config: FileConfig = if is_toml(path) {
            toml::from_str(&content).map_err(|e| FireError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| FireError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse JSON: {}", e),
            })?
        };

        // Update values from file
        if let Some(urls) = file_config.csv_urls {
            self.csv_urls.update(urls, ConfigSource::File);
        }

        if let Some(dir) = file_config.csv_output_directory {
            self.csv_output_directory.update(dir, ConfigSource::File);
        }

        if let Some(bbox) = file_config.country_bounding_box {
            self.country_bounding_box.update(Some(bbox), ConfigSource::File);
        }

        if let Some(sensitivity) = file_config.merge_sensitivity {
            self.merge_sensitivity.update(sensitivity, ConfigSource::File);
        }

        if let Some(km) = file_config.merge_radius_km {
            if !km.is_finite() || km < 0.0 {
                return Err(FireError::ConfigInvalid {
                    key: "merge_radius_km".to_string(),
                    reason: format!("Invalid merge radius: {}. Use a non-negative number of kilometres", km),
                });
            }
            self.merge_radius_km.update(Some(km), ConfigSource::File);
        }

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // FIREMERGE_CSV_DIR
        if let Ok(dir) = env::var("FIREMERGE_CSV_DIR") {
            self.csv_output_directory.update(PathBuf::from(dir), ConfigSource::Environment);
        }

        // FIREMERGE_MERGE_SENSITIVITY
        if let Ok(value) = env::var("FIREMERGE_MERGE_SENSITIVITY") {
            match parse_merge_sensitivity(&value) {
                Ok(f) => self.merge_sensitivity.update(f, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FIREMERGE_MERGE_SENSITIVITY value '{}': expected integer 0-8",
                    value
                ),
            }
        }

        // FIREMERGE_MERGE_RADIUS_KM
        if let Ok(value) = env::var("FIREMERGE_MERGE_RADIUS_KM") {
            match parse_radius_km(&value) {
                Ok(km) => self.merge_radius_km.update(Some(km), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FIREMERGE_MERGE_RADIUS_KM value '{}': expected non-negative kilometres",
                    value
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(dir) = overrides.csv_output_directory {
            self.csv_output_directory.update(dir, ConfigSource::Cli);
        }

        if let Some(sensitivity) = overrides.merge_sensitivity {
            self.merge_sensitivity.update(sensitivity, ConfigSource::Cli);
        }

        if let Some(km) = overrides.merge_radius_km {
            self.merge_radius_km.update(Some(km), ConfigSource::Cli);
        }

        if overrides.ignore_bounding_box {
            self.country_bounding_box.update(None, ConfigSource::Cli);
        }
    }

    /// Grouping strategy selected by the merged configuration.
    ///
    /// A radius is used when one is set from a source at least as specific
    /// as the one that set the sensitivity; otherwise coarse hashing is used.
    pub fn strategy(&self) -> GroupingStrategy {
        match self.merge_radius_km.value {
            Some(km)
                if self.merge_radius_km.source.precedence()
                    >= self.merge_sensitivity.source.precedence() =>
            {
                GroupingStrategy::DistanceRadius { km }
            }
            _ => GroupingStrategy::CoarseHash { fuzziness: self.merge_sensitivity.value },
        }
    }

    /// Every setting rendered as text, with the source it came from
    pub fn to_inspection_map(&self) -> BTreeMap<String, (String, ConfigSource)> {
        let mut map = BTreeMap::new();

        map.insert(
            "csv_urls".to_string(),
            (self.csv_urls.value.len().to_string(), self.csv_urls.source),
        );

        map.insert(
            "csv_output_directory".to_string(),
            (
                self.csv_output_directory.value.display().to_string(),
                self.csv_output_directory.source,
            ),
        );

        let bbox = match &self.country_bounding_box.value {
            Some(b) => format!("[{}, {}, {}, {}]", b.lat1, b.lon1, b.lat2, b.lon2),
            None => "none".to_string(),
        };
        map.insert("country_bounding_box".to_string(), (bbox, self.country_bounding_box.source));

        map.insert(
            "merge_sensitivity".to_string(),
            (self.merge_sensitivity.value.to_string(), self.merge_sensitivity.source),
        );

        let radius = self
            .merge_radius_km
            .value
            .map(|km| format!("{} km", km))
            .unwrap_or_else(|| "none".to_string());
        map.insert("merge_radius_km".to_string(), (radius, self.merge_radius_km.source));

        map
    }
}

impl Default for FireConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from a JSON or TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    csv_urls: Option<Vec<String>>,
    csv_output_directory: Option<PathBuf>,
    country_bounding_box: Option<BoundingBox>,
    merge_sensitivity: Option<Fuzziness>,
    merge_radius_km: Option<f64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub csv_output_directory: Option<PathBuf>,
    pub merge_sensitivity: Option<Fuzziness>,
    pub merge_radius_km: Option<f64>,
    pub ignore_bounding_box: bool,
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

/// Parse a merge sensitivity (fuzziness) from string
pub fn parse_merge_sensitivity(s: &str) -> Result<Fuzziness> {
    let invalid = |reason: String| FireError::ConfigInvalid {
        key: "merge_sensitivity".to_string(),
        reason,
    };
    let decimals: u8 = s
        .trim()
        .parse()
        .map_err(|_| invalid(format!("Invalid merge sensitivity: {}. Use an integer from 0 to 8", s)))?;
    Fuzziness::new(decimals).map_err(|e| invalid(e.to_string()))
}

/// Parse a merge radius in kilometres from string
pub fn parse_radius_km(s: &str) -> Result<f64> {
    match s.trim().parse::<f64>() {
        Ok(km) if km.is_finite() && km >= 0.0 => Ok(km),
        _ => Err(FireError::ConfigInvalid {
            key: "merge_radius_km".to_string(),
            reason: format!("Invalid merge radius: {}. Use a non-negative number of kilometres", s),
        }),
    }
}
