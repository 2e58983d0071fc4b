use console::style;
use firemerge_core::FireError;
use std::fmt;
use std::path::Path;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for a missing configuration file
pub fn config_not_found(path: &Path) -> CliError {
    CliError::new("Configuration file not found")
        .with_context(format!(
            "firemerge needs a configuration file listing the feeds to merge.\n\nLooking for: {}",
            path.display()
        ))
        .with_suggestion("Create config.json in the directory you run firemerge from")
        .with_suggestion("Or point at another file: firemerge out.geojson --config-file path/to/config.json")
        .with_help("Run: firemerge --help")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check the configuration file for syntax errors")
        .with_suggestion(
            "country_bounding_box must be [lat1, lon1, lat2, lon2] and merge_sensitivity an integer 0-8",
        )
        .with_help("Run: firemerge --help")
}

/// Create error for a missing feed directory
pub fn csv_directory_missing(path: &Path) -> CliError {
    CliError::new("CSV directory not found")
        .with_context(format!("No feeds can be read.\n\nDirectory: {}", path.display()))
        .with_suggestion(format!("Create it first: mkdir -p {}", path.display()))
        .with_suggestion("Then fetch feeds: firemerge out.geojson --download-csvs")
        .with_suggestion("Or read another directory: --csv-dir path/to/csvs")
        .with_help("Run: firemerge --help")
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let error = match error.downcast::<CliError>() {
        Ok(cli_error) => return cli_error,
        Err(error) => error,
    };

    match error.downcast_ref::<FireError>() {
        Some(FireError::ConfigMissing { path }) => return config_not_found(path),
        Some(FireError::ConfigInvalid { key, reason }) => return invalid_config(key, reason),
        _ => {}
    }

    let message = format!("{:#}", error);
    if message.contains("permission denied") || message.contains("Permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check file permissions")
            .with_suggestion("Or run with appropriate privileges")
    } else {
        CliError::new(message)
    }
}
