use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{CrackError, Result};
use crate::models::LogFormat;

/// Highest matplotlib-style legend location code.
pub const MAX_LEGEND_LOCATION: u8 = 10;

/// Resolution of the raster chart images.
pub const RASTER_DPI: u32 = 200;

/// Largest accepted image side, in pixels, at any output resolution.
pub const MAX_IMAGE_SIDE: u64 = 32_768;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Charts for password-cracking research
#[derive(Parser, Debug, Clone)]
#[command(
    name = "crackplot",
    about = "Charts for password-cracking research",
    version
)]
pub struct Settings {
    #[command(subcommand)]
    pub command: Command,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Print intermediate tables to stdout
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON config file (default: ~/.crackplot/config.json when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Chart cumulative cracked passwords from John the Ripper session logs
    Logs(LogsArgs),
    /// Chart how many passwords comply with policies inferred from examples
    Composition(CompositionArgs),
}

/// Output image options shared by both charts.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ImageArgs {
    /// Width in inches
    #[arg(long, default_value = "8")]
    pub width: u32,

    /// Height in inches
    #[arg(long, default_value = "6")]
    pub height: u32,

    /// Dots per inch of the vector chart
    #[arg(long, default_value = "100")]
    pub dpi: u32,

    /// Directory the chart images are written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct LogsArgs {
    /// Total count of passwords in the target. When non-zero the y axis is the
    /// percentage of passwords cracked instead of the absolute count
    #[arg(short, long, default_value = "0")]
    pub total: u64,

    /// Subsample: keep one record, then skip this many
    #[arg(short, long, default_value = "0")]
    pub interval: u64,

    /// The n-th status line represents the n*10^s-th guess (axis label only)
    #[arg(short, long, default_value = "6")]
    pub scale: u32,

    /// Legend location, matplotlib codes 0-10
    #[arg(short, long, default_value = "2", value_parser = clap::value_parser!(u8).range(0..=10))]
    pub location: u8,

    /// Stop reading each file at this record
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub cutoff: Option<u64>,

    /// Old output format (before JtR 1.8)
    #[arg(short, long)]
    pub old: bool,

    #[command(flatten)]
    pub image: ImageArgs,

    /// Session log files (directories are searched recursively)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CompositionArgs {
    /// Minimum acceptable password under each policy considered
    /// (e.g. Abcdef1 -> 7 chars, 1 capital, 1 number)
    #[arg(short, long, num_args = 1..)]
    pub policies: Vec<String>,

    /// Bar height as percentage of each collection instead of absolute count
    #[arg(short, long)]
    pub relative: bool,

    /// Fail on the first corpus line without a colon instead of skipping it
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub image: ImageArgs,

    /// Password files with `<identifier>:<password>` lines
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

// ── ConfigFile ─────────────────────────────────────────────────────────────────

/// Defaults read from a JSON config file. Every key is optional; explicit
/// command-line flags always win.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub policies: Option<Vec<String>>,
    pub total: Option<u64>,
    pub interval: Option<u64>,
    pub scale: Option<u32>,
    pub location: Option<u8>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub dpi: Option<u32>,
    pub output_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Return the default config path, `~/.crackplot/config.json`.
    pub fn default_path() -> PathBuf {
        Self::default_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn default_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".crackplot").join("config.json")
    }

    /// Load a config file, failing when it cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CrackError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CrackError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the effective config: an explicitly named file must load; the
    /// default file is optional and ignored with a warning when broken.
    pub fn resolve(explicit: Option<&Path>, default_path: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        if !default_path.exists() {
            return Ok(Self::default());
        }
        match Self::load_from(default_path) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Ignoring default config: {}", e);
                Ok(Self::default())
            }
        }
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge the config file where no explicit CLI value
    /// was provided, and validate the result.
    pub fn load() -> Result<Self> {
        Self::load_from_args_impl(std::env::args_os().collect(), &ConfigFile::default_path())
    }

    /// Full implementation – accepts args and an explicit default config path
    /// so that tests can redirect to a temporary directory.
    pub fn load_from_args_impl(args: Vec<OsString>, default_config: &Path) -> Result<Self> {
        let matches = Settings::command().get_matches_from(args);
        let mut settings = Settings::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

        let config = ConfigFile::resolve(settings.config.as_deref(), default_config)?;

        match (&mut settings.command, matches.subcommand()) {
            (Command::Logs(logs), Some(("logs", sub))) => logs.merge(&config, sub),
            (Command::Composition(composition), Some(("composition", sub))) => {
                composition.merge(&config, sub)
            }
            _ => {}
        }

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations that make the run meaningless, before any input
    /// is read.
    pub fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Logs(args) => args.validate(),
            Command::Composition(args) => args.validate(),
        }
    }
}

impl ImageArgs {
    fn merge(&mut self, config: &ConfigFile, matches: &ArgMatches) {
        merge_value(&mut self.width, config.width, matches, "width");
        merge_value(&mut self.height, config.height, matches, "height");
        merge_value(&mut self.dpi, config.dpi, matches, "dpi");
        merge_value(
            &mut self.output_dir,
            config.output_dir.clone(),
            matches,
            "output_dir",
        );
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [("width", self.width), ("height", self.height), ("dpi", self.dpi)] {
            if value == 0 {
                return Err(CrackError::Config(format!("{} must be at least 1", name)));
            }
        }
        // The raster copy is drawn at RASTER_DPI even when --dpi is lower.
        let dpi = self.dpi.max(RASTER_DPI) as u64;
        for (name, inches) in [("width", self.width), ("height", self.height)] {
            if inches as u64 * dpi > MAX_IMAGE_SIDE {
                return Err(CrackError::Config(format!(
                    "{} of {} in at {} DPI exceeds {} pixels",
                    name, inches, dpi, MAX_IMAGE_SIDE
                )));
            }
        }
        Ok(())
    }
}

impl LogsArgs {
    fn merge(&mut self, config: &ConfigFile, matches: &ArgMatches) {
        merge_value(&mut self.total, config.total, matches, "total");
        merge_value(&mut self.interval, config.interval, matches, "interval");
        merge_value(&mut self.scale, config.scale, matches, "scale");
        merge_value(&mut self.location, config.location, matches, "location");
        self.image.merge(config, matches);
    }

    fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(CrackError::Config("no log files given".to_string()));
        }
        if self.location > MAX_LEGEND_LOCATION {
            return Err(CrackError::Config(format!(
                "legend location must be between 0 and {}, got {}",
                MAX_LEGEND_LOCATION, self.location
            )));
        }
        if self.cutoff == Some(0) {
            return Err(CrackError::Config("cutoff must be at least 1".to_string()));
        }
        self.image.validate()
    }

    /// Target population size, `None` when charting absolute counts.
    pub fn total_count(&self) -> Option<u64> {
        (self.total > 0).then_some(self.total)
    }

    pub fn format(&self) -> LogFormat {
        LogFormat::from_old_flag(self.old)
    }
}

impl CompositionArgs {
    fn merge(&mut self, config: &ConfigFile, matches: &ArgMatches) {
        if !is_arg_explicitly_set(matches, "policies") {
            if let Some(policies) = &config.policies {
                self.policies = policies.clone();
            }
        }
        self.image.merge(config, matches);
    }

    fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(CrackError::Config("no password files given".to_string()));
        }
        if self.policies.is_empty() {
            return Err(CrackError::NoPolicies);
        }
        self.image.validate()
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────────

/// Overwrite `target` with the config value unless the arg was given on the
/// command line.
fn merge_value<T>(target: &mut T, config: Option<T>, matches: &ArgMatches, name: &str) {
    if is_arg_explicitly_set(matches, name) {
        return;
    }
    if let Some(v) = config {
        *target = v;
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
