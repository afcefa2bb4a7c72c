use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::SplitError;

/// Application configuration module
/// This module handles loading, validating and saving the settings that
/// shape the generated script and where the results are filed.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Script generation settings
    #[serde(default)]
    pub script: ScriptConfig,

    /// Output layout settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Program that executes the generated script
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Keep `<prefix>.scpt` after it has run
    #[serde(default)]
    pub keep_script: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the generated AppleScript
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScriptConfig {
    /// Folder inside the user's Movies folder that holds the source video
    #[serde(default = "default_media_folder")]
    pub media_folder: String,

    /// Application that performs the trims and exports
    #[serde(default = "default_application")]
    pub application: String,

    /// Export settings preset name
    #[serde(default = "default_export_preset")]
    pub export_preset: String,

    /// Pause after the first open, in seconds
    #[serde(default = "default_open_delay_secs")]
    pub open_delay_secs: u64,

    /// Pause after closing a trimmed document, in seconds
    #[serde(default = "default_close_delay_secs")]
    pub close_delay_secs: u64,

    /// Pause after reopening the source, in seconds
    #[serde(default = "default_reopen_delay_secs")]
    pub reopen_delay_secs: u64,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            media_folder: default_media_folder(),
            application: default_application(),
            export_preset: default_export_preset(),
            open_delay_secs: default_open_delay_secs(),
            close_delay_secs: default_close_delay_secs(),
            reopen_delay_secs: default_reopen_delay_secs(),
        }
    }
}

/// Where split clips and finished sources end up
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Appended to the source prefix to name the clip directory
    #[serde(default = "default_split_dir_suffix")]
    pub split_dir_suffix: String,

    /// Directory, next to the source, that receives it once split
    #[serde(default = "default_done_dir")]
    pub done_dir: String,

    /// Move the source into `done_dir` after a successful run
    #[serde(default = "default_true")]
    pub move_source_when_done: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            split_dir_suffix: default_split_dir_suffix(),
            done_dir: default_done_dir(),
            move_source_when_done: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_media_folder() -> String {
    "Temp Working".to_string()
}

fn default_application() -> String {
    "QuickTime Player".to_string()
}

fn default_export_preset() -> String {
    "Movie".to_string()
}

fn default_open_delay_secs() -> u64 {
    1
}

fn default_close_delay_secs() -> u64 {
    1
}

fn default_reopen_delay_secs() -> u64 {
    2
}

fn default_split_dir_suffix() -> String {
    "_split".to_string()
}

fn default_done_dir() -> String {
    "DoneSplitting".to_string()
}

fn default_interpreter() -> String {
    "osascript".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration from `path`, or the built-in defaults when no file
    /// exists there. Nothing is written either way.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        info!(
            "Config file not found at '{}', using built-in defaults",
            path.display()
        );
        Ok(Self::default())
    }

    /// Write configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.script.application.trim().is_empty() {
            return Err(invalid("application name must not be empty".to_string()));
        }

        if self.script.export_preset.trim().is_empty() {
            return Err(invalid("export preset must not be empty".to_string()));
        }

        // AppleScript HFS paths use ':' as separator
        if self.script.media_folder.contains(':') {
            return Err(invalid(format!(
                "media folder must be a single folder name, got '{}'",
                self.script.media_folder
            )));
        }

        if self.interpreter.trim().is_empty() {
            return Err(invalid("interpreter must not be empty".to_string()));
        }

        if self.output.split_dir_suffix.is_empty() {
            return Err(invalid("split directory suffix must not be empty".to_string()));
        }

        let done_dir = &self.output.done_dir;
        if done_dir.trim().is_empty() || done_dir.contains('/') || done_dir.contains('\\') {
            return Err(invalid(format!(
                "done directory must be a plain directory name, got '{}'",
                done_dir
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> anyhow::Error {
    SplitError::Config(message).into()
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            script: ScriptConfig::default(),
            output: OutputConfig::default(),
            interpreter: default_interpreter(),
            keep_script: false,
            log_level: LogLevel::default(),
        }
    }
}
