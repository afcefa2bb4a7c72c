/*!
 * # clipsplit - split a long video into named clips
 *
 * Reads `<prefix>.csv` next to a `<prefix>.mov` / `<prefix>.mpg` source, turns
 * every row (clip name, start, end) into trim and export commands for
 * QuickTime Player, runs the generated AppleScript through `osascript`, then
 * files the source into `DoneSplitting/`.
 *
 * ## Architecture
 *
 * - `timestamp`: `[HH:]MM:SS[.ffffff]` parsing and normalization to seconds
 * - `clip_list`: CSV clip list reading and row validation
 * - `script_builder`: typed script commands and document assembly
 * - `script_runner`: running the script through the interpreter
 * - `file_utils`: filesystem helpers and source filename handling
 * - `app_controller`: the end-to-end run
 * - `app_config`: configuration management
 * - `errors`: custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod clip_list;
pub mod errors;
pub mod file_utils;
pub mod script_builder;
pub mod script_runner;
pub mod timestamp;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunOutcome};
pub use clip_list::{ClipList, ClipSpec};
pub use errors::{SplitError, TimestampErrorKind};
pub use script_builder::{ScriptBuilder, ScriptCommand, ScriptDocument};
pub use timestamp::{Timestamp, normalize};
