use log::{debug, warn};
use std::fmt::{self, Write};

use crate::app_config::ScriptConfig;
use crate::clip_list::{ClipList, ClipSpec};
use crate::errors::SplitError;
use crate::timestamp::format_seconds;

// @module: AppleScript generation for QuickTime Player

const MOVIE_FILE: &str = "_movieFile";
const WORKING_DIR: &str = "_workingDir";
const DOCUMENT_NAME: &str = "_name";
const TARGET_FILE: &str = "target_file";

/// Quote a value as an AppleScript string literal
pub fn applescript_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// One command in the generated script.
///
/// Each variant renders to one or more lines at a fixed nesting depth, so
/// a document is just an ordered list of these.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    /// Resolve the source inside the media folder and capture its directory
    LocateSource {
        media_folder: String,
        source_name: String,
    },
    /// Capture the display name the application will give the document
    CaptureName,
    /// Open the `tell` and `try` blocks for the application and bring it forward
    BeginApplication { application: String },
    /// Open the source file
    OpenSource,
    /// Pause so the application can settle
    Delay(u64),
    /// Restrict the current document to `[start, end]` seconds
    Trim { start: f64, end: f64 },
    /// Build the export path below the captured working directory
    SetTarget { relative_path: String },
    /// Export the current document to the target with a named preset
    Export { preset: String },
    /// Close the current document, discarding the trim
    CloseWithoutSaving,
    /// Close the last reopened document
    CloseDocument,
    /// Surface any application error as a dialog and close the `try` block
    ErrorHandler,
    /// Close the application `tell` block
    EndApplication,
    /// Empty separator line
    Blank,
}

impl ScriptCommand {
    fn render(&self, out: &mut String) -> fmt::Result {
        match self {
            Self::LocateSource { media_folder, source_name } => {
                writeln!(out, "tell application \"Finder\"")?;
                writeln!(
                    out,
                    "\tset {} to ((path to movies folder as text) & {} & {})",
                    MOVIE_FILE,
                    applescript_string(&format!("{}:", media_folder)),
                    applescript_string(source_name)
                )?;
                writeln!(out, "\tset {} to container of file {} as text", WORKING_DIR, MOVIE_FILE)?;
                writeln!(out, "end tell")
            }
            Self::CaptureName => writeln!(
                out,
                "tell application \"System Events\" to set {} to name of file {}",
                DOCUMENT_NAME, MOVIE_FILE
            ),
            Self::BeginApplication { application } => {
                writeln!(out, "tell application {}", applescript_string(application))?;
                writeln!(out, "\ttry")?;
                writeln!(out, "\t\tactivate")
            }
            Self::OpenSource => writeln!(out, "\t\topen {}", MOVIE_FILE),
            Self::Delay(secs) => writeln!(out, "\t\tdelay {}", secs),
            Self::Trim { start, end } => writeln!(
                out,
                "\t\ttrim document {} from {} to {}",
                DOCUMENT_NAME,
                format_seconds(*start),
                format_seconds(*end)
            ),
            Self::SetTarget { relative_path } => writeln!(
                out,
                "\t\tset the {} to ({} & {})",
                TARGET_FILE,
                WORKING_DIR,
                applescript_string(relative_path)
            ),
            Self::Export { preset } => writeln!(
                out,
                "\t\texport document 1 in file {} using settings preset {}",
                TARGET_FILE,
                applescript_string(preset)
            ),
            Self::CloseWithoutSaving => writeln!(out, "\t\tclose document 1 without saving"),
            Self::CloseDocument => writeln!(out, "\t\tclose document 1"),
            Self::ErrorHandler => {
                writeln!(out, "\ton error errorMessage number errorNumber")?;
                writeln!(out, "\t\tdisplay dialog errorMessage")?;
                writeln!(out, "\tend try")
            }
            Self::EndApplication => write!(out, "end tell"),
            Self::Blank => writeln!(out),
        }
    }
}

/// The trim/export/reopen commands for one clip
#[derive(Debug, Clone, PartialEq)]
pub struct ClipBlock {
    pub clip_name: String,
    pub start: f64,
    pub end: f64,
    pub commands: Vec<ScriptCommand>,
}

impl fmt::Display for ClipBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_commands(&self.commands)?)
    }
}

fn render_commands(commands: &[ScriptCommand]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for command in commands {
        command.render(&mut out)?;
    }
    Ok(out)
}

/// A complete script: preamble, one block per clip, closer
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptDocument {
    pub preamble: Vec<ScriptCommand>,
    pub body: Vec<ClipBlock>,
    pub closer: Vec<ScriptCommand>,
}

impl ScriptDocument {
    pub fn clip_count(&self) -> usize {
        self.body.len()
    }

    /// Every command in execution order
    pub fn commands(&self) -> impl Iterator<Item = &ScriptCommand> {
        self.preamble
            .iter()
            .chain(self.body.iter().flat_map(|block| block.commands.iter()))
            .chain(self.closer.iter())
    }
}

impl fmt::Display for ScriptDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for command in self.commands() {
            command.render(&mut out)?;
        }
        f.write_str(&out)
    }
}

/// Accumulates a `ScriptDocument` for one source file
pub struct ScriptBuilder<'a> {
    config: &'a ScriptConfig,
    target_dir: String,
    preamble: Vec<ScriptCommand>,
    body: Vec<ClipBlock>,
}

impl<'a> ScriptBuilder<'a> {
    /// Start a script that opens `source_name` and exports into `target_dir`
    pub fn new(config: &'a ScriptConfig, source_name: &str, target_dir: &str) -> Self {
        let preamble = vec![
            ScriptCommand::LocateSource {
                media_folder: config.media_folder.clone(),
                source_name: source_name.to_string(),
            },
            ScriptCommand::Blank,
            ScriptCommand::CaptureName,
            ScriptCommand::BeginApplication {
                application: config.application.clone(),
            },
            ScriptCommand::OpenSource,
            ScriptCommand::Delay(config.open_delay_secs),
            ScriptCommand::Blank,
        ];

        ScriptBuilder {
            config,
            target_dir: target_dir.to_string(),
            preamble,
            body: Vec::new(),
        }
    }

    /// Build the block for a single clip without adding it.
    ///
    /// The application only ever acts on the front document, so each block
    /// closes the trimmed copy and reopens the source for the next clip.
    pub fn clip_block(&self, clip: &ClipSpec) -> Result<ClipBlock, SplitError> {
        let (start, end) = clip.bounds()?;
        debug!("Clip '{}': {} -> {}", clip.name, format_seconds(start), format_seconds(end));

        if end <= start {
            warn!("Clip '{}' ends before it starts ({} >= {})", clip.name, clip.start, clip.end);
        }

        let commands = vec![
            ScriptCommand::Trim { start, end },
            ScriptCommand::SetTarget {
                relative_path: format!("{}:{}.mov", self.target_dir, clip.name),
            },
            ScriptCommand::Export {
                preset: self.config.export_preset.clone(),
            },
            ScriptCommand::Blank,
            ScriptCommand::CloseWithoutSaving,
            ScriptCommand::Delay(self.config.close_delay_secs),
            ScriptCommand::OpenSource,
            ScriptCommand::Delay(self.config.reopen_delay_secs),
            ScriptCommand::Blank,
        ];

        Ok(ClipBlock {
            clip_name: clip.name.clone(),
            start,
            end,
            commands,
        })
    }

    pub fn push_clip(&mut self, clip: &ClipSpec) -> Result<&mut Self, SplitError> {
        let block = self.clip_block(clip)?;
        self.body.push(block);
        Ok(self)
    }

    /// Add every clip in row order, stopping at the first bad timestamp
    pub fn push_clips(&mut self, clips: &ClipList) -> Result<&mut Self, SplitError> {
        for clip in clips {
            self.push_clip(clip)?;
        }
        Ok(self)
    }

    /// Append the closer and hand back the finished document
    pub fn finish(self) -> ScriptDocument {
        let closer = vec![
            ScriptCommand::CloseDocument,
            ScriptCommand::Blank,
            ScriptCommand::ErrorHandler,
            ScriptCommand::EndApplication,
        ];

        ScriptDocument {
            preamble: self.preamble,
            body: self.body,
            closer,
        }
    }
}

/// Build the whole script for `source_name` in one call
pub fn build_script(
    config: &ScriptConfig,
    source_name: &str,
    target_dir: &str,
    clips: &ClipList,
) -> Result<ScriptDocument, SplitError> {
    let mut builder = ScriptBuilder::new(config, source_name, target_dir);
    builder.push_clips(clips)?;
    Ok(builder.finish())
}
