use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use crate::errors::SplitError;
use crate::file_utils::FileManager;
use crate::script_builder::ScriptDocument;

// @module: Running the generated script through the external interpreter

/// How the interpreter finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl ExitReport {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for ExitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "Return code: {}", code),
            None => write!(f, "Return code: none (terminated by signal)"),
        }
    }
}

// @struct: Interpreter wrapper
pub struct ScriptRunner {
    // @field: Program name or path, e.g. osascript
    interpreter: String,

    // @field: Show a spinner while waiting
    show_progress: bool,
}

impl ScriptRunner {
    pub fn new(interpreter: impl Into<String>) -> Self {
        ScriptRunner {
            interpreter: interpreter.into(),
            show_progress: true,
        }
    }

    /// Disable the spinner, e.g. for tests or non-interactive use
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    /// Run `<interpreter> <script_path>` and wait for it, however long it takes.
    ///
    /// The interpreter inherits stdout and stderr so whatever it prints reaches
    /// the operator directly.
    pub async fn run_script(&self, script_path: &Path) -> Result<ExitReport, SplitError> {
        debug!("Running {} {:?}", self.interpreter, script_path);

        let mut child = Command::new(&self.interpreter)
            .arg(script_path)
            .spawn()
            .map_err(|source| SplitError::Launch {
                interpreter: self.interpreter.clone(),
                source,
            })?;

        let spinner = self.spinner();
        let status = child.wait().await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        let status = status?;
        Ok(ExitReport { code: status.code() })
    }

    /// Persist `document` to `script_path`, run it and remove the file again.
    ///
    /// The script file is removed whether the interpreter succeeded, failed
    /// or could not be launched, unless `keep_script` is set.
    pub async fn execute(
        &self,
        document: &ScriptDocument,
        script_path: &Path,
        keep_script: bool,
    ) -> Result<ExitReport> {
        let script = document.to_string();
        FileManager::write_to_file(script_path, &script)
            .context("Failed to write command script")?;
        debug!("Wrote {} bytes of script to {:?}", script.len(), script_path);

        let result = self.run_script(script_path).await;

        if keep_script {
            info!("Keeping script at {:?}", script_path);
        } else if let Err(e) = FileManager::remove_file(script_path) {
            warn!("Could not remove script {:?}: {}", script_path, e);
        }

        Ok(result?)
    }

    fn spinner(&self) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(format!("Waiting for {} to finish", self.interpreter));
        spinner.enable_steady_tick(Duration::from_millis(120));
        Some(spinner)
    }
}
