use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::clip_list::ClipList;
use crate::errors::SplitError;
use crate::file_utils::{FileManager, SourceMedia};
use crate::script_builder::{self, ScriptDocument};
use crate::script_runner::{ExitReport, ScriptRunner};

// @module: Application controller for clip splitting

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Number of clips in the script
    pub clip_count: usize,

    /// Where the script was written
    pub script_path: PathBuf,

    /// How the interpreter finished
    pub exit: ExitReport,

    /// New location of the source when it was filed away
    pub moved_to: Option<PathBuf>,
}

/// Main application controller for clip splitting
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Spinner while the interpreter runs
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        Ok(Self {
            config,
            show_progress: true,
        })
    }

    /// Disable the interpreter spinner
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate the source argument and locate its clip list.
    ///
    /// Checks run in a fixed order so the first problem is the one reported:
    /// filename shape, source existence, clip list existence.
    pub fn locate_inputs<P: AsRef<Path>>(&self, source: P) -> Result<SourceMedia> {
        let media = SourceMedia::parse(source.as_ref())?;

        if !FileManager::file_exists(&media.path) {
            return Err(SplitError::MissingFile(media.path.clone()).into());
        }

        let clip_list = media.clip_list_path();
        if !FileManager::file_exists(&clip_list) {
            return Err(SplitError::MissingFile(clip_list).into());
        }

        Ok(media)
    }

    /// Read the clip list and build the full script for `media`
    pub fn build_script(&self, media: &SourceMedia) -> Result<ScriptDocument> {
        let clips = ClipList::read(media.clip_list_path())?;
        info!("Read {} clip(s) from {:?}", clips.len(), clips.source);

        let target_dir = media.split_dir_name(&self.config.output.split_dir_suffix);
        let document = script_builder::build_script(&self.config.script, &media.file_name, &target_dir, &clips)?;

        Ok(document)
    }

    /// Build the script without touching the filesystem or running anything
    pub fn preview<P: AsRef<Path>>(&self, source: P) -> Result<ScriptDocument> {
        let media = self.locate_inputs(source)?;
        self.build_script(&media)
    }

    /// Run the whole split for one source file
    pub async fn run<P: AsRef<Path>>(&self, source: P) -> Result<RunOutcome> {
        let media = self.locate_inputs(source)?;
        self.check_media_location(&media);

        let split_dir = media.split_dir(&self.config.output.split_dir_suffix);
        FileManager::ensure_dir(&split_dir)?;
        debug!("Clips will be exported to {:?}", split_dir);

        let document = self.build_script(&media)?;

        let mut runner = ScriptRunner::new(self.config.interpreter.clone());
        if !self.show_progress {
            runner = runner.without_progress();
        }

        let script_path = media.script_path();
        let exit = runner
            .execute(&document, &script_path, self.config.keep_script)
            .await?;

        debug!("{}", exit);

        let moved_to = if exit.success() {
            self.file_source(&media)?
        } else {
            let failure = SplitError::ExternalProcess {
                interpreter: runner.interpreter().to_string(),
                code: exit.code,
            };
            warn!("{}; leaving {:?} in place", failure, media.path);
            None
        };

        Ok(RunOutcome {
            clip_count: document.clip_count(),
            script_path,
            exit,
            moved_to,
        })
    }

    // Move the source into the done directory after a clean run.
    fn file_source(&self, media: &SourceMedia) -> Result<Option<PathBuf>> {
        if !self.config.output.move_source_when_done {
            debug!("Leaving source in place (move disabled)");
            return Ok(None);
        }

        let done_dir = media.done_dir(&self.config.output.done_dir);
        let moved = FileManager::move_into_dir(&media.path, &done_dir)?;

        match &moved {
            Some(target) => info!("Moved source to {:?}", target),
            None => warn!(
                "{:?} already contains {}; source left in place",
                done_dir, media.file_name
            ),
        }

        Ok(moved)
    }

    // The script looks the source up in <Movies>/<media_folder>; say so when it is elsewhere.
    fn check_media_location(&self, media: &SourceMedia) {
        let Some(movies) = dirs::video_dir() else {
            return;
        };

        let expected = movies.join(&self.config.script.media_folder);
        let expected = expected.canonicalize().unwrap_or(expected);
        let actual = media.parent_dir().canonicalize().ok();

        if actual.as_deref() != Some(expected.as_path()) {
            warn!(
                "{} will be opened from {:?}, not from {:?}",
                media.file_name,
                expected,
                media.parent_dir()
            );
        }
    }
}
