use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::SplitError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Remove a file, ignoring one that is already gone
    pub fn remove_file<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove file: {:?}", path)),
        }
    }

    /// Move a file into a directory, creating the directory first.
    ///
    /// Returns `None` without touching anything when a file of the same
    /// name is already there.
    pub fn move_into_dir<P1: AsRef<Path>, P2: AsRef<Path>>(file: P1, dir: P2) -> Result<Option<PathBuf>> {
        let file = file.as_ref();
        let dir = dir.as_ref();

        if !file.exists() {
            return Err(anyhow::anyhow!("Source file does not exist: {:?}", file));
        }

        let file_name = file
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Not a file path: {:?}", file))?;

        Self::ensure_dir(dir)?;

        let target = dir.join(file_name);
        if target.exists() {
            return Ok(None);
        }

        fs::rename(file, &target)
            .with_context(|| format!("Failed to move {:?} to {:?}", file, target))?;

        Ok(Some(target))
    }
}

/// Source container formats the player can open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// QuickTime movie
    Mov,
    /// MPEG program stream
    Mpg,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "mov" => Some(Self::Mov),
            "mpg" => Some(Self::Mpg),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mov => "mov",
            Self::Mpg => "mpg",
        }
    }
}

/// A validated source video and the files derived from its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMedia {
    /// Path as given on the command line
    pub path: PathBuf,

    /// File name component, e.g. `video.mov`
    pub file_name: String,

    /// File name without extension, e.g. `video`
    pub prefix: String,

    pub kind: MediaKind,
}

impl SourceMedia {
    /// Validate a source path's file name: `<prefix>.mov` or `<prefix>.mpg`.
    ///
    /// Only the shape is checked here; existence is checked separately so
    /// the two failures report differently.
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self, SplitError> {
        let path = path.as_ref();
        let bad_name = || {
            SplitError::Argument(format!(
                "{}: badly formed filename. Must be <filename>.<mov/mpg>",
                path.display()
            ))
        };

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(bad_name)?;

        let parts: Vec<&str> = file_name.split('.').collect();
        if parts.len() != 2 || parts[0].is_empty() {
            return Err(bad_name());
        }

        let kind = MediaKind::from_extension(parts[1]).ok_or_else(bad_name)?;

        debug!("Source {:?}: prefix '{}', kind {:?}", path, parts[0], kind);

        Ok(SourceMedia {
            path: path.to_path_buf(),
            file_name: file_name.to_string(),
            prefix: parts[0].to_string(),
            kind,
        })
    }

    /// Directory holding the source; derived files live here too
    pub fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// `<prefix>.csv`
    pub fn clip_list_path(&self) -> PathBuf {
        self.parent_dir().join(format!("{}.csv", self.prefix))
    }

    /// Name of the clip directory, `<prefix><suffix>`
    pub fn split_dir_name(&self, suffix: &str) -> String {
        format!("{}{}", self.prefix, suffix)
    }

    /// `<prefix><suffix>/`
    pub fn split_dir(&self, suffix: &str) -> PathBuf {
        self.parent_dir().join(self.split_dir_name(suffix))
    }

    /// `<prefix>.scpt`
    pub fn script_path(&self) -> PathBuf {
        self.parent_dir().join(format!("{}.scpt", self.prefix))
    }

    /// Directory the source is filed into once it has been split
    pub fn done_dir(&self, done_dir_name: &str) -> PathBuf {
        self.parent_dir().join(done_dir_name)
    }
}
