/*!
 * Error types for the clipsplit application.
 *
 * Every failure that aborts a run is a `SplitError` variant, so the single
 * top-level handler in `main` can report it on one line and exit. Orchestration
 * code wraps these in `anyhow::Error`; callers recover the kind with `downcast_ref`.
 */

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which structural check a timestamp failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampErrorKind {
    /// More than one `.` in the string
    Decimal,
    /// Fewer than two or more than three `:`-separated fields
    Colon,
    /// The string does not match the pattern derived from its shape
    Pattern,
}

impl fmt::Display for TimestampErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal => write!(f, "decimal error"),
            Self::Colon => write!(f, "colon error"),
            Self::Pattern => write!(f, "does not match [[HH:]MM:]SS[.ffffff]"),
        }
    }
}

/// Errors that abort a split run
#[derive(Error, Debug)]
pub enum SplitError {
    /// Missing or malformed command line argument, including a bad source filename
    #[error("{0}")]
    Argument(String),

    /// Source media or clip list absent
    #[error("{}: does not exist", .0.display())]
    MissingFile(PathBuf),

    /// A clip list row without exactly three fields
    #[error("row {row} badly formed: expected 3 fields (name, start, end), found {fields}")]
    RowFormat {
        /// 1-based row number
        row: usize,
        /// Number of fields actually present
        fields: usize,
    },

    /// A timestamp that cannot be normalized
    #[error("Badly formatted time string: {kind}: {timestamp}")]
    TimestampFormat {
        /// The offending input
        timestamp: String,
        /// Which check failed
        kind: TimestampErrorKind,
    },

    /// The clip list could not be read or is not valid CSV
    #[error("{}, line {line}: {message}", .path.display())]
    ClipList {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// The interpreter could not be started at all
    #[error("failed to launch interpreter '{interpreter}': {source}")]
    Launch {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },

    /// The interpreter ran but reported failure
    #[error("interpreter '{interpreter}' {}", describe_exit(.code))]
    ExternalProcess {
        interpreter: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with return code {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

impl SplitError {
    /// Shorthand for a timestamp failure
    pub fn timestamp(timestamp: &str, kind: TimestampErrorKind) -> Self {
        Self::TimestampFormat {
            timestamp: timestamp.to_string(),
            kind,
        }
    }
}
