use log::{debug, warn};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::errors::SplitError;
use crate::timestamp;

// @module: Clip list (CSV) reading

// @struct: One clip to cut from the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipSpec {
    // @field: Output name, exported as <name>.mov
    pub name: String,

    // @field: Timestamp of the first frame wanted
    pub start: String,

    // @field: Timestamp of the last frame wanted
    pub end: String,
}

impl ClipSpec {
    pub fn new(name: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        ClipSpec {
            name: name.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    /// Normalized `(start, end)` in seconds
    pub fn bounds(&self) -> Result<(f64, f64), SplitError> {
        let start = timestamp::normalize(&self.start)?;
        let end = timestamp::normalize(&self.end)?;
        Ok((start, end))
    }
}

impl fmt::Display for ClipSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} - {}]", self.name, self.start, self.end)
    }
}

/// Ordered clips read from `<prefix>.csv`
#[derive(Debug, Clone)]
pub struct ClipList {
    /// File the clips came from
    pub source: PathBuf,

    /// Clips in row order
    pub clips: Vec<ClipSpec>,
}

impl ClipList {
    /// Read a clip list from disk.
    ///
    /// There is no header row. Every row must hold exactly three fields;
    /// the first row that does not aborts the read with its 1-based number.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, SplitError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SplitError::MissingFile(path.to_path_buf()));
        }

        let file = std::fs::File::open(path)?;
        Self::from_reader(file, path)
    }

    /// Parse clip rows from any reader; `origin` is used in diagnostics only.
    ///
    /// A blank line is a row with no fields and is rejected like any other
    /// short row, so row numbers always count physical records.
    pub fn from_reader<R: Read>(mut reader: R, origin: &Path) -> Result<Self, SplitError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data.as_slice());

        let mut clips = Vec::new();
        let mut record = csv::StringRecord::new();

        loop {
            let row = clips.len() + 1;
            // The csv reader passes over empty lines without yielding them
            if starts_with_blank_line(&data, byte_offset(csv_reader.position())) {
                return Err(SplitError::RowFormat { row, fields: 0 });
            }

            let more = csv_reader.read_record(&mut record).map_err(|e| SplitError::ClipList {
                path: origin.to_path_buf(),
                line: e.position().map(|p| p.line()).unwrap_or(row as u64),
                message: e.to_string(),
            })?;

            if !more {
                break;
            }

            if record.len() != 3 {
                return Err(SplitError::RowFormat {
                    row,
                    fields: record.len(),
                });
            }

            let clip = ClipSpec::new(&record[0], &record[1], &record[2]);
            debug!("Row {}: {}", row, clip);
            clips.push(clip);
        }

        if clips.is_empty() {
            warn!("No clips listed in {:?}", origin);
        }

        Ok(ClipList {
            source: origin.to_path_buf(),
            clips,
        })
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClipSpec> {
        self.clips.iter()
    }
}

impl<'a> IntoIterator for &'a ClipList {
    type Item = &'a ClipSpec;
    type IntoIter = std::slice::Iter<'a, ClipSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.clips.iter()
    }
}

fn byte_offset(position: &csv::Position) -> usize {
    usize::try_from(position.byte()).unwrap_or(usize::MAX)
}

// True when the next row, read from `offset` onwards, is an empty line.
// `offset` is where the previous record stopped, either before or after its
// terminator.
fn starts_with_blank_line(data: &[u8], offset: usize) -> bool {
    let Some(mut rest) = data.get(offset..) else {
        return false;
    };

    match offset.checked_sub(1).map(|i| data[i]) {
        None | Some(b'\n') => {}
        Some(b'\r') => rest = rest.strip_prefix(b"\n").unwrap_or(rest),
        Some(_) => rest = skip_terminator(rest),
    }

    matches!(rest.first(), Some(b'\n' | b'\r'))
}

fn skip_terminator(bytes: &[u8]) -> &[u8] {
    bytes
        .strip_prefix(b"\r\n")
        .or_else(|| bytes.strip_prefix(b"\n"))
        .or_else(|| bytes.strip_prefix(b"\r"))
        .unwrap_or(bytes)
}
