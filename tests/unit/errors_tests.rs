/*!
 * Tests for error types and their one-line diagnostics
 */

use std::path::PathBuf;

use clipsplit::errors::{SplitError, TimestampErrorKind};

#[test]
fn test_rowFormat_shouldNameRowNumber() {
    let error = SplitError::RowFormat { row: 4, fields: 2 };
    let display = error.to_string();
    assert!(display.contains("row 4"));
    assert!(display.contains("found 2"));
}

#[test]
fn test_timestampFormat_shouldNameTimestampAndCheck() {
    let colon = SplitError::timestamp("1:2:3:4", TimestampErrorKind::Colon).to_string();
    assert!(colon.contains("1:2:3:4"));
    assert!(colon.contains("colon error"));

    let decimal = SplitError::timestamp("1.2.3", TimestampErrorKind::Decimal).to_string();
    assert!(decimal.contains("1.2.3"));
    assert!(decimal.contains("decimal error"));
}

#[test]
fn test_missingFile_shouldNamePath() {
    let error = SplitError::MissingFile(PathBuf::from("video.csv"));
    assert_eq!(error.to_string(), "video.csv: does not exist");
}

#[test]
fn test_externalProcess_shouldDescribeExit() {
    let exited = SplitError::ExternalProcess {
        interpreter: "osascript".to_string(),
        code: Some(1),
    };
    assert_eq!(exited.to_string(), "interpreter 'osascript' exited with return code 1");

    let signalled = SplitError::ExternalProcess {
        interpreter: "osascript".to_string(),
        code: None,
    };
    assert!(signalled.to_string().contains("signal"));
}

#[test]
fn test_io_fromStdError_shouldWrap() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: SplitError = io.into();
    assert!(error.to_string().starts_with("File error:"));
}

#[test]
fn test_diagnostics_shouldBeSingleLine() {
    let errors = vec![
        SplitError::Argument("video.mp4: badly formed filename. Must be <filename>.<mov/mpg>".to_string()),
        SplitError::MissingFile(PathBuf::from("video.mov")),
        SplitError::RowFormat { row: 1, fields: 4 },
        SplitError::timestamp("aa:bb", TimestampErrorKind::Pattern),
        SplitError::ClipList {
            path: PathBuf::from("video.csv"),
            line: 3,
            message: "invalid UTF-8".to_string(),
        },
    ];

    for error in errors {
        assert!(!error.to_string().contains('\n'), "{:?}", error);
    }
}
