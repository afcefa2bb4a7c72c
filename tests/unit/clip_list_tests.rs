/*!
 * Tests for clip list (CSV) reading
 */

use anyhow::Result;
use std::path::Path;

use clipsplit::clip_list::{ClipList, ClipSpec};
use clipsplit::errors::SplitError;
use crate::common;

fn parse(csv: &str) -> Result<ClipList, SplitError> {
    ClipList::from_reader(csv.as_bytes(), Path::new("video.csv"))
}

#[test]
fn test_from_reader_withThreeRows_shouldKeepRowOrder() {
    let clips = parse(common::THREE_CLIPS).unwrap();

    assert_eq!(clips.len(), 3);
    let names: Vec<&str> = clips.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["intro", "middle", "finale"]);
    assert_eq!(clips.clips[1], ClipSpec::new("middle", "1:02.5", "1:30"));
}

#[test]
fn test_from_reader_withFirstRowLikeHeader_shouldTreatItAsClip() {
    let clips = parse("name,start,end\nclipA,0:00,0:05\n").unwrap();
    assert_eq!(clips.len(), 2);
    assert_eq!(clips.clips[0].name, "name");
}

#[test]
fn test_from_reader_withQuotedNameContainingComma_shouldKeepOneField() {
    let clips = parse("\"Hello, world\",0:00,0:05\n").unwrap();
    assert_eq!(clips.clips[0].name, "Hello, world");
}

#[test]
fn test_from_reader_withPaddedFields_shouldTrimThem() {
    let clips = parse("clipA , 0:00 , 0:05\n").unwrap();
    assert_eq!(clips.clips[0], ClipSpec::new("clipA", "0:00", "0:05"));
}

#[test]
fn test_from_reader_withTwoFieldRow_shouldReportRowNumber() {
    let result = parse("a,0:00,0:05\nb,0:05\nc,0:10,0:15\n");
    match result {
        Err(SplitError::RowFormat { row, fields }) => {
            assert_eq!(row, 2);
            assert_eq!(fields, 2);
        }
        other => panic!("expected RowFormat, got {:?}", other),
    }
}

#[test]
fn test_from_reader_withFourFieldRow_shouldReportRowNumber() {
    let result = parse("a,0:00,0:05,extra\n");
    match result {
        Err(SplitError::RowFormat { row, fields }) => {
            assert_eq!(row, 1);
            assert_eq!(fields, 4);
        }
        other => panic!("expected RowFormat, got {:?}", other),
    }
}

fn row_format(csv: &str) -> (usize, usize) {
    match parse(csv) {
        Err(SplitError::RowFormat { row, fields }) => (row, fields),
        other => panic!("expected RowFormat for {:?}, got {:?}", csv, other),
    }
}

#[test]
fn test_from_reader_withBlankMiddleLine_shouldRejectItAsEmptyRow() {
    assert_eq!(row_format("a,0:00,0:05\n\nb,0:05,0:10\n"), (2, 0));
}

#[test]
fn test_from_reader_withShortRowAfterBlankLine_shouldReportBlankRowFirst() {
    assert_eq!(row_format("a,0:00,0:05\n\nb,0:05\n"), (2, 0));
}

#[test]
fn test_from_reader_withLeadingOrTrailingBlankLine_shouldCountIt() {
    assert_eq!(row_format("\na,0:00,0:05\n"), (1, 0));
    assert_eq!(row_format("a,0:00,0:05\nb,0:05,0:10\n\n"), (3, 0));
}

#[test]
fn test_from_reader_withCrlfLines_shouldNotSeeBlankRows() {
    let clips = parse("a,0:00,0:05\r\nb,0:05,0:10\r\n").unwrap();
    assert_eq!(clips.len(), 2);
    assert_eq!(row_format("a,0:00,0:05\r\n\r\nb,0:05,0:10\r\n"), (2, 0));
}

#[test]
fn test_from_reader_withQuotedNewline_shouldStayOneRow() {
    let clips = parse("\"two\nlines\",0:00,0:05\nb,0:05,0:10\n").unwrap();
    assert_eq!(clips.len(), 2);
    assert_eq!(clips.clips[0].name, "two\nlines");
}

#[test]
fn test_from_reader_withEmptyInput_shouldReturnNoClips() {
    let clips = parse("").unwrap();
    assert!(clips.is_empty());
}

#[test]
fn test_from_reader_withoutTrailingNewline_shouldReadLastRow() {
    let clips = parse("a,0:00,0:05\nb,0:05,0:10").unwrap();
    assert_eq!(clips.len(), 2);
}

#[test]
fn test_read_withMissingFile_shouldReportPath() {
    let result = ClipList::read("definitely_missing_clips.csv");
    match result {
        Err(SplitError::MissingFile(path)) => {
            assert_eq!(path, Path::new("definitely_missing_clips.csv"));
        }
        other => panic!("expected MissingFile, got {:?}", other),
    }
}

#[test]
fn test_read_withFileOnDisk_shouldRecordSource() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let csv = common::create_test_file(temp_dir.path(), "video.csv", common::THREE_CLIPS)?;

    let clips = ClipList::read(&csv)?;

    assert_eq!(clips.source, csv);
    assert_eq!(clips.len(), 3);
    Ok(())
}

#[test]
fn test_bounds_withValidClip_shouldNormalizeBoth() {
    let clip = ClipSpec::new("clipA", "0:00", "0:05");
    assert_eq!(clip.bounds().unwrap(), (0.0, 5.0));
}

#[test]
fn test_bounds_withBadEnd_shouldNameTheTimestamp() {
    let clip = ClipSpec::new("clipA", "0:00", "0:5x");
    match clip.bounds() {
        Err(SplitError::TimestampFormat { timestamp, .. }) => assert_eq!(timestamp, "0:5x"),
        other => panic!("expected TimestampFormat, got {:?}", other),
    }
}
