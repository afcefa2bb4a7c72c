/*!
 * End-to-end split runs.
 *
 * The POSIX `true` and `false` commands stand in for the script interpreter:
 * they ignore the script path and exit 0 or 1.
 */

use anyhow::Result;
use std::fs;

use clipsplit::app_controller::Controller;
use clipsplit::errors::SplitError;
use crate::common;

fn controller(interpreter: &str) -> Result<Controller> {
    Ok(Controller::with_config(common::config_with_interpreter(interpreter))?.without_progress())
}

fn split_error(err: &anyhow::Error) -> &SplitError {
    err.downcast_ref::<SplitError>()
        .unwrap_or_else(|| panic!("expected a SplitError, got {:#}", err))
}

#[tokio::test]
async fn test_run_withCleanExit_shouldFileSourceAndRemoveScript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_source_with_clips(temp_dir.path(), "video", common::THREE_CLIPS)?;

    let outcome = controller("true")?.run(&source).await?;

    assert_eq!(outcome.clip_count, 3);
    assert!(outcome.exit.success());
    assert_eq!(outcome.script_path, temp_dir.path().join("video.scpt"));
    assert!(!outcome.script_path.exists());
    assert!(temp_dir.path().join("video_split").is_dir());

    let done = temp_dir.path().join("DoneSplitting").join("video.mov");
    assert_eq!(outcome.moved_to, Some(done.clone()));
    assert!(done.is_file());
    assert!(!source.exists());
    Ok(())
}

#[tokio::test]
async fn test_run_withKeepScript_shouldLeaveGeneratedScript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_source_with_clips(temp_dir.path(), "video", "clipA,0:00,0:05\n")?;

    let mut config = common::config_with_interpreter("true");
    config.keep_script = true;
    config.output.move_source_when_done = false;
    let outcome = Controller::with_config(config)?.without_progress().run(&source).await?;

    let script = fs::read_to_string(&outcome.script_path)?;
    assert!(script.contains("trim document _name from 0.0 to 5.0"));
    assert!(script.contains("video_split:clipA.mov"));
    assert!(script.contains("\"video.mov\""));
    assert_eq!(outcome.moved_to, None);
    assert!(source.exists());
    Ok(())
}

#[tokio::test]
async fn test_run_withFailingInterpreter_shouldReportButNotMove() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_source_with_clips(temp_dir.path(), "video", common::THREE_CLIPS)?;

    let outcome = controller("false")?.run(&source).await?;

    assert_eq!(outcome.exit.code, Some(1));
    assert!(!outcome.exit.success());
    assert_eq!(outcome.moved_to, None);
    assert!(source.exists());
    assert!(!temp_dir.path().join("DoneSplitting").exists());
    assert!(!outcome.script_path.exists());
    Ok(())
}

#[tokio::test]
async fn test_run_withMalformedRow_shouldAbortBeforeWritingScript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_source_with_clips(
        temp_dir.path(),
        "video",
        "a,0:00,0:05\nb,0:05,0:10\nc,0:10\n",
    )?;

    let err = controller("true")?.run(&source).await.unwrap_err();

    match split_error(&err) {
        SplitError::RowFormat { row, fields } => {
            assert_eq!(*row, 3);
            assert_eq!(*fields, 2);
        }
        other => panic!("expected RowFormat, got {:?}", other),
    }
    assert!(!temp_dir.path().join("video.scpt").exists());
    assert!(source.exists());
    // The clip directory is created up front and not rolled back
    assert!(temp_dir.path().join("video_split").is_dir());
    Ok(())
}

#[tokio::test]
async fn test_run_withMalformedTimestamp_shouldAbortBeforeWritingScript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_source_with_clips(temp_dir.path(), "video", "a,0:00,1:2:3:4\n")?;

    let err = controller("true")?.run(&source).await.unwrap_err();

    match split_error(&err) {
        SplitError::TimestampFormat { timestamp, .. } => assert_eq!(timestamp, "1:2:3:4"),
        other => panic!("expected TimestampFormat, got {:?}", other),
    }
    assert!(!temp_dir.path().join("video.scpt").exists());
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingClipList_shouldFailBeforeCreatingDirs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "video.mov", "movie")?;

    let err = controller("true")?.run(&source).await.unwrap_err();

    match split_error(&err) {
        SplitError::MissingFile(path) => assert_eq!(path, &temp_dir.path().join("video.csv")),
        other => panic!("expected MissingFile, got {:?}", other),
    }
    assert!(!temp_dir.path().join("video_split").exists());
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingSource_shouldNameSource() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "video.csv", common::THREE_CLIPS)?;
    let source = temp_dir.path().join("video.mov");

    let err = controller("true")?.run(&source).await.unwrap_err();

    match split_error(&err) {
        SplitError::MissingFile(path) => assert_eq!(path, &source),
        other => panic!("expected MissingFile, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_run_withWrongExtension_shouldBeArgumentError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "video.mp4", "movie")?;

    let err = controller("true")?.run(&source).await.unwrap_err();

    assert!(matches!(split_error(&err), SplitError::Argument(_)));
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingInterpreter_shouldFailAndCleanUp() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_source_with_clips(temp_dir.path(), "video", common::THREE_CLIPS)?;

    let err = controller("clipsplit-no-such-interpreter")?.run(&source).await.unwrap_err();

    assert!(matches!(split_error(&err), SplitError::Launch { .. }));
    assert!(!temp_dir.path().join("video.scpt").exists());
    assert!(source.exists());
    Ok(())
}

#[tokio::test]
async fn test_run_withSourceAlreadyFiled_shouldLeaveItInPlace() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_source_with_clips(temp_dir.path(), "video", common::THREE_CLIPS)?;
    let done = temp_dir.path().join("DoneSplitting");
    fs::create_dir(&done)?;
    common::create_test_file(&done, "video.mov", "earlier run")?;

    let outcome = controller("true")?.run(&source).await?;

    assert_eq!(outcome.moved_to, None);
    assert!(source.exists());
    assert_eq!(fs::read_to_string(done.join("video.mov"))?, "earlier run");
    Ok(())
}

#[test]
fn test_preview_withValidInputs_shouldNotTouchFilesystem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_source_with_clips(temp_dir.path(), "video", common::THREE_CLIPS)?;

    let document = controller("true")?.preview(&source)?;

    assert_eq!(document.clip_count(), 3);
    assert!(!temp_dir.path().join("video_split").exists());
    assert!(!temp_dir.path().join("video.scpt").exists());
    assert!(source.exists());
    Ok(())
}

#[test]
fn test_with_config_withInvalidConfig_shouldFail() {
    let mut config = common::config_with_interpreter("true");
    config.output.done_dir = String::new();
    assert!(Controller::with_config(config).is_err());
}
