/*!
 * Integration tests for the parse, clean and serialize workflow
 */

use anyhow::Result;
use captidy::app_config::Config;
use captidy::cleanup::{CleanupPass, CleanupPipeline};
use captidy::file_utils::FileManager;
use captidy::subtitle_processor::{serialize, BlankLinePolicy, CaptionParser};
use captidy::Controller;
use crate::common;

const EXPECTED_CLEANED: &str = "1
00:00:01,000 --> 00:00:04,000
Welcome to the yiker show.

2
00:00:05,000 --> 00:00:09,000
It runs peer-to-peer. No servers
involved

3
00:00:10,000 --> 00:00:14,000
for testing purposes.

";

/// Test that we can load, clean, and serialize captions in a full workflow
#[test]
fn test_caption_workflow_withFullProcess_shouldSucceed() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;

    let lines = FileManager::read_lines(&source)?;
    let mut captions = CaptionParser::default().parse_lines(&lines)?;
    assert_eq!(captions.len(), 3);

    let report = CleanupPipeline::from_config(&Config::default()).run(&mut captions);

    assert_eq!(serialize(&captions), EXPECTED_CLEANED);
    assert_eq!(report.changes_for(CleanupPass::SearchReplace), 2);
    assert_eq!(report.changes_for(CleanupPass::CollapseSpaces), 3);
    assert_eq!(report.changes_for(CleanupPass::TrimEdges), 1);
    assert_eq!(report.changes_for(CleanupPass::Capitalize), 3);

    Ok(())
}

#[test]
fn test_controller_processLines_shouldMatchManualWorkflow() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;
    let lines = FileManager::read_lines(&source)?;

    let controller = Controller::with_config(Config::default())?;
    let (captions, report) = controller.process_lines(&lines)?;

    assert_eq!(serialize(&captions), EXPECTED_CLEANED);
    assert_eq!(report.total_changes(), 9);

    Ok(())
}

#[test]
fn test_cleaned_output_shouldReparseToSameCaptions() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    let (captions, _) = controller.process_lines(&EXPECTED_CLEANED.lines().collect::<Vec<_>>())?;

    assert_eq!(serialize(&captions), EXPECTED_CLEANED);

    let reparsed = CaptionParser::default().parse_str(&serialize(&captions))?;
    assert_eq!(reparsed, captions);

    Ok(())
}

#[test]
fn test_processLines_withDoubleBlankLines_shouldDependOnPolicy() -> Result<()> {
    let lines = ["1", common::TIMING, "one.", "", "", "2", common::TIMING, "two"];

    let strict = Controller::with_config(Config::default())?;
    assert!(strict.process_lines(&lines).is_err());

    let mut config = Config::default();
    config.parser.blank_lines = BlankLinePolicy::Tolerant;
    let tolerant = Controller::with_config(config)?;
    let (captions, _) = tolerant.process_lines(&lines)?;

    assert_eq!(captions.len(), 2);
    assert_eq!(captions[1].content(), "Two");

    Ok(())
}

#[test]
fn test_processLines_withWhitespaceOnlyContent_shouldReparseInTolerantMode() -> Result<()> {
    let lines = ["1", common::TIMING, "   ", "", "2", common::TIMING, "b"];

    let mut config = Config::default();
    config.parser.blank_lines = BlankLinePolicy::Tolerant;
    let controller = Controller::with_config(config)?;
    let (captions, _) = controller.process_lines(&lines)?;
    assert_eq!(captions[0].content(), "");

    let written = serialize(&captions);
    let reparsed = CaptionParser::new(BlankLinePolicy::Tolerant).parse_str(&written)?;
    assert_eq!(reparsed, captions);

    assert!(CaptionParser::new(BlankLinePolicy::Strict).parse_str(&written).is_err());

    Ok(())
}
