/*!
 * Integration tests for single-file and folder runs of the controller
 */

use std::fs;
use anyhow::Result;
use captidy::app_config::{Config, Replacement};
use captidy::app_controller::FolderSummary;
use captidy::subtitle_processor::{BlankLinePolicy, CaptionDocument, CaptionParser};
use captidy::Controller;
use crate::common::{self, ScriptedPrompter};

#[test]
fn test_run_withPreviewAndDefaultName_shouldWriteCleanedFile() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;
    let controller = Controller::with_config(Config::default())?;
    let mut prompter = ScriptedPrompter::new(&[true], &[]);
    let mut preview = Vec::new();

    let written = controller.run_with_output(Some(source), &mut prompter, &mut preview)?;

    let expected_path = temp_dir.path().join("talk.cleaned.srt");
    assert_eq!(written.as_deref(), Some(expected_path.as_path()));
    let content = fs::read_to_string(&expected_path)?;
    assert!(content.starts_with("1\n00:00:01,000 --> 00:00:04,000\nWelcome to the yiker show.\n\n"));

    let preview = String::from_utf8(preview)?;
    assert!(preview.starts_with("Caption output:\n"));
    assert!(preview.ends_with("Caption output end\n"));
    assert!(preview.contains("It runs peer-to-peer. No servers\ninvolved"));

    assert_eq!(prompter.asked, vec![
        "Console preview".to_string(),
        "Output filename (with extension):".to_string(),
    ]);

    Ok(())
}

#[test]
fn test_run_withDeclinedPreviewAndCustomName_shouldWriteThere() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;
    let controller = Controller::with_config(Config::default())?;
    let mut prompter = ScriptedPrompter::new(&[false], &[Some("fixed.srt")]);
    let mut preview = Vec::new();

    let written = controller.run_with_output(Some(source), &mut prompter, &mut preview)?;

    assert_eq!(written, Some(temp_dir.path().join("fixed.srt")));
    assert!(preview.is_empty());
    Ok(())
}

#[test]
fn test_run_withNoFilename_shouldNotWrite() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;
    let controller = Controller::with_config(Config::default())?;
    let mut prompter = ScriptedPrompter::new(&[false], &[None]);

    let written = controller.run_with_output(Some(source), &mut prompter, &mut std::io::sink())?;

    assert_eq!(written, None);
    assert!(!temp_dir.path().join("talk.cleaned.srt").exists());
    Ok(())
}

#[test]
fn test_run_withoutInputPath_shouldAskForIt() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;
    let controller = Controller::with_config(Config::default())?;
    let source_name = source.to_string_lossy().to_string();
    let mut prompter = ScriptedPrompter::new(&[false], &[Some(source_name.as_str())]);

    let written = controller.run_with_output(None, &mut prompter, &mut std::io::sink())?;

    assert_eq!(written, Some(temp_dir.path().join("talk.cleaned.srt")));
    assert_eq!(prompter.asked[0], "Caption file to clean:");
    Ok(())
}

#[test]
fn test_run_withExistingOutput_shouldRespectForceOverwrite() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;
    let existing = common::create_test_file(temp_dir.path(), "talk.cleaned.srt", "old")?;

    let controller = Controller::with_config(Config::default())?;
    let written = controller.run_with_output(
        Some(source.clone()),
        &mut ScriptedPrompter::new(&[false], &[]),
        &mut std::io::sink(),
    )?;
    assert_eq!(written, None);
    assert_eq!(fs::read_to_string(&existing)?, "old");

    let controller = Controller::with_config(Config::default())?.with_force_overwrite(true);
    let written = controller.run_with_output(
        Some(source),
        &mut ScriptedPrompter::new(&[false], &[]),
        &mut std::io::sink(),
    )?;
    assert_eq!(written, Some(existing.clone()));
    assert_ne!(fs::read_to_string(&existing)?, "old");

    Ok(())
}

#[test]
fn test_run_withConfiguredPreview_shouldNotAskForConfirmation() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;
    let mut config = Config::default();
    config.output.preview = true;
    let controller = Controller::with_config(config)?;
    let mut prompter = ScriptedPrompter::new(&[], &[None]);
    let mut preview = Vec::new();

    controller.run_with_output(Some(source), &mut prompter, &mut preview)?;

    assert!(!preview.is_empty());
    assert_eq!(prompter.asked, vec!["Output filename (with extension):".to_string()]);
    Ok(())
}

#[test]
fn test_run_withMissingInput_shouldFail() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(Config::default())?;

    let result = controller.run_with_output(
        Some(temp_dir.path().join("missing.srt")),
        &mut ScriptedPrompter::default(),
        &mut std::io::sink(),
    );

    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_run_withMalformedFile_shouldFailWithoutWriting() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "bad.srt", "one\n00:00:01,000 --> 00:00:02,000\nHi\n")?;
    let controller = Controller::with_config(Config::default())?;
    let mut prompter = ScriptedPrompter::default();

    let result = controller.run_with_output(Some(source), &mut prompter, &mut std::io::sink());

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid caption index"));
    assert!(prompter.asked.is_empty());
    assert!(!temp_dir.path().join("bad.cleaned.srt").exists());
    Ok(())
}

#[test]
fn test_withConfig_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.replacements.push(Replacement::new("", "x"));
    assert!(Controller::with_config(config).is_err());
}

#[test]
fn test_runFolder_shouldCleanEachFileAndCountFailures() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "a.srt")?;
    common::create_test_subtitle(temp_dir.path(), "b.srt")?;
    common::create_test_file(temp_dir.path(), "old.cleaned.srt", "1\nt\nx\n")?;
    common::create_test_file(temp_dir.path(), "broken.srt", "oops\nno timing\n")?;
    common::create_test_file(temp_dir.path(), "readme.txt", "not captions")?;

    let mut config = Config::default();
    config.parser.blank_lines = BlankLinePolicy::Tolerant;
    let controller = Controller::with_config(config)?;

    let summary = controller.run_folder(temp_dir.path())?;
    assert_eq!(summary, FolderSummary { processed: 2, skipped: 0, failed: 1 });
    assert!(temp_dir.path().join("a.cleaned.srt").exists());
    assert!(temp_dir.path().join("b.cleaned.srt").exists());
    assert!(!temp_dir.path().join("old.cleaned.cleaned.srt").exists());

    let summary = controller.run_folder(temp_dir.path())?;
    assert_eq!(summary, FolderSummary { processed: 0, skipped: 2, failed: 1 });

    Ok(())
}

#[test]
fn test_runFolder_withMissingDirectory_shouldFail() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(Config::default())?;
    assert!(controller.run_folder(&temp_dir.path().join("nope")).is_err());
    Ok(())
}

#[test]
fn test_run_withWhitespaceOnlyCaption_shouldWriteFileTolerantModeReadsBack() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(
        temp_dir.path(),
        "gap.srt",
        &format!("1\n{0}\n   \n\n2\n{0}\nend.\n", common::TIMING),
    )?;

    let mut config = Config::default();
    config.parser.blank_lines = BlankLinePolicy::Tolerant;
    let controller = Controller::with_config(config)?;
    let mut prompter = ScriptedPrompter::new(&[false], &[Some("gap.out.srt")]);

    let written = controller
        .run_with_output(Some(source), &mut prompter, &mut std::io::sink())?
        .expect("output written");

    let reparsed = CaptionDocument::from_file(&written, &CaptionParser::new(BlankLinePolicy::Tolerant))?;
    assert_eq!(reparsed.captions.len(), 2);
    assert_eq!(reparsed.captions[0].content(), "");
    assert_eq!(reparsed.captions[1].content(), "end.");
    Ok(())
}
