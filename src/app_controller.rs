use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::cleanup::{CleanupPipeline, CleanupReport};
use crate::file_utils::{FileManager, FileType};
use crate::interaction::{AutoPrompter, Prompter};
use crate::subtitle_processor::{Caption, CaptionDocument, CaptionParser};

// @module: Application controller for caption cleanup

/// Outcome of cleaning every caption file in a directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    /// Files cleaned and written
    pub processed: usize,
    /// Files left alone (existing output, or already cleaned output)
    pub skipped: usize,
    /// Files that failed to read, parse or write
    pub failed: usize,
}

/// Main application controller for caption cleanup
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Overwrite existing output files
    force_overwrite: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            force_overwrite: false,
        })
    }

    pub fn with_force_overwrite(mut self, force_overwrite: bool) -> Self {
        self.force_overwrite = force_overwrite;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn parser(&self) -> CaptionParser {
        CaptionParser::new(self.config.parser.blank_lines)
    }

    fn pipeline(&self) -> CleanupPipeline {
        CleanupPipeline::from_config(&self.config)
    }

    /// Parse and clean raw lines without touching the filesystem
    pub fn process_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<(Vec<Caption>, CleanupReport)> {
        let mut captions = self.parser().parse_lines(lines)?;
        let report = self.pipeline().run(&mut captions);
        Ok((captions, report))
    }

    /// Output path suggested for `input_file`, next to it
    pub fn default_output_path(&self, input_file: &Path) -> PathBuf {
        FileManager::generate_output_path(
            input_file,
            input_file.parent().unwrap_or_else(|| Path::new("")),
            &self.config.output.suffix,
            self.config.output.extension.trim_start_matches('.'),
        )
    }

    /// Clean a single file, printing any preview to stdout
    pub fn run(&self, input_file: Option<PathBuf>, prompter: &mut dyn Prompter) -> Result<Option<PathBuf>> {
        let stdout = std::io::stdout();
        self.run_with_output(input_file, prompter, &mut stdout.lock())
    }

    /// Clean a single file.
    ///
    /// Asks the prompter for the input path when none is given, whether to
    /// preview, and for the output filename. Returns the written path, or
    /// `None` when nothing was written.
    pub fn run_with_output<W: Write>(
        &self,
        input_file: Option<PathBuf>,
        prompter: &mut dyn Prompter,
        preview_out: &mut W,
    ) -> Result<Option<PathBuf>> {
        let start_time = std::time::Instant::now();

        let input_file = match input_file {
            Some(path) => path,
            None => prompter
                .input("Caption file to clean:", None)?
                .map(PathBuf::from)
                .ok_or_else(|| anyhow!("No input file selected"))?,
        };

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        if FileManager::detect_file_type(&input_file)? != FileType::Subtitle {
            warn!("{:?} does not look like a caption file, parsing anyway", input_file);
        }

        let mut document = CaptionDocument::from_file(&input_file, &self.parser())?;
        info!("Loaded {} captions from {:?}", document.captions.len(), input_file);

        let report = self.pipeline().run(&mut document.captions);
        info!("Cleanup complete: {}", report.summary());

        let emptied = document.captions.iter().filter(|c| c.content().is_empty()).count();
        if emptied > 0 {
            warn!(
                "{} caption(s) are empty after cleanup; the output only parses back with --blank-lines tolerant",
                emptied
            );
        }

        let show_preview = self.config.output.preview
            || prompter.confirm("Console preview", "Post caption preview to console?")?;
        if show_preview {
            document.preview(&mut *preview_out)?;
        }

        let suggested = self.default_output_path(&input_file);
        let suggested_name = suggested
            .file_name()
            .map(|name| name.to_string_lossy().to_string());

        let Some(file_name) = prompter.input("Output filename (with extension):", suggested_name.as_deref())? else {
            info!("No caption file generated");
            return Ok(None);
        };

        let output_path = document.resolve_output_path(&file_name);
        if output_path.exists() && !self.force_overwrite {
            warn!("Output file already exists: {:?}. Use -f to force overwrite.", output_path);
            info!("No caption file generated");
            return Ok(None);
        }

        let written = document.write_to_file(&output_path)?;
        info!(
            "New caption file {} generated in {:.1?}",
            written.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default(),
            start_time.elapsed()
        );

        Ok(Some(written))
    }

    /// Clean every caption file under `input_dir` without asking anything.
    /// Failures are logged per file and counted, not propagated.
    pub fn run_folder(&self, input_dir: &Path) -> Result<FolderSummary> {
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let extension = self.config.output.extension.trim_start_matches('.');
        let cleaned_marker = format!(".{}", self.config.output.suffix);
        let files: Vec<PathBuf> = FileManager::find_files(input_dir, extension)?
            .into_iter()
            .filter(|path| {
                let is_output = path
                    .file_stem()
                    .is_some_and(|stem| stem.to_string_lossy().ends_with(&cleaned_marker));
                if is_output {
                    debug!("Skipping previously cleaned file: {:?}", path);
                }
                !is_output
            })
            .collect();

        info!("Found {} caption files in {:?}", files.len(), input_dir);

        let mut summary = FolderSummary::default();
        if files.is_empty() {
            return Ok(summary);
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        for file in &files {
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            folder_pb.set_message(format!("Processing: {}", file_name));

            let mut prompter = AutoPrompter::new(false, None);
            match self.run_with_output(Some(file.clone()), &mut prompter, &mut std::io::sink()) {
                Ok(Some(_)) => summary.processed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing {:?}: {:#}", file, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");
        info!(
            "Finished: {} cleaned, {} skipped, {} failed",
            summary.processed, summary.skipped, summary.failed
        );

        Ok(summary)
    }
}
