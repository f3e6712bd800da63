use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use captidy::app_config::{Config, LogLevel};
use captidy::interaction::{AutoPrompter, ConsolePrompter, Prompter};
use captidy::{BlankLinePolicy, Controller};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for BlankLinePolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliBlankLines {
    Strict,
    Tolerant,
}

impl From<CliBlankLines> for BlankLinePolicy {
    fn from(cli_policy: CliBlankLines) -> Self {
        match cli_policy {
            CliBlankLines::Strict => BlankLinePolicy::Strict,
            CliBlankLines::Tolerant => BlankLinePolicy::Tolerant,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clean a caption file or every caption file in a directory (default command)
    Clean(CleanArgs),

    /// Generate shell completions for captidy
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct CleanArgs {
    /// Caption file or directory to process (asked for when omitted)
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output filename for unattended runs, relative to the input file's directory
    #[arg(short, long)]
    output: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Print the cleaned captions to the console
    #[arg(short, long)]
    preview: bool,

    /// Do not ask anything; write to --output or the default name
    #[arg(short, long)]
    yes: bool,

    /// How blank lines between caption blocks are treated
    #[arg(long, value_enum)]
    blank_lines: Option<CliBlankLines>,
}

/// captidy - caption file cleanup
#[derive(Parser, Debug)]
#[command(name = "captidy")]
#[command(args_conflicts_with_subcommands = true)]
#[command(version)]
#[command(about = "Clean up subtitle caption files")]
#[command(long_about = "captidy parses caption files, applies search/replace, space collapsing, trimming and sentence capitalization, and writes the result.

EXAMPLES:
    captidy talk.srt                        # Clean interactively
    captidy -y talk.srt                     # Clean and write talk.cleaned.srt
    captidy -y -o fixed.srt talk.srt        # Clean and write fixed.srt next to the input
    captidy -p -y talk.srt                  # Also print the result
    captidy --blank-lines tolerant /subs/   # Clean a whole directory
    captidy completions bash > captidy.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    clean: CleanArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and prefix for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌ "),
            Level::Warn => ("\x1B[1;33m", "🚧 "),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "🔍 "),
            Level::Trace => ("\x1B[1;35m", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, prefix) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, prefix, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The level is lowered or raised once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "captidy", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Clean(args)) => run_clean(args),
        None => run_clean(cli.clean),
    }
}

// @returns: Error when a single-file option is combined with a directory input
fn check_folder_options(options: &CleanArgs) -> Result<()> {
    if let Some(output) = &options.output {
        return Err(anyhow!(
            "--output {:?} names a single file and cannot be used with a directory input",
            output
        ));
    }
    Ok(())
}

fn run_clean(options: CleanArgs) -> Result<()> {
    let folder_input = options.input_path.as_ref().filter(|path| path.is_dir()).cloned();
    if folder_input.is_some() {
        check_folder_options(&options)?;
    }

    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(policy) = &options.blank_lines {
        config.parser.blank_lines = policy.clone().into();
    }
    if options.preview {
        config.output.preview = true;
    }

    config.validate().context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?.with_force_overwrite(options.force_overwrite);

    if let Some(input_dir) = folder_input {
        let summary = controller.run_folder(&input_dir)?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) could not be cleaned", summary.failed));
        }
        return Ok(());
    }

    if options.yes && options.input_path.is_none() {
        return Err(anyhow!("INPUT_PATH is required with --yes"));
    }

    let mut prompter: Box<dyn Prompter> = if options.yes {
        Box::new(AutoPrompter::new(false, options.output.clone()))
    } else {
        Box::new(ConsolePrompter)
    };

    controller.run(options.input_path.clone(), prompter.as_mut())?;
    Ok(())
}
