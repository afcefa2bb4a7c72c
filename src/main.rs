// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};
use std::io::Write;
use std::path::{Path, PathBuf};

use clipsplit::app_config::{self, Config};
use clipsplit::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a source video into the clips listed in its CSV file (default command)
    Split(SplitArgs),

    /// Generate shell completions for clipsplit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct SplitArgs {
    /// Source video, <prefix>.mov or <prefix>.mpg, with <prefix>.csv beside it
    #[arg(value_name = "SOURCE_FILE")]
    source_file: PathBuf,

    /// Print the generated script instead of running it
    #[arg(short = 'n', long)]
    print_script: bool,

    /// Keep <prefix>.scpt after it has run
    #[arg(short, long)]
    keep_script: bool,

    /// Leave the source in place after a successful run
    #[arg(long)]
    no_move: bool,

    /// Script interpreter to invoke
    #[arg(short, long)]
    interpreter: Option<String>,

    /// Export settings preset name
    #[arg(short, long)]
    preset: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "clipsplit.json")]
    config_path: String,

    /// Write the effective configuration to the config path before splitting
    #[arg(long)]
    save_config: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// clipsplit - split a long video into named clips
///
/// Reads clip names and timestamps from <prefix>.csv and has QuickTime Player
/// trim and export each one into <prefix>_split/.
#[derive(Parser, Debug)]
#[command(name = "clipsplit")]
#[command(version)]
#[command(about = "Split a video into named clips listed in a CSV file")]
#[command(long_about = "clipsplit reads <prefix>.csv (clip name, start, end; no header) next to
<prefix>.mov or <prefix>.mpg, generates an AppleScript that has QuickTime Player
trim and export every clip into <prefix>_split/, runs it with osascript, and
then moves the source into DoneSplitting/.

Timestamps are [HH:]MM:SS[.ffffff], as shown by QuickTime's trim mode.

EXAMPLES:
    clipsplit video.mov                    # Split using the default config
    clipsplit -n video.mov                 # Print the script, run nothing
    clipsplit -k video.mov                 # Keep video.scpt for inspection
    clipsplit --no-move video.mpg          # Leave the source where it is
    clipsplit --log-level debug video.mov  # Show derived paths and bounds
    clipsplit completions zsh > _clipsplit # Generate zsh completions

CONFIGURATION:
    Configuration is read from clipsplit.json by default. You can specify a
    different file with --config-path. If the file doesn't exist, built-in
    defaults are used; --save-config writes the effective settings there.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Source video, <prefix>.mov or <prefix>.mpg, with <prefix>.csv beside it
    #[arg(value_name = "SOURCE_FILE")]
    source_file: Option<PathBuf>,

    /// Print the generated script instead of running it
    #[arg(short = 'n', long)]
    print_script: bool,

    /// Keep <prefix>.scpt after it has run
    #[arg(short, long)]
    keep_script: bool,

    /// Leave the source in place after a successful run
    #[arg(long)]
    no_move: bool,

    /// Script interpreter to invoke
    #[arg(short, long)]
    interpreter: Option<String>,

    /// Export settings preset name
    #[arg(short, long)]
    preset: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "clipsplit.json")]
    config_path: String,

    /// Write the effective configuration to the config path before splitting
    #[arg(long)]
    save_config: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn colour_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let level = record.level();

            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::colour_for_level(level),
                now,
                Self::emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // The logger accepts everything; the configured level is applied through max_level
    if CustomLogger::init(LevelFilter::Trace).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }

    // Usage errors exit with -1 like every other failure; help and version exit cleanly
    let cli = match CommandLineOptions::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(-1);
        }
    };

    if let Err(e) = dispatch(cli).await {
        error!("{:#}", e);
        std::process::exit(-1);
    }
}

async fn dispatch(cli: CommandLineOptions) -> Result<()> {
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "clipsplit", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Split(args)) => run_split(args).await,
        None => {
            // Default behavior - use top-level args
            let Some(source_file) = cli.source_file else {
                eprintln!("{}", CommandLineOptions::command().render_usage());
                std::process::exit(-1);
            };

            let split_args = SplitArgs {
                source_file,
                print_script: cli.print_script,
                keep_script: cli.keep_script,
                no_move: cli.no_move,
                interpreter: cli.interpreter,
                preset: cli.preset,
                config_path: cli.config_path,
                save_config: cli.save_config,
                log_level: cli.log_level,
            };
            run_split(split_args).await
        }
    }
}

// @loads: Config from file or defaults, then applies CLI overrides
fn load_config(options: &SplitArgs) -> Result<Config> {
    let config_path = Path::new(&options.config_path);
    let mut config = Config::load_or_default(config_path)?;

    if let Some(interpreter) = &options.interpreter {
        config.interpreter = interpreter.clone();
    }

    if let Some(preset) = &options.preset {
        config.script.export_preset = preset.clone();
    }

    if options.keep_script {
        config.keep_script = true;
    }

    if options.no_move {
        config.output.move_source_when_done = false;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    if options.save_config {
        config.save(config_path)?;
        info!("Saved configuration to '{}'", options.config_path);
    }

    Ok(config)
}

async fn run_split(options: SplitArgs) -> Result<()> {
    // A level given on the command line applies before the config is read
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    if options.print_script {
        let document = controller.preview(&options.source_file)?;
        println!("{}", document);
        return Ok(());
    }

    let outcome = controller.run(&options.source_file).await?;
    // Reported on stdout so it shows at every log level
    println!("{}", outcome.exit);
    info!(
        "Processed {} clip(s) from {:?}",
        outcome.clip_count, options.source_file
    );

    Ok(())
}
