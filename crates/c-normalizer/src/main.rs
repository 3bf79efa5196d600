use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use c_normalizer::{NormalizeError, Pipeline, Result, Settings, config::LogLevel};

#[derive(Parser, Debug)]
#[command(name = "c-normalizer", version, about)]
struct Args {
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Also write logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Settings file; defaults to the nearest c-normalizer.toml above the input.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for derived files; defaults to the input's directory.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove `static` from the named functions.
    StripStatic {
        file: PathBuf,
        #[arg(long = "function", required = true)]
        functions: Vec<String>,
        /// Overwrite the file instead of printing the result.
        #[arg(long)]
        in_place: bool,
    },
    /// Expand macros, keeping include directives, into `expanded_<file>`.
    Expand { file: PathBuf },
    /// Replace typedef aliases by their types, in place.
    Unfold { file: PathBuf },
    /// Expand then unfold, optionally stripping `static` first.
    Canonicalize {
        file: PathBuf,
        #[arg(long = "strip")]
        strip: Vec<String>,
    },
}

impl Command {
    fn file(&self) -> &Path {
        match self {
            Self::StripStatic {
                file, ..
            }
            | Self::Expand {
                file,
            }
            | Self::Unfold {
                file,
            }
            | Self::Canonicalize {
                file, ..
            } => file,
        }
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::discover(args.command.file())?,
    };
    if let Some(dir) = &args.output_dir {
        settings.output.directory = Some(dir.clone());
    }
    Ok(settings)
}

fn init_tracing(
    args: &Args,
    level: LogLevel,
) {
    let directive = if args.verbose {
        LogLevel::Debug.filter_directive()
    } else {
        level.filter_directive()
    };

    let file_layer = args.log_file.as_ref().map(|log_path| {
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new(".")),
            log_path.file_name().unwrap_or(std::ffi::OsStr::new("c-normalizer.log")),
        );
        fmt::layer().with_writer(file_appender).with_ansi(false).with_target(false).with_filter(EnvFilter::new(&directive))
    });

    let stderr_layer =
        fmt::layer().with_writer(std::io::stderr).with_ansi(false).with_target(false).with_filter(EnvFilter::new(&directive));

    tracing_subscriber::registry().with(file_layer).with(stderr_layer).init();
}

async fn run(
    command: Command,
    settings: &Settings,
) -> Result<()> {
    let pipeline = Pipeline::new(settings);
    match command {
        Command::StripStatic {
            file,
            functions,
            in_place,
        } => {
            let stripped = pipeline.stripper().strip_functions(functions.as_slice(), &file).await?;
            if in_place {
                tokio::fs::write(&file, stripped).await.map_err(|error| NormalizeError::Io {
                    path: file.clone(),
                    source: error,
                })?;
                println!("{}", file.display());
            } else {
                print!("{stripped}");
            }
        },
        Command::Expand {
            file,
        } => {
            let expanded = pipeline.expander().expand(&file).await?;
            println!("{}", expanded.display());
        },
        Command::Unfold {
            file,
        } => {
            let unfolded = pipeline.unfolder().unfold(&file).await?;
            println!("{}", unfolded.display());
        },
        Command::Canonicalize {
            file,
            strip,
        } => {
            let canonical = pipeline.canonicalize_with_strip(&file, strip.as_slice()).await?;
            println!("{}", canonical.display());
        },
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let settings = load_settings(&args);
    let level = settings.as_ref().map(|s| s.logging.level).unwrap_or_default();
    init_tracing(&args, level);

    let settings = match settings {
        Ok(settings) => settings,
        Err(error) => {
            error!("{error}");
            std::process::exit(1);
        },
    };

    info!("c-normalizer v{}", env!("CARGO_PKG_VERSION"));
    if let Err(error) = run(args.command, &settings).await {
        error!("{error}");
        std::process::exit(1);
    }
}
