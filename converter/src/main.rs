//! @ai:module:intent CLI entry point for the Swagger to OpenAPI annotation converter
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on session, output, render, config

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use swagger_to_openapi::{
    output, render, session, CancellationToken, ConverterConfig, LogProgress, OutputFormat,
};

#[derive(Parser)]
#[command(name = "swagger2oas")]
#[command(author, version, about = "Convert Swagger 1.x annotations to OpenAPI 3 annotations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert legacy annotations in tree files
    Convert {
        /// Path to a tree file or a directory of tree files
        #[arg(default_value = ".")]
        path: PathBuf,

        /// TOML configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Convert without writing anything
        #[arg(long, default_value = "false")]
        dry_run: bool,

        /// Also write the Java source of each converted file
        #[arg(long, default_value = "false")]
        emit_java: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// List legacy annotations still present
    Scan {
        /// Path to a tree file or a directory of tree files
        #[arg(default_value = ".")]
        path: PathBuf,

        /// TOML configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Print the Java source of a tree file
    Render {
        /// Path to the tree file
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn init_tracing() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "swagger_to_openapi=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> swagger_to_openapi::Result<ConverterConfig> {
    match path {
        Some(path) => ConverterConfig::load(path),
        None => Ok(ConverterConfig::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Convert {
            path,
            config,
            dry_run,
            emit_java,
            format,
        } => {
            let mut config = match load_config(config.as_ref()) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(2);
                }
            };
            config.files.emit_java |= emit_java;

            let paths = match session::discover(&path, &config.files) {
                Ok(paths) => paths,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(2);
                }
            };

            let summary = session::convert_paths(
                &paths,
                &config,
                dry_run,
                &CancellationToken::new(),
                &LogProgress,
            );
            println!("{}", output::format_summary(&summary, format.into()));

            if summary.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }

        Commands::Scan {
            path,
            config,
            format,
        } => {
            let result = load_config(config.as_ref())
                .and_then(|config| session::discover(&path, &config.files))
                .and_then(|paths| session::scan_paths(&paths));

            match result {
                Ok(entries) => {
                    println!("{}", output::format_scan(&entries, format.into()));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::from(2)
                }
            }
        }

        Commands::Render { file } => match session::load_source(&file) {
            Ok(source) => {
                print!("{}", render::render_unit(&source.unit));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(2)
            }
        },
    }
}
