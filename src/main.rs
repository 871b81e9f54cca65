//! mathdoc - render a Markdown report to MathJax HTML and bundle it

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use mathdoc::{build, package_file, render_file, Config, Layout};

#[derive(Parser)]
#[command(name = "mathdoc")]
#[command(version, about = "Render a Markdown report with math and bundle it", long_about = None)]
#[command(after_help = "EXAMPLES:
    mathdoc render                  Render methods_steps_and_results.md in the current directory
    mathdoc --dir docs/report build Render, then package docs/report
    RUST_LOG=debug mathdoc package  Package with path resolution details")]
struct Cli {
    /// Document directory; relative paths resolve against it
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Config file (default: <DIR>/mathdoc.toml if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the Markdown source to HTML
    Render {
        /// Markdown source
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// HTML output
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Package the rendered HTML and its images into a standalone bundle
    Package {
        /// Rendered HTML to package
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Render, then package
    Build,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> mathdoc::Result<()> {
    let mut config = match cli.config {
        Some(ref path) => Config::load(path)?,
        None => Config::discover(&cli.dir)?,
    };

    match cli.command {
        Commands::Render { input, output } => {
            if let Some(input) = input {
                config.source = input;
            }
            if let Some(output) = output {
                config.output = output;
            }
            render_file(&Layout::from_config(&cli.dir, &config))?;
        }
        Commands::Package { input } => {
            if let Some(input) = input {
                config.output = input;
            }
            let report = package_file(&Layout::from_config(&cli.dir, &config))?;
            println!(
                "To use: extract {} and open {} in a browser.",
                report.archive.display(),
                report
                    .html
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            );
        }
        Commands::Build => {
            let (_, report) = build(&Layout::from_config(&cli.dir, &config))?;
            println!("Bundle written to {}", report.archive.display());
        }
    }

    Ok(())
}
