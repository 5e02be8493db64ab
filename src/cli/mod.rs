//! scummloc CLI - build localization bundles from translation dumps

use std::path::PathBuf;

use clap::Parser;

use crate::converter::convert_text_to_bundle;

#[derive(Parser)]
#[command(name = "scummloc")]
#[command(about = "Build a SCVMTRS localization bundle from script text dumps", long_about = None)]
#[command(version)]
struct Cli {
    /// Original-language text dump (latin1)
    #[arg(short = 'e', long, value_name = "PATH")]
    original: PathBuf,

    /// Translated text dump (EUC-KR)
    #[arg(short = 'k', long, value_name = "PATH")]
    translated: PathBuf,

    /// Output bundle file
    #[arg(short = 'o', long, value_name = "PATH")]
    output: PathBuf,
}

/// Run the scummloc CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    convert_text_to_bundle(&cli.original, &cli.translated, &cli.output)?;

    Ok(())
}
