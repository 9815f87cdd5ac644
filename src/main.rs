//! Command-line interface for xsd-validator

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
use std::fs::File;
#[cfg(feature = "cli")]
use std::io::BufReader;
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use std::process::ExitCode;

#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;
#[cfg(feature = "cli")]
use xsd_validator::{Limits, OutputFormat, Validator};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsd-validator")]
#[command(author, version, about = "Validate an XML document against an XSD schema", long_about = None)]
struct Cli {
    /// Path to the XML file to validate
    #[arg(long, value_name = "FILE")]
    xml: PathBuf,

    /// Path to the XSD schema file
    #[arg(long, value_name = "FILE")]
    xsd: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Use strict processing limits for untrusted input
    #[arg(long)]
    strict_limits: bool,
}

#[cfg(feature = "cli")]
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Validate and print; `Ok(valid)` on a completed run
#[cfg(feature = "cli")]
fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let limits = if cli.strict_limits {
        Limits::strict()
    } else {
        Limits::default()
    };

    let xsd = File::open(&cli.xsd)
        .map_err(|e| format!("cannot open XSD file '{}': {}", cli.xsd.display(), e))?;
    let validator = Validator::from_reader_with_limits(BufReader::new(xsd), limits)?;

    let xml = File::open(&cli.xml)
        .map_err(|e| format!("cannot open XML file '{}': {}", cli.xml.display(), e))?;
    let result = validator
        .validate_reader(BufReader::new(xml))?
        .with_subject(cli.xml.display().to_string());

    println!("{}", cli.format.render(&result)?.trim_end());
    Ok(result.valid)
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    std::process::exit(1);
}
