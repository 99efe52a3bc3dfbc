//! A CLI for building the chunk hash artifact and checking digits against it.

#![warn(clippy::all, clippy::pedantic)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use digits_common::client_api::check_digits_remote;
use digits_common::integrity::{REFERENCE_LENGTH, REFERENCE_SHA256};
use digits_common::{
    BuildError, CHUNK_SIZE, CLIENT_VERSION, DEFAULT_ARTIFACT_PATH, Digits, IntegrityError,
    IntegrityRecord, LookupSet, REFERENCE_FILE_NAME, REFERENCE_URL, build_to_path, fnv1a_32,
};
use log::debug;
use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(CHUNK_SIZE) {
    Some(size) => size,
    None => panic!("CHUNK_SIZE must be positive"),
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify the reference digits and write the chunk hash artifact
    Build {
        /// The text file holding the reference digits
        #[arg(long, default_value = REFERENCE_FILE_NAME, env = "DIGITS_SOURCE")]
        source: PathBuf,

        /// Where to write the artifact
        #[arg(long, default_value = DEFAULT_ARTIFACT_PATH, env = "DIGITS_ARTIFACT")]
        out: PathBuf,

        /// Number of digits in each chunk
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, env = "DIGITS_CHUNK_SIZE")]
        chunk_size: NonZeroUsize,

        /// Expected number of digits in the source
        #[arg(long, default_value_t = REFERENCE_LENGTH, env = "DIGITS_EXPECTED_LENGTH")]
        expected_length: usize,

        /// Expected SHA-256 of the source digits, in hex
        #[arg(long, default_value = REFERENCE_SHA256, env = "DIGITS_EXPECTED_SHA256")]
        expected_sha256: String,
    },

    /// Check whether a digit string is a reference chunk
    Check {
        /// The digits to check; anything that is not a digit is ignored
        digits: String,

        /// Check against this local artifact
        #[arg(long, default_value = DEFAULT_ARTIFACT_PATH, env = "DIGITS_ARTIFACT", conflicts_with = "api_base")]
        artifact: PathBuf,

        /// Check against the api at this base URL instead of a local artifact
        #[arg(long, env = "DIGITS_API_BASE")]
        api_base: Option<String>,

        /// Attempts before giving up on the api
        #[arg(long, default_value_t = 3, env = "DIGITS_MAX_ATTEMPTS")]
        max_attempts: u32,
    },

    /// Print the digit count and SHA-256 of a source file
    Measure {
        /// The text file holding the digits
        #[arg(long, default_value = REFERENCE_FILE_NAME, env = "DIGITS_SOURCE")]
        source: PathBuf,
    },
}

fn setup_instructions(source: &Path) -> String {
    format!(
        "Ensure you've downloaded the correct prime from {REFERENCE_URL} and extracted it to {}.",
        source.display()
    )
}

/// Read the source text, with a hint on where to get it if it is missing.
fn read_source(source: &Path) -> Result<String> {
    match fs::read_to_string(source) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(anyhow::anyhow!(
            "Prime not found. {}",
            setup_instructions(source)
        )),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", source.display())),
    }
}

fn run_build(
    source: &Path,
    out: &Path,
    chunk_size: NonZeroUsize,
    integrity: &IntegrityRecord,
) -> Result<()> {
    let raw = read_source(source)?;
    debug!("Read {} bytes from {}", raw.len(), source.display());

    match build_to_path(&raw, integrity, chunk_size.get(), fnv1a_32, out) {
        Ok(artifact) => {
            println!("Digit length check: ✓");
            println!("Hash check: ✓");
            let out = fs::canonicalize(out).unwrap_or_else(|_| out.to_path_buf());
            println!(
                "{} chunk hashes written to {}",
                artifact.len(),
                out.display()
            );
            Ok(())
        }
        Err(BuildError::Integrity(e)) => {
            let check = match &e {
                IntegrityError::LengthMismatch { .. } => "Digit length check",
                IntegrityError::HashMismatch { .. } => {
                    println!("Digit length check: ✓");
                    "Hash check"
                }
            };
            println!("{check}: ✗");
            Err(anyhow::anyhow!("{e}. {}", setup_instructions(source)))
        }
        Err(e) => Err(e.into()),
    }
}

fn run_check(
    digits: &str,
    artifact: &Path,
    api_base: Option<&str>,
    max_attempts: u32,
) -> Result<bool> {
    if let Some(api_base) = api_base {
        debug!("Checking against {api_base}");
        return check_digits_remote(api_base, digits, max_attempts);
    }
    let lookup = LookupSet::from_path(artifact)
        .with_context(|| format!("Failed to load lookup set from {}", artifact.display()))?;
    Ok(lookup.check(digits))
}

fn run_measure(source: &Path) -> Result<()> {
    let raw = read_source(source)?;
    let record = IntegrityRecord::measure(&Digits::from_text(&raw));
    println!("Digits: {}", record.expected_length);
    println!("SHA-256: {}", record.expected_sha256);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            source,
            out,
            chunk_size,
            expected_length,
            expected_sha256,
        } => {
            let integrity = IntegrityRecord::new(expected_length, expected_sha256);
            run_build(&source, &out, chunk_size, &integrity)
        }
        Command::Check {
            digits,
            artifact,
            api_base,
            max_attempts,
        } => {
            let result = run_check(&digits, &artifact, api_base.as_deref(), max_attempts)?;
            println!("{result}");
            Ok(())
        }
        Command::Measure { source } => run_measure(&source),
    }
}

fn main() -> ExitCode {
    // Parse command line arguments
    let cli = Cli::parse();

    // Set up logger
    env_logger::init();
    debug!("Digits CLI v{CLIENT_VERSION}: {cli:?}");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
