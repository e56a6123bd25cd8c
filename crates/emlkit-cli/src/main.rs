//! `emlkit` - parse, read and build email messages from the command line.
//!
//! Every subcommand takes a file path, or `-` for standard input, and writes
//! its result to standard output. Diagnostics go to standard error through
//! `tracing`; set `RUST_LOG` to change the level.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use emlkit::{BuildOptions, ParseOptions, ReadOptions, SemanticMessage};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "emlkit", version, about = "Parse, read and build RFC 5322 email messages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the header and multipart structure as JSON
    Parse {
        /// Message file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Stop after the top-level headers
        #[arg(long)]
        headers_only: bool,
    },
    /// Print subject, addresses, bodies and attachments as JSON
    Read {
        /// Message file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Stop after the top-level headers
        #[arg(long)]
        headers_only: bool,
    },
    /// Build a message from the JSON printed by `read`
    Build {
        /// JSON file, or `-` for stdin
        #[arg(value_name = "JSON")]
        file: PathBuf,
        /// Replay saved section headers
        #[arg(long)]
        encode: bool,
    },
    /// Read a message and build it again
    Rebuild {
        /// Message file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Replay saved section headers
        #[arg(long)]
        encode: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "emlkit=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let output = run(cli.command, cli.pretty)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

fn run(command: Commands, pretty: bool) -> Result<String> {
    match command {
        Commands::Parse { file, headers_only } => {
            let text = read_message(&file)?;
            let options = ParseOptions::new().headers_only(headers_only);
            to_json(&emlkit::parse(&text, &options), pretty)
        }
        Commands::Read { file, headers_only } => {
            let text = read_message(&file)?;
            let options = ReadOptions::new().parse(ParseOptions::new().headers_only(headers_only));
            let message = emlkit::read(&text, &options)
                .with_context(|| format!("Failed to read message {}", file.display()))?;
            to_json(&message, pretty)
        }
        Commands::Build { file, encode } => {
            let json = read_input(&file)?;
            let message: SemanticMessage = serde_json::from_slice(&json)
                .with_context(|| format!("Invalid message JSON in {}", file.display()))?;
            emlkit::build(&message, &BuildOptions::new().encode(encode))
                .context("Failed to build message")
        }
        Commands::Rebuild { file, encode } => {
            let text = read_message(&file)?;
            emlkit::rebuild(&text, &ReadOptions::default(), &BuildOptions::new().encode(encode))
                .with_context(|| format!("Failed to rebuild message {}", file.display()))
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read standard input")?;
        return Ok(buffer);
    }
    fs::read(path).with_context(|| format!("Failed to open {}", path.display()))
}

/// Reads a message file. Bytes that are not UTF-8 are mapped one to one onto
/// code points so 8-bit bodies survive until charset decoding.
fn read_message(path: &Path) -> Result<String> {
    let bytes = read_input(path)?;
    debug!(path = %path.display(), len = bytes.len(), "read message");
    Ok(message_text(bytes))
}

fn message_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|err| emlkit::charset::bytes_to_string(err.as_bytes()))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize JSON")
}
