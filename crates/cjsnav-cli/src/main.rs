//! `cjsnav`: query require-graph navigation from the command line.
//!
//! Results are printed as JSON on stdout, one document per run, so
//! editor integrations and scripts can consume them directly.

mod tracing_config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use cjsnav_common::{LineMap, Position, Range};
use cjsnav_core::{DefinitionProvider, ExportScan, OsFileHost};
use cjsnav_scanner::{Token, tokenize};

#[derive(Parser)]
#[command(name = "cjsnav", version, about = "Go-to-definition for CommonJS require graphs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the definition of the reference at a position.
    Def {
        /// Source file to query.
        file: PathBuf,
        /// Zero-based line of the caret.
        line: u32,
        /// Zero-based UTF-16 column of the caret.
        character: u32,
    },
    /// List the export members a file defines, with their ranges.
    Exports {
        /// Source file to scan.
        file: PathBuf,
    },
    /// Dump the token stream of a file.
    Tokens {
        /// Source file to tokenize.
        file: PathBuf,
    },
}

#[derive(Serialize)]
struct TokenView<'a> {
    #[serde(flatten)]
    token: Token,
    range: Range,
    text: &'a str,
}

fn main() -> Result<()> {
    tracing_config::init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Def {
            file,
            line,
            character,
        } => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let host = OsFileHost;
            let provider = DefinitionProvider::new(&host);
            let locations =
                provider.provide_definition(&file, &source, Position::new(line, character));
            println!("{}", serde_json::to_string_pretty(&locations)?);
        }
        Command::Exports { file } => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let scan = ExportScan::new(&source);
            let definitions: Vec<_> = scan.definitions().collect();
            println!("{}", serde_json::to_string_pretty(&definitions)?);
        }
        Command::Tokens { file } => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let line_map = LineMap::build(&source);
            let tokens = tokenize(&source);
            let views: Vec<TokenView> = tokens
                .iter()
                .map(|t| TokenView {
                    token: *t,
                    range: line_map.span_to_range(t.start, t.end, &source),
                    text: t.text(&source),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
    }

    Ok(())
}
