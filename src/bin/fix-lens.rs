/*
    ALICE-FIX-Lens
    Copyright (C) 2026 Moroya Sakamoto
*/

//! `fix-lens` — tokenize, structure and diff FIX messages from the shell.
//!
//! Output is always JSON on stdout; diagnostics go to stderr through
//! `env_logger`.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use alice_fix_lens::{align, group, tokenizer, DictionaryStore, EntryStatus, FieldPair, Message};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

#[derive(Parser)]
#[command(name = "fix-lens")]
#[command(about = "Inspect and compare FIX messages", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// QuickFIX XML dictionary used for names and repeating groups
    #[arg(long, global = true)]
    dict: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tag/value pairs found in a message
    Tokenize {
        /// Message file, or `-` for stdin
        input: String,
    },
    /// Print a message with its repeating groups rebuilt
    Tree {
        /// Message file, or `-` for stdin
        input: String,
    },
    /// Align two messages and print one row per field path
    Diff {
        left: String,
        right: String,

        /// Only print rows whose two sides differ
        #[arg(long)]
        changed_only: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = load_store(cli.dict.as_deref())?;

    let output = match &cli.command {
        Commands::Tokenize { input } => {
            let raw = read_input(input)?;
            let (format, pairs) = tokenizer::tokenize_detected(&raw);
            let message = Message::from(pairs);
            json!({
                "format": format,
                "begin_string": message.begin_string(),
                "msg_type": message.msg_type(),
                "pairs": message,
            })
        }
        Commands::Tree { input } => {
            let pairs = tokenizer::tokenize(&read_input(input)?);
            let dict = store.resolve(&pairs);
            json!(group::structure(&pairs, &dict))
        }
        Commands::Diff {
            left,
            right,
            changed_only,
        } => {
            let left = tokenizer::tokenize(&read_input(left)?);
            let right = tokenizer::tokenize(&read_input(right)?);
            let rows = diff_rows(&store, &left, &right, *changed_only);
            json!(rows)
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .target(env_logger::Target::Stderr)
        .init();
}

/// Build the store, falling back to the built-in dictionary when `--dict`
/// does not compile.
fn load_store(path: Option<&Path>) -> Result<DictionaryStore> {
    let mut store = DictionaryStore::new();
    if let Some(path) = path {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dictionary {}", path.display()))?;
        let name = path.display().to_string();
        if let Err(e) = store.load_custom(&name, &source) {
            log::warn!("Using built-in dictionary: {e}");
        }
    }
    Ok(store)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
}

fn diff_rows(
    store: &DictionaryStore,
    left: &[FieldPair],
    right: &[FieldPair],
    changed_only: bool,
) -> Vec<serde_json::Value> {
    let left_dict = store.resolve(left);
    let right_dict = store.resolve(right);

    align::align(
        &group::structure(left, &left_dict),
        &group::structure(right, &right_dict),
    )
    .into_iter()
    .filter(|row| !changed_only || row.status() != EntryStatus::Same)
    .map(|row| {
        let status = row.status();
        let name = left_dict.tag_name(row.tag);
        json!({
            "path": row.path,
            "tag": row.tag,
            "name": name,
            "depth": row.depth,
            "group": row.is_group_header,
            "status": status,
            "left": row.left,
            "right": row.right,
        })
    })
    .collect()
}
