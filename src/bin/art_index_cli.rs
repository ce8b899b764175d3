// SPDX-License-Identifier: Apache-2.0

//! A thin debugging CLI over [`art_index::Tree`], modeled on the teacher's
//! `clap::Parser` derive style. Not a product surface: the real CLI,
//! config loader, and document ingestion pipeline are external
//! collaborators, out of scope for this crate. This binary exists so a
//! developer can poke
//! at the index from a terminal without writing a throwaway test.
//!
//! Fixture format: one token per line, tab-separated
//! `token<TAB>doc_id<TAB>score`. Every line folds one document into the
//! tree under that token's key before the requested command runs.

use std::fs;
use std::ops::ControlFlow;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use art_index::{Comparator, Document, Order, Tree};

#[derive(Parser)]
#[command(name = "art-index-cli", about = "Poke at an ART term index from the command line", version)]
struct Cli {
    /// Fixture file: one `token<TAB>doc_id<TAB>score` triple per line.
    #[arg(short, long)]
    fixture: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exact lookup of a single key.
    Search { key: String },
    /// Every key carrying `prefix` as a leading substring.
    Prefix { prefix: String },
    /// Damerau-Levenshtein fuzzy search.
    Fuzzy {
        term: String,
        #[arg(long, default_value_t = 0)]
        min_cost: u32,
        #[arg(long, default_value_t = 2)]
        max_cost: u32,
        #[arg(long, default_value_t = 10)]
        max_results: usize,
        #[arg(long)]
        by_frequency: bool,
        #[arg(long)]
        prefix: bool,
    },
    /// Range query over `i32`-encoded keys (see `art_index::encoding`).
    Range {
        value: i32,
        #[arg(long, default_value = "ge")]
        comparator: String,
    },
}

fn parse_comparator(s: &str) -> Option<Comparator> {
    match s {
        "lt" | "<" => Some(Comparator::Lt),
        "le" | "<=" => Some(Comparator::Le),
        "eq" | "=" => Some(Comparator::Eq),
        "ge" | ">=" => Some(Comparator::Ge),
        "gt" | ">" => Some(Comparator::Gt),
        _ => None,
    }
}

/// `numeric = true` encodes each line's token as an `i32` via
/// [`art_index::encoding::encode_i32`] instead of storing it as raw text
/// bytes — required for the `Range` subcommand, whose `int32_search`
/// descends encoded scalar keys, not token text.
fn load_fixture(path: &str, numeric: bool) -> Result<Tree, String> {
    let contents = fs::read_to_string(path).map_err(|e| format!("reading {path}: {e}"))?;
    let mut tree = Tree::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let [token, id, score] = fields[..] else {
            return Err(format!("line {}: expected token<TAB>id<TAB>score", lineno + 1));
        };
        let id: u32 = id.parse().map_err(|e| format!("line {}: bad id: {e}", lineno + 1))?;
        let score: i64 = score
            .parse()
            .map_err(|e| format!("line {}: bad score: {e}", lineno + 1))?;
        let key: Vec<u8> = if numeric {
            let n: i32 = token
                .parse()
                .map_err(|e| format!("line {}: bad numeric token: {e}", lineno + 1))?;
            art_index::encoding::encode_i32(n).to_vec()
        } else {
            token.as_bytes().to_vec()
        };
        tree.insert(
            &key,
            Document {
                id,
                score,
                offsets: vec![],
            },
        )
        .map_err(|e| e.to_string())?;
    }
    Ok(tree)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let numeric = matches!(cli.command, Commands::Range { .. });
    let tree = match load_fixture(&cli.fixture, numeric) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Search { key } => match tree.search(key.as_bytes()) {
            Some(pl) => println!("{key}: ids={:?} max_score={}", pl.ids(), pl.max_score()),
            None => println!("{key}: not found"),
        },
        Commands::Prefix { prefix } => {
            tree.iter_prefix(prefix.as_bytes(), |key, pl| {
                println!("{}: ids={:?}", String::from_utf8_lossy(key), pl.ids());
                ControlFlow::Continue(())
            });
        }
        Commands::Fuzzy {
            term,
            min_cost,
            max_cost,
            max_results,
            by_frequency,
            prefix,
        } => {
            let order = if by_frequency { Order::Frequency } else { Order::Score };
            match tree.fuzzy_search(term.as_bytes(), min_cost, max_cost, max_results, order, prefix, &[]) {
                Ok(results) => {
                    for (key, pl) in results {
                        println!("{}: ids={:?} max_score={}", String::from_utf8_lossy(key), pl.ids(), pl.max_score());
                    }
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        Commands::Range { value, comparator } => {
            let Some(comparator) = parse_comparator(&comparator) else {
                eprintln!("error: unknown comparator {comparator:?} (expected one of lt,le,eq,ge,gt)");
                return ExitCode::FAILURE;
            };
            for (key, pl) in tree.int32_search(value, comparator) {
                println!("{}: ids={:?}", String::from_utf8_lossy(key), pl.ids());
            }
        }
    }

    ExitCode::SUCCESS
}
