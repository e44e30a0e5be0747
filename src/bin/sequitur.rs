//! Command-line driver for the grammar engine.
//!
//! Reads a file (or stdin), feeds it to the engine one value at a time and
//! prints the resulting grammar.
//!
//! Usage:
//!   sequitur [PATH] [--delimiter <CHAR>] [--bytes] [--lengths] [--stats]

use anyhow::{bail, Context, Result};
use clap::Parser;
use sequitur_grammar::{Sequitur, SequiturConfig};
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// Infer a hierarchical grammar from the input and print it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file. Reads stdin when omitted.
    path: Option<PathBuf>,

    /// Character that no rule may span (e.g. '\n' to keep rules within lines).
    #[arg(short, long, value_parser = parse_delimiter)]
    delimiter: Option<char>,

    /// Feed raw bytes instead of Unicode characters.
    #[arg(short, long)]
    bytes: bool,

    /// Annotate each rule with the length of its expansion.
    #[arg(short, long)]
    lengths: bool,

    /// Print compression statistics to stderr.
    #[arg(short, long)]
    stats: bool,
}

/// Accepts a single character, or the escapes `\n`, `\t` and `\r`.
fn parse_delimiter(raw: &str) -> Result<char, String> {
    match raw {
        "\\n" => Ok('\n'),
        "\\t" => Ok('\t'),
        "\\r" => Ok('\r'),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("expected a single character, got {raw:?}")),
            }
        }
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = SequiturConfig::new();
    if let Some(delimiter) = args.delimiter {
        if args.bytes && !delimiter.is_ascii() {
            bail!("delimiter {delimiter:?} is not a single byte");
        }
        config = config.with_delimiter(u32::from(delimiter));
    }

    let input = read_input(args.path.as_ref())?;
    log::info!("read {} bytes", input.len());

    let mut seq = Sequitur::with_config(config);
    if args.bytes {
        seq.extend(input.iter().copied().map(u32::from))?;
    } else {
        let text = String::from_utf8(input).context("input is not valid UTF-8 (try --bytes)")?;
        seq.append_str(&text)?;
    }

    let listing = if args.lengths {
        seq.render_with_lengths()
    } else {
        seq.render()
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(listing.as_bytes())
        .context("failed to write grammar")?;

    if args.stats {
        let stats = seq.stats();
        eprintln!("Input length: {}", stats.input_length);
        eprintln!("Symbols in grammar: {}", stats.grammar_symbols);
        eprintln!("Rules: {}", stats.num_rules);
        eprintln!("Compression ratio: {:.2}%", stats.compression_ratio());
    }

    Ok(())
}
