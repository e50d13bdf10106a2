#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use env_logger::Env;
use log::info;

use rotxor_core::prelude::*;

/// Stream stdin (or a file) through the rotating-key XOR transform.
///
/// The key length is the block size. Running the tool twice with the same
/// key restores the original bytes.
#[derive(Parser, Debug)]
#[command(version, about)]
#[command(group(ArgGroup::new("key_source").required(true).args(["key", "key_hex"])))]
struct Args {
    /// Key file; its entire contents are the key.
    #[arg(short = 'k', long = "key", value_name = "PATH")]
    key: Option<PathBuf>,

    /// Key given as hex digits instead of a file.
    #[arg(long = "key-hex", value_name = "HEX")]
    key_hex: Option<String>,

    /// Worker threads; 0 runs the sequential path.
    #[arg(short = 'n', long = "threads", default_value_t = 0, conflicts_with = "auto_threads")]
    threads: usize,

    /// Pick the worker count from the number of available cores.
    #[arg(long = "auto-threads")]
    auto_threads: bool,

    /// Input file (defaults to stdin).
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output file (defaults to stdout).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print run statistics as JSON on stderr.
    #[arg(long = "stats")]
    stats: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn load_key(&self) -> Result<Key> {
        match (&self.key, &self.key_hex) {
            (Some(path), _) => {
                Key::from_file(path).with_context(|| format!("loading key file {}", path.display()))
            }
            (None, Some(hex)) => Key::from_hex(hex).context("parsing --key-hex"),
            (None, None) => anyhow::bail!("a key source is required (-k or --key-hex)"),
        }
    }

    fn profile(&self) -> ParallelismProfile {
        if self.auto_threads {
            ParallelismProfile::dynamic()
        } else {
            ParallelismProfile::fixed(self.threads)
        }
    }
}

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter(args.verbose)))
        .init();

    let key = args.load_key()?;
    let profile = args.profile();
    info!("key_len={}, workers={}", key.len(), profile.worker_count);

    let input = match &args.input {
        Some(path) => InputSource::File(path.clone()),
        None => InputSource::Stdin,
    };
    let output = match &args.output {
        Some(path) => OutputSink::File(path.clone()),
        None => OutputSink::Stdout,
    };

    let config = ApiConfig::new(Some(false), Some(args.stats));
    let snapshot =
        transform_stream(input, output, &key, profile, config).context("transform failed")?;

    if args.stats {
        eprintln!("{}", snapshot.to_json().context("serializing stats")?);
    }
    Ok(())
}
