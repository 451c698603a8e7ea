#![doc = include_str!("../README.md")]
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

#[derive(Subcommand)]
pub enum Command {
    /// Compresses the text file to the container that includes the Huffman tree
    Compress {
        /// File with the text to compress
        input: PathBuf,
        /// Output file (<INPUT>.huf by default)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Whether to store 8 bits per byte instead of one '0' or '1' character per bit
        #[arg(long, default_value_t = false)]
        packed: bool,
    },
    /// Decompresses the container written by compress
    Decompress {
        /// Container file
        input: PathBuf,
        /// Output file (<INPUT> without the .huf extension, or <INPUT>.txt, by default)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Writes the bare stream of '0' and '1' characters and checks that it decodes back to the text
    Raw {
        /// File with the text to compress
        input: PathBuf,
        /// Output file (<INPUT>.bits by default)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Prints the code of each symbol
    Codes {
        /// File with the text to analyse
        input: PathBuf,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None, infer_subcommands=true)]
/// Huffman coding of text files.
pub struct Conf {
    #[command(subcommand)]
    pub command: Command,

    /// Whether to print debug messages
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,
}

fn main() {
    let conf: Conf = Conf::parse();
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var("RUST_LOG").is_err() {
        builder.filter(None, LevelFilter::Info);
    }
    if conf.verbose {
        builder.filter(None, LevelFilter::Debug);
    }
    builder.init();

    let result = match &conf.command {
        Command::Compress { input, output, packed } => commands::compress(input, output.as_deref(), *packed),
        Command::Decompress { input, output } => commands::decompress(input, output.as_deref()),
        Command::Raw { input, output } => commands::raw(input, output.as_deref()),
        Command::Codes { input } => commands::codes(input),
    };
    if let Err(e) = result {
        eprintln!("\x1b[31mError:\x1b[0m {}", e);
        std::process::exit(1);
    }
}
