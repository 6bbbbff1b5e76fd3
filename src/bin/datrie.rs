//! datrie: CLI tool for building and querying double-array trie files.

use clap::{Parser, Subcommand};
use datrie::{Dictionary, DictionaryFormat, DoubleArray, Lookup};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datrie")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Build and query double-array trie files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a trie file from a TSV or JSON dictionary
    Build {
        /// Input dictionary file
        #[arg(short, long)]
        input: PathBuf,

        /// Output trie file
        #[arg(short, long)]
        output: PathBuf,

        /// Dictionary format (tsv or json); guessed from the extension if omitted
        #[arg(short, long)]
        format: Option<DictionaryFormat>,

        /// Sort entries before building instead of requiring sorted input
        #[arg(short, long)]
        sort: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Look up keys exactly
    Lookup {
        /// Trie file
        #[arg(short, long)]
        trie: PathBuf,

        /// Keys to look up
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// List the keys that are prefixes of a text
    Prefix {
        /// Trie file
        #[arg(short, long)]
        trie: PathBuf,

        /// Maximum number of matches to print
        #[arg(short, long, default_value_t = 10)]
        max: usize,

        /// Text to search
        text: String,
    },

    /// Print size statistics and validate a trie file
    Info {
        /// Trie file
        #[arg(short, long)]
        trie: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            input,
            output,
            format,
            sort,
            verbose,
        } => build_file(&input, &output, format, sort, verbose),
        Commands::Lookup { trie, keys } => lookup_keys(&trie, &keys),
        Commands::Prefix { trie, max, text } => prefix_search(&trie, max, &text),
        Commands::Info { trie } => print_info(&trie),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build_file(
    input: &PathBuf,
    output: &PathBuf,
    format: Option<DictionaryFormat>,
    sort: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = format.unwrap_or_else(|| DictionaryFormat::from_path(input));
    if verbose {
        println!("Reading input file: {:?} ({})", input, format.as_str());
    }

    let dictionary = Dictionary::read(input, format)?;
    let array = dictionary.build(sort)?;

    if verbose {
        println!(
            "Built {} keys into {} units ({} bytes)",
            dictionary.len(),
            array.size(),
            array.total_size()
        );
    }

    array.save(output)?;

    println!("Successfully built {:?} -> {:?}", input, output);
    Ok(())
}

fn lookup_keys(trie: &PathBuf, keys: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let array = DoubleArray::open(trie)?;

    for key in keys {
        match array.lookup(key.as_bytes()) {
            Lookup::Found(value) => println!("{}\t{}", key, value),
            Lookup::PrefixOnly => println!("{}\t(prefix only)", key),
            Lookup::Absent => println!("{}\t(not found)", key),
        }
    }
    Ok(())
}

fn prefix_search(trie: &PathBuf, max: usize, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let array = DoubleArray::open(trie)?;
    let bytes = text.as_bytes();

    let matches = array.common_prefix_search(bytes, max);
    for m in &matches {
        println!(
            "{}\t{}",
            String::from_utf8_lossy(&bytes[..m.length]),
            m.value
        );
    }

    let total = array.count_prefix_matches(bytes);
    if total > matches.len() {
        println!("... {} more", total - matches.len());
    }
    Ok(())
}

fn print_info(trie: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let array = DoubleArray::open(trie)?;

    println!("File:       {:?}", trie);
    println!("Units:      {}", array.size());
    println!("Unit size:  {} bytes", array.unit_size());
    println!("Total size: {} bytes", array.total_size());

    match array.validate() {
        Ok(()) => println!("Structure:  ok"),
        Err(e) => println!("Structure:  {}", e),
    }
    Ok(())
}
