#![forbid(unsafe_code)]
//! # corpus_compare CLI
//!
//! Command-line interface for the `corpus_compare` crate. It compares word
//! frequencies between two document-term files and writes a CSV report with a
//! Wilcoxon rank-sum test for every word.
//!
//! ## Example
//! ```bash
//! corpus_compare compare c1_bags.txt c2_bags.txt --out results --threshold 5
//! corpus_compare test --out results --results results/rerun.csv
//! ```
//!
//! See `--help` for all available options.

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use corpus_compare::{
    CompareOptions, JsonLinesReporter, LogReporter, Normalization, Reporter, WorkspacePaths,
    prepare_comparison, run_significance_test, sample_documents, select_documents,
};
use env_logger::Env;
use log::error;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// How progress and summary events are rendered
    #[arg(long, global = true, default_value = "log")]
    events: EventFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum EventFormat {
    /// Log lines on stderr (level controlled by RUST_LOG)
    Log,
    /// One JSON object per event on stdout
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Build, filter and save the frequency tables and the vocabulary list
    Prepare(PrepareArgs),
    /// Run the rank-sum test on previously saved tables
    Test(TestArgs),
    /// `prepare` followed by `test`
    Compare {
        #[command(flatten)]
        prepare: PrepareArgs,

        /// Results CSV (default: <out>/results.csv)
        #[arg(long)]
        results: Option<PathBuf>,
    },
    /// Copy listed or randomly chosen documents into a new document-term file
    Select(SelectArgs),
}

#[derive(Args)]
struct PrepareArgs {
    /// Document-term file of the first corpus
    c1: PathBuf,

    /// Document-term file of the second corpus
    c2: PathBuf,

    /// Directory for the saved tables, vocabulary and results
    #[arg(long)]
    out: PathBuf,

    /// Keep only words occurring at least this many times in a corpus
    #[arg(long)]
    threshold: Option<u64>,

    /// Denominator of relative frequencies
    #[arg(long, value_enum, default_value_t = Normalization::Cumulative)]
    normalize: Normalization,
}

impl PrepareArgs {
    fn options(&self) -> CompareOptions {
        CompareOptions {
            threshold: self.threshold,
            normalization: self.normalize,
        }
    }
}

#[derive(Args)]
struct TestArgs {
    /// Directory holding the saved tables and vocabulary
    #[arg(long)]
    out: PathBuf,

    /// Results CSV (default: <out>/results.csv)
    #[arg(long)]
    results: Option<PathBuf>,
}

#[derive(Args)]
#[command(group(ArgGroup::new("selection").required(true).args(["list", "sample"])))]
struct SelectArgs {
    /// Full document-term file
    docterms: PathBuf,

    /// Where to write the selected documents
    output: PathBuf,

    /// Keep the filenames in this file, one per line
    #[arg(long)]
    list: Option<PathBuf>,

    /// Keep this many documents chosen at random
    #[arg(long)]
    sample: Option<usize>,

    /// Seed for `--sample`, for a reproducible selection
    #[arg(long, requires = "sample")]
    seed: Option<u64>,
}

fn select(args: &SelectArgs, reporter: &mut dyn Reporter) -> corpus_compare::Result<usize> {
    match (&args.list, args.sample) {
        (Some(list), _) => select_documents(list, &args.docterms, &args.output, reporter),
        (None, Some(count)) => {
            let mut rng = match args.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            sample_documents(&args.docterms, count, &args.output, &mut rng, reporter)
        }
        (None, None) => unreachable!("clap requires --list or --sample"),
    }
}

fn workspace(out: &Path, results: Option<PathBuf>) -> WorkspacePaths {
    let paths = WorkspacePaths::in_dir(out);
    match results {
        Some(r) => paths.with_results(r),
        None => paths,
    }
}

fn run(command: Command, reporter: &mut dyn Reporter) -> corpus_compare::Result<()> {
    match command {
        Command::Prepare(args) => {
            let paths = workspace(&args.out, None);
            prepare_comparison(&args.c1, &args.c2, &paths, &args.options(), reporter)?;
        }
        Command::Test(args) => {
            let paths = workspace(&args.out, args.results);
            run_significance_test(&paths, reporter)?;
        }
        Command::Compare { prepare, results } => {
            let paths = workspace(&prepare.out, results);
            prepare_comparison(&prepare.c1, &prepare.c2, &paths, &prepare.options(), reporter)?;
            run_significance_test(&paths, reporter)?;
        }
        Command::Select(args) => {
            select(&args, reporter)?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut reporter: Box<dyn Reporter> = match cli.events {
        EventFormat::Log => Box::new(LogReporter),
        EventFormat::Json => Box::new(JsonLinesReporter::new(io::stdout())),
    };

    if let Err(e) = run(cli.command, reporter.as_mut()) {
        error!("Error: {}", e);
        process::exit(1);
    }
}
