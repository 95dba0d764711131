use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::exit;

mod cost;
mod datagen;
mod indexing;
mod join;
mod lb;
mod matrix;
mod parsing;
mod ted;

use cost::UnitCost;
use join::indexed::IndexedJoin;
use join::naive::NaiveJoin;
use join::JoinResultElement;
use parsing::LabelDict;

/// Tree similarity join utility
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a similarity self-join over a dataset of trees in bracket notation
    Join {
        /// Dataset file of trees in bracket notation, one per line
        #[arg(short, long, value_name = "FILE")]
        dataset_path: PathBuf,
        /// Distance threshold, pairs with a larger edit distance are dropped
        #[arg(short, long)]
        threshold: f64,
        #[arg(short, long, value_enum, default_value_t = Strategy::Indexed)]
        strategy: Strategy,
        /// Write result triples (t1,t2,distance) as CSV
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Generate a random bracket notation dataset for benchmarking
    Generate {
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
        #[arg(long, default_value_t = 1000)]
        trees: usize,
        #[arg(long, default_value_t = 50)]
        max_size: usize,
        #[arg(long, default_value_t = 16)]
        labels: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Strategy {
    /// Degree histogram candidate index with bounded verification
    Indexed,
    /// Unconditional all-pairs verification baseline
    Naive,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Join {
            dataset_path,
            threshold,
            strategy,
            output,
        } => run_join(dataset_path, threshold, strategy, output),
        Command::Generate {
            output,
            trees,
            max_size,
            labels,
            seed,
        } => generate_dataset(output, trees, max_size, labels, seed),
    }
}

fn run_join(
    dataset_path: PathBuf,
    threshold: f64,
    strategy: Strategy,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    if !dataset_path.exists() || !dataset_path.is_file() {
        eprintln!("This file does not exists or is not a valid file!");
        exit(1);
    }
    if threshold < 0.0 {
        eprintln!("Distance threshold must not be negative!");
        exit(1);
    }

    let mut label_dict = LabelDict::new();
    let trees = match parsing::parse_dataset(dataset_path, &mut label_dict) {
        Ok(trees) => trees,
        Err(e) => {
            eprintln!("Got unexpected error: {}", e);
            exit(1);
        }
    };
    println!("Parsed {} trees", trees.len());

    let results = match strategy {
        Strategy::Indexed => {
            let mut join = IndexedJoin::new(UnitCost);
            let results = join.execute_join(&trees, threshold);
            println!("Pre-candidates: {}", join.pre_candidate_count());
            println!("Inverted list lookups: {}", join.il_lookup_count());
            println!("DP subproblems: {}", join.subproblem_count());
            results
        }
        Strategy::Naive => {
            let mut join = NaiveJoin::new(UnitCost);
            let results = join.execute_join(&trees, threshold);
            println!("DP subproblems: {}", join.subproblem_count());
            results
        }
    };
    println!("Result pairs within threshold {threshold}: {}", results.len());

    if let Some(output) = output {
        write_results(&output, &results)?;
        println!("Results written to {}", output.display());
    }

    Ok(())
}

fn write_results(output: &PathBuf, results: &[JoinResultElement]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(output)?;
    for element in results {
        writer.serialize(element)?;
    }
    writer.flush()?;
    Ok(())
}

fn generate_dataset(
    output: PathBuf,
    trees: usize,
    max_size: usize,
    labels: u32,
    seed: u64,
) -> anyhow::Result<()> {
    let collection = datagen::random_collection(trees, max_size, labels, seed);
    let mut writer = BufWriter::new(File::create(&output)?);
    for tree in &collection {
        writeln!(writer, "{tree}")?;
    }
    writer.flush()?;
    println!("Generated {} trees into {}", collection.len(), output.display());
    Ok(())
}
