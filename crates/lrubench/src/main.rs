//! lrubench - timing comparison and demo driver for lrucache

mod bench;
mod demo;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time inserts and lookups against std containers
    Bench {
        /// Number of keys to insert and look up
        #[arg(short, long, default_value_t = 10000)]
        elements: usize,

        /// LRU cache capacity (number of items)
        #[arg(short, long, default_value_t = 10000)]
        capacity: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Walk through eviction and shared use of a small cache
    Demo {
        /// Cache capacity (number of items)
        #[arg(short, long, default_value_t = 3)]
        capacity: usize,

        /// Threads sharing one locked cache
        #[arg(short, long, default_value_t = 4)]
        threads: usize,

        /// Operations per thread
        #[arg(long, default_value_t = 10000)]
        ops: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("lrubench v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Bench {
            elements,
            capacity,
            json,
        } => {
            info!("Benchmarking {} elements, cache capacity {}", elements, capacity);
            let report = bench::run(elements, capacity)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }
        }
        Command::Demo {
            capacity,
            threads,
            ops,
        } => {
            demo::eviction(capacity)?;
            demo::shared(capacity, threads, ops)?;
        }
    }

    Ok(())
}
