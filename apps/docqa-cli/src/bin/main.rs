use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docqa_cli::vector_source;
use docqa_core::config::Config;
use docqa_core::snapshot::Snapshot;
use docqa_core::types::{RankedResult, ScoreDetail};
use docqa_hybrid::HybridRetriever;

#[derive(Parser, Debug)]
#[command(author, version, about = "Hybrid lexical + vector search over a chunk snapshot", long_about = None)]
struct Cli {
    /// JSONL snapshot; defaults to `data.snapshot` from the config files.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Vector weight in [0, 1], overriding `retriever.alpha`.
    #[arg(long, global = true)]
    alpha: Option<f64>,

    /// Config environment (`config.<env>.toml`); defaults to `RUST_ENV`.
    #[arg(long, global = true)]
    config_env: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Top-k chunks by fused score.
    Search {
        query: String,
        #[arg(short)]
        k: Option<usize>,
    },
    /// Best chunks of every source.
    Diverse {
        query: String,
        #[arg(long)]
        per_source: Option<usize>,
    },
    /// Top-k chunks with previews and per-signal scores.
    Explain {
        query: String,
        #[arg(short)]
        k: Option<usize>,
    },
    /// Compare rankings across several weights.
    Sweep {
        query: String,
        #[arg(short)]
        k: Option<usize>,
        #[arg(long, value_delimiter = ',', default_value = "0.3,0.5,0.7")]
        alphas: Vec<f64>,
    },
    /// Search restricted to a configured source group.
    Group {
        name: String,
        query: String,
        #[arg(short)]
        k: Option<usize>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(std::io::stderr)).init();
}

fn build_retriever(cli: &Cli, config: &Config) -> anyhow::Result<HybridRetriever> {
    let snapshot_path = match &cli.snapshot {
        Some(path) => path.clone(),
        None => match config.snapshot_path()? {
            Some(path) => path,
            None => bail!("no snapshot given; pass --snapshot or set data.snapshot"),
        },
    };
    let snapshot = load_snapshot(&snapshot_path)?;
    let vector = vector_source(&snapshot, &config.vector()?)?;

    let mut retriever_config = config.retriever()?;
    if let Some(alpha) = cli.alpha { retriever_config.alpha = alpha; }
    Ok(HybridRetriever::new(snapshot.corpus, Arc::new(vector), retriever_config)?)
}

fn load_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    Snapshot::load(path).with_context(|| format!("loading snapshot {}", path.display()))
}

fn print_results(results: &[RankedResult]) {
    if results.is_empty() { println!("  (no results)"); }
    for (i, r) in results.iter().enumerate() {
        let degraded = if r.degraded { "  [lexical only]" } else { "" };
        println!(
            "  {:>2}. fused={:.4}  lexical={:.4}  vector={:.4}  id={}  source={}{}",
            i + 1,
            r.fused_score,
            r.lexical_component,
            r.vector_component,
            r.chunk.chunk_id,
            r.chunk.source_id,
            degraded
        );
    }
}

fn print_details(details: &[ScoreDetail]) {
    for (i, d) in details.iter().enumerate() {
        println!("\n  {}. {} ({})", i + 1, d.chunk_id, d.source_id);
        println!("     fused={:.4}  lexical={:.4}  vector={:.4}", d.fused_score, d.lexical_score, d.vector_score);
        println!("     {}", d.preview);
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let env_name = cli.config_env.clone().unwrap_or_else(|| env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string()));
    let config = Config::load_from(Path::new("."), &env_name)?;
    let retriever = build_retriever(&cli, &config)?;
    let top_k = retriever.config().top_k;

    match &cli.command {
        Command::Search { query, k } => {
            println!("Query: {query}  (alpha={})", retriever.alpha());
            print_results(&retriever.search(query, k.unwrap_or(top_k))?);
        }
        Command::Diverse { query, per_source } => {
            let per_source = per_source.unwrap_or(retriever.config().k_per_source);
            println!("Query: {query}  (alpha={}, per source={per_source})", retriever.alpha());
            print_results(&retriever.search_diverse(query, per_source)?);
        }
        Command::Explain { query, k } => {
            println!("Query: {query}  (alpha={})", retriever.alpha());
            print_details(&retriever.explain(query, k.unwrap_or(top_k))?);
        }
        Command::Sweep { query, k, alphas } => {
            println!("Query: {query}");
            for (alpha, results) in retriever.sweep(query, k.unwrap_or(top_k), alphas)? {
                println!("\nalpha={alpha:.2}");
                print_results(&results);
            }
        }
        Command::Group { name, query, k } => {
            println!("Query: {query}  (group={name}, alpha={})", retriever.alpha());
            print_results(&retriever.search_in_group(query, k.unwrap_or(top_k), name)?);
        }
    }
    Ok(())
}
