//! joincrawl command line
//!
//! Runs a crawl definition against a JSON-described in-memory source.

mod error;

#[cfg(test)]
mod tests;

use crate::error::{CliError, Result, read_file};
use clap::{Parser, Subcommand};
use joincrawl_core::{
    config::CrawlConfig,
    crawl::{CrawlOptions, CrawlStats, Crawler, RowControl, probe},
    model::QueryNode,
    row::Row,
    source::{ConnectionConfig, QuerySource, memory::MemoryFixture},
};
use std::{
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Crawl nested query trees.
#[derive(Debug, Parser)]
#[command(name = "joincrawl", author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Connect and list the columns each query returns
    Probe(SourceArgs),

    /// Run the configured query tree and print every row as JSON
    Crawl {
        #[command(flatten)]
        source: SourceArgs,

        /// Stop reading once this many rows were delivered
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        limit: Option<u64>,

        /// Fail when the tree is deeper than this
        #[arg(long)]
        max_depth: Option<usize>,
    },
}

#[derive(Debug, clap::Args)]
struct SourceArgs {
    /// Crawl definition (endpoint, login, keyspace, buffer size, query tree)
    #[arg(short, long, env = "JOINCRAWL_CONFIG")]
    config: PathBuf,

    /// Statements served by the in-memory source
    #[arg(short, long, env = "JOINCRAWL_FIXTURE")]
    fixture: PathBuf,
}

impl SourceArgs {
    fn load(&self) -> Result<(CrawlConfig, MemoryFixture)> {
        let config = CrawlConfig::from_json(&read_file(&self.config)?)?;
        let fixture = MemoryFixture::from_json(&read_file(&self.fixture)?)?;
        debug!(
            config = %self.config.display(),
            statements = fixture.statements.len(),
            "loaded crawl definition"
        );

        Ok((config, fixture))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Probe(args) => run_probe(&args),
        Commands::Crawl {
            source,
            limit,
            max_depth,
        } => run_crawl(&source, limit, max_depth),
    }
}

fn run_probe(args: &SourceArgs) -> Result<()> {
    let (config, fixture) = args.load()?;
    let source = fixture.into_source()?;
    let options = config.options()?;

    let summary = probe(
        &source,
        &config.connection(),
        config.query.as_ref(),
        options.fetch_size,
    )?;
    println!("{summary}");

    Ok(())
}

fn run_crawl(args: &SourceArgs, limit: Option<u64>, max_depth: Option<usize>) -> Result<()> {
    let (config, fixture) = args.load()?;
    let root = config
        .query
        .as_ref()
        .ok_or_else(|| CliError::NoQuery(args.config.clone()))?;
    let source = fixture.into_source()?;

    let mut options = config.options()?;
    if let Some(depth) = max_depth {
        options = options.max_depth(depth);
    }

    let mut out = BufWriter::new(std::io::stdout().lock());
    let stats = write_crawl(
        &source,
        &config.connection(),
        root,
        options,
        limit,
        &mut out,
    )?;

    eprintln!(
        "{}: {} queries, {} rows, {} early stops, depth {}",
        config.name.as_deref().unwrap_or("crawl"),
        stats.queries,
        stats.rows,
        stats.early_stops,
        stats.deepest,
    );

    Ok(())
}

/// Crawl `root` and write every delivered row to `out` as one JSON line.
fn write_crawl<Q: QuerySource>(
    source: &Q,
    connection: &ConnectionConfig,
    root: &QueryNode,
    options: CrawlOptions,
    limit: Option<u64>,
    out: &mut impl Write,
) -> Result<CrawlStats> {
    let mut delivered = 0u64;
    let mut failure: Option<CliError> = None;

    let mut handler = |row: &Row| {
        delivered += 1;
        if let Err(err) = write_row(&mut *out, row) {
            failure.get_or_insert(err);
            return RowControl::Stop;
        }

        limit_verdict(delivered, limit)
    };

    let stats = Crawler::new(source, connection)
        .options(options)
        .run(root, &mut handler, None)?;

    if let Some(err) = failure {
        return Err(err);
    }
    out.flush()?;

    if let Some(limit) = limit
        && delivered >= limit
    {
        warn!(limit, delivered, "row limit reached; crawl stopped early");
    }

    Ok(stats)
}

/// The row that reaches `limit` stops its own query; rows already in
/// flight in enclosing queries still arrive and stop theirs in turn.
const fn limit_verdict(delivered: u64, limit: Option<u64>) -> RowControl {
    match limit {
        Some(limit) if delivered >= limit => RowControl::Stop,
        _ => RowControl::Continue,
    }
}

fn write_row(out: &mut impl Write, row: &Row) -> Result<()> {
    serde_json::to_writer(&mut *out, row)?;
    writeln!(out)?;

    Ok(())
}
