use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use ledgerscan_ingest::ParsedStatement;
use ledgerscan_report::{CsvWorkbookSink, PeriodAggregator, PeriodSink};
use std::path::PathBuf;

mod config;
mod discover;
mod ocr;
mod pipeline;

use config::{Config, DEFAULT_CONFIG_FILE};
use pipeline::Pipeline;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LEDGERSCAN_BUILD_ID"), ")");

#[derive(Parser, Debug)]
#[command(name = "ledgerscan", version = VERSION, about = "Bank statement OCR text to monthly transaction sheets")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// No log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file (defaults apply when it does not exist)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse statements, group them by month and write one sheet per month
    Run {
        /// Statement files (.pdf or form-feed separated .txt); default: every one in the source dir
        files: Vec<PathBuf>,

        #[arg(long)]
        source_dir: Option<PathBuf>,

        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Parse and aggregate but write nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse one statement and print its transactions
    Parse {
        file: PathBuf,

        /// Print the parsed document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::InitConfig => config::init_config(&cli.config)?,

        Command::Run {
            files,
            source_dir,
            output_dir,
            dry_run,
        } => {
            let mut cfg = config::load_config(&cli.config)?;
            if let Some(dir) = source_dir {
                cfg.paths.source_dir = dir;
            }
            if let Some(dir) = output_dir {
                cfg.paths.output_dir = dir;
            }
            run(&cfg, &files, dry_run).await?;
        }

        Command::Parse { file, json } => {
            let cfg = config::load_config(&cli.config)?;
            parse_one(&cfg, file, json).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn run(cfg: &Config, files: &[PathBuf], dry_run: bool) -> Result<()> {
    let pattern = cfg.period_pattern()?;
    let inputs = discover::resolve_inputs(files, &cfg.paths.source_dir)?;
    let pipeline = Pipeline::new(cfg, &inputs)?;

    println!("Parsing {} statement(s)\n", inputs.len());
    let results = pipeline.parse_all(inputs).await;

    let mut failed = 0;
    let mut aggregator = PeriodAggregator::new(pattern);
    for result in results {
        match result.outcome {
            Ok(parsed) => {
                println!("{}", summary_line(&result.identity, &parsed));
                if let Err(e) = aggregator.add(parsed.document) {
                    println!("  excluded: {e}");
                    failed += 1;
                }
            }
            Err(e) => {
                println!("{}: failed: {e:#}", result.identity);
                failed += 1;
            }
        }
    }

    println!();
    for batch in aggregator.batches() {
        println!(
            "{}: {} transaction(s) from {}",
            batch.key,
            batch.records.len(),
            batch.sources.join(", ")
        );
    }

    if dry_run {
        println!("\nDry run: nothing written");
    } else {
        let mut sink = CsvWorkbookSink::new(&cfg.paths.output_dir);
        for batch in aggregator.batches() {
            let path = sink
                .write_period(batch)
                .with_context(|| format!("writing {}", batch.key))?;
            println!("Wrote {}", path.display());
        }
    }

    if failed > 0 {
        bail!("{failed} document(s) could not be processed");
    }
    Ok(())
}

fn summary_line(identity: &str, parsed: &ParsedStatement) -> String {
    let mut line = format!(
        "{identity}: {} transaction(s) [{}]",
        parsed.document.records.len(),
        parsed.document.format
    );
    let failed_pages = parsed.failed_pages().count();
    if failed_pages > 0 {
        line.push_str(&format!(", {failed_pages} page(s) without a transaction window"));
    }
    let dropped = parsed.dropped_spans();
    if dropped > 0 {
        line.push_str(&format!(", {dropped} transaction(s) unreadable"));
    }
    let ambiguous = parsed.ambiguous_amounts();
    if ambiguous > 0 {
        line.push_str(&format!(", {ambiguous} ambiguous amount(s)"));
    }
    line
}

async fn parse_one(cfg: &Config, file: PathBuf, json: bool) -> Result<()> {
    let inputs = discover::resolve_inputs(std::slice::from_ref(&file), &cfg.paths.source_dir)?;
    let pipeline = Pipeline::new(cfg, &inputs)?;

    let mut results = pipeline.parse_all(inputs).await;
    let result = results.pop().context("no result for document")?;
    let parsed = result
        .outcome
        .with_context(|| format!("parsing {}", result.path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed.document)?);
        return Ok(());
    }

    println!("{}\n", summary_line(&result.identity, &parsed));
    println!(
        "{:<14} {:<20} {:>12}  {}",
        "Date processed", "Date of transaction", "Amount", "Details"
    );
    for r in &parsed.document.records {
        println!(
            "{:<14} {:<20} {:>12}  {}",
            r.date_processed,
            r.date_of_transaction,
            r.amount.value().unwrap_or("-"),
            r.details.trim()
        );
    }
    Ok(())
}
