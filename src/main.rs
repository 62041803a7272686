//! PDF Breaker - recover numeric passwords of protected PDF documents
//!
//! Usage: pdf-breaker -f <file> -l <length> -t <seconds>

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_breaker::{
    Breaker, CancelToken, Cracked, SearchConfig, SearchObserver, SearchProgress,
    SearchReport, Strategy,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pdf-breaker")]
#[command(version)]
#[command(about = "Recover the numeric password of a protected PDF", long_about = None)]
struct Args {
    /// Path to the protected PDF
    #[arg(short = 'f', long = "file", value_name = "PDF")]
    file: PathBuf,

    /// Exact password length to try (default: 6, or PDF_BREAKER_LENGTH)
    #[arg(short = 'l', long = "length")]
    length: Option<usize>,

    /// Give up after this many seconds, 0 for no limit (default: 60, or PDF_BREAKER_TIMEOUT_SECS)
    #[arg(short = 't', long = "timeout", value_name = "SECS")]
    timeout: Option<u64>,

    /// Candidate generation strategy: recursive or iterative
    #[arg(short = 's', long = "strategy")]
    strategy: Option<Strategy>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Renders search progress as a terminal progress bar
struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new(hidden: bool) -> Self {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} {percent:>3}% [{wide_bar:.cyan/blue}] {pos}/{len} ({per_sec}, {eta} remaining)",
        ) {
            bar.set_style(style);
        }
        Self { bar }
    }
}

impl SearchObserver for ProgressObserver {
    fn on_start(&self, _config: &SearchConfig, search_space: u64) {
        self.bar.set_length(search_space);
        self.bar.enable_steady_tick(Duration::from_millis(120));
    }

    fn on_progress(&self, progress: &SearchProgress) {
        self.bar.set_position(progress.attempts);
    }

    fn on_finish(&self, _report: &SearchReport) {
        self.bar.finish_and_clear();
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    password: String,
    access: Option<Vec<&'static str>>,
    report: &'a SearchReport,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = pdf_breaker::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    match run(&args).await {
        Ok(cracked) => {
            if let Err(e) = print_cracked(&cracked, args.json) {
                eprintln!("{}", e.user_message());
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(if e.is_no_password_found() { 2 } else { 1 });
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "pdf_breaker=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge environment defaults with command line flags
fn build_config(args: &Args) -> pdf_breaker::Result<SearchConfig> {
    let mut config = SearchConfig::from_env()?;
    if let Some(length) = args.length {
        config.length = length;
    }
    if let Some(secs) = args.timeout {
        config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    config.validate()?;
    Ok(config)
}

async fn run(args: &Args) -> pdf_breaker::Result<Cracked> {
    let config = build_config(args)?;

    if !args.json {
        println!("🔐 PDF Breaker v{}", pdf_breaker::VERSION);
        println!("═══════════════════════════");
        println!("File: {}", args.file.display());
        println!("Length: {}", config.length);
        println!("Strategy: {}", config.strategy);
        match config.timeout {
            Some(timeout) => println!("Timeout: {}s", timeout.as_secs()),
            None => println!("Timeout: none"),
        }
        println!();
    }

    let observer = Arc::new(ProgressObserver::new(args.json));
    let breaker = Breaker::open_pdf(&args.file)?.with_observer(observer);

    let token = CancelToken::new();
    if let Err(e) = install_interrupt(&token) {
        tracing::warn!(error = %e, "Ctrl-C will not stop the search gracefully");
    }

    breaker.brute_force_with(&config, token).await
}

fn install_interrupt(token: &CancelToken) -> anyhow::Result<()> {
    let token = token.clone();
    ctrlc::set_handler(move || {
        token.cancel();
    })
    .context("Failed to install Ctrl-C handler")
}

fn print_cracked(cracked: &Cracked, json: bool) -> pdf_breaker::Result<()> {
    if json {
        let output = JsonOutput {
            password: cracked.password_str(),
            access: cracked.access.map(|rights| rights.granted()),
            report: &cracked.report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let report = &cracked.report;
    println!("✓ PASSWORD CRACKED, Pass is: {}", cracked.password_str());
    match &cracked.access {
        Some(rights) => println!("  Access rights: {}", rights),
        None => println!("  Access rights: unavailable"),
    }
    println!("\nStatistics:");
    println!("  Attempts: {}/{}", report.attempts, report.search_space);
    println!("  Duration: {:.2}s", report.elapsed().as_secs_f64());
    println!("  Speed: {:.0} passwords/second", report.candidates_per_second);
    if report.oracle_errors > 0 {
        println!("  Validation errors: {}", report.oracle_errors);
    }

    Ok(())
}

