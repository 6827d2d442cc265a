//! Linkchecker main entry point
//!
//! This is the command-line interface for the linkchecker broken-link crawler.

use anyhow::Context;
use clap::{ArgGroup, CommandFactory, Parser};
use linkchecker::config::{load_config_with_hash, validate, CheckSpeed, CheckerConfig};
use linkchecker::output::{
    print_statistics, render_result, CrawlStatistics, DEFAULT_REFRESH_INTERVAL,
};
use linkchecker::LinkChecker;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Log filter used when RUST_LOG is not set
const DEFAULT_LOG_FILTER: &str = "linkchecker=info,warn";

/// Linkchecker: find broken links on a website
///
/// Linkchecker crawls a site from the given URL, follows every internal link,
/// and reports the status of each link it finds, internal or external.
#[derive(Parser, Debug)]
#[command(name = "linkchecker")]
#[command(version)]
#[command(about = "Find broken links on a website", long_about = None)]
#[command(group(ArgGroup::new("speed").args(["slow", "normal", "fast", "furious", "warp"])))]
struct Cli {
    /// Site to check, with or without a scheme (example.com, https://example.com)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// 1 request per second
    #[arg(long)]
    slow: bool,

    /// 2 requests per second (default)
    #[arg(long)]
    normal: bool,

    /// 10 requests per second
    #[arg(long)]
    fast: bool,

    /// 20 requests per second
    #[arg(long)]
    furious: bool,

    /// 100 requests per second
    #[arg(long)]
    warp: bool,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Explicit request rate per second, overrides the speed preset
    #[arg(long, requires = "burst", conflicts_with = "speed")]
    rate: Option<f64>,

    /// Explicit burst size, used together with --rate
    #[arg(long, requires = "rate")]
    burst: Option<u32>,

    /// Per-request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Capacity of the result buffer
    #[arg(long)]
    buffer_size: Option<usize>,

    /// Print every result, not just the broken ones
    #[arg(short, long)]
    verbose: bool,

    /// Suppress the error log
    #[arg(short, long)]
    silent: bool,

    /// Show a progress indicator while crawling
    #[arg(long)]
    progress: bool,

    /// Write results to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Write the error log to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    error_log: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    /// The speed preset selected on the command line, if any
    fn speed(&self) -> Option<CheckSpeed> {
        [
            (self.slow, CheckSpeed::Slow),
            (self.normal, CheckSpeed::Normal),
            (self.fast, CheckSpeed::Fast),
            (self.furious, CheckSpeed::Furious),
            (self.warp, CheckSpeed::Warp),
        ]
        .into_iter()
        .find_map(|(set, speed)| set.then_some(speed))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(url) = cli.url.clone().filter(|url| url != "help") else {
        eprintln!("{}", Cli::command().render_help());
        return ExitCode::from(1);
    };

    let (config, config_hash) = match build_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(1);
        }
    };

    if let Err(e) = setup_logging(&config) {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }

    if let Some(hash) = config_hash {
        tracing::info!("Configuration loaded successfully (hash: {})", hash);
    }

    match handle_check(&url, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Loads the configuration file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<(CheckerConfig, Option<String>)> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path).with_context(|| {
                format!("Failed to load configuration from {}", path.display())
            })?;
            (config, Some(hash))
        }
        None => (CheckerConfig::default(), None),
    };

    if let Some(speed) = cli.speed() {
        config = config.with_speed(speed);
    }
    if let (Some(rate), Some(burst)) = (cli.rate, cli.burst) {
        config = config.with_rate_limit(rate, burst);
    }
    if let Some(ms) = cli.timeout {
        config = config.with_request_timeout(Duration::from_millis(ms));
    }
    if let Some(size) = cli.buffer_size {
        config = config.with_buffer_size(size);
    }
    if cli.verbose {
        config = config.with_verbose(true);
    }
    if cli.silent {
        config = config.with_silent(true);
    }
    if cli.progress {
        config = config.with_progress(true);
    }
    if let Some(path) = &cli.output {
        config = config.with_results_path(path.display().to_string());
    }
    if let Some(path) = &cli.error_log {
        config = config.with_error_log_path(path.display().to_string());
    }
    config.output.no_color |= cli.no_color;

    validate(&config).context("Invalid configuration")?;
    Ok((config, hash))
}

/// Sets up the logging/tracing subscriber
///
/// Silent mode turns logging off entirely; otherwise RUST_LOG wins over the
/// default filter. The log goes to stderr unless an error log file is set.
fn setup_logging(config: &CheckerConfig) -> anyhow::Result<()> {
    let filter = if config.checker.silent {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match &config.output.error_log_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create error log {}", path))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }

    Ok(())
}

/// Runs the crawl and streams results as they arrive
async fn handle_check(url: &str, config: CheckerConfig) -> anyhow::Result<()> {
    let start = Instant::now();
    let verbose = config.checker.verbose;

    let (mut out, color): (Box<dyn Write>, bool) = match &config.output.results_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create results file {}", path))?;
            (Box::new(BufWriter::new(file)), false)
        }
        None => {
            let stdout = io::stdout();
            let color = !config.output.no_color && stdout.is_terminal();
            (Box::new(stdout.lock()), color)
        }
    };

    let show_progress = config.checker.progress;
    let mut checker = LinkChecker::new(config).context("Failed to set up the link checker")?;
    let mut results = checker
        .results()
        .context("Result stream was already taken")?;
    let refresher = show_progress.then(|| checker.progress().spawn_refresher(DEFAULT_REFRESH_INTERVAL));

    let seed = url.to_string();
    let crawl = tokio::spawn(async move { checker.check(&seed).await });

    let mut stats = CrawlStatistics::new();
    while let Some(result) = results.recv().await {
        stats.record(&result);
        if verbose || !result.is_up() {
            writeln!(out, "{}\n", render_result(&result, color))
                .context("Failed to write result")?;
        }
    }

    crawl.await.context("Crawl task failed")??;

    if let Some(refresher) = refresher {
        refresher.finish().await;
    }

    print_statistics(&stats, &mut out).context("Failed to write statistics")?;
    writeln!(out, "linkchecker completed in {:?}", start.elapsed())
        .context("Failed to write results")?;
    out.flush().context("Failed to flush results")?;

    Ok(())
}
