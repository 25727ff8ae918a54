//! Demo application hitting counters and showing the result.
//!
//! Run with:
//! ```bash
//! cargo run --example demo --features demo -- --help
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use clap::{Parser, ValueEnum};
use hitcounter::config::HitCounterConfig;
use hitcounter::function::{HitCounter, DEFAULT_PERSISTENCE_PATH};
use hitcounter::observers::table::{TableObserver, TableStyle};
use tracing_subscriber::EnvFilter;

/// Output format.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Rendered markup for the last hit
    Html,
    /// Table of every key in the snapshot
    Table,
    /// Compact table with multiple columns
    Compact,
}

/// Table style selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StyleChoice {
    Ascii,
    #[default]
    Rounded,
    Sharp,
    Markdown,
}

impl From<StyleChoice> for TableStyle {
    fn from(choice: StyleChoice) -> Self {
        match choice {
            StyleChoice::Ascii => TableStyle::Ascii,
            StyleChoice::Rounded => TableStyle::Rounded,
            StyleChoice::Sharp => TableStyle::Sharp,
            StyleChoice::Markdown => TableStyle::Markdown,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "demo")]
#[command(about = "Hit a persisted counter and show the result", long_about = None)]
struct Args {
    /// Key to hit
    #[arg(default_value = "index")]
    key: String,

    /// Snapshot file
    #[arg(short, long, default_value = DEFAULT_PERSISTENCE_PATH)]
    path: PathBuf,

    /// Configuration block file (`hitCounter { ... }`)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "html")]
    format: OutputFormat,

    /// Table style
    #[arg(short, long, value_enum, default_value = "rounded")]
    style: StyleChoice,

    /// Hit the key from N threads concurrently
    #[arg(long, default_value = "1")]
    threads: usize,

    /// Number of hits per thread
    #[arg(long, default_value = "1")]
    hits: usize,

    /// Number of columns in compact mode
    #[arg(long, default_value = "3")]
    columns: usize,
}

fn load_config(args: &Args) -> Result<HitCounterConfig, Box<dyn std::error::Error>> {
    match args.config {
        Some(ref path) => Ok(std::fs::read_to_string(path)?.parse()?),
        None => Ok(HitCounterConfig::default()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let counter = HitCounter::provision_at(config, &args.path);

    let handles: Vec<_> = (0..args.threads.max(1))
        .map(|_| {
            let counter = counter.clone();
            let key = args.key.clone();
            let hits = args.hits;
            thread::spawn(move || (0..hits).map(|_| counter.hit(&key)).last())
        })
        .collect();

    let mut last = None;
    for handle in handles {
        match handle.join() {
            Ok(Some(Err(e))) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            Ok(Some(Ok(html))) => last = Some(html),
            Ok(None) => {}
            Err(_) => return ExitCode::FAILURE,
        }
    }

    let output = match args.format {
        OutputFormat::Html => last.unwrap_or_else(|| counter.render(0)),
        OutputFormat::Table => TableObserver::new()
            .with_style(args.style.into())
            .render_store(counter.store()),
        OutputFormat::Compact => TableObserver::new()
            .compact(true)
            .columns(args.columns)
            .with_style(args.style.into())
            .render_store(counter.store()),
    };
    println!("{}", output);

    ExitCode::SUCCESS
}
