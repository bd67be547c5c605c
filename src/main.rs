//! rootscan - concurrent multi-root filesystem inventory.
//!
//! Usage:
//!   rootscan scan PATH...      Scan roots and show a summary
//!   rootscan scan --json PATH  Print the scan as a JSON response
//!   rootscan serve             Answer JSON scan requests on stdin, one per line
//!   rootscan --help            Show help

mod serve;
mod wire;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use rootscan_scan::{AggregateResult, ScanConfig, ScanDispatcher};

#[derive(Parser)]
#[command(
    name = "rootscan",
    version,
    about = "Inventory files under one or more roots",
    long_about = "rootscan walks every given root concurrently and reports file \
                  counts, sizes, and any entries it could not read.\n\n\
                  Use `rootscan scan PATH...` for a one-off scan, or `rootscan serve` \
                  to answer JSON requests on stdin."
)]
struct Cli {
    #[command(flatten)]
    options: ScanOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ScanOptions {
    /// Follow symbolic links
    #[arg(short = 'L', long, global = true)]
    follow_symlinks: bool,

    /// Skip hidden files and directories
    #[arg(long, global = true)]
    no_hidden: bool,

    /// Maximum depth below each root
    #[arg(short, long, global = true)]
    depth: Option<u32>,

    /// Entry names to skip (glob, repeatable)
    #[arg(short, long, global = true)]
    ignore: Vec<String>,

    /// Threads per root for directory reads (0 or 1 = serial)
    #[arg(short, long, default_value = "0", global = true)]
    threads: usize,
}

impl ScanOptions {
    fn to_config(&self) -> Result<ScanConfig> {
        ScanConfig::builder()
            .follow_symlinks(self.follow_symlinks)
            .include_hidden(!self.no_hidden)
            .max_depth(self.depth)
            .ignore_patterns(self.ignore.clone())
            .threads(self.threads)
            .build()
            .context("Invalid scan options")
    }
}

#[derive(Subcommand)]
enum Command {
    /// Scan roots and show a summary
    Scan {
        /// Roots to scan (files or directories)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print the JSON response instead of a summary
        #[arg(long)]
        json: bool,

        /// Number of largest files to show
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,
    },

    /// Answer newline-delimited JSON scan requests from stdin
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let config = cli.options.to_config()?;
    let dispatcher = ScanDispatcher::new(&config).context("Invalid scan configuration")?;

    match cli.command {
        Command::Scan { paths, json, top } => {
            let result = dispatcher.scan(&paths).await;
            if json {
                let response = wire::ScanResponse::from(&result);
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_summary(&result, top);
            }
        }
        Command::Serve => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            serve::serve(&dispatcher, stdin, tokio::io::stdout()).await?;
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for responses.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,rootscan=info")),
        )
        .init();
}

/// Print a human-readable scan summary.
fn print_summary(result: &AggregateResult, top_n: usize) {
    let stats = &result.stats;

    println!();
    println!("{}", "─".repeat(60));
    println!(
        " {} root(s) - {}",
        result.folders.len() + result.root_errors().count(),
        format_size(stats.total_size)
    );
    println!(
        " {} files, {} directories, {} error(s)",
        stats.file_count, stats.dir_count, stats.error_count
    );
    println!(" Scanned in {:.2}s", result.scan_duration.as_secs_f64());
    println!("{}", "─".repeat(60));
    println!();

    for folder in &result.folders {
        let ratio = if stats.total_size > 0 {
            folder.size as f64 / stats.total_size as f64
        } else {
            0.0
        };
        println!(
            " {:<40} {:>10} {:>5.1}% {}",
            truncate(&folder.path.display().to_string(), 40),
            format_size(folder.size),
            ratio * 100.0,
            make_bar(ratio, 10)
        );
    }

    if top_n > 0 && !result.files.is_empty() {
        let mut largest: Vec<_> = result.files.iter().collect();
        largest.sort_by(|a, b| b.size.cmp(&a.size));

        println!();
        println!(" Largest files:");
        for file in largest.into_iter().take(top_n) {
            println!(
                "   {:>10}  {}  [{}]",
                format_size(file.size),
                file.path,
                file.root.display()
            );
        }
    }

    if result.has_errors() {
        println!();
        println!(" Errors:");
        for error in &result.errors {
            println!("   {error}");
        }
    }
}

/// Create a simple ASCII bar.
fn make_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to max length.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_bar() {
        assert_eq!(make_bar(0.5, 4), "[██░░]");
        assert_eq!(make_bar(0.0, 2), "[░░]");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_options_to_config() {
        let cli = Cli::parse_from(["rootscan", "scan", "--depth", "2", "-i", "*.tmp", "/a"]);
        let config = cli.options.to_config().unwrap();

        assert_eq!(config.max_depth, Some(2));
        assert_eq!(config.ignore_patterns, vec!["*.tmp".to_string()]);
        assert!(config.include_hidden);
        assert!(matches!(cli.command, Command::Scan { ref paths, .. } if paths.len() == 1));
    }
}
