//! docsearch CLI - keyword search across spreadsheet workbooks
//!
//! Searches every workbook under a directory and writes the sheet inventory,
//! with per-keyword counts, to a CSV file.

use clap::Parser;
use colored::*;
use docsearch::progress::COMPLETED;
use docsearch::{load_keywords, Config, Error, NoProgress, ProgressSink, SearchAdapter};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

/// Keyword search across the cells and drawing shapes of spreadsheets
#[derive(Parser)]
#[command(
    name = "docsearch",
    author = "iyulab",
    version,
    about = "Search spreadsheet workbooks for keywords",
    long_about = "docsearch - Keyword search across spreadsheet workbooks.\n\n\
                  Lists the sheets of every .xls, .xlsx and .xlsm file under TARGET_PATH \
                  and counts the cells and shapes containing each keyword."
)]
struct Cli {
    /// Directory (or single workbook) to search
    target_path: PathBuf,

    /// Directory to write results to (default: output_path setting)
    #[arg(long = "output_path")]
    output_path: Option<PathBuf>,

    /// Keyword list file, one keyword per line (default: keyword_path setting)
    #[arg(long = "keyword_list")]
    keyword_list: Option<PathBuf>,

    /// Settings file (default: settings.yaml)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Do not search text in drawing shapes
    #[arg(long = "no_shapes")]
    no_shapes: bool,

    /// Do not display progress bars
    #[arg(long = "no_progress")]
    no_progress: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(cli.settings.as_deref())?;
    init_tracing(&config);

    if !cli.target_path.exists() {
        return Err(Error::TargetNotFound(cli.target_path).into());
    }

    let output_dir = cli.output_path.unwrap_or_else(|| config.output_dir());
    let keyword_file = cli.keyword_list.unwrap_or_else(|| config.keyword_file());
    let show_progress = config.progress_display && !cli.no_progress;
    let search_shapes = config.shape_search && !cli.no_shapes;

    fs::create_dir_all(&output_dir)?;
    let keywords = load_keywords(&keyword_file)?;

    let progress_factory = move || -> Box<dyn ProgressSink> {
        if show_progress {
            Box::new(BarProgress::new())
        } else {
            Box::new(NoProgress)
        }
    };
    let mut adapter = SearchAdapter::from_names(&config.doc_types, &progress_factory)?;

    if !adapter.search(&cli.target_path, Some(&keywords), search_shapes) {
        println!("{} No documents found", "!".yellow().bold());
        return Ok(());
    }

    if adapter.save_results(&output_dir)? {
        println!(
            "{} Results saved to {}",
            "✓".green().bold(),
            output_dir.display()
        );
    } else {
        println!("{} No documents found", "!".yellow().bold());
    }
    Ok(())
}

fn init_tracing(config: &Config) {
    let default_level = config.log_level.trim();
    let default_level = if default_level.is_empty() {
        "warn".to_string()
    } else {
        default_level.to_lowercase()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// One progress bar per task, replaced when the task label changes.
struct BarProgress {
    current: RefCell<Option<(String, ProgressBar)>>,
}

impl BarProgress {
    fn new() -> Self {
        Self {
            current: RefCell::new(None),
        }
    }

    fn create_bar(task: &str) -> ProgressBar {
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos:>3}% | {prefix} : {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#-"),
        );
        pb.set_prefix(task.to_string());
        pb
    }
}

impl ProgressSink for BarProgress {
    fn report(&self, percent: u8, task: &str, status: &str) {
        let mut current = self.current.borrow_mut();
        let same_task = matches!(current.as_ref(), Some((label, _)) if label == task);
        if !same_task {
            if let Some((_, bar)) = current.take() {
                bar.finish();
            }
            *current = Some((task.to_string(), Self::create_bar(task)));
        }

        if let Some((_, bar)) = current.as_ref() {
            bar.set_position(u64::from(percent));
            bar.set_message(status.to_string());
            if percent >= 100 && status == COMPLETED {
                bar.finish();
            }
        }
    }
}

impl Drop for BarProgress {
    fn drop(&mut self) {
        if let Some((_, bar)) = self.current.get_mut().take() {
            if !bar.is_finished() {
                bar.abandon();
            }
        }
    }
}
