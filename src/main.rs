use anyhow::Result;
use clap::Parser;
use docx_comments::utils::batch_processor::{parse_path_list, BatchProcessor, BatchReport};
use docx_comments::utils::worker::spawn_batch;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "docx-comments")]
#[command(about = "Extract reviewer comments from Word documents into an Excel workbook")]
#[command(version)]
struct Cli {
    /// Word documents (.docx) to scan
    inputs: Vec<PathBuf>,

    /// File with one document path per line (blank lines are ignored)
    #[arg(long, value_name = "FILE")]
    list: Option<PathBuf>,

    /// Excel workbook (.xlsx) to write
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Also print the extracted rows as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn all_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut inputs = self.inputs.clone();
        if let Some(list) = &self.list {
            let text = std::fs::read_to_string(list)
                .map_err(|e| anyhow::anyhow!("Failed to read input list {}: {}", list.display(), e))?;
            inputs.extend(parse_path_list(&text));
        }
        Ok(inputs)
    }
}

fn create_progress_bar(total: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{msg} [{bar:30.cyan/dim}] {pos}/{len} ({percent}%)")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━─");
    pb.set_style(style);
    pb.set_message("Extracting comments");
    pb
}

fn print_outcome(report: &BatchReport) {
    if report.saved {
        println!("✅ Comments extracted and saved to {}", report.output.display());
    }
    if let Some(message) = report.error_report() {
        eprintln!("⚠️  {}", message);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let inputs = cli.all_inputs()?;

    let pb = create_progress_bar(inputs.len() as u64, cli.quiet);
    let handle = spawn_batch(BatchProcessor::new(), inputs, cli.output.clone());

    // Poll the worker; only progress and the final report come back.
    let mut ticker = tokio::time::interval(Duration::from_millis(80));
    while !handle.is_finished() {
        ticker.tick().await;
        pb.set_position(handle.progress().completed as u64);
    }
    pb.finish_and_clear();

    let report = match handle.join().await? {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.rows)?);
    }
    print_outcome(&report);

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
