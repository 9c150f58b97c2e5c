use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use sentiscope::analysis::{AnalysisPipeline, RunObserver};
use sentiscope::input::collect_units;
use sentiscope::models::{AnalysisRun, RunStats, RunSummary};
use sentiscope::report::{render, OutputFormat};
use sentiscope::{Config, OpenAiClassifier, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "sentiscope")]
#[command(version = "0.1.0")]
#[command(about = "Classify the sentiment of each line of text with an LLM")]
struct Args {
    /// Text to analyze, one item per line
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,

    /// File to analyze (.txt lines or .csv first column)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output format (text, markdown, json, csv)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model to use instead of OPENAI_MODEL
    #[arg(long)]
    model: Option<String>,

    /// Do not collect keywords
    #[arg(long)]
    no_keywords: bool,

    /// Do not collect explanations
    #[arg(long)]
    no_explanations: bool,

    /// Maximum requests in flight (results stay in input order)
    #[arg(long)]
    concurrency: Option<usize>,
}

struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new(total: usize) -> anyhow::Result<Self> {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} texts {msg}")?
                .progress_chars("#>-"),
        );
        Ok(Self { bar })
    }
}

impl RunObserver for ProgressObserver {
    fn on_progress(&self, run: &AnalysisRun, stats: &RunStats) {
        self.bar.set_position(run.len() as u64);
        self.bar.set_message(format!(
            "+{} ={} -{} !{}",
            stats.counts.positive, stats.counts.neutral, stats.counts.negative, stats.counts.errors
        ));
    }

    fn on_complete(&self, _run: &AnalysisRun, summary: &RunSummary) {
        if summary.cancelled {
            self.bar.abandon_with_message("cancelled");
        } else {
            self.bar.finish_with_message("done");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("sentiscope=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Validate input before touching configuration or the network
    let units = match collect_units(args.text.as_deref(), args.file.as_deref()) {
        Ok(units) => units,
        Err(e) if e.is_input_error() => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    let mut config = Config::from_env()?;
    if let Some(model) = args.model.clone() {
        config.model = model;
    }
    if args.no_keywords {
        config.include_keywords = false;
    }
    if args.no_explanations {
        config.include_explanations = false;
    }
    if let Some(limit) = args.concurrency {
        config.concurrency_limit = limit.max(1);
    }

    let classifier = OpenAiClassifier::new(config.openai_api_key.clone(), config.client_settings())?;

    let pipeline = AnalysisPipeline::new(classifier, PipelineConfig::from(&config));

    // First Ctrl-C stops after the current text, a second one exits immediately
    let on_interrupt = pipeline.cancellation().clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if on_interrupt.is_cancelled() {
                tracing::warn!("Second interrupt, exiting");
                std::process::exit(130);
            }
            tracing::warn!("Interrupt received, finishing the current text (press Ctrl-C again to exit)");
            on_interrupt.cancel();
        }
    });

    let observer = ProgressObserver::new(units.len())?;
    let completed = pipeline.run_analysis(units, &observer).await?;

    let output = render(args.format, &completed.run, &completed.summary)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path.display());
    } else {
        println!("{}", output);
    }

    Ok(())
}
