use anyhow::Context;
use clap::Parser;
use perfcalc::application::calculator::PerformanceCalculator;
use perfcalc::config::{EnvConfig, OutputFormat, load_calculator_config};
use perfcalc::infrastructure::{export_results, load_csv, write_results};
use std::path::PathBuf;
use tracing::info;

/// Realized performance of a classification model, per chunk, against reference thresholds.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Calculator configuration (TOML)
    #[arg(short, long)]
    config: PathBuf,

    /// Reference dataset (CSV) used to fit thresholds
    #[arg(short, long)]
    reference: PathBuf,

    /// Analysis dataset (CSV)
    #[arg(short, long)]
    analysis: PathBuf,

    /// Targets for the analysis dataset (CSV), joined on --join-on
    #[arg(short, long)]
    targets: Option<PathBuf>,

    /// Column shared by analysis and targets
    #[arg(long, default_value = "identifier")]
    join_on: String,

    /// Output format (csv or json); defaults to PERFCALC_OUTPUT_FORMAT
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Output file; results go to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let env_config = EnvConfig::from_env()?;

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&env_config.log_filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let config = load_calculator_config(&cli.config, &env_config.default_chunker())?;
    let mut calculator =
        PerformanceCalculator::new(config).context("Invalid calculator configuration")?;
    info!(
        "{} calculator, chunker {:?}",
        calculator.use_case(),
        calculator.chunker()
    );

    let reference = load_csv(&cli.reference)?;
    calculator
        .fit(&reference)
        .context("Failed to fit on reference data")?;

    let mut analysis = load_csv(&cli.analysis)?;
    if let Some(targets_path) = &cli.targets {
        let targets = load_csv(targets_path)?;
        analysis = analysis
            .merge(&targets, &cli.join_on)
            .with_context(|| format!("Failed to join targets on '{}'", cli.join_on))?;
        info!("Joined targets: {} analysis rows", analysis.len());
    }

    let results = calculator
        .calculate(&analysis)
        .context("Failed to calculate performance")?;

    let format = cli.format.unwrap_or(env_config.output_format);
    match &cli.output {
        Some(path) => export_results(&results.data, format, path)?,
        None => write_results(&results.data, format, std::io::stdout().lock())?,
    }
    Ok(())
}
