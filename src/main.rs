use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use experiment_charts::aggregate::aggregate;
use experiment_charts::chart::{self, ChartDescriptor};
use experiment_charts::experiment::{ExperimentKind, WsMetric};
use experiment_charts::loader::read_json;
use experiment_charts::normalize::{
    normalize, normalize_iterations, normalize_work_stealing, SeriesSet,
};
use experiment_charts::style::assign_styles;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "experiment-charts")]
#[command(about = "Generate comparison charts from concurrency benchmark results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plot LL/IC counter throughput results
    Throughput {
        /// Path to the benchmark result JSON
        input: PathBuf,

        /// Number of repeated iterations to average (selects the
        /// multi-iteration input shape)
        #[arg(short, long)]
        iters: Option<usize>,

        /// Output directory for the chart
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Print the normalized series before rendering
        #[arg(short, long, default_value = "false")]
        verbose: bool,
    },

    /// Plot LL/IC counter latency results
    Latency {
        /// Path to the benchmark result JSON
        input: PathBuf,

        /// Number of repeated iterations to average (selects the
        /// multi-iteration input shape)
        #[arg(short, long)]
        iters: Option<usize>,

        /// Output directory for the chart
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Print the normalized series before rendering
        #[arg(short, long, default_value = "false")]
        verbose: bool,
    },

    /// Plot work-stealing queue results
    WorkStealing {
        /// Path to the benchmark result JSON
        input: PathBuf,

        /// Which per-record measurement to plot
        #[arg(short, long, value_enum, default_value_t = MetricArg::Time)]
        metric: MetricArg,

        /// Output directory for the chart
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Print the normalized series before rendering
        #[arg(short, long, default_value = "false")]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    Time,
    Puts,
    Takes,
    Steals,
}

impl From<MetricArg> for WsMetric {
    fn from(metric: MetricArg) -> Self {
        match metric {
            MetricArg::Time => WsMetric::ExecutionTime,
            MetricArg::Puts => WsMetric::Puts,
            MetricArg::Takes => WsMetric::Takes,
            MetricArg::Steals => WsMetric::Steals,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Throughput {
            input,
            iters,
            output,
            verbose,
        } => generate_llic_chart(ExperimentKind::LlicThroughput, &input, iters, &output, verbose),
        Commands::Latency {
            input,
            iters,
            output,
            verbose,
        } => generate_llic_chart(ExperimentKind::LlicLatency, &input, iters, &output, verbose),
        Commands::WorkStealing {
            input,
            metric,
            output,
            verbose,
        } => generate_ws_chart(&input, metric.into(), &output, verbose),
    }
}

fn generate_llic_chart(
    kind: ExperimentKind,
    input: &Path,
    iters: Option<usize>,
    output: &Path,
    verbose: bool,
) -> Result<()> {
    if iters == Some(0) {
        anyhow::bail!("--iters must be at least 1");
    }

    let doc = read_json(input)?;
    let set = match iters {
        Some(n) => {
            let bundle = normalize_iterations(&doc, kind, n)?;
            aggregate(&bundle)?
        }
        None => normalize(&doc, kind)?,
    };

    finish_chart(kind, iters, WsMetric::ExecutionTime, &set, output, verbose)
}

fn generate_ws_chart(input: &Path, metric: WsMetric, output: &Path, verbose: bool) -> Result<()> {
    let doc = read_json(input)?;
    let set = normalize_work_stealing(&doc, metric)?;

    finish_chart(
        ExperimentKind::WorkStealing,
        None,
        metric,
        &set,
        output,
        verbose,
    )
}

fn finish_chart(
    kind: ExperimentKind,
    iters: Option<usize>,
    metric: WsMetric,
    set: &SeriesSet,
    output: &Path,
    verbose: bool,
) -> Result<()> {
    if verbose {
        print_series(set);
    }

    let declared = kind.declared_series();
    let styles = assign_styles(set, declared)?;
    let descriptor = ChartDescriptor::for_kind(kind, iters, metric, set);
    chart::render(set, &styles, declared, &descriptor, output)?;

    Ok(())
}

fn print_series(set: &SeriesSet) {
    println!(
        "Normalized {} series of {} entries each:",
        set.len(),
        set.sequence_len()
    );
    for (key, values) in set.iter() {
        println!("  {}: {:?}", key, values);
    }
    if let Some(graph) = set.graph_type() {
        println!("  graph type: {}", graph);
    }
}
