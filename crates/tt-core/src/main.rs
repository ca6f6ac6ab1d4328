//! tt-core: Threshold Tuner command-line interface.
//!
//! Evaluates diagnostic metrics for a scored CSV and tunes decision
//! thresholds under false-negative bounds.

use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tt_common::{Error, OutputFormat, Result};
use tt_config::{resolve_config, ResolvedConfig, SearchStrategy};
use tt_core::logging::init_logging;
use tt_core::{
    load_csv, select_threshold, sweep, tune, write_sweep_csv, CsvOptions, Engine, ExitCode,
    MetricsResult, SampleTable,
};
use tt_math::ThresholdGrid;
use tt_report::{
    tuning_summary_header, tuning_summary_line, write_card, write_summary, InputProvenance,
    ManifestCase, RunManifest,
};

#[derive(Parser, Debug)]
#[command(name = "tt-core")]
#[command(author, version, about = "Diagnostic threshold tuning under false-negative bounds")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format for stdout
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute metrics at a fixed threshold
    Evaluate(EvaluateArgs),
    /// Select the highest threshold with at most K false negatives
    Select(SelectArgs),
    /// Run every scenario in the catalogue and write threshold cards
    Tune(TuneArgs),
    /// Evaluate metrics across an evenly spaced threshold grid
    Sweep(SweepArgs),
    /// Build CASE_SUMMARY.md from a directory of threshold cards
    Summarize(SummarizeArgs),
    /// Show the resolved scenario catalogue
    Scenarios(ScenariosArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// CSV file with a header row
    #[arg(long, value_name = "FILE")]
    csv: PathBuf,

    /// Column holding 0/1 ground-truth labels
    #[arg(long, default_value = "y_true")]
    label_column: String,

    /// Column holding predicted probabilities
    #[arg(long, default_value = "y_score")]
    score_column: String,
}

impl InputArgs {
    fn load(&self) -> Result<SampleTable> {
        let options = CsvOptions {
            label_column: self.label_column.clone(),
            score_column: self.score_column.clone(),
            ..CsvOptions::default()
        };
        load_csv(&self.csv, &options)
    }

    fn provenance(&self, table: &SampleTable) -> InputProvenance {
        InputProvenance {
            path: self.csv.display().to_string(),
            sha256: table.fingerprint().map(str::to_string),
            rows: table.len(),
            positives: table.positives(),
        }
    }
}

#[derive(Args, Debug)]
struct SelectorArgs {
    /// Scenario/selector config file (overrides THRESHOLD_TUNER_SCENARIOS)
    #[arg(long, value_name = "PATH")]
    scenarios: Option<PathBuf>,

    /// Number of grid points on [0, 1]
    #[arg(long)]
    grid_points: Option<usize>,

    /// Grid search strategy
    #[arg(long, value_enum)]
    strategy: Option<SearchStrategy>,
}

impl SelectorArgs {
    fn resolve(&self) -> Result<ResolvedConfig> {
        let mut resolved = resolve_config(self.scenarios.as_deref())?;
        if let Some(points) = self.grid_points {
            resolved.selector = resolved.selector.with_grid_points(points);
        }
        if let Some(strategy) = self.strategy {
            resolved.selector = resolved.selector.with_strategy(strategy);
        }
        debug!(
            source = %resolved.source,
            grid_points = resolved.selector.grid_points,
            strategy = %resolved.selector.strategy,
            "resolved selector config"
        );
        Ok(resolved)
    }
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Decision threshold; scores >= threshold are flagged positive
    #[arg(long, allow_hyphen_values = true)]
    threshold: f64,

    /// Assumed prevalence recorded in the output (defaults to the table's)
    #[arg(long)]
    prevalence: Option<f64>,

    /// Also write the threshold card to this path
    #[arg(long, value_name = "PATH")]
    card: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SelectArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Maximum tolerated false negatives
    #[arg(long, allow_hyphen_values = true)]
    max_fn: i64,

    #[command(flatten)]
    selector: SelectorArgs,
}

#[derive(Args, Debug)]
struct TuneArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Directory receiving one card per scenario plus the run manifest
    #[arg(long, value_name = "DIR")]
    outdir: PathBuf,

    #[command(flatten)]
    selector: SelectorArgs,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Number of thresholds on [0, 1]
    #[arg(long, default_value_t = ThresholdGrid::SWEEP_POINTS)]
    points: usize,

    /// Output file; CSV when it ends in .csv, JSON otherwise
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SummarizeArgs {
    /// Directory of threshold cards
    #[arg(long, value_name = "DIR")]
    cases: PathBuf,
}

#[derive(Args, Debug)]
struct ScenariosArgs {
    /// Scenario config file (overrides THRESHOLD_TUNER_SCENARIOS)
    #[arg(long, value_name = "PATH")]
    scenarios: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet, cli.log_json);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            report_error(&err, cli.format);
            ExitCode::from(&err)
        }
    };
    std::process::exit(code.as_i32());
}

fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Evaluate(args) => run_evaluate(args, cli.format),
        Commands::Select(args) => run_select(args, cli.format),
        Commands::Tune(args) => run_tune(args, cli.format),
        Commands::Sweep(args) => run_sweep(args, cli.format),
        Commands::Summarize(args) => run_summarize(args, cli.format),
        Commands::Scenarios(args) => run_scenarios(args, cli.format),
    }
}

fn report_error(err: &Error, format: OutputFormat) {
    if format.is_json() {
        let body = json!({
            "error": {
                "code": err.code(),
                "message": err.to_string(),
            }
        });
        println!("{body}");
    } else {
        eprintln!("tt-core: {err}");
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_evaluate(args: &EvaluateArgs, format: OutputFormat) -> Result<ExitCode> {
    let table = args.input.load()?;
    let engine = Engine::new(table.samples())?;
    let metrics = engine.evaluate(args.threshold, args.prevalence)?;
    let card = metrics.to_card();

    if let Some(path) = &args.card {
        write_card(path, &card)?;
        info!(path = %path.display(), "wrote threshold card");
    }

    if format.is_json() {
        println!("{}", card.to_json()?);
    } else {
        print_metrics(&metrics);
    }
    Ok(ExitCode::Ok)
}

fn print_metrics(m: &MetricsResult) {
    let pct = |v: f64| format!("{:.2}%", v * 100.0);
    let ranking = |v: f64| {
        if v.is_nan() {
            "undefined".to_string()
        } else {
            format!("{v:.4}")
        }
    };
    println!("threshold         {:.4}", m.threshold);
    println!("prevalence        {}", pct(m.prevalence_assumed));
    println!(
        "TP/FP/TN/FN       {}/{}/{}/{}",
        m.true_positives, m.false_positives, m.true_negatives, m.false_negatives
    );
    println!("sensitivity       {}", pct(m.sensitivity));
    println!("specificity       {}", pct(m.specificity));
    println!("FNR               {}", pct(m.fnr));
    println!("WLR               {}", pct(m.wlr));
    println!("PPV               {}", pct(m.ppv));
    println!("NPV               {}", pct(m.npv));
    println!("AUROC             {}", ranking(m.auc));
    println!("AUPRC             {}", ranking(m.auprc));
    println!("net benefit       {:.6}", m.net_benefit);
}

fn run_select(args: &SelectArgs, format: OutputFormat) -> Result<ExitCode> {
    let table = args.input.load()?;
    let resolved = args.selector.resolve()?;
    let selection = select_threshold(table.samples(), args.max_fn, &resolved.selector)?;

    if format.is_json() {
        print_json(&selection)?;
    } else {
        println!(
            "thr={:.4}  FN={}  max_fn={}  outcome={}  strategy={}  grid={}",
            selection.threshold,
            selection.false_negatives,
            selection.max_false_negatives,
            selection.outcome,
            selection.strategy,
            selection.grid_points
        );
    }

    Ok(if selection.outcome.is_degenerate() {
        ExitCode::Degenerate
    } else {
        ExitCode::Ok
    })
}

fn run_tune(args: &TuneArgs, format: OutputFormat) -> Result<ExitCode> {
    let table = args.input.load()?;
    let resolved = args.selector.resolve()?;
    let outcomes = tune(table.samples(), &resolved.catalogue, &resolved.selector)?;

    let mut manifest = RunManifest::new(
        args.input.provenance(&table),
        resolved.selector.grid_points,
        resolved.selector.strategy.to_string(),
        resolved.source.to_string(),
    );

    for case in &outcomes {
        let card_file = format!("{}.json", case.name());
        write_card(&args.outdir.join(&card_file), &case.metrics.to_card())?;
        manifest.push_case(ManifestCase {
            name: case.name().to_string(),
            card_file,
            assumed_prevalence: case.scenario.assumed_prevalence,
            target_false_negatives: case.scenario.target_false_negatives,
            threshold: case.selection.threshold,
            false_negatives: case.metrics.false_negatives,
            outcome: case.selection.outcome.to_string(),
        });
    }
    let manifest_path = manifest.write_to_dir(&args.outdir)?;
    info!(
        outdir = %args.outdir.display(),
        manifest = %manifest_path.display(),
        cases = outcomes.len(),
        "wrote threshold cards"
    );

    if format.is_json() {
        print_json(&manifest)?;
    } else {
        println!("{}", tuning_summary_header());
        for case in &outcomes {
            let m = &case.metrics;
            let line = tuning_summary_line(
                case.name(),
                m.threshold,
                m.false_negatives,
                m.fnr,
                m.wlr,
                m.npv,
            );
            println!("{line}");
        }
    }

    Ok(if manifest.has_degenerate_cases() {
        ExitCode::Degenerate
    } else {
        ExitCode::Ok
    })
}

fn run_sweep(args: &SweepArgs, format: OutputFormat) -> Result<ExitCode> {
    let table = args.input.load()?;
    let engine = Engine::new(table.samples())?;
    let points = sweep(&engine, args.points)?;

    match &args.out {
        Some(path) => {
            write_sweep_file(path, &points)?;
            info!(path = %path.display(), points = points.len(), "wrote sweep");
            if format.is_json() {
                print_json(&json!({ "path": path, "points": points.len() }))?;
            } else {
                println!("wrote {} sweep points to {}", points.len(), path.display());
            }
        }
        None if format.is_json() => print_json(&points)?,
        None => write_sweep_csv(std::io::stdout().lock(), &points)?,
    }
    Ok(ExitCode::Ok)
}

fn write_sweep_file(path: &Path, points: &[tt_core::SweepPoint]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_sweep_csv(file, points)
    } else {
        serde_json::to_writer_pretty(file, points)?;
        Ok(())
    }
}

fn run_summarize(args: &SummarizeArgs, format: OutputFormat) -> Result<ExitCode> {
    let (markdown, path) = write_summary(&args.cases)?;
    info!(path = %path.display(), "wrote case summary");
    if format.is_json() {
        let rows = tt_report::collect_rows(&args.cases)?;
        print_json(&json!({ "path": path, "rows": rows }))?;
    } else {
        print!("{markdown}");
    }
    Ok(ExitCode::Ok)
}

fn run_scenarios(args: &ScenariosArgs, format: OutputFormat) -> Result<ExitCode> {
    let resolved = resolve_config(args.scenarios.as_deref())?;
    if format.is_json() {
        print_json(&json!({
            "source": resolved.source,
            "path": resolved.path,
            "grid_points": resolved.selector.grid_points,
            "strategy": resolved.selector.strategy,
            "scenarios": resolved.catalogue,
        }))?;
    } else {
        let origin = match &resolved.path {
            Some(path) => format!("{} ({})", resolved.source, path.display()),
            None => resolved.source.to_string(),
        };
        println!("Scenario catalogue from {origin}:");
        for s in &resolved.catalogue {
            println!(
                "  {:<22}  prevalence={:>6.2}%  max_fn={}",
                s.name,
                s.assumed_prevalence * 100.0,
                s.target_false_negatives
            );
        }
        println!(
            "grid_points={}  strategy={}",
            resolved.selector.grid_points, resolved.selector.strategy
        );
    }
    Ok(ExitCode::Ok)
}
