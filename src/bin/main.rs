//! Superstore CLI - Sales analytics over a transactions table
//!
//! Usage:
//!   superstore view <VIEW> [--file <path>]
//!   superstore summarize [--file <path>] [--start D] [--end D] [--region R]... [--summary NAME]... [--narrative]
//!   superstore export [--out <dir>] [filters]
//!   superstore options [--file <path>] [filters]
//!   superstore list
//!
//! Examples:
//!   superstore view stats --file data/superstore.csv
//!   superstore summarize --file data/superstore.csv --region West --summary region_sales
//!   superstore export --file data/superstore.csv --start 2017-01-01 --out exports

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

use superstore::aggregate::{Registry, SummaryOutcome};
use superstore::config::Settings;
use superstore::export::export_all;
use superstore::filter::{DateRange, GeoSelection};
use superstore::insight::{insights, Insight};
use superstore::loader::{DatasetSource, LoadOptions};
use superstore::pipeline::{
    select_summaries, to_set, AnalyticsError, AnalyticsResult, Dashboard, Dataset,
};
use superstore::profile::{self, View};
use superstore::render::{render_insights, render_kpis, render_table, render_tree, RenderOptions};

#[derive(Parser)]
#[command(name = "superstore")]
#[command(about = "Superstore - Sales, profit and delivery analytics over a transactions table")]
#[command(version)]
struct Cli {
    /// Path to a superstore.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show an overview of the dataset
    View {
        /// Which view to show
        view: ViewArg,

        #[command(flatten)]
        dataset: DatasetArgs,

        /// Rows shown by the dataset view
        #[arg(long, default_value_t = 20)]
        rows: usize,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Compute KPIs and summaries for a selection
    Summarize {
        #[command(flatten)]
        filters: FilterArgs,

        /// Append a short narrative of the leading figures
        #[arg(long)]
        narrative: bool,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Write summaries as CSV files
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output directory (defaults to export.output_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show the region, state and city choices for a selection
    Options {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List the available summaries
    List,
}

#[derive(Args)]
struct DatasetArgs {
    /// Dataset file (defaults to dataset.default_path)
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Args)]
struct FilterArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// First order date to include (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last order date to include (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Region to include (repeatable)
    #[arg(long = "region")]
    regions: Vec<String>,

    /// State to include (repeatable)
    #[arg(long = "state")]
    states: Vec<String>,

    /// City to include (repeatable)
    #[arg(long = "city")]
    cities: Vec<String>,

    /// Summary to compute (repeatable; all when omitted)
    #[arg(short, long = "summary")]
    summaries: Vec<String>,
}

impl FilterArgs {
    fn geography(&self) -> GeoSelection {
        GeoSelection {
            regions: to_set(self.regions.iter().cloned()),
            states: to_set(self.states.iter().cloned()),
            cities: to_set(self.cities.iter().cloned()),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    About,
    Dataset,
    Columns,
    Types,
    Nulls,
    Stats,
    Correlation,
}

impl From<ViewArg> for View {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::About => View::About,
            ViewArg::Dataset => View::Dataset,
            ViewArg::Columns => View::Columns,
            ViewArg::Types => View::DataTypes,
            ViewArg::Nulls => View::NullValues,
            ViewArg::Stats => View::SummaryStatistics,
            ViewArg::Correlation => View::CorrelationMatrix,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Plain text tables
    Text,
    /// JSON document
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::View {
            view,
            dataset,
            rows,
            format,
        } => cmd_view(&settings, view.into(), &dataset, rows, format),
        Commands::Summarize {
            filters,
            narrative,
            format,
        } => cmd_summarize(&settings, &filters, narrative, format),
        Commands::Export { filters, out } => cmd_export(&settings, &filters, out),
        Commands::Options { filters } => cmd_options(&settings, &filters),
        Commands::List => cmd_list(&settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_dataset(settings: &Settings, args: &DatasetArgs) -> AnalyticsResult<Dataset> {
    let path = match &args.file {
        Some(path) => path.clone(),
        None => settings.dataset_path()?.ok_or(AnalyticsError::NoDataset)?,
    };
    let options = LoadOptions::default().with_encoding(settings.dataset.encoding.clone());
    Dataset::load(DatasetSource::Path(path), &options)
}

fn render_options(settings: &Settings) -> RenderOptions {
    RenderOptions::default().with_currency_decimals(settings.display.currency_decimals)
}

fn print_json<T: serde::Serialize>(value: &T) -> AnalyticsResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_view(
    settings: &Settings,
    view: View,
    args: &DatasetArgs,
    rows: usize,
    format: OutputFormat,
) -> AnalyticsResult<()> {
    if view == View::About {
        println!("{}", profile::ABOUT);
        return Ok(());
    }

    let dataset = load_dataset(settings, args)?;
    let Some(mut table) = profile::view(dataset.table(), view) else {
        return Ok(());
    };
    if view == View::Dataset {
        table = table.head(rows);
    }

    match format {
        OutputFormat::Json => print_json(&table)?,
        OutputFormat::Text => {
            println!("{}", view.label());
            println!("{}", render_table(&table, &render_options(settings)));
        }
    }
    Ok(())
}

/// JSON shape of `summarize`, with the narrative when asked for.
#[derive(serde::Serialize)]
struct SummaryReport<'a> {
    #[serde(flatten)]
    dashboard: &'a Dashboard,
    #[serde(skip_serializing_if = "Option::is_none")]
    narrative: Option<Vec<Insight>>,
}

fn cmd_summarize(
    settings: &Settings,
    args: &FilterArgs,
    narrative: bool,
    format: OutputFormat,
) -> AnalyticsResult<()> {
    let dataset = load_dataset(settings, &args.dataset)?;
    let registry = select_summaries(&Registry::standard(&settings.analysis), &args.summaries)?;
    let selection = dataset.selection(args.start, args.end, args.geography())?;
    let dashboard = dataset.analyze(&registry, &selection)?;
    let narrative = narrative.then(|| insights(&dashboard));

    if let OutputFormat::Json = format {
        return print_json(&SummaryReport {
            dashboard: &dashboard,
            narrative,
        });
    }

    let options = render_options(settings);
    println!("{}", render_kpis(&dashboard.kpis, &options));
    for summary in &dashboard.summaries {
        println!();
        println!("{}", summary.title);
        match &summary.outcome {
            SummaryOutcome::Rows(table) => println!("{}", render_table(table, &options)),
            SummaryOutcome::NoData => println!("No data available for {}.", summary.title),
        }
    }
    if let Some(tree) = &dashboard.tree {
        println!();
        println!("Sales Tree");
        println!("{}", render_tree(tree, &options));
    }
    if let Some(narrative) = &narrative {
        println!();
        println!("Analysis Summary");
        if narrative.is_empty() {
            println!("No data available for the analysis summary.");
        } else {
            println!("{}", render_insights(narrative, &options));
        }
    }
    for failure in &dashboard.failures {
        eprintln!("Summary '{}' failed: {}", failure.name, failure.error);
    }
    Ok(())
}

fn cmd_export(settings: &Settings, args: &FilterArgs, out: Option<PathBuf>) -> AnalyticsResult<()> {
    let dataset = load_dataset(settings, &args.dataset)?;
    let registry = select_summaries(&Registry::standard(&settings.analysis), &args.summaries)?;
    let selection = dataset.selection(args.start, args.end, args.geography())?;
    let dashboard = dataset.analyze(&registry, &selection)?;

    let dir = match out {
        Some(dir) => dir,
        None => settings.output_dir()?,
    };
    let written = export_all(&dashboard.summaries, &dir, &settings.export.encoding)?;

    for path in &written {
        println!("Wrote {}", path.display());
    }
    for summary in dashboard.summaries.iter().filter(|s| s.is_no_data()) {
        println!("Skipped {}: no data", summary.name);
    }
    Ok(())
}

fn cmd_options(settings: &Settings, args: &FilterArgs) -> AnalyticsResult<()> {
    let dataset = load_dataset(settings, &args.dataset)?;
    let selection = dataset.selection(args.start, args.end, args.geography())?;
    let range: DateRange = selection.dates;
    let options = dataset.options(&range, &selection.geography)?;

    println!("Dates: {} to {}", range.start, range.end);
    println!("Regions: {}", options.regions.join(", "));
    println!("States: {}", options.states.join(", "));
    println!("Cities: {}", options.cities.join(", "));
    Ok(())
}

fn cmd_list(settings: &Settings) -> AnalyticsResult<()> {
    let registry = Registry::standard(&settings.analysis);
    println!("Summaries:");
    for def in registry.iter() {
        println!("  - {} ({}) -> {}", def.name, def.title, def.file_name);
    }
    Ok(())
}
