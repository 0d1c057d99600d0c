use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

mod dataset;
mod filter;
mod load;
mod models;
mod report;
mod stats;

use dataset::Dataset;
use filter::FilterSelection;
use report::Chart;

#[derive(Parser)]
#[command(name = "activity-cohort-dashboard")]
#[command(about = "Demographic and physical activity dashboards over a merged cohort dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataOpts {
    /// Path to the demographics CSV
    #[arg(long, default_value = "demo.csv")]
    demo: PathBuf,
    /// Path to the activity CSV
    #[arg(long = "activity-csv", default_value = "activity.csv")]
    activity_csv: PathBuf,
    /// Reference year for age derivation (fixed for reproducibility)
    #[arg(long, default_value_t = 2024)]
    reference_year: i32,
}

#[derive(Args)]
struct FilterOpts {
    /// Keep only these genders (repeatable; default: all observed)
    #[arg(long)]
    gender: Vec<String>,
    /// Keep only these races (repeatable; default: all observed)
    #[arg(long)]
    race: Vec<String>,
    /// Keep only these ethnicities (repeatable; default: all observed)
    #[arg(long)]
    ethnic: Vec<String>,
    /// Lower age bound (default: observed minimum)
    #[arg(long)]
    age_min: Option<i32>,
    /// Upper age bound (default: observed maximum)
    #[arg(long)]
    age_max: Option<i32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the Demographics page
    Demographics {
        #[command(flatten)]
        data: DataOpts,
        #[command(flatten)]
        filters: FilterOpts,
        /// Emit the aggregate series as JSON instead of markdown
        #[arg(long)]
        json: bool,
        /// Write the page to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render the Physical Activity page
    Activity {
        #[command(flatten)]
        data: DataOpts,
        #[command(flatten)]
        filters: FilterOpts,
        /// Emit the aggregate series as JSON instead of markdown
        #[arg(long)]
        json: bool,
        /// Write the page to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the distinct categorical values and observed age range
    Summary {
        #[command(flatten)]
        data: DataOpts,
    },
}

impl DataOpts {
    fn load(&self) -> anyhow::Result<Dataset> {
        Dataset::load(&self.demo, &self.activity_csv, self.reference_year)
    }
}

impl FilterOpts {
    fn selection(&self, dataset: &Dataset) -> FilterSelection {
        let mut selection = FilterSelection::all(dataset);
        if !self.gender.is_empty() {
            selection.genders = self.gender.iter().cloned().collect();
        }
        if !self.race.is_empty() {
            selection.races = self.race.iter().cloned().collect();
        }
        if !self.ethnic.is_empty() {
            selection.ethnicities = self.ethnic.iter().cloned().collect();
        }
        if let Some(min) = self.age_min {
            selection.age_min = min;
        }
        if let Some(max) = self.age_max {
            selection.age_max = max;
        }
        selection
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demographics {
            data,
            filters,
            json,
            out,
        } => render_page(
            "Demographic Dashboard",
            report::demographics_page,
            &data,
            &filters,
            json,
            out,
        ),
        Commands::Activity {
            data,
            filters,
            json,
            out,
        } => render_page(
            "Physical Activity Dashboard",
            report::activity_page,
            &data,
            &filters,
            json,
            out,
        ),
        Commands::Summary { data } => {
            let dataset = data.load()?;
            println!("Merged table: {} rows.", dataset.rows().len());
            println!("Genders: {}", join(dataset.genders()));
            println!("Races: {}", join(dataset.races()));
            println!("Ethnicities: {}", join(dataset.ethnicities()));
            match dataset.age_range() {
                Some((min, max)) => println!("Age range: {min}-{max}"),
                None => println!("Age range: no observed ages"),
            }
            Ok(())
        }
    }
}

fn render_page(
    title: &str,
    page: fn(&[models::MergedRecord]) -> Vec<Chart>,
    data: &DataOpts,
    filters: &FilterOpts,
    json: bool,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let dataset = data.load()?;
    let selection = filters.selection(&dataset);
    let view = selection.apply(&dataset);
    let charts = page(&view);

    let rendered = if json {
        let mut text = serde_json::to_string_pretty(&charts)?;
        text.push('\n');
        text
    } else {
        report::render_markdown(title, view.len(), &charts)
    };

    match out {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Report written to {}.", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn join(values: std::collections::BTreeSet<String>) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.into_iter().collect::<Vec<_>>().join(", ")
    }
}
