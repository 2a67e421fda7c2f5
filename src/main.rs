use clap::{Parser, ValueEnum};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use room_schedules::builder::{ScheduleBuilder, ScheduleConfig};
use room_schedules::export::{export_csv, export_json, save_document};
use room_schedules::host::load_document;
use room_schedules::model::Category;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg {
    Rooms,
    Spaces,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Rooms => Category::Rooms,
            CategoryArg::Spaces => Category::Spaces,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "room-schedules")]
#[command(about = "Create one schedule per department and an all-departments rollup")]
#[command(version)]
struct Args {
    /// Path to the document (JSON)
    #[arg(required = true)]
    file: PathBuf,

    /// Schedule settings (JSON); flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Attribute to group rooms by
    #[arg(long, value_name = "NAME")]
    group_by: Option<String>,

    /// Category to schedule
    #[arg(long, value_enum)]
    category: Option<CategoryArg>,

    /// Export the created schedules' rows to CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Export the created schedule definitions to JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Save the updated document, new schedules included (may be the input file)
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<ScheduleConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read config '{}'", path.display()))?;
            serde_json::from_str(&content)
                .wrap_err_with(|| format!("invalid config '{}'", path.display()))?
        }
        None => ScheduleConfig::default(),
    };

    if let Some(group_by) = &args.group_by {
        config.group_attribute.clone_from(group_by);
    }
    if let Some(category) = args.category {
        config.category = category.into();
    }
    Ok(config)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let mut document = load_document(&args.file)?;
    let summary = ScheduleBuilder::new(config).run(&mut document)?;
    println!("{summary}");

    let created: Vec<_> = document
        .schedules()
        .iter()
        .filter(|s| {
            summary.group_schedules.contains(&s.name) || s.name == summary.aggregate_schedule
        })
        .cloned()
        .collect();

    if let Some(csv_path) = &args.csv {
        let tables: Vec<_> = created
            .iter()
            .filter_map(|s| document.evaluate(&s.name))
            .collect();
        export_csv(&tables, csv_path)?;
        println!("Exported to CSV: {}", csv_path.display());
    }

    if let Some(json_path) = &args.json {
        export_json(&created, json_path)?;
        println!("Exported to JSON: {}", json_path.display());
    }

    if let Some(save_path) = &args.save {
        save_document(&document, save_path)?;
        println!("Saved document: {}", save_path.display());
    }

    Ok(())
}
