use anyhow::{Context, Result};
use clap::Parser;
use energy_dashboard::DashboardPipeline;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "energy-dashboard")]
#[command(about = "Aggregate campus energy-meter CSV exports into a dashboard")]
struct Args {
    /// Directory of raw meter-export CSV files
    #[arg(short, long, default_value = "data")]
    input_dir: PathBuf,

    /// Directory for generated artifacts
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .build_global()?;

    info!("reading meter exports from {}", args.input_dir.display());
    let pipeline = DashboardPipeline::new(args.input_dir.clone(), args.output_dir.clone());
    let run = pipeline
        .run()
        .with_context(|| format!("dashboard run over {} failed", args.input_dir.display()))?;

    println!("{}", run.report_text);
    println!(
        "✅ {} readings from {} buildings; artifacts in {}",
        run.dataset.len(),
        run.buildings.len(),
        args.output_dir.display()
    );
    Ok(())
}
