use crate::error::PipelineError;
use crate::models::{IngestionReport, MeterReading};
use crate::rollup::{self, BuildingSummary, DailyTotals, WeeklyTotals};
use crate::summary::{self, CampusSummary};
use crate::{charts, ingest, output};
use log::info;
use std::path::{Path, PathBuf};

pub const CLEANED_DATASET_FILE: &str = "cleaned_energy_data.csv";
pub const BUILDING_SUMMARY_FILE: &str = "building_summary.csv";
pub const DASHBOARD_FILE: &str = "dashboard.png";
pub const REPORT_FILE: &str = "summary.txt";

/// Everything one pipeline run computes. Treated as an immutable snapshot;
/// the artifact writers only read from it.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub dataset: Vec<MeterReading>,
    pub ingestion: IngestionReport,
    pub daily: DailyTotals,
    pub weekly: WeeklyTotals,
    pub buildings: BuildingSummary,
    pub summary: CampusSummary,
    pub report_text: String,
}

/// Directory-in, artifacts-out dashboard pipeline.
pub struct DashboardPipeline {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl DashboardPipeline {
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
        }
    }

    /// Pure compute stage: ingest the input directory and derive every
    /// aggregate and the narrative text. Writes nothing.
    pub fn compute(&self) -> Result<PipelineRun, PipelineError> {
        let (dataset, ingestion) = ingest::ingest_directory(&self.input_dir)?;
        info!(
            "canonical dataset: {} readings from {} files ({} skipped)",
            dataset.len(),
            ingestion.loaded.len(),
            ingestion.skipped.len()
        );

        let daily = rollup::daily_totals(&dataset);
        let weekly = rollup::weekly_totals(&dataset);
        let buildings = rollup::building_summary(&dataset);
        let summary = summary::extract(&dataset, &buildings)?;
        let report_text = summary::render_report(&summary, &daily, &weekly);

        Ok(PipelineRun {
            dataset,
            ingestion,
            daily,
            weekly,
            buildings,
            summary,
            report_text,
        })
    }

    /// Write the four artifacts into the output directory.
    pub fn write_artifacts(&self, run: &PipelineRun) -> Result<(), PipelineError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| PipelineError::OutputWrite {
            path: self.output_dir.clone(),
            reason: e.to_string(),
        })?;

        output::write_cleaned_dataset(&self.artifact(CLEANED_DATASET_FILE), &run.dataset)?;
        output::write_building_summary(&self.artifact(BUILDING_SUMMARY_FILE), &run.buildings)?;

        let weekly_by_building = rollup::weekly_mean_by_building(&run.dataset);
        charts::render_dashboard(
            &self.artifact(DASHBOARD_FILE),
            &run.dataset,
            &run.daily,
            &weekly_by_building,
        )?;

        output::write_report(&self.artifact(REPORT_FILE), &run.report_text)?;
        info!("artifacts written to {}", self.output_dir.display());
        Ok(())
    }

    pub fn run(&self) -> Result<PipelineRun, PipelineError> {
        let run = self.compute()?;
        self.write_artifacts(&run)?;
        Ok(run)
    }

    fn artifact(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

/// Convenience wrapper for one-shot callers.
pub fn run(input_dir: &Path, output_dir: &Path) -> Result<PipelineRun, PipelineError> {
    DashboardPipeline::new(input_dir.to_path_buf(), output_dir.to_path_buf()).run()
}
