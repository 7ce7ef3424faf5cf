pub mod charts;
pub mod error;
pub mod ingest;
pub mod models;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod rollup;
pub mod summary;

pub use error::{NormalizeError, PipelineError};
pub use models::{BuildingStats, IngestionReport, MeterReading};
pub use pipeline::{DashboardPipeline, PipelineRun};
pub use summary::CampusSummary;
