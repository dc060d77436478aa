//! Pipeline orchestration
//!
//! A [`Pipeline`] drives one run through its stages:
//!
//! ```text
//! Extracting -> Cleaning -> Routing -> Loading -> Reporting -> Done
//!      |            |
//!      +-> Aborted  +-> Aborted
//! ```
//!
//! The run aborts when the source cannot be read, yields no rows, or no row
//! survives cleaning. Extract, load and report failures are recorded in the
//! [`RunSummary`] and the run carries on, so the metadata report is written
//! even when every destination failed.

use crate::config::PipelineConfig;
use crate::constants::exit_codes;
use crate::error::{EtlError, Result};
use crate::extract::{ExtractWriter, WrittenExtract};
use crate::loader::{DestinationRoute, LoadReport, load_routes};
use crate::metadata::RunMetadata;
use crate::models::Country;
use crate::normalizer::{NormalizationStats, Normalizer};
use crate::partitioner::partition;
use crate::source::{RecordSource, source_for_path};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Stage of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Extracting,
    Cleaning,
    Routing,
    Loading,
    Reporting,
    Done,
    Aborted,
}

impl PipelineStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Aborted)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Extracting => "extracting",
            PipelineStage::Cleaning => "cleaning",
            PipelineStage::Routing => "routing",
            PipelineStage::Loading => "loading",
            PipelineStage::Reporting => "reporting",
            PipelineStage::Done => "done",
            PipelineStage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Outcome of a run that reached `Done`
#[derive(Debug)]
pub struct RunSummary {
    /// Stages visited, in order
    pub stages: Vec<PipelineStage>,
    pub stats: NormalizationStats,
    pub bucket_counts: BTreeMap<Country, usize>,
    pub extracts: Vec<WrittenExtract>,
    pub loads: Vec<LoadReport>,
    /// Report location when it was written
    pub metadata_path: Option<PathBuf>,
    /// Write and load failures that did not stop the run
    pub failures: Vec<EtlError>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Process exit status for this run
    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            exit_codes::SUCCESS
        } else {
            exit_codes::PARTIAL_FAILURE
        }
    }

    pub fn rows_loaded(&self) -> usize {
        self.loads.iter().map(|load| load.inserted).sum()
    }
}

/// One configured run: a source, its destinations and output locations
pub struct Pipeline {
    source: Box<dyn RecordSource>,
    normalizer: Normalizer,
    routes: Vec<DestinationRoute>,
    extract_writer: ExtractWriter,
    metadata_path: PathBuf,
    stages: Vec<PipelineStage>,
}

impl Pipeline {
    /// Create a pipeline without destinations
    pub fn new(
        source: Box<dyn RecordSource>,
        extract_writer: ExtractWriter,
        metadata_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            normalizer: Normalizer::new(),
            routes: Vec::new(),
            extract_writer,
            metadata_path: metadata_path.into(),
            stages: Vec::new(),
        }
    }

    pub fn with_routes(mut self, routes: Vec<DestinationRoute>) -> Self {
        self.routes = routes;
        self
    }

    /// Build a pipeline from validated configuration
    ///
    /// With `skip_load` no destination is contacted and connection URLs
    /// need not resolve.
    pub fn from_config(config: &PipelineConfig, skip_load: bool) -> Result<Self> {
        config.validate(!skip_load)?;

        let source = source_for_path(&config.input_path)?;
        let routes = if skip_load {
            info!("Database load disabled; only extracts and metadata are written");
            Vec::new()
        } else {
            config.build_routes()?
        };

        Ok(Self::new(
            source,
            ExtractWriter::new(&config.output_dir),
            &config.metadata_path,
        )
        .with_routes(routes))
    }

    /// Most recent stage, if the pipeline has started
    pub fn stage(&self) -> Option<PipelineStage> {
        self.stages.last().copied()
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    fn enter(&mut self, stage: PipelineStage) {
        info!("Stage: {}", stage);
        self.stages.push(stage);
    }

    fn abort(&mut self, error: EtlError) -> Result<RunSummary> {
        error!("Run aborted: {}", error);
        self.enter(PipelineStage::Aborted);
        Err(error)
    }

    /// Execute the run
    ///
    /// # Returns
    ///
    /// A summary when the run reached `Done` (possibly with recorded
    /// failures), or the error that aborted it
    pub async fn run(&mut self) -> Result<RunSummary> {
        let start = Instant::now();
        self.stages.clear();

        self.enter(PipelineStage::Extracting);
        let raw = match self.source.extract() {
            Ok(raw) => raw,
            Err(e) => return self.abort(e),
        };
        if raw.is_empty() {
            let path = self.source.location().to_path_buf();
            return self.abort(EtlError::EmptySource { path });
        }

        self.enter(PipelineStage::Cleaning);
        let normalized = self.normalizer.normalize(raw);
        if normalized.is_empty() {
            let input = normalized.stats.total_input;
            return self.abort(EtlError::NoValidRecords { input });
        }
        let stats = normalized.stats;
        let records = normalized.records;

        self.enter(PipelineStage::Routing);
        let buckets = partition(records.clone());
        let mut failures = Vec::new();
        let extract_report = self.extract_writer.write_all(&buckets);
        failures.extend(extract_report.failures);

        self.enter(PipelineStage::Loading);
        let mut loads = Vec::new();
        for outcome in load_routes(&self.routes, &buckets).await {
            match outcome.result {
                Ok(report) => loads.push(report),
                Err(e) => failures.push(e),
            }
        }

        self.enter(PipelineStage::Reporting);
        let metadata_path = match RunMetadata::from_records(&records)
            .and_then(|metadata| metadata.write_to(&self.metadata_path))
        {
            Ok(()) => Some(self.metadata_path.clone()),
            Err(e) => {
                let failure = match e {
                    e @ EtlError::WriteFailure { .. } => e,
                    other => EtlError::write_failure(&self.metadata_path, other),
                };
                error!("{}", failure);
                failures.push(failure);
                None
            }
        };

        self.enter(PipelineStage::Done);
        if !failures.is_empty() {
            warn!("Run completed with {} failure(s)", failures.len());
        }

        Ok(RunSummary {
            stages: self.stages.clone(),
            stats,
            bucket_counts: buckets.counts(),
            extracts: extract_report.written,
            loads,
            metadata_path,
            failures,
            elapsed: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests;
