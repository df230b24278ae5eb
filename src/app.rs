use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate;
use crate::batch;
use crate::domain::BatchSize;
use crate::error::GeotableError;
use crate::service::FeatureService;
use crate::table::{self, GeoTable};

#[derive(Debug, Clone, Copy)]
pub struct PullOptions {
    pub batch_size: BatchSize,
    pub reproject: bool,
}

impl Default for PullOptions {
    fn default() -> Self {
        Self {
            batch_size: BatchSize::default(),
            reproject: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PullSummary {
    pub layer_url: String,
    pub object_ids: usize,
    pub batches: usize,
    pub batch_size: usize,
    pub rows: usize,
    pub columns: Vec<String>,
    pub crs: String,
    pub output_path: Option<String>,
    pub fetched_at: String,
}

impl PullSummary {
    pub fn new(
        layer_url: &str,
        object_ids: usize,
        options: PullOptions,
        table: &GeoTable,
    ) -> Self {
        Self {
            layer_url: layer_url.to_string(),
            object_ids,
            batches: batch::chunk_count(object_ids, options.batch_size),
            batch_size: options.batch_size.get(),
            rows: table.len(),
            columns: table.columns().to_vec(),
            crs: table.crs().to_string(),
            output_path: None,
            fetched_at: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Debug, Clone)]
pub struct Pulled {
    pub table: GeoTable,
    pub object_ids: usize,
}

#[derive(Clone)]
pub struct App<S: FeatureService> {
    service: S,
}

impl<S: FeatureService> App<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// The first failing batch aborts the pull; nothing partial is returned.
    pub fn pull(
        &self,
        options: PullOptions,
        sink: &dyn ProgressSink,
    ) -> Result<Pulled, GeotableError> {
        let started = Instant::now();

        let ids = self.service.object_ids()?;
        let batches = batch::partition(&ids, options.batch_size);
        info!(
            object_ids = ids.len(),
            batches = batches.len(),
            batch_size = options.batch_size.get(),
            "listed layer object ids"
        );
        sink.event(ProgressEvent {
            message: format!(
                "Breaking feature service layer IDs into {} chunks",
                batches.len()
            ),
            elapsed: Some(started.elapsed()),
        });

        let total = batches.len();
        let mut results = Vec::with_capacity(total);
        for (index, ids) in batches.iter().enumerate() {
            let features = self.service.features(ids)?;
            debug!(
                batch = index + 1,
                requested = ids.len(),
                returned = features.len(),
                "fetched batch"
            );
            sink.event(ProgressEvent {
                message: format!(
                    "phase=Fetch; batch {}/{total}; {} features",
                    index + 1,
                    features.len()
                ),
                elapsed: Some(started.elapsed()),
            });
            results.push(features);
        }

        let features = aggregate::concat(results);
        if features.len() != ids.len() {
            warn!(
                expected = ids.len(),
                received = features.len(),
                "feature count differs from object id count"
            );
        }

        let table = table::build(features, options.reproject)?;
        sink.event(ProgressEvent {
            message: format!("phase=Build; {} rows in {}", table.len(), table.crs()),
            elapsed: Some(started.elapsed()),
        });

        Ok(Pulled {
            table,
            object_ids: ids.len(),
        })
    }
}
