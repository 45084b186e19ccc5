//! A load-once session over a single dataset.
//!
//! The dataset is parsed once per distinct input and then shared
//! read-only; every call to [`Session::render`] recomputes the filtered
//! views from scratch.

use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::config::DashboardConfig;
use crate::error::{Result, SshMonError};
use crate::event::Dataset;
use crate::filter::{self, Selection};
use crate::loader;
use crate::report::Report;

/// SHA-256 of the raw input bytes.
type Fingerprint = [u8; 32];

pub struct Session {
    config: DashboardConfig,
    cached: Option<(Fingerprint, Arc<Dataset>)>,
}

impl Session {
    pub fn new(config: DashboardConfig) -> Self {
        Session {
            config,
            cached: None,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Load CSV bytes, reusing the cached dataset when the bytes are the
    /// same as the last successful load. Failed loads are not cached.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<Arc<Dataset>> {
        let fingerprint: Fingerprint = Sha256::digest(bytes).into();

        if let Some((cached_fp, dataset)) = &self.cached
            && *cached_fp == fingerprint
        {
            log::debug!("dataset cache hit");
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(loader::load_reader(bytes)?);
        self.cached = Some((fingerprint, Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Read a file and load it through the cache.
    pub fn load_path(&mut self, path: &Path) -> Result<Arc<Dataset>> {
        let bytes = std::fs::read(path)?;
        self.load_bytes(&bytes)
    }

    /// The currently loaded dataset, if any.
    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.cached.as_ref().map(|(_, ds)| ds)
    }

    /// Filter the loaded dataset and compute the report.
    ///
    /// `Ok(None)` means the selection matched nothing.
    pub fn render(&self, selection: &Selection) -> Result<Option<Report>> {
        let dataset = self.dataset().ok_or(SshMonError::NoDataset)?;
        let view = filter::apply(dataset, selection);
        Ok(Report::build(&view, &self.config))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}
