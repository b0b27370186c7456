//! Running detectors and collecting their findings.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::ValidationConfig;
use crate::error::Result;
use crate::formats::{Detector, ProbeDisabled};
use crate::registry::{DetectorKind, Registry};
use crate::source::DatastreamSource;
use crate::types::{DetectorParameters, Finding, Origin, ValidationReport};

/// Origin of the finding recorded when no bytes could be obtained.
pub const BUFFER_ORIGIN: Origin = Origin::new("aggregate", "buffer");

/// Report holding the single failure for a datastream that could not be read.
pub fn unavailable(datastream: &str, reason: Option<&str>) -> ValidationReport {
    let message = match reason {
        Some(reason) => format!("Datastream {datastream} is unavailable: {reason}"),
        None => format!("Datastream {datastream} is unavailable"),
    };
    warn!(datastream, reason, "datastream unavailable, no detectors run");

    let mut report = ValidationReport::new();
    report.push(Finding::fail(BUFFER_ORIGIN, message));
    report
}

/// Runs `detectors` in order over `buffer` and concatenates their findings.
///
/// An absent or empty buffer short-circuits to [`unavailable`] without running
/// any detector.
pub fn aggregate(
    buffer: Option<&[u8]>,
    datastream: &str,
    detectors: &[Box<dyn Detector>],
) -> ValidationReport {
    let Some(data) = buffer.filter(|data| !data.is_empty()) else {
        return unavailable(datastream, None);
    };

    let mut report = ValidationReport::new();
    for detector in detectors {
        report.append(detector.validate(data));
    }

    info!(
        datastream,
        bytes = data.len(),
        detectors = detectors.len(),
        passed = report.passes(),
        failed = report.fails(),
        "datastream validated"
    );
    report
}

/// One unit of work for [`Validator::validate_batch`].
#[derive(Debug, Clone)]
pub struct Job<'a> {
    pub label: String,
    pub params: DetectorParameters,
    pub data: Option<&'a [u8]>,
}

impl<'a> Job<'a> {
    pub fn new(label: impl Into<String>, data: Option<&'a [u8]>) -> Self {
        Self {
            label: label.into(),
            params: DetectorParameters::new(),
            data,
        }
    }

    pub fn with_params(mut self, params: DetectorParameters) -> Self {
        self.params = params;
        self
    }
}

/// Resolves labels to detectors and runs them, honouring a [`ValidationConfig`].
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
    registry: Registry,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        let registry = Registry::with_overrides(&config.mime_overrides);
        Self { config, registry }
    }

    pub fn with_defaults() -> Self {
        Self::new(ValidationConfig::default())
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Constructs the detectors for `label`, failing before any check runs if
    /// the label is unknown or parameters are missing.
    pub fn detectors(
        &self,
        label: &str,
        params: &DetectorParameters,
    ) -> Result<Vec<Box<dyn Detector>>> {
        self.registry
            .resolve(label)?
            .iter()
            .map(|kind| match kind {
                DetectorKind::Image if !self.config.image_probe => {
                    Ok(Box::new(ProbeDisabled) as Box<dyn Detector>)
                }
                _ => kind.build(params),
            })
            .collect()
    }

    /// Validates `buffer` as the configured default datastream.
    pub fn validate(
        &self,
        label: &str,
        params: &DetectorParameters,
        buffer: Option<&[u8]>,
    ) -> Result<ValidationReport> {
        let detectors = self.detectors(label, params)?;
        Ok(aggregate(buffer, &self.config.datastream, &detectors))
    }

    /// Fetches a datastream from `source` and validates it.
    ///
    /// `datastream` defaults to the configured one. Fetch failures become the
    /// single unavailable finding rather than an error.
    pub fn validate_datastream(
        &self,
        source: &dyn DatastreamSource,
        object: &str,
        datastream: Option<&str>,
        label: &str,
        params: &DetectorParameters,
    ) -> Result<ValidationReport> {
        let detectors = self.detectors(label, params)?;
        let datastream = datastream.unwrap_or(&self.config.datastream);

        let report = match source.fetch(object, datastream) {
            Ok(stream) => aggregate(Some(&stream[..]), datastream, &detectors),
            Err(err) => unavailable(datastream, Some(&err.to_string())),
        };
        Ok(report)
    }

    /// Validates independent jobs in parallel; results keep the order of `jobs`.
    pub fn validate_batch(&self, jobs: &[Job<'_>]) -> Vec<Result<ValidationReport>> {
        jobs.par_iter()
            .map(|job| self.validate(&job.label, &job.params, job.data))
            .collect()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
