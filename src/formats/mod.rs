//! Per-format structural detectors.
//!
//! Every detector owns a fixed, ordered table of [`Assertion`]s. Running a
//! detector walks that table front to back and records the findings each
//! assertion produces, so the order of a report is the order of the table.

pub mod jp2;
pub mod mkv;
pub mod mp3;
pub mod mp4;
pub mod ogg;
pub mod pdf;
pub mod raster;
pub mod text;
pub mod tiff;
pub mod wav;

use memchr::memmem;
use tracing::debug;

use crate::codec::FieldError;
use crate::types::{Finding, Origin, ValidationReport};

pub use self::jp2::Jp2Detector;
pub use self::mkv::MkvDetector;
pub use self::mp3::Mp3Detector;
pub use self::mp4::Mp4Detector;
pub use self::ogg::OggDetector;
pub use self::pdf::PdfDetector;
pub use self::raster::{ImageDetector, ProbeDisabled};
pub use self::text::TextOccurrenceDetector;
pub use self::tiff::TiffDetector;
pub use self::wav::WavDetector;

/// Structural validation of one format.
///
/// Implementations are read-only over the buffer and hold no mutable state,
/// so a single detector may be shared between threads.
pub trait Detector: Send + Sync {
    /// Short lowercase name used as the `detector` part of every [`Origin`].
    fn name(&self) -> &'static str;

    /// Runs every assertion in declaration order.
    ///
    /// Never returns an empty report for a non-empty buffer.
    fn validate(&self, data: &[u8]) -> ValidationReport;
}

/// One named check in a detector's table.
pub struct Assertion<D: ?Sized> {
    pub name: &'static str,
    pub check: fn(&D, &[u8], &mut Recorder<'_>),
}

/// Collects the findings of a single assertion, stamping each with its origin.
pub struct Recorder<'r> {
    report: &'r mut ValidationReport,
    origin: Origin,
}

impl<'r> Recorder<'r> {
    fn new(report: &'r mut ValidationReport, origin: Origin) -> Self {
        Self { report, origin }
    }

    pub fn pass(&mut self, message: impl Into<String>) {
        self.report.push(Finding::pass(self.origin, message));
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.report.push(Finding::fail(self.origin, message));
    }

    pub fn check(&mut self, passed: bool, message: impl Into<String>) {
        if passed {
            self.pass(message);
        } else {
            self.fail(message);
        }
    }

    /// Records an unreadable field as a failure of this assertion.
    pub fn unreadable(&mut self, what: &str, err: FieldError) {
        self.fail(format!("{what} could not be read: {err}"));
    }
}

/// Executes `table` against `data` on behalf of `detector`.
pub(crate) fn run_assertions<D: Detector + ?Sized>(
    detector: &D,
    table: &[Assertion<D>],
    data: &[u8],
) -> ValidationReport {
    let mut report = ValidationReport::new();
    for assertion in table {
        let before = report.len();
        let origin = Origin::new(detector.name(), assertion.name);
        (assertion.check)(detector, data, &mut Recorder::new(&mut report, origin));
        debug!(
            detector = detector.name(),
            assertion = assertion.name,
            findings = report.len() - before,
            "assertion executed"
        );
    }
    report
}

/// Non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() {
        return 0;
    }
    memmem::find_iter(haystack, needle).count()
}

pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    memmem::find(haystack, needle)
}

/// Renders raw bytes for a finding message: printable ASCII as-is, the rest hex.
pub(crate) fn describe_bytes(bytes: &[u8]) -> String {
    if !bytes.is_empty() && bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        format!("{:?}", String::from_utf8_lossy(bytes))
    } else {
        hex::encode_upper(bytes)
    }
}
