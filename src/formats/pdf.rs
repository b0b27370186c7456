use super::{count_occurrences, run_assertions, Assertion, Detector, Recorder};
use crate::codec::HexView;
use crate::types::ValidationReport;

pub const PDF_SIGNATURE: &[u8; 5] = b"%PDF-";
const VERSION_WIDTH: usize = 3;
pub const STREAM_KEYWORD: &[u8] = b"\nstream\n";
pub const EOF_MARKER: &[u8] = b"\n%%EOF\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfDetector;

const ASSERTIONS: &[Assertion<PdfDetector>] = &[
    Assertion {
        name: "signature",
        check: check_signature,
    },
    Assertion {
        name: "streams",
        check: check_streams,
    },
    Assertion {
        name: "eof_marker",
        check: check_eof_marker,
    },
];

/// Version digits following `%PDF-`, e.g. `1.7`.
pub fn pdf_version(data: &[u8]) -> Option<&str> {
    let start = PDF_SIGNATURE.len();
    let bytes = data.get(start..start + VERSION_WIDTH)?;
    std::str::from_utf8(bytes).ok()
}

fn check_signature(_: &PdfDetector, data: &[u8], rec: &mut Recorder<'_>) {
    if !HexView::new(data).matches(0, PDF_SIGNATURE) {
        rec.fail("PDF signature %PDF- missing at byte 0");
        return;
    }

    match pdf_version(data) {
        Some(version) => rec.pass(format!("PDF signature present, version {version}")),
        None => rec.pass("PDF signature present, version unreadable"),
    }
}

fn check_streams(_: &PdfDetector, data: &[u8], rec: &mut Recorder<'_>) {
    let streams = count_occurrences(data, STREAM_KEYWORD);
    rec.check(streams > 0, format!("PDF contains {streams} content streams"));
}

fn check_eof_marker(_: &PdfDetector, data: &[u8], rec: &mut Recorder<'_>) {
    if count_occurrences(data, EOF_MARKER) > 0 {
        rec.pass("PDF closing %%EOF tag present");
    } else {
        rec.fail("PDF closing %%EOF tag missing");
    }
}

impl Detector for PdfDetector {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn validate(&self, data: &[u8]) -> ValidationReport {
        run_assertions(self, ASSERTIONS, data)
    }
}
