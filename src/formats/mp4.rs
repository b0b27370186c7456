use super::{describe_bytes, find, run_assertions, Assertion, Detector, Recorder};
use crate::types::ValidationReport;

pub const FTYP_MARKER: &[u8; 4] = b"ftyp";
const BRAND_WIDTH: usize = 4;

/// Checks for an ISO base media `ftyp` box marker.
///
/// A marker at byte 0 is rejected and one anywhere after it is accepted. In a
/// canonical file the marker sits at byte 4, after the box size, so the rule
/// accepts that layout but also files whose `ftyp` is far from the start.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mp4Detector;

const ASSERTIONS: &[Assertion<Mp4Detector>] = &[Assertion {
    name: "ftyp_box",
    check: check_ftyp_box,
}];

fn check_ftyp_box(_: &Mp4Detector, data: &[u8], rec: &mut Recorder<'_>) {
    match find(data, FTYP_MARKER) {
        None => rec.fail("MP4 ftyp box marker not found"),
        Some(0) => rec.fail("MP4 ftyp marker found at byte 0, where the box size belongs"),
        Some(position) => {
            let brand_start = position + FTYP_MARKER.len();
            let subtype = data
                .get(brand_start..brand_start + BRAND_WIDTH)
                .map(describe_bytes)
                .unwrap_or_else(|| "unreadable".to_string());
            rec.pass(format!("MP4 ftyp box at byte {position}, subtype {subtype}"));
        }
    }
}

impl Detector for Mp4Detector {
    fn name(&self) -> &'static str {
        "mp4"
    }

    fn validate(&self, data: &[u8]) -> ValidationReport {
        run_assertions(self, ASSERTIONS, data)
    }
}
