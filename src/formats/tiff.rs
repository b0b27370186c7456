use super::{describe_bytes, run_assertions, Assertion, Detector, Recorder};
use crate::codec::HexView;
use crate::types::ValidationReport;

/// Intel byte order header: `II*\0`.
pub const TIFF_LITTLE_ENDIAN: [u8; 4] = [0x49, 0x49, 0x2A, 0x00];
/// Motorola byte order header: `MM\0*`.
pub const TIFF_BIG_ENDIAN: [u8; 4] = [0x4D, 0x4D, 0x00, 0x2A];

#[derive(Debug, Clone, Copy, Default)]
pub struct TiffDetector;

const ASSERTIONS: &[Assertion<TiffDetector>] = &[Assertion {
    name: "signature",
    check: check_signature,
}];

fn check_signature(_: &TiffDetector, data: &[u8], rec: &mut Recorder<'_>) {
    let view = HexView::new(data);
    if view.matches(0, &TIFF_LITTLE_ENDIAN) {
        rec.pass("TIFF header signature present (little-endian, Intel)");
    } else if view.matches(0, &TIFF_BIG_ENDIAN) {
        rec.pass("TIFF header signature present (big-endian, Motorola)");
    } else {
        let head = &data[..data.len().min(4)];
        rec.fail(format!(
            "TIFF header signature missing: expected 49492A00 or 4D4D002A, found {}",
            describe_bytes(head)
        ));
    }
}

impl Detector for TiffDetector {
    fn name(&self) -> &'static str {
        "tiff"
    }

    fn validate(&self, data: &[u8]) -> ValidationReport {
        run_assertions(self, ASSERTIONS, data)
    }
}
