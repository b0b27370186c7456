use super::{count_occurrences, describe_bytes, run_assertions, Assertion, Detector, Recorder};
use crate::codec::HexView;
use crate::types::ValidationReport;

/// EBML header element ID.
pub const EBML_SIGNATURE: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];
pub const MATROSKA_DOCTYPE: &[u8] = b"matroska";

#[derive(Debug, Clone, Copy, Default)]
pub struct MkvDetector;

const ASSERTIONS: &[Assertion<MkvDetector>] = &[
    Assertion {
        name: "ebml_signature",
        check: check_ebml_signature,
    },
    Assertion {
        name: "doctype",
        check: check_doctype,
    },
];

fn check_ebml_signature(_: &MkvDetector, data: &[u8], rec: &mut Recorder<'_>) {
    if HexView::new(data).matches(0, &EBML_SIGNATURE) {
        rec.pass("EBML header signature 1A45DFA3 present");
    } else {
        rec.fail(format!(
            "EBML header signature missing: expected 1A45DFA3, found {}",
            describe_bytes(&data[..data.len().min(EBML_SIGNATURE.len())])
        ));
    }
}

fn check_doctype(_: &MkvDetector, data: &[u8], rec: &mut Recorder<'_>) {
    let count = count_occurrences(data, MATROSKA_DOCTYPE);
    rec.check(
        count == 1,
        format!("Matroska doctype marker occurs {count} times, expected exactly 1"),
    );
}

impl Detector for MkvDetector {
    fn name(&self) -> &'static str {
        "mkv"
    }

    fn validate(&self, data: &[u8]) -> ValidationReport {
        run_assertions(self, ASSERTIONS, data)
    }
}
