use super::{describe_bytes, run_assertions, Assertion, Detector, Recorder};
use crate::codec::HexView;
use crate::types::ValidationReport;

/// `jP  ` signature box type, at byte 4.
pub const JP2_SIGNATURE_BOX: [u8; 4] = [0x6A, 0x50, 0x20, 0x20];
pub const JP2_SIGNATURE_OFFSET: usize = 4;
/// End-of-codestream marker expected in the final two bytes.
pub const JP2_END_MARKER: [u8; 2] = [0xFF, 0xD9];

#[derive(Debug, Clone, Copy, Default)]
pub struct Jp2Detector;

const ASSERTIONS: &[Assertion<Jp2Detector>] = &[
    Assertion {
        name: "signature_box",
        check: check_signature_box,
    },
    Assertion {
        name: "end_marker",
        check: check_end_marker,
    },
];

fn check_signature_box(_: &Jp2Detector, data: &[u8], rec: &mut Recorder<'_>) {
    let view = HexView::new(data);
    match view.field(JP2_SIGNATURE_OFFSET, JP2_SIGNATURE_BOX.len()) {
        Ok(_) if view.matches(JP2_SIGNATURE_OFFSET, &JP2_SIGNATURE_BOX) => {
            rec.pass("JP2 signature box present at byte 4");
        }
        Ok(found) => rec.fail(format!(
            "JP2 signature box missing: expected 6A502020 at byte 4, found {}",
            found.to_uppercase()
        )),
        Err(err) => rec.unreadable("JP2 signature box", err),
    }
}

fn check_end_marker(_: &Jp2Detector, data: &[u8], rec: &mut Recorder<'_>) {
    let Some(tail_start) = data.len().checked_sub(JP2_END_MARKER.len()) else {
        rec.fail(format!(
            "JP2 end marker missing: buffer of {} bytes cannot hold FFD9",
            data.len()
        ));
        return;
    };

    let tail = &data[tail_start..];
    if tail == JP2_END_MARKER {
        rec.pass("JP2 codestream ends with FFD9");
    } else {
        rec.fail(format!(
            "JP2 end marker missing: expected FFD9, found {}",
            describe_bytes(tail)
        ));
    }
}

impl Detector for Jp2Detector {
    fn name(&self) -> &'static str {
        "jp2"
    }

    fn validate(&self, data: &[u8]) -> ValidationReport {
        run_assertions(self, ASSERTIONS, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;

    fn minimal_jp2() -> Vec<u8> {
        let mut data = vec![0x00, 0x00, 0x00, 0x0C];
        data.extend_from_slice(&JP2_SIGNATURE_BOX);
        data.extend_from_slice(&[0x0D, 0x0A, 0x87, 0x0A, 0x00, 0x11, 0x22]);
        data.extend_from_slice(&JP2_END_MARKER);
        data
    }

    #[test]
    fn test_well_formed_passes_both() {
        let report = Jp2Detector.validate(&minimal_jp2());
        assert_eq!(report.len(), 2);
        assert!(report.passed());
    }

    #[test]
    fn test_truncated_tail_fails_marker_only() {
        let mut data = minimal_jp2();
        data.truncate(data.len() - 2);
        let report = Jp2Detector.validate(&data);
        let outcomes: Vec<_> = report.findings().iter().map(|f| f.outcome).collect();
        assert_eq!(outcomes, vec![Outcome::Pass, Outcome::Fail]);
    }

    #[test]
    fn test_tiny_buffer_fails_both() {
        let report = Jp2Detector.validate(&[0xFF]);
        assert_eq!(report.len(), 2);
        assert_eq!(report.fails(), 2);
    }
}
