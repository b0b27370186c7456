use mediacheck::formats::{
    Jp2Detector, MkvDetector, Mp3Detector, Mp4Detector, OggDetector, PdfDetector,
    TextOccurrenceDetector, TiffDetector,
};
use mediacheck::{Detector, DetectorParameters, Outcome, ValidatorError};
use rstest::*;

fn outcomes(report: &mediacheck::ValidationReport) -> Vec<Outcome> {
    report.findings().iter().map(|f| f.outcome).collect()
}

// ============================================================================
// TIFF
// ============================================================================

#[rstest]
#[case(&[0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00], Outcome::Pass)]
#[case(&[0x4D, 0x4D, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08], Outcome::Pass)]
#[case(&[0x00, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00], Outcome::Fail)]
#[case(&[0x49, 0x49, 0x00, 0x2A], Outcome::Fail)]
#[case(&[0x49], Outcome::Fail)]
fn test_tiff_signature(#[case] data: &[u8], #[case] expected: Outcome) {
    let report = TiffDetector.validate(data);
    assert_eq!(outcomes(&report), vec![expected]);
}

// ============================================================================
// JP2
// ============================================================================

#[fixture]
fn jp2() -> Vec<u8> {
    let mut data = b"XXXX".to_vec();
    data.extend_from_slice(&[0x6A, 0x50, 0x20, 0x20]);
    data.extend_from_slice(b"arbitrary middle section of the codestream");
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

#[rstest]
fn test_jp2_well_formed(jp2: Vec<u8>) {
    assert_eq!(outcomes(&Jp2Detector.validate(&jp2)), vec![Outcome::Pass, Outcome::Pass]);
}

#[rstest]
fn test_jp2_truncated_tail(mut jp2: Vec<u8>) {
    jp2.truncate(jp2.len() - 2);
    assert_eq!(outcomes(&Jp2Detector.validate(&jp2)), vec![Outcome::Pass, Outcome::Fail]);
}

// ============================================================================
// PDF
// ============================================================================

#[rstest]
#[case(b"%PDF-1.4\nstream\nq\nendstream\n%%EOF\n", vec![Outcome::Pass, Outcome::Pass, Outcome::Pass])]
#[case(b"%PDF-1.4\nendobj\n%%EOF\n", vec![Outcome::Pass, Outcome::Fail, Outcome::Pass])]
#[case(b"%!PS-Adobe\nstream\n\n%%EOF\n", vec![Outcome::Fail, Outcome::Pass, Outcome::Pass])]
#[case(b"%PDF-1.4\nstream\n%%EOF", vec![Outcome::Pass, Outcome::Pass, Outcome::Fail])]
fn test_pdf(#[case] data: &[u8], #[case] expected: Vec<Outcome>) {
    assert_eq!(outcomes(&PdfDetector.validate(data)), expected);
}

// ============================================================================
// MP3 / MP4 / OGG / MKV
// ============================================================================

#[rstest]
#[case(&[0xFF, 0xFB, 0x90, 0x44], Outcome::Pass)]
#[case(&[0xFF, 0xFA, 0x90, 0x44], Outcome::Pass)]
#[case(&[0xFF, 0xF3, 0x90, 0x44], Outcome::Fail)]
#[case(b"ID3\x03", Outcome::Fail)]
fn test_mp3_without_vbr_header(#[case] data: &[u8], #[case] expected: Outcome) {
    assert_eq!(outcomes(&Mp3Detector.validate(data)), vec![expected]);
}

#[rstest]
#[case(b"\x00\x00\x00\x20ftypmp42", Outcome::Pass)]
#[case(b"ftypmp42\x00\x00\x00\x00", Outcome::Fail)]
#[case(b"\x00\x00\x00\x08free", Outcome::Fail)]
fn test_mp4_ftyp(#[case] data: &[u8], #[case] expected: Outcome) {
    assert_eq!(outcomes(&Mp4Detector.validate(data)), vec![expected]);
}

#[test]
fn test_ogg_markers_are_independent() {
    let report = OggDetector.validate(b"OggS\x00\x02\x80theora");
    assert_eq!(
        outcomes(&report),
        vec![Outcome::Pass, Outcome::Pass, Outcome::Fail]
    );
}

#[test]
fn test_mkv() {
    let mut data = vec![0x1A, 0x45, 0xDF, 0xA3, 0xA3, 0x42, 0x82, 0x88];
    data.extend_from_slice(b"matroska");
    assert!(MkvDetector.validate(&data).passed());
}

// ============================================================================
// Text occurrence
// ============================================================================

#[rstest]
#[case(DetectorParameters::new())]
#[case(DetectorParameters::new().with("needle", "cat"))]
#[case(DetectorParameters::new().with("count", "3"))]
fn test_text_requires_two_parameters(#[case] params: DetectorParameters) {
    assert!(matches!(
        TextOccurrenceDetector::from_parameters(&params),
        Err(ValidatorError::MissingParameters { required: 2, .. })
    ));
}

#[rstest]
#[case(b"the cat sat on the cat mat with a cat", Outcome::Pass)]
#[case(b"the cat sat on the cat mat", Outcome::Fail)]
fn test_text_occurrence(#[case] data: &[u8], #[case] expected: Outcome) {
    let params = DetectorParameters::new().with("needle", "cat").with("count", "3");
    let detector = TextOccurrenceDetector::from_parameters(&params).unwrap();
    let report = detector.validate(data);
    assert_eq!(outcomes(&report), vec![expected]);
    if expected == Outcome::Fail {
        assert!(report.findings()[0].message.contains("occurs 2 times"));
    }
}
