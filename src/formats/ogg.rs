use std::sync::LazyLock;

use aho_corasick::AhoCorasick;

use super::{count_occurrences, run_assertions, Assertion, Detector, Recorder};
use crate::types::ValidationReport;

pub const PAGE_MARKER: &[u8] = b"OggS";
pub const THEORA_MARKER: &[u8] = b"theora";
pub const VORBIS_MARKER: &[u8] = b"vorbis";

const MARKERS: [&[u8]; 3] = [PAGE_MARKER, THEORA_MARKER, VORBIS_MARKER];

static MARKER_MATCHER: LazyLock<Option<AhoCorasick>> =
    LazyLock::new(|| AhoCorasick::new(MARKERS).ok());

/// Occurrence counts of the page, Theora and Vorbis markers, in that order.
pub fn marker_counts(data: &[u8]) -> [usize; 3] {
    let mut counts = [0usize; 3];
    match MARKER_MATCHER.as_ref() {
        Some(matcher) => {
            for mat in matcher.find_iter(data) {
                counts[mat.pattern().as_usize()] += 1;
            }
        }
        None => {
            for (count, marker) in counts.iter_mut().zip(MARKERS) {
                *count = count_occurrences(data, marker);
            }
        }
    }
    counts
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OggDetector;

const ASSERTIONS: &[Assertion<OggDetector>] = &[
    Assertion {
        name: "pages",
        check: check_pages,
    },
    Assertion {
        name: "theora",
        check: check_theora,
    },
    Assertion {
        name: "vorbis",
        check: check_vorbis,
    },
];

fn check_pages(_: &OggDetector, data: &[u8], rec: &mut Recorder<'_>) {
    let [pages, _, _] = marker_counts(data);
    rec.check(pages > 0, format!("OGG stream contains {pages} OggS page markers"));
}

fn check_theora(_: &OggDetector, data: &[u8], rec: &mut Recorder<'_>) {
    let [_, theora, _] = marker_counts(data);
    rec.check(theora > 0, format!("OGG stream contains {theora} theora markers"));
}

fn check_vorbis(_: &OggDetector, data: &[u8], rec: &mut Recorder<'_>) {
    let [_, _, vorbis] = marker_counts(data);
    rec.check(vorbis > 0, format!("OGG stream contains {vorbis} vorbis markers"));
}

impl Detector for OggDetector {
    fn name(&self) -> &'static str {
        "ogg"
    }

    fn validate(&self, data: &[u8]) -> ValidationReport {
        run_assertions(self, ASSERTIONS, data)
    }
}
