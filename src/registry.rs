//! Format tag to detector dispatch.
//!
//! Each [`FormatTag`] maps to a fixed list of [`DetectorKind`]s. Datastream
//! labels may be given as short names or MIME types; an unrecognised label is
//! an error, never an empty detector list.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::Result;
use crate::formats::{
    Detector, ImageDetector, Jp2Detector, MkvDetector, Mp3Detector, Mp4Detector, OggDetector,
    PdfDetector, TextOccurrenceDetector, TiffDetector, WavDetector,
};
use crate::types::{DetectorParameters, FormatTag};

/// Constructor for one detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectorKind {
    Tiff,
    Jp2,
    Pdf,
    Wav,
    Mp3,
    Mp4,
    Ogg,
    Mkv,
    Image,
    TextOccurrence,
}

impl DetectorKind {
    pub fn name(&self) -> &'static str {
        match self {
            DetectorKind::Tiff => "tiff",
            DetectorKind::Jp2 => "jp2",
            DetectorKind::Pdf => "pdf",
            DetectorKind::Wav => "wav",
            DetectorKind::Mp3 => "mp3",
            DetectorKind::Mp4 => "mp4",
            DetectorKind::Ogg => "ogg",
            DetectorKind::Mkv => "mkv",
            DetectorKind::Image => "image",
            DetectorKind::TextOccurrence => "text",
        }
    }

    pub fn requires_parameters(&self) -> bool {
        matches!(self, DetectorKind::TextOccurrence)
    }

    /// Constructs the detector, validating `params` first.
    pub fn build(&self, params: &DetectorParameters) -> Result<Box<dyn Detector>> {
        let detector: Box<dyn Detector> = match self {
            DetectorKind::Tiff => Box::new(TiffDetector),
            DetectorKind::Jp2 => Box::new(Jp2Detector),
            DetectorKind::Pdf => Box::new(PdfDetector),
            DetectorKind::Wav => Box::new(WavDetector),
            DetectorKind::Mp3 => Box::new(Mp3Detector),
            DetectorKind::Mp4 => Box::new(Mp4Detector),
            DetectorKind::Ogg => Box::new(OggDetector),
            DetectorKind::Mkv => Box::new(MkvDetector),
            DetectorKind::Image => Box::new(ImageDetector),
            DetectorKind::TextOccurrence => {
                Box::new(TextOccurrenceDetector::from_parameters(params)?)
            }
        };
        Ok(detector)
    }
}

/// Detectors run for `tag`, in execution order.
pub fn resolve_tag(tag: FormatTag) -> &'static [DetectorKind] {
    match tag {
        FormatTag::Tiff => &[DetectorKind::Tiff],
        FormatTag::Jp2 => &[DetectorKind::Jp2],
        FormatTag::Pdf => &[DetectorKind::Pdf],
        FormatTag::Wav => &[DetectorKind::Wav],
        FormatTag::Mp3 => &[DetectorKind::Mp3],
        FormatTag::Mp4 => &[DetectorKind::Mp4],
        FormatTag::Ogg => &[DetectorKind::Ogg],
        FormatTag::Mkv => &[DetectorKind::Mkv],
        FormatTag::Image => &[DetectorKind::Image],
        FormatTag::Text => &[DetectorKind::TextOccurrence],
    }
}

/// Resolves a short name or MIME type using the built-in tables.
pub fn resolve(label: &str) -> Result<&'static [DetectorKind]> {
    Registry::default().resolve(label)
}

/// Builds every detector in `kinds`; nothing is returned unless all succeed.
pub fn build_detectors(
    kinds: &[DetectorKind],
    params: &DetectorParameters,
) -> Result<Vec<Box<dyn Detector>>> {
    kinds.iter().map(|kind| kind.build(params)).collect()
}

const MIME_TABLE: &[(&str, FormatTag)] = &[
    ("image/tiff", FormatTag::Tiff),
    ("image/tif", FormatTag::Tiff),
    ("image/jp2", FormatTag::Jp2),
    ("image/jpx", FormatTag::Jp2),
    ("application/pdf", FormatTag::Pdf),
    ("audio/wav", FormatTag::Wav),
    ("audio/x-wav", FormatTag::Wav),
    ("audio/vnd.wave", FormatTag::Wav),
    ("audio/mpeg", FormatTag::Mp3),
    ("audio/mp3", FormatTag::Mp3),
    ("video/mp4", FormatTag::Mp4),
    ("audio/mp4", FormatTag::Mp4),
    ("video/ogg", FormatTag::Ogg),
    ("audio/ogg", FormatTag::Ogg),
    ("video/x-matroska", FormatTag::Mkv),
    ("audio/x-matroska", FormatTag::Mkv),
    ("image/jpeg", FormatTag::Image),
    ("image/png", FormatTag::Image),
    ("image/gif", FormatTag::Image),
    ("image/bmp", FormatTag::Image),
    ("image/webp", FormatTag::Image),
    ("text/plain", FormatTag::Text),
];

/// Strips MIME parameters and case: `Audio/WAV; codecs=1` becomes `audio/wav`.
fn normalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn tag_for_mime(mime: &str) -> Option<FormatTag> {
    let key = normalize_mime(mime);
    MIME_TABLE
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, tag)| *tag)
}

pub fn mime_types(tag: FormatTag) -> impl Iterator<Item = &'static str> {
    MIME_TABLE
        .iter()
        .filter(move |(_, candidate)| *candidate == tag)
        .map(|(mime, _)| *mime)
}

/// Label lookup with caller-supplied MIME overrides layered over the built-in table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    overrides: BTreeMap<String, FormatTag>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a FormatTag)>,
    {
        let mut registry = Self::new();
        for (mime, tag) in overrides {
            registry.register(mime, *tag);
        }
        registry
    }

    pub fn register(&mut self, mime: &str, tag: FormatTag) {
        self.overrides.insert(normalize_mime(mime), tag);
    }

    pub fn lookup(&self, label: &str) -> Result<FormatTag> {
        if let Some(tag) = self.overrides.get(&normalize_mime(label)) {
            return Ok(*tag);
        }
        label.parse::<FormatTag>().inspect_err(|_| {
            warn!(label, "no detector registered for format");
        })
    }

    pub fn resolve(&self, label: &str) -> Result<&'static [DetectorKind]> {
        self.lookup(label).map(resolve_tag)
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl From<DetectorKind> for FormatTag {
    fn from(kind: DetectorKind) -> Self {
        match kind {
            DetectorKind::Tiff => FormatTag::Tiff,
            DetectorKind::Jp2 => FormatTag::Jp2,
            DetectorKind::Pdf => FormatTag::Pdf,
            DetectorKind::Wav => FormatTag::Wav,
            DetectorKind::Mp3 => FormatTag::Mp3,
            DetectorKind::Mp4 => FormatTag::Mp4,
            DetectorKind::Ogg => FormatTag::Ogg,
            DetectorKind::Mkv => FormatTag::Mkv,
            DetectorKind::Image => FormatTag::Image,
            DetectorKind::TextOccurrence => FormatTag::Text,
        }
    }
}
