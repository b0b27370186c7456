use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidatorError;
use crate::registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::Fail => "FAIL",
        }
    }
}

/// Identifies the assertion that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Origin {
    pub detector: &'static str,
    pub assertion: &'static str,
}

impl Origin {
    pub const fn new(detector: &'static str, assertion: &'static str) -> Self {
        Self {
            detector,
            assertion,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.detector, self.assertion)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub outcome: Outcome,
    pub message: String,
    pub origin: Origin,
}

impl Finding {
    pub fn pass(origin: Origin, message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Pass,
            message: message.into(),
            origin,
        }
    }

    pub fn fail(origin: Origin, message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail,
            message: message.into(),
            origin,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.outcome == Outcome::Pass
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.outcome.label(), self.origin, self.message)
    }
}

/// Ordered findings from one detector run or one aggregate run.
///
/// Findings keep the order in which their assertions executed. Nothing in the
/// crate sorts or deduplicates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub(crate) fn append(&mut self, other: ValidationReport) {
        self.findings.extend(other.findings);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn passes(&self) -> usize {
        self.findings.iter().filter(|f| f.is_pass()).count()
    }

    pub fn fails(&self) -> usize {
        self.findings.len() - self.passes()
    }

    /// True when the report holds findings and none of them failed.
    pub fn passed(&self) -> bool {
        !self.findings.is_empty() && self.fails() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_pass())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} findings: {} passed, {} failed",
            self.len(),
            self.passes(),
            self.fails()
        )
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{finding}")?;
        }
        write!(f, "{}", self.summary())
    }
}

impl IntoIterator for ValidationReport {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.iter()
    }
}

/// Format selector for a datastream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Tiff,
    Jp2,
    Pdf,
    Wav,
    Mp3,
    Mp4,
    Ogg,
    Mkv,
    #[serde(alias = "generic-image")]
    Image,
    Text,
}

impl FormatTag {
    pub const ALL: [FormatTag; 10] = [
        FormatTag::Tiff,
        FormatTag::Jp2,
        FormatTag::Pdf,
        FormatTag::Wav,
        FormatTag::Mp3,
        FormatTag::Mp4,
        FormatTag::Ogg,
        FormatTag::Mkv,
        FormatTag::Image,
        FormatTag::Text,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FormatTag::Tiff => "TIFF",
            FormatTag::Jp2 => "JP2",
            FormatTag::Pdf => "PDF",
            FormatTag::Wav => "WAV",
            FormatTag::Mp3 => "MP3",
            FormatTag::Mp4 => "MP4",
            FormatTag::Ogg => "OGG",
            FormatTag::Mkv => "MKV",
            FormatTag::Image => "IMAGE",
            FormatTag::Text => "TEXT",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for FormatTag {
    type Err = ValidatorError;

    /// Accepts short names (`PDF`, `jp2`, `generic-image`) and MIME types.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let tag = match key.as_str() {
            "tiff" | "tif" => FormatTag::Tiff,
            "jp2" | "jpeg2000" => FormatTag::Jp2,
            "pdf" => FormatTag::Pdf,
            "wav" | "wave" => FormatTag::Wav,
            "mp3" => FormatTag::Mp3,
            "mp4" => FormatTag::Mp4,
            "ogg" => FormatTag::Ogg,
            "mkv" | "matroska" => FormatTag::Mkv,
            "image" | "generic-image" => FormatTag::Image,
            "text" => FormatTag::Text,
            _ => return registry::tag_for_mime(&key).ok_or(ValidatorError::UnknownFormat(s.to_string())),
        };
        Ok(tag)
    }
}

/// Named parameters handed to a detector at construction time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectorParameters {
    values: BTreeMap<String, String>,
}

impl DetectorParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses `name=value` pairs, as given on the command line.
    pub fn parse_pairs<'a, I>(pairs: I) -> Result<Self, ValidatorError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut params = Self::new();
        for pair in pairs {
            let (name, value) = pair.split_once('=').ok_or_else(|| ValidatorError::InvalidParameter {
                name: pair.to_string(),
                value: String::new(),
            })?;
            params.insert(name.trim(), value);
        }
        Ok(params)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DetectorParameters {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Origin = Origin::new("test", "check");

    #[test]
    fn test_report_counts() {
        let mut report = ValidationReport::new();
        report.push(Finding::pass(ORIGIN, "ok"));
        report.push(Finding::fail(ORIGIN, "bad"));
        report.push(Finding::pass(ORIGIN, "ok again"));

        assert_eq!(report.len(), 3);
        assert_eq!(report.passes(), 2);
        assert_eq!(report.fails(), 1);
        assert!(!report.passed());
        assert_eq!(report.failures().next().unwrap().message, "bad");
    }

    #[test]
    fn test_empty_report_does_not_pass() {
        assert!(!ValidationReport::new().passed());
    }

    #[test]
    fn test_report_display() {
        let mut report = ValidationReport::new();
        report.push(Finding::fail(ORIGIN, "missing marker"));
        let text = report.to_string();
        assert!(text.starts_with("[FAIL] test::check: missing marker"));
        assert!(text.ends_with("1 findings: 0 passed, 1 failed"));
    }

    #[test]
    fn test_format_tag_names() {
        assert_eq!("PDF".parse::<FormatTag>().unwrap(), FormatTag::Pdf);
        assert_eq!(" tif ".parse::<FormatTag>().unwrap(), FormatTag::Tiff);
        assert_eq!("generic-image".parse::<FormatTag>().unwrap(), FormatTag::Image);
        assert!(matches!(
            "unknown-format".parse::<FormatTag>(),
            Err(ValidatorError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_parameters_from_pairs() {
        let params = DetectorParameters::parse_pairs(["needle=cat", "count=3"]).unwrap();
        assert_eq!(params.get("needle"), Some("cat"));
        assert_eq!(params.get("count"), Some("3"));
        assert!(DetectorParameters::parse_pairs(["oops"]).is_err());
    }
}
