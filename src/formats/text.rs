use super::{count_occurrences, run_assertions, Assertion, Detector, Recorder};
use crate::error::{Result, ValidatorError};
use crate::types::{DetectorParameters, ValidationReport};

pub const NEEDLE_PARAM: &str = "needle";
pub const COUNT_PARAM: &str = "count";
const REQUIRED_PARAMS: usize = 2;

/// Asserts that a substring occurs an exact number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOccurrenceDetector {
    needle: String,
    expected: usize,
}

const ASSERTIONS: &[Assertion<TextOccurrenceDetector>] = &[Assertion {
    name: "occurrences",
    check: check_occurrences,
}];

impl TextOccurrenceDetector {
    pub fn new(needle: impl Into<String>, expected: usize) -> Result<Self> {
        let needle = needle.into();
        if needle.is_empty() {
            return Err(ValidatorError::InvalidParameter {
                name: NEEDLE_PARAM.to_string(),
                value: needle,
            });
        }
        Ok(Self { needle, expected })
    }

    /// Builds the detector from `needle` and `count` parameters.
    ///
    /// Fails before anything is validated when either is absent.
    pub fn from_parameters(params: &DetectorParameters) -> Result<Self> {
        let (Some(needle), Some(count)) = (params.get(NEEDLE_PARAM), params.get(COUNT_PARAM)) else {
            let supplied = [NEEDLE_PARAM, COUNT_PARAM]
                .iter()
                .filter(|name| params.get(name).is_some())
                .count();
            return Err(ValidatorError::MissingParameters {
                detector: "text",
                required: REQUIRED_PARAMS,
                supplied,
            });
        };

        let expected = count
            .trim()
            .parse::<usize>()
            .map_err(|_| ValidatorError::InvalidParameter {
                name: COUNT_PARAM.to_string(),
                value: count.to_string(),
            })?;

        Self::new(needle, expected)
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn expected(&self) -> usize {
        self.expected
    }
}

fn check_occurrences(detector: &TextOccurrenceDetector, data: &[u8], rec: &mut Recorder<'_>) {
    let actual = count_occurrences(data, detector.needle.as_bytes());
    rec.check(
        actual == detector.expected,
        format!(
            "{:?} occurs {actual} times, expected {}",
            detector.needle, detector.expected
        ),
    );
}

impl Detector for TextOccurrenceDetector {
    fn name(&self) -> &'static str {
        "text"
    }

    fn validate(&self, data: &[u8]) -> ValidationReport {
        run_assertions(self, ASSERTIONS, data)
    }
}
