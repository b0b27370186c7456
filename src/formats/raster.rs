use image::GenericImageView;

use super::{run_assertions, Assertion, Detector, Recorder};
use crate::types::ValidationReport;

/// Decodes the buffer as a raster image to prove it is not corrupt.
///
/// Supported containers are those enabled on the `image` dependency: JPEG,
/// PNG, GIF, BMP, TIFF and WebP.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDetector;

const ASSERTIONS: &[Assertion<ImageDetector>] = &[Assertion {
    name: "decode",
    check: check_decode,
}];

fn check_decode(_: &ImageDetector, data: &[u8], rec: &mut Recorder<'_>) {
    let format = match image::guess_format(data) {
        Ok(format) => format,
        Err(err) => {
            rec.fail(format!("Image format not recognised: {err}"));
            return;
        }
    };

    match image::load_from_memory_with_format(data, format) {
        Ok(img) => {
            let (width, height) = img.dimensions();
            rec.pass(format!("{format:?} image decoded, {width}x{height}"));
        }
        Err(err) => rec.fail(format!("{format:?} image is corrupt: {err}")),
    }
}

impl Detector for ImageDetector {
    fn name(&self) -> &'static str {
        "image"
    }

    fn validate(&self, data: &[u8]) -> ValidationReport {
        run_assertions(self, ASSERTIONS, data)
    }
}

/// Stands in for [`ImageDetector`] when decoding is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeDisabled;

const DISABLED_ASSERTIONS: &[Assertion<ProbeDisabled>] = &[Assertion {
    name: "decode",
    check: report_disabled,
}];

fn report_disabled(_: &ProbeDisabled, _: &[u8], rec: &mut Recorder<'_>) {
    rec.pass("image decode probe disabled by configuration");
}

impl Detector for ProbeDisabled {
    fn name(&self) -> &'static str {
        "image"
    }

    fn validate(&self, data: &[u8]) -> ValidationReport {
        run_assertions(self, DISABLED_ASSERTIONS, data)
    }
}
