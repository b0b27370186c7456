//! RIFF/WAVE canonical 44-byte header checks.
//!
//! Layout (all integers little-endian):
//!
//! | offset | width | field |
//! |---|---|---|
//! | 0 | 4 | `RIFF` |
//! | 4 | 4 | chunk size |
//! | 8 | 4 | `WAVE` |
//! | 12 | 4 | `fmt ` |
//! | 22 | 2 | channels |
//! | 24 | 4 | sample rate |
//! | 28 | 4 | byte rate |
//! | 32 | 2 | block align |
//! | 34 | 2 | bits per sample |
//! | 36 | 4 | `data` |
//! | 40 | 4 | data size |

use super::{run_assertions, Assertion, Detector, Recorder};
use crate::codec::{Endianness, FieldError, HexView};
use crate::types::ValidationReport;

pub const WAV_HEADER_LEN: usize = 44;
/// Bytes of header counted by the RIFF chunk size besides the sample data.
pub const RIFF_HEADER_OVERHEAD: u64 = 36;

const RIFF_ID: &[u8; 4] = b"RIFF";
const WAVE_ID: &[u8; 4] = b"WAVE";
const FMT_ID: &[u8; 4] = b"fmt ";
const DATA_ID: &[u8; 4] = b"data";

const CHUNK_SIZE_OFFSET: usize = 4;
const WAVE_OFFSET: usize = 8;
const FMT_OFFSET: usize = 12;
const CHANNELS_OFFSET: usize = 22;
const SAMPLE_RATE_OFFSET: usize = 24;
const BYTE_RATE_OFFSET: usize = 28;
const BLOCK_ALIGN_OFFSET: usize = 32;
const BITS_PER_SAMPLE_OFFSET: usize = 34;
const DATA_OFFSET: usize = 36;
const DATA_SIZE_OFFSET: usize = 40;

#[derive(Debug, Clone, Copy, Default)]
pub struct WavDetector;

const ASSERTIONS: &[Assertion<WavDetector>] = &[
    Assertion {
        name: "signature",
        check: check_signature,
    },
    Assertion {
        name: "chunk_size",
        check: check_chunk_size,
    },
    Assertion {
        name: "fmt_subchunk",
        check: check_fmt_subchunk,
    },
    Assertion {
        name: "byte_rate",
        check: check_byte_rate,
    },
    Assertion {
        name: "block_align",
        check: check_block_align,
    },
    Assertion {
        name: "data_subchunk",
        check: check_data_subchunk,
    },
];

/// Sample bytes following the canonical header.
fn sample_bytes(data: &[u8]) -> u64 {
    data.len().saturating_sub(WAV_HEADER_LEN) as u64
}

struct Format {
    channels: u64,
    sample_rate: u64,
    bytes_per_sample: u64,
}

impl Format {
    fn read(view: &HexView<'_>) -> Result<Self, FieldError> {
        let channels = view.read_u16(CHANNELS_OFFSET, Endianness::Little)?;
        let sample_rate = view.read_u32(SAMPLE_RATE_OFFSET, Endianness::Little)?;
        let bits = view.read_u16(BITS_PER_SAMPLE_OFFSET, Endianness::Little)?;
        Ok(Self {
            channels: u64::from(channels),
            sample_rate: u64::from(sample_rate),
            bytes_per_sample: u64::from(bits / 8),
        })
    }
}

fn check_signature(_: &WavDetector, data: &[u8], rec: &mut Recorder<'_>) {
    let view = HexView::new(data);
    let riff = view.matches(0, RIFF_ID);
    let wave = view.matches(WAVE_OFFSET, WAVE_ID);
    match (riff, wave) {
        (true, true) => rec.pass("WAV signature RIFF....WAVE present"),
        (false, _) => rec.fail("WAV signature missing: RIFF not found at byte 0"),
        (true, false) => rec.fail("WAV signature missing: WAVE not found at byte 8"),
    }
}

fn check_chunk_size(_: &WavDetector, data: &[u8], rec: &mut Recorder<'_>) {
    let view = HexView::new(data);
    match view.read_u32(CHUNK_SIZE_OFFSET, Endianness::Little) {
        Ok(declared) => {
            let expected = RIFF_HEADER_OVERHEAD + sample_bytes(data);
            rec.check(
                u64::from(declared) == expected && data.len() >= WAV_HEADER_LEN,
                format!("WAV chunk size declared {declared}, expected {expected}"),
            );
        }
        Err(err) => rec.unreadable("WAV chunk size", err),
    }
}

fn check_fmt_subchunk(_: &WavDetector, data: &[u8], rec: &mut Recorder<'_>) {
    if HexView::new(data).matches(FMT_OFFSET, FMT_ID) {
        rec.pass("WAV fmt subchunk present at byte 12");
    } else {
        rec.fail("WAV fmt subchunk missing at byte 12");
    }
}

fn check_byte_rate(_: &WavDetector, data: &[u8], rec: &mut Recorder<'_>) {
    let view = HexView::new(data);
    let result = Format::read(&view).and_then(|format| {
        let declared = view.read_u32(BYTE_RATE_OFFSET, Endianness::Little)?;
        Ok((format, declared))
    });

    match result {
        Ok((format, declared)) => {
            let expected = format.sample_rate * format.channels * format.bytes_per_sample;
            rec.check(
                u64::from(declared) == expected,
                format!("WAV byte rate declared {declared}, expected {expected}"),
            );
        }
        Err(err) => rec.unreadable("WAV byte rate", err),
    }
}

fn check_block_align(_: &WavDetector, data: &[u8], rec: &mut Recorder<'_>) {
    let view = HexView::new(data);
    let result = Format::read(&view).and_then(|format| {
        let declared = view.read_u16(BLOCK_ALIGN_OFFSET, Endianness::Little)?;
        Ok((format, declared))
    });

    match result {
        Ok((format, declared)) => {
            let expected = format.channels * format.bytes_per_sample;
            rec.check(
                u64::from(declared) == expected,
                format!("WAV block align declared {declared}, expected {expected}"),
            );
        }
        Err(err) => rec.unreadable("WAV block align", err),
    }
}

fn check_data_subchunk(_: &WavDetector, data: &[u8], rec: &mut Recorder<'_>) {
    let view = HexView::new(data);
    if !view.matches(DATA_OFFSET, DATA_ID) {
        rec.fail("WAV data subchunk missing at byte 36");
        return;
    }

    match view.read_u32(DATA_SIZE_OFFSET, Endianness::Little) {
        Ok(declared) => {
            let actual = sample_bytes(data);
            rec.check(
                u64::from(declared) == actual,
                format!("WAV data subchunk declares {declared} bytes, {actual} present"),
            );
        }
        Err(err) => rec.unreadable("WAV data size", err),
    }
}

impl Detector for WavDetector {
    fn name(&self) -> &'static str {
        "wav"
    }

    fn validate(&self, data: &[u8]) -> ValidationReport {
        run_assertions(self, ASSERTIONS, data)
    }
}
