#![no_main]

use libfuzzer_sys::fuzz_target;
use mediacheck::{decode_int, Endianness, HexView};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = decode_int(text, Endianness::Little);
        let _ = decode_int(text, Endianness::Big);
    }

    let view = HexView::new(data);
    for offset in 0..data.len().min(64) {
        let _ = view.read_u16(offset, Endianness::Little);
        let _ = view.read_u32(offset, Endianness::Big);
    }
});
