#![no_main]

use libfuzzer_sys::fuzz_target;
use mediacheck::registry::build_detectors;
use mediacheck::{aggregate, resolve, DetectorParameters, FormatTag};

fuzz_target!(|data: &[u8]| {
    let params = DetectorParameters::new().with("needle", "OggS").with("count", "1");
    for tag in FormatTag::ALL {
        let Ok(kinds) = resolve(tag.name()) else {
            continue;
        };
        let Ok(detectors) = build_detectors(kinds, &params) else {
            continue;
        };
        let report = aggregate(Some(data), "OBJ", &detectors);
        assert!(!report.is_empty());
    }
});
