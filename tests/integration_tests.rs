use std::fs;
use std::path::PathBuf;

use mediacheck::{
    DatastreamSource, DetectorParameters, DirectorySource, FormatTag, ValidationConfig, Validator,
};
use rstest::*;
use tempfile::TempDir;

// ============================================================================
// Fixtures
// ============================================================================

fn wav_bytes() -> Vec<u8> {
    let samples = [0u8; 64];
    let mut wav = Vec::new();
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + samples.len() as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&44_100u32.to_le_bytes());
    wav.extend_from_slice(&176_400u32.to_le_bytes());
    wav.extend_from_slice(&4u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(samples.len() as u32).to_le_bytes());
    wav.extend_from_slice(&samples);
    wav
}

/// A directory store with one audio object and one object lacking its OBJ.
#[fixture]
fn store() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();

    fs::create_dir(root.join("audio:1")).unwrap();
    fs::write(root.join("audio:1").join("OBJ"), wav_bytes()).unwrap();
    fs::write(root.join("audio:1").join("PROXY"), b"not audio").unwrap();

    fs::create_dir(root.join("audio:2")).unwrap();
    fs::write(root.join("audio:2").join("TN"), b"thumb").unwrap();

    (dir, root)
}

// ============================================================================
// Store-backed validation
// ============================================================================

#[rstest]
fn test_store_datastream_passes(store: (TempDir, PathBuf)) {
    let (_dir, root) = store;
    let source = DirectorySource::new(&root);
    let report = Validator::default()
        .validate_datastream(&source, "audio:1", None, "audio/wav", &DetectorParameters::new())
        .unwrap();

    assert_eq!(report.len(), 6);
    assert!(report.passed(), "{report}");
}

#[rstest]
fn test_store_named_datastream(store: (TempDir, PathBuf)) {
    let (_dir, root) = store;
    let source = DirectorySource::new(&root);
    let report = Validator::default()
        .validate_datastream(&source, "audio:1", Some("PROXY"), "WAV", &DetectorParameters::new())
        .unwrap();

    assert_eq!(report.len(), 6);
    assert!(!report.passed());
}

#[rstest]
#[case("audio:2")]
#[case("audio:404")]
fn test_store_missing_datastream(store: (TempDir, PathBuf), #[case] object: &str) {
    let (_dir, root) = store;
    let source = DirectorySource::new(&root);
    let report = Validator::default()
        .validate_datastream(&source, object, None, "WAV", &DetectorParameters::new())
        .unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.fails(), 1);
    assert!(report.findings()[0].message.contains("OBJ"));
}

#[rstest]
fn test_store_is_shareable(store: (TempDir, PathBuf)) {
    let (_dir, root) = store;
    let source: Box<dyn DatastreamSource> = Box::new(DirectorySource::new(&root));
    let validator = Validator::default();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let report = validator
                    .validate_datastream(
                        source.as_ref(),
                        "audio:1",
                        None,
                        "WAV",
                        &DetectorParameters::new(),
                    )
                    .unwrap();
                assert!(report.passed());
            });
        }
    });
}

// ============================================================================
// Configuration
// ============================================================================

#[rstest]
fn test_config_file_drives_validator(store: (TempDir, PathBuf)) {
    let (dir, root) = store;
    let config_path = dir.path().join("mediacheck.json");
    fs::write(
        &config_path,
        r#"{
            "datastream": "PROXY",
            "image_probe": false,
            "mime_overrides": { "application/x-riff": "wav" }
        }"#,
    )
    .unwrap();

    let config = ValidationConfig::from_json_file(&config_path).unwrap();
    assert_eq!(config.mime_overrides.get("application/x-riff"), Some(&FormatTag::Wav));

    let validator = Validator::new(config);
    let source = DirectorySource::new(&root);
    let report = validator
        .validate_datastream(&source, "audio:1", None, "application/x-riff", &DetectorParameters::new())
        .unwrap();
    assert!(!report.passed());

    let report = validator
        .validate("image/gif", &DetectorParameters::new(), Some(&b"GIF89a"[..]))
        .unwrap();
    assert!(report.passed());
}

#[test]
fn test_config_file_missing() {
    let dir = TempDir::new().unwrap();
    assert!(ValidationConfig::from_json_file(&dir.path().join("absent.json")).is_err());
}
