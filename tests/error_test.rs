//! Error handling across the CLI surface

use std::path::Path;
use swiftclaim::error::SwiftClaimError;
use swiftclaim::scanner;
use tempfile::tempdir;

#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, SwiftClaimError::FolderNotFound(_)));
}

#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_folder(dir.path());

    // An empty folder is an empty Vec, not an error
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("claim.json"), "{}").unwrap();

    let result = scanner::scan_folder(dir.path());
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

#[test]
fn test_error_display() {
    let errors = vec![
        SwiftClaimError::Config("bad setting".to_string()),
        SwiftClaimError::FileNotFound("receipt.jpg".to_string()),
        SwiftClaimError::FolderNotFound("/path/to/folder".to_string()),
        SwiftClaimError::ClassifyTimeout(120),
        SwiftClaimError::ClassifyParse("no JSON".to_string()),
        SwiftClaimError::PdfGeneration("draw failed".to_string()),
        SwiftClaimError::ExcelGeneration("write failed".to_string()),
        SwiftClaimError::InvalidClaimFile("entries missing".to_string()),
        SwiftClaimError::NoImagesFound("folder".to_string()),
        SwiftClaimError::CliExecution("spawn failed".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "empty error message: {:?}", err);
    }
}

#[test]
fn test_timeout_message_includes_seconds() {
    let err = SwiftClaimError::ClassifyTimeout(45);
    assert!(format!("{}", err).contains("45"));
}

#[test]
fn test_error_debug() {
    let err = SwiftClaimError::Config("oops".to_string());
    let debug = format!("{:?}", err);

    assert!(debug.contains("Config"));
    assert!(debug.contains("oops"));
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: SwiftClaimError = io_err.into();

    assert!(matches!(err, SwiftClaimError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: SwiftClaimError = json_err.into();

    assert!(matches!(err, SwiftClaimError::JsonParse(_)));
}

#[test]
fn test_common_error_conversion() {
    let common_err = swiftclaim_common::Error::Parse("parse failed".to_string());
    let err: SwiftClaimError = common_err.into();

    assert!(matches!(err, SwiftClaimError::Common(_)));
}

#[test]
fn test_common_error_transparent_display() {
    let common_err = swiftclaim_common::Error::Image("decode failed".to_string());
    let err: SwiftClaimError = common_err.into();

    // Transparent variant, the inner message passes through
    let display = format!("{}", err);
    assert!(display.contains("decode failed"));
}
