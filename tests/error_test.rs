//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use prop_match_common::Error as CommonError;
use prop_match_rust::config::Config;
use prop_match_rust::converter::{PartDatabaseConverter, PropertyConverter, VirtualSatelliteConverter};
use prop_match_rust::error::PropMatchError;
use prop_match_rust::scanner;
use serde_json::json;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"), false);
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, PropMatchError::FolderNotFound(_)));
}

/// リクエストのないフォルダ
#[test]
fn test_collect_from_folder_without_requests() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();

    let result = scanner::collect_requests(&[dir.path().to_path_buf()], false);
    assert!(matches!(result, Err(PropMatchError::NoRequestsFound(_))));
}

/// 必須フィールドが欠けた入力は MalformedInput
#[test]
fn test_malformed_input_propagates() {
    let payload = json!({ "outputObjectData": [ { "name": "width" } ] });
    let err = VirtualSatelliteConverter.to_property_list(&payload).unwrap_err();
    assert!(matches!(err, PropMatchError::Common(CommonError::MalformedInput(_))));

    let err = PartDatabaseConverter.to_property_list(&json!({})).unwrap_err();
    assert!(matches!(err, PropMatchError::Common(CommonError::MalformedInput(_))));
}

/// 不正な設定は起動時エラー
#[test]
fn test_invalid_config_is_fatal() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("application.properties");
    std::fs::write(&path, "suggestionSize=abc\nminSimilarityValue=0.5\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, PropMatchError::Config(_)));
    assert!(err.is_fatal());
}

/// 共通エラーは透過的に表示される
#[test]
fn test_common_error_transparent() {
    let err: PropMatchError = CommonError::Ontology("om-2.0.rdf".into()).into();
    assert_eq!(err.to_string(), "Ontology error: om-2.0.rdf");
    assert!(err.is_fatal());

    let err: PropMatchError = CommonError::MalformedInput("x".into()).into();
    assert!(!err.is_fatal());
}

/// PropMatchErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        PropMatchError::Config("テスト設定エラー".to_string()),
        PropMatchError::FileNotFound("request.json".to_string()),
        PropMatchError::FolderNotFound("/path/to/folder".to_string()),
        PropMatchError::InvalidRequest("不正".to_string()),
        PropMatchError::NoRequestsFound("フォルダ".to_string()),
        PropMatchError::OutputConflict("out/a.matching.json".to_string()),
        PropMatchError::Store("保存失敗".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: PropMatchError = io_err.into();
    assert!(matches!(err, PropMatchError::Io(_)));
}

/// JSONエラーの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let err: PropMatchError = json_err.into();
    assert!(matches!(err, PropMatchError::JsonParse(_)));
}
