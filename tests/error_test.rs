//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use skin_analyzer::config::Config;
use skin_analyzer::error::SkinAnalyzerError;
use skin_analyzer::scanner;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 存在しないファイルを指定した場合
#[test]
fn test_collect_nonexistent_path() {
    let result = scanner::collect_inputs(&[PathBuf::from("/nonexistent/path/12345.jpg")]);

    let err = result.unwrap_err();
    assert!(matches!(err, SkinAnalyzerError::FileNotFound(_)));
}

/// 画像のないフォルダを指定した場合
#[test]
fn test_collect_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    // テキストファイルのみ作成
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = scanner::collect_inputs(&[dir.path().to_path_buf()]);
    assert!(matches!(result, Err(SkinAnalyzerError::NoImagesFound(_))));
}

/// 存在しないファイルの読み込み
#[test]
fn test_load_source_missing() {
    let result = scanner::load_source(Path::new("/nonexistent/lesion.png"));
    assert!(matches!(result, Err(SkinAnalyzerError::FileNotFound(_))));
}

/// SkinAnalyzerErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        SkinAnalyzerError::Config("テスト設定エラー".to_string()),
        SkinAnalyzerError::FileNotFound("test.jpg".to_string()),
        SkinAnalyzerError::NoImagesFound("フォルダ".to_string()),
        SkinAnalyzerError::ImageSave("mask.png".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// エラーのDebug実装確認
#[test]
fn test_error_debug() {
    let err = SkinAnalyzerError::Config("テスト".to_string());
    let debug = format!("{:?}", err);

    assert!(debug.contains("Config"));
    assert!(debug.contains("テスト"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: SkinAnalyzerError = io_err.into();

    assert!(matches!(err, SkinAnalyzerError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: SkinAnalyzerError = json_err.into();

    assert!(matches!(err, SkinAnalyzerError::JsonParse(_)));
}

/// common::Errorからの変換
#[test]
fn test_common_error_conversion() {
    let common_err = skin_analyzer_common::Error::Status("Bad Gateway".to_string());
    let err: SkinAnalyzerError = common_err.into();

    assert!(matches!(err, SkinAnalyzerError::Common(_)));
}

/// エラーチェーン（透過的エラー）
#[test]
fn test_error_chain_transparent() {
    let common_err = skin_analyzer_common::Error::NoImageSelected;
    let err: SkinAnalyzerError = common_err.into();

    // 透過的エラーなのでメッセージがそのまま表示される
    let display = format!("{}", err);
    assert_eq!(display, "Please upload or capture an image first.");
}

/// 設定ファイルが壊れている場合
#[test]
fn test_corrupted_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ invalid json }").unwrap();

    assert!(matches!(Config::load_from(&path), Err(SkinAnalyzerError::JsonParse(_))));
}
