use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkinAnalyzerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像保存エラー: {0}")]
    ImageSave(String),

    #[error("HTTPクライアントエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] skin_analyzer_common::Error),
}

pub type Result<T> = std::result::Result<T, SkinAnalyzerError>;
