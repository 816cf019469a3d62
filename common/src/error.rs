//! エラー型定義
//!
//! 入力エラー・カメラ権限エラー・通信/サーバーエラーを一つの型にまとめ、
//! UI側では同じインライン表示チャネルで扱う。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Please upload or capture an image first.")]
    NoImageSelected,

    #[error("An analysis is already in progress.")]
    RequestInFlight,

    #[error("Could not access camera: {0}")]
    CameraUnavailable(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server error: {0}")]
    Status(String),

    #[error("Invalid response: {0}")]
    Parse(String),

    #[error("Invalid image data: {0}")]
    ImageData(String),

    #[error("Invalid endpoint: {0}")]
    Endpoint(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 利用者の操作（画像未選択・二重送信）に起因するエラーか
    pub fn is_user_input(&self) -> bool {
        matches!(self, Error::NoImageSelected | Error::RequestInFlight)
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
