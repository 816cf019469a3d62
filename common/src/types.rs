//! 解析フローの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - ImageSource: 解析対象の画像（ファイル選択 or カメラ撮影）
//! - AnalysisResult: 推論サーバーのレスポンス

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// カメラ撮影画像のファイル名
pub const CAPTURE_FILE_NAME: &str = "capture.jpg";

/// 画像の取得元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    File,
    Camera,
}

/// 解析対象の画像
///
/// 中身の検証（形式・サイズ）は行わない。推論サーバー側に任せる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub origin: SourceOrigin,
}

impl ImageSource {
    pub fn from_file(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
            origin: SourceOrigin::File,
        }
    }

    /// カメラのフレーム（JPEGエンコード済み）から生成
    pub fn from_camera_frame(jpeg: Vec<u8>) -> Self {
        Self {
            file_name: CAPTURE_FILE_NAME.to_string(),
            mime_type: "image/jpeg".to_string(),
            bytes: jpeg,
            origin: SourceOrigin::Camera,
        }
    }

    /// Data URL ("data:image/jpeg;base64,...") から生成
    pub fn from_data_url(file_name: impl Into<String>, origin: SourceOrigin, data_url: &str) -> Result<Self> {
        let payload = extract_base64_from_data_url(data_url)
            .ok_or_else(|| Error::ImageData("not a base64 data URL".into()))?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| Error::ImageData(e.to_string()))?;

        Ok(Self {
            file_name: file_name.into(),
            mime_type: extract_mime_type_from_data_url(data_url).to_string(),
            bytes,
            origin,
        })
    }

    /// プレビュー表示用のData URL（ネットワークI/Oなし）
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    /// 画像内容のSHA-256（16進）
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// 推論サーバーのレスポンス
///
/// フィールド欠落は既定値で埋めず、パースエラーとして扱う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub predicted_class: String,

    /// 0-100
    pub confidence: f64,

    /// 重症度
    pub stage: String,

    /// 0-100
    pub affected_area_percent: f64,

    /// 治療の推奨（順序を保持）
    pub treatments: Vec<String>,

    pub segmentation_mask_base64: String,

    pub overlay_image_base64: String,
}

impl AnalysisResult {
    /// セグメンテーションマスクのPNGバイト列
    pub fn segmentation_mask_png(&self) -> Result<Vec<u8>> {
        decode_png_base64(&self.segmentation_mask_base64)
    }

    /// オーバーレイ画像のPNGバイト列
    pub fn overlay_png(&self) -> Result<Vec<u8>> {
        decode_png_base64(&self.overlay_image_base64)
    }

    pub fn segmentation_mask_data_url(&self) -> String {
        png_data_url(&self.segmentation_mask_base64)
    }

    pub fn overlay_data_url(&self) -> String {
        png_data_url(&self.overlay_image_base64)
    }
}

fn png_data_url(payload: &str) -> String {
    format!("data:image/png;base64,{}", payload)
}

fn decode_png_base64(payload: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::ImageData(e.to_string()))
}

/// Data URLからBase64データ部分を抽出
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    let (header, payload) = data_url.split_once(',')?;
    if header.starts_with("data:") && header.ends_with(";base64") {
        Some(payload)
    } else {
        None
    }
}

/// Data URLからMIMEタイプを抽出（不明時は "image/jpeg"）
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .strip_prefix("data:")
        .and_then(|s| s.split(';').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("image/jpeg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_camera_frame() {
        let source = ImageSource::from_camera_frame(vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(source.file_name, "capture.jpg");
        assert_eq!(source.mime_type, "image/jpeg");
        assert_eq!(source.origin, SourceOrigin::Camera);
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn test_data_url_roundtrip() {
        let source = ImageSource::from_file("a.png", "image/png", b"\x89PNG fake".to_vec());
        let url = source.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let restored = ImageSource::from_data_url("a.png", SourceOrigin::File, &url).unwrap();
        assert_eq!(restored, source);
    }

    #[test]
    fn test_from_data_url_rejects_plain_text() {
        let err = ImageSource::from_data_url("x", SourceOrigin::Camera, "data:,hello").unwrap_err();
        assert!(matches!(err, Error::ImageData(_)));
    }

    #[test]
    fn test_extract_mime_type_default() {
        assert_eq!(extract_mime_type_from_data_url("data:image/webp;base64,AAAA"), "image/webp");
        assert_eq!(extract_mime_type_from_data_url("garbage"), "image/jpeg");
    }

    #[test]
    fn test_fingerprint_depends_on_content() {
        let a = ImageSource::from_file("a.jpg", "image/jpeg", b"one".to_vec());
        let b = ImageSource::from_file("b.jpg", "image/jpeg", b"one".to_vec());
        let c = ImageSource::from_file("a.jpg", "image/jpeg", b"two".to_vec());

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_analysis_result_deserialize() {
        let json = r#"{
            "predicted_class": "Eczema",
            "confidence": 87.5,
            "stage": "Moderate",
            "affected_area_percent": 12.3,
            "treatments": ["Moisturize", "Topical steroid"],
            "segmentation_mask_base64": "aGVsbG8=",
            "overlay_image_base64": "d29ybGQ="
        }"#;

        let result: AnalysisResult = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(result.predicted_class, "Eczema");
        assert_eq!(result.treatments, vec!["Moisturize", "Topical steroid"]);
        assert_eq!(result.segmentation_mask_png().unwrap(), b"hello");
        assert_eq!(result.overlay_png().unwrap(), b"world");
        assert_eq!(result.overlay_data_url(), "data:image/png;base64,d29ybGQ=");
    }

    #[test]
    fn test_invalid_mask_base64() {
        let result = AnalysisResult {
            predicted_class: "Psoriasis".into(),
            confidence: 50.0,
            stage: "Mild".into(),
            affected_area_percent: 1.0,
            treatments: vec![],
            segmentation_mask_base64: "@@not base64@@".into(),
            overlay_image_base64: String::new(),
        };
        assert!(matches!(result.segmentation_mask_png(), Err(Error::ImageData(_))));
    }
}
