//! 推論サーバーのレスポンスパーサー
//!
//! ステータス判定とJSONボディのパースを行う。
//! エラーボディの中身は解釈しない（ステータステキストのみ利用者に見せる）。

use crate::error::{Error, Result};
use crate::types::AnalysisResult;

/// HTTPステータスを判定
///
/// 2xx以外は一律に失敗。ステータステキストが空（HTTP/2など）の場合はコードを使う。
///
/// # Examples
/// ```
/// use skin_analyzer_common::ensure_success;
///
/// assert!(ensure_success(200, "OK").is_ok());
/// assert!(ensure_success(500, "Internal Server Error").is_err());
/// ```
pub fn ensure_success(status: u16, status_text: &str) -> Result<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }

    let text = status_text.trim();
    if text.is_empty() {
        Err(Error::Status(status.to_string()))
    } else {
        Err(Error::Status(text.to_string()))
    }
}

/// 成功レスポンスのボディをパース
///
/// # Arguments
/// * `body` - レスポンスボディ（JSONオブジェクト）
///
/// # Returns
/// * `Ok(AnalysisResult)` - パース成功
/// * `Err(Error::Parse)` - JSONでない、またはフィールド欠落・型不一致
pub fn parse_prediction_response(body: &str) -> Result<AnalysisResult> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(Error::Parse("empty response body".into()));
    }

    serde_json::from_str(trimmed).map_err(|e| Error::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS_BODY: &str = r#"{
        "predicted_class": "Eczema",
        "confidence": 87.5,
        "stage": "Moderate",
        "affected_area_percent": 12.3,
        "treatments": ["Moisturize", "Topical steroid"],
        "segmentation_mask_base64": "bWFzaw==",
        "overlay_image_base64": "b3ZlcmxheQ=="
    }"#;

    // =============================================
    // ensure_success テスト
    // =============================================

    #[test]
    fn test_ensure_success_2xx() {
        assert!(ensure_success(200, "OK").is_ok());
        assert!(ensure_success(201, "Created").is_ok());
        assert!(ensure_success(299, "").is_ok());
    }

    #[test]
    fn test_ensure_success_server_error() {
        let err = ensure_success(500, "Internal Server Error").unwrap_err();
        assert_eq!(err.to_string(), "Server error: Internal Server Error");
    }

    #[test]
    fn test_ensure_success_empty_status_text() {
        let err = ensure_success(502, "").unwrap_err();
        assert_eq!(err.to_string(), "Server error: 502");
    }

    #[test]
    fn test_ensure_success_redirect_is_failure() {
        assert!(ensure_success(304, "Not Modified").is_err());
    }

    // =============================================
    // parse_prediction_response テスト
    // =============================================

    #[test]
    fn test_parse_prediction_response() {
        let result = parse_prediction_response(SUCCESS_BODY).unwrap();
        assert_eq!(result.predicted_class, "Eczema");
        assert_eq!(result.confidence, 87.5);
        assert_eq!(result.stage, "Moderate");
        assert_eq!(result.affected_area_percent, 12.3);
        assert_eq!(result.treatments.len(), 2);
        assert_eq!(result.treatments[1], "Topical steroid");
    }

    #[test]
    fn test_parse_prediction_response_extra_fields_ignored() {
        let body = SUCCESS_BODY.replace("\"stage\"", "\"model_version\": \"v3\", \"stage\"");
        let result = parse_prediction_response(&body).unwrap();
        assert_eq!(result.stage, "Moderate");
    }

    #[test]
    fn test_parse_prediction_response_missing_field() {
        let body = r#"{"predicted_class": "Eczema", "confidence": 87.5}"#;
        let err = parse_prediction_response(body).unwrap_err();
        match err {
            Error::Parse(msg) => assert!(msg.contains("missing field")),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_prediction_response_wrong_type() {
        let body = SUCCESS_BODY.replace("87.5", "\"high\"");
        assert!(matches!(parse_prediction_response(&body), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_prediction_response_empty() {
        assert!(matches!(parse_prediction_response("  \n"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_prediction_response_html() {
        let body = "<html><body>Bad Gateway</body></html>";
        assert!(matches!(parse_prediction_response(body), Err(Error::Parse(_))));
    }
}
