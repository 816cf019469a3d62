//! 推論エンドポイント

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";

/// 推論APIのパス
pub const PREDICT_PATH: &str = "predict/";

/// multipartのフィールド名
pub const UPLOAD_FIELD: &str = "file";

/// 推論サーバーのベースURL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint {
    base_url: String,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim().to_string();

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::Endpoint(format!(
                "{} (expected http:// or https://)",
                base_url
            )));
        }

        let rest = base_url.split_once("://").map(|(_, r)| r).unwrap_or_default();
        if rest.trim_matches('/').is_empty() {
            return Err(Error::Endpoint(format!("{} (missing host)", base_url)));
        }

        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST先のURL（`{base}/predict/`）
    pub fn predict_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/predict") {
            format!("{}/", base)
        } else {
            format!("{}/{}", base, PREDICT_PATH)
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base_url)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.base_url
    }
}

impl std::str::FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_predict_url() {
        assert_eq!(Endpoint::default().predict_url(), "http://127.0.0.1:8000/predict/");
    }

    #[test]
    fn test_predict_url_without_trailing_slash() {
        let endpoint = Endpoint::new("https://skin.example.com/api").unwrap();
        assert_eq!(endpoint.predict_url(), "https://skin.example.com/api/predict/");
    }

    #[test]
    fn test_predict_url_already_pointing_at_predict() {
        let endpoint = Endpoint::new("http://localhost:9000/predict").unwrap();
        assert_eq!(endpoint.predict_url(), "http://localhost:9000/predict/");
    }

    #[test]
    fn test_rejects_non_http() {
        assert!(matches!(Endpoint::new("ftp://host/"), Err(Error::Endpoint(_))));
        assert!(matches!(Endpoint::new("127.0.0.1:8000"), Err(Error::Endpoint(_))));
    }

    #[test]
    fn test_rejects_missing_host() {
        assert!(Endpoint::new("http://").is_err());
    }

    #[test]
    fn test_serde_rejects_invalid() {
        assert!(serde_json::from_str::<Endpoint>("\"not a url\"").is_err());
    }

    #[test]
    fn test_serde_string_form() {
        let endpoint: Endpoint = serde_json::from_str("\"http://10.0.0.2:8000/\"").unwrap();
        assert_eq!(endpoint.base_url(), "http://10.0.0.2:8000/");
        assert_eq!(serde_json::to_string(&endpoint).unwrap(), "\"http://10.0.0.2:8000/\"");
    }
}
