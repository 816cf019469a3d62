//! 推論サーバーとのHTTP通信
//!
//! 1回の解析 = multipart POST 1回。リトライはしない。

use crate::config::Config;
use crate::error::Result;
use reqwest::multipart::{Form, Part};
use skin_analyzer_common::{
    ensure_success, parse_prediction_response, AnalysisResult, Endpoint, Error, ImageSource,
    UPLOAD_FIELD,
};
use std::future::Future;
use std::time::Duration;

/// 画像を送って解析結果を受け取る経路
pub trait PredictTransport {
    fn predict(
        &self,
        source: &ImageSource,
    ) -> impl Future<Output = skin_analyzer_common::Result<AnalysisResult>>;
}

pub struct PredictClient {
    http: reqwest::Client,
    endpoint: Endpoint,
    timeout: Option<Duration>,
}

impl PredictClient {
    pub fn new(endpoint: Endpoint, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoint,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.effective_endpoint()?, config.timeout())
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn build_form(source: &ImageSource) -> Form {
        let part = Part::bytes(source.bytes.clone()).file_name(source.file_name.clone());
        // MIMEタイプが不正でも送信はする（検証はサーバー側）
        let part = match part.mime_str(&source.mime_type) {
            Ok(part) => part,
            Err(e) => {
                log::warn!("MIMEタイプを無視: {} ({})", source.mime_type, e);
                Part::bytes(source.bytes.clone()).file_name(source.file_name.clone())
            }
        };
        Form::new().part(UPLOAD_FIELD, part)
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            let secs = self.timeout.map(|t| t.as_secs()).unwrap_or_default();
            Error::Transport(format!("request timed out after {}s", secs))
        } else {
            Error::Transport(e.to_string())
        }
    }
}

impl PredictTransport for PredictClient {
    async fn predict(&self, source: &ImageSource) -> skin_analyzer_common::Result<AnalysisResult> {
        let url = self.endpoint.predict_url();
        log::info!("POST {} ({}, {} bytes)", url, source.file_name, source.len());

        let response = self
            .http
            .post(&url)
            .multipart(Self::build_form(source))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        log::info!("レスポンス: {}", status);
        ensure_success(status.as_u16(), status.canonical_reason().unwrap_or(""))?;

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        parse_prediction_response(&body)
    }
}
