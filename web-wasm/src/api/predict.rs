//! 推論API呼び出し（fetch + FormData）
//!
//! 1回の解析 = multipart POST 1回。リトライ・タイムアウトなし。

use js_sys::{Array, Uint8Array};
use skin_analyzer_common::{
    ensure_success, parse_prediction_response, AnalysisResult, Endpoint, Error, ImageSource,
    Result, UPLOAD_FIELD,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, RequestMode, Response};

/// JS例外からメッセージを取り出す
pub fn js_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn transport(value: JsValue) -> Error {
    Error::Transport(js_message(&value))
}

/// エンドポイントを決定
///
/// `?endpoint=http://host:port/` があれば優先、なければ既定値。
pub fn resolve_endpoint() -> Endpoint {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .and_then(|query| web_sys::UrlSearchParams::new_with_str(&query).ok())
        .and_then(|params| params.get("endpoint"))
        .and_then(|url| match Endpoint::new(url) {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                gloo::console::warn!(e.to_string());
                None
            }
        })
        .unwrap_or_default()
}

fn build_form(source: &ImageSource) -> Result<FormData> {
    let bytes = Uint8Array::from(source.bytes.as_slice());
    let parts = Array::of1(&bytes);

    let options = BlobPropertyBag::new();
    options.set_type(&source.mime_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(transport)?;

    let form = FormData::new().map_err(transport)?;
    form.append_with_blob_and_filename(UPLOAD_FIELD, &blob, &source.file_name)
        .map_err(transport)?;
    Ok(form)
}

/// 画像を送信して解析結果を受け取る
pub async fn predict(endpoint: &Endpoint, source: &ImageSource) -> Result<AnalysisResult> {
    let url = endpoint.predict_url();
    gloo::console::log!(format!("POST {} ({}, {} bytes)", url, source.file_name, source.len()));

    let form = build_form(source)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form);

    let request = Request::new_with_str_and_init(&url, &opts).map_err(transport)?;

    let window = web_sys::window().ok_or_else(|| Error::Transport("no window".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?;
    let resp: Response = resp_value.dyn_into().map_err(transport)?;

    ensure_success(resp.status(), &resp.status_text())?;

    let text = JsFuture::from(resp.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    let body = text
        .as_string()
        .ok_or_else(|| Error::Parse("response body is not text".into()))?;

    parse_prediction_response(&body)
}
