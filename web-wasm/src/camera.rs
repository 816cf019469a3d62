//! ブラウザのカメラ（getUserMedia）
//!
//! 取得したトラックは `CameraSession` に渡し、撮影・クローズ・破棄で必ず停止させる。

use base64::{engine::general_purpose::STANDARD, Engine as _};
use skin_analyzer_common::types::extract_base64_from_data_url;
use skin_analyzer_common::{CameraSession, Error, ImageSource, MediaTrack, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack, MediaStreamTrackState,
};

use crate::api::predict::js_message;

pub struct BrowserTrack(MediaStreamTrack);

impl MediaTrack for BrowserTrack {
    fn stop(&mut self) {
        self.0.stop();
    }

    fn is_live(&self) -> bool {
        self.0.ready_state() == MediaStreamTrackState::Live
    }
}

/// 起動中のカメラ
pub struct BrowserCamera {
    stream: MediaStream,
    session: CameraSession<BrowserTrack>,
}

fn unavailable(message: impl Into<String>) -> Error {
    Error::CameraUnavailable(message.into())
}

/// カメラへのアクセスを要求
pub async fn open_camera() -> Result<BrowserCamera> {
    let window = web_sys::window().ok_or_else(|| unavailable("no window"))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|e| unavailable(js_message(&e)))?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| unavailable(js_message(&e)))?;
    let stream: MediaStream = JsFuture::from(promise)
        .await
        .map_err(|e| unavailable(js_message(&e)))?
        .dyn_into()
        .map_err(|e| unavailable(js_message(&e)))?;

    let tracks: Vec<BrowserTrack> = stream
        .get_tracks()
        .iter()
        .filter_map(|t| t.dyn_into::<MediaStreamTrack>().ok())
        .map(BrowserTrack)
        .collect();
    if tracks.is_empty() {
        return Err(unavailable("no video track"));
    }

    gloo::console::log!(format!("camera opened ({} tracks)", tracks.len()));
    Ok(BrowserCamera {
        stream,
        session: CameraSession::new(tracks),
    })
}

impl BrowserCamera {
    /// プレビュー用のvideo要素に映像を流す
    pub fn attach(&self, video: &HtmlVideoElement) {
        video.set_src_object(Some(&self.stream));
        if let Err(e) = video.play() {
            gloo::console::warn!(js_message(&e));
        }
    }

    /// 現在のフレームを撮影（撮影後はカメラを解放）
    pub fn capture(self, video: &HtmlVideoElement) -> Result<ImageSource> {
        let source = self.session.capture(|_| grab_jpeg(video));
        video.set_src_object(None);
        source
    }

    pub fn close(self, video: Option<&HtmlVideoElement>) {
        self.session.close();
        if let Some(video) = video {
            video.set_src_object(None);
        }
    }
}

/// video要素の現在フレームをネイティブ解像度でJPEGにする
fn grab_jpeg(video: &HtmlVideoElement) -> Result<Vec<u8>> {
    let (width, height) = (video.video_width(), video.video_height());
    if width == 0 || height == 0 {
        return Err(unavailable("video is not ready yet"));
    }

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| unavailable("no document"))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| unavailable(js_message(&e)))?
        .dyn_into()
        .map_err(|_| unavailable("canvas element"))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| unavailable(js_message(&e)))?
        .ok_or_else(|| unavailable("2d context"))?
        .dyn_into()
        .map_err(|_| unavailable("2d context"))?;
    ctx.draw_image_with_html_video_element(video, 0.0, 0.0)
        .map_err(|e| unavailable(js_message(&e)))?;

    let data_url = canvas
        .to_data_url_with_type("image/jpeg")
        .map_err(|e| unavailable(js_message(&e)))?;
    let payload = extract_base64_from_data_url(&data_url)
        .ok_or_else(|| Error::ImageData("canvas returned no data".into()))?;

    STANDARD
        .decode(payload)
        .map_err(|e| Error::ImageData(e.to_string()))
}
