//! Predictページ

use leptos::prelude::*;
use leptos::task::spawn_local;
use skin_analyzer_common::{AnalysisSession, CameraGate, Completion, ImageSource};

use crate::api;
use crate::camera::{open_camera, BrowserCamera};
use crate::components::{
    analyze_button::AnalyzeButton,
    camera_panel::CameraPanel,
    header::Header,
    result_panel::{ErrorPanel, ResultPanel},
    upload_area::UploadArea,
};

#[component]
pub fn App() -> impl IntoView {
    let endpoint = StoredValue::new(api::resolve_endpoint());
    gloo::console::log!(format!("endpoint: {}", endpoint.get_value()));

    let session = RwSignal::new(AnalysisSession::new());
    // セッション外のエラー（カメラ・未選択など）
    let (notice, set_notice) = signal(None::<String>);
    // Data URLは選択時にセッションが一度だけ作る
    let (preview, set_preview) = signal(None::<String>);
    let (camera_open, set_camera_open) = signal(false);
    let camera_gate = RwSignal::new(CameraGate::default());
    let camera = StoredValue::new_local(None::<BrowserCamera>);
    let video_ref = NodeRef::<leptos::html::Video>::new();

    let result = Memo::new(move |_| {
        session.with(|s| s.state().result().cloned())
    });
    let error = Memo::new(move |_| {
        notice
            .get()
            .or_else(|| session.with(|s| s.state().error().map(str::to_string)))
    });
    let pending = Memo::new(move |_| session.with(|s| s.is_in_flight()));
    let camera_opening = Memo::new(move |_| camera_gate.with(|g| g.is_opening()));

    // カメラを止める（何度呼んでもよい）。許可待ちの要求も取り消す
    let release_camera = move || {
        camera_gate.try_update(|g| g.cancel());
        if let Some(cam) = camera.try_update_value(Option::take).flatten() {
            cam.close(video_ref.get_untracked().as_ref());
        }
        set_camera_open.try_set(false);
    };

    let select = move |source: ImageSource| {
        gloo::console::log!(format!(
            "selected {} ({}, {} bytes)",
            source.file_name,
            source.mime_type,
            source.len()
        ));
        set_notice.set(None);
        session.update(|s| s.select_source(source));
        set_preview.set(session.with_untracked(|s| s.preview().map(str::to_string)));
    };

    let on_file_loaded = move |loaded: skin_analyzer_common::Result<ImageSource>| {
        release_camera();
        match loaded {
            Ok(source) => select(source),
            Err(e) => set_notice.set(Some(e.to_string())),
        }
    };

    let on_open_camera = move |_| {
        if camera_open.get_untracked() {
            return;
        }
        let Some(ticket) = camera_gate.try_update(|g| g.begin_open()).flatten() else {
            return;
        };
        set_notice.set(None);
        spawn_local(async move {
            let opened = open_camera().await;
            let wanted = camera_gate
                .try_update(|g| g.finish_open(ticket))
                .unwrap_or(false);

            match opened {
                Ok(cam) if !wanted => {
                    gloo::console::log!("camera request was cancelled; releasing");
                    cam.close(None);
                }
                Ok(cam) => {
                    if let Some(video) = video_ref.get_untracked() {
                        cam.attach(&video);
                    }
                    // ページ破棄後に許可された場合はここでcamがDropされ、トラックは止まる
                    if camera.try_update_value(move |slot| *slot = Some(cam)).is_some() {
                        set_camera_open.try_set(true);
                    }
                }
                Err(e) => {
                    gloo::console::warn!(e.to_string());
                    if wanted {
                        set_notice.try_set(Some(e.to_string()));
                    }
                }
            }
        });
    };

    let on_capture = move |_| {
        let Some(video) = video_ref.get_untracked() else {
            return;
        };
        let Some(cam) = camera.try_update_value(Option::take).flatten() else {
            return;
        };
        set_camera_open.set(false);

        match cam.capture(&video) {
            Ok(source) => select(source),
            Err(e) => set_notice.set(Some(e.to_string())),
        }
    };

    let on_close_camera = move |_| release_camera();

    let on_analyze = move |_| {
        set_notice.set(None);
        let (ticket, source) = match session.try_update(|s| s.begin_submit()) {
            Some(Ok(started)) => started,
            Some(Err(e)) => {
                if !e.is_user_input() {
                    gloo::console::warn!(e.to_string());
                }
                set_notice.set(Some(e.to_string()));
                return;
            }
            None => return,
        };

        let endpoint = endpoint.get_value();
        spawn_local(async move {
            let outcome = api::predict(&endpoint, &source).await;
            if let Err(e) = &outcome {
                gloo::console::warn!(format!("predict failed: {}", e));
            }

            match session.try_update(|s| s.complete(ticket, outcome)) {
                Some(Completion::Applied) => {}
                Some(Completion::Stale) | None => {
                    gloo::console::log!(format!("discarded stale response for {}", source.file_name));
                }
            }
        });
    };

    // ページ破棄: カメラを解放し、送信中のレスポンスを無効化
    on_cleanup(move || {
        release_camera();
        session.try_update(|s| s.invalidate());
    });

    view! {
        <div class="container">
            <Header />

            <div class="input-row">
                <UploadArea on_loaded=on_file_loaded />
                <CameraPanel
                    camera_open=camera_open
                    camera_opening=camera_opening
                    video_ref=video_ref
                    on_open=on_open_camera
                    on_capture=on_capture
                    on_close=on_close_camera
                />
            </div>

            <Show when=move || preview.get().is_some()>
                <div class="preview">
                    <img src=move || preview.get().unwrap_or_default() alt="Selected image" />
                </div>
            </Show>

            <AnalyzeButton pending=pending on_analyze=on_analyze />

            <ErrorPanel error=error />
            <ResultPanel result=result />
        </div>
    }
}
