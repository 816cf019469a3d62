//! カメラパネルコンポーネント
//!
//! video要素とボタンは常に描画し、状態に応じて隠す（NodeRefを切らさないため）。

use leptos::prelude::*;

#[component]
pub fn CameraPanel<FO, FC, FX>(
    camera_open: ReadSignal<bool>,
    camera_opening: Memo<bool>,
    video_ref: NodeRef<leptos::html::Video>,
    on_open: FO,
    on_capture: FC,
    on_close: FX,
) -> impl IntoView
where
    FO: Fn(()) + 'static + Clone,
    FC: Fn(()) + 'static + Clone,
    FX: Fn(()) + 'static + Clone,
{
    view! {
        <div class="camera-panel">
            <video
                node_ref=video_ref
                class:hidden=move || !camera_open.get()
                autoplay=true
                playsinline=true
                muted=true
            />

            <button
                class="btn btn-secondary"
                class:hidden=move || camera_open.get() || camera_opening.get()
                on:click=move |_| on_open(())
            >
                "Open Camera"
            </button>

            // 許可待ちの間も閉じられるようにする
            <div
                class="camera-actions"
                class:hidden=move || !camera_open.get() && !camera_opening.get()
            >
                <button
                    class="btn btn-primary"
                    disabled=move || !camera_open.get()
                    on:click=move |_| on_capture(())
                >
                    {move || if camera_opening.get() { "Waiting for camera..." } else { "Capture" }}
                </button>
                <button class="btn btn-secondary" on:click=move |_| on_close(())>
                    "Close Camera"
                </button>
            </div>
        </div>
    }
}
