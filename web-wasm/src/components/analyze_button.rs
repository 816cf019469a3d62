//! 解析ボタンコンポーネント

use leptos::prelude::*;

#[component]
pub fn AnalyzeButton<FA>(pending: Memo<bool>, on_analyze: FA) -> impl IntoView
where
    FA: Fn(()) + 'static + Clone,
{
    // 画像未選択でも押せる。押すとエラーパネルに案内が出る
    view! {
        <div class="analyze-buttons">
            <button
                class="btn btn-primary"
                disabled=move || pending.get()
                on:click=move |_| on_analyze(())
            >
                {move || if pending.get() { "Analyzing..." } else { "Analyze" }}
            </button>
        </div>
    }
}
