//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"SkinAnalyzer"</h1>
            <p class="text-muted">"Upload or capture a photo of the affected skin, then run the analysis."</p>
        </header>
    }
}
