//! 結果・エラー表示コンポーネント

use leptos::prelude::*;
use skin_analyzer_common::{format_affected_area, format_confidence, AnalysisResult};

/// すべての失敗を表示する唯一の場所
#[component]
pub fn ErrorPanel(error: Memo<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|message| {
            view! {
                <div class="error-panel" role="alert">
                    <strong>"Error: "</strong>
                    {message}
                </div>
            }
        })
    }
}

#[component]
pub fn ResultPanel(result: Memo<Option<AnalysisResult>>) -> impl IntoView {
    move || result.get().map(|result| view! { <ResultDetails result=result /> })
}

#[component]
fn ResultDetails(result: AnalysisResult) -> impl IntoView {
    let confidence = format_confidence(&result);
    let affected_area = format_affected_area(&result);
    let mask_src = result.segmentation_mask_data_url();
    let overlay_src = result.overlay_data_url();

    let treatments = result
        .treatments
        .into_iter()
        .map(|t| view! { <li>{t}</li> })
        .collect_view();

    view! {
        <div class="result-panel">
            <h2>"Diagnosis"</h2>
            <dl class="result-fields">
                <dt>"Condition"</dt>
                <dd>{result.predicted_class}</dd>
                <dt>"Confidence"</dt>
                <dd>{confidence}</dd>
                <dt>"Severity"</dt>
                <dd>{result.stage}</dd>
                <dt>"Affected Area"</dt>
                <dd>{affected_area}</dd>
            </dl>

            <h3>"Treatment Recommendations"</h3>
            <ul class="treatments">{treatments}</ul>

            <div class="result-images">
                <figure>
                    <img src=mask_src alt="Segmentation mask" />
                    <figcaption>"Segmentation Mask"</figcaption>
                </figure>
                <figure>
                    <img src=overlay_src alt="Overlay" />
                    <figcaption>"Overlay"</figcaption>
                </figure>
            </div>
        </div>
    }
}
