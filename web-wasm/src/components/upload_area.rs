//! アップロードエリアコンポーネント

use leptos::prelude::*;
use std::rc::Rc;
use skin_analyzer_common::{Error, ImageSource, Result, SourceOrigin};
use wasm_bindgen::prelude::*;
use web_sys::{File, FileReader, HtmlInputElement};

use crate::api::predict::js_message;

#[component]
pub fn UploadArea<F>(on_loaded: F) -> impl IntoView
where
    F: Fn(Result<ImageSource>) + 'static + Clone,
{
    let input_ref = NodeRef::<leptos::html::Input>::new();

    let on_change = {
        let on_loaded = on_loaded.clone();
        move |ev: web_sys::Event| {
            let input: HtmlInputElement = event_target(&ev);
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                read_file(file, on_loaded.clone());
            }
            // 同じファイルを選び直しても change が発火するように
            input.set_value("");
        }
    };

    let on_click = move |_| {
        if let Some(input) = input_ref.get_untracked() {
            input.click();
        }
    };

    view! {
        <div class="upload-area" on:click=on_click>
            <input
                type="file"
                accept="image/*"
                class="hidden"
                node_ref=input_ref
                on:change=on_change
            />
            <div class="upload-icon">"📷"</div>
            <p>"Click to choose an image"</p>
            <p class="text-muted">"JPEG, PNG"</p>
        </div>
    }
}

/// FileReaderの結果
enum ReadOutcome {
    /// onload。`result` が文字列でなければ `None`
    Loaded(Option<String>),
    /// onerror、または読み込みを開始できなかった
    Failed(String),
}

/// 読み込み結果を ImageSource にする。失敗はすべて `Error::ImageData`
fn source_from_read(file_name: String, outcome: ReadOutcome) -> Result<ImageSource> {
    match outcome {
        ReadOutcome::Loaded(Some(data_url)) => {
            ImageSource::from_data_url(file_name, SourceOrigin::File, &data_url)
        }
        ReadOutcome::Loaded(None) => Err(Error::ImageData(format!("{}: file could not be read", file_name))),
        ReadOutcome::Failed(message) => Err(Error::ImageData(format!("{}: {}", file_name, message))),
    }
}

/// ファイルをData URLとして読み込む
///
/// 成功・失敗どちらの場合も `on_loaded` がちょうど1回呼ばれる。
fn read_file<F>(file: File, on_loaded: F)
where
    F: Fn(Result<ImageSource>) + 'static,
{
    let file_name = file.name();
    let on_loaded = Rc::new(on_loaded);

    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            on_loaded(source_from_read(file_name, ReadOutcome::Failed(js_message(&e))));
            return;
        }
    };

    let onload = {
        let reader = reader.clone();
        let file_name = file_name.clone();
        let on_loaded = on_loaded.clone();
        Closure::once(move |_: web_sys::ProgressEvent| {
            let outcome = match reader.result() {
                Ok(value) => ReadOutcome::Loaded(value.as_string()),
                Err(e) => ReadOutcome::Failed(js_message(&e)),
            };
            on_loaded(source_from_read(file_name, outcome));
        })
    };

    let onerror = {
        let reader = reader.clone();
        let file_name = file_name.clone();
        let on_loaded = on_loaded.clone();
        Closure::once(move |_: web_sys::ProgressEvent| {
            let message = reader
                .error()
                .map(|e| e.message())
                .unwrap_or_else(|| "file could not be read".to_string());
            on_loaded(source_from_read(file_name, ReadOutcome::Failed(message)));
        })
    };

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onload.forget();
    onerror.forget();

    if let Err(e) = reader.read_as_data_url(&file) {
        gloo::console::warn!(js_message(&e));
        reader.set_onload(None);
        reader.set_onerror(None);
        on_loaded(source_from_read(file_name, ReadOutcome::Failed(js_message(&e))));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loaded_data_url_becomes_source() {
        let source = source_from_read(
            "arm.png".into(),
            ReadOutcome::Loaded(Some("data:image/png;base64,aGVsbG8=".into())),
        )
        .unwrap();
        assert_eq!(source.file_name, "arm.png");
        assert_eq!(source.mime_type, "image/png");
        assert_eq!(source.bytes, b"hello");
        assert_eq!(source.origin, SourceOrigin::File);
    }

    #[test]
    fn test_reader_error_reported() {
        let err = source_from_read(
            "arm.png".into(),
            ReadOutcome::Failed("NotReadableError".into()),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ImageData(_)));
        assert!(err.to_string().contains("arm.png"));
        assert!(err.to_string().contains("NotReadableError"));
    }

    #[test]
    fn test_non_string_result_reported() {
        let err = source_from_read("arm.png".into(), ReadOutcome::Loaded(None)).unwrap_err();
        assert!(matches!(err, Error::ImageData(_)));
    }
}
