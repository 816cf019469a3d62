//! 解析結果の出力
//!
//! - 端末向けテキスト表示
//! - JSONレポート
//! - マスク/オーバーレイのPNG保存

use crate::error::{Result, SkinAnalyzerError};
use serde::{Deserialize, Serialize};
use skin_analyzer_common::{
    format_affected_area, format_confidence, AnalysisResult, ImageSource, RequestState,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Succeeded,
    Failed,
}

/// レポートの1件（= 1画像）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub file_name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// RFC 3339
    pub analyzed_at: String,
    pub status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_confidence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_path: Option<PathBuf>,
}

impl ReportEntry {
    /// 解析完了時の状態からエントリを作る
    pub fn from_state(path: &Path, source: &ImageSource, state: &RequestState) -> Self {
        let mut entry = Self::failed(path, "analysis did not complete".to_string());
        entry.file_name = source.file_name.clone();
        entry.fingerprint = Some(source.fingerprint());

        match state {
            RequestState::Succeeded(result) => {
                entry.status = EntryStatus::Succeeded;
                entry.display_confidence = Some(format_confidence(result));
                entry.result = Some(result.clone());
                entry.error = None;
            }
            RequestState::Failed(message) => {
                entry.error = Some(message.clone());
            }
            RequestState::Idle | RequestState::Pending => {}
        }
        entry
    }

    /// 読み込み失敗など、送信前に失敗したエントリ
    pub fn failed(path: &Path, error: String) -> Self {
        Self {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            path: path.display().to_string(),
            fingerprint: None,
            analyzed_at: chrono::Local::now().to_rfc3339(),
            status: EntryStatus::Failed,
            display_confidence: None,
            result: None,
            error: Some(error),
            mask_path: None,
            overlay_path: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == EntryStatus::Succeeded
    }
}

/// 端末表示用テキスト
pub fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str("Diagnosis\n");
    out.push_str(&format!("  Condition:     {}\n", result.predicted_class));
    out.push_str(&format!("  Confidence:    {}\n", format_confidence(result)));
    out.push_str(&format!("  Severity:      {}\n", result.stage));
    out.push_str(&format!("  Affected Area: {}\n", format_affected_area(result)));
    out.push('\n');
    out.push_str("Treatment Recommendations\n");
    if result.treatments.is_empty() {
        out.push_str("  (none)\n");
    }
    for treatment in &result.treatments {
        out.push_str(&format!("  • {}\n", treatment));
    }
    out
}

/// マスクとオーバーレイをPNGとして保存
///
/// ファイル名: `{元ファイル名}_{フィンガープリント先頭8桁}_{mask|overlay}.png`
pub fn save_images(entry: &mut ReportEntry, dir: &Path) -> Result<()> {
    let Some(result) = entry.result.as_ref() else {
        return Ok(());
    };

    std::fs::create_dir_all(dir)?;

    let stem = Path::new(&entry.file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let tag: String = entry
        .fingerprint
        .as_deref()
        .unwrap_or("00000000")
        .chars()
        .take(8)
        .collect();

    let mask = result.segmentation_mask_png()?;
    let overlay = result.overlay_png()?;

    let mask_path = dir.join(format!("{}_{}_mask.png", stem, tag));
    let overlay_path = dir.join(format!("{}_{}_overlay.png", stem, tag));
    write_png(&mask_path, &mask)?;
    write_png(&overlay_path, &overlay)?;

    entry.mask_path = Some(mask_path);
    entry.overlay_path = Some(overlay_path);
    Ok(())
}

fn write_png(path: &Path, bytes: &[u8]) -> Result<()> {
    match image::load_from_memory_with_format(bytes, image::ImageFormat::Png) {
        Ok(img) => log::info!("保存: {} ({}x{})", path.display(), img.width(), img.height()),
        Err(e) => log::warn!("PNGとして読めないデータを保存: {} ({})", path.display(), e),
    }

    std::fs::write(path, bytes)
        .map_err(|e| SkinAnalyzerError::ImageSave(format!("{}: {}", path.display(), e)))
}

/// JSONレポートを書き出す
pub fn write_report(entries: &[ReportEntry], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn read_report(path: &Path) -> Result<Vec<ReportEntry>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
