use crate::error::{Result, SkinAnalyzerError};
use image::ImageFormat;
use skin_analyzer_common::ImageSource;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"];

const FALLBACK_MIME: &str = "application/octet-stream";

/// 入力パスを解析対象ファイルの一覧に展開
///
/// - ファイル: そのまま（拡張子による絞り込みなし）
/// - フォルダ: 直下の jpg/jpeg/png のみ、ファイル名順
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let found = scan_folder(path);
            if found.is_empty() {
                log::warn!("画像なし: {}", path.display());
            }
            files.extend(found);
        } else {
            return Err(SkinAnalyzerError::FileNotFound(path.display().to_string()));
        }
    }

    if files.is_empty() {
        let joined = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(SkinAnalyzerError::NoImagesFound(joined));
    }

    Ok(files)
}

fn scan_folder(folder: &Path) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .map(|ext| is_image_extension(&ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();

    // ファイル名でソート
    images.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    images
}

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}

/// ファイルを読み込んで ImageSource にする
pub fn load_source(path: &Path) -> Result<ImageSource> {
    if !path.is_file() {
        return Err(SkinAnalyzerError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mime_type = detect_mime_type(path, &bytes);

    Ok(ImageSource::from_file(file_name, mime_type, bytes))
}

/// 内容から判定し、だめなら拡張子から
fn detect_mime_type(path: &Path, bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}
