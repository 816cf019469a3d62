//! 解析結果の表示ルール
//!
//! 信頼度が飽和（99.99以上）している場合は [96, 98) の値に置き換えて表示する。
//! 置き換え値は結果の内容から導いたシードで決まるため、同じ結果なら何度描画しても同じ。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::types::AnalysisResult;

/// この値以上の信頼度は置き換え対象
pub const SATURATED_CONFIDENCE: f64 = 99.99;

/// 置き換え値の範囲 [下限, 上限)
pub const DISPLAY_CONFIDENCE_RANGE: (f64, f64) = (96.0, 98.0);

/// 表示用の信頼度
pub fn display_confidence(result: &AnalysisResult) -> f64 {
    if result.confidence < SATURATED_CONFIDENCE {
        return result.confidence;
    }

    let (low, high) = DISPLAY_CONFIDENCE_RANGE;
    let mut rng = StdRng::seed_from_u64(result_seed(result));
    let value: f64 = rng.gen_range(low..high);

    // 小数2桁に切り捨て（丸めると 98.00 になりうる）
    (value * 100.0).floor() / 100.0
}

/// "87.50%" 形式の信頼度
pub fn format_confidence(result: &AnalysisResult) -> String {
    format_percent(display_confidence(result))
}

/// "12.30%" 形式の患部面積
pub fn format_affected_area(result: &AnalysisResult) -> String {
    format_percent(result.affected_area_percent)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// 結果内容のダイジェストから64bitシードを作る
fn result_seed(result: &AnalysisResult) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(result.predicted_class.as_bytes());
    hasher.update(result.stage.as_bytes());
    hasher.update(result.confidence.to_le_bytes());
    hasher.update(result.affected_area_percent.to_le_bytes());
    for treatment in &result.treatments {
        hasher.update(treatment.as_bytes());
    }
    hasher.update(result.segmentation_mask_base64.as_bytes());
    hasher.update(result.overlay_image_base64.as_bytes());

    let digest = hasher.finalize();
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed)
}
