use crate::error::{Result, SkinAnalyzerError};
use serde::{Deserialize, Serialize};
use skin_analyzer_common::Endpoint;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// エンドポイントを上書きする環境変数
pub const ENDPOINT_ENV: &str = "SKIN_ANALYZER_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: Endpoint,
    /// 0 でタイムアウトなし
    pub timeout_seconds: u64,
    pub save_images_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            timeout_seconds: 120,
            save_images_dir: None,
        }
    }
}

impl Config {
    /// 設定ファイルの内容（環境変数は反映しない）
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 設定ファイルが壊れていても既定値で続行する（`config` コマンドの修復用）
    pub fn load_or_default() -> Result<Self> {
        Ok(Self::load_or_default_from(&Self::config_path()?))
    }

    pub fn load_or_default_from(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("設定ファイルを読めないため既定値を使用: {} ({})", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SkinAnalyzerError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("skin-analyzer").join("config.json"))
    }

    /// 実際に使うエンドポイント
    ///
    /// 環境変数を優先する。上書きはこの値にだけ反映され、保存はされない。
    pub fn effective_endpoint(&self) -> Result<Endpoint> {
        self.endpoint_or_override(std::env::var(ENDPOINT_ENV).ok())
    }

    fn endpoint_or_override(&self, value: Option<String>) -> Result<Endpoint> {
        match value.filter(|url| !url.trim().is_empty()) {
            Some(url) => Ok(Endpoint::new(url)?),
            None => Ok(self.endpoint.clone()),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn set_endpoint(&mut self, url: &str) -> Result<()> {
        self.endpoint = Endpoint::new(url)?;
        self.save()
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        self.timeout_seconds = seconds;
        self.save()
    }
}
