use crate::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_API_BASE_URL: &str = "https://titweng-app-a3hufygwcphxhkc2.canadacentral-01.azurewebsites.net";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    /// アップロード前に縮小する長辺の最大px
    pub max_image_size: u32,
    /// 再エンコード時のJPEG品質
    pub jpeg_quality: u8,
    /// `--location` 省略時に送る位置
    pub default_location: Option<String>,
    /// 表示のみ（分類の閾値には使わない）
    pub similarity_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            timeout_seconds: 60,
            max_image_size: 1280,
            jpeg_quality: 80,
            default_location: None,
            similarity_threshold: titweng_common::REVIEW_THRESHOLD,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;

        // 環境変数を優先
        if let Ok(url) = std::env::var("TITWENG_API_BASE_URL") {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }

        Ok(config)
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

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AdminError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("titweng-admin"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// 末尾スラッシュを除いたベースURL
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn set_api_base_url(&mut self, url: String) -> Result<()> {
        let url = url.trim().to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AdminError::Config(format!(
                "API base URL must start with http:// or https://: {}",
                url
            )));
        }
        self.api_base_url = url;
        Ok(())
    }

    pub fn set_jpeg_quality(&mut self, quality: u8) -> Result<()> {
        if !(1..=100).contains(&quality) {
            return Err(AdminError::Config(format!(
                "JPEG quality must be between 1 and 100: {}",
                quality
            )));
        }
        self.jpeg_quality = quality;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.jpeg_quality, 80);
        assert_eq!(config.similarity_threshold, 85.0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set_api_base_url("http://localhost:8000/".to_string()).unwrap();
        config.default_location = Some("Juba".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.base_url(), "http://localhost:8000");
        assert_eq!(loaded.default_location.as_deref(), Some("Juba"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"timeout_seconds": 5}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.max_image_size, 1280);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let mut config = Config::default();
        assert!(config.set_api_base_url("ftp://example.com".to_string()).is_err());
        assert!(config.set_jpeg_quality(0).is_err());
        assert!(config.set_jpeg_quality(90).is_ok());
        assert_eq!(config.jpeg_quality, 90);
    }
}
