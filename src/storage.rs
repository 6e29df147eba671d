//! 設定値（トークン・言語・テーマ）の永続化
//!
//! アプリケーションは [`PreferenceStore`] 経由でのみ読み書きする。
//! CLIではJSONファイル、テストではメモリ上のストアを差し込む。

use crate::error::Result;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const PREFERENCES_FILE_NAME: &str = "preferences.json";

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// JSONファイルに保存するストア
///
/// 読み込みは生成時に1回、書き込みは変更のたびに行う。
pub struct FilePreferenceStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FilePreferenceStore {
    /// ディレクトリ内の preferences.json を開く（無い・壊れている場合は空）
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(PREFERENCES_FILE_NAME);
        let values = Self::read(&path).unwrap_or_else(|| {
            if path.exists() {
                tracing::warn!(path = %path.display(), "preferences file is unreadable, starting empty");
            }
            BTreeMap::new()
        });

        Self {
            path,
            values: RwLock::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Option<BTreeMap<String, String>> {
        let file = File::open(path).ok()?;
        serde_json::from_reader(BufReader::new(file)).ok()
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), values)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write();
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

/// メモリ上のストア（テスト・一時利用）
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(entries: &[(&str, &str)]) -> Self {
        let values = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempdir().unwrap();

        let store = FilePreferenceStore::open(dir.path());
        assert!(store.get("admin_token").is_none());
        store.set("admin_token", "abc").unwrap();
        store.set("language", "ar").unwrap();

        let reopened = FilePreferenceStore::open(dir.path());
        assert_eq!(reopened.get("admin_token").as_deref(), Some("abc"));
        assert_eq!(reopened.get("language").as_deref(), Some("ar"));

        reopened.remove("admin_token").unwrap();
        let again = FilePreferenceStore::open(dir.path());
        assert!(again.get("admin_token").is_none());
        assert_eq!(again.get("language").as_deref(), Some("ar"));
    }

    #[test]
    fn test_file_store_corrupted_file_starts_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(PREFERENCES_FILE_NAME), "{ broken").unwrap();

        let store = FilePreferenceStore::open(dir.path());
        assert!(store.get("theme").is_none());
        store.set("theme", "dark").unwrap();
        assert_eq!(FilePreferenceStore::open(dir.path()).get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryPreferenceStore::with(&[("theme", "light")]);
        assert_eq!(store.get("theme").as_deref(), Some("light"));
        store.remove("theme").unwrap();
        store.remove("theme").unwrap();
        assert!(store.get("theme").is_none());
    }
}
