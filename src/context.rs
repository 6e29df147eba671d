//! アプリケーションコンテキスト
//!
//! 設定とプリファレンスストアをまとめ、必要な処理へ明示的に渡す。

use crate::config::Config;
use crate::error::{AdminError, Result};
use crate::storage::PreferenceStore;
use clap::ValueEnum;
use std::fmt;
use std::sync::Arc;

pub const TOKEN_KEY: &str = "admin_token";
pub const LANGUAGE_KEY: &str = "language";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ar => "العربية",
        }
    }

    /// 文字方向（アラビア語は右から左）
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl Theme {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    config: Config,
    store: Arc<dyn PreferenceStore>,
}

impl AppContext {
    pub fn new(config: Config, store: Arc<dyn PreferenceStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn require_token(&self) -> Result<String> {
        self.token().ok_or(AdminError::MissingToken)
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.set(TOKEN_KEY, token)
    }

    pub fn clear_token(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)
    }

    /// 保存値が無い・不明な場合は英語
    pub fn language(&self) -> Language {
        self.store
            .get(LANGUAGE_KEY)
            .and_then(|code| Language::from_code(&code))
            .unwrap_or_default()
    }

    pub fn set_language(&self, language: Language) -> Result<()> {
        self.store.set(LANGUAGE_KEY, language.code())
    }

    pub fn theme(&self) -> Theme {
        self.store
            .get(THEME_KEY)
            .and_then(|code| Theme::from_code(&code))
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, &theme.to_string())
    }
}
