//! サブコマンドの実行
//!
//! 各コマンドは [`ApiClient`] を受け取り、結果を標準出力に書く。

mod cattle;
mod dashboard;
mod reports;
mod settings;
mod system;
mod verify;

use crate::api::ApiClient;
use crate::cli::Commands;
use crate::context::AppContext;
use crate::error::{AdminError, Result};
use crate::scope::RequestScope;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub async fn run(command: Commands, ctx: &AppContext, scope: Arc<RequestScope>, json: bool) -> Result<()> {
    let out = Output { json };
    let connect = || ApiClient::new(ctx.clone(), scope.clone());
    // 管理APIはトークン必須。未ログインなら送信せずに止める
    let admin = || {
        ctx.require_token()?;
        connect()
    };

    match command {
        Commands::Login { username } => settings::login(&connect()?, username).await,
        Commands::Logout => settings::logout(ctx),
        Commands::Session => settings::session(ctx, &out),
        Commands::Dashboard => dashboard::dashboard(&admin()?, &out).await,
        Commands::Cattle(cmd) => cattle::run(&admin()?, cmd, &out).await,
        Commands::Owners { search, sort, desc } => cattle::owners(&admin()?, search, sort, desc, &out).await,
        Commands::Verify(cmd) => verify::run(&admin()?, cmd, &out).await,
        Commands::Reports(cmd) => reports::run(&admin()?, cmd, &out).await,
        Commands::Receipt(cmd) => reports::receipt(&admin()?, cmd, &out).await,
        Commands::System(cmd) => system::run(&connect()?, cmd, &out).await,
        Commands::Prefs { language, theme } => settings::prefs(ctx, language, theme, &out),
        Commands::Config {
            set_api_url,
            set_jpeg_quality,
            set_default_location,
            show,
        } => settings::config(set_api_url, set_jpeg_quality, set_default_location, show),
    }
}

/// 出力形式（表示用テキスト / JSON）
pub struct Output {
    json: bool,
}

impl Output {
    /// JSONモードならJSONを、そうでなければテキストを出す
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text());
        }
        Ok(())
    }

    /// JSONモードでは出さない補足メッセージ
    pub fn note(&self, message: impl AsRef<str>) {
        if !self.json {
            println!("{}", message.as_ref());
        }
    }
}

/// 待ち時間のあるリクエスト中にスピナーを出す
pub(crate) async fn with_spinner<T, F>(message: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = fut.await;
    spinner.finish_and_clear();
    result
}

/// 取り消せない操作の確認
pub(crate) fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AdminError::Prompt(e.to_string()))
}
