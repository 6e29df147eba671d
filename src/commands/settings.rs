use super::Output;
use crate::api::ApiClient;
use crate::config::Config;
use crate::context::{AppContext, Language, Theme};
use crate::error::{AdminError, Result};
use crate::session::decode_claims;
use chrono::Utc;
use dialoguer::{Input, Password};
use serde_json::json;

pub async fn login(client: &ApiClient, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| AdminError::Prompt(e.to_string()))?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| AdminError::Prompt(e.to_string()))?;

    if username.trim().is_empty() || password.is_empty() {
        return Err(AdminError::Validation("Username and password are required".into()));
    }

    client.login(&username, &password).await?;
    println!("✔ Logged in as {}", username.trim());
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.clear_token()?;
    println!("✔ Logged out");
    Ok(())
}

pub fn session(ctx: &AppContext, out: &Output) -> Result<()> {
    let token = ctx.token();
    let claims = token.as_deref().and_then(decode_claims);
    let now = Utc::now();

    let value = json!({
        "logged_in": token.is_some(),
        "subject": claims.as_ref().and_then(|c| c.sub.clone()),
        "expires_at": claims.as_ref().and_then(|c| c.expires_at()).map(|at| at.to_rfc3339()),
        "expired": claims.as_ref().map(|c| c.is_expired(now)),
        "api_base_url": ctx.config().base_url(),
    });

    out.emit(&value, || {
        let mut text = format!("API:         {}\n", ctx.config().base_url());
        if token.is_none() {
            text.push_str("Session:     not logged in (run `titweng-admin login`)\n");
            return text;
        }
        text.push_str("Session:     token stored\n");
        if let Some(claims) = &claims {
            if let Some(sub) = &claims.sub {
                text.push_str(&format!("User:        {}\n", sub));
            }
            if let Some(at) = claims.expires_at() {
                let state = if claims.is_expired(now) { " (expired)" } else { "" };
                text.push_str(&format!("Expires:     {}{}\n", at.format("%Y-%m-%d %H:%M UTC"), state));
            }
        }
        text
    })
}

pub fn prefs(ctx: &AppContext, language: Option<Language>, theme: Option<Theme>, out: &Output) -> Result<()> {
    if let Some(language) = language {
        ctx.set_language(language)?;
    }
    if let Some(theme) = theme {
        ctx.set_theme(theme)?;
    }

    let language = ctx.language();
    let theme = ctx.theme();
    let value = json!({
        "language": language.code(),
        "rtl": language.is_rtl(),
        "theme": theme.to_string(),
    });
    out.emit(&value, || {
        format!(
            "Language:    {} ({})\nTheme:       {}\n",
            language.name(),
            language.code(),
            theme
        )
    })
}

pub fn config(
    set_api_url: Option<String>,
    set_jpeg_quality: Option<u8>,
    set_default_location: Option<String>,
    show: bool,
) -> Result<()> {
    // 環境変数の上書きを保存しないようファイルから読み直す
    let path = Config::config_path()?;
    let mut config = Config::load_from(&path)?;
    let mut changed = false;

    if let Some(url) = set_api_url {
        config.set_api_base_url(url)?;
        changed = true;
    }
    if let Some(quality) = set_jpeg_quality {
        config.set_jpeg_quality(quality)?;
        changed = true;
    }
    if let Some(location) = set_default_location {
        let location = location.trim().to_string();
        config.default_location = (!location.is_empty()).then_some(location);
        changed = true;
    }

    if changed {
        config.save_to(&path)?;
        println!("✔ Saved configuration: {}", path.display());
    }

    if show || !changed {
        println!("Configuration:");
        println!("  API URL:             {}", config.base_url());
        println!("  Timeout:             {}s", config.timeout_seconds);
        println!("  Max image size:      {}px", config.max_image_size);
        println!("  JPEG quality:        {}", config.jpeg_quality);
        println!(
            "  Default location:    {}",
            config.default_location.as_deref().unwrap_or("not set")
        );
        println!("  Similarity threshold: {}% (display only)", config.similarity_threshold);
    }
    Ok(())
}
