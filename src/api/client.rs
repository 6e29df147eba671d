//! 管理APIへのHTTPクライアント
//!
//! ステータスコードからエラー種別を決めるのはここだけ。401/403を
//! 受けた時点で保存済みトークンを消す。

use crate::context::AppContext;
use crate::error::{AdminError, Result};
use crate::scope::RequestScope;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    ctx: AppContext,
    scope: Arc<RequestScope>,
}

impl ApiClient {
    pub fn new(ctx: AppContext, scope: Arc<RequestScope>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(ctx.config().timeout_seconds.max(1)))
            .user_agent(concat!("titweng-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AdminError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self { http, ctx, scope })
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn scope(&self) -> &Arc<RequestScope> {
        &self.scope
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.ctx.config().base_url(), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.ctx.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// スコープ内で送信し、非2xxを型付きエラーに変換する
    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Response> {
        let started = Instant::now();
        tracing::debug!(%method, path, "request");

        let response = self
            .scope
            .run(async { builder.send().await.map_err(transport_error) })
            .await?;

        let status = response.status();
        tracing::debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = self.scope.run(async { response.text().await.map_err(transport_error) }).await?;
        Err(self.status_error(status, path, &body))
    }

    fn status_error(&self, status: StatusCode, path: &str, body: &str) -> AdminError {
        let message = error_message(body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::warn!(path, status = status.as_u16(), "token rejected, clearing stored session");
                if let Err(e) = self.ctx.clear_token() {
                    tracing::warn!(error = %e, "failed to clear stored token");
                }
                AdminError::Unauthorized(message)
            }
            StatusCode::NOT_FOUND => AdminError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AdminError::Validation(message),
            _ => AdminError::Transport(format!("{} {}", status.as_u16(), message)),
        }
    }

    async fn json<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let bytes = self
            .scope
            .run(async { response.bytes().await.map_err(transport_error) })
            .await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| AdminError::Transport(format!("unexpected response body: {}", e)))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, self.request(Method::GET, path)).await?;
        self.json(response).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path).query(query);
        let response = self.send(Method::GET, path, builder).await?;
        self.json(response).await
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.send(Method::GET, path, self.request(Method::GET, path)).await?;
        let bytes = self
            .scope
            .run(async { response.bytes().await.map_err(transport_error) })
            .await?;
        Ok(bytes.to_vec())
    }

    pub async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let builder = self.request(Method::POST, path).multipart(form);
        let response = self.send(Method::POST, path, builder).await?;
        self.json(response).await
    }

    pub async fn put_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let builder = self.request(Method::PUT, path).multipart(form);
        let response = self.send(Method::PUT, path, builder).await?;
        self.json(response).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path).json(body);
        let response = self.send(Method::POST, path, builder).await?;
        self.json(response).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::DELETE, path, self.request(Method::DELETE, path)).await?;
        self.json(response).await
    }
}

/// テキスト項目からmultipartフォームを作る
pub fn text_form(fields: Vec<(&'static str, String)>) -> Form {
    fields
        .into_iter()
        .fold(Form::new(), |form, (key, value)| form.text(key, value))
}

/// JPEG画像をフォームに追加
pub fn jpeg_part(file_name: &str, bytes: Vec<u8>) -> Result<Part> {
    Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str("image/jpeg")
        .map_err(|e| AdminError::Config(format!("multipart: {}", e)))
}

/// パスに埋め込む値をエスケープ（タグにスラッシュ等が来ても壊れないように）
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn transport_error(e: reqwest::Error) -> AdminError {
    if e.is_timeout() {
        AdminError::Transport("request timed out".into())
    } else if e.is_connect() {
        AdminError::Transport(format!("could not connect to backend: {}", e))
    } else {
        AdminError::Transport(e.to_string())
    }
}

/// エラーボディから表示用メッセージを取り出す
///
/// `{"detail": "..."}`、`{"detail": [{"msg": "..."}]}`、`{"message": "..."}`
/// の順に見る。
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let message = match value.get("detail") {
        Some(serde_json::Value::String(detail)) => Some(detail.clone()),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    };

    message
        .or_else(|| value.get("message").and_then(|m| m.as_str()).map(String::from))
        .filter(|m| !m.trim().is_empty())
}
