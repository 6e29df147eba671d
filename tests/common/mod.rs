//! テスト用のモックバックエンド
//!
//! 127.0.0.1の空きポートにaxumのルーターを立て、管理クライアントを
//! そこへ向ける。

#![allow(dead_code)]

use axum::extract::Multipart;
use axum::http::HeaderMap;
use axum::Router;
use image::{Rgb, RgbImage};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use titweng_admin::config::Config;
use titweng_admin::context::{AppContext, TOKEN_KEY};
use titweng_admin::storage::MemoryPreferenceStore;
use titweng_admin::{ApiClient, RequestScope};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const TEST_TOKEN: &str = "test-token";

pub struct MockBackend {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _server_handle: JoinHandle<()>,
}

impl MockBackend {
    pub async fn spawn(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server_handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            _server_handle: server_handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// モックに届いたリクエスト
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub authorization: Option<String>,
    /// multipartの (項目名, ファイル名, 値またはバイト数)
    pub fields: Vec<(String, Option<String>, String)>,
}

impl Recorded {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, _, v)| v.as_str())
    }

    pub fn count(&self, name: &str) -> usize {
        self.fields.iter().filter(|(n, _, _)| n == name).count()
    }
}

pub type Recorder = Arc<Mutex<Vec<Recorded>>>;

pub fn recorder() -> Recorder {
    Arc::new(Mutex::new(Vec::new()))
}

/// ヘッダーとmultipartの中身を記録する
pub async fn record(recorder: &Recorder, headers: &HeaderMap, multipart: Option<Multipart>) {
    let mut recorded = Recorded {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        fields: Vec::new(),
    };

    if let Some(mut multipart) = multipart {
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(String::from);
            let bytes = field.bytes().await.unwrap();
            let value = if file_name.is_some() {
                bytes.len().to_string()
            } else {
                String::from_utf8_lossy(&bytes).to_string()
            };
            recorded.fields.push((name, file_name, value));
        }
    }

    recorder.lock().push(recorded);
}

pub struct TestClient {
    pub client: ApiClient,
    pub ctx: AppContext,
    pub scope: Arc<RequestScope>,
}

/// モックに向けたクライアント（トークン保存済み）
pub fn client_for(url: &str) -> TestClient {
    client_with_token(url, Some(TEST_TOKEN))
}

pub fn client_with_token(url: &str, token: Option<&str>) -> TestClient {
    let config = Config {
        api_base_url: url.to_string(),
        timeout_seconds: 5,
        ..Default::default()
    };
    let store = match token {
        Some(token) => MemoryPreferenceStore::with(&[(TOKEN_KEY, token)]),
        None => MemoryPreferenceStore::new(),
    };
    let ctx = AppContext::new(config, Arc::new(store));
    let scope = RequestScope::new();
    let client = ApiClient::new(ctx.clone(), scope.clone()).unwrap();
    TestClient { client, ctx, scope }
}

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb([90, 60, 30]))
        .save(&path)
        .unwrap();
    path
}
