use super::client::{text_form, ApiClient};
use crate::error::{ErrorKind, Result};
use titweng_common::validation::validate_email;
use titweng_common::{HealthStatus, ServiceCheck};

/// システム状態ページの内容
#[derive(Debug, Clone)]
pub struct SystemStatus {
    pub health: HealthStatus,
    pub email: ServiceCheck,
}

impl ApiClient {
    pub async fn health(&self) -> Result<HealthStatus> {
        self.get_json("/health").await
    }

    pub async fn test_email_config(&self) -> Result<ServiceCheck> {
        self.get_json("/test-email-config").await
    }

    pub async fn test_ml_models(&self) -> Result<serde_json::Value> {
        self.get_json("/test-ml-models").await
    }

    pub async fn send_test_email(&self, email: &str) -> Result<serde_json::Value> {
        let email = validate_email(email)?;
        self.post_form("/send-test-email", text_form(vec![("test_email", email)])).await
    }

    pub async fn setup_database(&self) -> Result<serde_json::Value> {
        self.post_json("/setup-database", &serde_json::json!({})).await
    }

    /// ヘルスチェックとメール設定を並行取得（メール側の失敗はerror表示に落とす）
    pub async fn system_status(&self) -> Result<SystemStatus> {
        let (health, email) = tokio::join!(self.health(), self.test_email_config());
        let health = health?;
        let email = match email {
            Ok(check) => check,
            Err(e) if matches!(e.kind(), ErrorKind::Unauthorized | ErrorKind::Cancelled) => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "email configuration check failed");
                ServiceCheck::error(e.to_string())
            }
        };
        Ok(SystemStatus { health, email })
    }
}
