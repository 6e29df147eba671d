//! バックエンドAPIの型定義
//!
//! 管理APIのレスポンスをそのまま受ける型。フィールドは
//! バックエンドのsnake_caseに合わせ、欠損は `Option` / `default` で吸収する。

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// `null` を既定値として読む（`#[serde(default)]` は欠損のみ対象のため）
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// レコードID（バックエンドは数値・文字列のどちらも返す）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// 照合結果に含まれる牛の概要（そのまま表示に使う）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CowSummary {
    #[serde(alias = "tag")]
    pub cow_tag: Option<String>,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub owner_name: Option<String>,
    pub facial_image_url: Option<String>,
}

/// `verification_results` の1要素
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationResultEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub cow_found: bool,
    /// 類似度（0.0-1.0）
    pub similarity: Option<f64>,
    pub cow_details: Option<CowSummary>,
    pub verified: Option<bool>,
    pub verification_method: Option<String>,
}

/// 照合APIレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyResponse {
    pub verification_results: Option<Vec<VerificationResultEntry>>,
    pub detail: Option<serde_json::Value>,
}

/// 登録済みの牛
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Cow {
    pub cow_id: Option<RecordId>,
    #[serde(deserialize_with = "null_as_default")]
    pub cow_tag: String,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub age: Option<u32>,
    pub owner_full_name: Option<String>,
    pub owner_phone: Option<String>,
    pub owner_email: Option<String>,
    pub owner_address: Option<String>,
    pub owner_national_id: Option<String>,
    pub facial_image_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub nose_print_images: Vec<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CowList {
    #[serde(deserialize_with = "null_as_default")]
    pub cows: Vec<Cow>,
}

/// 所有者
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Owner {
    pub owner_id: Option<RecordId>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerList {
    #[serde(deserialize_with = "null_as_default")]
    pub owners: Vec<Owner>,
}

/// 照合履歴の1行
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationLog {
    pub id: Option<RecordId>,
    pub cow_tag: Option<String>,
    pub verification_method: Option<String>,
    /// 類似度（%）
    pub similarity_score: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,
    pub location: Option<String>,
    pub created_at: Option<String>,
}

impl VerificationLog {
    /// 照合方式の表示名
    pub fn method_label(&self) -> &'static str {
        match self.verification_method.as_deref() {
            Some("nose_print") => "Nose Print",
            _ => "Tag Lookup",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationLogList {
    #[serde(deserialize_with = "null_as_default")]
    pub verifications: Vec<VerificationLog>,
}

/// 盗難・紛争などの通報
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    pub report_type: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub cow_tag: Option<String>,
    pub location: Option<String>,
    pub reporter_name: Option<String>,
    pub reporter_phone: Option<String>,
    pub reporter_email: Option<String>,
    pub admin_reply: Option<String>,
    pub created_at: Option<String>,
}

impl Report {
    /// 表示用ID（RPT-001形式）
    pub fn display_id(&self) -> String {
        format!("RPT-{:03}", self.id)
    }

    /// ステータス表示名（"in_progress" → "In progress"）
    pub fn status_label(&self) -> String {
        let spaced = self.status.replacen('_', " ", 1);
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == "resolved"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportList {
    #[serde(deserialize_with = "null_as_default")]
    pub reports: Vec<Report>,
}

/// ダッシュボード統計
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_cows: Option<u64>,
    pub new_cows_this_month: Option<u64>,
    pub total_owners: Option<u64>,
    pub new_owners_this_month: Option<u64>,
    pub daily_verifications: Option<u64>,
    pub verification_success_rate: Option<f64>,
    pub pending_reports: Option<u64>,
    pub urgent_reports: Option<u64>,
}

/// `/health` レスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: Option<String>,
    pub message: Option<String>,
    pub database_status: Option<String>,
    pub database_message: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.as_deref() == Some("healthy")
    }

    pub fn database_connected(&self) -> bool {
        self.database_status.as_deref() == Some("healthy")
    }
}

/// メール設定・MLモデル等の診断結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceCheck {
    pub status: Option<String>,
    pub message: Option<String>,
}

impl ServiceCheck {
    /// 取得できなかった診断をerror扱いにする
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Some("error".to_string()),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

/// 次に払い出されるタグ
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TagInfo {
    pub next_tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterResponse {
    pub cow_tag: Option<String>,
    pub message: Option<String>,
}

/// 更新・削除などの汎用レスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiMessage {
    pub message: Option<String>,
    pub detail: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accepts_int_and_text() {
        let cow: Cow = serde_json::from_str(r#"{"cow_id": 12, "cow_tag": "TW-2025-BWF-0042"}"#).unwrap();
        assert_eq!(cow.cow_id, Some(RecordId::Int(12)));
        assert_eq!(cow.cow_id.unwrap().to_string(), "12");

        let cow: Cow = serde_json::from_str(r#"{"cow_id": "a1b2", "cow_tag": "TW"}"#).unwrap();
        assert_eq!(cow.cow_id, Some(RecordId::Text("a1b2".to_string())));
    }

    #[test]
    fn test_cow_summary_accepts_tag_alias() {
        let summary: CowSummary = serde_json::from_str(r#"{"tag": "TW-1", "breed": "Ankole"}"#).unwrap();
        assert_eq!(summary.cow_tag.as_deref(), Some("TW-1"));
        assert_eq!(summary.breed.as_deref(), Some("Ankole"));
        assert!(summary.owner_name.is_none());
    }

    #[test]
    fn test_lists_default_to_empty() {
        let cows: CowList = serde_json::from_str("{}").unwrap();
        assert!(cows.cows.is_empty());
        let logs: VerificationLogList = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        assert!(logs.verifications.is_empty());
    }

    #[test]
    fn test_null_fields_read_as_defaults() {
        let cows: CowList =
            serde_json::from_str(r#"{"cows": [{"cow_tag": null, "nose_print_images": null, "breed": "Zebu"}]}"#).unwrap();
        assert_eq!(cows.cows[0].cow_tag, "");
        assert!(cows.cows[0].nose_print_images.is_empty());
        assert_eq!(cows.cows[0].breed.as_deref(), Some("Zebu"));

        let logs: VerificationLogList = serde_json::from_str(r#"{"verifications": [{"success": null}]}"#).unwrap();
        assert!(!logs.verifications[0].success);

        let reports: ReportList = serde_json::from_str(r#"{"reports": [{"id": null, "status": null}]}"#).unwrap();
        assert_eq!(reports.reports[0].id, 0);
        assert_eq!(reports.reports[0].status, "");

        let entry: VerificationResultEntry = serde_json::from_str(r#"{"cow_found": null}"#).unwrap();
        assert!(!entry.cow_found);

        let lists: OwnerList = serde_json::from_str(r#"{"owners": null}"#).unwrap();
        assert!(lists.owners.is_empty());
    }

    #[test]
    fn test_report_display_id_and_status() {
        let report = Report {
            id: 7,
            status: "in_progress".to_string(),
            ..Default::default()
        };
        assert_eq!(report.display_id(), "RPT-007");
        assert_eq!(report.status_label(), "In progress");
        assert!(!report.is_resolved());

        let report = Report {
            id: 1234,
            status: "resolved".to_string(),
            ..Default::default()
        };
        assert_eq!(report.display_id(), "RPT-1234");
        assert_eq!(report.status_label(), "Resolved");
        assert!(report.is_resolved());
    }

    #[test]
    fn test_verification_log_method_label() {
        let log = VerificationLog {
            verification_method: Some("nose_print".to_string()),
            ..Default::default()
        };
        assert_eq!(log.method_label(), "Nose Print");
        assert_eq!(VerificationLog::default().method_label(), "Tag Lookup");
    }

    #[test]
    fn test_health_status_flags() {
        let health: HealthStatus = serde_json::from_str(
            r#"{"status": "healthy", "database_status": "unhealthy"}"#,
        )
        .unwrap();
        assert!(health.is_healthy());
        assert!(!health.database_connected());
    }

    #[test]
    fn test_service_check_error() {
        let check = ServiceCheck::error("timeout");
        assert!(!check.is_success());
        assert_eq!(check.status.as_deref(), Some("error"));
    }
}
